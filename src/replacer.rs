/// Replacement rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    /// FROM string to replace
    pub from: String,

    /// TO string to replace with (already resolved through the mode)
    pub to: String,
}

impl ReplacementRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check whether the haystack contains the FROM string (case-sensitive)
    pub fn matches(&self, haystack: &str) -> bool {
        !self.from.is_empty() && haystack.contains(&self.from)
    }

    /// Replace every non-overlapping occurrence, left to right
    ///
    /// # Arguments
    /// * `content` - The content to replace in
    ///
    /// # Returns
    /// * `Option<String>` - The replaced content, or None when nothing would change
    pub fn apply(&self, content: &str) -> Option<String> {
        if !self.matches(content) {
            return None;
        }

        let replaced = content.replace(&self.from, &self.to);
        if replaced == content {
            None
        } else {
            Some(replaced)
        }
    }
}
