use crate::error::DnfError;
use crate::mode::Mode;
use crate::replacer::ReplacementRule;

/// A single replace-everywhere request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub mode: Mode,
    pub old: String,
    pub new: String,
}

impl Operation {
    /// Build an operation, rejecting an old string that is blank after trimming
    pub fn new(mode: Mode, old: impl Into<String>, new: impl Into<String>) -> Result<Self, DnfError> {
        let old = old.into();
        if old.trim().is_empty() {
            return Err(DnfError::EmptyInput);
        }

        Ok(Self {
            mode,
            old,
            new: new.into(),
        })
    }

    /// Rule with the replacement already passed through the mode
    pub fn rule(&self) -> ReplacementRule {
        ReplacementRule::new(self.old.clone(), self.mode.resolve(&self.new))
    }
}

/// A predefined operation addressable by a short identifier
#[derive(Debug, Clone, Copy)]
pub struct NamedOperation {
    pub id: &'static str,
    pub description: &'static str,
    pub mode: Mode,
    pub old: &'static str,
    pub new: &'static str,
}

impl NamedOperation {
    pub fn operation(&self) -> Result<Operation, DnfError> {
        Operation::new(self.mode, self.old, self.new)
    }
}

/// Named operations run under the execution guard
pub const NAMED_OPERATIONS: &[NamedOperation] = &[
    NamedOperation {
        id: "1",
        description: "Before work: exkontakt -> xk",
        mode: Mode::Plain,
        old: "exkontakt",
        new: "xk",
    },
    NamedOperation {
        id: "2",
        description: "After work: sxky -> exkontakt",
        mode: Mode::WrappedSy,
        old: "sxky",
        new: "exkontakt",
    },
];

/// Look up a named operation by identifier
pub fn find_named(id: &str) -> Result<&'static NamedOperation, DnfError> {
    NAMED_OPERATIONS
        .iter()
        .find(|named| named.id == id)
        .ok_or_else(|| DnfError::InvalidCommandId(id.to_string()))
}
