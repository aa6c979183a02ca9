use crate::error::DnfError;
use std::fmt;
use std::str::FromStr;

/// Transformation applied to the replacement string before substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Plain,     // 1: replacement used as-is
    WrappedSy, // 2: replacement wrapped as s<new>y
}

impl Mode {
    /// Compute the string that actually replaces matches
    ///
    /// # Arguments
    /// * `new` - The literal replacement given by the user
    ///
    /// # Returns
    /// * `String` - The final replacement for this mode
    pub fn resolve(&self, new: &str) -> String {
        match self {
            Mode::Plain => new.to_string(),
            Mode::WrappedSy => format!("s{}y", new),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Mode::Plain => 1,
            Mode::WrappedSy => 2,
        }
    }
}

impl FromStr for Mode {
    type Err = DnfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Mode::Plain),
            "2" => Ok(Mode::WrappedSy),
            other => Err(DnfError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
