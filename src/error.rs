use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a failed rename, content rewrite or guard update
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid input rejected before touching the filesystem
pub const EXIT_USAGE: i32 = 2;
/// Exit code for a named command refused by the guard
pub const EXIT_DUPLICATE: i32 = 3;

/// Errors the tool reports with a dedicated exit code
#[derive(Debug, Error)]
pub enum DnfError {
    #[error("old string cannot be empty")]
    EmptyInput,

    #[error("invalid mode '{0}': mode must be 1 or 2")]
    InvalidMode(String),

    #[error("invalid command ID '{0}': must be 1 or 2")]
    InvalidCommandId(String),

    #[error("command {id} was already executed last time")]
    DuplicateExecution { id: String },

    #[error("cannot rename {from:?} to {to:?}: target already exists")]
    RenameConflict { from: PathBuf, to: PathBuf },

    #[error("failed to rename {from:?} to {to:?}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{errors} path(s) could not be read while walking the tree")]
    WalkFailed { errors: usize },

    #[error("content could not be rewritten in {failed} file(s)")]
    ContentFailures { failed: usize },

    #[error("cannot access guard state file {path:?}")]
    GuardState {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DnfError {
    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            DnfError::EmptyInput | DnfError::InvalidMode(_) | DnfError::InvalidCommandId(_) => {
                EXIT_USAGE
            }
            DnfError::DuplicateExecution { .. } => EXIT_DUPLICATE,
            DnfError::RenameConflict { .. }
            | DnfError::RenameFailed { .. }
            | DnfError::WalkFailed { .. }
            | DnfError::ContentFailures { .. }
            | DnfError::GuardState { .. } => EXIT_FAILURE,
        }
    }
}

/// Pick the exit code for any error bubbling up to `main`
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DnfError>())
        .map(DnfError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
