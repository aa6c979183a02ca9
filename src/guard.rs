use crate::error::DnfError;
use crate::operation::find_named;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File name of the marker that records the last successful named command
pub const STATE_FILE_NAME: &str = ".dnf_last_command";

/// Storage for the identifier of the last successful named command
pub trait GuardStore {
    /// Read the recorded identifier, if any
    fn read(&self) -> Result<Option<String>, DnfError>;

    /// Record an identifier, replacing whatever was there
    fn write(&mut self, id: &str) -> Result<(), DnfError>;
}

/// Guard state kept in a plain-text marker file
#[derive(Debug, Clone)]
pub struct FileGuardStore {
    path: PathBuf,
}

impl FileGuardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GuardStore for FileGuardStore {
    fn read(&self) -> Result<Option<String>, DnfError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let id = content.trim();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(id.to_string()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DnfError::GuardState {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&mut self, id: &str) -> Result<(), DnfError> {
        fs::write(&self.path, id).map_err(|source| DnfError::GuardState {
            path: self.path.clone(),
            source,
        })
    }
}

/// Refuses to run the same named command twice in a row
pub struct ExecutionGuard<S: GuardStore> {
    store: S,
}

impl<S: GuardStore> ExecutionGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Identifier of the last successful named command, if it is a known one
    pub fn last(&self) -> Result<Option<String>, DnfError> {
        let last = self.store.read()?;
        match last {
            Some(id) if find_named(&id).is_err() => {
                eprintln!("Warning: Ignoring unrecognized guard state '{}'", id);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Fail if `id` is the command that ran last
    pub fn check(&self, id: &str) -> Result<(), DnfError> {
        if self.last()?.as_deref() == Some(id) {
            return Err(DnfError::DuplicateExecution { id: id.to_string() });
        }
        Ok(())
    }

    /// Record `id` as the last successful command
    pub fn commit(&mut self, id: &str) -> Result<(), DnfError> {
        self.store.write(id)
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryGuardStore {
    pub value: Option<String>,
}

#[cfg(test)]
impl GuardStore for MemoryGuardStore {
    fn read(&self) -> Result<Option<String>, DnfError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, id: &str) -> Result<(), DnfError> {
        self.value = Some(id.to_string());
        Ok(())
    }
}
