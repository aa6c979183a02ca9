use crate::error::DnfError;
use crate::guard::{ExecutionGuard, GuardStore};
use crate::operation::{find_named, Operation};
use crate::scanner::{self, ScanOptions};
use anyhow::{Context, Result};
use std::path::Path;

/// What a completed run changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub renamed: usize,
    pub modified: usize,
    pub undecodable: usize,
}

/// Rename paths, then rewrite contents, for a single operation
///
/// # Arguments
/// * `root` - Directory whose descendants are processed
/// * `operation` - Validated operation to apply
/// * `options` - Walk options
///
/// # Returns
/// * `Result<RunSummary>` - Counts for the run, or the first fatal error
pub fn run_operation(root: &Path, operation: &Operation, options: &ScanOptions) -> Result<RunSummary> {
    let rule = operation.rule();
    println!(
        "Mode {}: Replacing '{}' with '{}' in directory: {}",
        operation.mode,
        rule.from,
        rule.to,
        root.display()
    );

    let renamed = scanner::rename_tree(root, &rule, options)?;
    let report = scanner::rewrite_contents(root, &rule, options)?;

    println!("Replacement complete! Modified {} files.", report.modified);

    if report.failed > 0 {
        return Err(DnfError::ContentFailures {
            failed: report.failed,
        }
        .into());
    }

    Ok(RunSummary {
        renamed,
        modified: report.modified,
        undecodable: report.undecodable,
    })
}

/// Direct mode: no guard involved
pub fn run_direct(root: &Path, operation: &Operation, options: &ScanOptions) -> Result<RunSummary> {
    run_operation(root, operation, options)
}

/// Named mode: consult the guard, run the bound operation, record success
pub fn run_named<S: GuardStore>(
    root: &Path,
    id: &str,
    guard: &mut ExecutionGuard<S>,
    options: &ScanOptions,
) -> Result<RunSummary> {
    let named = find_named(id)?;
    let operation = named.operation()?;

    if let Err(err) = guard.check(named.id) {
        if let DnfError::DuplicateExecution { .. } = err {
            eprintln!("Cannot execute the same command twice in a row.");
            eprintln!("Last executed: Command {}", named.id);
            eprintln!("Please run the other command first.");
        }
        return Err(err.into());
    }

    println!("Executing Command {}: {}", named.id, named.description);

    let summary = run_operation(root, &operation, options)
        .with_context(|| format!("Command {} failed", named.id))?;

    guard
        .commit(named.id)
        .with_context(|| format!("Command {} completed but could not be recorded", named.id))?;
    println!("Command {} completed successfully!", named.id);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::MemoryGuardStore;
    use crate::mode::Mode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_named_operation_then_duplicate_refused() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("foo_exkontakt.txt"), "hello exkontakt world").unwrap();

        let mut guard = ExecutionGuard::new(MemoryGuardStore::default());
        let options = ScanOptions::default();

        let summary = run_named(root, "1", &mut guard, &options).unwrap();
        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.modified, 1);
        assert_eq!(fs::read_to_string(root.join("foo_xk.txt")).unwrap(), "hello xk world");
        assert_eq!(guard.last().unwrap().as_deref(), Some("1"));

        // Seed a fresh match: a refused run must not touch it
        fs::write(root.join("again_exkontakt.txt"), "exkontakt").unwrap();
        let err = run_named(root, "1", &mut guard, &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnfError>(),
            Some(DnfError::DuplicateExecution { .. })
        ));
        assert!(root.join("foo_xk.txt").exists());
        assert!(root.join("again_exkontakt.txt").exists());
    }

    #[test]
    fn test_failed_named_operation_keeps_guard_state() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("exkontakt.txt"), "a").unwrap();
        fs::write(root.join("xk.txt"), "b").unwrap();

        let mut guard = ExecutionGuard::new(MemoryGuardStore {
            value: Some("2".to_string()),
        });
        let err = run_named(root, "1", &mut guard, &ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnfError>(),
            Some(DnfError::RenameConflict { .. })
        ));
        assert_eq!(guard.last().unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut guard = ExecutionGuard::new(MemoryGuardStore::default());
        let err = run_named(dir.path(), "7", &mut guard, &ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnfError>(),
            Some(DnfError::InvalidCommandId(_))
        ));
        assert_eq!(guard.last().unwrap(), None);
    }

    #[test]
    fn test_direct_wrapped_mode() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("abc.txt"), "abc").unwrap();

        let operation = Operation::new(Mode::WrappedSy, "abc", "X").unwrap();
        let summary = run_direct(root, &operation, &ScanOptions::default()).unwrap();

        assert_eq!(summary.renamed, 1);
        assert_eq!(fs::read_to_string(root.join("sXy.txt")).unwrap(), "sXy");
        assert!(!root.join("abc.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_fails_named_run_and_keeps_guard() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("exkontakt.txt"), "exkontakt").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o311)).unwrap();

        // Permission bits are not enforced for root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut guard = ExecutionGuard::new(MemoryGuardStore::default());
        let err = run_named(root, "1", &mut guard, &ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnfError>(),
            Some(DnfError::WalkFailed { .. })
        ));
        assert_eq!(guard.last().unwrap(), None);

        // Once readable again the same command is allowed
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        run_named(root, "1", &mut guard, &ScanOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(locked.join("xk.txt")).unwrap(), "xk");
        assert_eq!(guard.last().unwrap().as_deref(), Some("1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_fails_content_phase_and_keeps_guard() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let locked = root.join("locked.txt");
        fs::write(&locked, "exkontakt").unwrap();
        fs::write(root.join("a.txt"), "hello exkontakt").unwrap();
        fs::write(root.join("b.txt"), "exkontakt again").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits are not enforced for root
        if fs::read(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
            return;
        }

        let mut guard = ExecutionGuard::new(MemoryGuardStore {
            value: Some("2".to_string()),
        });
        let err = run_named(root, "1", &mut guard, &ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnfError>(),
            Some(DnfError::ContentFailures { failed: 1 })
        ));

        assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello xk");
        assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "xk again");
        assert_eq!(guard.last().unwrap().as_deref(), Some("2"));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(fs::read_to_string(&locked).unwrap(), "exkontakt");
    }
}
