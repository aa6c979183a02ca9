use crate::error::DnfError;
use crate::replacer::ReplacementRule;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Options shared by the rename and rewrite walks
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Paths never renamed or rewritten (the guard marker)
    ///
    /// Directories containing an excluded path are not renamed either, so the
    /// path stays valid for the whole run.
    pub exclude: Vec<PathBuf>,

    /// Report skipped files too
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Other,
}

/// A path below the root, as seen during the walk
#[derive(Debug)]
struct Entry {
    path: PathBuf,
    depth: usize,
    kind: EntryKind,
}

/// Everything the walk could see, plus how many paths it could not read
#[derive(Debug, Default)]
struct Listing {
    entries: Vec<Entry>,
    errors: usize,
}

/// Result of trying to read a file as UTF-8 text
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded {
    Text(String),
    Undecodable,
}

/// Outcome of the content phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentReport {
    pub modified: usize,
    pub undecodable: usize,
    pub failed: usize,
}

/// Collect every entry below `root` (the root itself excluded)
///
/// Hidden and ignored files are included, symbolic links are not followed.
/// Unreadable directories are reported and counted in `Listing::errors`.
fn collect_entries(root: &Path, options: &ScanOptions) -> Listing {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut listing = Listing::default();

    for result in walker {
        match result {
            Ok(entry) => {
                if entry.depth() == 0 || options.exclude.iter().any(|p| p == entry.path()) {
                    continue;
                }
                let kind = match entry.file_type() {
                    Some(ft) if ft.is_dir() => EntryKind::Dir,
                    Some(ft) if ft.is_file() => EntryKind::File,
                    _ => EntryKind::Other,
                };
                listing.entries.push(Entry {
                    path: entry.path().to_path_buf(),
                    depth: entry.depth(),
                    kind,
                });
            }
            Err(err) => {
                listing.errors += 1;
                eprintln!("Error walking directory: {}", err);
            }
        }
    }

    listing
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Rename every file and directory below `root` whose name contains the FROM string
///
/// The whole tree is enumerated first, then entries are renamed deepest level
/// first so a directory is only renamed after all of its descendants. A walk
/// error aborts before anything is renamed; the first conflict or failed rename
/// aborts the walk.
///
/// # Returns
/// * `Result<usize>` - Number of entries renamed
pub fn rename_tree(root: &Path, rule: &ReplacementRule, options: &ScanOptions) -> Result<usize> {
    let Listing { mut entries, errors } = collect_entries(root, options);
    if errors > 0 {
        return Err(DnfError::WalkFailed { errors }.into());
    }
    // Stable sort keeps name order within a level
    entries.sort_by(|a, b| b.depth.cmp(&a.depth));

    let mut renamed = 0;
    for entry in &entries {
        if contains_excluded(&entry.path, options) {
            continue;
        }
        if rename_entry(entry, root, rule)? {
            renamed += 1;
        }
    }

    Ok(renamed)
}

fn contains_excluded(dir: &Path, options: &ScanOptions) -> bool {
    options.exclude.iter().any(|p| p != dir && p.starts_with(dir))
}

fn rename_entry(entry: &Entry, root: &Path, rule: &ReplacementRule) -> Result<bool, DnfError> {
    let Some(name) = entry.path.file_name().and_then(|n| n.to_str()) else {
        return Ok(false);
    };
    let Some(new_name) = rule.apply(name) else {
        return Ok(false);
    };

    let parent = entry.path.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(&new_name);

    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(DnfError::RenameConflict {
            from: entry.path.clone(),
            to: new_path,
        });
    }

    fs::rename(&entry.path, &new_path).map_err(|source| DnfError::RenameFailed {
        from: entry.path.clone(),
        to: new_path.clone(),
        source,
    })?;

    let label = if entry.kind == EntryKind::Dir { "directory" } else { "file" };
    println!(
        "Renamed {}: {} -> {}",
        label,
        relative(&entry.path, root).display(),
        relative(&new_path, root).display()
    );

    Ok(true)
}

/// Try to interpret raw bytes as UTF-8 text
pub fn decode(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(text) => Decoded::Text(text),
        Err(_) => Decoded::Undecodable,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FileOutcome {
    Modified,
    Unchanged,
    Undecodable,
}

/// Replace content in a single file, writing only when something changed
fn rewrite_file(path: &Path, rule: &ReplacementRule) -> Result<FileOutcome> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let content = match decode(bytes) {
        Decoded::Text(text) => text,
        Decoded::Undecodable => return Ok(FileOutcome::Undecodable),
    };

    let Some(replaced) = rule.apply(&content) else {
        return Ok(FileOutcome::Unchanged);
    };

    fs::write(path, replaced).with_context(|| format!("Failed to write file: {:?}", path))?;

    Ok(FileOutcome::Modified)
}

/// Rewrite the contents of every regular text file below `root`
///
/// Files that are not valid UTF-8 are skipped. Read or write failures, and
/// directories the walk could not read, are reported and counted as failed;
/// the walk carries on past them.
///
/// # Returns
/// * `Result<ContentReport>` - Counts of modified, skipped and failed files
pub fn rewrite_contents(
    root: &Path,
    rule: &ReplacementRule,
    options: &ScanOptions,
) -> Result<ContentReport> {
    let listing = collect_entries(root, options);
    let mut report = ContentReport {
        failed: listing.errors,
        ..ContentReport::default()
    };

    for entry in listing.entries {
        if entry.kind != EntryKind::File {
            continue;
        }

        let rel = relative(&entry.path, root);
        match rewrite_file(&entry.path, rule) {
            Ok(FileOutcome::Modified) => {
                report.modified += 1;
                println!("Modified content in: {}", rel.display());
            }
            Ok(FileOutcome::Unchanged) => {}
            Ok(FileOutcome::Undecodable) => {
                report.undecodable += 1;
                if options.verbose {
                    println!("Skipped non-text file: {}", rel.display());
                }
            }
            Err(err) => {
                report.failed += 1;
                eprintln!("Error: {:#}", err);
            }
        }
    }

    Ok(report)
}
