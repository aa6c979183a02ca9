use crate::guard::STATE_FILE_NAME;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};

/// Command line arguments parser
#[derive(Parser, Debug)]
#[command(author, version, about = "DNF (Directory Name Fixer) - Safe renaming tool")]
#[command(name = "dnf")]
#[command(after_help = "\
Examples:
  dnf 1                    # Before work: exkontakt -> xk
  dnf 2                    # After work: sxky -> exkontakt
  dnf rename 1 old new     # Direct rename mode 1
  dnf rename 2 old new     # Direct rename mode 2

The numbered commands refuse to run twice in a row.")]
pub struct Args {
    /// Directory to process [default: directory of the dnf executable]
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// File recording the last successful numbered command
    /// [default: .dnf_last_command next to the dnf executable]
    #[arg(long = "state-file", value_name = "PATH", global = true)]
    pub state_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Direct rename mode, not tracked by the guard
    Rename {
        /// Rename mode (1=simple, 2=add s/y)
        mode: String,

        /// String to replace
        old: String,

        /// Replacement string
        new: String,
    },

    /// Show the numbered commands and the last one executed
    List,

    /// Numbered command (1 or 2)
    #[command(external_subcommand)]
    Named(Vec<String>),
}

/// Paths the run works with, after defaults are applied
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub state_file: PathBuf,
}

/// Directory holding the running executable
fn tool_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the dnf executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Executable path has no parent: {:?}", exe))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()
            .context("Failed to read the current directory")?
            .join(path))
    }
}

impl Args {
    /// Resolve the root directory and guard file, falling back to the executable's directory
    pub fn paths(&self) -> Result<Paths> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => tool_dir()?,
        };
        let root = root
            .canonicalize()
            .with_context(|| format!("Root directory not found: {:?}", root))?;
        if !root.is_dir() {
            return Err(anyhow!("Root is not a directory: {:?}", root));
        }

        let state_file = match &self.state_file {
            Some(path) => absolute(path)?,
            None => tool_dir()?.join(STATE_FILE_NAME),
        };
        // Match the canonical root so the walks can recognize the marker
        let state_file = match (state_file.parent(), state_file.file_name()) {
            (Some(parent), Some(name)) => match parent.canonicalize() {
                Ok(parent) => parent.join(name),
                Err(_) => state_file,
            },
            _ => state_file,
        };

        Ok(Paths { root, state_file })
    }
}
