//! git command-line wrapper for Rust
//!
//! A small, typed interface over the installed `git` binary. Every call runs
//! one child process and reports success by exit code, so behaviour matches
//! what a user would see typing the same command.
//!
//! # Example
//!
//! ```no_run
//! use gitcmd::Git;
//!
//! let git = Git::new()?;
//!
//! if !git.is_repo() {
//!     git.init()?;
//! }
//! git.add_all()?;
//! git.commit("initial commit", false)?;
//! # Ok::<(), gitcmd::Error>(())
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors that can occur when driving git
#[derive(Error, Debug)]
pub enum Error {
    #[error("git is not installed or not in PATH")]
    NotInstalled,

    #[error("`git {command}` failed (exit code {}): {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn exit_label(code: impl std::borrow::Borrow<Option<i32>>) -> String {
    match code.borrow() {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

impl Error {
    /// True when the git binary itself could not be found
    pub fn is_not_installed(&self) -> bool {
        matches!(self, Error::NotInstalled)
    }
}

/// Result type for git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Output from a git command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Get combined stdout and stderr output
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// git CLI wrapper
#[derive(Debug, Clone, Default)]
pub struct Git {
    /// Working directory
    workdir: Option<PathBuf>,
    /// Global flags placed before every subcommand (e.g. `-c user.name=x`)
    global_flags: Vec<String>,
}

impl Git {
    /// Create a new instance, failing if git cannot be executed
    pub fn new() -> Result<Self> {
        let git = Self::default();
        git.version()?;
        Ok(git)
    }

    /// Create with a specific working directory
    pub fn with_workdir(path: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(path.into()),
            global_flags: Vec::new(),
        }
    }

    /// Create with working directory and global flags
    pub fn with_workdir_and_flags(path: impl Into<PathBuf>, flags: Vec<String>) -> Self {
        Self {
            workdir: Some(path.into()),
            global_flags: flags,
        }
    }

    /// `git --version`
    pub fn version(&self) -> Result<String> {
        let output = self.run_command(&["--version"])?;
        Ok(output.stdout.trim().to_string())
    }

    /// Check if git is available
    pub fn is_available(&self) -> bool {
        self.version().is_ok()
    }

    // --- Repository state ---

    /// Check the working directory with `git status`.
    ///
    /// Returns `Ok(true)` inside a repository and `Ok(false)` when git exits
    /// non-zero. A missing git binary is an error, never `false`.
    pub fn status(&self) -> Result<bool> {
        let output = self.run_unchecked(&["status"])?;
        Ok(output.success)
    }

    /// Check if the working directory is inside a repository
    pub fn is_repo(&self) -> bool {
        self.status().unwrap_or(false)
    }

    /// Check whether HEAD resolves to a commit
    pub fn has_commits(&self) -> Result<bool> {
        let output = self.run_unchecked(&["rev-parse", "--verify", "--quiet", "HEAD"])?;
        Ok(output.success)
    }

    /// Check whether the index differs from HEAD (or holds anything, before the first commit)
    pub fn has_staged_changes(&self) -> Result<bool> {
        if self.has_commits()? {
            // exit 1 means "differences found"
            let output = self.run_unchecked(&["diff", "--cached", "--quiet"])?;
            match output.code {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(Self::failure(&["diff", "--cached", "--quiet"], &output)),
            }
        } else {
            let output = self.run_command(&["ls-files", "--cached"])?;
            Ok(!output.stdout.trim().is_empty())
        }
    }

    /// Get the URL configured for a remote, if any
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let output = self.run_unchecked(&["remote", "get-url", remote])?;
        if output.success {
            let url = output.stdout.trim().to_string();
            Ok((!url.is_empty()).then_some(url))
        } else {
            Ok(None)
        }
    }

    // --- Mutating operations ---

    /// `git init`
    pub fn init(&self) -> Result<CommandOutput> {
        self.run_command(&["init"])
    }

    /// `git add .`
    pub fn add_all(&self) -> Result<CommandOutput> {
        self.run_command(&["add", "."])
    }

    /// `git branch -M <name>`
    pub fn rename_branch(&self, name: &str) -> Result<CommandOutput> {
        self.run_command(&["branch", "-M", name])
    }

    /// `git remote add <name> <url>`
    pub fn add_remote(&self, name: &str, url: &str) -> Result<CommandOutput> {
        self.run_command(&["remote", "add", name, url])
    }

    /// `git remote set-url <name> <url>`
    pub fn set_remote_url(&self, name: &str, url: &str) -> Result<CommandOutput> {
        self.run_command(&["remote", "set-url", name, url])
    }

    /// `git commit -m <message>`, optionally with `--allow-empty`
    pub fn commit(&self, message: &str, allow_empty: bool) -> Result<CommandOutput> {
        let mut args = vec!["commit", "-m", message];
        if allow_empty {
            args.push("--allow-empty");
        }
        self.run_command(&args)
    }

    /// `git push -u <remote> <branch>`
    pub fn push(&self, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run_command(&["push", "-u", remote, branch])
    }

    // --- Internal helpers ---

    /// Run a git command, treating a non-zero exit as an error
    fn run_command(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run_unchecked(args)?;
        if !output.success {
            return Err(Self::failure(args, &output));
        }
        Ok(output)
    }

    /// Run a git command and report its exit status without judging it
    fn run_unchecked(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new("git");

        for flag in &self.global_flags {
            cmd.arg(flag);
        }

        cmd.args(args);

        if let Some(ref dir) = self.workdir {
            cmd.current_dir(dir);
        }

        // A missing workdir also spawns with NotFound
        let workdir_missing = self.workdir.as_ref().is_some_and(|dir| !dir.is_dir());

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound && !workdir_missing {
                Error::NotInstalled
            } else {
                Error::Io(e)
            }
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn failure(args: &[&str], output: &CommandOutput) -> Error {
        Error::CommandFailed {
            command: args.join(" "),
            code: output.code,
            stderr: output.combined().trim().to_string(),
        }
    }
}
