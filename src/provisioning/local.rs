//! Local repository steps
//!
//! The git side of the bootstrap as an injectable capability, plus the
//! check-before-act sequences that make re-running after a failure safe.

use crate::Result;
use gitcmd::Git;

/// Version-control operations the workflow needs
pub trait VersionControl {
    /// `git status` check: true inside a repository
    fn is_repository(&self) -> Result<bool>;
    fn init(&self) -> Result<()>;
    fn add_all(&self) -> Result<()>;
    fn rename_branch(&self, branch: &str) -> Result<()>;
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
    fn add_remote(&self, remote: &str, url: &str) -> Result<()>;
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;
    fn has_commits(&self) -> Result<bool>;
    fn has_staged_changes(&self) -> Result<bool>;
    fn commit(&self, message: &str, allow_empty: bool) -> Result<()>;
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

impl VersionControl for Git {
    fn is_repository(&self) -> Result<bool> {
        Ok(self.status()?)
    }

    fn init(&self) -> Result<()> {
        Git::init(self)?;
        Ok(())
    }

    fn add_all(&self) -> Result<()> {
        Git::add_all(self)?;
        Ok(())
    }

    fn rename_branch(&self, branch: &str) -> Result<()> {
        Git::rename_branch(self, branch)?;
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(Git::remote_url(self, remote)?)
    }

    fn add_remote(&self, remote: &str, url: &str) -> Result<()> {
        Git::add_remote(self, remote, url)?;
        Ok(())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        Git::set_remote_url(self, remote, url)?;
        Ok(())
    }

    fn has_commits(&self) -> Result<bool> {
        Ok(Git::has_commits(self)?)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        Ok(Git::has_staged_changes(self)?)
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<()> {
        Git::commit(self, message, allow_empty)?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        Git::push(self, remote, branch)?;
        Ok(())
    }
}

/// What happened to the remote during publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    Added,
    Updated,
    Unchanged,
}

/// What happened to the commit during publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    Committed,
    /// First commit of a repository with nothing staged
    EmptyInitial,
    /// Nothing staged and history already exists
    Skipped,
}

/// Summary of [`publish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub remote: RemoteAction,
    pub commit: CommitAction,
}

/// Where and how the initial commit is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget<'a> {
    pub remote_name: &'a str,
    pub remote_url: &'a str,
    pub branch: &'a str,
    pub commit_message: &'a str,
}

/// Initialize a repository unless `git status` says one exists.
///
/// Returns true when `init` ran. A missing git binary fails the check with
/// an error instead of being read as "not a repository".
pub fn ensure_repository(vcs: &dyn VersionControl) -> Result<bool> {
    if vcs.is_repository()? {
        tracing::debug!("Working directory is already a repository");
        return Ok(false);
    }

    vcs.init()?;
    tracing::info!("Initialized repository");
    Ok(true)
}

/// Point `remote_name` at `url`, adding or updating it as needed
pub fn ensure_remote(
    vcs: &dyn VersionControl,
    remote_name: &str,
    url: &str,
) -> Result<RemoteAction> {
    match vcs.remote_url(remote_name)? {
        None => {
            vcs.add_remote(remote_name, url)?;
            Ok(RemoteAction::Added)
        }
        Some(existing) if existing == url => Ok(RemoteAction::Unchanged),
        Some(existing) => {
            tracing::warn!(
                remote = %remote_name,
                old = %existing,
                new = %url,
                "Replacing remote URL"
            );
            vcs.set_remote_url(remote_name, url)?;
            Ok(RemoteAction::Updated)
        }
    }
}

/// Stage everything, commit, rename the branch, wire the remote, then push.
///
/// Steps run in order; the first failure stops the sequence.
pub fn publish(vcs: &dyn VersionControl, target: &PublishTarget<'_>) -> Result<PublishReport> {
    vcs.add_all()?;

    let commit = if vcs.has_staged_changes()? {
        vcs.commit(target.commit_message, false)?;
        CommitAction::Committed
    } else if !vcs.has_commits()? {
        vcs.commit(target.commit_message, true)?;
        CommitAction::EmptyInitial
    } else {
        tracing::info!("Nothing to commit");
        CommitAction::Skipped
    };

    // An unborn branch cannot be renamed, so this follows the commit.
    vcs.rename_branch(target.branch)?;

    let remote = ensure_remote(vcs, target.remote_name, target.remote_url)?;

    vcs.push(target.remote_name, target.branch)?;

    tracing::info!(
        remote = %target.remote_name,
        branch = %target.branch,
        ?commit,
        ?remote,
        "Published"
    );

    Ok(PublishReport { remote, commit })
}
