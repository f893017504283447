//! Per-invocation repository context: the opened repository, the checked out
//! branch and the remote it tracks.

use crate::core::error::{Result, ResultExt};
use crate::core::git::GitRepo;
use std::path::Path;

pub struct RepoContext {
    pub git_repo: GitRepo,
    pub branch: String,
    pub remote: String,
}

impl RepoContext {
    /// Open the repository containing `path` and resolve branch and remote.
    ///
    /// Fails with `NotARepository` outside a repository and `DetachedHead` when HEAD
    /// does not point at a branch.
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        let git_repo = GitRepo::open(path)?;
        let branch = git_repo.current_branch()?;
        let remote = git_repo.tracking_remote(&branch);
        log::debug!("Resolved context: branch {branch}, remote {remote}");
        Ok(Self {
            git_repo,
            branch,
            remote,
        })
    }

    /// Bring the current branch up to date with its remote, fast-forward only
    pub fn update_repository(&self) -> Result<()> {
        self.git_repo
            .pull_fast_forward(&self.remote, &self.branch)
            .context(format!("updating {} from {}", self.branch, self.remote))
    }
}
