//! Local and remote removal of stash branches.
//!
//! Deleting the checked out branch is refused before anything is touched. Both the
//! local and the remote removal are attempted even when the other one fails, and
//! missing references on either side count as already deleted.

use crate::core::context::RepoContext;
use crate::core::error::{Result, StashError};

/// Delete `name` locally and on the context's remote
pub fn delete_branch(ctx: &RepoContext, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StashError::BranchNameEmpty);
    }
    if name == ctx.branch {
        return Err(StashError::cannot_delete_current(name));
    }

    let mut failures = Vec::new();

    match ctx.git_repo.delete_reference(&format!("refs/heads/{name}")) {
        Ok(true) => log::debug!("Deleted local branch {name}"),
        Ok(false) => log::debug!("Local branch {name} does not exist"),
        Err(e) => {
            log::warn!("Could not delete local branch {name}: {e}");
            failures.push(format!("local: {e}"));
        }
    }

    if let Err(e) = delete_remote_branch(ctx, name) {
        log::warn!("Could not delete {}/{name}: {e}", ctx.remote);
        failures.push(format!("remote: {e}"));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(StashError::deletion_failed(name, failures.join("; ")))
    }
}

fn delete_remote_branch(ctx: &RepoContext, name: &str) -> Result<()> {
    let git_repo = &ctx.git_repo;

    if git_repo.remote_has_branch(&ctx.remote, name)? {
        git_repo.push(&ctx.remote, &format!(":refs/heads/{name}"))?;
        log::info!("Deleted {}/{name}", ctx.remote);
    } else {
        log::debug!("{}/{name} is already gone", ctx.remote);
    }

    git_repo.delete_reference(&format!("refs/remotes/{}/{name}", ctx.remote))?;
    Ok(())
}
