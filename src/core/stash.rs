//! The push transaction: move working tree changes onto a new branch, publish it and
//! return to the original branch.
//!
//! The sequence is not atomic. A failure after the branch switch leaves the
//! repository on the stash branch with the user's changes intact; nothing is rolled
//! back automatically.

use crate::core::context::RepoContext;
use crate::core::error::{Result, ResultExt, StashError};
use git2::Oid;

pub fn default_commit_message(branch_name: &str) -> String {
    format!("move local changes to branch {branch_name}")
}

/// Commit the working tree delta to `target`, push it and switch back.
///
/// An empty or missing `message` uses [`default_commit_message`].
pub fn stash_changes(ctx: &RepoContext, target: &str, message: Option<&str>) -> Result<Oid> {
    validate_target(ctx, target)?;
    let git_repo = &ctx.git_repo;

    git_repo
        .create_and_switch_branch(target)
        .context(format!("creating branch {target}"))?;

    let staged = git_repo.stage_all().context("staging changes")?;
    log::debug!("Staged {staged} paths on {target}");

    let message = match message.map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => default_commit_message(target),
    };
    let oid = git_repo
        .commit_index(&message)
        .context(format!("committing to {target}"))?;
    log::info!("Committed {oid} on {target}");

    let refspec = format!("refs/heads/{target}:refs/heads/{target}");
    git_repo
        .push(&ctx.remote, &refspec)
        .context(format!("pushing {target} to {}", ctx.remote))?;

    git_repo
        .force_checkout_branch(&ctx.branch)
        .context(format!("switching back to {}", ctx.branch))?;

    Ok(oid)
}

fn validate_target(ctx: &RepoContext, target: &str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(StashError::BranchNameEmpty);
    }
    if target == ctx.branch {
        return Err(StashError::target_equals_current(target));
    }
    if ctx.git_repo.branch_exists(target)? {
        return Err(StashError::branch_already_exists(target));
    }
    Ok(())
}
