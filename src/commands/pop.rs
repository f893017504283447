use crate::core::{
    config::Settings,
    context::RepoContext,
    error::{Result, StashError},
    inventory::list_stash_branches,
    print_success, print_warning,
    reapply::{apply_and_remove, select_stash, ApplyMode},
};
use std::env;

/// Reapply a stash branch onto the current branch and remove it.
///
/// Without an identifier (or with `0`) the only existing stash is used.
pub fn execute_pop(settings: &Settings, identifier: Option<String>) -> Result<String> {
    let ctx = RepoContext::resolve(env::current_dir()?)?;
    ctx.update_repository()?;

    // the fast-forward path hard-resets the working tree
    if ctx.git_repo.has_tracked_changes()? {
        return Err(StashError::DirtyWorkingTree);
    }

    let records = list_stash_branches(&ctx.git_repo, &ctx.remote, &settings.branch_prefix)?;
    let stash_name = select_stash(&records, &settings.branch_prefix, identifier.as_deref())?;

    match apply_and_remove(&ctx, &stash_name)? {
        ApplyMode::FastForward => {
            print_success(&format!("Applied {stash_name} to {}", ctx.branch));
        }
        ApplyMode::Merge => {
            print_success(&format!(
                "Merged {stash_name} into {} without committing",
                ctx.branch
            ));
            print_warning("A merge is in progress; review the result and commit it.");
        }
    }
    Ok(stash_name)
}
