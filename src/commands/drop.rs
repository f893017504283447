use crate::core::{
    config::Settings,
    context::RepoContext,
    deletion::delete_branch,
    error::{Result, ResultExt, StashError},
    print_success,
    reapply::qualify,
};
use std::env;

/// Delete a stash branch locally and on the remote. Unknown stashes are not an error.
pub fn execute_drop(settings: &Settings, identifier: &str) -> Result<String> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(StashError::BranchNameEmpty);
    }

    let ctx = RepoContext::resolve(env::current_dir()?)?;
    let stash_name = qualify(&settings.branch_prefix, identifier);

    delete_branch(&ctx, &stash_name).context(format!("dropping {stash_name}"))?;

    print_success(&format!("Dropped {stash_name}"));
    Ok(stash_name)
}
