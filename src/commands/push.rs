use crate::core::{
    config::Settings,
    context::RepoContext,
    error::{Result, ResultExt},
    naming::generate_stash_name,
    print_info, print_success,
    stash::stash_changes,
};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Stashed(String),
    NothingToStash,
}

/// Move all local changes onto a freshly named stash branch on the remote
pub fn execute_push(settings: &Settings, message: Option<String>) -> Result<PushOutcome> {
    let ctx = RepoContext::resolve(env::current_dir()?)?;
    ctx.update_repository()?;

    if !ctx.git_repo.has_changes()? {
        print_info("No local changes to stash.");
        return Ok(PushOutcome::NothingToStash);
    }

    let stash_name = generate_stash_name(&settings.branch_prefix, &settings.naming)?;
    log::debug!("Generated stash name {stash_name}");

    stash_changes(&ctx, &stash_name, message.as_deref())
        .context(format!("stashing changes to {stash_name}"))?;

    print_success(&format!("Changes stashed to new branch: {stash_name}"));
    Ok(PushOutcome::Stashed(stash_name))
}
