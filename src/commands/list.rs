use crate::core::{
    config::Settings, context::RepoContext, error::Result, inventory::list_stash_branches,
    inventory::BranchAgeRecord, print_info, print_section_header, print_stash_rows,
};
use std::env;

/// Print every stash branch on the remote, sorted by name
pub fn execute_list(settings: &Settings) -> Result<Vec<BranchAgeRecord>> {
    let ctx = RepoContext::resolve(env::current_dir()?)?;
    ctx.update_repository()?;

    let records = list_stash_branches(&ctx.git_repo, &ctx.remote, &settings.branch_prefix)?;
    if records.is_empty() {
        print_info("No stashes found.");
        return Ok(records);
    }

    print_section_header(&format!("Stashes on {}:", ctx.remote));
    print_stash_rows(&records);
    Ok(records)
}
