use crate::core::{
    config::Settings,
    context::RepoContext,
    deletion::delete_branch,
    error::{Result, StashError},
    inventory::list_stash_branches,
    print_error, print_info, print_section_header, print_stash_rows, print_success,
    retention::select_expired,
};
use colored::*;
use std::env;
use std::io::{self, BufRead, Write};

/// Delete every stash branch at least `retention.cleanup_days` old.
///
/// Deletion continues past individual failures; the branches that could not be
/// removed are reported together at the end. Returns the names that were dropped.
pub fn execute_cleanup(settings: &Settings) -> Result<Vec<String>> {
    let ctx = RepoContext::resolve(env::current_dir()?)?;
    ctx.update_repository()?;

    let days = settings.retention.cleanup_days;
    let records = list_stash_branches(&ctx.git_repo, &ctx.remote, &settings.branch_prefix)?;
    let expired = select_expired(records, days, |record| record.age);

    if expired.is_empty() {
        print_info(&format!("No stashes older than {days} days."));
        return Ok(Vec::new());
    }

    print_section_header(&format!("Stashes older than {days} days:"));
    print_stash_rows(&expired);

    if !settings.retention.skip_confirmation && !confirm(&mut io::stdin().lock())? {
        print_info("Cleanup aborted.");
        return Ok(Vec::new());
    }

    let mut dropped = Vec::new();
    let mut failed = Vec::new();
    for record in expired {
        match delete_branch(&ctx, &record.branch_name) {
            Ok(()) => {
                print_success(&format!("Dropped {}", record.branch_name));
                dropped.push(record.branch_name);
            }
            Err(e) => {
                print_error("cleanup", &e.to_string());
                failed.push(record.branch_name);
            }
        }
    }

    if !failed.is_empty() {
        return Err(StashError::CleanupIncomplete { failed });
    }

    print_success("Cleanup completed successfully.");
    Ok(dropped)
}

fn confirm<R: BufRead>(input: &mut R) -> Result<bool> {
    print!("{} ", "Would you like to continue? [y/N]:".blue());
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
