//! Command builders and predefined scenarios
//!
//! Provides the isolated `8stash` invocation used by every integration test and
//! repositories pre-populated with stash branches.

#![allow(dead_code)]

use super::repository::*;
use anyhow::Result;
use assert_cmd::Command;

/// `8stash` running inside the test repository with an isolated HOME and no colors
pub fn stash_cmd(repo: &TestRepo) -> Result<Command> {
    let home = repo.home();
    let mut cmd = Command::cargo_bin("8stash")?;
    cmd.current_dir(repo.path())
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

/// Scenario: two stash branches aged 45 and 2 days
pub fn create_aged_stash_repo() -> Result<TestRepo> {
    let repo = setup_repo_with_origin()?;
    push_stash_branch(&repo, "8stash/45", &[("old.txt", "old work\n")], 45)?;
    push_stash_branch(&repo, "8stash/2", &[("recent.txt", "recent work\n")], 2)?;
    Ok(repo)
}

/// Scenario: a single stash branch holding `wip.txt`
pub fn create_single_stash_repo() -> Result<TestRepo> {
    let repo = setup_repo_with_origin()?;
    push_stash_branch(&repo, "8stash/1", &[("wip.txt", "work in progress")], 0)?;
    Ok(repo)
}
