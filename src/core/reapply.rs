//! Reapplying a stash branch onto the current branch.
//!
//! When HEAD is an ancestor of the stash commit the stash tree is materialised with
//! a hard reset and the branch is then mixed-reset back, leaving the stashed changes
//! as uncommitted modifications. Otherwise `git merge --no-commit --no-ff` performs
//! a three-way merge and any conflict output is returned to the caller untouched.
//! In both cases the stash branch is deleted afterwards.

use crate::core::context::RepoContext;
use crate::core::deletion::delete_branch;
use crate::core::error::{Result, ResultExt, StashError};
use crate::core::git::{GitRepo, RemoteBranch};
use crate::core::inventory::BranchAgeRecord;
use git2::{Oid, ResetType};
use std::collections::{HashSet, VecDeque};

/// Identifier meaning "the only stash there is"
pub const SOLE_STASH_SENTINEL: &str = "0";

/// How the stash contents reached the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    FastForward,
    Merge,
}

/// Choose the stash branch to pop.
///
/// `identifier` may be the bare suffix or the full branch name. A missing, empty or
/// `"0"` identifier selects the only stash, and is ambiguous when there are several.
pub fn select_stash(
    records: &[BranchAgeRecord],
    prefix: &str,
    identifier: Option<&str>,
) -> Result<String> {
    if records.is_empty() {
        return Err(StashError::NoStashesFound);
    }

    let identifier = identifier.map(str::trim).filter(|id| !id.is_empty());
    if let Some(id) = identifier {
        let wanted = qualify(prefix, id);
        if records.iter().any(|record| record.branch_name == wanted) {
            return Ok(wanted);
        }
        if id != SOLE_STASH_SENTINEL {
            return Err(StashError::stash_not_found(wanted));
        }
    }

    match records {
        [only] => Ok(only.branch_name.clone()),
        _ => Err(StashError::AmbiguousSelection {
            count: records.len(),
        }),
    }
}

/// Full branch name for a suffix, leaving already prefixed names alone
pub fn qualify(prefix: &str, identifier: &str) -> String {
    if identifier.starts_with(prefix) {
        identifier.to_string()
    } else {
        format!("{prefix}{identifier}")
    }
}

/// Remote-tracking branch to apply for `branch`.
///
/// The exact `refs/remotes/<remote>/<branch>` wins; otherwise the first remote
/// branch with the same name on any other remote. Names are compared whole rather
/// than by `/<branch>` suffix, so `origin/team/8stash/1` is never taken for
/// `8stash/1`; symbolic refs such as `origin/HEAD` are never candidates.
pub fn find_best_candidate(git_repo: &GitRepo, remote: &str, branch: &str) -> Result<RemoteBranch> {
    let candidates: Vec<RemoteBranch> = git_repo
        .remote_branches()?
        .into_iter()
        .filter(|candidate| candidate.name == branch)
        .collect();

    candidates
        .iter()
        .find(|candidate| candidate.remote == remote)
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| StashError::reference_not_found(format!("{remote}/{branch}")))
}

/// Breadth-first walk of the parents of `descendant` looking for `ancestor`
pub fn is_ancestor(git_repo: &GitRepo, ancestor: Oid, descendant: Oid) -> Result<bool> {
    let mut queue = VecDeque::from([descendant]);
    let mut visited = HashSet::new();

    while let Some(current) = queue.pop_front() {
        if current == ancestor {
            return Ok(true);
        }
        if !visited.insert(current) {
            continue;
        }
        for parent in git_repo.parent_ids(current)? {
            if !visited.contains(&parent) {
                queue.push_back(parent);
            }
        }
    }
    Ok(false)
}

/// Bring the contents of `branch` into the working tree, then delete the branch.
///
/// A failed deletion is reported after the changes have been applied; they are
/// kept in the working tree either way.
pub fn apply_and_remove(ctx: &RepoContext, branch: &str) -> Result<ApplyMode> {
    let git_repo = &ctx.git_repo;
    let candidate = find_best_candidate(git_repo, &ctx.remote, branch)?;
    let head = git_repo.head_commit_id()?;

    let mode = if is_ancestor(git_repo, head, candidate.target)? {
        let in_the_way = git_repo.untracked_paths_in_commit(candidate.target)?;
        if !in_the_way.is_empty() {
            return Err(StashError::UntrackedFilesInTheWay { paths: in_the_way });
        }
        fast_forward_apply(ctx, head, candidate.target)
            .context(format!("applying {}", candidate.refname))?;
        ApplyMode::FastForward
    } else {
        merge_apply(git_repo, &candidate)?;
        ApplyMode::Merge
    };
    log::info!("Applied {branch} ({mode:?})");

    delete_branch(ctx, branch).context(format!(
        "changes from {branch} were applied but the branch could not be removed"
    ))?;
    Ok(mode)
}

fn fast_forward_apply(ctx: &RepoContext, head: Oid, target: Oid) -> Result<()> {
    let git_repo = &ctx.git_repo;
    git_repo.set_branch_target(&ctx.branch, target)?;
    git_repo.reset(target, ResetType::Hard)?;
    git_repo.reset(head, ResetType::Mixed)?;
    Ok(())
}

fn merge_apply(git_repo: &GitRepo, candidate: &RemoteBranch) -> Result<()> {
    let short_name = format!("{}/{}", candidate.remote, candidate.name);
    log::info!("Attempting merge with: git merge --no-commit --no-ff {short_name}");

    let output = git_repo.run_git(&["merge", "--no-commit", "--no-ff", &short_name])?;
    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(StashError::merge_conflict(combined.trim_end()));
    }
    Ok(())
}
