//! Stash branch inventory built from the remote-tracking references.
//!
//! Records are computed fresh on every call from the commit each branch points at;
//! nothing is cached. Callers are expected to fetch first when they need an up to
//! date view of the remote.

use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::retention::BranchAge;
use chrono::{DateTime, Utc};

/// One stash branch as shown by `list` and filtered by `cleanup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchAgeRecord {
    /// Short branch name including the prefix, e.g. `8stash/1234`
    pub branch_name: String,
    pub age: BranchAge,
    pub author_name: String,
    /// First line of the commit message
    pub commit_message: String,
}

/// Stash branches on `remote` whose names start with `prefix`, sorted by name
pub fn list_stash_branches(
    git_repo: &GitRepo,
    remote: &str,
    prefix: &str,
) -> Result<Vec<BranchAgeRecord>> {
    list_stash_branches_at(git_repo, remote, prefix, Utc::now())
}

/// Same as [`list_stash_branches`] with ages measured at `now`
pub fn list_stash_branches_at(
    git_repo: &GitRepo,
    remote: &str,
    prefix: &str,
    now: DateTime<Utc>,
) -> Result<Vec<BranchAgeRecord>> {
    let mut records = Vec::new();

    for branch in git_repo.remote_branches()? {
        if branch.remote != remote || !branch.name.starts_with(prefix) {
            continue;
        }
        let summary = git_repo.commit_summary(branch.target)?;
        records.push(BranchAgeRecord {
            branch_name: branch.name,
            age: BranchAge::between(summary.authored_at, now),
            author_name: summary.author_name,
            commit_message: summary.summary,
        });
    }

    records.sort_by(|a, b| a.branch_name.cmp(&b.branch_name));
    log::debug!(
        "Found {} stash branches under {remote}/{prefix}",
        records.len()
    );
    Ok(records)
}
