//! Git repository operations used by the stash lifecycle.
//!
//! This module provides [`GitRepo`], a thin wrapper over `git2` exposing exactly the
//! primitives the stash engines need: repository discovery, branch and reference
//! handling, staging and committing, fetch/push with opportunistic SSH-agent
//! credentials, resets, and a `git` CLI escape hatch for operations libgit2 does not
//! offer in porcelain form (non-committing merges).
//!
//! # Public API
//! - [`GitRepo`]: Main interface for git repository operations
//! - [`RemoteBranch`]: A remote-tracking branch and the commit it points at
//! - [`CommitSummary`]: Author, timestamp and subject of a commit

use crate::core::error::{Result, StashError};
use chrono::{DateTime, Utc};
use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Cred, CredentialType, Direction, ErrorCode, FetchOptions, FetchPrune, ObjectType,
    Oid, PushOptions, ReferenceType, RemoteCallbacks, Repository, ResetType, Signature,
    StatusOptions, TreeWalkMode, TreeWalkResult,
};
use std::path::Path;
use std::process::{Command, Output};

pub const DEFAULT_REMOTE: &str = "origin";
pub const FALLBACK_AUTHOR_NAME: &str = "8stash";
pub const FALLBACK_AUTHOR_EMAIL: &str = "noreply@local";

/// A remote-tracking branch, e.g. `refs/remotes/origin/8stash/12`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    /// Branch name without the remote, e.g. `8stash/12`
    pub name: String,
    pub refname: String,
    pub target: Oid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    pub summary: String,
}

pub struct GitRepo {
    repo: Repository,
}

/// Credential callbacks that try the SSH agent once and never prompt
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;
    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > 1 {
            return Err(git2::Error::from_str("no usable credentials available"));
        }
        if allowed_types.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else {
            Cred::default()
        }
    });
    callbacks
}

impl GitRepo {
    /// Open the repository containing `path`, searching upwards for its root
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            log::debug!("Repository discovery failed: {e}");
            StashError::NotARepository
        })?;
        Ok(GitRepo { repo })
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| StashError::git_command("repository has no working directory"))
    }

    /// Short name of the checked out branch; fails on a detached HEAD
    pub fn current_branch(&self) -> Result<String> {
        if self.repo.head_detached()? {
            return Err(StashError::DetachedHead);
        }
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(StashError::DetachedHead);
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or(StashError::InvalidUtf8Path)
    }

    /// The branch's configured remote, or `origin` when unset or unreadable
    pub fn tracking_remote(&self, branch: &str) -> String {
        self.repo
            .config()
            .and_then(|config| config.get_string(&format!("branch.{branch}.remote")))
            .ok()
            .filter(|remote| !remote.trim().is_empty() && remote != ".")
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string())
    }

    pub fn head_commit_id(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// True when anything but ignored files differs from HEAD, untracked files included
    pub fn has_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        Ok(!self.repo.statuses(Some(&mut opts))?.is_empty())
    }

    /// True when tracked files have staged or unstaged modifications
    pub fn has_tracked_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        Ok(!self.repo.statuses(Some(&mut opts))?.is_empty())
    }

    pub fn fetch(&self, remote_name: &str) -> Result<()> {
        log::debug!("Fetching from {remote_name}");
        let mut remote = self.repo.find_remote(remote_name)?;
        let mut options = FetchOptions::new();
        options.remote_callbacks(remote_callbacks());
        options.prune(FetchPrune::On);
        remote.fetch::<&str>(&[], Some(&mut options), None)?;
        Ok(())
    }

    /// Fetch `remote` and fast-forward `branch` to its remote-tracking counterpart.
    ///
    /// Up to date, locally ahead, or never pushed are all successes. A branch that
    /// diverged from its remote fails with [`StashError::NonFastForward`].
    pub fn pull_fast_forward(&self, remote: &str, branch: &str) -> Result<()> {
        self.fetch(remote)?;

        let tracking = format!("refs/remotes/{remote}/{branch}");
        let upstream = match self.repo.find_reference(&tracking) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => {
                log::debug!("{tracking} does not exist, nothing to pull");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let incoming = self.repo.reference_to_annotated_commit(&upstream)?;
        let (analysis, _) = self.repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            log::debug!("{branch} is up to date with {remote}/{branch}");
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(StashError::non_fast_forward(remote, branch));
        }

        let target = incoming.id();
        log::info!("Fast-forwarding {branch} to {remote}/{branch} ({target})");
        let object = self.repo.find_object(target, None)?;
        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;
        self.set_branch_target(branch, target)?;
        Ok(())
    }

    /// Create `name` at HEAD and switch to it without touching the working tree
    pub fn create_and_switch_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false).map_err(|e| {
            if e.code() == ErrorCode::Exists {
                StashError::branch_already_exists(name)
            } else {
                e.into()
            }
        })?;
        self.repo.set_head(&format!("refs/heads/{name}"))?;
        Ok(())
    }

    /// Stage every changed path: present files are added, missing ones removed
    pub fn stage_all(&self) -> Result<usize> {
        let workdir = self.workdir()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut index = self.repo.index()?;
        let mut staged = 0;

        for entry in statuses.iter() {
            let path = Path::new(entry.path().ok_or(StashError::InvalidUtf8Path)?);
            if workdir.join(path).symlink_metadata().is_ok() {
                index.add_path(path)?;
            } else {
                index.remove_path(path)?;
            }
            staged += 1;
        }

        index.write()?;
        log::debug!("Staged {staged} paths");
        Ok(staged)
    }

    /// Author identity from `user.name`/`user.email`, each falling back to a placeholder
    pub fn signature(&self) -> Result<Signature<'static>> {
        let config = self.repo.config()?;
        let read = |key: &str, fallback: &str| {
            config
                .get_string(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let name = read("user.name", FALLBACK_AUTHOR_NAME);
        let email = read("user.email", FALLBACK_AUTHOR_EMAIL);
        Ok(Signature::now(&name, &email)?)
    }

    /// Commit the current index on top of HEAD
    pub fn commit_index(&self, message: &str) -> Result<Oid> {
        let signature = self.signature()?;
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(oid)
    }

    /// Push a single refspec, turning per-reference rejections into errors
    pub fn push(&self, remote_name: &str, refspec: &str) -> Result<()> {
        log::debug!("Pushing {refspec} to {remote_name}");
        let mut remote = self.repo.find_remote(remote_name)?;
        let mut rejection: Option<String> = None;
        {
            let mut callbacks = remote_callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejection = Some(format!("{refname}: {message}"));
                }
                Ok(())
            });
            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote.push(&[refspec], Some(&mut options))?;
        }

        match rejection {
            Some(reason) => Err(StashError::PushRejected {
                remote: remote_name.to_string(),
                refspec: refspec.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Whether the remote currently advertises `refs/heads/<branch>`
    pub fn remote_has_branch(&self, remote_name: &str, branch: &str) -> Result<bool> {
        let wanted = format!("refs/heads/{branch}");
        let mut remote = self.repo.find_remote(remote_name)?;
        let connection = remote.connect_auth(Direction::Fetch, Some(remote_callbacks()), None)?;
        let found = connection.list()?.iter().any(|head| head.name() == wanted);
        Ok(found)
    }

    /// Switch to `name`, overwriting the working tree and index with its contents
    pub fn force_checkout_branch(&self, name: &str) -> Result<()> {
        let refname = format!("refs/heads/{name}");
        let object = self.repo.revparse_single(&refname)?;
        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().force()))?;
        self.repo.set_head(&refname)?;
        Ok(())
    }

    pub fn set_branch_target(&self, branch: &str, target: Oid) -> Result<()> {
        self.repo.reference(
            &format!("refs/heads/{branch}"),
            target,
            true,
            &format!("8stash: move {branch} to {target}"),
        )?;
        Ok(())
    }

    pub fn reset(&self, target: Oid, kind: ResetType) -> Result<()> {
        let object = self.repo.find_object(target, None)?;
        self.repo.reset(&object, kind, None)?;
        Ok(())
    }

    /// Delete a reference by full name; returns false when it did not exist
    pub fn delete_reference(&self, refname: &str) -> Result<bool> {
        match self.repo.find_reference(refname) {
            Ok(mut reference) => {
                reference.delete()?;
                Ok(true)
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Direct (non-symbolic) remote-tracking branches, across all remotes
    pub fn remote_branches(&self) -> Result<Vec<RemoteBranch>> {
        let remote_names: Vec<String> = self
            .repo
            .remotes()?
            .iter()
            .flatten()
            .map(str::to_string)
            .collect();

        let mut branches = Vec::new();
        for reference in self.repo.references()? {
            let reference = reference?;
            if reference.kind() != Some(ReferenceType::Direct) {
                continue;
            }
            let (Some(refname), Some(target)) = (reference.name(), reference.target()) else {
                continue;
            };
            let Some(short) = refname.strip_prefix("refs/remotes/") else {
                continue;
            };
            let Some((remote, name)) = split_remote_branch(short, &remote_names) else {
                continue;
            };
            branches.push(RemoteBranch {
                remote: remote.to_string(),
                name: name.to_string(),
                refname: refname.to_string(),
                target,
            });
        }
        Ok(branches)
    }

    pub fn commit_summary(&self, oid: Oid) -> Result<CommitSummary> {
        let commit = self.repo.find_commit(oid)?;
        let author = commit.author();
        let authored_at =
            DateTime::<Utc>::from_timestamp(author.when().seconds(), 0).unwrap_or_else(Utc::now);
        Ok(CommitSummary {
            author_name: author.name().unwrap_or("").to_string(),
            authored_at,
            summary: commit.summary().unwrap_or("").to_string(),
        })
    }

    /// Files of the commit's tree that exist in the working directory but not in the index
    pub fn untracked_paths_in_commit(&self, oid: Oid) -> Result<Vec<String>> {
        let workdir = self.workdir()?;
        let mut index = self.repo.index()?;
        index.read(false)?;
        let tree = self.repo.find_commit(oid)?.tree()?;

        let mut in_the_way = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                return TreeWalkResult::Ok;
            };
            let path = format!("{root}{name}");
            if index.get_path(Path::new(&path), 0).is_none()
                && workdir.join(&path).symlink_metadata().is_ok()
            {
                in_the_way.push(path);
            }
            TreeWalkResult::Ok
        })?;
        Ok(in_the_way)
    }

    pub fn parent_ids(&self, oid: Oid) -> Result<Vec<Oid>> {
        Ok(self.repo.find_commit(oid)?.parent_ids().collect())
    }

    /// Run a `git` subcommand in the working directory and return its raw output
    pub fn run_git(&self, args: &[&str]) -> Result<Output> {
        let workdir = self.workdir()?;
        log::debug!("Running git {}", args.join(" "));
        Ok(Command::new("git").args(args).current_dir(workdir).output()?)
    }
}

/// Split `origin/8stash/1` into (`origin`, `8stash/1`), preferring the longest known
/// remote name so remotes containing `/` are handled.
fn split_remote_branch<'a>(short: &'a str, remotes: &[String]) -> Option<(&'a str, &'a str)> {
    remotes
        .iter()
        .filter(|remote| {
            short.len() > remote.len()
                && short.starts_with(remote.as_str())
                && short.as_bytes()[remote.len()] == b'/'
        })
        .max_by_key(|remote| remote.len())
        .map(|remote| (&short[..remote.len()], &short[remote.len() + 1..]))
        .or_else(|| short.split_once('/'))
}
