//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`StashError`] which covers every failure mode of the stash
//! lifecycle: repository preconditions, branch validation, reapplication and deletion.
//! It uses `thiserror` for ergonomic error definitions and includes constructors for
//! the variants that carry data.
//!
//! # Public API
//! - [`StashError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, StashError>`
//! - [`ResultExt`]: Attach step context to a failing result
//!
//! # Error Categories
//! - **Repository preconditions**: not a repository, detached HEAD, diverged branch
//! - **Branch validation**: empty name, existing branch, current branch protection
//! - **Stash selection**: no stashes, ambiguous selection, unknown identifier
//! - **Git operations**: merge conflicts, push rejections, git2 and git CLI failures
//! - **Configuration**: malformed YAML, out-of-range values

use thiserror::Error;

/// Domain-specific error types for 8stash
#[derive(Error, Debug)]
pub enum StashError {
    // Repository preconditions
    #[error("Not in a git repository")]
    NotARepository,

    #[error("HEAD is detached: cannot operate on current branch")]
    DetachedHead,

    #[error("non fast-forward: local branch diverged from {remote}/{branch}")]
    NonFastForward { remote: String, branch: String },

    #[error("Local changes to tracked files would be overwritten. Commit or push them first")]
    DirtyWorkingTree,

    #[error("untracked files would be overwritten by the stash: {}", .paths.join(", "))]
    UntrackedFilesInTheWay { paths: Vec<String> },

    // Branch validation
    #[error("branch name must not be empty")]
    BranchNameEmpty,

    #[error("branch \"{name}\" already exists")]
    BranchAlreadyExists { name: String },

    #[error("target branch equals current branch \"{name}\"")]
    TargetEqualsCurrent { name: String },

    #[error("cannot delete current branch \"{name}\". Please switch to another branch first")]
    CannotDeleteCurrentBranch { name: String },

    // Stash selection
    #[error("no stashes found")]
    NoStashesFound,

    #[error("found {count} stashes and no stash number given")]
    AmbiguousSelection { count: usize },

    #[error("no stash named \"{name}\" found")]
    StashNotFound { name: String },

    #[error("reference not found: {name}")]
    ReferenceNotFound { name: String },

    // Git operations
    #[error("automatic merge failed; fix conflicts and then commit the result:\n{output}")]
    MergeConflict { output: String },

    #[error("push of {refspec} to {remote} was rejected: {reason}")]
    PushRejected {
        remote: String,
        refspec: String,
        reason: String,
    },

    #[error("failed to delete branch \"{branch}\": {reason}")]
    DeletionFailed { branch: String, reason: String },

    #[error("cleanup could not drop {}: {}", .failed.len(), .failed.join(", "))]
    CleanupIncomplete { failed: Vec<String> },

    #[error("git command failed: {message}")]
    GitCommand { message: String },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    // Naming
    #[error("failed to generate stash name: {message}")]
    NameGeneration { message: String },

    // Configuration
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Context wrapping
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<StashError>,
    },
}

/// Convenience type alias for Results using StashError
pub type Result<T> = std::result::Result<T, StashError>;

impl StashError {
    /// Wrap this error with a description of the step that failed
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every context layer removed
    pub fn root(&self) -> &StashError {
        let mut current = self;
        while let StashError::Context { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    pub fn non_fast_forward(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self::NonFastForward {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    pub fn branch_already_exists(name: impl Into<String>) -> Self {
        Self::BranchAlreadyExists { name: name.into() }
    }

    pub fn target_equals_current(name: impl Into<String>) -> Self {
        Self::TargetEqualsCurrent { name: name.into() }
    }

    pub fn cannot_delete_current(name: impl Into<String>) -> Self {
        Self::CannotDeleteCurrentBranch { name: name.into() }
    }

    pub fn stash_not_found(name: impl Into<String>) -> Self {
        Self::StashNotFound { name: name.into() }
    }

    pub fn reference_not_found(name: impl Into<String>) -> Self {
        Self::ReferenceNotFound { name: name.into() }
    }

    pub fn merge_conflict(output: impl Into<String>) -> Self {
        Self::MergeConflict {
            output: output.into(),
        }
    }

    pub fn deletion_failed(branch: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeletionFailed {
            branch: branch.into(),
            reason: reason.into(),
        }
    }

    pub fn git_command(message: impl Into<String>) -> Self {
        Self::GitCommand {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Attach step context to the error side of a [`Result`]
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<StashError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let error: StashError = e.into();
            error.context(context)
        })
    }
}
