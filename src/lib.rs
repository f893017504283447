//! 8stash - stash uncommitted changes on a remote branch and bring them back later.
//!
//! Local changes are committed to a branch under a configurable prefix (`8stash/`
//! by default), pushed to the remote the current branch tracks, and the working
//! tree is returned to a clean state. `pop` reapplies a stash branch by fast-forward
//! or a non-committing merge, `drop` and `cleanup` delete stash branches.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Repository context and git operations
//! - The stash, reapply and deletion engines
//! - Branch inventory and retention filtering
//! - Configuration, error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    ApplyMode,
    BranchAge,
    BranchAgeRecord,
    // Git operations
    GitRepo,
    HashType,
    NamingConfig,
    RepoContext,
    Result,
    RetentionPolicy,
    // Configuration
    Settings,
    // Error handling
    StashError,
};
