//! Core functionality for 8stash.
//!
//! This module provides the stash branch lifecycle engine: repository context,
//! name generation, the push transaction, reapplication, deletion, the branch
//! inventory and the retention filter, plus configuration, errors and output.

pub mod config;
pub mod context;
pub mod deletion;
pub mod dirs;
pub mod error;
pub mod git;
pub mod inventory;
pub mod naming;
pub mod output;
pub mod reapply;
pub mod retention;
pub mod stash;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{Result, ResultExt, StashError};

// === Configuration ===
// Immutable settings loaded once at startup
pub use config::{HashType, NamingConfig, RetentionPolicy, Settings};

// === Git operations ===
// Repository interface and per-invocation context
pub use context::RepoContext;
pub use git::GitRepo;

// === Stash lifecycle ===
pub use inventory::BranchAgeRecord;
pub use reapply::ApplyMode;
pub use retention::BranchAge;

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_error, print_info, print_section_header, print_stash_rows, print_success,
    print_warning,
};
