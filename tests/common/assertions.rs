//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating 8stash command output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate for the command-prefixed error line
pub fn operation_error(operation: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Error during {operation} operation:"))
}

/// Creates a predicate matching the push confirmation and a generated numeric name
pub fn stashed_to_numeric_branch() -> impl Predicate<str> {
    predicates::str::is_match(r"Changes stashed to new branch: 8stash/\d+")
        .expect("valid regex")
}

/// Creates a predicate for an ambiguous pop
pub fn ambiguous_selection() -> impl Predicate<str> {
    predicates::str::contains("stashes and no stash number given")
}
