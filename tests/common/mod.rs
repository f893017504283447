//! Consolidated test utilities for 8stash
//!
//! This module provides unified testing utilities for integration tests,
//! built around a working repository cloned from a local bare `origin`.

pub mod assertions;
pub mod fixtures;
pub mod repository;
