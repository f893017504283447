//! Stash branch name generation.
//!
//! Names are `<prefix><suffix>` where the suffix is a random number below the
//! configured range or a random v4 UUID. Uniqueness is not guaranteed; a collision
//! shows up later as an existing-branch error when the stash is created.

use crate::core::config::{HashType, NamingConfig};
use crate::core::error::{Result, StashError};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

pub fn generate_stash_name(prefix: &str, naming: &NamingConfig) -> Result<String> {
    let suffix = match naming.hash_type {
        HashType::Uuid => uuid_suffix()?,
        HashType::Numeric => numeric_suffix(naming.numeric_range),
    };
    Ok(format!("{prefix}{suffix}"))
}

fn numeric_suffix(range: u32) -> String {
    rand::thread_rng().gen_range(0..range.max(1)).to_string()
}

fn uuid_suffix() -> Result<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StashError::NameGeneration {
            message: format!("failed to generate UUID: {e}"),
        })?;
    Ok(uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string())
}
