//! Immutable runtime settings and the optional YAML config file.
//!
//! Settings are built once at startup and passed by reference into every command.
//! The only way to change them afterwards is through the `with_*` methods, which
//! return an updated copy (used by per-invocation CLI overrides).
//!
//! # Config file
//! `.8stash.yaml` at the repository root, falling back to `<config dir>/8stash/config.yaml`:
//!
//! ```yaml
//! branch_prefix: wip
//! retention_days: 14
//! skip_confirmation: false
//! naming:
//!   hash_type: numeric        # or uuid
//!   hash_numeric_max_value: 5000
//! ```

use crate::core::dirs::get_user_config_file;
use crate::core::error::{Result, StashError};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".8stash.yaml";
pub const DEFAULT_BRANCH_PREFIX: &str = "8stash/";
pub const DEFAULT_RETENTION_DAYS: u32 = 30;
pub const DEFAULT_HASH_RANGE: u32 = 9999;
pub const MIN_NUMERIC_RANGE: i64 = 1;
pub const MAX_NUMERIC_RANGE: i64 = i32::MAX as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashType {
    #[default]
    Numeric,
    Uuid,
}

impl HashType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Numeric => "numeric",
            HashType::Uuid => "uuid",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "numeric" => Some(HashType::Numeric),
            "uuid" => Some(HashType::Uuid),
            _ => None,
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How stash suffixes are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    pub hash_type: HashType,
    /// Exclusive upper bound for numeric suffixes
    pub numeric_range: u32,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            hash_type: HashType::Numeric,
            numeric_range: DEFAULT_HASH_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub cleanup_days: u32,
    pub skip_confirmation: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            cleanup_days: DEFAULT_RETENTION_DAYS,
            skip_confirmation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Always ends with `/`
    pub branch_prefix: String,
    pub retention: RetentionPolicy,
    pub naming: NamingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            retention: RetentionPolicy::default(),
            naming: NamingConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings for a working directory.
    ///
    /// Looks for [`CONFIG_FILE_NAME`] at the repository root containing `start_dir`
    /// (or in `start_dir` itself outside a repository), then for the user-level file.
    /// Missing files yield the defaults.
    pub fn load(start_dir: &Path) -> Result<Self> {
        let repo_file = repository_root(start_dir)
            .unwrap_or_else(|| start_dir.to_path_buf())
            .join(CONFIG_FILE_NAME);

        if repo_file.is_file() {
            return Self::from_file(&repo_file);
        }

        match get_user_config_file() {
            Some(user_file) if user_file.is_file() => Self::from_file(&user_file),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            StashError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(content)
            .map_err(|e| StashError::invalid_config(format!("parsing config: {e}")))?;
        raw.into_settings()
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention.cleanup_days = days;
        self
    }

    pub fn with_skip_confirmation(mut self, skip: bool) -> Self {
        self.retention.skip_confirmation = skip;
        self
    }
}

fn repository_root(start_dir: &Path) -> Option<PathBuf> {
    git2::Repository::discover(start_dir)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
}

/// Normalize a user supplied prefix: trimmed, no surrounding slashes, one trailing `/`
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{trimmed}/"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    branch_prefix: Option<String>,
    #[serde(default)]
    retention_days: Option<i64>,
    #[serde(default)]
    skip_confirmation: Option<bool>,
    #[serde(default)]
    naming: RawNaming,
}

#[derive(Debug, Default, Deserialize)]
struct RawNaming {
    #[serde(default)]
    hash_type: Option<String>,
    /// A maximum value, not a digit count
    #[serde(default)]
    hash_numeric_max_value: Option<i64>,
}

impl RawConfig {
    fn into_settings(self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(prefix) = self.branch_prefix.as_deref().and_then(normalize_prefix) {
            settings.branch_prefix = prefix;
        }

        if let Some(days) = self.retention_days {
            settings.retention.cleanup_days = u32::try_from(days).map_err(|_| {
                StashError::invalid_config(format!("retention_days must be >= 0 (got {days})"))
            })?;
        }

        if let Some(skip) = self.skip_confirmation {
            settings.retention.skip_confirmation = skip;
        }

        settings.naming = self.naming.into_naming();
        Ok(settings)
    }
}

impl RawNaming {
    fn into_naming(self) -> NamingConfig {
        let hash_type = match self.hash_type.as_deref() {
            None => HashType::Numeric,
            Some(value) => HashType::parse(value).unwrap_or_else(|| {
                log::warn!(
                    "hash_type has to be either numeric or uuid (got {value:?}), using numeric"
                );
                HashType::Numeric
            }),
        };

        if hash_type == HashType::Uuid {
            return NamingConfig {
                hash_type,
                numeric_range: DEFAULT_HASH_RANGE,
            };
        }

        let numeric_range = match self.hash_numeric_max_value {
            Some(range) if range > MAX_NUMERIC_RANGE => {
                log::warn!(
                    "hash_numeric_max_value {range} is too big, using {MAX_NUMERIC_RANGE}; consider hash_type uuid"
                );
                MAX_NUMERIC_RANGE as u32
            }
            Some(range) if range > MIN_NUMERIC_RANGE => range as u32,
            _ => DEFAULT_HASH_RANGE,
        };

        NamingConfig {
            hash_type,
            numeric_range,
        }
    }
}
