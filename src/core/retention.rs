//! Branch age model and the retention filter used by `cleanup`.
//!
//! Ages are kept as a whole number of minutes and rendered on demand, so filtering
//! never has to parse the human readable form back.
//!
//! # Display buckets
//! - at least one whole day: `"<N> days ago"`
//! - at least one whole hour: `"<N>h ago"`
//! - otherwise: `"<N>min ago"`
//!
//! Only day-bucketed ages are ever eligible for cleanup, so a threshold of `0` still
//! keeps anything younger than a day.

use chrono::{DateTime, Utc};
use std::fmt;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchAge {
    minutes: i64,
}

impl BranchAge {
    /// Age of a commit made at `committed` as seen at `now`. Future timestamps count as zero.
    pub fn between(committed: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_minutes((now - committed).num_minutes())
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.max(0),
        }
    }

    pub fn whole_days(&self) -> i64 {
        self.minutes / MINUTES_PER_DAY
    }

    pub fn whole_hours(&self) -> i64 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub fn whole_minutes(&self) -> i64 {
        self.minutes
    }

    /// Day count when the age renders in the day bucket
    pub fn days_bucket(&self) -> Option<u32> {
        match self.whole_days() {
            0 => None,
            days => Some(u32::try_from(days).unwrap_or(u32::MAX)),
        }
    }
}

impl fmt::Display for BranchAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.whole_days();
        if days > 0 {
            return write!(f, "{days} days ago");
        }
        let hours = self.whole_hours();
        if hours > 0 {
            return write!(f, "{hours}h ago");
        }
        write!(f, "{}min ago", self.whole_minutes())
    }
}

/// Whether a branch of the given age is old enough to be cleaned up
pub fn is_expired(age: BranchAge, retention_days: u32) -> bool {
    age.days_bucket().is_some_and(|days| days >= retention_days)
}

/// Keep only the items whose age reaches the retention threshold
pub fn select_expired<T, F>(items: Vec<T>, retention_days: u32, age_of: F) -> Vec<T>
where
    F: Fn(&T) -> BranchAge,
{
    items
        .into_iter()
        .filter(|item| is_expired(age_of(item), retention_days))
        .collect()
}
