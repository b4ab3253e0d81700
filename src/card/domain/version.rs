//! Optimistic concurrency version counter.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Per-card mutation counter used for optimistic locking.
///
/// Starts at zero on creation and advances by exactly one on every
/// successful update or transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardVersion(u64);

impl CardVersion {
    /// Version assigned to newly created cards.
    pub const INITIAL: Self = Self(0);

    /// Wraps a raw version value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw version value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the version that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Compares a caller-supplied version against this stored version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionMismatch`] when `provided` differs from `self`.
    pub const fn ensure_matches(self, provided: Self) -> Result<(), VersionMismatch> {
        if self.0 == provided.0 {
            return Ok(());
        }
        Err(VersionMismatch {
            current: self,
            provided,
        })
    }
}

impl fmt::Display for CardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A writer asserted a version that is no longer current.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("version mismatch: expected {current}, got {provided}")]
pub struct VersionMismatch {
    /// Version currently stored.
    pub current: CardVersion,
    /// Stale version supplied by the caller.
    pub provided: CardVersion,
}
