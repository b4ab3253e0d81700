//! Error types for card domain validation and lifecycle rules.

use super::{
    CardField, CompletenessViolation, ProtectedFieldsCleared, StatusTransitionViolation,
    VersionMismatch,
};
use thiserror::Error;

/// Errors returned while constructing or mutating domain card values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardDomainError {
    /// The card identifier is not a valid UUID.
    #[error("invalid card identifier '{0}', expected a UUID")]
    InvalidCardId(String),

    /// The card title is empty after trimming.
    #[error("card title must not be empty")]
    EmptyTitle,

    /// A text field exceeds its character limit.
    #[error("{field} must be at most {max} characters, got {length}")]
    FieldTooLong {
        /// Field that exceeded its limit.
        field: CardField,
        /// Character count of the rejected value.
        length: usize,
        /// Maximum permitted character count.
        max: usize,
    },

    /// The status string is not one of the four lifecycle statuses.
    #[error(transparent)]
    InvalidStatus(#[from] ParseCardStatusError),

    /// The requested page number is below one or starts past the largest
    /// addressable offset.
    #[error("page must be a positive integer in range, got {0}")]
    InvalidPage(u64),

    /// The requested page size is outside `1..=max`.
    #[error("page size must be between 1 and {max}, got {requested}")]
    InvalidPageSize {
        /// Requested page size.
        requested: u64,
        /// Largest page size the listing accepts.
        max: u64,
    },

    /// The requested status is not a legal edge from the current status.
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionViolation),

    /// A transition was blocked because required fields are blank.
    #[error(transparent)]
    Incomplete(#[from] CompletenessViolation),

    /// An update attempted to blank required fields of a confirmed card.
    #[error(transparent)]
    ProtectedFieldsCleared(#[from] ProtectedFieldsCleared),

    /// The caller's version does not match the stored version.
    #[error(transparent)]
    VersionMismatch(#[from] VersionMismatch),
}

impl CardDomainError {
    /// Returns `true` for malformed-input errors that precede business rules.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCardId(_)
                | Self::EmptyTitle
                | Self::FieldTooLong { .. }
                | Self::InvalidStatus(_)
                | Self::InvalidPage(_)
                | Self::InvalidPageSize { .. }
        )
    }
}

/// Error returned while parsing card statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown card status: {0}")]
pub struct ParseCardStatusError(pub String);
