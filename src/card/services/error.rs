//! Service-level errors and their structured caller-facing payloads.

use crate::card::{
    domain::{CardDomainError, CardField, CardId, CardVersion},
    ports::CardRepositoryError,
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Service-level errors for card lifecycle operations.
#[derive(Debug, Error)]
pub enum CardLifecycleError {
    /// No visible card has the identifier.
    #[error("card not found: {0}")]
    NotFound(CardId),

    /// The caller's version is stale.
    #[error("version mismatch on card {card_id}: expected {current}, got {provided}")]
    VersionConflict {
        /// Card the write targeted.
        card_id: CardId,
        /// Version currently stored.
        current: CardVersion,
        /// Version supplied by the caller.
        provided: CardVersion,
    },

    /// Input validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] CardDomainError),

    /// The export template failed to render.
    #[error("failed to render export for card {card_id}: {reason}")]
    ExportRender {
        /// Card being exported.
        card_id: CardId,
        /// Renderer message.
        reason: String,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(CardRepositoryError),
}

/// Result type for card lifecycle service operations.
pub type CardLifecycleResult<T> = Result<T, CardLifecycleError>;

impl From<CardRepositoryError> for CardLifecycleError {
    fn from(err: CardRepositoryError) -> Self {
        match err {
            CardRepositoryError::NotFound(card_id) => Self::NotFound(card_id),
            CardRepositoryError::VersionConflict {
                id,
                current,
                provided,
            } => Self::VersionConflict {
                card_id: id,
                current,
                provided,
            },
            other => Self::Repository(other),
        }
    }
}

impl CardLifecycleError {
    /// Attributes a domain error to `card_id`, lifting version mismatches
    /// into [`CardLifecycleError::VersionConflict`].
    #[must_use]
    pub fn for_card(card_id: CardId, err: CardDomainError) -> Self {
        match err {
            CardDomainError::VersionMismatch(mismatch) => Self::VersionConflict {
                card_id,
                current: mismatch.current,
                provided: mismatch.provided,
            },
            other => Self::Domain(other),
        }
    }

    /// Classifies the error into one of the caller-facing kinds.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::VersionConflict { .. } | Self::Domain(CardDomainError::VersionMismatch(_)) => {
                ErrorKind::VersionConflict
            }
            Self::Domain(CardDomainError::InvalidTransition(_)) => {
                ErrorKind::StateMachineViolation
            }
            Self::Domain(
                CardDomainError::Incomplete(_) | CardDomainError::ProtectedFieldsCleared(_),
            ) => ErrorKind::IncompletenessViolation,
            Self::Domain(_) => ErrorKind::Validation,
            Self::ExportRender { .. } | Self::Repository(_) => ErrorKind::Internal,
        }
    }

    /// Builds the structured payload a transport sends for this error.
    #[must_use]
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.kind().code(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::NotFound(_) | Self::ExportRender { .. } | Self::Repository(_) => None,
            Self::VersionConflict {
                current, provided, ..
            } => Some(json!({
                "currentVersion": current.value(),
                "providedVersion": provided.value(),
            })),
            Self::Domain(err) => domain_details(err),
        }
    }
}

fn domain_details(err: &CardDomainError) -> Option<Value> {
    let details = match err {
        CardDomainError::InvalidTransition(violation) => json!({
            "currentStatus": violation.current,
            "requestedStatus": violation.requested,
            "allowedTransitions": violation.allowed,
        }),
        CardDomainError::Incomplete(violation) => json!({
            "missingFields": violation.missing_fields,
            "message": "Problem and success criteria must be filled in before this transition",
        }),
        CardDomainError::ProtectedFieldsCleared(violation) => json!({
            "fields": violation.fields,
            "message": "Core fields cannot be cleared once a card is confirmed",
        }),
        CardDomainError::VersionMismatch(mismatch) => json!({
            "currentVersion": mismatch.current.value(),
            "providedVersion": mismatch.provided.value(),
        }),
        CardDomainError::InvalidCardId(_) => validation_details(Some("id"), err),
        CardDomainError::EmptyTitle => validation_details(Some(CardField::Title.as_str()), err),
        CardDomainError::FieldTooLong { field, .. } => validation_details(Some(field.as_str()), err),
        CardDomainError::InvalidStatus(_) => validation_details(Some("status"), err),
        CardDomainError::InvalidPage(_) => validation_details(Some("page"), err),
        CardDomainError::InvalidPageSize { .. } => validation_details(Some("pageSize"), err),
    };
    Some(details)
}

fn validation_details(field: Option<&str>, err: &CardDomainError) -> Value {
    json!({
        "field": field,
        "reason": err.to_string(),
    })
}

/// Caller-facing error category, independent of any transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The identifier does not resolve to a visible card.
    NotFound,
    /// Malformed input.
    Validation,
    /// Illegal status transition.
    StateMachineViolation,
    /// Blocked by the completeness contract.
    IncompletenessViolation,
    /// Stale version.
    VersionConflict,
    /// Infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the wire error code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::StateMachineViolation | Self::IncompletenessViolation | Self::VersionConflict => {
                "CONFLICT"
            }
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Returns the conventional HTTP status for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Validation => 400,
            Self::StateMachineViolation | Self::IncompletenessViolation | Self::VersionConflict => {
                409
            }
            Self::Internal => 500,
        }
    }

    /// Returns `true` for the three conflict kinds.
    #[must_use]
    pub const fn is_conflict(self) -> bool {
        matches!(
            self,
            Self::StateMachineViolation | Self::IncompletenessViolation | Self::VersionConflict
        )
    }
}

/// Structured error body: `{ code, message, details }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Wire error code such as `CONFLICT`.
    pub code: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// Kind-specific detail needed to construct a retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
