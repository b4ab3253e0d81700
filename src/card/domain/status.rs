//! Card status and the lifecycle state machine.

use super::ParseCardStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle stage of a clarification card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    /// Intent is still ambiguous; required fields may be blank.
    NeedsClarification,
    /// Problem and success criteria have been agreed.
    Confirmed,
    /// Work on the card has started.
    InProgress,
    /// Work is complete. Terminal.
    Done,
}

impl CardStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::NeedsClarification,
        Self::Confirmed,
        Self::InProgress,
        Self::Done,
    ];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsClarification => "NEEDS_CLARIFICATION",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns the statuses reachable from this status in a single step.
    ///
    /// This match is the whole transition table: each status has at most one
    /// forward edge and `Done` has none.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::NeedsClarification => &[Self::Confirmed],
            Self::Confirmed => &[Self::InProgress],
            Self::InProgress => &[Self::Done],
            Self::Done => &[],
        }
    }

    /// Returns `true` when `target` is a legal single-step edge.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns `true` when no transitions leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Returns `true` when cards in this status must be complete.
    #[must_use]
    pub const fn requires_completeness(self) -> bool {
        !matches!(self, Self::NeedsClarification)
    }

    /// Validates a transition from this status to `requested`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionViolation`] for same-state, backward, and
    /// multi-step requests, and for any request out of a terminal status.
    pub fn validate_transition(self, requested: Self) -> Result<(), StatusTransitionViolation> {
        if self.can_transition_to(requested) {
            return Ok(());
        }
        Err(StatusTransitionViolation {
            current: self,
            requested,
            allowed: self.allowed_transitions().to_vec(),
        })
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CardStatus {
    type Error = ParseCardStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseCardStatusError(value.to_owned()))
    }
}

/// Rejected status transition, carrying what the caller may do instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "invalid status transition from {current} to {requested}; allowed from {current}: {}",
    describe_allowed(.allowed)
)]
pub struct StatusTransitionViolation {
    /// Status the card is in.
    pub current: CardStatus,
    /// Status the caller asked for.
    pub requested: CardStatus,
    /// Legal next statuses. Empty for a terminal status.
    pub allowed: Vec<CardStatus>,
}

fn describe_allowed(allowed: &[CardStatus]) -> String {
    if allowed.is_empty() {
        return "none".to_owned();
    }
    allowed
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
