//! Completeness contract for cards past the clarification stage.

use super::{CardField, CardStatus, CardText, CardUpdate};
use thiserror::Error;

/// A card lacks the fields required to leave or stay past clarification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("card is incomplete; missing required fields: {}", join_fields(.missing_fields))]
pub struct CompletenessViolation {
    /// Required fields that are blank, in declaration order.
    pub missing_fields: Vec<CardField>,
}

/// An update tried to blank required fields on a confirmed card.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "cannot clear required fields ({}) for card in status {status}",
    join_fields(.fields)
)]
pub struct ProtectedFieldsCleared {
    /// Status of the card the update targeted.
    pub status: CardStatus,
    /// Previously populated fields the update would blank.
    pub fields: Vec<CardField>,
}

/// Checks that `problem` and `success_criteria` are both non-blank.
pub(super) fn check_completeness(
    problem: &CardText,
    success_criteria: &CardText,
) -> Result<(), CompletenessViolation> {
    let missing_fields: Vec<CardField> = [
        (CardField::Problem, problem),
        (CardField::SuccessCriteria, success_criteria),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_blank())
    .map(|(field, _)| field)
    .collect();

    if missing_fields.is_empty() {
        return Ok(());
    }
    Err(CompletenessViolation { missing_fields })
}

/// Rejects updates that would blank a populated required field.
///
/// Cards still in clarification are exempt, and fields absent from the
/// update never trigger the check.
pub(super) fn check_protected_fields(
    status: CardStatus,
    problem: &CardText,
    success_criteria: &CardText,
    update: &CardUpdate,
) -> Result<(), ProtectedFieldsCleared> {
    if !status.requires_completeness() {
        return Ok(());
    }

    let fields: Vec<CardField> = [
        (CardField::Problem, problem, update.problem().clears_text()),
        (
            CardField::SuccessCriteria,
            success_criteria,
            update.success_criteria().clears_text(),
        ),
    ]
    .into_iter()
    .filter(|(_, stored, clears)| *clears && !stored.is_blank())
    .map(|(field, _, _)| field)
    .collect();

    if fields.is_empty() {
        return Ok(());
    }
    Err(ProtectedFieldsCleared { status, fields })
}

fn join_fields(fields: &[CardField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
