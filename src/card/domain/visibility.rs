//! Soft-delete visibility filter.
//!
//! A card whose deletion timestamp is set does not exist from the caller's
//! perspective. Lookups that fail this filter report "not found", exactly
//! as for an identifier that never existed.

use super::Card;

/// Returns `true` when the card has not been soft-deleted.
#[must_use]
pub fn is_visible(card: &Card) -> bool {
    card.deleted_at().is_none()
}

/// Drops a looked-up card if it has been soft-deleted.
#[must_use]
pub fn retain_visible(card: Option<Card>) -> Option<Card> {
    card.filter(is_visible)
}
