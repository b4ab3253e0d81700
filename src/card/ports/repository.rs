//! Repository port for card persistence, lookup, and conditional writes.

use crate::card::domain::{Card, CardId, CardListQuery, CardPage, CardVersion};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for card repository operations.
pub type CardRepositoryResult<T> = Result<T, CardRepositoryError>;

/// Card persistence contract.
///
/// Every method except [`CardRepository::find_including_deleted`] treats
/// soft-deleted cards as absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Stores a newly created card.
    ///
    /// # Errors
    ///
    /// Returns [`CardRepositoryError::DuplicateCard`] when the identifier
    /// already exists.
    async fn insert(&self, card: &Card) -> CardRepositoryResult<()>;

    /// Finds a visible card by identifier.
    ///
    /// Returns `None` when the card does not exist or has been soft-deleted.
    async fn find_visible(&self, id: CardId) -> CardRepositoryResult<Option<Card>>;

    /// Finds a card by identifier regardless of soft deletion.
    ///
    /// Administrative bypass of the visibility filter.
    async fn find_including_deleted(&self, id: CardId) -> CardRepositoryResult<Option<Card>>;

    /// Lists visible cards matching `query`, newest-created first.
    async fn list_visible(&self, query: &CardListQuery) -> CardRepositoryResult<CardPage>;

    /// Replaces a visible card only if its stored version still equals
    /// `expected`.
    ///
    /// The comparison and the write happen as one atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`CardRepositoryError::NotFound`] when no visible card has the
    /// identifier and [`CardRepositoryError::VersionConflict`] when another
    /// writer advanced the version first.
    async fn replace_if_version(
        &self,
        card: &Card,
        expected: CardVersion,
    ) -> CardRepositoryResult<()>;

    /// Persists the deletion timestamp of a card that is still visible.
    ///
    /// # Errors
    ///
    /// Returns [`CardRepositoryError::NotFound`] when no visible card has the
    /// identifier.
    async fn soft_delete(&self, card: &Card) -> CardRepositoryResult<()>;
}

/// Errors returned by card repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CardRepositoryError {
    /// A card with the same identifier already exists.
    #[error("duplicate card identifier: {0}")]
    DuplicateCard(CardId),

    /// No visible card has the identifier.
    #[error("card not found: {0}")]
    NotFound(CardId),

    /// The stored version moved on before the conditional write.
    #[error("version conflict on card {id}: expected {current}, got {provided}")]
    VersionConflict {
        /// Card whose write lost the race.
        id: CardId,
        /// Version currently stored.
        current: CardVersion,
        /// Version the writer asserted.
        provided: CardVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// A card handed to [`CardRepository::soft_delete`] was never marked deleted.
#[derive(Debug, Error)]
#[error("card {0} has no deletion timestamp")]
pub struct MissingDeletionTimestamp(pub CardId);
