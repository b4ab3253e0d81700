//! In-memory repository for card lifecycle tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::card::{
    domain::{Card, CardId, CardListQuery, CardPage, CardVersion, Pagination, is_visible},
    ports::{
        CardRepository, CardRepositoryError, CardRepositoryResult,
        repository::MissingDeletionTimestamp,
    },
};

/// Thread-safe in-memory card repository.
///
/// Conditional writes hold the write lock across compare and replace, which
/// makes them atomic with respect to other writers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardRepository {
    state: Arc<RwLock<InMemoryCardState>>,
}

#[derive(Debug, Default)]
struct InMemoryCardState {
    cards: HashMap<CardId, Card>,
}

impl InMemoryCardState {
    fn visible(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id).filter(|card| is_visible(card))
    }
}

impl InMemoryCardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CardRepositoryResult<RwLockReadGuard<'_, InMemoryCardState>> {
        self.state.read().map_err(|err| {
            CardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> CardRepositoryResult<RwLockWriteGuard<'_, InMemoryCardState>> {
        self.state.write().map_err(|err| {
            CardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn insert(&self, card: &Card) -> CardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.cards.contains_key(&card.id()) {
            return Err(CardRepositoryError::DuplicateCard(card.id()));
        }
        state.cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn find_visible(&self, id: CardId) -> CardRepositoryResult<Option<Card>> {
        let state = self.read()?;
        Ok(state.visible(id).cloned())
    }

    async fn find_including_deleted(&self, id: CardId) -> CardRepositoryResult<Option<Card>> {
        let state = self.read()?;
        Ok(state.cards.get(&id).cloned())
    }

    async fn list_visible(&self, query: &CardListQuery) -> CardRepositoryResult<CardPage> {
        let state = self.read()?;
        let mut matching: Vec<&Card> = state
            .cards
            .values()
            .filter(|card| is_visible(card) && query.matches(card))
            .collect();
        matching.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });

        let page = query.page();
        let total = u64::try_from(matching.len()).map_err(CardRepositoryError::persistence)?;
        let offset = usize::try_from(page.offset()).map_err(CardRepositoryError::persistence)?;
        let limit = usize::try_from(page.page_size()).map_err(CardRepositoryError::persistence)?;
        let cards = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(CardPage {
            cards,
            pagination: Pagination::new(page, total),
        })
    }

    async fn replace_if_version(
        &self,
        card: &Card,
        expected: CardVersion,
    ) -> CardRepositoryResult<()> {
        let mut state = self.write()?;
        let current = state
            .visible(card.id())
            .ok_or(CardRepositoryError::NotFound(card.id()))?
            .version();
        if current != expected {
            return Err(CardRepositoryError::VersionConflict {
                id: card.id(),
                current,
                provided: expected,
            });
        }
        state.cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn soft_delete(&self, card: &Card) -> CardRepositoryResult<()> {
        let deleted_at = card
            .deleted_at()
            .ok_or_else(|| CardRepositoryError::persistence(MissingDeletionTimestamp(card.id())))?;
        let mut state = self.write()?;
        let stored = state
            .cards
            .get_mut(&card.id())
            .filter(|stored| is_visible(stored))
            .ok_or(CardRepositoryError::NotFound(card.id()))?;
        stored.stamp_deleted(deleted_at);
        Ok(())
    }
}
