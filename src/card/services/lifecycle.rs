//! Service layer composing visibility, concurrency, state machine, and
//! completeness rules into the card operations.

use super::{
    CardExport, CardLifecycleError, CardLifecycleResult, CreateCardRequest, ListCardsRequest,
    TransitionCardRequest, export::render_export,
};
use crate::card::{
    domain::{
        Card, CardDomainError, CardId, CardListQuery, CardPage, CardStatus, CardTitle,
        CardUpdate, CardVersion, PageRequest, retain_visible,
    },
    ports::CardRepository,
};
use crate::config::ListingConfig;
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Card lifecycle orchestration service.
///
/// Every operation except [`CardLifecycleService::create_card`] first
/// resolves the card through the visibility filter, so soft-deleted cards
/// are reported as not found.
pub struct CardLifecycleService<R, C>
where
    R: CardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    listing: ListingConfig,
}

impl<R, C> CardLifecycleService<R, C>
where
    R: CardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new card lifecycle service with default listing limits.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            listing: ListingConfig::default(),
        }
    }

    /// Replaces the listing limits.
    #[must_use]
    pub const fn with_listing(mut self, listing: ListingConfig) -> Self {
        self.listing = listing;
        self
    }

    /// Creates a card awaiting clarification at version zero.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::Domain`] for an empty or overlong title
    /// and [`CardLifecycleError::Repository`] when persistence fails.
    pub async fn create_card(&self, request: CreateCardRequest) -> CardLifecycleResult<Card> {
        let title = CardTitle::new(request.title())?;
        let card = Card::new(title, &*self.clock);
        self.repository.insert(&card).await?;
        info!(card_id = %card.id(), "created card");
        Ok(card)
    }

    /// Retrieves a visible card.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::NotFound`] when the card does not exist
    /// or has been soft-deleted.
    pub async fn get_card(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        self.load_visible(card_id).await
    }

    /// Lists visible cards, newest first, with optional status and search
    /// filters.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::Domain`] for an unknown status or
    /// out-of-range paging values.
    pub async fn list_cards(&self, request: ListCardsRequest) -> CardLifecycleResult<CardPage> {
        let page = PageRequest::new(
            request.page().unwrap_or(1),
            request.page_size().unwrap_or(self.listing.default_page_size),
            self.listing.max_page_size,
        )?;
        let mut query = CardListQuery::new(page);
        if let Some(raw_status) = request.status() {
            let status = CardStatus::try_from(raw_status).map_err(CardDomainError::from)?;
            query = query.with_status(status);
        }
        if let Some(term) = request.search() {
            query = query.with_search(term);
        }
        Ok(self.repository.list_visible(&query).await?)
    }

    /// Applies a version-guarded partial edit.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::NotFound`] for missing or deleted
    /// cards, [`CardLifecycleError::VersionConflict`] when the supplied
    /// version is stale (including a concurrent writer winning the race),
    /// and [`CardLifecycleError::Domain`] for invalid input or an attempt to
    /// clear required fields of a confirmed card.
    pub async fn update_card(
        &self,
        card_id: CardId,
        update: CardUpdate,
    ) -> CardLifecycleResult<Card> {
        Card::validate_update(&update)?;
        let mut card = self.load_visible(card_id).await?;
        let observed = card.version();

        card.apply_update(&update, &*self.clock)
            .map_err(|err| rejected(card_id, err))?;
        self.commit(&card, observed).await?;
        info!(card_id = %card_id, version = %card.version(), "updated card");
        Ok(card)
    }

    /// Moves a card along one state-machine edge.
    ///
    /// When the request carries an expected version it must match the
    /// stored one. Either way the write only succeeds if the version read
    /// before validation is still current.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::NotFound`] for missing or deleted
    /// cards, [`CardLifecycleError::VersionConflict`] for a stale version,
    /// and [`CardLifecycleError::Domain`] for an unknown status, an illegal
    /// edge, or an incomplete card.
    pub async fn transition_card(
        &self,
        request: TransitionCardRequest,
    ) -> CardLifecycleResult<Card> {
        let card_id = request.card_id();
        let target =
            CardStatus::try_from(request.target_status()).map_err(CardDomainError::from)?;
        let mut card = self.load_visible(card_id).await?;
        let observed = card.version();

        if let Some(expected) = request.expected_version() {
            observed
                .ensure_matches(expected)
                .map_err(|err| rejected(card_id, err.into()))?;
        }
        card.transition_to(target, &*self.clock)
            .map_err(|err| rejected(card_id, err))?;
        self.commit(&card, observed).await?;
        info!(
            card_id = %card_id,
            status = %card.status(),
            version = %card.version(),
            "transitioned card"
        );
        Ok(card)
    }

    /// Soft-deletes a visible card.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::NotFound`] when the card does not exist
    /// or was already deleted.
    pub async fn delete_card(&self, card_id: CardId) -> CardLifecycleResult<()> {
        let mut card = self.load_visible(card_id).await?;
        card.mark_deleted(&*self.clock);
        self.repository.soft_delete(&card).await?;
        info!(card_id = %card_id, "soft-deleted card");
        Ok(())
    }

    /// Renders the Markdown export of a visible card.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::NotFound`] for missing or deleted cards
    /// and [`CardLifecycleError::ExportRender`] if rendering fails.
    pub async fn export_card(&self, card_id: CardId) -> CardLifecycleResult<CardExport> {
        let card = self.load_visible(card_id).await?;
        render_export(&card).map_err(|err| CardLifecycleError::ExportRender {
            card_id,
            reason: err.to_string(),
        })
    }

    /// Looks a card up regardless of soft deletion.
    ///
    /// Administrative bypass of the visibility filter; not for normal
    /// request paths.
    ///
    /// # Errors
    ///
    /// Returns [`CardLifecycleError::Repository`] when the lookup fails.
    pub async fn audit_lookup(&self, card_id: CardId) -> CardLifecycleResult<Option<Card>> {
        Ok(self.repository.find_including_deleted(card_id).await?)
    }

    async fn load_visible(&self, card_id: CardId) -> CardLifecycleResult<Card> {
        let found = self.repository.find_visible(card_id).await?;
        retain_visible(found).ok_or(CardLifecycleError::NotFound(card_id))
    }

    async fn commit(&self, card: &Card, observed: CardVersion) -> CardLifecycleResult<()> {
        self.repository
            .replace_if_version(card, observed)
            .await
            .map_err(|err| {
                let lifted = CardLifecycleError::from(err);
                if lifted.kind().is_conflict() {
                    warn!(card_id = %card.id(), error = %lifted, "lost concurrent write");
                }
                lifted
            })
    }
}

fn rejected(card_id: CardId, err: CardDomainError) -> CardLifecycleError {
    let lifted = CardLifecycleError::for_card(card_id, err);
    if lifted.kind().is_conflict() {
        warn!(card_id = %card_id, error = %lifted, "rejected card mutation");
    }
    lifted
}
