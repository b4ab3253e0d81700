//! Request payloads accepted by the card lifecycle service.

use crate::card::domain::{CardId, CardVersion};

/// Request payload for creating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCardRequest {
    title: String,
}

impl CreateCardRequest {
    /// Creates a request with the card title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Returns the requested title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Request payload for listing visible cards.
///
/// Unset paging values fall back to the service's listing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCardsRequest {
    status: Option<String>,
    search: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl ListCardsRequest {
    /// Creates a request with no filters and default paging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by exact status, given in its wire form.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filters by a case-insensitive substring of title or problem.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Selects a one-indexed page.
    #[must_use]
    pub const fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Returns the requested status filter.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the requested search term.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the requested page.
    #[must_use]
    pub const fn page(&self) -> Option<u64> {
        self.page
    }

    /// Returns the requested page size.
    #[must_use]
    pub const fn page_size(&self) -> Option<u64> {
        self.page_size
    }
}

/// Request payload for moving a card to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCardRequest {
    card_id: CardId,
    target_status: String,
    expected_version: Option<CardVersion>,
}

impl TransitionCardRequest {
    /// Creates a transition request for `card_id` to the wire-form status.
    #[must_use]
    pub fn new(card_id: CardId, target_status: impl Into<String>) -> Self {
        Self {
            card_id,
            target_status: target_status.into(),
            expected_version: None,
        }
    }

    /// Asserts the version the caller last observed.
    #[must_use]
    pub const fn with_expected_version(mut self, version: CardVersion) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Returns the target card identifier.
    #[must_use]
    pub const fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Returns the requested status in wire form.
    #[must_use]
    pub fn target_status(&self) -> &str {
        &self.target_status
    }

    /// Returns the asserted version, if any.
    #[must_use]
    pub const fn expected_version(&self) -> Option<CardVersion> {
        self.expected_version
    }
}
