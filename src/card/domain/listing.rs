//! Filtered, paginated listing of visible cards.

use super::{Card, CardDomainError, CardStatus};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page size accepted by default.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest record offset a page may start at; storage offsets are `i64`.
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// One-indexed page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Creates a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidPage`] for page zero or a page
    /// whose offset exceeds `i64::MAX`, and
    /// [`CardDomainError::InvalidPageSize`] outside `1..=max_page_size`.
    pub const fn new(page: u64, page_size: u64, max_page_size: u64) -> Result<Self, CardDomainError> {
        if page == 0 {
            return Err(CardDomainError::InvalidPage(page));
        }
        if page_size == 0 || page_size > max_page_size {
            return Err(CardDomainError::InvalidPageSize {
                requested: page_size,
                max: max_page_size,
            });
        }
        match (page - 1).checked_mul(page_size) {
            Some(offset) if offset <= MAX_OFFSET => Ok(Self { page, page_size }),
            _ => Err(CardDomainError::InvalidPage(page)),
        }
    }

    /// Returns the one-indexed page number.
    #[must_use]
    pub const fn page(self) -> u64 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(self) -> u64 {
        self.page_size
    }

    /// Returns the number of matching records preceding this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Listing criteria applied on top of the visibility filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardListQuery {
    status: Option<CardStatus>,
    search: Option<String>,
    page: PageRequest,
}

impl CardListQuery {
    /// Creates a query for the given page with no filters.
    #[must_use]
    pub const fn new(page: PageRequest) -> Self {
        Self {
            status: None,
            search: None,
            page,
        }
    }

    /// Restricts results to an exact status.
    #[must_use]
    pub fn with_status(mut self, status: CardStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to cards whose title or problem contains `term`,
    /// ignoring case.
    ///
    /// The term is matched as given, surrounding whitespace included. A term
    /// that is empty or entirely whitespace applies no filter.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let raw = term.into();
        self.search = (!raw.trim().is_empty()).then_some(raw);
        self
    }

    /// Returns the status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<CardStatus> {
        self.status
    }

    /// Returns the search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the requested page.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }

    /// Returns `true` when `card` satisfies the status and search filters.
    ///
    /// Visibility is not checked here; callers filter deleted cards first.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        let status_matches = self.status.is_none_or(|status| card.status() == status);
        let search_matches = self.search.as_deref().is_none_or(|term| {
            let needle = term.to_lowercase();
            card.title().as_str().to_lowercase().contains(&needle)
                || card.problem().as_str().to_lowercase().contains(&needle)
        });
        status_matches && search_matches
    }
}

/// Pagination metadata for a listing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-indexed page number.
    pub page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Number of matching visible cards across all pages.
    pub total: u64,
    /// `ceil(total / page_size)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Computes pagination metadata for `total` matches.
    #[must_use]
    pub const fn new(page: PageRequest, total: u64) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total,
            total_pages: total.div_ceil(page.page_size),
        }
    }
}

/// One page of visible cards, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPage {
    /// Cards on this page.
    pub cards: Vec<Card>,
    /// Pagination metadata.
    pub pagination: Pagination,
}
