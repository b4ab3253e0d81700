//! Shared world state for card lifecycle BDD scenarios.

use std::sync::Arc;

use clarifier::card::{
    adapters::memory::InMemoryCardRepository,
    domain::Card,
    services::{CardLifecycleError, CardLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestCardService = CardLifecycleService<InMemoryCardRepository, DefaultClock>;

/// Scenario world for card lifecycle behaviour tests.
pub struct CardLifecycleWorld {
    pub service: TestCardService,
    pub card: Option<Card>,
    pub last_error: Option<CardLifecycleError>,
}

impl CardLifecycleWorld {
    /// Creates a world backed by an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        let service = CardLifecycleService::new(
            Arc::new(InMemoryCardRepository::new()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            card: None,
            last_error: None,
        }
    }

    /// Returns the card the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no card has been created yet.
    pub fn card(&self) -> Result<&Card, eyre::Report> {
        self.card
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing card in scenario world"))
    }

    /// Records the outcome of a mutating operation.
    pub fn record(&mut self, result: Result<Card, CardLifecycleError>) {
        match result {
            Ok(card) => {
                self.card = Some(card);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for CardLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CardLifecycleWorld {
    CardLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
