//! Port contracts for card lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by card services.

pub mod repository;

pub use repository::{CardRepository, CardRepositoryError, CardRepositoryResult};

#[cfg(test)]
pub use repository::MockCardRepository;
