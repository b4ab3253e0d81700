//! In-memory adapters for card lifecycle storage.

mod card;

pub use card::InMemoryCardRepository;
