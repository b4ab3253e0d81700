//! `PostgreSQL` adapters for card lifecycle persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CardPgPool, PostgresCardRepository};
