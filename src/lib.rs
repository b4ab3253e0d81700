//! Clarifier: clarification-card lifecycle engine.
//!
//! A card captures a unit of work that starts ambiguous and must be
//! clarified before it can be worked on. This crate owns the rules that
//! govern a card's life:
//!
//! - a forward-only status state machine,
//! - a completeness contract on the fields a confirmed card needs,
//! - optimistic concurrency through a per-card version counter,
//! - soft deletion that hides cards from every normal path.
//!
//! # Architecture
//!
//! Clarifier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`card`]: Card domain, persistence ports and adapters, and services
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod card;
pub mod config;
pub mod telemetry;
