//! Clarification card lifecycle management.
//!
//! A card moves from ambiguous intent (`NEEDS_CLARIFICATION`) to completed
//! work (`DONE`) along a fixed, forward-only status graph. Four rules govern
//! every operation and interact with one another:
//!
//! - the status state machine,
//! - the completeness contract on `problem` and `success_criteria`,
//! - optimistic concurrency control through a per-card version counter,
//! - soft-deletion visibility (deleted cards do not exist for callers).
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
