//! Adapter implementations of the card repository port.

pub mod memory;
pub mod postgres;
