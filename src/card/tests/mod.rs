//! Unit tests for the card lifecycle module.

mod support;
