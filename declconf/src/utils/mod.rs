//! Shared utilities for the configuration front end

pub mod span;

pub use span::{Position, Span};
