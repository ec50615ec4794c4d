//! Compile-time bounds and runtime preferences for the front end

pub mod constants;
pub mod runtime;

pub use runtime::ParserPreferences;
