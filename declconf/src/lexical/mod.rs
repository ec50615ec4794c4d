//! Lexical analysis

pub mod scanner;

pub use scanner::{ScanError, Scanner};
