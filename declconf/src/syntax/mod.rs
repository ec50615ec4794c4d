//! Statement parsing and diagnostics

pub mod diagnostic;
pub mod parser;

pub use diagnostic::{Diagnostic, ParseError};
pub use parser::Parser;
