//! Parsing dialects
//!
//! The grammar is fixed; dialects only choose which tokens play the
//! statement-terminator, section-opener, and section-closer roles, and
//! whether newline is whitespace or significant.

use crate::tokens::{KindSet, TokenKind};

/// Surface syntax variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `key value; section name { ... }`
    #[default]
    Semicolon,
    /// Newline terminates statements, braces still delimit sections
    Newline,
    /// Newline opens sections and terminates statements, `end` closes
    Legacy,
}

/// Token roles for one dialect.
pub struct DialectSpec {
    pub stmt_end: KindSet,
    pub stmt_end_name: &'static str,
    pub section_open: KindSet,
    pub section_open_name: &'static str,
    pub section_close: KindSet,
    pub section_close_name: &'static str,
    /// Whitespace character-class body handed to the scanner
    pub space_class: &'static str,
    /// Whether a section closer must be followed by a statement terminator
    pub close_requires_terminator: bool,
}

const SEMICOLON: DialectSpec = DialectSpec {
    stmt_end: KindSet::of(TokenKind::Semi),
    stmt_end_name: "';'",
    section_open: KindSet::of(TokenKind::LBrace),
    section_open_name: "'{'",
    section_close: KindSet::of(TokenKind::RBrace),
    section_close_name: "'}'",
    space_class: " \\t\\r\\n",
    close_requires_terminator: false,
};

const NEWLINE: DialectSpec = DialectSpec {
    stmt_end: KindSet::of(TokenKind::Newline),
    stmt_end_name: "newline",
    section_open: KindSet::of(TokenKind::LBrace),
    section_open_name: "'{'",
    section_close: KindSet::of(TokenKind::RBrace),
    section_close_name: "'}'",
    space_class: " \\t\\r",
    close_requires_terminator: false,
};

const LEGACY: DialectSpec = DialectSpec {
    stmt_end: KindSet::of(TokenKind::Newline),
    stmt_end_name: "newline",
    section_open: KindSet::of(TokenKind::Newline),
    section_open_name: "newline",
    section_close: KindSet::of(TokenKind::End),
    section_close_name: "\"end\"",
    space_class: " \\t\\r",
    close_requires_terminator: true,
};

impl Dialect {
    pub fn spec(&self) -> &'static DialectSpec {
        match self {
            Dialect::Semicolon => &SEMICOLON,
            Dialect::Newline => &NEWLINE,
            Dialect::Legacy => &LEGACY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Semicolon => "semicolon",
            Dialect::Newline => "newline",
            Dialect::Legacy => "legacy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_roles() {
        let spec = Dialect::Semicolon.spec();
        assert!(spec.stmt_end.contains(TokenKind::Semi));
        assert!(spec.section_open.contains(TokenKind::LBrace));
        assert!(spec.space_class.contains("\\n"));
        assert!(!spec.close_requires_terminator);
    }

    #[test]
    fn test_legacy_roles() {
        let spec = Dialect::Legacy.spec();
        assert!(spec.stmt_end.contains(TokenKind::Newline));
        assert!(spec.section_open.contains(TokenKind::Newline));
        assert!(spec.section_close.contains(TokenKind::End));
        assert!(spec.close_requires_terminator);
        assert!(!spec.space_class.contains("\\n"));
    }
}
