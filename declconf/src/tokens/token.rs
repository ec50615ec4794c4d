//! Token representation

use super::kind::{KindSet, TokenKind};
use crate::utils::Position;

/// A scanned token. Borrows its text from the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Every classification the text satisfies
    pub kinds: KindSet,
    pub text: &'src str,
    /// Position of the first character
    pub pos: Position,
}

impl<'src> Token<'src> {
    pub fn new(kinds: KindSet, text: &'src str, pos: Position) -> Self {
        Self { kinds, text, pos }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kinds.contains(kind)
    }

    pub fn is_any(&self, want: KindSet) -> bool {
        self.kinds.intersects(want)
    }

    pub fn is_eof(&self) -> bool {
        self.kinds.contains(TokenKind::Eof)
    }

    /// True for tokens usable as a statement value
    pub fn is_value(&self) -> bool {
        self.kinds.contains(TokenKind::Value)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
