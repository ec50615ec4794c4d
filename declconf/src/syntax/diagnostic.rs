//! Diagnostic rendering
//!
//! Each diagnostic points at the offending token: a `file:line.column:`
//! header, the full source line, and an underline whose caret sits under
//! the token's first character. Tabs in the line are preserved in the
//! underline pad so the caret stays aligned however wide the terminal
//! renders them.

use crate::tokens::Token;
use crate::utils::Span;
use std::fmt;

/// One rendered diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    header: String,
    source_line: Option<String>,
    underline: Option<String>,
    span: Option<Span>,
}

impl Diagnostic {
    /// Diagnostic with no source location, for summary messages.
    pub fn bare(message: &str) -> Self {
        Self {
            header: message.to_string(),
            source_line: None,
            underline: None,
            span: None,
        }
    }

    /// Diagnostic pointing at `token` within `source`. End-of-file tokens
    /// get a header only; there is no line to show.
    pub fn at_token(file: &str, source: &str, token: &Token<'_>, message: &str) -> Self {
        let header = format!("{}:{}: {}", file, token.pos, message);
        if token.is_eof() {
            return Self {
                header,
                source_line: None,
                underline: None,
                span: Some(Span::of_text(token.pos, token.text)),
            };
        }

        let offset = token.pos.offset;
        let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        let line = &source[line_start..line_end];

        let mut underline = String::new();
        for ch in source[line_start..offset].chars() {
            underline.push(if ch == '\t' { '\t' } else { ' ' });
        }
        underline.push('^');
        for _ in 1..token.text.chars().count().max(1) {
            underline.push('~');
        }

        Self {
            header,
            source_line: Some(line.to_string()),
            underline: Some(underline),
            span: Some(Span::of_text(token.pos, token.text)),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// All output lines of this diagnostic, in display order
    pub fn lines(&self) -> Vec<&str> {
        let mut out = vec![self.header.as_str()];
        if let Some(line) = &self.source_line {
            out.push(line);
        }
        if let Some(underline) = &self.underline {
            out.push(underline);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Accumulated parse failure.
#[derive(Debug, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ParseError {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// First header line, the short form
    pub fn summary(&self) -> &str {
        self.diagnostics
            .first()
            .map(|d| d.header())
            .unwrap_or("unknown empty error")
    }

    /// Every diagnostic in full, one block per error
    pub fn render(&self) -> String {
        let lines: Vec<&str> = self
            .diagnostics
            .iter()
            .flat_map(|d| d.lines())
            .collect();
        lines.join("\n")
    }
}
