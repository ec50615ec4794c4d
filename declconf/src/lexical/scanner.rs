//! Pattern-table scanner
//!
//! Matches every table pattern at the current offset and keeps the longest
//! match; entries tying for that length merge their kind sets into a single
//! token. Comments are skipped transparently. The whitespace class is
//! dialect-controlled so that newline is either insignificant (semicolon
//! dialect) or a real token (newline and legacy dialects).

use crate::config::constants::compile_time::lexical::MAX_LOGGED_TOKEN_LEN;
use crate::logging::codes::{self, Code};
use crate::{log_debug, log_error};
use crate::tokens::{KindSet, PatternDef, Token, TokenKind, PATTERNS};
use crate::utils::Position;
use regex::Regex;
use std::sync::OnceLock;

/// Lexical setup errors
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("bad token pattern {pattern}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("bad whitespace class {class}: {source}")]
    BadSpaceClass {
        class: String,
        #[source]
        source: regex::Error,
    },
}

impl ScanError {
    pub fn error_code(&self) -> Code {
        codes::lexical::BAD_PATTERN
    }
}

struct CompiledPattern {
    re: Regex,
    kinds: KindSet,
}

fn compile_table(defs: &[PatternDef]) -> Result<Vec<CompiledPattern>, ScanError> {
    defs.iter()
        .map(|def| {
            let anchored = format!(r"\A(?:{})", def.pattern);
            let re = Regex::new(&anchored).map_err(|source| ScanError::BadPattern {
                pattern: def.pattern.to_string(),
                source,
            })?;
            Ok(CompiledPattern {
                re,
                kinds: def.kinds,
            })
        })
        .collect()
}

fn compiled_patterns() -> Result<&'static [CompiledPattern], ScanError> {
    static TABLE: OnceLock<Result<Vec<CompiledPattern>, ScanError>> = OnceLock::new();
    match TABLE.get_or_init(|| compile_table(PATTERNS)) {
        Ok(table) => Ok(table),
        Err(ScanError::BadPattern { pattern, source }) => Err(ScanError::BadPattern {
            pattern: pattern.clone(),
            source: source.clone(),
        }),
        Err(ScanError::BadSpaceClass { class, source }) => Err(ScanError::BadSpaceClass {
            class: class.clone(),
            source: source.clone(),
        }),
    }
}

/// Scanner over a borrowed source buffer.
pub struct Scanner<'src> {
    file: String,
    source: &'src str,
    pos: Position,
    patterns: &'static [CompiledPattern],
    space: Regex,
    skip: KindSet,
    trace: bool,
}

impl<'src> Scanner<'src> {
    /// Create a scanner with the given whitespace class (regex character
    /// class body, e.g. `" \t\r\n"`).
    pub fn new(source: &'src str, space_class: &str) -> Result<Self, ScanError> {
        let space =
            Regex::new(&format!(r"\A[{}]+", space_class)).map_err(|source| {
                ScanError::BadSpaceClass {
                    class: space_class.to_string(),
                    source,
                }
            })?;
        Ok(Self {
            file: "[internal]".to_string(),
            source,
            pos: Position::start(),
            patterns: compiled_patterns()?,
            space,
            skip: KindSet::of(TokenKind::Comment),
            trace: false,
        })
    }

    /// Emit a debug log event per consumed token
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Name used in diagnostic headers
    pub fn set_file(&mut self, file: &str) {
        self.file = file.to_string();
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Rewind to the start of a previously returned token
    pub fn rewind(&mut self, token: &Token<'src>) {
        self.pos = token.pos;
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos.offset..]
    }

    fn skip_space(&mut self) {
        if let Some(m) = self.space.find(self.rest()) {
            self.pos = self.pos.advance_over(m.as_str());
        }
    }

    /// Match all table patterns at the current offset, longest match wins,
    /// equal-length matches merge kinds.
    fn match_here(&self) -> Token<'src> {
        let rest = self.rest();
        let mut kinds = KindSet::of(TokenKind::Unknown);
        let mut text: &'src str = "";
        let mut best_len: Option<usize> = None;

        for entry in self.patterns {
            if let Some(m) = entry.re.find(rest) {
                match best_len {
                    Some(len) if m.end() == len => kinds.merge(entry.kinds),
                    Some(len) if m.end() < len => {}
                    _ => {
                        best_len = Some(m.end());
                        kinds = entry.kinds;
                        text = m.as_str();
                    }
                }
            }
        }

        if best_len.is_none() {
            // Consume one character so recovery always makes progress.
            let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(0);
            text = &rest[..ch_len];
        }

        Token::new(kinds, text, self.pos)
    }

    /// Look at the next token without consuming it. Comments are consumed
    /// and skipped.
    pub fn peek(&mut self) -> Token<'src> {
        loop {
            self.skip_space();
            if self.pos.offset == self.source.len() {
                return Token::new(KindSet::of(TokenKind::Eof), "", self.pos);
            }
            let token = self.match_here();
            if !token.kinds.intersects(self.skip) {
                return token;
            }
            self.pos = self.pos.advance_over(token.text);
        }
    }

    /// Consume and return the next token
    pub fn next(&mut self) -> Token<'src> {
        let token = self.peek();
        if !token.is_eof() {
            self.pos = self.pos.advance_over(token.text);
            if token.is(TokenKind::Unknown) {
                log_error!(
                    codes::lexical::UNKNOWN_TOKEN,
                    "unrecognized input",
                    "text" => truncate_for_log(token.text),
                    "at" => token.pos
                );
            } else if self.trace {
                log_debug!("token",
                    "text" => truncate_for_log(token.text),
                    "kinds" => token.kinds,
                    "at" => token.pos
                );
            }
        }
        token
    }
}

fn truncate_for_log(text: &str) -> &str {
    match text.char_indices().nth(MAX_LOGGED_TOKEN_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str, space: &str) -> Vec<(KindSet, String)> {
        let mut scanner = Scanner::new(source, space).unwrap();
        let mut out = Vec::new();
        loop {
            let token = scanner.next();
            if token.is_eof() {
                break;
            }
            out.push((token.kinds, token.text.to_string()));
        }
        out
    }

    #[test]
    fn test_basic_statement() {
        let tokens = scan_all("listen 8080;", " \t\r\n");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[0].0.contains(TokenKind::Ident));
        assert!(tokens[1].0.contains(TokenKind::Int));
        assert!(tokens[1].0.contains(TokenKind::Value));
        assert!(tokens[2].0.contains(TokenKind::Semi));
    }

    #[test]
    fn test_longest_match_wins() {
        // A dotted name must scan as one hostname token, not ident + dots.
        let tokens = scan_all("web.example.com", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::Hostname));
        assert_eq!(tokens[0].1, "web.example.com");
    }

    #[test]
    fn test_equal_length_matches_merge_kinds() {
        let tokens = scan_all("5", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::Int));
        assert!(tokens[0].0.contains(TokenKind::Float));
        assert!(tokens[0].0.contains(TokenKind::Value));

        // "end" is simultaneously the legacy closer and an identifier.
        let tokens = scan_all("end", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::End));
        assert!(tokens[0].0.contains(TokenKind::Ident));
    }

    #[test]
    fn test_multi_label_host_port_is_one_token() {
        let tokens = scan_all("web.example.com:80", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::HostPort));
        assert_eq!(tokens[0].1, "web.example.com:80");
    }

    #[test]
    fn test_compressed_ipv6_with_prefix_is_one_token() {
        let tokens = scan_all("2001:888:4::42:7d/120", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::Ipv6));
        assert!(tokens[0].0.contains(TokenKind::Value));
        assert_eq!(tokens[0].1, "2001:888:4::42:7d/120");
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = scan_all("a // trailing\n# full line\nb", " \t\r\n");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_newline_significant_space_class() {
        // Comment does not swallow the newline terminator.
        let tokens = scan_all("a // note\nb", " \t\r");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["a", "\n", "b"]);
        assert!(tokens[1].0.contains(TokenKind::Newline));
    }

    #[test]
    fn test_quoted_string_and_cidr() {
        let tokens = scan_all(r#"ptr "Hello World"; net 192.168.1.0/24;"#, " \t\r\n");
        assert!(tokens[1].0.contains(TokenKind::Str));
        assert_eq!(tokens[1].1, r#""Hello World""#);
        assert!(tokens[4].0.contains(TokenKind::Ipv4));
        assert_eq!(tokens[4].1, "192.168.1.0/24");
    }

    #[test]
    fn test_size_suffix_is_single_int_token() {
        let tokens = scan_all("64k", " \t\r\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].0.contains(TokenKind::Int));
        assert_eq!(tokens[0].1, "64k");
    }

    #[test]
    fn test_unknown_input_consumes_one_char() {
        let mut scanner = Scanner::new("%ok", " \t\r\n").unwrap();
        let bad = scanner.next();
        assert!(bad.kinds.contains(TokenKind::Unknown));
        assert_eq!(bad.text, "%");
        let good = scanner.next();
        assert!(good.kinds.contains(TokenKind::Ident));
        assert_eq!(good.text, "ok");
    }

    #[test]
    fn test_rewind() {
        let mut scanner = Scanner::new("alpha beta", " \t\r\n").unwrap();
        let first = scanner.next();
        let second = scanner.next();
        assert_eq!(second.text, "beta");
        scanner.rewind(&second);
        assert_eq!(scanner.next().text, "beta");
        scanner.rewind(&first);
        assert_eq!(scanner.next().text, "alpha");
    }

    #[test]
    fn test_position_tracking() {
        let mut scanner = Scanner::new("a\n  b", " \t\r").unwrap();
        assert_eq!(scanner.next().pos, Position::new(0, 1, 1));
        assert_eq!(scanner.next().pos, Position::new(1, 1, 2)); // newline token
        assert_eq!(scanner.next().pos, Position::new(4, 2, 3));
    }
}
