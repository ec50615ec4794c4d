//! Recursive-descent statement parser
//!
//! The grammar is a flat statement list: `key value... <end>` for value
//! fields and `key [name] <open> statements <close>` for sections, with the
//! terminator/opener/closer tokens chosen by the active dialect. On error
//! the parser records a diagnostic, resynchronizes at the next statement or
//! section boundary, and keeps going until the diagnostic cap is hit.

use super::diagnostic::{Diagnostic, ParseError};
use crate::binding::{Bind, FieldMut, Record, SectionSlot};
use crate::config::constants::compile_time::syntax::FATAL_ERROR_COUNT;
use crate::config::ParserPreferences;
use crate::dialect::{Dialect, DialectSpec};
use crate::lexical::{ScanError, Scanner};
use crate::logging::codes;
use crate::tokens::{KindSet, Token, TokenKind};
use crate::utils::Span;
use crate::{log_error, log_success};

pub struct Parser<'src> {
    scanner: Scanner<'src>,
    spec: &'static DialectSpec,
    dialect: Dialect,
    section_name: String,
    diagnostics: Vec<Diagnostic>,
    err_count: usize,
    prefs: ParserPreferences,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, dialect: Dialect) -> Result<Self, ScanError> {
        let spec = dialect.spec();
        Ok(Self {
            scanner: Scanner::new(source, spec.space_class)?,
            spec,
            dialect,
            section_name: String::new(),
            diagnostics: Vec::new(),
            err_count: 0,
            prefs: ParserPreferences::default(),
        })
    }

    /// Name used in diagnostic headers; defaults to `[internal]`
    pub fn with_file(mut self, file: &str) -> Self {
        self.scanner.set_file(file);
        self
    }

    pub fn with_preferences(mut self, prefs: ParserPreferences) -> Self {
        self.scanner.set_trace(prefs.log_token_trace);
        self.prefs = prefs;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse the whole input into a fresh record.
    pub fn parse<R: Record>(&mut self) -> Result<R, ParseError> {
        let mut record = R::default();
        self.parse_into(&mut record)?;
        Ok(record)
    }

    /// Parse the whole input into an existing record, layering on top of
    /// whatever it already holds.
    pub fn parse_into<R: Record>(&mut self, record: &mut R) -> Result<(), ParseError> {
        self.stmts(record, KindSet::of(TokenKind::Eof));

        if self.err_count > 0 {
            if self.err_count > self.prefs.max_diagnostics && self.err_count != FATAL_ERROR_COUNT
            {
                self.error(codes::syntax::TOO_MANY_ERRORS, None, "too many errors");
            }
            return Err(ParseError::new(std::mem::take(&mut self.diagnostics)));
        }

        log_success!(
            codes::success::PARSE_COMPLETE,
            "configuration parsed",
            "file" => self.scanner.file(),
            "dialect" => self.dialect.name()
        );
        Ok(())
    }

    /// Record a diagnostic, prefixed with the enclosing section keyword.
    fn error(&mut self, code: codes::Code, token: Option<&Token<'src>>, message: &str) {
        let message = if self.section_name.is_empty() {
            message.to_string()
        } else {
            format!("section {}: {}", self.section_name, message)
        };

        let diag = match token {
            Some(token) => {
                Diagnostic::at_token(self.scanner.file(), self.scanner.source(), token, &message)
            }
            None => Diagnostic::bare(&message),
        };
        let span = diag.span().unwrap_or_else(Span::default);
        log_error!(
            code,
            &message,
            span = span,
            "file" => self.scanner.file()
        );
        self.diagnostics.push(diag);
        self.err_count += 1;
    }

    /// Look at the next token if it matches `want`, without consuming it.
    fn peek(&mut self, want: KindSet) -> Option<Token<'src>> {
        let next = self.scanner.peek();
        next.is_any(want).then_some(next)
    }

    /// Consume the next token if it matches `want`.
    fn accept(&mut self, want: KindSet) -> Option<Token<'src>> {
        self.peek(want).map(|_| self.scanner.next())
    }

    /// Demand a token matching `want`; diagnose otherwise. End-of-file
    /// here is fatal: the error count jumps past any cap so enclosing
    /// loops unwind without a "too many errors" summary.
    fn expect(&mut self, want: KindSet, what: &str) -> (Token<'src>, bool) {
        let token = self.scanner.next();
        if token.is_eof() {
            self.error(
                codes::syntax::UNEXPECTED_EOF,
                Some(&token),
                "unexpected end-of-file",
            );
            self.err_count = FATAL_ERROR_COUNT;
            return (token, false);
        }
        if token.is_any(want) {
            return (token, true);
        }
        self.error(
            codes::syntax::UNEXPECTED_TOKEN,
            Some(&token),
            &format!("parse error, expected {}", what),
        );
        (token, false)
    }

    /// Discard tokens until a statement or section boundary.
    fn recover(&mut self, token: Option<Token<'src>>) {
        self.recover_until(token, self.spec.stmt_end);
    }

    fn recover_until(&mut self, token: Option<Token<'src>>, stmt_end: KindSet) {
        let mut token = match token {
            Some(token) => token,
            None => self.scanner.next(),
        };
        loop {
            if token.is_eof() || token.is_any(stmt_end) {
                return;
            }
            if token.is_any(self.spec.section_close) {
                // The closer belongs to the enclosing section; push it
                // back unless we are discarding a whole nested block.
                if !stmt_end.is_empty() {
                    self.scanner.rewind(&token);
                }
                return;
            }
            if token.is_any(self.spec.section_open) {
                self.recover_until(None, KindSet::EMPTY);
            }
            token = self.scanner.next();
        }
    }

    /// Parse one section body into `slot`.
    fn section(&mut self, keyword: &'src str, slot: &mut (dyn SectionSlot + '_)) {
        let mut name: Option<&'src str> = None;
        if slot.requires_name() {
            let (token, ok) = self.expect(KindSet::of(TokenKind::Value), "section-name");
            if !ok {
                self.recover(Some(token));
                return;
            }
            name = Some(token.text);
        }

        // Flat form: `section key value...` binds one statement without
        // a block.
        let flat = self.peek(KindSet::of(TokenKind::Ident)).is_some();
        if !flat {
            let (token, ok) = self.expect(self.spec.section_open, self.spec.section_open_name);
            if !ok {
                self.recover(Some(token));
                return;
            }
        }

        let outer = std::mem::replace(&mut self.section_name, keyword.to_string());
        let target = slot.open(name, self.prefs.merge_unnamed_sections);

        if flat {
            self.stmt(target);
            self.accept(self.spec.stmt_end);
        } else {
            self.stmts(target, self.spec.section_close);
            if self.spec.close_requires_terminator {
                self.expect(self.spec.stmt_end, self.spec.stmt_end_name);
            } else {
                self.accept(self.spec.stmt_end);
            }
        }

        self.section_name = outer;
    }

    /// Parse a single statement into `target`.
    fn stmt(&mut self, target: &mut dyn Bind) {
        // Empty statements are allowed
        if self.accept(self.spec.stmt_end).is_some() {
            return;
        }

        let (token, ok) = self.expect(KindSet::of(TokenKind::Ident), "identifier");
        if !ok {
            self.recover(Some(token));
            return;
        }

        let field = match target.lookup(token.text) {
            Ok(field) => field,
            Err(err) => {
                self.error(err.error_code(), Some(&token), &err.to_string());
                self.recover(Some(token));
                return;
            }
        };

        match field {
            FieldMut::Section(mut slot) => self.section(token.text, slot.as_mut()),
            FieldMut::Value(mut slot) => {
                // Boolean fields may omit the value
                if slot.is_bool() && self.accept(self.spec.stmt_end).is_some() {
                    let _ = slot.set("true");
                    return;
                }

                loop {
                    let (value, ok) = self.expect(KindSet::of(TokenKind::Value), "value");
                    if !ok {
                        self.recover(Some(value));
                        return;
                    }
                    if let Err(err) = slot.set(value.text) {
                        // Conversion failures don't abort the statement.
                        self.error(codes::value::CONVERSION_FAILED, Some(&value), &err.to_string());
                    }
                    if !slot.is_list() || self.accept(KindSet::of(TokenKind::Comma)).is_none() {
                        let (term, ok) = self.expect(self.spec.stmt_end, self.spec.stmt_end_name);
                        if !ok {
                            self.recover(Some(term));
                        }
                        return;
                    }
                    // A list may continue on the next line after a comma.
                    self.accept(KindSet::of(TokenKind::Newline));
                }
            }
        }
    }

    /// Parse statements until `end` (section closer or end-of-file).
    fn stmts(&mut self, target: &mut dyn Bind, end: KindSet) {
        loop {
            if self.accept(end).is_some() {
                return;
            }
            self.stmt(target);
            if self.err_count > self.prefs.max_diagnostics {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{FieldDef, NameAccessor};
    use crate::value::{ConvertError, FromText, IpNet};
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Attr {
        #[default]
        None,
        V1,
        V2,
    }

    impl FromText for Attr {
        fn from_text(text: &str) -> Result<Self, ConvertError> {
            match text {
                "v1" => Ok(Attr::V1),
                "v2" => Ok(Attr::V2),
                _ => Err(ConvertError::custom("unknown attr value")),
            }
        }
    }

    #[derive(Debug, Default)]
    struct File {
        name: String,
        dir: String,
        attr: Vec<Attr>,
        ptr: Option<String>,
    }

    impl Record for File {
        const FIELDS: &'static [FieldDef<Self>] = &[
            FieldDef::with_aliases("dir", &["folder", "directory"], |r| {
                FieldMut::scalar(&mut r.dir)
            }),
            FieldDef::new("attr", |r| FieldMut::list(&mut r.attr)),
            FieldDef::new("ptr", |r| FieldMut::optional(&mut r.ptr)),
        ];
        const NAME_FIELD: Option<NameAccessor<Self>> = Some(NameAccessor {
            get: |r| &r.name,
            set: |r, name| r.name = name.to_string(),
        });
    }

    #[derive(Debug, Default)]
    struct Main {
        file: Vec<File>,
        net: Vec<IpNet>,
    }

    impl Record for Main {
        const FIELDS: &'static [FieldDef<Self>] = &[
            FieldDef::new("file", |r| FieldMut::record_list(&mut r.file)),
            FieldDef::new("net", |r| FieldMut::list(&mut r.net)),
        ];
    }

    const CONF_SEMI: &str = r#"
file file1 {
	dir	/var/tmp;
	attr	v1,
		v2;
}

file file1 ptr "Hello World";

file file2 {
	directory /var/tmp;
}

net 2001:888:4::42:7d/120;
net 194.109.6.66/32;
"#;

    const CONF_LEGACY: &str = r#"
file file1
  dir /var/tmp
  attr v1,v2
  ptr "Hello World"
end
file file2
  directory /var/tmp
end
"#;

    fn check_files(main: &Main) {
        assert_eq!(main.file.len(), 2);
        assert_eq!(main.file[0].name, "file1");
        assert_eq!(main.file[0].dir, "/var/tmp");
        assert_eq!(main.file[0].attr, vec![Attr::V1, Attr::V2]);
        assert_eq!(main.file[0].ptr.as_deref(), Some("Hello World"));
        assert_eq!(main.file[1].name, "file2");
        assert_eq!(main.file[1].dir, "/var/tmp");
    }

    #[test]
    fn test_semicolon_dialect_end_to_end() {
        let mut parser = Parser::new(CONF_SEMI, Dialect::Semicolon).unwrap();
        let main: Main = parser.parse().unwrap_or_else(|e| panic!("{}", e.render()));
        check_files(&main);
        assert_eq!(main.net.len(), 2);
        assert_eq!(main.net[1].to_string(), "194.109.6.66/32");
    }

    #[test]
    fn test_legacy_dialect_end_to_end() {
        let mut parser = Parser::new(CONF_LEGACY, Dialect::Legacy).unwrap();
        let main: Main = parser.parse().unwrap_or_else(|e| panic!("{}", e.render()));
        check_files(&main);
    }

    #[test]
    fn test_newline_dialect() {
        let source = "file file1 {\n  dir /var/tmp\n  attr v1,\n       v2\n}\n";
        let mut parser = Parser::new(source, Dialect::Newline).unwrap();
        let main: Main = parser.parse().unwrap_or_else(|e| panic!("{}", e.render()));
        assert_eq!(main.file[0].dir, "/var/tmp");
        assert_eq!(main.file[0].attr, vec![Attr::V1, Attr::V2]);
    }

    #[derive(Debug, Default)]
    struct Flags {
        verbose: bool,
        level: u32,
    }

    impl Record for Flags {
        const FIELDS: &'static [FieldDef<Self>] = &[
            FieldDef::new("verbose", |r| FieldMut::scalar(&mut r.verbose)),
            FieldDef::new("level", |r| FieldMut::scalar(&mut r.level)),
        ];
    }

    #[test]
    fn test_boolean_shorthand() {
        let mut parser = Parser::new("verbose;\nlevel 3;", Dialect::Semicolon).unwrap();
        let flags: Flags = parser.parse().unwrap();
        assert!(flags.verbose);
        assert_eq!(flags.level, 3);
    }

    #[test]
    fn test_unknown_field_recovers_and_continues() {
        let mut parser =
            Parser::new("bogus 1;\nlevel 3;", Dialect::Semicolon).unwrap();
        let err = parser.parse::<Flags>().unwrap_err();
        assert!(err.summary().contains("unknown field bogus"), "{}", err.summary());
        // recovery resumed at the next statement, so only one error
        assert_eq!(
            err.diagnostics
                .iter()
                .filter(|d| d.header().contains("unknown field"))
                .count(),
            1
        );
    }

    #[test]
    fn test_conversion_error_does_not_abort_statement() {
        let mut flags = Flags::default();
        let mut parser = Parser::new("level ten;\nverbose;", Dialect::Semicolon).unwrap();
        let err = parser.parse_into(&mut flags).unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.summary().contains("not an integer value"));
        // the failed statement was terminated normally and the next one
        // still bound
        assert!(flags.verbose);
    }

    #[test]
    fn test_unexpected_eof_suppresses_summary() {
        let mut parser = Parser::new("file file1 {\n dir /var/tmp;\n", Dialect::Semicolon)
            .unwrap();
        let err = parser.parse::<Main>().unwrap_err();
        assert!(err
            .diagnostics
            .iter()
            .any(|d| d.header().contains("unexpected end-of-file")));
        assert!(!err.render().contains("too many errors"));
    }

    #[test]
    fn test_error_cap_adds_summary() {
        let mut source = String::new();
        for i in 0..20 {
            source.push_str(&format!("bogus{} x;\n", i));
        }
        let mut parser = Parser::new(&source, Dialect::Semicolon).unwrap();
        let err = parser.parse::<Flags>().unwrap_err();
        assert!(err.render().contains("too many errors"));
        let unknowns = err
            .diagnostics
            .iter()
            .filter(|d| d.header().contains("unknown field"))
            .count();
        assert_eq!(unknowns, 11); // cap is 10, loop exits after exceeding it
    }

    #[test]
    fn test_section_prefix_in_messages() {
        let source = "file file1 {\n  bogus 1;\n}\n";
        let mut parser = Parser::new(source, Dialect::Semicolon).unwrap();
        let err = parser.parse::<Main>().unwrap_err();
        assert!(
            err.summary().contains("section file: unknown field bogus"),
            "{}",
            err.summary()
        );
    }

    #[test]
    fn test_diagnostic_shows_source_line_and_caret() {
        let source = "level ten;\n";
        let mut parser = Parser::new(source, Dialect::Semicolon).unwrap().with_file("t.conf");
        let err = parser.parse::<Flags>().unwrap_err();
        let lines = err.diagnostics[0].lines();
        assert_eq!(lines[0], "t.conf:1.7: not an integer value: invalid digit found in string");
        assert_eq!(lines[1], "level ten;");
        assert_eq!(lines[2], "      ^~~");
    }

    #[test]
    fn test_merge_unnamed_sections_preference() {
        #[derive(Debug, Default)]
        struct Limits {
            cap: u32,
        }
        impl Record for Limits {
            const FIELDS: &'static [FieldDef<Self>] =
                &[FieldDef::new("cap", |r| FieldMut::scalar(&mut r.cap))];
        }
        #[derive(Debug, Default)]
        struct Top {
            limits: Vec<Limits>,
        }
        impl Record for Top {
            const FIELDS: &'static [FieldDef<Self>] =
                &[FieldDef::new("limits", |r| FieldMut::record_list(&mut r.limits))];
        }

        let source = "limits { cap 1; }\nlimits { cap 2; }\n";

        let mut parser = Parser::new(source, Dialect::Semicolon).unwrap();
        let top: Top = parser.parse().unwrap();
        assert_eq!(top.limits.len(), 2);

        let prefs = ParserPreferences {
            merge_unnamed_sections: true,
            ..ParserPreferences::default()
        };
        let mut parser = Parser::new(source, Dialect::Semicolon)
            .unwrap()
            .with_preferences(prefs);
        let top: Top = parser.parse().unwrap();
        assert_eq!(top.limits.len(), 1);
        assert_eq!(top.limits[0].cap, 2);
    }

    #[test]
    fn test_parse_into_layers_over_existing() {
        let mut flags = Flags {
            verbose: true,
            level: 1,
        };
        let mut parser = Parser::new("level 9;", Dialect::Semicolon).unwrap();
        parser.parse_into(&mut flags).unwrap();
        assert_eq!(flags.level, 9);
        assert!(flags.verbose);
    }

    #[test]
    fn test_recovery_skips_nested_blocks() {
        // The unknown section's whole block is discarded, inner braces
        // included, and parsing resumes at the next terminator.
        let source = "junk x {\n inner { a 1; }\n};\nlevel 2;";
        let mut flags = Flags::default();
        let mut parser = Parser::new(source, Dialect::Semicolon).unwrap();
        let err = parser.parse_into(&mut flags).unwrap_err();
        assert_matches!(err.diagnostics.len(), 1);
        assert!(err.summary().contains("unknown field junk"));
        assert_eq!(flags.level, 2);
    }
}
