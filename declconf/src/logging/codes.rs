//! Error and event codes for the logging system
//!
//! Single source of truth for code constants and their metadata. Codes map
//! one-to-one onto the front end's error taxonomy so log consumers can
//! classify events without parsing message text.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

pub mod lexical {
    use super::Code;

    /// No pattern in the table matched at the current offset
    pub const UNKNOWN_TOKEN: Code = Code::new("E010");
    /// A pattern in the table failed to compile
    pub const BAD_PATTERN: Code = Code::new("E011");
}

pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E020");
    pub const UNEXPECTED_EOF: Code = Code::new("E021");
    pub const TOO_MANY_ERRORS: Code = Code::new("E022");
}

pub mod binding {
    use super::Code;

    pub const UNKNOWN_FIELD: Code = Code::new("E030");
}

pub mod value {
    use super::Code;

    pub const CONVERSION_FAILED: Code = Code::new("E040");
}

pub mod success {
    use super::Code;

    pub const PARSE_COMPLETE: Code = Code::new("S001");
    pub const SYSTEM_INITIALIZED: Code = Code::new("S002");
}

struct CodeMeta {
    severity: Severity,
    description: &'static str,
}

fn metadata() -> &'static HashMap<&'static str, CodeMeta> {
    static METADATA: OnceLock<HashMap<&'static str, CodeMeta>> = OnceLock::new();
    METADATA.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert(
            "E010",
            CodeMeta {
                severity: Severity::Medium,
                description: "Unrecognized input at current offset",
            },
        );
        m.insert(
            "E011",
            CodeMeta {
                severity: Severity::Critical,
                description: "Lexer pattern table failed to compile",
            },
        );
        m.insert(
            "E020",
            CodeMeta {
                severity: Severity::Medium,
                description: "Token does not fit the active dialect grammar",
            },
        );
        m.insert(
            "E021",
            CodeMeta {
                severity: Severity::High,
                description: "Input ended inside an unfinished construct",
            },
        );
        m.insert(
            "E022",
            CodeMeta {
                severity: Severity::High,
                description: "Diagnostic cap exceeded, parse aborted",
            },
        );
        m.insert(
            "E030",
            CodeMeta {
                severity: Severity::Medium,
                description: "Identifier does not name a declared field",
            },
        );
        m.insert(
            "E040",
            CodeMeta {
                severity: Severity::Medium,
                description: "Value text rejected by the target field type",
            },
        );
        m.insert(
            "S001",
            CodeMeta {
                severity: Severity::Low,
                description: "Parse finished without diagnostics",
            },
        );
        m.insert(
            "S002",
            CodeMeta {
                severity: Severity::Low,
                description: "Global logging initialized",
            },
        );
        m
    })
}

/// Get severity classification for a code
pub fn get_severity(code: &str) -> Severity {
    metadata()
        .get(code)
        .map(|meta| meta.severity)
        .unwrap_or(Severity::Medium)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    metadata()
        .get(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown code")
}
