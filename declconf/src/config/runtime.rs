//! Runtime preferences (user experience, not correctness)

use crate::config::constants::compile_time::syntax::MAX_DIAGNOSTICS;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Tunable parser behavior.
///
/// Defaults come from `DECLCONF_*` environment variables when present, so a
/// host can adjust behavior without code changes; a TOML profile can be
/// loaded on top with [`ParserPreferences::from_toml_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Diagnostics accumulated before the parse aborts
    pub max_diagnostics: usize,

    /// Whether repeated unnamed sections merge into one element instead of
    /// appending a new element per occurrence
    pub merge_unnamed_sections: bool,

    /// Whether to emit a debug log event per consumed token
    pub log_token_trace: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            max_diagnostics: env::var("DECLCONF_MAX_DIAGNOSTICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_DIAGNOSTICS),
            merge_unnamed_sections: env::var("DECLCONF_MERGE_UNNAMED_SECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_token_trace: env::var("DECLCONF_LOG_TOKEN_TRACE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl ParserPreferences {
    /// Parse preferences from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load preferences from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, PreferencesError> {
        let text = std::fs::read_to_string(path).map_err(|source| PreferencesError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_toml_str(&text)?)
    }
}

/// Errors loading runtime preferences
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("cannot read preferences file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = ParserPreferences::default();
        assert_eq!(prefs.max_diagnostics, MAX_DIAGNOSTICS);
        assert!(!prefs.merge_unnamed_sections);
    }

    #[test]
    fn test_from_toml() {
        let prefs = ParserPreferences::from_toml_str(
            "max_diagnostics = 3\nmerge_unnamed_sections = true\n",
        )
        .unwrap();
        assert_eq!(prefs.max_diagnostics, 3);
        assert!(prefs.merge_unnamed_sections);
        assert!(!prefs.log_token_trace);
    }

    #[test]
    fn test_from_toml_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_diagnostics = 5").unwrap();
        let prefs = ParserPreferences::from_toml_file(file.path()).unwrap();
        assert_eq!(prefs.max_diagnostics, 5);
    }
}
