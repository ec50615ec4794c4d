// Internal modules
pub mod binding;
pub mod config;
pub mod dialect;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod syntax;
pub mod tokens;
pub mod utils;
pub mod value;

// Re-export key types for library consumers
pub use binding::{Bind, BindError, FieldDef, FieldMut, NameAccessor, Record};
pub use config::ParserPreferences;
pub use dialect::Dialect;
pub use lexical::{ScanError, Scanner};
pub use syntax::{Diagnostic, ParseError, Parser};
pub use value::{ConvertError, Endpoint, FromText, IpNet};

use std::path::Path;

/// Errors from the one-shot entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse a configuration string into a fresh record.
pub fn from_str<R: Record>(source: &str, dialect: Dialect) -> Result<R, Error> {
    let mut parser = Parser::new(source, dialect)?;
    Ok(parser.parse()?)
}

/// Read and parse a configuration file into a fresh record. The file name
/// appears in diagnostic headers.
pub fn from_file<R: Record>(path: impl AsRef<Path>, dialect: Dialect) -> Result<R, Error> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut parser = Parser::new(&source, dialect)?.with_file(&path.display().to_string());
    Ok(parser.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Default)]
    struct Server {
        listen: Option<Endpoint>,
        workers: u32,
    }

    impl Record for Server {
        const FIELDS: &'static [FieldDef<Self>] = &[
            FieldDef::new("listen", |r| FieldMut::optional(&mut r.listen)),
            FieldDef::new("workers", |r| FieldMut::scalar(&mut r.workers)),
        ];
    }

    #[test]
    fn test_from_str() {
        let server: Server =
            from_str("listen *:8080;\nworkers 4;", Dialect::Semicolon).unwrap();
        assert_eq!(server.listen, Some(Endpoint::new("*", 8080)));
        assert_eq!(server.workers, 4);
    }

    #[test]
    fn test_from_file_uses_file_in_diagnostics() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers lots;").unwrap();
        let err = from_file::<Server>(file.path(), Dialect::Semicolon).unwrap_err();
        let Error::Parse(parse) = err else {
            panic!("expected parse error, got {:?}", err);
        };
        assert!(parse
            .summary()
            .starts_with(&file.path().display().to_string()));
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_file::<Server>("/no/such/file.conf", Dialect::Semicolon).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
