//! Record descriptors
//!
//! A configuration target declares its fields in a const descriptor table
//! rather than being discovered at run time. Each [`FieldDef`] pairs the
//! config-file spelling with an accessor returning a [`FieldMut`] for the
//! matching struct field; sections that carry a name after the keyword
//! declare which field receives it with [`Record::NAME_FIELD`].

use super::field::FieldMut;
use crate::logging::codes::{self, Code};

/// Field resolution errors
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("unknown field {name}")]
    UnknownField { name: String },
}

impl BindError {
    pub fn unknown_field(name: &str) -> Self {
        BindError::UnknownField {
            name: name.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        codes::binding::UNKNOWN_FIELD
    }
}

/// One field of a record: spelling, alternate spellings, and an accessor.
pub struct FieldDef<R: 'static> {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub bind: for<'a> fn(&'a mut R) -> FieldMut<'a>,
}

impl<R> FieldDef<R> {
    pub const fn new(name: &'static str, bind: for<'a> fn(&'a mut R) -> FieldMut<'a>) -> Self {
        assert!(!name.is_empty(), "field name cannot be empty");
        Self {
            name,
            aliases: &[],
            bind,
        }
    }

    pub const fn with_aliases(
        name: &'static str,
        aliases: &'static [&'static str],
        bind: for<'a> fn(&'a mut R) -> FieldMut<'a>,
    ) -> Self {
        assert!(!name.is_empty(), "field name cannot be empty");
        Self {
            name,
            aliases,
            bind,
        }
    }
}

/// Accessors for the field that receives a section's name token.
pub struct NameAccessor<R: 'static> {
    pub get: fn(&R) -> &str,
    pub set: fn(&mut R, &str),
}

/// A struct that can be filled in from configuration statements.
pub trait Record: Default + 'static {
    /// Descriptor table, one entry per settable field
    const FIELDS: &'static [FieldDef<Self>];

    /// Where the section name goes, for named sections
    const NAME_FIELD: Option<NameAccessor<Self>> = None;
}

/// Object-safe field resolution, what the parser actually holds.
///
/// Lookup is case-insensitive; primary names win over aliases.
pub trait Bind {
    fn lookup(&mut self, name: &str) -> Result<FieldMut<'_>, BindError>;
}

impl<R: Record> Bind for R {
    fn lookup(&mut self, name: &str) -> Result<FieldMut<'_>, BindError> {
        let idx = R::FIELDS
            .iter()
            .position(|def| def.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                R::FIELDS.iter().position(|def| {
                    def.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
                })
            })
            .ok_or_else(|| BindError::unknown_field(name))?;
        Ok((R::FIELDS[idx].bind)(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct Server {
        dir: String,
        attrs: Vec<String>,
    }

    impl Record for Server {
        const FIELDS: &'static [FieldDef<Self>] = &[
            FieldDef::with_aliases("dir", &["folder", "directory"], |r| {
                FieldMut::scalar(&mut r.dir)
            }),
            FieldDef::new("attr", |r| FieldMut::list(&mut r.attrs)),
        ];
    }

    fn set(server: &mut Server, key: &str, value: &str) -> Result<(), BindError> {
        match server.lookup(key)? {
            FieldMut::Value(mut slot) => {
                slot.set(value).unwrap();
                Ok(())
            }
            FieldMut::Section(_) => panic!("not a section"),
        }
    }

    #[test]
    fn test_lookup_primary_and_alias() {
        let mut server = Server::default();
        set(&mut server, "dir", "/var/a").unwrap();
        assert_eq!(server.dir, "/var/a");
        set(&mut server, "directory", "/var/b").unwrap();
        assert_eq!(server.dir, "/var/b");
        set(&mut server, "FOLDER", "/var/c").unwrap();
        assert_eq!(server.dir, "/var/c");
    }

    #[test]
    fn test_lookup_unknown_field() {
        let mut server = Server::default();
        let Err(err) = server.lookup("bogus") else {
            panic!("lookup of unknown field succeeded");
        };
        assert_matches!(err, BindError::UnknownField { ref name } if name == "bogus");
        assert_eq!(err.to_string(), "unknown field bogus");
    }
}
