//! Field write access
//!
//! A [`FieldMut`] is the parser's handle on one field of the record being
//! filled in. Value fields accept token text through a [`ValueSlot`];
//! section fields hand out a nested binder through a [`SectionSlot`].
//! Shape adapters (plain, optional, list) are private; records describe
//! their fields with the constructors on [`FieldMut`].

use super::record::{Bind, Record};
use crate::value::{ConvertError, FromText};

/// Write access to a value-shaped field.
pub trait ValueSlot {
    /// Convert `text` and store it. List shapes append, optional shapes
    /// replace.
    fn set(&mut self, text: &str) -> Result<(), ConvertError>;

    /// Boolean-like fields allow the bare-name shorthand for `true`
    fn is_bool(&self) -> bool {
        false
    }

    /// List fields accept comma-continued value runs
    fn is_list(&self) -> bool {
        false
    }
}

/// Write access to a section-shaped field.
pub trait SectionSlot {
    /// Whether this section declares a name key and therefore requires a
    /// name token after the section keyword.
    fn requires_name(&self) -> bool;

    /// Start (or re-open) a section element and return a binder for its
    /// body. Named list elements merge with an existing element of the
    /// same name; unnamed list elements append, or merge with the last
    /// element when `merge_unnamed` is set.
    fn open(&mut self, name: Option<&str>, merge_unnamed: bool) -> &mut dyn Bind;
}

struct Scalar<'a, T: FromText>(&'a mut T);

impl<T: FromText> ValueSlot for Scalar<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), ConvertError> {
        *self.0 = T::from_text(text)?;
        Ok(())
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

struct OptionalScalar<'a, T: FromText>(&'a mut Option<T>);

impl<T: FromText> ValueSlot for OptionalScalar<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), ConvertError> {
        *self.0 = Some(T::from_text(text)?);
        Ok(())
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

struct ListScalar<'a, T: FromText>(&'a mut Vec<T>);

impl<T: FromText> ValueSlot for ListScalar<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), ConvertError> {
        self.0.push(T::from_text(text)?);
        Ok(())
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }

    fn is_list(&self) -> bool {
        true
    }
}

struct NestedRecord<'a, R: Record>(&'a mut R);

impl<R: Record> SectionSlot for NestedRecord<'_, R> {
    fn requires_name(&self) -> bool {
        R::NAME_FIELD.is_some()
    }

    fn open(&mut self, name: Option<&str>, _merge_unnamed: bool) -> &mut dyn Bind {
        if let (Some(accessor), Some(name)) = (R::NAME_FIELD, name) {
            (accessor.set)(self.0, name);
        }
        self.0
    }
}

struct OptionalRecord<'a, R: Record>(&'a mut Option<R>);

impl<R: Record> SectionSlot for OptionalRecord<'_, R> {
    fn requires_name(&self) -> bool {
        R::NAME_FIELD.is_some()
    }

    fn open(&mut self, name: Option<&str>, _merge_unnamed: bool) -> &mut dyn Bind {
        let record = self.0.get_or_insert_with(R::default);
        if let (Some(accessor), Some(name)) = (R::NAME_FIELD, name) {
            (accessor.set)(record, name);
        }
        record
    }
}

struct RecordList<'a, R: Record>(&'a mut Vec<R>);

impl<R: Record> SectionSlot for RecordList<'_, R> {
    fn requires_name(&self) -> bool {
        R::NAME_FIELD.is_some()
    }

    fn open(&mut self, name: Option<&str>, merge_unnamed: bool) -> &mut dyn Bind {
        match (R::NAME_FIELD, name) {
            (Some(accessor), Some(name)) => {
                // Re-opening a section with a known name merges into the
                // existing element.
                let found = self.0.iter().position(|r| (accessor.get)(r) == name);
                let idx = match found {
                    Some(idx) => idx,
                    None => {
                        let mut record = R::default();
                        (accessor.set)(&mut record, name);
                        self.0.push(record);
                        self.0.len() - 1
                    }
                };
                &mut self.0[idx]
            }
            _ => {
                if !merge_unnamed || self.0.is_empty() {
                    self.0.push(R::default());
                }
                let idx = self.0.len() - 1;
                &mut self.0[idx]
            }
        }
    }
}

/// The parser's handle on one field.
pub enum FieldMut<'a> {
    Value(Box<dyn ValueSlot + 'a>),
    Section(Box<dyn SectionSlot + 'a>),
}

impl<'a> FieldMut<'a> {
    /// A plain value field
    pub fn scalar<T: FromText>(slot: &'a mut T) -> Self {
        FieldMut::Value(Box::new(Scalar(slot)))
    }

    /// An optional value field; assignment replaces
    pub fn optional<T: FromText>(slot: &'a mut Option<T>) -> Self {
        FieldMut::Value(Box::new(OptionalScalar(slot)))
    }

    /// A list value field; assignment appends
    pub fn list<T: FromText>(slot: &'a mut Vec<T>) -> Self {
        FieldMut::Value(Box::new(ListScalar(slot)))
    }

    /// A nested section field
    pub fn record<R: Record>(slot: &'a mut R) -> Self {
        FieldMut::Section(Box::new(NestedRecord(slot)))
    }

    /// An optional section field, created on first open
    pub fn optional_record<R: Record>(slot: &'a mut Option<R>) -> Self {
        FieldMut::Section(Box::new(OptionalRecord(slot)))
    }

    /// A repeatable section field
    pub fn record_list<R: Record>(slot: &'a mut Vec<R>) -> Self {
        FieldMut::Section(Box::new(RecordList(slot)))
    }

    pub fn is_section(&self) -> bool {
        matches!(self, FieldMut::Section(_))
    }
}
