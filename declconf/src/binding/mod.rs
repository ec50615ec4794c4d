//! Schema-driven record binding

pub mod field;
pub mod record;

pub use field::{FieldMut, SectionSlot, ValueSlot};
pub use record::{Bind, BindError, FieldDef, NameAccessor, Record};
