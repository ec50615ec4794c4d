//! Value conversion

pub mod convert;
pub mod domain;

pub use convert::{ConvertError, FromText};
pub use domain::{parse_duration, Endpoint, IpNet};
