//! Text-to-value conversion
//!
//! Every field type the binder can target implements [`FromText`]. The
//! trait is also the extension hook: a host crate implements it for its
//! own types and they become usable as field types with no further
//! registration.

use std::path::PathBuf;

/// Value conversion failures. The message is what ends up in the
/// diagnostic, so variants speak the user's language, not the parser's.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("not a boolean value")]
    NotBoolean,

    #[error("not an integer value: {0}")]
    Int(std::num::ParseIntError),

    #[error("not a numeric value: {0}")]
    Float(std::num::ParseFloatError),

    #[error("value out of range")]
    OutOfRange,

    #[error("bad quoted string")]
    BadQuote,

    #[error("not an ip address: {0}")]
    Addr(std::net::AddrParseError),

    #[error("bad network prefix {text}")]
    BadCidr { text: String },

    #[error("bad port in {text}")]
    BadPort { text: String },

    #[error("bad duration {text}")]
    BadDuration { text: String },

    #[error("{0}")]
    Message(String),
}

impl ConvertError {
    /// Failure with a caller-supplied message, for custom [`FromText`]
    /// implementations.
    pub fn custom(message: impl Into<String>) -> Self {
        ConvertError::Message(message.into())
    }
}

/// Construct a value from raw token text.
pub trait FromText: Sized {
    /// Marker for boolean-like fields; a bare field name with no value
    /// is shorthand for `true` on these.
    const IS_BOOL: bool = false;

    fn from_text(text: &str) -> Result<Self, ConvertError>;
}

/// Split a trailing decimal size suffix off integer text.
/// `k`, `m`, `g`, `t` scale by powers of a thousand.
fn split_suffix(text: &str) -> (&str, u64) {
    match text.as_bytes().last() {
        Some(b'k') | Some(b'K') => (&text[..text.len() - 1], 1_000),
        Some(b'm') | Some(b'M') => (&text[..text.len() - 1], 1_000_000),
        Some(b'g') | Some(b'G') => (&text[..text.len() - 1], 1_000_000_000),
        Some(b't') | Some(b'T') => (&text[..text.len() - 1], 1_000_000_000_000),
        _ => (text, 1),
    }
}

/// Split a radix prefix (`0x`, `0o`, `0b`) off integer text, keeping a
/// leading sign in the digits.
fn split_radix(text: &str) -> (u32, String) {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = body.strip_prefix(prefix) {
            return (radix, format!("{}{}", sign, digits));
        }
    }
    (10, text.to_string())
}

fn parse_u64(text: &str) -> Result<u64, ConvertError> {
    let (digits, mult) = split_suffix(text);
    let (radix, digits) = split_radix(digits);
    let value = u64::from_str_radix(&digits, radix).map_err(ConvertError::Int)?;
    value.checked_mul(mult).ok_or(ConvertError::OutOfRange)
}

fn parse_i64(text: &str) -> Result<i64, ConvertError> {
    let (digits, mult) = split_suffix(text);
    let (radix, digits) = split_radix(digits);
    let value = i64::from_str_radix(&digits, radix).map_err(ConvertError::Int)?;
    value
        .checked_mul(i64::try_from(mult).map_err(|_| ConvertError::OutOfRange)?)
        .ok_or(ConvertError::OutOfRange)
}

macro_rules! impl_from_text_uint {
    ($($ty:ty),+) => {$(
        impl FromText for $ty {
            fn from_text(text: &str) -> Result<Self, ConvertError> {
                <$ty>::try_from(parse_u64(text)?).map_err(|_| ConvertError::OutOfRange)
            }
        }
    )+};
}

macro_rules! impl_from_text_int {
    ($($ty:ty),+) => {$(
        impl FromText for $ty {
            fn from_text(text: &str) -> Result<Self, ConvertError> {
                <$ty>::try_from(parse_i64(text)?).map_err(|_| ConvertError::OutOfRange)
            }
        }
    )+};
}

impl_from_text_uint!(u8, u16, u32, u64, usize);
impl_from_text_int!(i8, i16, i32, i64, isize);

impl FromText for f64 {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        let (digits, mult) = split_suffix(text);
        let value: f64 = digits.parse().map_err(ConvertError::Float)?;
        Ok(value * mult as f64)
    }
}

impl FromText for f32 {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        f64::from_text(text).map(|v| v as f32)
    }
}

impl FromText for bool {
    const IS_BOOL: bool = true;

    fn from_text(text: &str) -> Result<Self, ConvertError> {
        match text.to_ascii_lowercase().as_str() {
            "n" | "no" | "f" | "false" | "off" => Ok(false),
            "y" | "yes" | "t" | "true" | "on" | "" => Ok(true),
            _ => Err(ConvertError::NotBoolean),
        }
    }
}

/// Undo the escapes in a double-quoted token.
fn unquote(text: &str) -> Result<String, ConvertError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ConvertError::BadQuote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            _ => return Err(ConvertError::BadQuote),
        }
    }
    Ok(out)
}

impl FromText for String {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        if text.starts_with('"') {
            unquote(text)
        } else {
            Ok(text.to_string())
        }
    }
}

impl FromText for PathBuf {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        String::from_text(text).map(PathBuf::from)
    }
}
