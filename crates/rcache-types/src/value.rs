use bytes::Bytes;
use serde::Serialize;

use crate::canonical::{render_float, Canonical};

/// A value accepted by the cache.
///
/// Values are encoded to raw bytes on write. Reads hand back those bytes
/// uninterpreted, so a stored `Value::Int(614)` reads back as `b"614"`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Raw bytes written to the backend.
    ///
    /// Integers and floats are stored as their canonical text so they can be
    /// read back with [`lossy_int`] or parsed as text.
    pub fn encode(&self) -> Bytes {
        match self {
            Self::Int(i) => Bytes::from(i.to_string()),
            Self::Float(f) => Bytes::from(render_float(*f)),
            Self::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            Self::Bytes(b) => Bytes::copy_from_slice(b),
        }
    }

    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl Canonical for Value {
    fn repr(&self) -> String {
        match self {
            Self::Int(i) => i.repr(),
            Self::Float(f) => f.repr(),
            Self::Text(s) => s.repr(),
            Self::Bytes(b) => b.as_slice().repr(),
        }
    }

    fn plain(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            other => other.repr(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

/// Decode raw bytes as a decimal integer, falling back to `0`.
///
/// Surrounding whitespace, a leading sign and single underscores between
/// digits are accepted. Invalid UTF-8, any other text and out-of-range
/// numbers all yield `0`.
pub fn lossy_int(raw: &[u8]) -> i64 {
    std::str::from_utf8(raw)
        .ok()
        .and_then(parse_int)
        .unwrap_or(0)
}

fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }
    if digits.contains("__") {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return None;
    }
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    #[test]
    fn scalars_encode_as_text() {
        assert_eq!(Value::from(614).encode(), Bytes::from_static(b"614"));
        assert_eq!(Value::from(-3).encode(), Bytes::from_static(b"-3"));
        assert_eq!(Value::from(3.5).encode(), Bytes::from_static(b"3.5"));
        assert_eq!(Value::from(2.0).encode(), Bytes::from_static(b"2.0"));
    }

    #[test]
    fn text_and_bytes_encode_verbatim() {
        assert_eq!(Value::from("héllo").encode(), Bytes::from("héllo"));
        assert_eq!(
            Value::from(&[0u8, 159, 255]).encode(),
            Bytes::from_static(&[0, 159, 255])
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::from(1).kind(), "int");
        assert_eq!(Value::from(1.0).kind(), "float");
        assert_eq!(Value::from("x").kind(), "text");
        assert_eq!(Value::from(vec![1u8]).kind(), "bytes");
    }

    // -----------------------------------------------------------------------
    // Canonical forms
    // -----------------------------------------------------------------------

    #[test]
    fn repr_quotes_text_but_plain_does_not() {
        let v = Value::from("a");
        assert_eq!(v.repr(), "'a'");
        assert_eq!(v.plain(), "a");
    }

    #[test]
    fn plain_of_bytes_keeps_prefix() {
        let v = Value::from(b"hi");
        assert_eq!(v.plain(), "b'hi'");
    }

    // -----------------------------------------------------------------------
    // Lossy integer decoding
    // -----------------------------------------------------------------------

    #[test]
    fn lossy_int_parses_plain_decimal() {
        assert_eq!(lossy_int(b"614"), 614);
        assert_eq!(lossy_int(b"-12"), -12);
        assert_eq!(lossy_int(b"+7"), 7);
        assert_eq!(lossy_int(b"  42\n"), 42);
    }

    #[test]
    fn lossy_int_accepts_digit_separators() {
        assert_eq!(lossy_int(b"1_000"), 1000);
        assert_eq!(lossy_int(b"_1"), 0);
        assert_eq!(lossy_int(b"1__0"), 0);
        assert_eq!(lossy_int(b"1_"), 0);
    }

    #[test]
    fn lossy_int_falls_back_to_zero() {
        assert_eq!(lossy_int(b"abc"), 0);
        assert_eq!(lossy_int(b"3.5"), 0);
        assert_eq!(lossy_int(b""), 0);
        assert_eq!(lossy_int(b"-"), 0);
        assert_eq!(lossy_int(&[0xff, 0xfe]), 0);
        assert_eq!(lossy_int(b"99999999999999999999999"), 0);
    }

    proptest! {
        #[test]
        fn lossy_int_recovers_any_stored_integer(n in any::<i64>()) {
            prop_assert_eq!(lossy_int(&Value::Int(n).encode()), n);
        }

        #[test]
        fn lossy_int_never_panics(raw in proptest::collection::vec(any::<u8>(), 0..32)) {
            let _ = lossy_int(&raw);
        }

        #[test]
        fn alphabetic_text_reads_as_zero(s in "[a-zA-Z]{1,16}") {
            prop_assert_eq!(lossy_int(s.as_bytes()), 0);
        }
    }
}
