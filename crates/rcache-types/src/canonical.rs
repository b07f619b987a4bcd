//! Canonical text rendering of call arguments and results.
//!
//! History logs store every call as text: the argument tuple is rendered as
//! `(a,)` / `(a, b)` with each argument in its quoted [`Canonical::repr`]
//! form, and the result in its [`Canonical::plain`] form. Replay prints these
//! strings back verbatim, so the rendering must be deterministic.

use crate::key::EntryKey;

/// Deterministic text forms of a value.
pub trait Canonical {
    /// Unambiguous form, quoting text and prefixing byte strings with `b`.
    fn repr(&self) -> String;

    /// Form used when the value is the result of a call. Defaults to
    /// [`repr`](Canonical::repr).
    fn plain(&self) -> String {
        self.repr()
    }
}

/// Positional arguments of an instrumented operation.
pub trait ArgTuple {
    /// Canonical forms of each positional argument, in order.
    fn reprs(&self) -> Vec<String>;

    /// The whole argument tuple, e.g. `('a',)`.
    fn render(&self) -> String {
        render_tuple(&self.reprs())
    }
}

/// Render already-canonical items as a tuple literal.
///
/// A single item keeps its trailing comma so `(x,)` is never confused with a
/// parenthesized expression.
pub fn render_tuple(items: &[String]) -> String {
    match items {
        [] => "()".to_string(),
        [only] => format!("({only},)"),
        many => format!("({})", many.join(", ")),
    }
}

impl ArgTuple for () {
    fn reprs(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<A: Canonical> ArgTuple for (A,) {
    fn reprs(&self) -> Vec<String> {
        vec![self.0.repr()]
    }
}

impl<A: Canonical, B: Canonical> ArgTuple for (A, B) {
    fn reprs(&self) -> Vec<String> {
        vec![self.0.repr(), self.1.repr()]
    }
}

impl Canonical for i64 {
    fn repr(&self) -> String {
        self.to_string()
    }
}

impl Canonical for f64 {
    fn repr(&self) -> String {
        render_float(*self)
    }
}

impl Canonical for str {
    fn repr(&self) -> String {
        let quote = pick_quote(self.contains('\''), self.contains('"'));
        let mut out = String::with_capacity(self.len() + 2);
        out.push(quote);
        for c in self.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if !is_printable(c) => out.push_str(&escape_code_point(c)),
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }

    fn plain(&self) -> String {
        self.to_string()
    }
}

impl Canonical for String {
    fn repr(&self) -> String {
        self.as_str().repr()
    }

    fn plain(&self) -> String {
        self.clone()
    }
}

impl Canonical for [u8] {
    fn repr(&self) -> String {
        let quote = pick_quote(self.contains(&b'\''), self.contains(&b'"'));
        let mut out = String::with_capacity(self.len() + 3);
        out.push('b');
        out.push(quote);
        for &b in self {
            match b {
                b'\\' => out.push_str("\\\\"),
                b'\n' => out.push_str("\\n"),
                b'\r' => out.push_str("\\r"),
                b'\t' => out.push_str("\\t"),
                b if b as char == quote => {
                    out.push('\\');
                    out.push(quote);
                }
                0x20..=0x7e => out.push(b as char),
                b => out.push_str(&format!("\\x{b:02x}")),
            }
        }
        out.push(quote);
        out
    }
}

impl Canonical for Vec<u8> {
    fn repr(&self) -> String {
        self.as_slice().repr()
    }
}

impl Canonical for EntryKey {
    fn repr(&self) -> String {
        self.to_string().repr()
    }

    fn plain(&self) -> String {
        self.to_string()
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn repr(&self) -> String {
        (**self).repr()
    }

    fn plain(&self) -> String {
        (**self).plain()
    }
}

/// Shortest round-trip rendering of a float.
///
/// Integral values keep a `.0` suffix; magnitudes outside `[1e-4, 1e16)` use
/// exponent form with an explicit sign and at least two exponent digits.
pub(crate) fn render_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{f:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            None => sci,
        };
    }

    let mut out = f.to_string();
    if !out.contains('.') {
        out.push_str(".0");
    }
    out
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

/// Whether `c` is written as-is inside quoted text.
///
/// Control and format characters and every separator except the ASCII
/// space are escaped.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control() || c.is_whitespace() || is_format(c))
}

/// Unicode format characters (general category Cf).
fn is_format(c: char) -> bool {
    matches!(
        c as u32,
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x0890..=0x0891
            | 0x08E2
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0x110BD
            | 0x110CD
            | 0x13430..=0x1343F
            | 0x1BCA0..=0x1BCA3
            | 0x1D173..=0x1D17A
            | 0xE0001
            | 0xE0020..=0xE007F
    )
}

fn escape_code_point(c: char) -> String {
    let code = c as u32;
    if code <= 0xff {
        format!("\\x{code:02x}")
    } else if code <= 0xffff {
        format!("\\u{code:04x}")
    } else {
        format!("\\U{code:08x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Tuples
    // -----------------------------------------------------------------------

    #[test]
    fn single_argument_tuple_keeps_trailing_comma() {
        assert_eq!(("a",).render(), "('a',)");
        assert_eq!((3.5f64,).render(), "(3.5,)");
        assert_eq!((42i64,).render(), "(42,)");
    }

    #[test]
    fn multi_argument_tuple_is_comma_separated() {
        assert_eq!(("k", 1i64).render(), "('k', 1)");
        assert_eq!(().render(), "()");
    }

    // -----------------------------------------------------------------------
    // Floats
    // -----------------------------------------------------------------------

    #[test]
    fn floats_keep_fraction_marker() {
        assert_eq!(render_float(3.5), "3.5");
        assert_eq!(render_float(1.0), "1.0");
        assert_eq!(render_float(0.0), "0.0");
        assert_eq!(render_float(-0.0), "-0.0");
        assert_eq!(render_float(0.1), "0.1");
        assert_eq!(render_float(1e15), "1000000000000000.0");
        assert_eq!(render_float(0.0001), "0.0001");
    }

    #[test]
    fn extreme_floats_use_signed_exponent() {
        assert_eq!(render_float(1e16), "1e+16");
        assert_eq!(render_float(1.5e-5), "1.5e-05");
        assert_eq!(render_float(-2.5e300), "-2.5e+300");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(render_float(f64::NAN), "nan");
        assert_eq!(render_float(f64::INFINITY), "inf");
        assert_eq!(render_float(f64::NEG_INFINITY), "-inf");
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    #[test]
    fn text_uses_single_quotes_by_default() {
        assert_eq!("hello".repr(), "'hello'");
        assert_eq!("say \"hi\"".repr(), "'say \"hi\"'");
    }

    #[test]
    fn text_with_only_single_quote_switches_to_double() {
        assert_eq!("it's".repr(), "\"it's\"");
    }

    #[test]
    fn text_with_both_quotes_escapes_single() {
        assert_eq!("it's \"x\"".repr(), "'it\\'s \"x\"'");
    }

    #[test]
    fn text_escapes_control_characters() {
        assert_eq!("a\nb\tc\\".repr(), "'a\\nb\\tc\\\\'");
        assert_eq!("\u{1}".repr(), "'\\x01'");
        assert_eq!("é".repr(), "'é'");
    }

    #[test]
    fn text_escapes_separators_and_format_characters() {
        assert_eq!("a\u{a0}b".repr(), "'a\\xa0b'");
        assert_eq!("a\u{2028}b".repr(), "'a\\u2028b'");
        assert_eq!("a\u{200b}b".repr(), "'a\\u200bb'");
        assert_eq!("\u{feff}".repr(), "'\\ufeff'");
        assert_eq!("\u{e0001}".repr(), "'\\U000e0001'");
        assert_eq!("a b".repr(), "'a b'");
        assert_eq!("日本".repr(), "'日本'");
    }

    // -----------------------------------------------------------------------
    // Bytes
    // -----------------------------------------------------------------------

    #[test]
    fn bytes_render_with_prefix_and_hex_escapes() {
        assert_eq!(b"abc".as_slice().repr(), "b'abc'");
        assert_eq!([0u8, 0x9f, 0xff].as_slice().repr(), "b'\\x00\\x9f\\xff'");
        assert_eq!(b"it's".as_slice().repr(), "b\"it's\"");
        assert_eq!(b"a\nb".as_slice().repr(), "b'a\\nb'");
    }

    // -----------------------------------------------------------------------
    // Entry keys
    // -----------------------------------------------------------------------

    #[test]
    fn entry_key_plain_is_bare_text() {
        let key = EntryKey::new();
        assert_eq!(key.plain(), key.to_string());
        assert_eq!(key.repr(), format!("'{key}'"));
    }
}
