//! Conversions between raw ini text and the supported value types.
//!
//! Supported types are `String`, `i32`, `f32`, `f64` and `bool`. Numbers
//! are read leniently: the longest decimal prefix is used and trailing text
//! is ignored, so `"42ms"` reads as `42`. Text without any numeric prefix
//! does not convert and the caller falls back to its default, as does a
//! number outside the range of the target type (`"1e39"` for `f32`).
//! Spelled-out `inf` and `nan` are accepted; values too small for the type
//! round to zero.

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for str {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
    impl<T: Sealed + ?Sized> Sealed for &T {}
}

/// A type that can be read from a raw ini value.
pub trait FromIniValue: Sized + sealed::Sealed {
    /// Convert non-empty raw text. `None` means the text holds no value of
    /// this type.
    fn from_raw(raw: &str) -> Option<Self>;
}

/// A type that can be written as a raw ini value.
pub trait ToIniValue: sealed::Sealed {
    fn to_raw(&self) -> String;
}

impl FromIniValue for String {
    fn from_raw(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromIniValue for i32 {
    fn from_raw(raw: &str) -> Option<Self> {
        int_prefix(raw).parse().ok()
    }
}

impl FromIniValue for f32 {
    fn from_raw(raw: &str) -> Option<Self> {
        let text = float_prefix(raw);
        let value: f32 = text.parse().ok()?;
        (value.is_finite() || is_special_float(text)).then_some(value)
    }
}

impl FromIniValue for f64 {
    fn from_raw(raw: &str) -> Option<Self> {
        let text = float_prefix(raw);
        let value: f64 = text.parse().ok()?;
        (value.is_finite() || is_special_float(text)).then_some(value)
    }
}

impl FromIniValue for bool {
    fn from_raw(raw: &str) -> Option<Self> {
        Some(raw == "true" || raw == "1")
    }
}

impl ToIniValue for String {
    fn to_raw(&self) -> String {
        self.clone()
    }
}

impl ToIniValue for str {
    fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl ToIniValue for i32 {
    fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl ToIniValue for f32 {
    fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl ToIniValue for f64 {
    fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl ToIniValue for bool {
    fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl<T: ToIniValue + ?Sized> ToIniValue for &T {
    fn to_raw(&self) -> String {
        (**self).to_raw()
    }
}

/// Optional sign followed by decimal digits. Empty when there is no digit.
fn int_prefix(raw: &str) -> &str {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = start + count_digits(&bytes[start..]);
    if end == start {
        return "";
    }
    &s[..end]
}

/// Longest prefix shaped like a decimal float, `inf` or `nan`.
/// Empty when the text does not start with one.
fn float_prefix(raw: &str) -> &str {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let rest = &s[end..];
    for word in ["infinity", "inf", "nan"] {
        if rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
        {
            return &s[..end + word.len()];
        }
    }

    let mut digits = count_digits(&bytes[end..]);
    end += digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction = count_digits(&bytes[end + 1..]);
        digits += fraction;
        end += 1 + fraction;
    }
    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    &s[..end]
}

/// `inf`, `infinity` or `nan` with an optional sign. Digits only ever
/// overflow to infinity.
fn is_special_float(text: &str) -> bool {
    !text.bytes().any(|b| b.is_ascii_digit())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_conversion() {
        assert_eq!(i32::from_raw("1"), Some(1));
        assert_eq!(i32::from_raw("-1"), Some(-1));
        assert_eq!(i32::from_raw("+7"), Some(7));
        assert_eq!(i32::from_raw("42ms"), Some(42));
        assert_eq!(i32::from_raw("3.9"), Some(3));
        assert_eq!(i32::from_raw("abc"), None);
        assert_eq!(i32::from_raw("-"), None);
        assert_eq!(i32::from_raw("99999999999"), None);
    }

    #[test]
    fn float_conversion() {
        assert_eq!(f32::from_raw("1.1"), Some(1.1));
        assert_eq!(f32::from_raw("-1.1"), Some(-1.1));
        assert_eq!(f64::from_raw("1.1"), Some(1.1));
        assert_eq!(f64::from_raw("1.5e3x"), Some(1500.0));
        assert_eq!(f64::from_raw("2e"), Some(2.0));
        assert_eq!(f64::from_raw(".5"), Some(0.5));
        assert_eq!(f64::from_raw("7."), Some(7.0));
        assert_eq!(f64::from_raw("1.0.0"), Some(1.0));
        assert_eq!(f64::from_raw("-inf"), Some(f64::NEG_INFINITY));
        assert!(f64::from_raw("NaN").is_some_and(f64::is_nan));
        assert_eq!(f64::from_raw("."), None);
        assert_eq!(f64::from_raw("x1"), None);
        assert_eq!(f64::from_raw("é"), None);
    }

    #[test]
    fn float_overflow_does_not_convert() {
        assert_eq!(f32::from_raw("1e39"), None);
        assert_eq!(f32::from_raw("-1e39"), None);
        assert_eq!(f32::from_raw("1e38"), Some(1e38));
        assert_eq!(f64::from_raw("1e39"), Some(1e39));
        assert_eq!(f64::from_raw("2e308"), None);
        assert_eq!(f32::from_raw("inf"), Some(f32::INFINITY));
        assert_eq!(f32::from_raw("-Infinity"), Some(f32::NEG_INFINITY));
        assert_eq!(f32::from_raw("1e-50"), Some(0.0));
    }

    #[test]
    fn bool_conversion() {
        assert_eq!(bool::from_raw("true"), Some(true));
        assert_eq!(bool::from_raw("1"), Some(true));
        assert_eq!(bool::from_raw("0"), Some(false));
        assert_eq!(bool::from_raw("false"), Some(false));
        assert_eq!(bool::from_raw("TRUE"), Some(false));
        assert_eq!(bool::from_raw("yes"), Some(false));
    }

    #[test]
    fn string_conversion_is_verbatim() {
        assert_eq!(String::from_raw("te st"), Some("te st".to_string()));
    }

    #[test]
    fn raw_forms() {
        assert_eq!(1i32.to_raw(), "1");
        assert_eq!(1.5f64.to_raw(), "1.5");
        assert_eq!(2.2f32.to_raw(), "2.2");
        assert_eq!(true.to_raw(), "true");
        assert_eq!("value".to_raw(), "value");
        assert_eq!((&String::from("v")).to_raw(), "v");
    }
}
