//! Literal renderer: primitive values to literal AST nodes.
//!
//! Every function here is infallible and locale-independent. The text stored
//! in the node is exactly what ends up in the query.

use chrono::{DateTime, NaiveDate, Offset, TimeZone, Timelike};

use crate::ast::Expr;

/// `NULL`
pub fn null() -> Expr {
    Expr::Null
}

/// STRING literal.
pub fn string(v: &str) -> Expr {
    Expr::String(v.to_string())
}

/// BYTES literal. Escaping happens when the node is rendered.
pub fn bytes(v: &[u8]) -> Expr {
    Expr::Bytes(v.to_vec())
}

/// INT64 literal in base 10.
pub fn int(v: i64) -> Expr {
    Expr::Int(v.to_string())
}

/// BOOL literal.
pub fn boolean(v: bool) -> Expr {
    Expr::Bool(v)
}

/// FLOAT64 literal.
pub fn float(v: f64) -> Expr {
    Expr::Float(format_float(v))
}

/// FLOAT64 literal from an `f32`, keeping the shortest `f32` digits.
pub fn float32(v: f32) -> Expr {
    let text = if v.is_nan() || v.is_infinite() {
        format_float(f64::from(v))
    } else {
        normalize_exponent(format!("{v:e}"))
    };
    Expr::Float(text)
}

/// TIMESTAMP literal.
pub fn timestamp<Tz: TimeZone>(v: &DateTime<Tz>) -> Expr {
    Expr::Timestamp(format_timestamp(v))
}

/// DATE literal.
pub fn date(v: &NaiveDate) -> Expr {
    Expr::Date(v.format("%Y-%m-%d").to_string())
}

/// ARRAY literal. Element types are not checked.
pub fn array(values: Vec<Expr>) -> Expr {
    Expr::Array(values)
}

/// Format a float as shortest round-trip scientific notation.
///
/// `1.0` → `1e+00`, `31.5` → `3.15e+01`, NaN → `NaN`, ±∞ → `+Inf` / `-Inf`.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    normalize_exponent(format!("{v:e}"))
}

// `{:e}` prints `3.15e1`; the exponent needs a sign and at least two digits.
fn normalize_exponent(raw: String) -> String {
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Format a timestamp as RFC 3339 with up to nanosecond precision.
///
/// Trailing zeros of the fraction are dropped, and a zero UTC offset is
/// written as `Z` regardless of the time zone type.
pub fn format_timestamp<Tz: TimeZone>(v: &DateTime<Tz>) -> String {
    let offset = v.offset().fix().local_minus_utc();
    let local = v.naive_local();

    let mut out = local.format("%Y-%m-%dT%H:%M:%S").to_string();
    // Leap seconds are carried as nanos >= 1e9.
    let nanos = local.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    if offset == 0 {
        out.push('Z');
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let abs = offset.unsigned_abs();
        out.push_str(&format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60));
    }
    out
}
