//! The two scalar codecs.
//!
//! The native text grammar and XML attribute strings detect types by
//! different rules, so each context gets its own parse/format pair. They
//! are deliberately not unified: the native grammar quotes strings and
//! only accepts `\d+.\d+` floats, while XML attributes are never quoted
//! and accept anything `f64` does.

use std::sync::LazyLock;

use regex::Regex;

use crate::tree::Scalar;

static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").unwrap());

/// Parse a scalar literal from the native grammar.
///
/// Infallible: anything that is not a boolean, integer, decimal, or
/// quoted string is a bare string, returned verbatim after trimming.
/// Bare strings carry no marker, so they come back single-quoted when
/// formatted — one round trip quotes them, after which they are stable.
pub fn parse_native(raw: &str) -> Scalar {
    let val = raw.trim();
    if val.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if val.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    if INT_RE.is_match(val) {
        // Overflowing digit runs fall through to the string catch-all.
        if let Ok(n) = val.parse::<i64>() {
            return Scalar::Int(n);
        }
    }
    if FLOAT_RE.is_match(val) {
        if let Ok(f) = val.parse::<f64>() {
            return Scalar::Float(f);
        }
    }
    if val.len() >= 2 && val.starts_with('\'') && val.ends_with('\'') {
        return Scalar::String(val[1..val.len() - 1].to_string());
    }
    Scalar::String(val.to_string())
}

/// Format a scalar as a native grammar literal. Strings are wrapped in
/// single quotes; everything else renders in canonical form.
pub fn format_native(value: &Scalar) -> String {
    match value {
        Scalar::String(s) => format!("'{}'", s),
        other => format_bare(other),
    }
}

/// Parse an XML attribute string. No quoting rules apply in this
/// context; a failed numeric parse falls back to the raw string.
pub fn parse_xml_attr(raw: &str) -> Scalar {
    if raw.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return Scalar::Float(f);
        }
    } else if let Ok(n) = raw.parse::<i64>() {
        return Scalar::Int(n);
    }
    Scalar::String(raw.to_string())
}

/// Format a scalar for an XML attribute: canonical form, never quoted.
pub fn format_xml_attr(value: &Scalar) -> String {
    match value {
        Scalar::String(s) => s.clone(),
        other => format_bare(other),
    }
}

fn format_bare(value: &Scalar) -> String {
    match value {
        Scalar::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => format_float(*f),
        Scalar::String(s) => s.clone(),
    }
}

/// Render a float so it always keeps a decimal point. Without this a
/// whole-valued float would re-parse as an integer.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
