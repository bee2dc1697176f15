//! Locale-independent literal formatting.

use sl_tree::Literal;

/// Formats a float so it always reads back as a floating-point literal.
///
/// Uses Rust's shortest round-trip representation (never the host locale, never an exponent)
/// and appends `.0` to integral values.
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        return "(0.0 / 0.0)".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "(1.0 / 0.0)".to_owned()
        } else {
            "(-1.0 / 0.0)".to_owned()
        };
    }
    let mut s = format!("{value}");
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

pub fn format_literal(literal: &Literal) -> String {
    match *literal {
        Literal::Float(v) => format_float(v),
        Literal::Int(v) => v.to_string(),
        Literal::Uint(v) => v.to_string(),
        Literal::Bool(v) => if v { "true" } else { "false" }.to_owned(),
    }
}
