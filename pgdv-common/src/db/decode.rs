//! Text-format value decoding
//!
//! Queries run over the simple query protocol, so PostgreSQL sends every
//! column as text. The column's type name decides how that text becomes a
//! JSON value for comparison and display.

use serde_json::{Number, Value};

/// Convert one text-format column value into JSON
pub fn text_to_json(type_name: &str, text: Option<&str>) -> Value {
    let Some(text) = text else {
        return Value::Null;
    };

    match type_name {
        "BOOL" => match text {
            "t" => Value::Bool(true),
            "f" => Value::Bool(false),
            other => Value::String(other.to_string()),
        },
        "INT2" | "INT4" | "INT8" | "OID" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        "FLOAT4" | "FLOAT8" | "NUMERIC" => {
            parse_number(text).map(Value::Number).unwrap_or_else(|| Value::String(text.to_string()))
        }
        "JSON" | "JSONB" => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => Value::String(text.to_string()),
    }
}

/// Parse a numeric literal, keeping integers exact where they fit.
///
/// `NaN` and the infinities have no JSON form and return `None`.
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(Number::from(u));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
