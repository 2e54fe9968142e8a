//! Argument value coercion, schema-guided and heuristic.
//!
//! The XML strategy starts from raw tag text and coerces strings toward a
//! declared type; the pythonic strategy starts from already literal-parsed
//! values and nudges them toward the schema. Both keep the prior value on
//! any coercion failure — a badly typed argument is the tool's problem to
//! report, not a reason to drop the call.

use serde_json::{Number, Value};

use crate::{
    error::CoerceError,
    literal::{self, looks_like_literal},
    schema::ParamType,
};

/// Coerces a raw string value toward a schema-declared type.
///
/// Errors are local: callers log a warning and keep the raw string.
pub fn coerce_string(raw: &str, target: ParamType) -> Result<Value, CoerceError> {
    match target {
        ParamType::String => Ok(Value::String(raw.to_string())),
        ParamType::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| CoerceError::InvalidInteger {
                value: raw.to_string(),
            }),
        ParamType::Number => {
            let parsed: f64 = raw.parse().map_err(|_| CoerceError::InvalidNumber {
                value: raw.to_string(),
            })?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| CoerceError::InvalidNumber {
                    value: raw.to_string(),
                })
        }
        // Anything other than "true" is false; this comparison never fails.
        ParamType::Boolean => Ok(Value::Bool(raw.eq_ignore_ascii_case("true"))),
        ParamType::Object | ParamType::Array => serde_json::from_str(raw)
            .or_else(|_| literal::parse_literal(raw))
            .map_err(|_| CoerceError::InvalidStructure {
                value: raw.to_string(),
            }),
    }
}

/// Types a raw string value with no schema guidance.
///
/// Only values passing the narrow [`looks_like_literal`] gate get a parse
/// attempt; everything else, and any parse failure, stays a plain string.
pub fn coerce_heuristic(raw: &str) -> Value {
    if looks_like_literal(raw) {
        literal::parse_literal(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    } else {
        Value::String(raw.to_string())
    }
}

/// Nudges an already-typed value toward a schema-declared type.
///
/// Values that already match the target, and values that cannot be
/// converted, pass through unchanged.
pub fn coerce_value(value: Value, target: ParamType) -> Value {
    match target {
        ParamType::String => match value {
            Value::String(_) => value,
            other => Value::String(other.to_string()),
        },
        ParamType::Integer => match &value {
            Value::Number(n) if n.is_i64() || n.is_u64() => value,
            Value::Number(n) => match n.as_f64() {
                // Truncation toward zero, matching an integer cast.
                Some(f) => Value::Number((f as i64).into()),
                None => value,
            },
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => value,
            },
            _ => value,
        },
        ParamType::Number => match &value {
            Value::Number(_) => value,
            Value::String(s) => match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => value,
            },
            _ => value,
        },
        ParamType::Boolean => match &value {
            Value::Bool(_) => value,
            Value::String(s) => {
                let lower = s.to_ascii_lowercase();
                Value::Bool(matches!(lower.as_str(), "true" | "1" | "yes"))
            }
            Value::Number(n) => Value::Bool(n.as_f64() != Some(0.0)),
            Value::Null => Value::Bool(false),
            Value::Array(items) => Value::Bool(!items.is_empty()),
            Value::Object(map) => Value::Bool(!map.is_empty()),
        },
        ParamType::Object | ParamType::Array => match &value {
            Value::String(s) => match serde_json::from_str(s) {
                Ok(parsed) => parsed,
                Err(_) => value,
            },
            _ => value,
        },
    }
}
