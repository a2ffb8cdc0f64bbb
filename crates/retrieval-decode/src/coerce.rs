use chrono::{DateTime, Utc};
use retrieval_core::error::{Error, Result};
use retrieval_core::types::{FieldType, TypedValue};

/// Converts a raw wire literal into the native value for `field_type`.
pub fn coerce(field_type: FieldType, raw: &str) -> Result<TypedValue> {
    let fail = || Error::Coercion { field_type, raw: raw.to_string() };
    match field_type {
        FieldType::String => Ok(TypedValue::Str(raw.to_string())),
        FieldType::Integer => raw.parse::<i64>().map(TypedValue::Integer).map_err(|_| fail()),
        FieldType::Float => match raw.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(TypedValue::Float(x)),
            _ => Err(fail()),
        },
        FieldType::Boolean => match raw {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            _ => Err(fail()),
        },
        FieldType::Time => parse_time(raw).map(TypedValue::Time).ok_or_else(fail),
    }
}

/// Engine timestamps are RFC 3339, normally with a `Z` designator.
pub fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}
