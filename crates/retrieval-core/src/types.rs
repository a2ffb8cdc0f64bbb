//! Domain types produced by the decoders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A matched document that has not been loaded.
///
/// Identifies one entity by `(class_name, primary_key)`; equality, hashing
/// and ordering use exactly that pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawReference {
    class_name: String,
    primary_key: String,
}

impl RawReference {
    pub fn new(class_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self { class_name: class_name.into(), primary_key: primary_key.into() }
    }

    pub fn class_name(&self) -> &str { &self.class_name }

    pub fn primary_key(&self) -> &str { &self.primary_key }
}

impl fmt::Display for RawReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.class_name, self.primary_key)
    }
}

/// Semantic type of an indexed field, selected by its wire suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Time,
    Boolean,
}

impl FieldType {
    /// The suffix table used when no other is configured.
    pub fn default_suffixes() -> BTreeMap<String, FieldType> {
        [
            ("s", FieldType::String),
            ("i", FieldType::Integer),
            ("f", FieldType::Float),
            ("d", FieldType::Time),
            ("b", FieldType::Boolean),
        ]
        .into_iter()
        .map(|(suffix, ty)| (suffix.to_string(), ty))
        .collect()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Time => "time",
            FieldType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Half-open time interval `[start, end)` produced by bucketed date facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self { Self { start, end } }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool { self.start <= instant && instant < self.end }
}

/// A facet value coerced to its native type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Str(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Time(DateTime<Utc>),
    TimeRange(TimeRange),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self { TypedValue::Str(s) => Some(s), _ => None }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self { TypedValue::Integer(n) => Some(*n), _ => None }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self { TypedValue::Float(x) => Some(*x), _ => None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self { TypedValue::Boolean(b) => Some(*b), _ => None }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self { TypedValue::Time(t) => Some(*t), _ => None }
    }

    pub fn as_time_range(&self) -> Option<TimeRange> {
        match self { TypedValue::TimeRange(r) => Some(*r), _ => None }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Str(s) => f.write_str(s),
            TypedValue::Integer(n) => write!(f, "{n}"),
            TypedValue::Float(x) => write!(f, "{x}"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::Time(t) => write!(f, "{}", t.to_rfc3339()),
            TypedValue::TimeRange(r) => write!(f, "{}..{}", r.start.to_rfc3339(), r.end.to_rfc3339()),
        }
    }
}
