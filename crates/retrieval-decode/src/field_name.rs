//! Engine field names: `<field>_<suffix>` or `<namespace>:<field>_<suffix>`.

use retrieval_core::config::Settings;
use retrieval_core::error::{Error, Result};
use retrieval_core::types::FieldType;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub field_name: String,
    pub field_type: FieldType,
    pub suffix: String,
    pub namespace: Option<String>,
}

/// Encodes and decodes wire field names against an injected suffix table.
#[derive(Debug, Clone)]
pub struct FieldCodec {
    types: BTreeMap<String, FieldType>,
}

impl Default for FieldCodec {
    fn default() -> Self { Self::new(FieldType::default_suffixes()) }
}

impl FieldCodec {
    pub fn new(types: BTreeMap<String, FieldType>) -> Self { Self { types } }

    pub fn from_settings(settings: &Settings) -> Self { Self::new(settings.field_types.clone()) }

    pub fn field_type(&self, suffix: &str) -> Option<FieldType> { self.types.get(suffix).copied() }

    /// First suffix (in table order) mapped to `field_type`.
    pub fn suffix_for(&self, field_type: FieldType) -> Option<&str> {
        self.types.iter().find(|(_, ty)| **ty == field_type).map(|(suffix, _)| suffix.as_str())
    }

    pub fn encode(&self, field_name: &str, field_type: FieldType, namespace: Option<&str>) -> Result<String> {
        let suffix = self.suffix_for(field_type).ok_or_else(|| Error::UnknownFieldType {
            field: field_name.to_string(),
            suffix: field_type.to_string(),
        })?;
        Ok(match namespace {
            Some(ns) => format!("{}:{}_{}", ns, field_name, suffix),
            None => format!("{}_{}", field_name, suffix),
        })
    }

    pub fn decode(&self, wire_name: &str) -> Result<FieldName> {
        let (namespace, field_name, suffix) = split(wire_name);
        if field_name.is_empty() {
            return Err(Error::MalformedField { field: wire_name.to_string(), reason: "empty field name".to_string() });
        }
        let suffix = suffix.unwrap_or("");
        let field_type = self.field_type(suffix).ok_or_else(|| Error::UnknownFieldType {
            field: wire_name.to_string(),
            suffix: suffix.to_string(),
        })?;
        Ok(FieldName {
            field_name: field_name.to_string(),
            field_type,
            suffix: suffix.to_string(),
            namespace: namespace.map(str::to_string),
        })
    }
}

/// Splits a wire name into `(namespace, field, suffix)` without validating
/// the suffix. Namespace ends at the first `:`, suffix starts after the last `_`.
pub fn split(wire_name: &str) -> (Option<&str>, &str, Option<&str>) {
    let (namespace, rest) = match wire_name.split_once(':') {
        Some((ns, rest)) => (Some(ns), rest),
        None => (None, wire_name),
    };
    match rest.rsplit_once('_') {
        Some((field, suffix)) => (namespace, field, Some(suffix)),
        None => (namespace, rest, None),
    }
}
