//! Wire shape of an engine response.
//!
//! Unknown keys are ignored. Only the outer structure is validated here; the
//! meaning of facet values and document ids is left to the decoders.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub response: Option<RawDocList>,
    #[serde(default)]
    pub facet_counts: Option<RawFacetCounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDocList {
    #[serde(default)]
    pub docs: Vec<RawDoc>,
    #[serde(rename = "numFound", default)]
    pub num_found: Option<u64>,
}

/// `id` is the composite `"<ClassName> <primary_key>"` identifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDoc {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFacetCounts {
    /// Wire field name -> flattened `[value, count, value, count, ...]`.
    #[serde(default)]
    pub facet_fields: BTreeMap<String, Vec<Value>>,
    /// Wire field name -> bucket start literal -> count, plus `gap` and meta keys.
    #[serde(default)]
    pub facet_dates: BTreeMap<String, Map<String, Value>>,
}

impl RawResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}
