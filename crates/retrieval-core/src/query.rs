//! Query descriptor handed over by the query builder.
//!
//! Only the parts needed to interpret a response live here: which facets were
//! requested (with their types, namespaces, referenced classes and date
//! ranges) and whether a page was asked for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FieldType, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u64,
    #[serde(default)]
    pub per_page: Option<u64>,
}

/// One facet the caller asked the engine for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRequest {
    pub field_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Overall range of a bucketed date facet; the last bucket ends here.
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    /// Class whose primary keys the (integer) facet values are.
    #[serde(default)]
    pub references: Option<String>,
}

impl FacetRequest {
    pub fn new(field_name: impl Into<String>, field_type: FieldType) -> Self {
        Self { field_name: field_name.into(), field_type, namespace: None, time_range: None, references: None }
    }

    pub fn dynamic(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.time_range = Some(TimeRange::new(start, end));
        self
    }

    pub fn references(mut self, class_name: impl Into<String>) -> Self {
        self.references = Some(class_name.into());
        self
    }

    pub fn matches(&self, namespace: Option<&str>, field_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.field_name == field_name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub class_names: Vec<String>,
    #[serde(default)]
    pub facets: Vec<FacetRequest>,
    #[serde(default)]
    pub page: Option<Page>,
}

impl Query {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { class_names: vec![class_name.into()], ..Self::default() }
    }

    pub fn facet(mut self, request: FacetRequest) -> Self {
        self.facets.push(request);
        self
    }

    pub fn paginate(mut self, page: u64, per_page: Option<u64>) -> Self {
        self.page = Some(Page { page, per_page });
        self
    }

    pub fn facet_request(&self, namespace: Option<&str>, field_name: &str) -> Option<&FacetRequest> {
        self.facets.iter().find(|r| r.matches(namespace, field_name))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|e| anyhow::anyhow!("Failed to parse query descriptor: {}", e))
    }
}
