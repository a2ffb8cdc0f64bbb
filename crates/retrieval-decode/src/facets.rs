//! Facet section decoding.
//!
//! `facet_fields` carries flattened `[value, count, ...]` pairs whose order is
//! kept exactly as the engine sent it. `facet_dates` carries one count per
//! bucket start plus a `gap`; those rows come out in chronological order with
//! the last bucket clamped to the end of the requested range.
//!
//! Failures are scoped: a field with an unknown suffix or a broken shape is
//! stored as an `Err` entry, a value that does not coerce stays on its row.

use chrono::{DateTime, TimeDelta, Utc};
use retrieval_core::config::FacetOptions;
use retrieval_core::error::{Error, Result};
use retrieval_core::query::{FacetRequest, Query};
use retrieval_core::raw::RawFacetCounts;
use retrieval_core::types::{FieldType, RawReference, TimeRange, TypedValue};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::coerce::{coerce, parse_time};
use crate::field_name::{split, FieldCodec, FieldName};

/// Keys inside a date facet entry that are not bucket starts.
const DATE_META_KEYS: &[&str] = &["gap", "start", "end", "hardend", "other", "before", "after", "between"];

#[derive(Debug, Clone, PartialEq)]
pub struct FacetRow {
    value: Result<TypedValue>,
    count: u64,
}

impl FacetRow {
    pub fn new(value: Result<TypedValue>, count: u64) -> Self { Self { value, count } }

    /// The coerced value, or the coercion error scoped to this row.
    pub fn value(&self) -> Result<&TypedValue> { self.value.as_ref().map_err(Clone::clone) }

    pub fn count(&self) -> u64 { self.count }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetField {
    field_name: String,
    namespace: Option<String>,
    field_type: FieldType,
    references: Option<String>,
    rows: Vec<FacetRow>,
}

impl FacetField {
    pub fn new(field_name: impl Into<String>, field_type: FieldType, rows: Vec<FacetRow>) -> Self {
        Self { field_name: field_name.into(), namespace: None, field_type, references: None, rows }
    }

    /// A requested facet the engine reported nothing for.
    pub fn empty(request: &FacetRequest) -> Self {
        Self {
            field_name: request.field_name.clone(),
            namespace: request.namespace.clone(),
            field_type: request.field_type,
            references: request.references.clone(),
            rows: Vec::new(),
        }
    }

    pub fn field_name(&self) -> &str { &self.field_name }

    pub fn namespace(&self) -> Option<&str> { self.namespace.as_deref() }

    pub fn field_type(&self) -> FieldType { self.field_type }

    pub fn references(&self) -> Option<&str> { self.references.as_deref() }

    pub fn rows(&self) -> &[FacetRow] { &self.rows }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Entity a row points at: only integer values of a facet declared as
    /// referencing a class.
    pub fn reference(&self, row: &FacetRow) -> Option<RawReference> {
        let class_name = self.references.as_deref()?;
        match &row.value {
            Ok(TypedValue::Integer(key)) => Some(RawReference::new(class_name, key.to_string())),
            _ => None,
        }
    }

    pub fn row_references(&self) -> impl Iterator<Item = RawReference> + '_ {
        self.rows.iter().filter_map(|row| self.reference(row))
    }
}

pub type FieldEntry = Result<FacetField>;

/// Decoded facets, plain and namespaced kept apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFacets {
    pub plain: HashMap<String, FieldEntry>,
    pub dynamic: HashMap<(String, String), FieldEntry>,
}

impl DecodedFacets {
    pub fn get(&self, namespace: Option<&str>, field_name: &str) -> Option<&FieldEntry> {
        match namespace {
            Some(ns) => self.dynamic.get(&(ns.to_string(), field_name.to_string())),
            None => self.plain.get(field_name),
        }
    }

    pub fn insert(&mut self, namespace: Option<&str>, field_name: &str, entry: FieldEntry) {
        match namespace {
            Some(ns) => { self.dynamic.insert((ns.to_string(), field_name.to_string()), entry); }
            None => { self.plain.insert(field_name.to_string(), entry); }
        }
    }

    /// Gives every requested facet an entry, empty when the engine sent none.
    pub fn fill_requested(&mut self, query: &Query) {
        for request in &query.facets {
            let namespace = request.namespace.as_deref();
            if self.get(namespace, &request.field_name).is_none() {
                self.insert(namespace, &request.field_name, Ok(FacetField::empty(request)));
            }
        }
    }

    /// References from every row that can be hydrated.
    pub fn references(&self) -> Vec<RawReference> {
        self.plain
            .values()
            .chain(self.dynamic.values())
            .filter_map(|entry| entry.as_ref().ok())
            .flat_map(|field| field.row_references())
            .collect()
    }
}

/// Date buckets are stored after flat counts, so they win when both
/// sections carry the same field.
pub fn decode_facets(section: &RawFacetCounts, query: &Query, codec: &FieldCodec, options: &FacetOptions) -> DecodedFacets {
    let mut decoded = DecodedFacets::default();
    for (wire_name, flat) in &section.facet_fields {
        let entry = codec.decode(wire_name).and_then(|name| decode_flat(&name, wire_name, query, flat, options));
        store(&mut decoded, wire_name, entry);
    }
    for (wire_name, buckets) in &section.facet_dates {
        let entry = codec.decode(wire_name).and_then(|name| decode_dates(&name, wire_name, query, buckets, options));
        store(&mut decoded, wire_name, entry);
    }
    debug!(plain = decoded.plain.len(), dynamic = decoded.dynamic.len(), "decoded facet section");
    decoded
}

fn store(decoded: &mut DecodedFacets, wire_name: &str, entry: FieldEntry) {
    if let Err(e) = &entry { warn!(field = wire_name, error = %e, "facet field not decoded"); }
    let (namespace, field_name, _) = split(wire_name);
    if decoded.get(namespace, field_name).is_some() {
        warn!(field = wire_name, "facet field already decoded under another wire name; replacing it");
    }
    decoded.insert(namespace, field_name, entry);
}

fn field_for(name: &FieldName, query: &Query, rows: Vec<FacetRow>) -> FacetField {
    let request = query.facet_request(name.namespace.as_deref(), &name.field_name);
    FacetField {
        field_name: name.field_name.clone(),
        namespace: name.namespace.clone(),
        field_type: name.field_type,
        references: request.and_then(|r| r.references.clone()),
        rows,
    }
}

fn malformed(wire_name: &str, reason: impl Into<String>) -> Error {
    Error::MalformedField { field: wire_name.to_string(), reason: reason.into() }
}

fn decode_flat(name: &FieldName, wire_name: &str, query: &Query, flat: &[Value], options: &FacetOptions) -> Result<FacetField> {
    if flat.len() % 2 != 0 {
        return Err(malformed(wire_name, format!("odd number of value/count items ({})", flat.len())));
    }
    let mut rows = Vec::with_capacity(flat.len() / 2);
    for pair in flat.chunks_exact(2) {
        let count = pair[1].as_u64().ok_or_else(|| malformed(wire_name, format!("count {} is not a non-negative integer", pair[1])))?;
        let value = match literal(&pair[0]) {
            Some(raw) => coerce(name.field_type, &raw),
            None => Err(Error::Coercion { field_type: name.field_type, raw: pair[0].to_string() }),
        };
        if let Err(e) = &value {
            if options.skip_invalid_rows { warn!(field = wire_name, error = %e, "skipping facet row"); continue; }
        }
        rows.push(FacetRow { value, count });
    }
    Ok(field_for(name, query, rows))
}

fn literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode_dates(name: &FieldName, wire_name: &str, query: &Query, buckets: &Map<String, Value>, options: &FacetOptions) -> Result<FacetField> {
    let gap_literal = buckets.get("gap").and_then(Value::as_str).ok_or_else(|| malformed(wire_name, "missing gap"))?;
    let gap = parse_gap(gap_literal).ok_or_else(|| malformed(wire_name, format!("unsupported gap '{}'", gap_literal)))?;
    let requested = query.facet_request(name.namespace.as_deref(), &name.field_name);
    let range_end = requested
        .and_then(|r| r.time_range)
        .map(|r| r.end)
        .or_else(|| buckets.get("end").and_then(Value::as_str).and_then(parse_time));

    let mut starts: Vec<(DateTime<Utc>, u64)> = Vec::with_capacity(buckets.len());
    for (key, count) in buckets {
        if DATE_META_KEYS.contains(&key.as_str()) { continue; }
        let bucket = parse_time(key)
            .ok_or_else(|| malformed(wire_name, format!("bucket '{}' is not a timestamp", key)))
            .and_then(|start| count.as_u64().map(|c| (start, c)).ok_or_else(|| malformed(wire_name, format!("count {} is not a non-negative integer", count))));
        match bucket {
            Ok(b) => starts.push(b),
            Err(e) if options.skip_invalid_rows => warn!(field = wire_name, error = %e, "skipping date bucket"),
            Err(e) => return Err(e),
        }
    }
    starts.sort_by_key(|(start, _)| *start);

    let mut rows = Vec::with_capacity(starts.len());
    for (start, count) in starts {
        let full = start.checked_add_signed(gap).ok_or_else(|| malformed(wire_name, "bucket end out of range"))?;
        // the range end only ever shortens a bucket that straddles it
        let end = match range_end {
            Some(end) if start < end && end < full => end,
            _ => full,
        };
        rows.push(FacetRow { value: Ok(TypedValue::TimeRange(TimeRange::new(start, end))), count });
    }
    Ok(field_for(name, query, rows))
}

/// Parses `+<n><UNIT>` where unit is SECOND(S), MINUTE(S), HOUR(S) or DAY(S).
pub fn parse_gap(literal: &str) -> Option<TimeDelta> {
    let body = literal.strip_prefix('+').unwrap_or(literal);
    let digits = body.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = body.split_at(digits);
    let amount: i64 = amount.parse().ok()?;
    let unit_seconds = match unit.trim_end_matches('S') {
        "SECOND" => 1,
        "MINUTE" => 60,
        "HOUR" => 3_600,
        "DAY" => 86_400,
        _ => return None,
    };
    let seconds = amount.checked_mul(unit_seconds)?;
    if seconds <= 0 { return None; }
    TimeDelta::try_seconds(seconds)
}
