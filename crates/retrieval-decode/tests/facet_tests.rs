use chrono::{Duration, TimeZone, Utc};
use retrieval_core::config::FacetOptions;
use retrieval_core::query::{FacetRequest, Query};
use retrieval_core::raw::RawFacetCounts;
use retrieval_core::types::{FieldType, RawReference, TimeRange, TypedValue};
use retrieval_core::Error;
use retrieval_decode::facets::parse_gap;
use retrieval_decode::{decode_facets, DecodedFacets, FieldCodec};
use serde_json::{json, Value};

fn section(facet_fields: Value, facet_dates: Value) -> RawFacetCounts {
    serde_json::from_value(json!({ "facet_fields": facet_fields, "facet_dates": facet_dates })).unwrap()
}

fn decode(section: &RawFacetCounts, query: &Query) -> DecodedFacets {
    decode_facets(section, query, &FieldCodec::default(), &FacetOptions::default())
}

fn values(decoded: &DecodedFacets, name: &str) -> Vec<TypedValue> {
    let field = decoded.plain[name].as_ref().unwrap();
    field.rows().iter().map(|row| row.value().unwrap().clone()).collect()
}

#[test]
fn string_facet_keeps_engine_order_and_counts() {
    let raw = section(json!({ "title_s": ["Author 1", 2, "Author 2", 1] }), json!({}));
    let decoded = decode(&raw, &Query::new("Post").facet(FacetRequest::new("title", FieldType::String)));
    let field = decoded.plain["title"].as_ref().unwrap();
    assert_eq!(field.field_name(), "title");
    assert_eq!(values(&decoded, "title"), vec![TypedValue::Str("Author 1".into()), TypedValue::Str("Author 2".into())]);
    assert_eq!(field.rows().iter().map(|r| r.count()).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn order_is_not_resorted_by_count() {
    let raw = section(json!({ "title_s": ["rare", 1, "common", 9] }), json!({}));
    let decoded = decode(&raw, &Query::default());
    assert_eq!(values(&decoded, "title"), vec![TypedValue::Str("rare".into()), TypedValue::Str("common".into())]);
}

#[test]
fn typed_flat_facets() {
    let raw = section(
        json!({
            "blog_id_i": ["3", 2, "1", 1],
            "average_rating_f": ["9.3", 2, "1.1", 1],
            "featured_b": ["true", 3, "false", 1],
            "published_at_d": ["2009-04-07T20:25:23Z", 3, "2009-04-07T20:26:19Z", 1]
        }),
        json!({}),
    );
    let decoded = decode(&raw, &Query::default());
    assert_eq!(values(&decoded, "blog_id"), vec![TypedValue::Integer(3), TypedValue::Integer(1)]);
    assert_eq!(values(&decoded, "average_rating"), vec![TypedValue::Float(9.3), TypedValue::Float(1.1)]);
    assert_eq!(values(&decoded, "featured"), vec![TypedValue::Boolean(true), TypedValue::Boolean(false)]);
    assert_eq!(
        values(&decoded, "published_at"),
        vec![
            TypedValue::Time(Utc.with_ymd_and_hms(2009, 4, 7, 20, 25, 23).unwrap()),
            TypedValue::Time(Utc.with_ymd_and_hms(2009, 4, 7, 20, 26, 19).unwrap()),
        ]
    );
}

#[test]
fn numeric_json_values_are_accepted() {
    let raw = section(json!({ "blog_id_i": [3, 2, 1, 1] }), json!({}));
    let decoded = decode(&raw, &Query::default());
    assert_eq!(values(&decoded, "blog_id"), vec![TypedValue::Integer(3), TypedValue::Integer(1)]);
}

#[test]
fn date_range_facet_clamps_last_bucket_to_requested_end() {
    let start = Utc.with_ymd_and_hms(2009, 7, 7, 4, 0, 0).unwrap();
    let end = start + Duration::days(2);
    let raw = section(
        json!({}),
        json!({ "published_at_d": {
            "gap": "+86400SECONDS",
            "2009-07-08T04:00:00Z": 2,
            "2009-07-07T04:00:00Z": 1
        }}),
    );
    let query = Query::new("Post").facet(FacetRequest::new("published_at", FieldType::Time).time_range(start, end));
    let decoded = decode(&raw, &query);
    let field = decoded.plain["published_at"].as_ref().unwrap();
    let rows = field.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value().unwrap(), &TypedValue::TimeRange(TimeRange::new(start, start + Duration::days(1))));
    assert_eq!(rows[0].count(), 1);
    assert_eq!(rows[1].value().unwrap(), &TypedValue::TimeRange(TimeRange::new(start + Duration::days(1), end)));
    assert_eq!(rows[1].count(), 2);
}

#[test]
fn partial_last_bucket_ends_at_range_end() {
    let start = Utc.with_ymd_and_hms(2009, 7, 7, 0, 0, 0).unwrap();
    let end = start + Duration::hours(36);
    let raw = section(
        json!({}),
        json!({ "published_at_d": {
            "gap": "+1DAY",
            "end": "2009-07-09T00:00:00Z",
            "2009-07-07T00:00:00Z": 4,
            "2009-07-08T00:00:00Z": 5
        }}),
    );
    let query = Query::default().facet(FacetRequest::new("published_at", FieldType::Time).time_range(start, end));
    let decoded = decode(&raw, &query);
    let last = decoded.plain["published_at"].as_ref().unwrap().rows()[1].value().unwrap().as_time_range().unwrap();
    assert_eq!(last.end, end);
}

#[test]
fn raw_end_literal_is_used_without_requested_range() {
    let raw = section(
        json!({}),
        json!({ "published_at_d": {
            "gap": "+3600SECONDS",
            "end": "2009-07-07T01:30:00Z",
            "2009-07-07T01:00:00Z": 1
        }}),
    );
    let decoded = decode(&raw, &Query::default());
    let only = decoded.plain["published_at"].as_ref().unwrap().rows()[0].value().unwrap().as_time_range().unwrap();
    assert_eq!(only.end, Utc.with_ymd_and_hms(2009, 7, 7, 1, 30, 0).unwrap());
}

#[test]
fn omitted_trailing_buckets_keep_gap_width() {
    let start = Utc.with_ymd_and_hms(2009, 7, 7, 4, 0, 0).unwrap();
    let end = start + Duration::days(3);
    // engine dropped the empty third day
    let raw = section(
        json!({}),
        json!({ "published_at_d": {
            "gap": "+1DAY",
            "2009-07-07T04:00:00Z": 1,
            "2009-07-08T04:00:00Z": 2
        }}),
    );
    let query = Query::default().facet(FacetRequest::new("published_at", FieldType::Time).time_range(start, end));
    let decoded = decode(&raw, &query);
    let rows = decoded.plain["published_at"].as_ref().unwrap().rows();
    assert_eq!(rows.len(), 2);
    let last = rows[1].value().unwrap().as_time_range().unwrap();
    assert_eq!(last.start, start + Duration::days(1));
    assert_eq!(last.end, start + Duration::days(2), "never stretched out to the range end");
}

#[test]
fn bucket_at_or_past_range_end_keeps_gap_width() {
    let start = Utc.with_ymd_and_hms(2009, 7, 7, 4, 0, 0).unwrap();
    let end = start + Duration::days(1);
    let raw = section(
        json!({}),
        json!({ "published_at_d": {
            "gap": "+1DAY",
            "2009-07-07T04:00:00Z": 1,
            "2009-07-08T04:00:00Z": 2,
            "2009-07-09T04:00:00Z": 3
        }}),
    );
    let query = Query::default().facet(FacetRequest::new("published_at", FieldType::Time).time_range(start, end));
    let decoded = decode(&raw, &query);
    let ranges: Vec<TimeRange> = decoded.plain["published_at"]
        .as_ref()
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.value().unwrap().as_time_range().unwrap())
        .collect();
    assert_eq!(ranges[0], TimeRange::new(start, end));
    for range in &ranges[1..] {
        assert_eq!(range.end - range.start, Duration::days(1), "no zero-width or inverted ranges");
    }
}

#[test]
fn date_buckets_win_over_flat_counts_for_the_same_field() {
    let raw = section(
        json!({ "published_at_d": ["2009-07-07T04:00:00Z", 1] }),
        json!({ "published_at_d": { "gap": "+1DAY", "2009-07-07T04:00:00Z": 5 } }),
    );
    let decoded = decode(&raw, &Query::default());
    let rows = decoded.plain["published_at"].as_ref().unwrap().rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].value().unwrap().as_time_range().is_some());
    assert_eq!(rows[0].count(), 5);
}

#[test]
fn dynamic_facets_do_not_collide_with_plain_ones() {
    let raw = section(json!({ "custom_string:test_s": ["two", 2, "one", 1], "test_s": ["plain", 5] }), json!({}));
    let decoded = decode(&raw, &Query::default());
    let dynamic = decoded.dynamic[&("custom_string".to_string(), "test".to_string())].as_ref().unwrap();
    assert_eq!(dynamic.namespace(), Some("custom_string"));
    assert_eq!(dynamic.rows().iter().map(|r| r.value().unwrap().clone()).collect::<Vec<_>>(), vec![
        TypedValue::Str("two".into()),
        TypedValue::Str("one".into()),
    ]);
    assert_eq!(values(&decoded, "test"), vec![TypedValue::Str("plain".into())]);
}

#[test]
fn unknown_suffix_is_scoped_to_its_field() {
    let raw = section(json!({ "location_ll": ["1,2", 1], "title_s": ["a", 1] }), json!({}));
    let decoded = decode(&raw, &Query::default());
    assert!(matches!(decoded.plain["location"], Err(Error::UnknownFieldType { .. })));
    assert_eq!(values(&decoded, "title"), vec![TypedValue::Str("a".into())]);
}

#[test]
fn coercion_error_stays_on_the_row() {
    let raw = section(json!({ "blog_id_i": ["3", 2, "x", 1, "1", 1] }), json!({}));
    let decoded = decode(&raw, &Query::default());
    let rows = decoded.plain["blog_id"].as_ref().unwrap().rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].value().unwrap_err(), Error::Coercion { field_type: FieldType::Integer, raw: "x".into() });
    assert_eq!(rows[1].count(), 1);
    assert_eq!(rows[2].value().unwrap(), &TypedValue::Integer(1));
}

#[test]
fn lenient_mode_skips_bad_rows() {
    let raw = section(json!({ "blog_id_i": ["3", 2, "x", 1, "1", 1] }), json!({}));
    let options = FacetOptions { skip_invalid_rows: true };
    let decoded = decode_facets(&raw, &Query::default(), &FieldCodec::default(), &options);
    assert_eq!(values(&decoded, "blog_id"), vec![TypedValue::Integer(3), TypedValue::Integer(1)]);
}

#[test]
fn odd_length_or_missing_gap_breaks_only_that_field() {
    let raw = section(
        json!({ "title_s": ["a", 1, "b"], "blog_id_i": ["1", 1] }),
        json!({ "published_at_d": { "2009-07-07T04:00:00Z": 1 } }),
    );
    let decoded = decode(&raw, &Query::default());
    assert!(matches!(decoded.plain["title"], Err(Error::MalformedField { .. })));
    assert!(matches!(decoded.plain["published_at"], Err(Error::MalformedField { .. })));
    assert!(decoded.plain["blog_id"].is_ok());
}

#[test]
fn requested_but_absent_facets_are_empty() {
    let query = Query::new("Post")
        .facet(FacetRequest::new("title", FieldType::String))
        .facet(FacetRequest::new("test", FieldType::String).dynamic("custom"));
    let mut decoded = decode(&RawFacetCounts::default(), &query);
    assert!(decoded.get(None, "title").is_none());
    decoded.fill_requested(&query);
    assert!(decoded.get(None, "title").unwrap().as_ref().unwrap().is_empty());
    assert!(decoded.get(Some("custom"), "test").unwrap().as_ref().unwrap().is_empty());
    assert!(decoded.get(None, "test").is_none());
}

#[test]
fn referencing_facet_rows_yield_references() {
    let raw = section(json!({ "blog_id_i": ["3", 2, "1", 1], "title_s": ["a", 1] }), json!({}));
    let query = Query::new("Post")
        .facet(FacetRequest::new("blog_id", FieldType::Integer).references("Blog"))
        .facet(FacetRequest::new("title", FieldType::String).references("Blog"));
    let decoded = decode(&raw, &query);
    let mut refs = decoded.references();
    refs.sort();
    assert_eq!(refs, vec![RawReference::new("Blog", "1"), RawReference::new("Blog", "3")]);
}

#[test]
fn gap_literals() {
    assert_eq!(parse_gap("+86400SECONDS"), Some(Duration::days(1)));
    assert_eq!(parse_gap("+1DAY"), Some(Duration::days(1)));
    assert_eq!(parse_gap("+2HOURS"), Some(Duration::hours(2)));
    assert_eq!(parse_gap("+5MINUTES"), Some(Duration::minutes(5)));
    assert_eq!(parse_gap("+1MONTH"), None);
    assert_eq!(parse_gap("+0SECONDS"), None);
    assert_eq!(parse_gap("SECONDS"), None);
}
