//! Fixture plumbing behind the `retrieval-decode` binary: reads a raw engine
//! response, a query descriptor and optional entity fixtures, and renders
//! the decoded result set as text.
use anyhow::anyhow;
use retrieval_core::config::Config;
use retrieval_core::query::Query;
use retrieval_core::raw::RawResponse;
use retrieval_core::traits::Keyed;
use retrieval_results::{MemoryLoader, ResultSet, Session, StaticTransport};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Entity fixture: any JSON object with an `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureEntity(pub Value);

impl Keyed for FixtureEntity {
    fn primary_key(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

/// Parses `{"<Class>": [{"id": ...}, ...], ...}`.
pub fn load_entities(json: &str) -> anyhow::Result<MemoryLoader<FixtureEntity>> {
    let by_class: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse entity fixtures: {}", e))?;
    let mut loader = MemoryLoader::new();
    for (class_name, entities) in by_class {
        for entity in entities {
            if entity.get("id").is_none() { return Err(anyhow!("{} fixture without an id: {}", class_name, entity)); }
            loader.insert(&class_name, FixtureEntity(entity));
        }
    }
    Ok(loader)
}

/// `run` over fixture files on disk.
pub fn run_files(config: &Config, response_path: &Path, query_path: &Path, entities_path: Option<&Path>) -> anyhow::Result<String> {
    let response = read(response_path)?;
    let query = read(query_path)?;
    let entities = entities_path.map(read).transpose()?;
    run(config, &response, &query, entities.as_deref())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))
}

pub fn run(config: &Config, response_json: &str, query_json: &str, entities_json: Option<&str>) -> anyhow::Result<String> {
    let settings = config.settings()?;
    let raw = RawResponse::from_json(response_json)?;
    let query = Query::from_json(query_json)?;
    let loader = entities_json.map(load_entities).transpose()?.unwrap_or_default();
    let session = Session::new(settings, Arc::new(StaticTransport::new(raw)), Arc::new(loader));
    let result = session.search(&query)?;
    render(&result, &query, entities_json.is_some())
}

pub fn render(result: &ResultSet<MemoryLoader<FixtureEntity>>, query: &Query, hydrate: bool) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "📊 total: {}", result.total())?;
    if let Some(page) = result.raw_page().paginated() {
        writeln!(out, "page {}/{} ({} per page)", page.page(), page.total_pages(), page.per_page())?;
    }
    writeln!(out, "results:")?;
    for (i, reference) in result.raw_results().iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, reference)?;
    }
    if hydrate {
        writeln!(out, "entities:")?;
        for (reference, entity) in result.raw_results().iter().zip(result.results()?.iter()) {
            match entity {
                Some(entity) => writeln!(out, "  {} => {}", reference, entity.0)?,
                None => writeln!(out, "  {} => (missing)", reference)?,
            }
        }
    }
    for request in &query.facets {
        let label = match &request.namespace {
            Some(ns) => format!("{}:{}", ns, request.field_name),
            None => request.field_name.clone(),
        };
        let field = match &request.namespace {
            Some(ns) => result.dynamic_facet(ns, &request.field_name),
            None => result.facet(&request.field_name),
        };
        writeln!(out, "facet {}:", label)?;
        let field = match field {
            Ok(field) => field,
            Err(e) => { writeln!(out, "  error: {}", e)?; continue; }
        };
        for row in field.rows() {
            match row.value() {
                Ok(value) => write!(out, "  {}: {}", value, row.count())?,
                Err(e) => write!(out, "  <{}>: {}", e, row.count())?,
            }
            if hydrate {
                if let Some(entity) = result.instance(field, row)? { write!(out, " => {}", entity.0)?; }
            }
            writeln!(out)?;
        }
    }
    Ok(out)
}
