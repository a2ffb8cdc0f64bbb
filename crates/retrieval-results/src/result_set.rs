use retrieval_core::config::{PaginationSettings, Settings};
use retrieval_core::error::{Error, Result};
use retrieval_core::query::{Page, Query};
use retrieval_core::raw::RawResponse;
use retrieval_core::traits::EntityLoader;
use retrieval_core::types::RawReference;
use retrieval_decode::facets::DecodedFacets;
use retrieval_decode::{decode_facets, decode_results, FacetField, FacetRow, FieldCodec};
use std::sync::Arc;
use tracing::debug;

use crate::hydrate::HydrationBatcher;
use crate::paginate::{paginate, Results};

/// Everything one engine response decodes to.
///
/// Reading `raw_results`, `total` or facet rows never touches the loader.
/// Entities are fetched lazily, once per class, the first time `results` or
/// a facet row `instance` needs them.
pub struct ResultSet<L: EntityLoader> {
    raw_results: Vec<RawReference>,
    total: u64,
    page: Option<Page>,
    pagination: PaginationSettings,
    query: Query,
    facets: DecodedFacets,
    batcher: HydrationBatcher<L>,
}

impl<L: EntityLoader> ResultSet<L> {
    /// Fails only when the response as a whole cannot be read; problems in a
    /// single facet field or row stay attached to that field or row.
    pub fn new(raw: &RawResponse, query: &Query, settings: &Settings, codec: &FieldCodec, loader: Arc<L>) -> Result<Self> {
        let (raw_results, total) = decode_results(raw)?;
        let mut facets = raw
            .facet_counts
            .as_ref()
            .map(|section| decode_facets(section, query, codec, &settings.facets))
            .unwrap_or_default();
        facets.fill_requested(query);

        let mut references = raw_results.clone();
        references.extend(facets.references());
        let batcher = HydrationBatcher::new(loader, &references, settings.hydration.strict);
        debug!(results = raw_results.len(), total, facets = query.facets.len(), "assembled result set");

        Ok(Self {
            raw_results,
            total,
            page: query.page,
            pagination: settings.pagination,
            query: query.clone(),
            facets,
            batcher,
        })
    }

    pub fn raw_results(&self) -> &[RawReference] { &self.raw_results }

    pub fn total(&self) -> u64 { self.total }

    pub fn page(&self) -> Option<Page> { self.page }

    /// Hydrated entities in engine order. A dangling reference keeps its slot
    /// as `None` (or fails in strict mode).
    pub fn results(&self) -> Result<Results<Option<Arc<L::Entity>>>> {
        let entities = self.batcher.get_all(&self.raw_results)?;
        Ok(paginate(entities, self.total, self.page, &self.pagination))
    }

    /// Raw references wrapped the same way `results` is.
    pub fn raw_page(&self) -> Results<RawReference> {
        paginate(self.raw_results.clone(), self.total, self.page, &self.pagination)
    }

    pub fn facet(&self, field_name: &str) -> Result<&FacetField> {
        self.lookup(None, field_name)
    }

    pub fn dynamic_facet(&self, namespace: &str, field_name: &str) -> Result<&FacetField> {
        self.lookup(Some(namespace), field_name)
    }

    pub fn facets(&self) -> &DecodedFacets { &self.facets }

    /// Entity behind a facet row, `None` when the row is not a reference.
    pub fn instance(&self, field: &FacetField, row: &FacetRow) -> Result<Option<Arc<L::Entity>>> {
        match field.reference(row) {
            Some(reference) => self.batcher.get(&reference),
            None => Ok(None),
        }
    }

    pub fn instances(&self, field: &FacetField) -> Result<Vec<Option<Arc<L::Entity>>>> {
        field.rows().iter().map(|row| self.instance(field, row)).collect()
    }

    pub fn is_loaded(&self, class_name: &str) -> bool { self.batcher.is_loaded(class_name) }

    fn lookup(&self, namespace: Option<&str>, field_name: &str) -> Result<&FacetField> {
        let not_requested = || {
            let name = match namespace {
                Some(ns) => format!("{}:{}", ns, field_name),
                None => field_name.to_string(),
            };
            Error::FacetNotRequested(name)
        };
        if self.query.facet_request(namespace, field_name).is_none() {
            return Err(not_requested());
        }
        match self.facets.get(namespace, field_name) {
            Some(entry) => entry.as_ref().map_err(Clone::clone),
            None => Err(not_requested()),
        }
    }
}
