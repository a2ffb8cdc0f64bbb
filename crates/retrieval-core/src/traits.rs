use crate::query::Query;
use crate::raw::RawResponse;

/// Anything that can report the primary key it was loaded by.
pub trait Keyed {
    fn primary_key(&self) -> String;
}

/// Persistence-side batched lookup. Called at most once per class per result set.
pub trait EntityLoader: Send + Sync {
    type Entity: Keyed + Send + Sync;
    /// `primary_keys` is deduplicated; entities may come back in any order.
    fn load_all(&self, class_name: &str, primary_keys: &[String]) -> anyhow::Result<Vec<Self::Entity>>;
}

/// Connection to the search engine.
pub trait Transport: Send + Sync {
    fn execute(&self, query: &Query) -> anyhow::Result<RawResponse>;
}
