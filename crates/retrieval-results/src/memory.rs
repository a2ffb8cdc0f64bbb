//! In-memory collaborators: a loader that records its batched calls and a
//! transport that replays a fixed response.

use retrieval_core::query::Query;
use retrieval_core::raw::RawResponse;
use retrieval_core::traits::{EntityLoader, Keyed, Transport};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub struct MemoryLoader<E> {
    entities: HashMap<String, HashMap<String, E>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl<E> Default for MemoryLoader<E> {
    fn default() -> Self { Self { entities: HashMap::new(), calls: Mutex::new(Vec::new()) } }
}

impl<E: Keyed + Clone + Send + Sync> MemoryLoader<E> {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, class_name: &str, entity: E) -> Self {
        self.insert(class_name, entity);
        self
    }

    pub fn insert(&mut self, class_name: &str, entity: E) {
        self.entities.entry(class_name.to_string()).or_default().insert(entity.primary_key(), entity);
    }

    /// Every `load_all` call so far as `(class_name, keys)`.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn load_count(&self, class_name: &str) -> usize {
        self.calls().iter().filter(|(class, _)| class == class_name).count()
    }
}

impl<E: Keyed + Clone + Send + Sync> EntityLoader for MemoryLoader<E> {
    type Entity = E;

    fn load_all(&self, class_name: &str, primary_keys: &[String]) -> anyhow::Result<Vec<E>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((class_name.to_string(), primary_keys.to_vec()));
        let Some(by_key) = self.entities.get(class_name) else { return Ok(Vec::new()) };
        // reverse so callers cannot rely on request order
        Ok(primary_keys.iter().rev().filter_map(|key| by_key.get(key).cloned()).collect())
    }
}

/// Replays whatever response was last set.
#[derive(Default)]
pub struct StaticTransport {
    response: Mutex<RawResponse>,
    executed: Mutex<usize>,
}

impl StaticTransport {
    pub fn new(response: RawResponse) -> Self { Self { response: Mutex::new(response), executed: Mutex::new(0) } }

    pub fn set(&self, response: RawResponse) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) = response;
    }

    pub fn executed(&self) -> usize { *self.executed.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl Transport for StaticTransport {
    fn execute(&self, _query: &Query) -> anyhow::Result<RawResponse> {
        *self.executed.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(self.response.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }
}
