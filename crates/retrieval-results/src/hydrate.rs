//! Batched loading of referenced entities.
//!
//! References are grouped by class and each class is fetched with a single
//! `load_all` call. [`HydrationBatcher`] keeps the fetched entities for the
//! lifetime of one result set behind a per-class `OnceCell`, so concurrent
//! first accessors wait on the same fetch instead of issuing their own.

use once_cell::sync::OnceCell;
use retrieval_core::error::{Error, Result};
use retrieval_core::traits::{EntityLoader, Keyed};
use retrieval_core::types::RawReference;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

type Loaded<E> = HashMap<String, Arc<E>>;

/// Loads every reference with one call per class. Dangling references are
/// simply absent from the returned map.
pub fn hydrate<L: EntityLoader>(loader: &L, references: &[RawReference]) -> Result<HashMap<RawReference, Arc<L::Entity>>> {
    let mut out = HashMap::with_capacity(references.len());
    for (class_name, keys) in group_by_class(references) {
        let loaded = load_class(loader, &class_name, &keys)?;
        for reference in references.iter().filter(|r| r.class_name() == class_name) {
            if let Some(entity) = loaded.get(reference.primary_key()) {
                out.insert(reference.clone(), Arc::clone(entity));
            }
        }
    }
    Ok(out)
}

/// Class -> distinct primary keys in first-seen order.
fn group_by_class(references: &[RawReference]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut seen: HashSet<&RawReference> = HashSet::with_capacity(references.len());
    for reference in references {
        if seen.insert(reference) {
            groups.entry(reference.class_name().to_string()).or_default().push(reference.primary_key().to_string());
        }
    }
    groups
}

fn load_class<L: EntityLoader>(loader: &L, class_name: &str, keys: &[String]) -> Result<Loaded<L::Entity>> {
    info!(class_name, keys = keys.len(), "batched entity load");
    let entities = loader.load_all(class_name, keys).map_err(|e| Error::Load {
        class_name: class_name.to_string(),
        message: format!("{:#}", e),
    })?;
    Ok(entities.into_iter().map(|entity| (Keyed::primary_key(&entity), Arc::new(entity))).collect())
}

struct ClassGate<E> {
    keys: Vec<String>,
    loaded: OnceCell<Loaded<E>>,
}

/// Per-result-set hydration cache.
///
/// Built from every reference the result set can hand out, so the one fetch
/// for a class covers document rows and facet rows alike.
pub struct HydrationBatcher<L: EntityLoader> {
    loader: Arc<L>,
    strict: bool,
    classes: HashMap<String, ClassGate<L::Entity>>,
}

impl<L: EntityLoader> HydrationBatcher<L> {
    pub fn new(loader: Arc<L>, references: &[RawReference], strict: bool) -> Self {
        let classes = group_by_class(references)
            .into_iter()
            .map(|(class_name, keys)| (class_name, ClassGate { keys, loaded: OnceCell::new() }))
            .collect();
        Self { loader, strict, classes }
    }

    /// Entity for `reference`, fetching its class on first use.
    pub fn get(&self, reference: &RawReference) -> Result<Option<Arc<L::Entity>>> {
        let Some(gate) = self.classes.get(reference.class_name()) else { return self.missing(reference) };
        let loaded = gate.loaded.get_or_try_init(|| load_class(&*self.loader, reference.class_name(), &gate.keys))?;
        match loaded.get(reference.primary_key()) {
            Some(entity) => Ok(Some(Arc::clone(entity))),
            None => self.missing(reference),
        }
    }

    /// Entities for `references`, position for position.
    pub fn get_all(&self, references: &[RawReference]) -> Result<Vec<Option<Arc<L::Entity>>>> {
        references.iter().map(|reference| self.get(reference)).collect()
    }

    pub fn is_loaded(&self, class_name: &str) -> bool {
        self.classes.get(class_name).is_some_and(|gate| gate.loaded.get().is_some())
    }

    fn missing(&self, reference: &RawReference) -> Result<Option<Arc<L::Entity>>> {
        if self.strict {
            return Err(Error::MissingEntity {
                class_name: reference.class_name().to_string(),
                primary_key: reference.primary_key().to_string(),
            });
        }
        warn!(class_name = reference.class_name(), primary_key = reference.primary_key(), "referenced entity not found");
        Ok(None)
    }
}
