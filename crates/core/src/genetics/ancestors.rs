use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::data::DogStore;
use crate::error::Result;
use crate::types::{validate_generations, DogId};

use super::cache::{AncestorCache, WalkKey};

/// One path by which an ancestor is reachable from the walk root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AncestorEntry {
    pub ancestor_id: DogId,
    pub name: String,
    /// 1 for a parent, 2 for a grandparent, ... The root itself is 0.
    pub generation: usize,
    /// Names from the root down to and including this ancestor.
    pub path: Vec<String>,
}

/// Result of walking one dog's ancestry.
///
/// Ancestors are keyed by id in first-visit order (sire branch before dam
/// branch, depth first). An ancestor reachable through several lineages has
/// one entry per path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ancestry {
    root_id: DogId,
    /// The root at generation 0, or `None` if the root did not resolve.
    root: Option<AncestorEntry>,
    max_generations: usize,
    ancestors: IndexMap<DogId, Vec<AncestorEntry>>,
}

impl Ancestry {
    fn unresolved(root_id: &str, max_generations: usize) -> Self {
        Self {
            root_id: root_id.to_string(),
            root: None,
            max_generations,
            ancestors: IndexMap::new(),
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Name of the root dog, if it resolved.
    pub fn root_name(&self) -> Option<&str> {
        self.root.as_ref().map(|r| r.name.as_str())
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    /// Number of distinct ancestors (the root is not counted).
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// All entries for one ancestor, or `None` if it was not reached.
    pub fn entries(&self, ancestor_id: &str) -> Option<&[AncestorEntry]> {
        self.ancestors.get(ancestor_id).map(|v| v.as_slice())
    }

    pub fn contains(&self, ancestor_id: &str) -> bool {
        self.ancestors.contains_key(ancestor_id)
    }

    /// Iterate ancestors in first-visit order.
    pub fn iter(&self) -> impl Iterator<Item = (&DogId, &Vec<AncestorEntry>)> {
        self.ancestors.iter()
    }

    /// Total number of (ancestor, path) entries.
    pub fn path_count(&self) -> usize {
        self.ancestors.values().map(Vec::len).sum()
    }

    /// The root's lineage: the ancestors plus the root itself at generation 0.
    ///
    /// Used for inbreeding, where a prospective parent can itself be a
    /// common ancestor of the other parent.
    pub(crate) fn lineage(&self) -> IndexMap<&str, Vec<&AncestorEntry>> {
        let mut lineage: IndexMap<&str, Vec<&AncestorEntry>> = IndexMap::new();
        if let Some(root) = &self.root {
            lineage.entry(root.ancestor_id.as_str()).or_default().push(root);
        }
        for (id, entries) in &self.ancestors {
            lineage.entry(id.as_str()).or_default().extend(entries.iter());
        }
        lineage
    }
}

/// Depth-first walker over the sire/dam graph.
///
/// The generation bound is the only guard against cycles in malformed data;
/// there is no visited set, so an ancestor reached through two lineages is
/// recorded twice.
pub struct AncestorWalker<'a> {
    store: &'a dyn DogStore,
    cache: &'a dyn AncestorCache,
}

impl<'a> AncestorWalker<'a> {
    pub fn new(store: &'a dyn DogStore, cache: &'a dyn AncestorCache) -> Self {
        Self { store, cache }
    }

    /// Collect every ancestor of `dog_id` up to `max_generations`.
    ///
    /// An unresolved root gives an empty ancestry.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `max_generations` is outside `[1, 10]`,
    /// or the store's error if a lookup fails.
    pub fn walk(&self, dog_id: &str, max_generations: usize) -> Result<Arc<Ancestry>> {
        validate_generations(max_generations)?;

        let key = WalkKey::new(dog_id, max_generations);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Ancestor cache hit for '{}' ({} generations)", dog_id, max_generations);
            return Ok(hit);
        }

        let mut ancestry = Ancestry::unresolved(dog_id, max_generations);
        self.traverse(dog_id, 0, &[], &mut ancestry)?;

        if ancestry.root.is_none() {
            log::debug!("Walk root '{}' not found; no ancestors", dog_id);
        }

        let ancestry = Arc::new(ancestry);
        self.cache.put(key, Arc::clone(&ancestry));
        Ok(ancestry)
    }

    fn traverse(
        &self,
        dog_id: &str,
        generation: usize,
        path: &[String],
        out: &mut Ancestry,
    ) -> Result<()> {
        if generation > out.max_generations {
            return Ok(());
        }

        let Some(dog) = self.store.find_dog(dog_id)? else {
            if generation > 0 {
                log::debug!("Parent reference '{}' does not resolve; dead end", dog_id);
            }
            return Ok(());
        };

        let mut current_path = path.to_vec();
        current_path.push(dog.name.clone());

        let entry = AncestorEntry {
            ancestor_id: dog.id.clone(),
            name: dog.name.clone(),
            generation,
            path: current_path.clone(),
        };
        if generation == 0 {
            out.root = Some(entry);
        } else {
            if dog.id == out.root_id {
                log::warn!(
                    "Dog '{}' appears among its own ancestors; pedigree data is cyclic",
                    dog.id
                );
            }
            out.ancestors.entry(dog.id.clone()).or_default().push(entry);
        }

        if let Some(sire_id) = &dog.sire_id {
            self.traverse(sire_id, generation + 1, &current_path, out)?;
        }
        if let Some(dam_id) = &dog.dam_id {
            self.traverse(dam_id, generation + 1, &current_path, out)?;
        }

        Ok(())
    }
}
