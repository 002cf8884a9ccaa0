use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::DogStore;
use crate::error::Result;
use crate::types::{validate_dog_id, validate_generations, DogId, DogRecord, Sex, MAX_GENERATIONS};

/// A dog in a materialized pedigree tree.
///
/// `sire` and `dam` are `None` when the parent is unknown, does not resolve,
/// or lies beyond the requested depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PedigreeNode {
    pub id: DogId,
    pub name: String,
    pub registered_name: Option<String>,
    pub sex: Sex,
    pub birth_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub titles: Option<String>,
    pub photo_url: Option<String>,
    /// Inbreeding coefficient of this dog, when the caller computed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coi: Option<f64>,
    pub sire: Option<Box<PedigreeNode>>,
    pub dam: Option<Box<PedigreeNode>>,
}

impl PedigreeNode {
    fn from_record(dog: DogRecord) -> Self {
        Self {
            id: dog.id,
            name: dog.name,
            registered_name: dog.registered_name,
            sex: dog.sex,
            birth_date: dog.birth_date,
            color: dog.color,
            titles: dog.titles,
            photo_url: dog.photo_url,
            coi: None,
            sire: None,
            dam: None,
        }
    }

    /// Attach a COI annotation.
    pub fn with_coi(mut self, coi: f64) -> Self {
        self.coi = Some(coi);
        self
    }
}

/// Build the pedigree tree of `dog_id` down to `max_generations`.
///
/// The root is generation 0 and its parents generation 1, so a complete tree
/// has `2^(max_generations + 1) - 1` nodes. Sire and dam subtrees are built
/// in parallel. Returns `Ok(None)` if the root does not resolve.
///
/// # Errors
/// `InvalidArgument` for a blank id or `max_generations` outside `[1, 10]`.
/// Store failures are propagated.
pub fn build_pedigree(
    store: &dyn DogStore,
    dog_id: &str,
    max_generations: usize,
) -> Result<Option<PedigreeNode>> {
    validate_dog_id(dog_id, "dog")?;
    validate_generations(max_generations)?;

    let tree = build_subtree(store, dog_id, 0, max_generations)?;
    match &tree {
        Some(root) => log::info!(
            "Built pedigree of '{}' over {} generations: {} dogs",
            dog_id,
            max_generations,
            count_ancestors(Some(root))
        ),
        None => log::debug!("Pedigree root '{}' not found", dog_id),
    }
    Ok(tree)
}

fn build_subtree(
    store: &dyn DogStore,
    dog_id: &str,
    generation: usize,
    max_generations: usize,
) -> Result<Option<PedigreeNode>> {
    if generation > max_generations {
        return Ok(None);
    }
    let Some(dog) = store.find_dog(dog_id)? else {
        return Ok(None);
    };

    let parent = |id: &Option<DogId>| -> Result<Option<Box<PedigreeNode>>> {
        match id {
            Some(id) => {
                let subtree = build_subtree(store, id, generation + 1, max_generations)?;
                Ok(subtree.map(Box::new))
            }
            None => Ok(None),
        }
    };
    let (sire, dam) = rayon::join(|| parent(&dog.sire_id), || parent(&dog.dam_id));
    let (sire, dam) = (sire?, dam?);

    let mut node = PedigreeNode::from_record(dog);
    node.sire = sire;
    node.dam = dam;
    Ok(Some(node))
}

/// Number of dogs in the tree, the root included.
pub fn count_ancestors(pedigree: Option<&PedigreeNode>) -> usize {
    match pedigree {
        None => 0,
        Some(node) => {
            1 + count_ancestors(node.sire.as_deref()) + count_ancestors(node.dam.as_deref())
        }
    }
}

/// Percentage of the `2^(generations + 1) - 1` possible dogs that are known,
/// rounded to the nearest integer.
///
/// `generations` is clamped to `[0, 10]`, the deepest tree
/// [`build_pedigree`] produces.
pub fn calculate_completeness(pedigree: Option<&PedigreeNode>, generations: usize) -> u32 {
    let Some(root) = pedigree else {
        return 0;
    };
    let depth = generations.min(MAX_GENERATIONS);
    let theoretical = (1usize << (depth + 1)) - 1;
    let actual = count_ancestors(Some(root)).min(theoretical);
    (actual as f64 / theoretical as f64 * 100.0).round() as u32
}

/// Every node in pre-order: the dog, then its sire's subtree, then its dam's.
pub fn flatten_pedigree(pedigree: Option<&PedigreeNode>) -> Vec<&PedigreeNode> {
    let mut out = Vec::new();
    if let Some(root) = pedigree {
        collect_pre_order(root, &mut out);
    }
    out
}

fn collect_pre_order<'a>(node: &'a PedigreeNode, out: &mut Vec<&'a PedigreeNode>) {
    out.push(node);
    if let Some(sire) = node.sire.as_deref() {
        collect_pre_order(sire, out);
    }
    if let Some(dam) = node.dam.as_deref() {
        collect_pre_order(dam, out);
    }
}

/// Flattened nodes with repeated ids removed; the first occurrence wins.
pub fn unique_ancestors(pedigree: Option<&PedigreeNode>) -> Vec<&PedigreeNode> {
    let mut seen = HashSet::new();
    flatten_pedigree(pedigree)
        .into_iter()
        .filter(|&node| seen.insert(node.id.as_str()))
        .collect()
}

/// Display name: titles, then the registered name (or the call name).
pub fn format_pedigree_name(node: &PedigreeNode) -> String {
    let name = node.registered_name.as_deref().unwrap_or(&node.name);
    match node.titles.as_deref() {
        Some(titles) if !titles.trim().is_empty() => format!("{} {}", titles.trim(), name),
        _ => name.to_string(),
    }
}

/// One-line summary of a pedigree.
pub fn describe_pedigree(pedigree: Option<&PedigreeNode>, generations: usize) -> String {
    let Some(root) = pedigree else {
        return "Pedigree not available".to_string();
    };
    format!(
        "Pedigree of {} over {} generations. Completeness: {}%. {} unique ancestors.",
        root.name,
        generations,
        calculate_completeness(pedigree, generations),
        unique_ancestors(pedigree).len()
    )
}
