//! The genealogy engine: one dog store, one walk cache and the settings
//! shared by every request.

mod builder;

pub use builder::GenealogyEngineBuilder;

use std::sync::Arc;

use crate::data::DogStore;
use crate::error::Result;
use crate::genetics::ancestors::AncestorWalker;
use crate::genetics::cache::AncestorCache;
use crate::genetics::coi::{self, CoiResult};
use crate::genetics::color::{self, ColorPrediction, RawGenotype};
use crate::genetics::pedigree::{self, PedigreeNode};
use crate::types::{validate_dog_id, validate_generations};

/// Entry point for COI, colour and pedigree requests.
///
/// Requests may run concurrently from many threads; the walk cache is the
/// only shared mutable state.
pub struct GenealogyEngine {
    store: Arc<dyn DogStore>,
    cache: Arc<dyn AncestorCache>,
    default_generations: usize,
    max_common_ancestors: usize,
}

impl GenealogyEngine {
    pub fn builder() -> GenealogyEngineBuilder {
        GenealogyEngineBuilder::new()
    }

    pub fn default_generations(&self) -> usize {
        self.default_generations
    }

    pub fn max_common_ancestors(&self) -> usize {
        self.max_common_ancestors
    }

    /// The caller's generation bound, or the configured default when none is
    /// given.
    ///
    /// # Errors
    /// `InvalidArgument` if an explicit bound lies outside `[1, 10]`.
    pub fn resolve_generations(&self, generations: Option<usize>) -> Result<usize> {
        match generations {
            Some(g) => {
                validate_generations(g)?;
                Ok(g)
            }
            None => Ok(self.default_generations),
        }
    }

    fn walker(&self) -> AncestorWalker<'_> {
        AncestorWalker::new(self.store.as_ref(), self.cache.as_ref())
    }

    /// Expected COI of an offspring of `sire_id` x `dam_id`.
    ///
    /// # Errors
    /// `InvalidArgument` for blank or identical ids or `generations` outside
    /// `[1, 10]`; store failures are propagated.
    pub fn compute_coi(
        &self,
        sire_id: &str,
        dam_id: &str,
        generations: usize,
    ) -> Result<CoiResult> {
        self.cache.sweep_expired();
        coi::compute_coi(
            &self.walker(),
            sire_id,
            dam_id,
            generations,
            self.max_common_ancestors,
        )
    }

    /// COI of an existing dog, computed from its recorded parents.
    ///
    /// Returns `Ok(None)` when the dog does not resolve, either parent is
    /// unknown, or both parents are recorded as the same dog.
    pub fn compute_dog_coi(&self, dog_id: &str, generations: usize) -> Result<Option<CoiResult>> {
        validate_dog_id(dog_id, "dog")?;
        validate_generations(generations)?;

        let Some(dog) = self.store.find_dog(dog_id)? else {
            return Ok(None);
        };
        match (dog.sire_id.as_deref(), dog.dam_id.as_deref()) {
            (Some(sire_id), Some(dam_id)) if sire_id == dam_id => {
                log::warn!(
                    "Dog '{}' has '{}' recorded as both sire and dam; no COI",
                    dog_id,
                    sire_id
                );
                Ok(None)
            }
            (Some(sire_id), Some(dam_id)) => {
                self.compute_coi(sire_id, dam_id, generations).map(Some)
            }
            _ => {
                log::debug!("Dog '{}' lacks a recorded sire or dam; no COI", dog_id);
                Ok(None)
            }
        }
    }

    /// Predict litter colours from two raw genotypes.
    ///
    /// # Errors
    /// `InvalidGenotype` listing every problem in either genotype.
    pub fn predict_colors(
        &self,
        sire: &RawGenotype,
        dam: &RawGenotype,
    ) -> Result<Vec<ColorPrediction>> {
        color::predict_colors(sire, dam)
    }

    /// Pedigree tree of `dog_id`, or `None` if it does not resolve.
    pub fn build_pedigree(
        &self,
        dog_id: &str,
        generations: usize,
    ) -> Result<Option<PedigreeNode>> {
        pedigree::build_pedigree(self.store.as_ref(), dog_id, generations)
    }

    /// Pedigree tree whose root carries its own COI, when both parents are
    /// known.
    pub fn build_pedigree_with_coi(
        &self,
        dog_id: &str,
        generations: usize,
    ) -> Result<Option<PedigreeNode>> {
        let Some(tree) = self.build_pedigree(dog_id, generations)? else {
            return Ok(None);
        };
        Ok(Some(match self.compute_dog_coi(dog_id, generations)? {
            Some(result) => tree.with_coi(result.coefficient),
            None => tree,
        }))
    }

    /// Drop every cached walk so the next request sees current store data.
    pub fn clear_cache(&self) {
        self.cache.clear();
        log::debug!("Ancestor cache cleared");
    }
}
