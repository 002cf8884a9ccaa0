// Genetics module
// Ancestor walks, COI, coat colour prediction, pedigree trees

pub mod ancestors;
pub mod cache;
pub mod coi;
pub mod color;
pub mod pedigree;

pub use ancestors::{AncestorEntry, AncestorWalker, Ancestry};
pub use cache::{AncestorCache, NoCache, TtlAncestorCache, WalkKey, DEFAULT_CACHE_TTL};
pub use coi::{
    coi_from_ancestries, compute_coi, path_contribution, CoiBand, CoiResult, CommonAncestor,
    PathPair, DEFAULT_MAX_COMMON_ANCESTORS,
};
pub use color::{
    default_genotype, predict_colors, predict_litter_colors, validate_genotype, ColorPrediction,
    Genotype, RawGenotype,
};
pub use pedigree::{
    build_pedigree, calculate_completeness, count_ancestors, describe_pedigree,
    flatten_pedigree, format_pedigree_name, unique_ancestors, PedigreeNode,
};
