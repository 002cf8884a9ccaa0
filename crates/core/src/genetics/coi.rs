use serde::Serialize;

use crate::error::{GenealogyError, Result};
use crate::types::{validate_dog_id, validate_generations, DogId};

use super::ancestors::{AncestorWalker, Ancestry};

/// How many common ancestors a [`CoiResult`] reports by default.
pub const DEFAULT_MAX_COMMON_ANCESTORS: usize = 10;

/// Interpretation band of an inbreeding coefficient.
///
/// Boundaries are inclusive-lower, exclusive-upper: 6.25% is already `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoiBand {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl CoiBand {
    pub fn from_coefficient(coi: f64) -> Self {
        if coi < 0.0625 {
            CoiBand::VeryLow
        } else if coi < 0.125 {
            CoiBand::Low
        } else if coi < 0.25 {
            CoiBand::Moderate
        } else if coi < 0.375 {
            CoiBand::High
        } else {
            CoiBand::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoiBand::VeryLow => "Very low - excellent mating choice",
            CoiBand::Low => "Low - good mating choice",
            CoiBand::Moderate => "Moderate - acceptable with monitoring",
            CoiBand::High => "High - mating discouraged",
            CoiBand::VeryHigh => "Very high - mating strongly discouraged",
        }
    }

    /// Traffic-light colour used when displaying the band.
    pub fn risk_color(self) -> &'static str {
        match self {
            CoiBand::VeryLow => "green",
            CoiBand::Low => "lime",
            CoiBand::Moderate => "yellow",
            CoiBand::High => "orange",
            CoiBand::VeryHigh => "red",
        }
    }
}

/// One sire-side path paired with one dam-side path to the same ancestor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPair {
    pub sire_path: Vec<String>,
    pub dam_path: Vec<String>,
}

/// An ancestor shared by both prospective parents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonAncestor {
    pub id: DogId,
    pub name: String,
    /// Contribution to the offspring's COI, in percent.
    pub contribution_percent: f64,
    pub paths: Vec<PathPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoiResult {
    /// Expected inbreeding of the offspring, in `[0, 1]`.
    pub coefficient: f64,
    /// `coefficient` as a percentage with two decimals, e.g. `"25.00%"`.
    pub percentage: String,
    pub interpretation: String,
    pub band: CoiBand,
    /// Largest contributors first, truncated to the configured maximum.
    pub common_ancestors: Vec<CommonAncestor>,
}

impl CoiResult {
    fn from_parts(coefficient: f64, common_ancestors: Vec<CommonAncestor>) -> Self {
        let band = CoiBand::from_coefficient(coefficient);
        Self {
            coefficient,
            percentage: format!("{:.2}%", coefficient * 100.0),
            interpretation: band.label().to_string(),
            band,
            common_ancestors,
        }
    }
}

/// Wright's path coefficient for one pair of paths meeting at a common
/// ancestor whose own inbreeding is taken as zero.
pub fn path_contribution(sire_generation: usize, dam_generation: usize) -> f64 {
    0.5_f64.powi((sire_generation + dam_generation + 1) as i32)
}

/// Compute the expected inbreeding coefficient of an offspring of `sire_id`
/// and `dam_id` from pedigree topology.
///
/// Both parents are walked to `generations` (in parallel). Each parent counts
/// as a generation-0 member of its own lineage, so mating a dog to its own
/// descendant is scored. For every common ancestor, every pairing of a
/// sire-side path with a dam-side path adds `0.5^(n1 + n2 + 1)`.
///
/// `coefficient` sums over all common ancestors; only the list of ancestors
/// is truncated to `max_common_ancestors`.
///
/// # Errors
/// `InvalidArgument` for blank or identical ids, or `generations` outside
/// `[1, 10]`. Store failures are propagated.
pub fn compute_coi(
    walker: &AncestorWalker<'_>,
    sire_id: &str,
    dam_id: &str,
    generations: usize,
    max_common_ancestors: usize,
) -> Result<CoiResult> {
    validate_dog_id(sire_id, "sire")?;
    validate_dog_id(dam_id, "dam")?;
    validate_generations(generations)?;
    if sire_id == dam_id {
        return Err(GenealogyError::InvalidArgument(format!(
            "sire and dam must be different dogs (both are '{}')",
            sire_id
        )));
    }

    let (sire_walk, dam_walk) = rayon::join(
        || walker.walk(sire_id, generations),
        || walker.walk(dam_id, generations),
    );
    let (sire_walk, dam_walk) = (sire_walk?, dam_walk?);

    let result = coi_from_ancestries(&sire_walk, &dam_walk, max_common_ancestors);
    log::info!(
        "COI {} x {} over {} generations: {} ({} common ancestors)",
        sire_id,
        dam_id,
        generations,
        result.percentage,
        result.common_ancestors.len()
    );
    Ok(result)
}

/// Combine two completed walks into a [`CoiResult`]. Performs no I/O.
pub fn coi_from_ancestries(
    sire: &Ancestry,
    dam: &Ancestry,
    max_common_ancestors: usize,
) -> CoiResult {
    let sire_lineage = sire.lineage();
    let dam_lineage = dam.lineage();

    let mut total = 0.0;
    let mut common = Vec::new();

    for (&ancestor_id, sire_entries) in &sire_lineage {
        let Some(dam_entries) = dam_lineage.get(ancestor_id) else {
            continue;
        };

        let mut contribution = 0.0;
        let mut paths = Vec::with_capacity(sire_entries.len() * dam_entries.len());
        for s in sire_entries {
            for d in dam_entries {
                contribution += path_contribution(s.generation, d.generation);
                paths.push(PathPair {
                    sire_path: s.path.clone(),
                    dam_path: d.path.clone(),
                });
            }
        }

        if contribution > 0.0 {
            total += contribution;
            common.push(CommonAncestor {
                id: ancestor_id.to_string(),
                name: sire_entries[0].name.clone(),
                contribution_percent: contribution * 100.0,
                paths,
            });
        }
    }

    // Stable sort: ties keep sire-side discovery order.
    common.sort_by(|a, b| b.contribution_percent.total_cmp(&a.contribution_percent));
    common.truncate(max_common_ancestors);

    if total > 1.0 {
        log::warn!(
            "Path-counted COI of {:.4} exceeds 1 for {} x {}; clamping",
            total,
            sire.root_id(),
            dam.root_id()
        );
    }

    CoiResult::from_parts(total.clamp(0.0, 1.0), common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryDogStore;
    use crate::genetics::cache::NoCache;
    use crate::types::DogRecord;

    fn assert_approx(actual: f64, expected: f64, msg: &str) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "{}: expected {}, got {}",
            msg,
            expected,
            actual
        );
    }

    fn coi(store: &MemoryDogStore, sire: &str, dam: &str, generations: usize) -> CoiResult {
        let walker = AncestorWalker::new(store, &NoCache);
        compute_coi(&walker, sire, dam, generations, DEFAULT_MAX_COMMON_ANCESTORS).unwrap()
    }

    #[test]
    fn test_full_siblings() {
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("1", "Founder Sire"),
            DogRecord::new("2", "Founder Dam"),
            DogRecord::new("3", "Brother").with_parents("1", "2"),
            DogRecord::new("4", "Sister").with_parents("1", "2"),
        ])
        .unwrap();
        let result = coi(&store, "3", "4", 5);

        assert_approx(result.coefficient, 0.25, "full-sib COI");
        assert_eq!(result.percentage, "25.00%");
        assert_eq!(result.band, CoiBand::High);
        assert_eq!(result.common_ancestors.len(), 2);
        for ca in &result.common_ancestors {
            assert_approx(ca.contribution_percent, 12.5, &ca.id);
            assert_eq!(ca.paths.len(), 1);
        }
        assert_eq!(result.common_ancestors[0].id, "1");
        assert_eq!(
            result.common_ancestors[0].paths[0].sire_path,
            vec!["Brother", "Founder Sire"]
        );
        assert_eq!(
            result.common_ancestors[0].paths[0].dam_path,
            vec!["Sister", "Founder Sire"]
        );
    }

    #[test]
    fn test_half_siblings() {
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("f", "Shared Sire"),
            DogRecord::new("m1", "Dam One"),
            DogRecord::new("m2", "Dam Two"),
            DogRecord::new("a", "Half A").with_parents("f", "m1"),
            DogRecord::new("b", "Half B").with_parents("f", "m2"),
        ])
        .unwrap();
        let result = coi(&store, "a", "b", 3);

        assert_approx(result.coefficient, 0.125, "half-sib COI");
        assert_eq!(result.band, CoiBand::Moderate);
        assert_eq!(result.common_ancestors.len(), 1);
        assert_eq!(result.common_ancestors[0].name, "Shared Sire");
    }

    #[test]
    fn test_parent_offspring() {
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("s", "Sire"),
            DogRecord::new("d", "Dam"),
            DogRecord::new("x", "Daughter").with_parents("s", "d"),
        ])
        .unwrap();
        let result = coi(&store, "s", "x", 3);

        // Sire is generation 0 on his own side and 1 on the daughter's.
        assert_approx(result.coefficient, 0.25, "sire x daughter COI");
        assert_eq!(result.common_ancestors.len(), 1);
        assert_eq!(result.common_ancestors[0].id, "s");
        assert_eq!(result.common_ancestors[0].paths[0].sire_path, vec!["Sire"]);
    }

    #[test]
    fn test_unrelated_is_zero() {
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("1", "A"),
            DogRecord::new("2", "B"),
            DogRecord::new("3", "C"),
            DogRecord::new("4", "D"),
            DogRecord::new("5", "S").with_parents("1", "2"),
            DogRecord::new("6", "T").with_parents("3", "4"),
        ])
        .unwrap();
        let result = coi(&store, "5", "6", 10);

        assert_eq!(result.coefficient, 0.0);
        assert!(result.common_ancestors.is_empty());
        assert_eq!(result.band, CoiBand::VeryLow);
        assert_eq!(result.percentage, "0.00%");
    }

    #[test]
    fn test_unknown_parents_give_zero() {
        let store = MemoryDogStore::new();
        let result = coi(&store, "ghost-1", "ghost-2", 5);
        assert_eq!(result.coefficient, 0.0);
        assert!(result.common_ancestors.is_empty());
    }

    #[test]
    fn test_all_path_pairs_combined() {
        // G is a grandparent twice on each side; every pairing counts.
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("g", "Grand"),
            DogRecord::new("p1", "P1").with_sire("g"),
            DogRecord::new("p2", "P2").with_sire("g"),
            DogRecord::new("p3", "P3").with_sire("g"),
            DogRecord::new("p4", "P4").with_sire("g"),
            DogRecord::new("sire", "Sire").with_parents("p1", "p2"),
            DogRecord::new("dam", "Dam").with_parents("p3", "p4"),
        ])
        .unwrap();
        let result = coi(&store, "sire", "dam", 2);

        // 2 x 2 pairings, each 0.5^(2+2+1).
        assert_approx(result.coefficient, 4.0 * 0.5_f64.powi(5), "pairwise COI");
        assert_eq!(result.common_ancestors.len(), 1);
        assert_eq!(result.common_ancestors[0].paths.len(), 4);
    }

    #[test]
    fn test_generation_bound_limits_common_ancestors() {
        let store = MemoryDogStore::from_records(vec![
            DogRecord::new("g", "Grand"),
            DogRecord::new("p1", "P1").with_sire("g"),
            DogRecord::new("p2", "P2").with_sire("g"),
            DogRecord::new("sire", "Sire").with_sire("p1"),
            DogRecord::new("dam", "Dam").with_sire("p2"),
        ])
        .unwrap();

        assert_eq!(coi(&store, "sire", "dam", 1).coefficient, 0.0);
        assert_approx(coi(&store, "sire", "dam", 2).coefficient, 0.5_f64.powi(5), "cousins");
    }

    #[test]
    fn test_truncates_list_but_not_total() {
        // Two parallel sire lines sl0 -> sl1 -> ... and dl0 -> dl1 -> ...
        // where sl_k and dl_k share founder f_k as dam. From sl0, f_k sits at
        // generation k + 1, so ten founders are common within 10 generations.
        let mut records = Vec::new();
        for k in 0..12 {
            let founder = format!("f{}", k);
            records.push(DogRecord::new(&founder, &format!("Founder {}", k)));
            for line in ["sl", "dl"] {
                let mut rec = DogRecord::new(&format!("{}{}", line, k), &format!("{}{}", line, k))
                    .with_dam(&founder);
                if k + 1 < 12 {
                    rec = rec.with_sire(&format!("{}{}", line, k + 1));
                }
                records.push(rec);
            }
        }
        let store = MemoryDogStore::from_records(records).unwrap();
        let walker = AncestorWalker::new(&store, &NoCache);

        let full = compute_coi(&walker, "sl0", "dl0", 10, 100).unwrap();
        let capped = compute_coi(&walker, "sl0", "dl0", 10, 3).unwrap();

        assert_eq!(full.common_ancestors.len(), 10);
        assert_eq!(capped.common_ancestors.len(), 3);
        assert_approx(capped.coefficient, full.coefficient, "total is not truncated");
        let expected: f64 = (0..10).map(|k| 0.5_f64.powi(2 * (k + 1) + 1)).sum();
        assert_approx(full.coefficient, expected, "chained founders");
        assert_eq!(capped.common_ancestors[0].id, "f0");
        assert!(
            capped.common_ancestors[0].contribution_percent
                > capped.common_ancestors[1].contribution_percent
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let store = MemoryDogStore::new();
        let walker = AncestorWalker::new(&store, &NoCache);

        for g in [0, 11, 100] {
            assert!(matches!(
                compute_coi(&walker, "a", "b", g, 10),
                Err(GenealogyError::InvalidArgument(_))
            ));
        }
        assert!(compute_coi(&walker, "", "b", 5, 10).is_err());
        assert!(compute_coi(&walker, "a", " ", 5, 10).is_err());
        assert!(compute_coi(&walker, "a", "a", 5, 10).is_err());
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CoiBand::from_coefficient(0.0), CoiBand::VeryLow);
        assert_eq!(CoiBand::from_coefficient(0.0624), CoiBand::VeryLow);
        assert_eq!(CoiBand::from_coefficient(0.0625), CoiBand::Low);
        assert_eq!(CoiBand::from_coefficient(0.125), CoiBand::Moderate);
        assert_eq!(CoiBand::from_coefficient(0.2499), CoiBand::Moderate);
        assert_eq!(CoiBand::from_coefficient(0.25), CoiBand::High);
        assert_eq!(CoiBand::from_coefficient(0.375), CoiBand::VeryHigh);
        assert_eq!(CoiBand::from_coefficient(1.0), CoiBand::VeryHigh);
    }

    #[test]
    fn test_risk_colors() {
        assert_eq!(CoiBand::VeryLow.risk_color(), "green");
        assert_eq!(CoiBand::Moderate.risk_color(), "yellow");
        assert_eq!(CoiBand::VeryHigh.risk_color(), "red");
    }
}
