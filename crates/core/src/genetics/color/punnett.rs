use indexmap::IndexMap;

use super::genotype::Genotype;
use super::loci::{AllelePair, LocusKind};

/// Offspring distribution at one locus: canonical pairs with their
/// probabilities, in first-seen order.
pub type LocusOutcomes = Vec<(AllelePair, f64)>;

/// Cross two allele pairs of the same locus.
///
/// Each of the four Mendelian combinations (sire allele x dam allele) has
/// probability 0.25. Combinations that canonicalize to the same pair are
/// merged, so the result has between one and four entries and always sums
/// to 1.
pub fn punnett_square(sire: &AllelePair, dam: &AllelePair) -> LocusOutcomes {
    let mut outcomes: IndexMap<AllelePair, f64> = IndexMap::with_capacity(4);
    for s in sire.alleles() {
        for d in dam.alleles() {
            *outcomes.entry(AllelePair::new(s, d)).or_insert(0.0) += 0.25;
        }
    }
    outcomes.into_iter().collect()
}

/// One fully specified offspring genotype and its probability.
#[derive(Debug, Clone)]
pub struct Combination {
    pub genotype: Genotype,
    pub probability: f64,
}

/// Every offspring genotype of a cross, one per cartesian combination of the
/// per-locus outcomes.
///
/// `loci` lists the loci to cross; both parents must carry each of them.
/// Loci are treated as unlinked, so a combination's probability is the
/// product of its per-locus probabilities.
pub fn enumerate_cross(sire: &Genotype, dam: &Genotype, loci: &[LocusKind]) -> Vec<Combination> {
    let mut combinations = vec![Combination {
        genotype: Genotype::empty(),
        probability: 1.0,
    }];

    for &locus in loci {
        let (Some(s), Some(d)) = (sire.pair(locus), dam.pair(locus)) else {
            continue;
        };
        let outcomes = punnett_square(s, d);

        combinations = combinations
            .iter()
            .flat_map(|combo| {
                outcomes.iter().map(move |(pair, p)| {
                    let mut genotype = combo.genotype.clone();
                    genotype.insert(*pair);
                    Combination {
                        genotype,
                        probability: combo.probability * p,
                    }
                })
            })
            .collect();
    }

    combinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::color::loci::{Allele, CORE_LOCI};

    fn pair(locus: LocusKind, a: &str, b: &str) -> AllelePair {
        AllelePair::new(
            Allele::parse(locus, a).unwrap(),
            Allele::parse(locus, b).unwrap(),
        )
    }

    fn total(outcomes: &LocusOutcomes) -> f64 {
        outcomes.iter().map(|(_, p)| p).sum()
    }

    #[test]
    fn test_heterozygous_cross() {
        let bb = pair(LocusKind::Brown, "B", "b");
        let outcomes = punnett_square(&bb, &bb);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], (pair(LocusKind::Brown, "B", "B"), 0.25));
        assert_eq!(outcomes[1], (pair(LocusKind::Brown, "B", "b"), 0.5));
        assert_eq!(outcomes[2], (pair(LocusKind::Brown, "b", "b"), 0.25));
    }

    #[test]
    fn test_homozygous_cross_is_certain() {
        let dd = pair(LocusKind::Dilution, "d", "d");
        let outcomes = punnett_square(&dd, &dd);
        assert_eq!(outcomes, vec![(dd, 1.0)]);
    }

    #[test]
    fn test_four_distinct_outcomes() {
        let sire = pair(LocusKind::Agouti, "Ay", "at");
        let dam = pair(LocusKind::Agouti, "aw", "a");
        let outcomes = punnett_square(&sire, &dam);

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|(_, p)| *p == 0.25));
        let labels: Vec<String> = outcomes.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(labels, vec!["Ay/aw", "Ay/a", "aw/at", "at/a"]);
    }

    #[test]
    fn test_locus_probabilities_sum_to_one() {
        let crosses = [
            ("KB", "ky", "kbr", "ky"),
            ("KB", "KB", "ky", "ky"),
            ("kbr", "ky", "kbr", "ky"),
        ];
        for (a, b, c, d) in crosses {
            let outcomes = punnett_square(
                &pair(LocusKind::DominantBlack, a, b),
                &pair(LocusKind::DominantBlack, c, d),
            );
            assert!((total(&outcomes) - 1.0).abs() < 1e-12);
            assert!(outcomes.len() <= 4);
        }
    }

    #[test]
    fn test_enumerate_cross_multiplies() {
        let sire: Genotype = "E=E/e B=B/b K=ky/ky A=at/at D=D/d".parse().unwrap();
        let dam: Genotype = "E=E/e B=B/b K=ky/ky A=at/at D=D/d".parse().unwrap();
        let combos = enumerate_cross(&sire, &dam, &CORE_LOCI);

        // 3 x 3 x 1 x 1 x 3
        assert_eq!(combos.len(), 27);
        let sum: f64 = combos.iter().map(|c| c.probability).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(combos.iter().all(|c| c.genotype.has_locus(LocusKind::Dilution)));
    }

    #[test]
    fn test_enumerate_cross_skips_missing_locus() {
        let sire: Genotype = "E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D M=M/m".parse().unwrap();
        let dam: Genotype = "E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D".parse().unwrap();
        let combos = enumerate_cross(&sire, &dam, &LocusKind::ALL);

        assert_eq!(combos.len(), 1);
        assert!(!combos[0].genotype.has_locus(LocusKind::Merle));
    }
}
