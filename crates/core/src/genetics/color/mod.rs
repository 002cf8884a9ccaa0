//! Mendelian coat colour prediction.
//!
//! Each locus is crossed independently with a Punnett square, the per-locus
//! outcomes are combined as a cartesian product, and every offspring genotype
//! is resolved to a phenotype. Outcomes sharing a phenotype are merged.

pub mod genotype;
pub mod loci;
pub mod phenotype;
pub mod punnett;

pub use genotype::{default_genotype, validate_genotype, Genotype, RawGenotype};
pub use loci::{Allele, AlleleInfo, AllelePair, Locus, LocusKind, CORE_LOCI, OPTIONAL_LOCI};
pub use phenotype::{BaseColor, Phenotype, DOUBLE_MERLE_WARNING};
pub use punnett::punnett_square;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{GenealogyError, Result};

/// One predicted coat for a litter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPrediction {
    pub phenotype: String,
    /// Genotype of the first combination that produced this phenotype.
    pub genotype: String,
    /// Probability in `[0, 1]`.
    pub probability: f64,
    pub display_color: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Predict the coat colours of a litter from two validated genotypes.
///
/// Core loci are always crossed; Spotting and Merle only when both parents
/// carry them. The result has one entry per phenotype name, sorted by
/// probability (highest first), and the probabilities sum to 1.
pub fn predict_litter_colors(sire: &Genotype, dam: &Genotype) -> Vec<ColorPrediction> {
    let loci: Vec<LocusKind> = LocusKind::ALL
        .into_iter()
        .filter(|locus| locus.is_core() || (sire.has_locus(*locus) && dam.has_locus(*locus)))
        .collect();

    let combinations = punnett::enumerate_cross(sire, dam, &loci);
    log::debug!(
        "Crossing {} x {}: {} genotype combinations",
        sire,
        dam,
        combinations.len()
    );

    let mut by_phenotype: IndexMap<String, ColorPrediction> = IndexMap::new();
    for combo in combinations {
        let phenotype = Phenotype::resolve(&combo.genotype);
        match by_phenotype.get_mut(&phenotype.name) {
            Some(prediction) => {
                prediction.probability += combo.probability;
                for warning in phenotype.warnings {
                    if !prediction.warnings.contains(&warning) {
                        prediction.warnings.push(warning);
                    }
                }
            }
            None => {
                by_phenotype.insert(
                    phenotype.name.clone(),
                    ColorPrediction {
                        phenotype: phenotype.name,
                        genotype: combo.genotype.to_string(),
                        probability: combo.probability,
                        display_color: phenotype.display_color.to_string(),
                        description: phenotype.description,
                        warnings: phenotype.warnings,
                    },
                );
            }
        }
    }

    let mut predictions: Vec<ColorPrediction> = by_phenotype.into_values().collect();
    predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    predictions
}

/// Validate two raw genotypes and predict the litter's colours.
///
/// # Errors
/// Returns `InvalidGenotype` listing every problem in both genotypes,
/// prefixed with `sire: ` or `dam: `. Nothing is computed on invalid input.
pub fn predict_colors(sire: &RawGenotype, dam: &RawGenotype) -> Result<Vec<ColorPrediction>> {
    let mut errors: Vec<String> = validate_genotype(sire)
        .into_iter()
        .map(|e| format!("sire: {}", e))
        .collect();
    errors.extend(validate_genotype(dam).into_iter().map(|e| format!("dam: {}", e)));
    if !errors.is_empty() {
        return Err(GenealogyError::InvalidGenotype(errors));
    }

    let sire = Genotype::from_raw(sire)?;
    let dam = Genotype::from_raw(dam)?;
    Ok(predict_litter_colors(&sire, &dam))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotype(compact: &str) -> Genotype {
        compact.parse().unwrap()
    }

    fn total(predictions: &[ColorPrediction]) -> f64 {
        predictions.iter().map(|p| p.probability).sum()
    }

    #[test]
    fn test_homozygous_dominant_cross_single_outcome() {
        let g = genotype("E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D");
        let predictions = predict_litter_colors(&g, &g);

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].phenotype, "Black");
        assert_eq!(predictions[0].probability, 1.0);
        assert_eq!(predictions[0].genotype, "E/E B/B KB/KB Ay/Ay D/D");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let crosses = [
            ("E=E/e B=B/b K=KB/ky A=Ay/at D=D/d", "E=E/e B=B/b K=kbr/ky A=aw/a D=D/d"),
            ("E=Em/e B=b/b K=ky/ky A=at/a D=d/d", "E=e/e B=B/b K=KB/kbr A=Ay/aw D=D/D"),
            (
                "E=E/e B=B/b K=ky/ky A=at/a D=D/d S=S/sp M=M/m",
                "E=E/e B=B/b K=ky/ky A=at/a D=D/d S=sp/sw M=M/m",
            ),
        ];
        for (sire, dam) in crosses {
            let predictions = predict_litter_colors(&genotype(sire), &genotype(dam));
            assert!(
                (total(&predictions) - 1.0).abs() < 1e-9,
                "{} x {} sums to {}",
                sire,
                dam,
                total(&predictions)
            );
        }
    }

    #[test]
    fn test_sorted_by_probability_descending() {
        let g = genotype("E=E/e B=B/b K=ky/ky A=at/a D=D/d");
        let predictions = predict_litter_colors(&g, &g);

        assert!(predictions.len() > 1);
        for w in predictions.windows(2) {
            assert!(w[0].probability >= w[1].probability);
        }
        // E_ (3/4) x B_ (3/4) x D_ (3/4) x at_ (3/4)
        let black_tan = predictions
            .iter()
            .find(|p| p.phenotype == "Black and Tan")
            .unwrap();
        assert!((black_tan.probability - 81.0 / 256.0).abs() < 1e-12);
        assert_eq!(predictions[0].phenotype, "Black and Tan");
    }

    #[test]
    fn test_carrier_cross_gives_quarter_red() {
        let g = genotype("E=E/e B=B/B K=KB/KB A=Ay/Ay D=D/D");
        let predictions = predict_litter_colors(&g, &g);

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].phenotype, "Black");
        assert!((predictions[0].probability - 0.75).abs() < 1e-12);
        assert_eq!(predictions[1].phenotype, "Fawn");
        assert!((predictions[1].probability - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_merle_only_crossed_when_both_parents_carry_it() {
        let merle = genotype("E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D M=M/m");
        let plain = genotype("E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D");

        let one_sided = predict_litter_colors(&merle, &plain);
        assert_eq!(one_sided.len(), 1);
        assert!(one_sided[0].warnings.is_empty());
        assert!(!one_sided[0].genotype.contains("M"));

        let both = predict_litter_colors(&merle, &merle);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].warnings, vec![DOUBLE_MERLE_WARNING.to_string()]);
        assert!((both[0].probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_colors_validates_both_parents() {
        let mut sire = default_genotype().to_raw();
        sire.remove("D");
        let mut dam = default_genotype().to_raw();
        dam.insert("B".to_string(), vec!["B".to_string()]);

        match predict_colors(&sire, &dam) {
            Err(GenealogyError::InvalidGenotype(errors)) => {
                assert_eq!(errors.len(), 2, "errors: {:?}", errors);
                assert_eq!(errors[0], "sire: Locus D is required");
                assert!(errors[1].starts_with("dam: Locus B must have exactly 2"));
            }
            other => panic!("expected InvalidGenotype, got {:?}", other),
        }
    }

    #[test]
    fn test_predict_colors_from_raw() {
        let raw = default_genotype().to_raw();
        let predictions = predict_colors(&raw, &raw).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].phenotype, "Fawn");
        assert_eq!(predictions[0].display_color, "#d4a574");
    }

    #[test]
    fn test_prediction_serializes_without_empty_warnings() {
        let g = genotype("E=E/E B=B/B K=KB/KB A=Ay/Ay D=D/D");
        let json = serde_json::to_value(&predict_litter_colors(&g, &g)[0]).unwrap();
        assert_eq!(json["phenotype"], "Black");
        assert!(json.get("warnings").is_none());
    }
}
