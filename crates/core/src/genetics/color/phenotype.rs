use std::fmt;

use super::genotype::Genotype;
use super::loci::LocusKind;

/// Warning attached to any M/M outcome.
pub const DOUBLE_MERLE_WARNING: &str = "Double merle: high risk of deafness and blindness";

/// Eumelanin colour picked by the Brown and Dilution loci.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseColor {
    Black,
    Chocolate,
    Blue,
    Lilac,
}

impl BaseColor {
    pub fn from_genotype(genotype: &Genotype) -> Self {
        let chocolate = genotype.is_homozygous(LocusKind::Brown, "b");
        let dilute = genotype.is_homozygous(LocusKind::Dilution, "d");
        match (chocolate, dilute) {
            (true, true) => BaseColor::Lilac,
            (true, false) => BaseColor::Chocolate,
            (false, true) => BaseColor::Blue,
            (false, false) => BaseColor::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseColor::Black => "Black",
            BaseColor::Chocolate => "Chocolate",
            BaseColor::Blue => "Blue",
            BaseColor::Lilac => "Lilac",
        }
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable coat resolved from a genotype.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype {
    pub name: String,
    /// Hex colour for display, `#rrggbb`.
    pub display_color: &'static str,
    pub description: String,
    pub warnings: Vec<String>,
}

const FAWN_HEX: &str = "#d4a574";
const BLACK_HEX: &str = "#1a1a1a";
const BLACK_AND_TAN_HEX: &str = "#2d2d2d";

fn display_color(name: &str) -> Option<&'static str> {
    let hex = match name {
        "Black" => BLACK_HEX,
        "Chocolate" => "#5c3317",
        "Blue" => "#4a6670",
        "Lilac" => "#9b8b9e",
        "Fawn" => FAWN_HEX,
        "Red" => "#b5651d",
        "Cream" => "#f5deb3",
        "Black and Tan" => BLACK_AND_TAN_HEX,
        "Chocolate and Tan" => "#6b4423",
        "Blue and Tan" => "#5a7a8a",
        "Brindle" => "#8b7355",
        "Sable" => "#c2b280",
        "Blue Merle" => "#7a9ba8",
        "Red Merle" => "#c9a88a",
        _ => return None,
    };
    Some(hex)
}

impl Phenotype {
    fn new(name: impl Into<String>, fallback: &'static str, description: String) -> Self {
        let name = name.into();
        Self {
            display_color: display_color(&name).unwrap_or(fallback),
            name,
            description,
            warnings: Vec::new(),
        }
    }

    /// Resolve the coat of a fully specified genotype.
    ///
    /// Rules apply in order: recessive red (e/e) masks everything else, then
    /// dominant black (KB) gives a solid base colour, then the most dominant
    /// Agouti allele picks the pattern. Merle never changes the name.
    pub fn resolve(genotype: &Genotype) -> Self {
        let dilute = genotype.is_homozygous(LocusKind::Dilution, "d");
        let mut phenotype = if genotype.is_homozygous(LocusKind::Extension, "e") {
            let name = if dilute {
                "Cream"
            } else if genotype.is_homozygous(LocusKind::Brown, "b") {
                "Red"
            } else {
                "Fawn"
            };
            Self::new(name, FAWN_HEX, format!("Solid {} coat", name.to_lowercase()))
        } else {
            Self::patterned(genotype, BaseColor::from_genotype(genotype), dilute)
        };

        if genotype.is_homozygous(LocusKind::Merle, "M") {
            phenotype.warnings.push(DOUBLE_MERLE_WARNING.to_string());
        }
        phenotype
    }

    fn patterned(genotype: &Genotype, base: BaseColor, dilute: bool) -> Self {
        let lower = base.name().to_lowercase();
        if genotype.carries(LocusKind::DominantBlack, "KB") {
            return Self::new(base.name(), BLACK_HEX, format!("Solid {} coat", lower));
        }

        match genotype.dominant_symbol(LocusKind::Agouti) {
            Some("Ay") => {
                let name = if dilute { "Cream" } else { "Fawn" };
                let description = if dilute {
                    "Dilute fawn coat"
                } else {
                    "Fawn coat"
                };
                Self::new(name, FAWN_HEX, description.to_string())
            }
            Some("aw") => Self::new("Sable", "#c2b280", "Sable (wild agouti) coat".to_string()),
            Some("at") => Self::new(
                format!("{} and Tan", base),
                BLACK_AND_TAN_HEX,
                format!("{} coat with tan points", base),
            ),
            _ => Self::new(
                base.name(),
                BLACK_HEX,
                format!("Solid {} coat (recessive)", lower),
            ),
        }
    }
}
