use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{GenealogyError, Result};

use super::loci::{Allele, AllelePair, LocusKind, CORE_LOCI};

/// Genotype as supplied by a caller: locus symbol to allele symbols.
///
/// Deserializes from JSON such as `{"E": ["E", "e"], "B": ["B", "B"], ...}`.
pub type RawGenotype = BTreeMap<String, Vec<String>>;

/// A validated genotype.
///
/// Always carries the five core loci; Spotting and Merle are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    pairs: BTreeMap<LocusKind, AllelePair>,
}

impl Genotype {
    /// Empty genotype, filled in locus by locus while enumerating a cross.
    pub(crate) fn empty() -> Self {
        Self {
            pairs: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, pair: AllelePair) {
        self.pairs.insert(pair.locus(), pair);
    }

    /// Validate a raw genotype.
    ///
    /// # Errors
    /// Returns `InvalidGenotype` with one message per problem found.
    pub fn from_raw(raw: &RawGenotype) -> Result<Self> {
        let mut errors = Vec::new();
        let mut genotype = Genotype::empty();

        for (locus_symbol, alleles) in raw {
            let Some(locus) = LocusKind::from_symbol(locus_symbol) else {
                errors.push(format!("Unknown locus '{}'", locus_symbol));
                continue;
            };
            match parse_pair(locus, alleles) {
                Ok(pair) => genotype.insert(pair),
                Err(mut e) => errors.append(&mut e),
            }
        }

        for locus in CORE_LOCI {
            if !raw.contains_key(locus.symbol()) {
                errors.push(format!("Locus {} is required", locus));
            }
        }

        if errors.is_empty() {
            Ok(genotype)
        } else {
            Err(GenealogyError::InvalidGenotype(errors))
        }
    }

    /// Parse and validate a JSON genotype such as
    /// `{"E": ["E", "e"], "B": ["B", "B"], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawGenotype = serde_json::from_str(json)?;
        Self::from_raw(&raw)
    }

    pub fn pair(&self, locus: LocusKind) -> Option<&AllelePair> {
        self.pairs.get(&locus)
    }

    pub fn has_locus(&self, locus: LocusKind) -> bool {
        self.pairs.contains_key(&locus)
    }

    /// Loci in display order.
    pub fn iter(&self) -> impl Iterator<Item = (LocusKind, &AllelePair)> {
        self.pairs.iter().map(|(k, v)| (*k, v))
    }

    /// Whether both alleles at `locus` are `symbol`. False if the locus is
    /// absent.
    pub fn is_homozygous(&self, locus: LocusKind, symbol: &str) -> bool {
        self.pair(locus).is_some_and(|p| p.is_homozygous(symbol))
    }

    /// Whether either allele at `locus` is `symbol`.
    pub fn carries(&self, locus: LocusKind, symbol: &str) -> bool {
        self.pair(locus).is_some_and(|p| p.carries(symbol))
    }

    /// Symbol of the most dominant allele at `locus`.
    pub fn dominant_symbol(&self, locus: LocusKind) -> Option<&'static str> {
        self.pair(locus).map(|p| p.dominant().symbol())
    }

    pub fn to_raw(&self) -> RawGenotype {
        self.pairs
            .iter()
            .map(|(locus, pair)| {
                let alleles = pair.alleles().iter().map(|a| a.symbol().to_string()).collect();
                (locus.symbol().to_string(), alleles)
            })
            .collect()
    }
}

impl Serialize for Genotype {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

/// `E/e B/B KB/ky Ay/at D/d`, loci in fixed order.
impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in self.pairs.values() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", pair)?;
            first = false;
        }
        Ok(())
    }
}

/// Parses the compact form `E=E/e B=B/b K=ky/ky A=at/a D=D/d`. Entries may
/// be separated by whitespace or commas.
impl FromStr for Genotype {
    type Err = GenealogyError;

    fn from_str(s: &str) -> Result<Self> {
        let mut raw = RawGenotype::new();
        let mut errors = Vec::new();

        for token in s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            match token.split_once('=') {
                Some((locus, alleles)) => {
                    let alleles = alleles.split('/').map(|a| a.trim().to_string()).collect();
                    if raw.insert(locus.trim().to_string(), alleles).is_some() {
                        errors.push(format!("Locus {} is given more than once", locus.trim()));
                    }
                }
                None => errors.push(format!(
                    "Malformed entry '{}' (expected LOCUS=allele/allele)",
                    token
                )),
            }
        }

        if !errors.is_empty() {
            return Err(GenealogyError::InvalidGenotype(errors));
        }
        Genotype::from_raw(&raw)
    }
}

fn parse_pair(
    locus: LocusKind,
    alleles: &[String],
) -> std::result::Result<AllelePair, Vec<String>> {
    if alleles.len() != 2 {
        return Err(vec![format!(
            "Locus {} must have exactly 2 alleles, got {}",
            locus,
            alleles.len()
        )]);
    }

    let mut errors = Vec::new();
    let parsed: Vec<Allele> = alleles
        .iter()
        .filter_map(|symbol| {
            let allele = Allele::parse(locus, symbol);
            if allele.is_none() {
                errors.push(format!("Locus {}: unknown allele '{}'", locus, symbol));
            }
            allele
        })
        .collect();

    match parsed.as_slice() {
        [a, b] => Ok(AllelePair::new(*a, *b)),
        _ => Err(errors),
    }
}

/// Check a raw genotype and list every problem found. An empty list means
/// the genotype is valid.
pub fn validate_genotype(raw: &RawGenotype) -> Vec<String> {
    match Genotype::from_raw(raw) {
        Ok(_) => Vec::new(),
        Err(GenealogyError::InvalidGenotype(errors)) => errors,
        Err(other) => vec![other.to_string()],
    }
}

/// Homozygous-dominant starting genotype used for new dogs:
/// `E/E B/B ky/ky Ay/Ay D/D`.
pub fn default_genotype() -> Genotype {
    let mut genotype = Genotype::empty();
    for (locus, symbol) in [
        (LocusKind::Extension, "E"),
        (LocusKind::Brown, "B"),
        (LocusKind::DominantBlack, "ky"),
        (LocusKind::Agouti, "Ay"),
        (LocusKind::Dilution, "D"),
    ] {
        if let Some(allele) = Allele::parse(locus, symbol) {
            genotype.insert(AllelePair::new(allele, allele));
        }
    }
    genotype
}
