use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GenealogyError, Result};

/// Opaque identifier of a dog in the external store.
pub type DogId = String;

/// Smallest generation bound accepted by the walker, the COI calculator and
/// the pedigree builder.
pub const MIN_GENERATIONS: usize = 1;

/// Largest generation bound accepted. A full tree at this depth has 2047 nodes.
pub const MAX_GENERATIONS: usize = 10;

/// Generation bound used when the caller does not pick one.
pub const DEFAULT_GENERATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Parse the usual spellings found in kennel exports (`M`, `male`,
    /// `FEMALE`, ...). Anything else is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "dog" => Sex::Male,
            "f" | "female" | "bitch" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// A dog as returned by the external store.
///
/// Only `id`, `name`, `sire_id` and `dam_id` matter to the ancestor walker;
/// the remaining fields are copied into pedigree nodes for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogRecord {
    pub id: DogId,
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    pub sire_id: Option<DogId>,
    pub dam_id: Option<DogId>,
    pub registered_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub titles: Option<String>,
    pub photo_url: Option<String>,
}

impl DogRecord {
    /// A founder record with unknown parents and no display data.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sex: Sex::Unknown,
            sire_id: None,
            dam_id: None,
            registered_name: None,
            birth_date: None,
            color: None,
            titles: None,
            photo_url: None,
        }
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_sire(mut self, sire_id: &str) -> Self {
        self.sire_id = Some(sire_id.to_string());
        self
    }

    pub fn with_dam(mut self, dam_id: &str) -> Self {
        self.dam_id = Some(dam_id.to_string());
        self
    }

    /// Set both parents at once.
    pub fn with_parents(self, sire_id: &str, dam_id: &str) -> Self {
        self.with_sire(sire_id).with_dam(dam_id)
    }
}

/// Reject generation bounds outside `[MIN_GENERATIONS, MAX_GENERATIONS]`.
pub fn validate_generations(generations: usize) -> Result<()> {
    if !(MIN_GENERATIONS..=MAX_GENERATIONS).contains(&generations) {
        return Err(GenealogyError::InvalidArgument(format!(
            "generations must be between {} and {}, got {}",
            MIN_GENERATIONS, MAX_GENERATIONS, generations
        )));
    }
    Ok(())
}

/// Reject blank dog ids. `what` names the argument in the error message.
pub fn validate_dog_id(id: &str, what: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(GenealogyError::InvalidArgument(format!(
            "{} id is required",
            what
        )));
    }
    Ok(())
}
