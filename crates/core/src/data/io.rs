use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{GenealogyError, Result};
use crate::types::{DogRecord, Sex};

use super::store::MemoryDogStore;

/// Column positions resolved from a CSV header row.
struct Columns {
    id: usize,
    name: usize,
    sire: usize,
    dam: usize,
    sex: Option<usize>,
    registered_name: Option<usize>,
    birth_date: Option<usize>,
    color: Option<usize>,
    titles: Option<usize>,
    photo_url: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                GenealogyError::Data(format!("CSV missing '{}' column", name))
            })
        };

        Ok(Self {
            id: require("id")?,
            name: require("name")?,
            sire: require("sire")?,
            dam: require("dam")?,
            sex: find("sex"),
            registered_name: find("registered_name"),
            birth_date: find("birth_date"),
            color: find("color"),
            titles: find("titles"),
            photo_url: find("photo_url"),
        })
    }
}

impl MemoryDogStore {
    /// Read a dog store from a CSV file.
    ///
    /// Required columns (header, case-insensitive): `id`, `name`, `sire`,
    /// `dam`. Optional columns: `sex`, `registered_name`, `birth_date`
    /// (`YYYY-MM-DD`), `color`, `titles`, `photo_url`. Unknown parents are
    /// coded as `"0"`, `""` or `"NA"`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a required column is
    /// missing, a birth date is malformed or an id is duplicated.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let store = Self::read_records(reader)?;
        log::info!("Loaded {} dogs from '{}'", store.len(), path.display());
        Ok(store)
    }

    /// Same as [`MemoryDogStore::from_csv`] but over any reader.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::read_records(reader)
    }

    fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();
        let cols = Columns::from_headers(&headers)?;

        let mut store = MemoryDogStore::new();

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("");
            let optional = |idx: Option<usize>| idx.and_then(|i| non_empty(field(i)));

            let id = field(cols.id).to_string();
            let birth_date = match optional(cols.birth_date) {
                Some(raw) => Some(parse_date(&raw).ok_or_else(|| {
                    GenealogyError::Data(format!(
                        "Row {}: invalid birth_date '{}' for dog '{}' (expected YYYY-MM-DD)",
                        row + 1,
                        raw,
                        id
                    ))
                })?),
                None => None,
            };

            store.insert(DogRecord {
                name: field(cols.name).to_string(),
                sex: optional(cols.sex)
                    .map(|s| Sex::parse(&s))
                    .unwrap_or_default(),
                sire_id: parse_parent(field(cols.sire)),
                dam_id: parse_parent(field(cols.dam)),
                registered_name: optional(cols.registered_name),
                birth_date,
                color: optional(cols.color),
                titles: optional(cols.titles),
                photo_url: optional(cols.photo_url),
                id,
            })?;
        }

        Ok(store)
    }
}

/// Parse a parent string, returning `None` for unknown parents.
///
/// Unknown parents are coded as `"0"`, `""`, `"NA"`, or `"na"`.
fn parse_parent(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
