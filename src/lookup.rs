//! Identity lookup tables loaded from CSV.
//!
//! Two tables are read once at startup and never change afterwards:
//! card id to word (`id,word`) and person id to display name (`id,lastname`).

use crate::{
    constants::UNKNOWN_PERSON_NAME,
    error::{Error, Result},
    frame::MarkerId,
};
use log::info;
use serde::Deserialize;
use std::{collections::HashMap, io::Read, path::Path};

#[derive(Debug, Deserialize)]
struct WordRow {
    id: MarkerId,
    word: String,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: MarkerId,
    lastname: String,
}

/// Immutable id to word / id to name mappings
#[derive(Debug, Clone)]
pub struct Lookups {
    words: HashMap<MarkerId, String>,
    names: HashMap<MarkerId, String>,
    unknown_name: String,
}

impl Default for Lookups {
    fn default() -> Self {
        Self::new(HashMap::new(), HashMap::new())
    }
}

impl Lookups {
    /// Build lookups from in-memory maps
    #[must_use]
    pub fn new(words: HashMap<MarkerId, String>, names: HashMap<MarkerId, String>) -> Self {
        Self {
            words,
            names,
            unknown_name: UNKNOWN_PERSON_NAME.to_string(),
        }
    }

    /// Replace the placeholder used for unknown person ids
    #[must_use]
    pub fn with_unknown_name(mut self, name: impl Into<String>) -> Self {
        self.unknown_name = name.into();
        self
    }

    /// Load both tables from CSV files
    ///
    /// Unknown persons map to the default placeholder; use
    /// [`Lookups::with_unknown_name`] to change it.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be opened or a row does not parse.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(words_csv: P, users_csv: Q) -> Result<Self> {
        let words = read_table(words_csv.as_ref(), |row: WordRow| (row.id, row.word))?;
        let names = read_table(users_csv.as_ref(), |row: UserRow| (row.id, row.lastname))?;
        let lookups = Self::new(words, names);
        info!(
            "Loaded {} card words and {} person names",
            lookups.card_count(),
            lookups.person_count()
        );
        Ok(lookups)
    }

    /// Parse the `id,word` table from any reader
    ///
    /// # Errors
    ///
    /// Returns an error if a row does not parse.
    pub fn parse_words<R: Read>(reader: R) -> Result<HashMap<MarkerId, String>> {
        parse_table(reader, |row: WordRow| (row.id, row.word))
    }

    /// Parse the `id,lastname` table from any reader
    ///
    /// # Errors
    ///
    /// Returns an error if a row does not parse.
    pub fn parse_names<R: Read>(reader: R) -> Result<HashMap<MarkerId, String>> {
        parse_table(reader, |row: UserRow| (row.id, row.lastname))
    }

    #[must_use]
    pub fn is_person(&self, id: MarkerId) -> bool {
        self.names.contains_key(&id)
    }

    #[must_use]
    pub fn is_card(&self, id: MarkerId) -> bool {
        self.words.contains_key(&id)
    }

    /// Word printed on a card
    #[must_use]
    pub fn word(&self, id: MarkerId) -> Option<&str> {
        self.words.get(&id).map(String::as_str)
    }

    /// Display name of a person, or the placeholder if unknown
    #[must_use]
    pub fn person_name(&self, id: MarkerId) -> &str {
        self.names.get(&id).map_or(self.unknown_name.as_str(), String::as_str)
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn person_count(&self) -> usize {
        self.names.len()
    }
}

fn read_table<T, F>(path: &Path, to_entry: F) -> Result<HashMap<MarkerId, String>>
where
    T: for<'de> Deserialize<'de>,
    F: Fn(T) -> (MarkerId, String),
{
    let file = std::fs::File::open(path)
        .map_err(|e| Error::LookupError(format!("Cannot open {}: {e}", path.display())))?;
    parse_table(file, to_entry).map_err(|e| Error::LookupError(format!("{}: {e}", path.display())))
}

fn parse_table<R, T, F>(mut reader: R, to_entry: F) -> Result<HashMap<MarkerId, String>>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
    F: Fn(T) -> (MarkerId, String),
{
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut table = HashMap::new();
    for row in csv_reader.deserialize::<T>() {
        let (id, value) = to_entry(row?);
        table.insert(id, value);
    }
    Ok(table)
}
