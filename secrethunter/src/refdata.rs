//! Reference data embedded in the binary: entropy distributions built from
//! three corpora (English words, breached passwords, generated passwords)
//! and the dictionaries consulted by the entropy classifier.
//!
//! Everything is decompressed once on first use and lives for the process;
//! after that the data is read-only and safe to share across workers.

use rustc_hash::FxHashSet;
use std::sync::OnceLock;

use crate::error::Error;

mod loader;

pub mod entropy_set;

pub use entropy_set::{CharStats, EntropySet, EntropyStats};

static ENTROPY_BLOB: &[u8] = include_bytes!("../data/entropy.txt");
static WORDS_GZ: &[u8] = include_bytes!("../data/words.txt.gz");
static PASSWORDS_GZ: &[u8] = include_bytes!("../data/passwords.txt.gz");
static LINUXWORDS_GZ: &[u8] = include_bytes!("../data/linuxwords.txt.gz");

/// An interned word list with case-insensitive membership helpers.
#[derive(Debug)]
pub struct WordSet(FxHashSet<String>);

impl WordSet {
    /// Checks the word as written, lowercased and title-cased.
    #[must_use]
    pub fn contains_variants(&self, word: &str) -> bool {
        if self.0.contains(word) {
            return true;
        }
        let lower = word.to_lowercase();
        if self.0.contains(&lower) {
            return true;
        }
        self.0.contains(&title_case(word))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The full reference data set consulted by the entropy classifier.
#[derive(Debug)]
pub struct ReferenceData {
    pub words: EntropySet,
    pub breaches: EntropySet,
    pub generated: EntropySet,
    pub english: WordSet,
    pub passwords: WordSet,
    pub linux_words: WordSet,
}

impl ReferenceData {
    fn from_embedded() -> Result<Self, Error> {
        let records = loader::split_length_prefixed(ENTROPY_BLOB)?;
        if records.len() != 3 {
            return Err(Error::ResourceInit(format!(
                "expected 3 entropy tables, found {}",
                records.len()
            )));
        }
        let mut tables = Vec::with_capacity(records.len());
        for record in &records {
            let json = loader::gunzip(record)?;
            tables.push(EntropySet::new(loader::parse_entropy_table(&json)?));
        }
        // the record order is words, breaches, generated
        let mut tables = tables.into_iter();
        let (Some(words), Some(breaches), Some(generated)) =
            (tables.next(), tables.next(), tables.next())
        else {
            return Err(Error::ResourceInit("entropy tables are incomplete".to_owned()));
        };

        Ok(Self {
            words,
            breaches,
            generated,
            english: WordSet(loader::load_word_set(WORDS_GZ)?),
            passwords: WordSet(loader::load_word_set(PASSWORDS_GZ)?),
            linux_words: WordSet(loader::load_word_set(LINUXWORDS_GZ)?),
        })
    }
}

/// Returns the process-lifetime reference data, loading it on first use.
///
/// # Errors
///
/// Returns `Error::ResourceInit` when the embedded blobs cannot be
/// decompressed or parsed; callers treat this as fatal.
pub fn load() -> Result<&'static ReferenceData, Error> {
    static STORE: OnceLock<ReferenceData> = OnceLock::new();
    if let Some(data) = STORE.get() {
        return Ok(data);
    }
    let data = ReferenceData::from_embedded()?;
    Ok(STORE.get_or_init(|| data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_data_loads() {
        let data = load().expect("embedded reference data must load");
        assert!(!data.english.is_empty());
        assert!(!data.passwords.is_empty());
        assert!(!data.linux_words.is_empty());
        assert!(!data.words.is_empty());
        assert!(!data.breaches.is_empty());
        assert!(!data.generated.is_empty());
    }

    #[test]
    fn test_dictionary_membership() {
        let data = load().unwrap();
        assert!(data.english.contains_variants("password"));
        assert!(data.english.contains_variants("Password"));
        assert!(data.english.contains_variants("PASSWORD"));
        assert!(!data.english.contains_variants("zzqqxx"));
        assert!(data.linux_words.contains_variants("systemd"));
    }

    #[test]
    fn test_generated_table_covers_full_window() {
        let data = load().unwrap();
        assert_eq!(data.generated.bounds(), (8, 32));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("password"), "Password");
        assert_eq!(title_case("PASSWORD"), "Password");
        assert_eq!(title_case(""), "");
    }
}
