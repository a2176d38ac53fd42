//! Entropy classifier engine.
//!
//! Words are pushed through a fixed-order decision cascade; the first check
//! that fires decides the likelihood. The early stages eliminate the
//! high-volume false-positive shapes (paths, dates, dictionary words) so
//! that only proximity to the generated-password distribution can elevate a
//! word to the top label, and only those words are reported.

use rustc_hash::FxHashMap;
use std::fmt;
use std::path::Path;

use super::Finding;
use crate::constants;
use crate::refdata::{CharStats, ReferenceData};

/// Ordinal likelihood of a word being a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Likelihood {
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Likelihood::VeryUnlikely => "very unlikely",
            Likelihood::Unlikely => "unlikely",
            Likelihood::Possible => "possible",
            Likelihood::Likely => "likely",
            Likelihood::VeryLikely => "very likely",
        };
        f.write_str(label)
    }
}

/// Shortest word the classifier considers.
pub const MIN_WORD_LEN: usize = 5;

/// Longest word the classifier considers.
pub const MAX_WORD_LEN: usize = 32;

/// Shannon entropy over the characters of a word.
#[must_use]
pub fn shannon_entropy(word: &str) -> f64 {
    if word.is_empty() {
        return 0.0;
    }
    let mut counts: FxHashMap<char, u32> = FxHashMap::default();
    for ch in word.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = word.chars().count() as f64;
    counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Entropy variant dividing each character probability by the inferred
/// charset size: 26 for lowercase, 26 more for uppercase, 10 for digits and
/// 32 for punctuation.
#[must_use]
pub fn charset_entropy(word: &str) -> f64 {
    let mut counts: FxHashMap<char, u32> = FxHashMap::default();
    let mut charset = 0u32;
    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for ch in word.chars() {
        if ch.is_lowercase() {
            if !has_lower {
                has_lower = true;
                charset += 26;
            }
        } else if ch.is_uppercase() {
            if !has_upper {
                has_upper = true;
                charset += 26;
            }
        } else if ch.is_ascii_digit() {
            if !has_digit {
                has_digit = true;
                charset += 10;
            }
        } else if ch.is_ascii_punctuation() && !has_symbol {
            has_symbol = true;
            charset += 32;
        }
        *counts.entry(ch).or_insert(0) += 1;
    }

    if charset == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / f64::from(charset);
            -p * p.log2()
        })
        .sum()
}

/// Classifies words against the reference corpora and reports the ones that
/// look like generated passwords.
pub struct EntropyEngine {
    data: &'static ReferenceData,
}

impl EntropyEngine {
    #[must_use]
    pub fn new(data: &'static ReferenceData) -> Self {
        Self { data }
    }

    /// Reports every word of the line classified as `VeryLikely`.
    #[must_use]
    pub fn scan_line(&self, line: &str) -> Vec<Finding> {
        constants::word_splitter()
            .split(line)
            .filter(|word| (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len()))
            .filter(|word| self.classify(word) == Likelihood::VeryLikely)
            .map(|word| Finding {
                kind: "entropy".to_owned(),
                value: word.to_owned(),
                likelihood: Some(Likelihood::VeryLikely),
            })
            .collect()
    }

    /// Runs the decision cascade; the first check that fires wins.
    #[must_use]
    pub fn classify(&self, word: &str) -> Likelihood {
        if !word.is_ascii() {
            return Likelihood::Unlikely;
        }
        let stats = CharStats::of(word);
        if stats.letters() == 0 {
            return Likelihood::Unlikely;
        }
        let path = Path::new(word);
        if path.is_absolute() {
            if path.exists() {
                return Likelihood::VeryUnlikely;
            }
            return Likelihood::Unlikely;
        }
        if constants::date_patterns().iter().any(|re| re.is_match(word)) {
            return Likelihood::VeryUnlikely;
        }
        if self.data.linux_words.contains_variants(word) {
            return Likelihood::Unlikely;
        }
        if self.data.english.contains_variants(word) {
            return Likelihood::VeryUnlikely;
        }
        if stats.uppers == 0 && stats.digits == 0 && stats.symbols == 0 {
            return Likelihood::Unlikely;
        }
        if stats.digits == 0 && stats.symbols == 0 {
            return Likelihood::Possible;
        }

        let entropy = charset_entropy(word);
        if let Some(reference) = self.data.words.lookup(stats, word.len()) {
            if (entropy - reference.avg).abs() > reference.dev {
                return Likelihood::Unlikely;
            }
        }
        if let Some(reference) = self.data.breaches.lookup(stats, word.len()) {
            if (entropy - reference.avg).abs() < reference.dev {
                return Likelihood::Likely;
            }
        }
        if let Some(reference) = self.data.generated.lookup(stats, word.len()) {
            if (entropy - reference.avg).abs() < reference.dev {
                return Likelihood::VeryLikely;
            }
        }
        Likelihood::VeryUnlikely
    }
}
