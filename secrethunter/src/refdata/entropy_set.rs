use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::constants::SYMBOLS;

/// Character-class counts of a word.
///
/// Symbols are restricted to the OWASP special-character set; anything else
/// outside the four classes is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct CharStats {
    #[serde(rename = "Lowers")]
    pub lowers: u32,
    #[serde(rename = "Uppers")]
    pub uppers: u32,
    #[serde(rename = "Digits")]
    pub digits: u32,
    #[serde(rename = "Symbols")]
    pub symbols: u32,
}

impl CharStats {
    #[must_use]
    pub fn of(word: &str) -> Self {
        let mut stats = Self::default();
        for ch in word.chars() {
            if ch.is_lowercase() {
                stats.lowers += 1;
            } else if ch.is_uppercase() {
                stats.uppers += 1;
            } else if ch.is_ascii_digit() {
                stats.digits += 1;
            } else if SYMBOLS.contains(ch) {
                stats.symbols += 1;
            }
        }
        stats
    }

    /// Number of classified characters.
    #[must_use]
    pub fn len(&self) -> usize {
        (self.lowers + self.uppers + self.digits + self.symbols) as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn letters(&self) -> u32 {
        self.lowers + self.uppers
    }
}

impl std::ops::Add for CharStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            lowers: self.lowers + other.lowers,
            uppers: self.uppers + other.uppers,
            digits: self.digits + other.digits,
            symbols: self.symbols + other.symbols,
        }
    }
}

/// Entropy distribution of one character-class composition in a corpus.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EntropyStats {
    #[serde(rename = "Avg")]
    pub avg: f64,
    #[serde(rename = "Dev")]
    pub dev: f64,
    #[serde(rename = "Min")]
    pub min: f64,
    #[serde(rename = "Max")]
    pub max: f64,
}

/// Reference entropy distributions keyed by `CharStats`, with the effective
/// word-length window derived from the keys and clamped to [8, 32].
#[derive(Debug)]
pub struct EntropySet {
    set: FxHashMap<CharStats, EntropyStats>,
    min_len: usize,
    max_len: usize,
}

impl EntropySet {
    #[must_use]
    pub fn new(set: FxHashMap<CharStats, EntropyStats>) -> Self {
        let mut min_len = 32;
        let mut max_len = 8;
        for key in set.keys() {
            let key_len = key.len();
            if key_len > max_len && key_len <= 32 {
                max_len = key_len;
            }
            if key_len < min_len && key_len >= 8 {
                min_len = key_len;
            }
        }
        Self { set, min_len, max_len }
    }

    /// Looks up the distribution for a composition, provided the word length
    /// falls inside the window covered by this corpus.
    #[must_use]
    pub fn lookup(&self, stats: CharStats, word_len: usize) -> Option<EntropyStats> {
        if word_len < self.min_len || word_len > self.max_len {
            return None;
        }
        self.set.get(&stats).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        (self.min_len, self.max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(lowers: u32, uppers: u32, digits: u32, symbols: u32) -> CharStats {
        CharStats { lowers, uppers, digits, symbols }
    }

    #[test]
    fn test_char_stats_counts_classes() {
        assert_eq!(CharStats::of("Xk7#mQ9!pZ@4vB2"), stats(4, 4, 4, 3));
        assert_eq!(CharStats::of("password"), stats(8, 0, 0, 0));
        assert_eq!(CharStats::of("P@ssw0rd"), stats(5, 1, 1, 1));
        assert_eq!(CharStats::of(""), stats(0, 0, 0, 0));
    }

    #[test]
    fn test_char_stats_ignores_unclassified() {
        // a tab is neither a letter, digit nor an OWASP symbol
        assert_eq!(CharStats::of("a\tb"), stats(2, 0, 0, 0));
    }

    #[test]
    fn test_char_stats_additivity() {
        let cases = [("abc", "XY9!"), ("Passw0rd", "hunter2"), ("", "x")];
        for (a, b) in cases {
            let joined = format!("{a}{b}");
            assert_eq!(
                CharStats::of(a) + CharStats::of(b),
                CharStats::of(&joined),
                "stats must be additive for {a:?} ++ {b:?}"
            );
        }
    }

    #[test]
    fn test_length_window_from_keys() {
        let mut map = FxHashMap::default();
        let record = EntropyStats { avg: 1.0, dev: 0.1, min: 0.5, max: 1.5 };
        map.insert(stats(10, 0, 0, 0), record);
        map.insert(stats(14, 2, 0, 0), record);
        let set = EntropySet::new(map);
        assert_eq!(set.bounds(), (10, 16));
        assert!(set.lookup(stats(10, 0, 0, 0), 10).is_some());
        assert!(set.lookup(stats(10, 0, 0, 0), 9).is_none());
        assert!(set.lookup(stats(10, 0, 0, 0), 17).is_none());
        assert!(set.lookup(stats(1, 0, 0, 0), 12).is_none());
    }

    #[test]
    fn test_empty_set_rejects_every_length() {
        let set = EntropySet::new(FxHashMap::default());
        for len in [8, 16, 32] {
            assert!(set.lookup(stats(4, 4, 4, 4), len).is_none());
        }
    }

    #[test]
    fn test_window_is_clamped() {
        let mut map = FxHashMap::default();
        let record = EntropyStats { avg: 0.0, dev: 0.0, min: 0.0, max: 0.0 };
        map.insert(stats(3, 0, 0, 0), record);
        map.insert(stats(40, 0, 0, 0), record);
        let set = EntropySet::new(map);
        // keys outside [8, 32] never widen the window
        assert_eq!(set.bounds(), (32, 8));
    }
}
