use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use super::Language;

/// Inclusive bounds on a word's length, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthFilter {
    pub min_len: usize,
    pub max_len: Option<usize>,
}

impl LengthFilter {
    pub fn new(min_len: usize, max_len: Option<usize>) -> Self {
        Self { min_len, max_len }
    }

    pub fn accepts(&self, word: &str) -> bool {
        let len = word.chars().count();
        len >= self.min_len && self.max_len.map_or(true, |max| len <= max)
    }
}

impl Default for LengthFilter {
    fn default() -> Self {
        Self::new(1, None)
    }
}

/// The set of words stimuli are drawn from.
///
/// Entries are kept exactly as supplied (matching is case-sensitive), empty
/// entries are dropped and duplicates collapse onto their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::<String>::into)
            .filter(|w| !w.is_empty())
            .unique()
            .collect();
        Self { words }
    }

    pub fn from_language(language: &Language, filter: LengthFilter) -> Self {
        Self::new(
            language
                .words
                .iter()
                .filter(|w| filter.accepts(w))
                .cloned(),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Uniform draw with replacement; `None` only for an empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::WordMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_new_drops_duplicates_and_empties() {
        let pool = WordPool::new(["b", "a", "", "b", "c", "a"]);
        assert_eq!(pool.words(), &["b", "a", "c"]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_case_is_preserved() {
        let pool = WordPool::new(["Apple", "apple"]);
        assert_eq!(pool.len(), 2);
        assert!(pool.contains("Apple"));
        assert!(!pool.contains("APPLE"));
    }

    #[test]
    fn test_length_filter_counts_characters_not_bytes() {
        let filter = LengthFilter::new(3, Some(3));
        assert!(filter.accepts("长颈鹿"));
        assert!(!filter.accepts("熊猫"));
        assert!(filter.accepts("abc"));
        assert!(!filter.accepts("abcd"));
    }

    #[test]
    fn test_default_filter_is_unbounded_above() {
        let filter = LengthFilter::default();
        assert!(filter.accepts("Xylophone"));
        assert!(!filter.accepts(""));
    }

    #[test]
    fn test_from_language_applies_filter() {
        let lang = Language::load(WordMode::Chinese).unwrap();
        let pool = WordPool::from_language(&lang, LengthFilter::new(3, None));
        assert!(!pool.is_empty());
        assert!(pool.words().iter().all(|w| w.chars().count() >= 3));
        assert!(pool.contains("洗衣机"));
    }

    #[test]
    fn test_from_language_can_filter_everything_out() {
        let lang = Language::load(WordMode::English).unwrap();
        let pool = WordPool::from_language(&lang, LengthFilter::new(20, None));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_choose_on_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(WordPool::default().choose(&mut rng), None);
    }

    #[test]
    fn test_choose_reaches_every_word() {
        let pool = WordPool::new(["a", "b", "c", "d"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for _ in 0..400 {
            *seen.entry(pool.choose(&mut rng).unwrap()).or_default() += 1;
        }
        assert_eq!(seen.len(), 4);
        assert!(seen.values().all(|&n| n > 50));
    }
}
