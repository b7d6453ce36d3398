//! `dictionary` — Module to load and query the word list for the solver.
//!
//! This module is responsible for reading a dictionary (either from a file or
//! from an in-memory string) and answering the two questions the engine asks:
//!
//! - membership: `is_valid_word("gate")` — used by the placement validator
//!   for crossing words and by layout validation;
//! - candidate enumeration: `words_formable_from(letters, min_length)` — the
//!   word source for the search, returning every word that is a sub-multiset
//!   anagram of the available letters.
//!
//! The parsing logic:
//! - One word per line; surrounding whitespace is trimmed.
//! - Blank lines and lines containing anything other than ASCII letters are
//!   skipped silently.
//! - All words are normalized to lowercase; duplicates collapse in the set.
//!
//! A `Dictionary` is constructed once, then shared by reference and never
//! mutated — the whole search treats it as a read-only resource.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::letters::LetterCounts;

/// The dictionary could not be obtained. Solving cannot proceed without a
/// word source, so this is fatal to the request — surfaced to the caller,
/// never retried internally.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary from '{path}': {source}")]
    Unavailable {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// A read-only set of valid words, normalized to lowercase.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Parse a dictionary from an in-memory string, one word per line.
    ///
    /// Lines that are empty or contain non-letter characters are skipped
    /// silently; everything else is lowercased and inserted.
    #[must_use]
    pub fn parse_from_str(contents: &str) -> Dictionary {
        let words = contents
            .lines()
            .filter_map(|raw_line| {
                let line = raw_line.trim();
                if line.is_empty() || !line.chars().all(|c| c.is_ascii_alphabetic()) {
                    None
                } else {
                    Some(line.to_ascii_lowercase())
                }
            })
            .collect();

        Dictionary { words }
    }

    /// Read a dictionary file from `path` and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::Unavailable`] if the file cannot be read.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Dictionary, DictionaryError> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|e| DictionaryError::Unavailable {
            path: path_ref.display().to_string(),
            source: e,
        })?;
        Ok(Self::parse_from_str(&data))
    }

    /// The compiled-in default word list, used when no dictionary path is
    /// given on the command line.
    #[must_use]
    pub fn builtin() -> Dictionary {
        Self::parse_from_str(include_str!("../data/dictionary.txt"))
    }

    /// Build a dictionary from an explicit word collection (handy in tests).
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Dictionary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Dictionary {
            words: words.into_iter().map(|w| w.as_ref().to_ascii_lowercase()).collect(),
        }
    }

    /// Membership check. Case-sensitive on purpose: everything in the set is
    /// lowercase, and callers normalize before asking.
    #[must_use]
    pub fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Enumerate every dictionary word formable as a sub-multiset anagram of
    /// `letters` with length at least `min_length`.
    ///
    /// Ordering: longest first, ties broken lexicographically. Longer words
    /// consume letters faster, so the search reaches its base case in fewer
    /// branching steps and fails unproductive branches sooner.
    #[must_use]
    pub fn words_formable_from(&self, letters: &LetterCounts, min_length: usize) -> Vec<&str> {
        let mut candidates: Vec<&str> = self
            .words
            .iter()
            .filter(|word| {
                word.chars().count() >= min_length
                    && letters.can_consume(&LetterCounts::from_word(word))
            })
            .map(String::as_str)
            .collect();

        // HashSet iteration order is arbitrary; the sort makes enumeration
        // (and therefore solve output) deterministic.
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        candidates
    }
}
