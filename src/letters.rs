//! Letter multiset bookkeeping for the solver.
//!
//! A Q-Less roll is a fixed multiset of 12 letters; the search consumes and
//! releases letters as words are placed and unwound. `LetterCounts` is the
//! ledger for that: a tiny `Copy` array of per-letter counts, so every search
//! branch can hold its own snapshot without heap traffic.

use std::fmt;
use std::str::FromStr;

use crate::errors::InputError;

/// Number of dice in a standard Q-Less roll.
pub const ROLL_SIZE: usize = 12;

const ALPHABET_SIZE: usize = 26;

/// A multiset of lowercase ASCII letters, stored as per-letter counts.
///
/// This is the "ledger" the search controller threads through its recursion:
/// `can_consume` guards a placement, `consume` produces the child branch's
/// snapshot, and `release` is the inverse for callers that prefer in-place
/// undo over snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LetterCounts([u8; ALPHABET_SIZE]);

fn index_of(ch: char) -> usize {
    debug_assert!(ch.is_ascii_lowercase(), "LetterCounts only tracks a-z, got '{ch}'");
    (ch as u8 - b'a') as usize
}

impl LetterCounts {
    /// Count the letters of an already-normalized (lowercase a-z) word.
    ///
    /// Dictionary entries and placed words are normalized at load time, so
    /// this is infallible; user-facing input goes through [`FromStr`] instead.
    /// Counts clamp at `u8::MAX` (pathological inputs like a 300-cell layout
    /// row of the same letter must not wrap around).
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        let mut counts = [0u8; ALPHABET_SIZE];
        for ch in word.chars() {
            let idx = index_of(ch);
            counts[idx] = counts[idx].saturating_add(1);
        }
        LetterCounts(counts)
    }

    /// True iff every letter `needed` requires is still available here.
    #[must_use]
    pub fn can_consume(&self, needed: &LetterCounts) -> bool {
        self.0.iter().zip(needed.0.iter()).all(|(have, need)| have >= need)
    }

    /// Return a copy with `used`'s counts decremented.
    ///
    /// Callers must guard with [`can_consume`](Self::can_consume); a count
    /// going below zero indicates a defect in placement logic, not user error.
    #[must_use]
    pub fn consume(&self, used: &LetterCounts) -> Self {
        debug_assert!(self.can_consume(used), "consume without can_consume guard");
        let mut counts = self.0;
        for (have, need) in counts.iter_mut().zip(used.0.iter()) {
            *have -= need;
        }
        LetterCounts(counts)
    }

    /// Inverse of [`consume`](Self::consume), for callers that undo a branch
    /// in place rather than discarding a snapshot.
    #[must_use]
    pub fn release(&self, returned: &LetterCounts) -> Self {
        let mut counts = self.0;
        for (have, back) in counts.iter_mut().zip(returned.0.iter()) {
            *have = have.saturating_add(*back);
        }
        LetterCounts(counts)
    }

    /// Per-letter difference, clamped at zero. Used for "missing"/"extra"
    /// reporting in layout validation.
    #[must_use]
    pub fn saturating_sub(&self, other: &LetterCounts) -> Self {
        let mut counts = self.0;
        for (have, sub) in counts.iter_mut().zip(other.0.iter()) {
            *have = have.saturating_sub(*sub);
        }
        LetterCounts(counts)
    }

    /// Total number of letters in the multiset.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Count for a single letter.
    #[must_use]
    pub fn count(&self, ch: char) -> u8 {
        self.0[index_of(ch)]
    }

    /// The distinct letters present, in alphabetical order.
    ///
    /// Violation messages name letter *sets*, not counts, so this drops
    /// multiplicity.
    #[must_use]
    pub fn distinct_letters(&self) -> Vec<char> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| (b'a' + i as u8) as char)
            .collect()
    }

    /// Iterate `(letter, count)` pairs for letters with nonzero counts.
    pub fn iter(&self) -> impl Iterator<Item = (char, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| ((b'a' + i as u8) as char, c))
    }
}

impl FromStr for LetterCounts {
    type Err = InputError;

    /// Parse user-supplied letters. Uppercase is accepted and folded to
    /// lowercase; anything non-alphabetic is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut counts = [0u8; ALPHABET_SIZE];
        for ch in s.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(InputError::NonAlphabetic { invalid_char: ch });
            }
            let idx = index_of(ch.to_ascii_lowercase());
            counts[idx] = counts[idx].saturating_add(1);
        }
        Ok(LetterCounts(counts))
    }
}

impl fmt::Display for LetterCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ch, count) in self.iter() {
            for _ in 0..count {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Gate a roll string at the game boundary: exactly [`ROLL_SIZE`] letters,
/// all alphabetic. The engine itself accepts any multiset (useful for tests
/// and partial experiments); this check belongs in front of it.
///
/// # Errors
///
/// Returns [`InputError::WrongLetterCount`] or [`InputError::NonAlphabetic`].
pub fn check_roll(letters: &str) -> Result<(), InputError> {
    let count = letters.chars().count();
    if count != ROLL_SIZE {
        return Err(InputError::WrongLetterCount { expected: ROLL_SIZE, actual: count });
    }
    letters.parse::<LetterCounts>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_word_counts() {
        let counts = LetterCounts::from_word("banana");
        assert_eq!(counts.count('b'), 1);
        assert_eq!(counts.count('a'), 3);
        assert_eq!(counts.count('n'), 2);
        assert_eq!(counts.count('z'), 0);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_parse_folds_case() {
        let counts: LetterCounts = "AbCab".parse().unwrap();
        assert_eq!(counts.count('a'), 2);
        assert_eq!(counts.count('b'), 2);
        assert_eq!(counts.count('c'), 1);
    }

    #[test]
    fn test_parse_rejects_non_alphabetic() {
        let err = "ab3".parse::<LetterCounts>().unwrap_err();
        assert!(matches!(err, InputError::NonAlphabetic { invalid_char: '3' }));
    }

    #[test]
    fn test_parse_empty_is_empty() {
        let counts: LetterCounts = "".parse().unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_can_consume() {
        let pool = LetterCounts::from_word("battle");
        assert!(pool.can_consume(&LetterCounts::from_word("bat")));
        assert!(pool.can_consume(&LetterCounts::from_word("battle")));
        // needs two a's, pool has one
        assert!(!pool.can_consume(&LetterCounts::from_word("data")));
        assert!(!pool.can_consume(&LetterCounts::from_word("z")));
    }

    #[test]
    fn test_consume_then_release_round_trips() {
        let pool = LetterCounts::from_word("battle");
        let word = LetterCounts::from_word("tab");
        let remaining = pool.consume(&word);
        assert_eq!(remaining.total(), 3);
        assert_eq!(remaining.count('t'), 1);
        assert_eq!(remaining.release(&word), pool);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let counts = LetterCounts::from_word(&"a".repeat(300));
        assert_eq!(counts.count('a'), u8::MAX);

        let doubled = counts.release(&counts);
        assert_eq!(doubled.count('a'), u8::MAX);
    }

    #[test]
    fn test_saturating_sub_reports_missing() {
        let target = LetterCounts::from_word("abc");
        let layout = LetterCounts::from_word("ab");
        let missing = target.saturating_sub(&layout);
        assert_eq!(missing.distinct_letters(), vec!['c']);
        let extra = layout.saturating_sub(&target);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_distinct_letters_sorted() {
        let counts = LetterCounts::from_word("cabbage");
        assert_eq!(counts.distinct_letters(), vec!['a', 'b', 'c', 'e', 'g']);
    }

    #[test]
    fn test_display_expands_counts() {
        let counts = LetterCounts::from_word("banana");
        assert_eq!(counts.to_string(), "aaabnn");
    }

    #[test]
    fn test_check_roll_accepts_twelve_letters() {
        assert!(check_roll("abcdefghijkl").is_ok());
        assert!(check_roll("ABCDEFGHIJKL").is_ok());
    }

    #[test]
    fn test_check_roll_rejects_wrong_count() {
        let err = check_roll("abc").unwrap_err();
        assert!(matches!(err, InputError::WrongLetterCount { expected: 12, actual: 3 }));
    }

    #[test]
    fn test_check_roll_rejects_non_alphabetic() {
        let err = check_roll("abcdefghijk!").unwrap_err();
        assert!(matches!(err, InputError::NonAlphabetic { invalid_char: '!' }));
    }
}
