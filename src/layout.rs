//! Independent validation of a caller-supplied grid layout.
//!
//! Unlike the solver, this does not search for anything: the caller hands in
//! the 12 target letters and a grid of optional cells (their own arrangement,
//! e.g. typed in or photographed off the table), and gets back an itemized
//! report. An invalid arrangement is an expected caller scenario, so
//! violations are structured data — never errors.
//!
//! Three violation categories:
//! - letter conservation: the layout must use exactly the target multiset;
//! - per-line words: every maximal horizontal/vertical letter run of at least
//!   `min_word_length` must be a dictionary word;
//! - structure: non-letter cell content, irregular row lengths, or letters
//!   promised but absent from an empty layout.

use std::fmt;

use crate::dictionary::Dictionary;
use crate::grid::Orientation;
use crate::letters::LetterCounts;

/// One reason a layout is not a valid arrangement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The target letters themselves contain a non-letter character.
    NonAlphabeticTarget { invalid_char: char },

    /// Letters in the target multiset that the layout never uses.
    LettersMissingFromLayout { letters: Vec<char> },

    /// Letters in the layout that the target does not provide.
    ExtraLettersInLayout { letters: Vec<char> },

    /// A maximal letter run that is not a dictionary word. `line` and
    /// `start` are 1-based; for an across run, `line` is the row and `start`
    /// the column, and vice versa for a down run.
    InvalidWord {
        word: String,
        orientation: Orientation,
        line: usize,
        start: usize,
    },

    /// A cell holds something other than a letter (1-based coordinates).
    InvalidCell { content: char, row: usize, col: usize },

    /// A row has a different length than the first row. Critical: the rest
    /// of the layout cannot be interpreted, so this is reported alone.
    MalformedRow { row: usize, len: usize, expected: usize },

    /// The layout is empty but target letters were provided.
    EmptyLayoutWithTargetLetters { letters: Vec<char> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NonAlphabeticTarget { invalid_char } => {
                write!(f, "Target letters must be alphabetic, found '{invalid_char}'")
            }
            Violation::LettersMissingFromLayout { letters } => {
                write!(f, "Letters missing from layout that were in target: {letters:?}")
            }
            Violation::ExtraLettersInLayout { letters } => {
                write!(f, "Letters found in layout that were not in target: {letters:?}")
            }
            Violation::InvalidWord { word, orientation, line, start } => match orientation {
                Orientation::Across => write!(
                    f,
                    "Invalid word: '{word}' found horizontally in row {line} starting at column {start}"
                ),
                Orientation::Down => write!(
                    f,
                    "Invalid word: '{word}' found vertically in column {line} starting at row {start}"
                ),
            },
            Violation::InvalidCell { content, row, col } => {
                write!(
                    f,
                    "Invalid character '{content}' in grid at row {row}, col {col}; only single letters allowed"
                )
            }
            Violation::MalformedRow { row, len, expected } => {
                write!(f, "Malformed layout: row {row} has length {len}, expected {expected}")
            }
            Violation::EmptyLayoutWithTargetLetters { letters } => {
                write!(f, "Layout is empty, but target letters were provided: {letters:?}")
            }
        }
    }
}

/// Outcome of a layout check: valid iff no violations were collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutReport {
    pub violations: Vec<Violation>,
}

impl LayoutReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violation messages, one string each (for presentation layers
    /// that only want text).
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::to_string).collect()
    }
}

/// Check a caller-supplied layout against the target letters and dictionary.
///
/// `rows` is a rectangular grid of optional cells; `None` is an empty cell.
/// The target letters are case-folded, as is cell content.
#[must_use]
pub fn validate_layout(
    dictionary: &Dictionary,
    target_letters: &str,
    rows: &[Vec<Option<char>>],
    min_word_length: usize,
) -> LayoutReport {
    let mut report = LayoutReport::default();

    let target: LetterCounts = match target_letters.parse() {
        Ok(counts) => counts,
        Err(crate::errors::InputError::NonAlphabetic { invalid_char }) => {
            report.violations.push(Violation::NonAlphabeticTarget { invalid_char });
            return report;
        }
        Err(_) => unreachable!("letter parsing only fails on non-alphabetic input"),
    };

    if rows.is_empty() {
        if !target.is_empty() {
            report.violations.push(Violation::EmptyLayoutWithTargetLetters {
                letters: target.distinct_letters(),
            });
        }
        return report;
    }

    // Structural pass: the grid must be rectangular before anything else can
    // be interpreted.
    let expected = rows[0].len();
    for (r, row) in rows.iter().enumerate() {
        if row.len() != expected {
            report.violations.push(Violation::MalformedRow {
                row: r + 1,
                len: row.len(),
                expected,
            });
            return report;
        }
    }

    // Count layout letters, flagging non-letter cell content as we go.
    let mut seen_letters = String::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Some(ch) if ch.is_ascii_alphabetic() => {
                    seen_letters.push(ch.to_ascii_lowercase());
                }
                Some(ch) => {
                    report.violations.push(Violation::InvalidCell {
                        content: *ch,
                        row: r + 1,
                        col: c + 1,
                    });
                }
                None => {}
            }
        }
    }
    let layout = LetterCounts::from_word(&seen_letters);

    // Letter conservation: the layout must use the target multiset exactly.
    let missing = target.saturating_sub(&layout);
    if !missing.is_empty() {
        report
            .violations
            .push(Violation::LettersMissingFromLayout { letters: missing.distinct_letters() });
    }
    let extra = layout.saturating_sub(&target);
    if !extra.is_empty() {
        report
            .violations
            .push(Violation::ExtraLettersInLayout { letters: extra.distinct_letters() });
    }

    // Per-line word validation, rows then columns.
    for (r, row) in rows.iter().enumerate() {
        check_line(
            dictionary,
            row.iter().copied(),
            Orientation::Across,
            r + 1,
            min_word_length,
            &mut report.violations,
        );
    }
    for c in 0..expected {
        check_line(
            dictionary,
            rows.iter().map(|row| row[c]),
            Orientation::Down,
            c + 1,
            min_word_length,
            &mut report.violations,
        );
    }

    report
}

/// Extract maximal letter runs from one line and validate each against the
/// dictionary once it reaches `min_word_length`.
fn check_line<I>(
    dictionary: &Dictionary,
    cells: I,
    orientation: Orientation,
    line: usize,
    min_word_length: usize,
    violations: &mut Vec<Violation>,
) where
    I: Iterator<Item = Option<char>>,
{
    let mut segment = String::new();
    let mut start = 0usize;

    // chain a terminator so the final segment is flushed
    for (i, cell) in cells.chain(std::iter::once(None)).enumerate() {
        match cell {
            Some(ch) if ch.is_ascii_alphabetic() => {
                if segment.is_empty() {
                    start = i;
                }
                segment.push(ch.to_ascii_lowercase());
            }
            _ => {
                if segment.chars().count() >= min_word_length && !dictionary.is_valid_word(&segment)
                {
                    violations.push(Violation::InvalidWord {
                        word: segment.clone(),
                        orientation,
                        line,
                        start: start + 1,
                    });
                }
                segment.clear();
            }
        }
    }
}

/// Parse a layout from text: one row per line, `.`/`_`/space for empty
/// cells, anything else kept as cell content. Rows are padded with empty
/// cells to the longest line, and blank lines are skipped.
#[must_use]
pub fn parse_layout(contents: &str) -> Vec<Vec<Option<char>>> {
    let mut rows: Vec<Vec<Option<char>>> = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.chars()
                .map(|ch| match ch {
                    '.' | '_' | ' ' => None,
                    other => Some(other),
                })
                .collect()
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, None);
    }
    rows
}
