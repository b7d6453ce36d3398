//! The crossword grid: placed words, the derived cell map, and anchor
//! enumeration.
//!
//! The grid lives on an unbounded plane of integer (row, col) cells. It is an
//! ordered list of placed words plus a cell map derived from them. Invariant:
//! wherever two placed words share a cell, they agree on its letter — a
//! contradictory overlap is never stored ([`Grid::place`] refuses it).
//!
//! Each search branch clones the grid it extends, so a `Grid` is deliberately
//! cheap-ish to copy and never mutated through a shared handle.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A cell position on the unbounded plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    #[must_use]
    pub fn new(row: i32, col: i32) -> Self {
        Pos { row, col }
    }

    /// The cell `steps` cells along `orientation` from here. Negative steps
    /// walk backwards.
    #[must_use]
    pub fn step(self, orientation: Orientation, steps: i32) -> Pos {
        match orientation {
            Orientation::Across => Pos { row: self.row, col: self.col + steps },
            Orientation::Down => Pos { row: self.row + steps, col: self.col },
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Reading direction of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Across,
    Down,
}

impl Orientation {
    /// The crossing direction.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Across => Orientation::Down,
            Orientation::Down => Orientation::Across,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Across => write!(f, "across"),
            Orientation::Down => write!(f, "down"),
        }
    }
}

/// A candidate insertion point: where a new word may begin, and in which
/// direction. Anchors over-approximate legality; the placement validator is
/// the authority on acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub pos: Pos,
    pub orientation: Orientation,
}

impl Anchor {
    #[must_use]
    pub fn new(pos: Pos, orientation: Orientation) -> Self {
        Anchor { pos, orientation }
    }
}

/// A word committed to the grid: the word string, its starting cell, and its
/// reading direction. It occupies `word.len()` contiguous cells from `pos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub pos: Pos,
    pub orientation: Orientation,
}

impl PlacedWord {
    /// Iterate the `(cell, letter)` pairs this word occupies.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
        self.word
            .chars()
            .enumerate()
            .map(|(i, ch)| (self.pos.step(self.orientation, i as i32), ch))
    }
}

impl fmt::Display for PlacedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.word, self.orientation, self.pos)
    }
}

/// A placement would write a different letter into an occupied cell.
///
/// After the validator has accepted a placement this can no longer happen;
/// seeing it there indicates a defect in placement or validation logic, not
/// a user error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cell {pos} already holds '{existing}', placement needs '{attempted}'")]
pub struct Conflict {
    pub pos: Pos,
    pub existing: char,
    pub attempted: char,
}

/// The set of placed words and the cell map derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    words: Vec<PlacedWord>,
    // BTreeMap so cell iteration (and everything built on it: anchors,
    // rendering, fingerprints) has a fixed order.
    cells: BTreeMap<Pos, char>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Grid::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The placed words, in placement order.
    #[must_use]
    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    #[must_use]
    pub fn letter_at(&self, pos: Pos) -> Option<char> {
        self.cells.get(&pos).copied()
    }

    /// Number of occupied cells (shared cells count once).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells and their letters, in (row, col) order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
        self.cells.iter().map(|(&pos, &ch)| (pos, ch))
    }

    /// Write `word` into the grid starting at `pos` along `orientation`.
    ///
    /// Two-phase: every target cell is checked before anything is written, so
    /// a rejected placement leaves the grid untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`Conflict`] if any target cell already holds a different
    /// letter.
    pub fn place(&mut self, word: &str, pos: Pos, orientation: Orientation) -> Result<(), Conflict> {
        let placed = PlacedWord { word: word.to_string(), pos, orientation };

        for (cell, ch) in placed.cells() {
            if let Some(existing) = self.letter_at(cell) {
                if existing != ch {
                    return Err(Conflict { pos: cell, existing, attempted: ch });
                }
            }
        }

        for (cell, ch) in placed.cells() {
            self.cells.insert(cell, ch);
        }
        self.words.push(placed);
        Ok(())
    }

    /// Remove the `index`-th placed word and rebuild the cell map by
    /// replaying the remaining words in their original order.
    ///
    /// Subtracting the word's cells in place would be wrong: a cell the word
    /// shared with a crossing word must survive the removal.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds (caller bug, as with `Vec::remove`).
    pub fn remove(&mut self, index: usize) -> PlacedWord {
        let removed = self.words.remove(index);
        self.cells.clear();
        for placed in &self.words {
            for (cell, ch) in placed.cells() {
                let previous = self.cells.insert(cell, ch);
                debug_assert!(
                    previous.is_none() || previous == Some(ch),
                    "contradictory overlap at {cell} while rebuilding cell map"
                );
            }
        }
        removed
    }

    /// Candidate insertion points for the next word.
    ///
    /// Empty grid: exactly the two origin anchors, since nothing constrains
    /// placement yet. Otherwise, for every occupied cell: the horizontally
    /// adjacent cells (across), the vertically adjacent cells (down), and the
    /// cell itself in both directions — a new word may start exactly on an
    /// existing letter. Deduplicated, deterministic order.
    #[must_use]
    pub fn anchors(&self) -> Vec<Anchor> {
        let origin = Pos::new(0, 0);
        if self.is_empty() {
            return vec![
                Anchor::new(origin, Orientation::Across),
                Anchor::new(origin, Orientation::Down),
            ];
        }

        let mut seen: HashSet<Anchor> = HashSet::new();
        let mut anchors = Vec::new();
        for (&pos, _) in &self.cells {
            let candidates = [
                Anchor::new(pos.step(Orientation::Across, 1), Orientation::Across),
                Anchor::new(pos.step(Orientation::Across, -1), Orientation::Across),
                Anchor::new(pos.step(Orientation::Down, 1), Orientation::Down),
                Anchor::new(pos.step(Orientation::Down, -1), Orientation::Down),
                Anchor::new(pos, Orientation::Across),
                Anchor::new(pos, Orientation::Down),
            ];
            for anchor in candidates {
                if seen.insert(anchor) {
                    anchors.push(anchor);
                }
            }
        }
        anchors
    }

    /// The maximal contiguous run of letters through `pos` along
    /// `orientation`, or `None` if `pos` itself is empty.
    ///
    /// Returns the run's starting cell and its text.
    #[must_use]
    pub fn run_through(&self, pos: Pos, orientation: Orientation) -> Option<(Pos, String)> {
        self.letter_at(pos)?;

        let mut start = pos;
        while self.letter_at(start.step(orientation, -1)).is_some() {
            start = start.step(orientation, -1);
        }

        let mut text = String::new();
        let mut cell = start;
        while let Some(ch) = self.letter_at(cell) {
            text.push(ch);
            cell = cell.step(orientation, 1);
        }
        Some((start, text))
    }

    /// Render the occupied bounding box as rows of letters, `.` for empty
    /// cells. An empty grid renders as no rows.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let Some((&first, _)) = self.cells.iter().next() else {
            return Vec::new();
        };

        let (mut min_row, mut max_row) = (first.row, first.row);
        let (mut min_col, mut max_col) = (first.col, first.col);
        for &pos in self.cells.keys() {
            min_row = min_row.min(pos.row);
            max_row = max_row.max(pos.row);
            min_col = min_col.min(pos.col);
            max_col = max_col.max(pos.col);
        }

        (min_row..=max_row)
            .map(|row| {
                (min_col..=max_col)
                    .map(|col| self.letter_at(Pos::new(row, col)).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}
