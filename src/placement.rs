//! Legality checking for a candidate `(word, anchor)` pair.
//!
//! Anchors are a cheap over-approximation of where a word might start; this
//! module is the authority on whether a placement is actually legal. The
//! checks, against the *current* (pre-placement) grid:
//!
//! 1. no letter collision — every cell the word would occupy is empty or
//!    already holds exactly the letter the word would write there;
//! 2. connectivity — on a non-empty grid the word must share at least one
//!    cell with a placed word (no disconnected islands);
//! 3. valid crossing words — the perpendicular run formed through each newly
//!    written cell, once it reaches `min_word_length`, must be a dictionary
//!    word;
//! 4. no illegal extension — the cells immediately before and after the word
//!    along its own axis must be empty, so placing it never silently turns an
//!    existing word into a longer run.

use crate::dictionary::Dictionary;
use crate::grid::{Anchor, Grid, Pos};

/// Why a candidate placement was turned down.
///
/// Rejections are the expected outcome for most candidates the search
/// proposes; they prune branches, they are not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cell {pos} holds '{existing}' but the word needs '{attempted}'")]
    LetterCollision { pos: Pos, existing: char, attempted: char },

    #[error("word would not share a cell with any placed word")]
    Disconnected,

    #[error("crossing run '{word}' through {pos} is not a dictionary word")]
    InvalidCrossing { word: String, pos: Pos },

    #[error("word would extend the existing run adjacent to {pos}")]
    ExtendsExistingRun { pos: Pos },
}

/// Check whether placing `word` at `anchor` is legal on `grid`.
///
/// Accepts (`Ok`) or rejects with the first reason found (collisions, then
/// run extension, then connectivity, then crossings). The caller is expected to have drawn
/// `word` from the dictionary already; this function only validates the runs
/// the placement *creates*.
///
/// # Errors
///
/// Returns the [`Rejection`] explaining why the placement is illegal.
pub fn validate_placement(
    grid: &Grid,
    dictionary: &Dictionary,
    word: &str,
    anchor: Anchor,
    min_word_length: usize,
) -> Result<(), Rejection> {
    debug_assert!(!word.is_empty(), "empty words never reach the validator");

    let orientation = anchor.orientation;
    let len = word.chars().count() as i32;

    // Rule 1: collisions, while counting overlap cells for rule 2.
    let mut overlaps = 0usize;
    for (i, ch) in word.chars().enumerate() {
        let cell = anchor.pos.step(orientation, i as i32);
        match grid.letter_at(cell) {
            Some(existing) if existing != ch => {
                return Err(Rejection::LetterCollision { pos: cell, existing, attempted: ch });
            }
            Some(_) => overlaps += 1,
            None => {}
        }
    }

    // Rule 4: no letter may abut the word along its own axis. A run already
    // on the grid must not be lengthened by accident. Checked before
    // connectivity so that abutting-but-not-overlapping placements report
    // the more specific reason.
    let before = anchor.pos.step(orientation, -1);
    if grid.letter_at(before).is_some() {
        return Err(Rejection::ExtendsExistingRun { pos: before });
    }
    let after = anchor.pos.step(orientation, len);
    if grid.letter_at(after).is_some() {
        return Err(Rejection::ExtendsExistingRun { pos: after });
    }

    // Rule 2: every word after the first must intersect the grid.
    if !grid.is_empty() && overlaps == 0 {
        return Err(Rejection::Disconnected);
    }

    // Rule 3: perpendicular runs through newly written cells. Cells the word
    // merely overlaps were already checked when their own words went in.
    let crossing = orientation.perpendicular();
    for (i, ch) in word.chars().enumerate() {
        let cell = anchor.pos.step(orientation, i as i32);
        if grid.letter_at(cell).is_some() {
            continue;
        }

        let run = crossing_run(grid, cell, ch, crossing);
        if run.text.chars().count() >= min_word_length && !dictionary.is_valid_word(&run.text) {
            return Err(Rejection::InvalidCrossing { word: run.text, pos: cell });
        }
    }

    Ok(())
}

struct CrossingRun {
    text: String,
}

/// The perpendicular run that would exist through `cell` after writing
/// `new_letter` there. Neighbors along the run are existing grid cells; the
/// rest of the word being placed lies on the other axis and cannot appear.
fn crossing_run(grid: &Grid, cell: Pos, new_letter: char, crossing: crate::grid::Orientation) -> CrossingRun {
    let mut start = cell;
    while grid.letter_at(start.step(crossing, -1)).is_some() {
        start = start.step(crossing, -1);
    }

    let mut text = String::new();
    let mut walker = start;
    loop {
        if walker == cell {
            text.push(new_letter);
        } else {
            match grid.letter_at(walker) {
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        walker = walker.step(crossing, 1);
    }

    CrossingRun { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Orientation;

    fn dict() -> Dictionary {
        Dictionary::from_words(["cat", "car", "rat", "tar", "art", "at", "ate", "tea"])
    }

    fn anchor(row: i32, col: i32, orientation: Orientation) -> Anchor {
        Anchor::new(Pos::new(row, col), orientation)
    }

    #[test]
    fn test_first_word_on_empty_grid_is_accepted() {
        let grid = Grid::new();
        let result = validate_placement(&grid, &dict(), "cat", anchor(0, 0, Orientation::Across), 3);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_collision_is_rejected() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // "rat" down over the 'c' collides at the origin
        let result = validate_placement(&grid, &dict(), "rat", anchor(0, 0, Orientation::Down), 3);
        assert_eq!(
            result,
            Err(Rejection::LetterCollision { pos: Pos::new(0, 0), existing: 'c', attempted: 'r' })
        );
    }

    #[test]
    fn test_disconnected_word_is_rejected() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        let result = validate_placement(&grid, &dict(), "rat", anchor(5, 5, Orientation::Across), 3);
        assert_eq!(result, Err(Rejection::Disconnected));
    }

    #[test]
    fn test_crossing_on_shared_letter_is_accepted() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // "car" down shares the 'c'; its new cells have no perpendicular
        // neighbors, so no crossing run forms
        let result = validate_placement(&grid, &dict(), "car", anchor(0, 0, Orientation::Down), 3);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_invalid_crossing_word_is_rejected() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();
        grid.place("car", Pos::new(0, 0), Orientation::Down).unwrap();

        // "ate" across at (1, 0) shares the 'a' of "car" and writes 't'
        // under the 'a' of "cat" (vertical run "at") and 'e' under the 't'
        // (vertical run "te"). Both runs are length 2: with min 3 they are
        // ignored and the placement is accepted.
        let ok = validate_placement(&grid, &dict(), "ate", anchor(1, 0, Orientation::Across), 3);
        assert_eq!(ok, Ok(()));

        // With min 2 the runs are checked: "at" is a word, "te" is not.
        let result = validate_placement(&grid, &dict(), "ate", anchor(1, 0, Orientation::Across), 2);
        assert_eq!(
            result,
            Err(Rejection::InvalidCrossing { word: "te".to_string(), pos: Pos::new(1, 2) })
        );
    }

    #[test]
    fn test_valid_crossing_word_is_accepted() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // "tar" down starting on the 't' of "cat": overlap at index 0
        let result = validate_placement(&grid, &dict(), "tar", anchor(0, 2, Orientation::Down), 3);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_extension_before_anchor_is_rejected() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // starting "tea" right after "cat" on the same row would fuse them
        // into "cattea"; the cell before the anchor is occupied
        let result = validate_placement(&grid, &dict(), "tea", anchor(0, 3, Orientation::Across), 3);
        assert_eq!(result, Err(Rejection::ExtendsExistingRun { pos: Pos::new(0, 2) }));
    }

    #[test]
    fn test_extension_after_word_end_is_rejected() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // "tea" ending directly left of "cat"'s first letter
        let result = validate_placement(&grid, &dict(), "tea", anchor(0, -3, Orientation::Across), 3);
        assert_eq!(result, Err(Rejection::ExtendsExistingRun { pos: Pos::new(0, 0) }));
    }

    #[test]
    fn test_word_crossing_through_middle_letter() {
        let mut grid = Grid::new();
        grid.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

        // "rat" down anchored one row above the 'a' of "cat": its 'a' (index
        // 1) overlaps, its 'r' and 't' are new with no perpendicular
        // neighbors
        let result = validate_placement(&grid, &dict(), "rat", anchor(-1, 1, Orientation::Down), 3);
        assert_eq!(result, Ok(()));
    }
}
