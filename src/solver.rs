//! The backtracking search that arranges words into complete grids.
//!
//! # Error Handling
//!
//! The solver uses [`SolverError`] with two variants:
//!
//! - S001: `InvalidInput` (Letters or configuration rejected before the search runs)
//! - S002: `InternalConflict` (A placement conflicted after the validator accepted it)
//!
//! Each error has a `code()`, optional `help()`, and `display_detailed()` method.
//!
//! # Examples
//!
//! ```
//! use qless_solver::dictionary::Dictionary;
//! use qless_solver::solver::{solve, SolveConfig};
//!
//! let dict = Dictionary::from_words(["ban", "bat"]);
//! let result = solve("batban", &dict, &SolveConfig::default())?;
//!
//! for solution in &result.solutions {
//!     let words: Vec<&str> = solution.words().collect();
//!     println!("{}", words.join(" + "));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! An empty result is a normal outcome, not an error:
//!
//! ```
//! use qless_solver::dictionary::Dictionary;
//! use qless_solver::solver::{solve, SolveConfig, SolveStatus};
//!
//! let dict = Dictionary::from_words(["zzz"]);
//! let result = solve("abcabc", &dict, &SolveConfig::default())?;
//! assert!(result.solutions.is_empty());
//! assert_eq!(result.status, SolveStatus::SearchExhausted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use log::debug;

use crate::dictionary::Dictionary;
use crate::errors::InputError;
use crate::grid::{Conflict, Grid, Orientation, PlacedWord, Pos};
use crate::letters::LetterCounts;
use crate::placement::validate_placement;

// Default wall-clock budget for one solve call.
const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);
// Default cap on visited search nodes; anchors x candidates can blow up
// exponentially for permissive minimum lengths.
const DEFAULT_MAX_NODES: u64 = 2_000_000;
// Default cap on returned solutions.
const DEFAULT_MAX_SOLUTIONS: usize = 100;

/// What the solver enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveMode {
    /// Full interlocking grids that consume every input letter.
    #[default]
    Complete,
    /// Every single formable word as its own one-word solution, bypassing
    /// the multi-word recursion (but not the placement path).
    AllWords,
}

/// Knobs for one solve call. `Default` gives the game-standard settings.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Minimum length for every placed word and every checked crossing run.
    pub min_word_length: usize,
    pub mode: SolveMode,
    /// Stop after this many solutions.
    pub max_solutions: usize,
    /// Wall-clock budget, checked once per recursive step.
    pub time_budget: Duration,
    /// Node-count budget, checked once per recursive step.
    pub max_nodes: u64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            min_word_length: 3,
            mode: SolveMode::Complete,
            max_solutions: DEFAULT_MAX_SOLUTIONS,
            time_budget: DEFAULT_TIME_BUDGET,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// One arrangement of words: the grid and the letters it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub grid: Grid,
    pub used_letters: LetterCounts,
}

impl Solution {
    /// The placed words as `(word, position, orientation)` triples, in
    /// placement order.
    #[must_use]
    pub fn placements(&self) -> &[PlacedWord] {
        self.grid.words()
    }

    /// Just the words, in placement order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.grid.words().iter().map(|p| p.word.as_str())
    }
}

/// Status of the solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// The whole anchor x candidate space was explored.
    SearchExhausted,

    /// Stopped early because `max_solutions` was reached.
    FoundEnough,

    /// Stopped because the time or node budget expired. Solutions found
    /// before that are still returned.
    BudgetExhausted { elapsed: Duration, nodes: u64 },
}

/// Successful solver run (even if it stopped early).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solutions in discovery order; the engine performs no extra sorting.
    pub solutions: Vec<Solution>,
    pub status: SolveStatus,
    /// Search nodes visited, for diagnostics.
    pub nodes_visited: u64,
}

/// Unified error type for the solve pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Letters or configuration were rejected before the search ran.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// A placement conflicted *after* the validator accepted it. The grid
    /// invariant (no contradictory overlaps) and the validator disagree,
    /// which is a defect in this crate, not in the caller's input.
    #[error("internal placement conflict: {0}")]
    InternalConflict(#[from] Conflict),
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidInput(_) => "S001",
            SolverError::InternalConflict(_) => "S002",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            SolverError::InvalidInput(_) => "Input rejected before the search ran",
            SolverError::InternalConflict(_) => "Validator and grid disagreed on a placement",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::InvalidInput(ie) => ie.help(),
            SolverError::InternalConflict(_) => {
                Some("This is an internal error; please report the letters and dictionary that triggered it")
            }
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            SolverError::InvalidInput(ie) => {
                format!("{}\n  caused by: {}", self.code(), ie.display_detailed())
            }
            SolverError::InternalConflict(_) => crate::errors::format_error_with_code_and_help(
                &self.to_string(),
                self.code(),
                self.help(),
            ),
        }
    }
}

/// Simple helper to enforce a wall-clock time limit.
struct TimeBudget {
    start: Instant,
    limit: Duration,
}

impl TimeBudget {
    fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// A candidate word with its letter cost, computed once up front.
struct Candidate<'a> {
    word: &'a str,
    counts: LetterCounts,
}

/// Everything shared across the recursion: read-only collaborators, budgets,
/// and the duplicate-solution fingerprint set.
struct SearchCtx<'a> {
    dictionary: &'a Dictionary,
    candidates: &'a [Candidate<'a>],
    original: LetterCounts,
    min_word_length: usize,
    max_solutions: usize,
    budget: TimeBudget,
    max_nodes: u64,
    nodes: u64,
    out_of_budget: bool,
    seen: HashSet<u64>,
}

impl SearchCtx<'_> {
    /// Budget gate, checked once per recursive step.
    fn charge_node(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes > self.max_nodes || self.budget.expired() {
            self.out_of_budget = true;
        }
        !self.out_of_budget
    }
}

/// Build a stable fingerprint for a solution grid.
///
/// Two branches that place the same words at the same cells in a different
/// order describe the same arrangement, and so does the transpose (rows and
/// columns swapped, across and down flipped) — the same grid read the other
/// way. Sorting the placements makes the fingerprint order-independent;
/// taking the smaller of the direct and transposed hashes makes it canonical
/// under transposition.
fn solution_key(grid: &Grid) -> u64 {
    u64::min(placements_hash(grid, false), placements_hash(grid, true))
}

fn placements_hash(grid: &Grid, transpose: bool) -> u64 {
    let mut placements: Vec<(&str, i32, i32, bool)> = grid
        .words()
        .iter()
        .map(|p| {
            let down = p.orientation == Orientation::Down;
            if transpose {
                (p.word.as_str(), p.pos.col, p.pos.row, !down)
            } else {
                (p.word.as_str(), p.pos.row, p.pos.col, down)
            }
        })
        .collect();
    placements.sort_unstable();

    let mut hasher = DefaultHasher::new();
    placements.hash(&mut hasher);
    hasher.finish()
}

/// Solve a Q-Less roll against a dictionary.
///
/// Parses `letters` into the ledger, enumerates the formable candidate words
/// (longest first), and runs the depth-first placement search. Each branch
/// operates on its own copies of the grid, ledger, and used-word set, so
/// sibling branches never observe each other's placements.
///
/// A complete solution consumes the input letters *exactly*: the accepting
/// state is an empty ledger with at least one word placed. Branches whose
/// leftover letters are too few to form another word are dead ends,
/// discarded silently.
///
/// # Errors
///
/// Returns [`SolverError::InvalidInput`] for non-alphabetic letters or a
/// zero `min_word_length`, and [`SolverError::InternalConflict`] if the
/// engine's own invariants are violated. Finding no solutions is **not** an
/// error.
pub fn solve(
    letters: &str,
    dictionary: &Dictionary,
    config: &SolveConfig,
) -> Result<SolveResult, SolverError> {
    if config.min_word_length == 0 {
        return Err(InputError::InvalidMinWordLength { given: 0 }.into());
    }
    debug_assert!(config.max_solutions > 0, "max_solutions must be positive");

    let original: LetterCounts = letters.parse()?;

    let words = dictionary.words_formable_from(&original, config.min_word_length);
    let candidates: Vec<Candidate> = words
        .iter()
        .map(|&word| Candidate { word, counts: LetterCounts::from_word(word) })
        .collect();
    debug!("{} candidate words for '{original}'", candidates.len());

    match config.mode {
        SolveMode::AllWords => Ok(solve_all_words(&candidates, config)),
        SolveMode::Complete => solve_complete(&candidates, original, dictionary, config),
    }
}

/// Degenerate mode: every candidate word becomes a one-word solution, placed
/// at the origin through the normal grid path.
fn solve_all_words(candidates: &[Candidate], config: &SolveConfig) -> SolveResult {
    let mut solutions = Vec::new();
    for candidate in candidates {
        if solutions.len() >= config.max_solutions {
            return SolveResult {
                solutions,
                status: SolveStatus::FoundEnough,
                nodes_visited: candidates.len() as u64,
            };
        }
        let mut grid = Grid::new();
        // a single word on an empty grid cannot conflict
        if let Err(conflict) = grid.place(candidate.word, Pos::new(0, 0), Orientation::Across) {
            debug_assert!(false, "conflict on empty grid: {conflict}");
            continue;
        }
        solutions.push(Solution { grid, used_letters: candidate.counts });
    }

    SolveResult {
        solutions,
        status: SolveStatus::SearchExhausted,
        nodes_visited: candidates.len() as u64,
    }
}

fn solve_complete(
    candidates: &[Candidate],
    original: LetterCounts,
    dictionary: &Dictionary,
    config: &SolveConfig,
) -> Result<SolveResult, SolverError> {
    let mut ctx = SearchCtx {
        dictionary,
        candidates,
        original,
        min_word_length: config.min_word_length,
        max_solutions: config.max_solutions,
        budget: TimeBudget::new(config.time_budget),
        max_nodes: config.max_nodes,
        nodes: 0,
        out_of_budget: false,
        seen: HashSet::new(),
    };

    let mut solutions = Vec::new();
    let used: HashSet<usize> = HashSet::new();
    backtrack(&mut ctx, &Grid::new(), original, &used, &mut solutions)?;

    let status = if ctx.out_of_budget {
        SolveStatus::BudgetExhausted { elapsed: ctx.budget.elapsed(), nodes: ctx.nodes }
    } else if solutions.len() >= ctx.max_solutions {
        SolveStatus::FoundEnough
    } else {
        SolveStatus::SearchExhausted
    };

    debug!(
        "search finished: {} solution(s), {} node(s), {:.3}s",
        solutions.len(),
        ctx.nodes,
        ctx.budget.elapsed().as_secs_f64()
    );

    Ok(SolveResult { solutions, status, nodes_visited: ctx.nodes })
}

/// One step of the depth-first search over `(grid, remaining, used)` states.
///
/// Transition: for each anchor on the current grid, for each unused candidate
/// the ledger can still afford, place it if the validator accepts and recurse
/// into the child state. Accepting state: empty ledger, non-empty grid.
fn backtrack(
    ctx: &mut SearchCtx,
    grid: &Grid,
    remaining: LetterCounts,
    used: &HashSet<usize>,
    solutions: &mut Vec<Solution>,
) -> Result<(), SolverError> {
    if !ctx.charge_node() {
        return Ok(());
    }

    if remaining.total() < ctx.min_word_length {
        // No further word can be placed. A branch that consumed everything
        // (and placed something) is a solution; leftover letters make it a
        // dead end, discarded silently.
        if remaining.is_empty() && !grid.is_empty() && ctx.seen.insert(solution_key(grid)) {
            solutions.push(Solution {
                grid: grid.clone(),
                used_letters: ctx.original.consume(&remaining),
            });
        }
        return Ok(());
    }

    // copy the slice reference out so the loop doesn't hold a borrow of ctx
    let candidates = ctx.candidates;
    for anchor in grid.anchors() {
        for (idx, candidate) in candidates.iter().enumerate() {
            if solutions.len() >= ctx.max_solutions || ctx.out_of_budget {
                return Ok(());
            }
            if used.contains(&idx) {
                continue;
            }
            if !remaining.can_consume(&candidate.counts) {
                continue;
            }
            if validate_placement(grid, ctx.dictionary, candidate.word, anchor, ctx.min_word_length)
                .is_err()
            {
                continue;
            }

            // Child state: own grid, ledger snapshot, and used-word set.
            let mut child_grid = grid.clone();
            child_grid.place(candidate.word, anchor.pos, anchor.orientation)?;
            let mut child_used = used.clone();
            child_used.insert(idx);

            backtrack(ctx, &child_grid, remaining.consume(&candidate.counts), &child_used, solutions)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_of(solution: &Solution) -> Vec<&str> {
        solution.words().collect()
    }

    #[test]
    fn test_two_word_cross() {
        let dict = Dictionary::from_words(["ban", "bat"]);
        let result = solve("batban", &dict, &SolveConfig::default()).unwrap();

        assert!(!result.solutions.is_empty(), "ban/bat must interlock");
        assert_eq!(result.status, SolveStatus::SearchExhausted);

        for solution in &result.solutions {
            let mut words = words_of(solution);
            words.sort_unstable();
            assert_eq!(words, vec!["ban", "bat"]);
        }
    }

    #[test]
    fn test_letter_conservation() {
        let dict = Dictionary::from_words(["ban", "bat"]);
        let letters = "batban";
        let result = solve(letters, &dict, &SolveConfig::default()).unwrap();

        let input: LetterCounts = letters.parse().unwrap();
        for solution in &result.solutions {
            // consumed multiset equals the input exactly
            assert_eq!(solution.used_letters, input);

            // and it really is the sum over placed words
            let mut summed = LetterCounts::default();
            for word in solution.words() {
                summed = summed.release(&LetterCounts::from_word(word));
            }
            assert_eq!(summed, input);
        }
    }

    #[test]
    fn test_solution_words_meet_minimum_and_dictionary() {
        let dict = Dictionary::from_words(["ban", "bat", "at", "ab"]);
        let config = SolveConfig { min_word_length: 3, ..SolveConfig::default() };
        let result = solve("batban", &dict, &config).unwrap();

        assert!(!result.solutions.is_empty());
        for solution in &result.solutions {
            for word in solution.words() {
                assert!(word.len() >= 3);
                assert!(dict.is_valid_word(word));
            }
        }
    }

    #[test]
    fn test_single_word_yields_one_arrangement() {
        // both origin anchors reach "cat", but across and down are the same
        // arrangement transposed
        let dict = Dictionary::from_words(["cat"]);
        let result = solve("cat", &dict, &SolveConfig::default()).unwrap();
        assert_eq!(result.solutions.len(), 1);
    }

    #[test]
    fn test_leftover_letters_are_a_dead_end() {
        // "bat" fits but leaves "xz" unconsumed; not a solution
        let dict = Dictionary::from_words(["bat"]);
        let result = solve("batxz", &dict, &SolveConfig::default()).unwrap();
        assert!(result.solutions.is_empty());
        assert_eq!(result.status, SolveStatus::SearchExhausted);
    }

    #[test]
    fn test_no_words_formable_is_empty_not_error() {
        let dict = Dictionary::from_words(["queen"]);
        let result = solve("abcabc", &dict, &SolveConfig::default()).unwrap();
        assert!(result.solutions.is_empty());
        assert_eq!(result.status, SolveStatus::SearchExhausted);
    }

    #[test]
    fn test_empty_letters_is_empty_not_error() {
        let dict = Dictionary::from_words(["cat"]);
        let result = solve("", &dict, &SolveConfig::default()).unwrap();
        assert!(result.solutions.is_empty());
    }

    #[test]
    fn test_solutions_are_interlocking_grids() {
        let dict = Dictionary::from_words(["ban", "bat"]);
        let result = solve("batban", &dict, &SolveConfig::default()).unwrap();

        for solution in &result.solutions {
            assert_eq!(solution.placements().len(), 2);
            // two 3-letter words occupying fewer than 6 cells share a cell
            assert!(solution.grid.cell_count() < 6, "words must intersect");
        }
    }

    #[test]
    fn test_determinism() {
        let dict = Dictionary::from_words(["ban", "bat", "tab", "nab"]);
        let first = solve("batban", &dict, &SolveConfig::default()).unwrap();
        let second = solve("batban", &dict, &SolveConfig::default()).unwrap();

        assert_eq!(first.solutions, second.solutions);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn test_no_duplicate_arrangements() {
        let dict = Dictionary::from_words(["ban", "bat", "tab", "nab"]);
        let result = solve("batban", &dict, &SolveConfig::default()).unwrap();

        let mut keys = HashSet::new();
        for solution in &result.solutions {
            assert!(keys.insert(solution_key(&solution.grid)), "duplicate arrangement emitted");
        }
    }

    #[test]
    fn test_max_solutions_stops_early() {
        let dict = Dictionary::from_words(["ban", "bat", "tab", "nab"]);
        let config = SolveConfig { max_solutions: 1, ..SolveConfig::default() };
        let result = solve("batban", &dict, &config).unwrap();

        assert_eq!(result.solutions.len(), 1);
        assert_eq!(result.status, SolveStatus::FoundEnough);
    }

    #[test]
    fn test_node_budget_reports_exhaustion() {
        let dict = Dictionary::from_words(["ban", "bat", "tab", "nab"]);
        let config = SolveConfig { max_nodes: 2, ..SolveConfig::default() };
        let result = solve("batban", &dict, &config).unwrap();

        assert!(matches!(result.status, SolveStatus::BudgetExhausted { nodes, .. } if nodes >= 2));
    }

    #[test]
    fn test_invalid_min_word_length() {
        let dict = Dictionary::from_words(["cat"]);
        let config = SolveConfig { min_word_length: 0, ..SolveConfig::default() };
        let err = solve("cat", &dict, &config).unwrap_err();

        assert!(matches!(
            err,
            SolverError::InvalidInput(InputError::InvalidMinWordLength { given: 0 })
        ));
        assert_eq!(err.code(), "S001");
    }

    #[test]
    fn test_non_alphabetic_letters_rejected() {
        let dict = Dictionary::from_words(["cat"]);
        let err = solve("ca7", &dict, &SolveConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SolverError::InvalidInput(InputError::NonAlphabetic { invalid_char: '7' })
        ));
        assert!(err.display_detailed().contains("S001"));
    }

    mod all_words {
        use super::*;

        #[test]
        fn test_emits_each_formable_word_once() {
            let dict = Dictionary::from_words(["eat", "tea", "ate", "queen"]);
            let config = SolveConfig { mode: SolveMode::AllWords, ..SolveConfig::default() };
            let result = solve("eatbcdfghijk", &dict, &config).unwrap();

            let found: Vec<Vec<&str>> =
                result.solutions.iter().map(|s| s.words().collect()).collect();
            assert_eq!(found, vec![vec!["ate"], vec!["eat"], vec!["tea"]]);
            assert_eq!(result.status, SolveStatus::SearchExhausted);
        }

        #[test]
        fn test_each_solution_is_a_placed_grid() {
            let dict = Dictionary::from_words(["eat"]);
            let config = SolveConfig { mode: SolveMode::AllWords, ..SolveConfig::default() };
            let result = solve("eat", &dict, &config).unwrap();

            assert_eq!(result.solutions.len(), 1);
            let solution = &result.solutions[0];
            assert_eq!(solution.grid.render(), vec!["eat"]);
            assert_eq!(solution.used_letters, LetterCounts::from_word("eat"));
        }

        #[test]
        fn test_respects_max_solutions() {
            let dict = Dictionary::from_words(["eat", "tea", "ate"]);
            let config = SolveConfig {
                mode: SolveMode::AllWords,
                max_solutions: 2,
                ..SolveConfig::default()
            };
            let result = solve("eat", &dict, &config).unwrap();

            assert_eq!(result.solutions.len(), 2);
            assert_eq!(result.status, SolveStatus::FoundEnough);
        }
    }

    mod fingerprints {
        use super::*;

        #[test]
        fn test_same_placements_same_key() {
            let mut a = Grid::new();
            a.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();
            a.place("car", Pos::new(0, 0), Orientation::Down).unwrap();

            // same arrangement, opposite placement order
            let mut b = Grid::new();
            b.place("car", Pos::new(0, 0), Orientation::Down).unwrap();
            b.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

            assert_eq!(solution_key(&a), solution_key(&b));
        }

        #[test]
        fn test_different_placements_different_key() {
            let mut a = Grid::new();
            a.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

            let mut b = Grid::new();
            b.place("cat", Pos::new(0, 1), Orientation::Across).unwrap();

            assert_ne!(solution_key(&a), solution_key(&b));
        }

        #[test]
        fn test_transposed_arrangement_same_key() {
            // the same lone word across or down is one arrangement, read the
            // other way
            let mut a = Grid::new();
            a.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();

            let mut b = Grid::new();
            b.place("cat", Pos::new(0, 0), Orientation::Down).unwrap();

            assert_eq!(solution_key(&a), solution_key(&b));
        }

        #[test]
        fn test_transposed_two_word_grids_same_key() {
            let mut a = Grid::new();
            a.place("cat", Pos::new(0, 0), Orientation::Across).unwrap();
            a.place("car", Pos::new(0, 0), Orientation::Down).unwrap();

            let mut b = Grid::new();
            b.place("cat", Pos::new(0, 0), Orientation::Down).unwrap();
            b.place("car", Pos::new(0, 0), Orientation::Across).unwrap();

            assert_eq!(solution_key(&a), solution_key(&b));
        }
    }
}
