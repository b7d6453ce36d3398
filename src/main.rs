use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgGroup, Parser};

use qless_solver::dice;
use qless_solver::dictionary::Dictionary;
use qless_solver::errors::InputError;
use qless_solver::layout;
use qless_solver::letters::check_roll;
use qless_solver::solver::{self, SolveConfig, SolveMode, SolveStatus};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Q-Less dice game solver
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["letters", "generate"])))]
struct Cli {
    /// The 12 letters rolled (e.g. "cbdtaeioumns")
    #[arg(short, long)]
    letters: Option<String>,

    /// Generate a random roll of the dice instead of supplying one
    #[arg(short, long)]
    generate: bool,

    /// Validate an arrangement read from a layout file ('.' for empty cells)
    /// instead of solving; requires --letters
    #[arg(long, value_name = "PATH", requires = "letters", conflicts_with = "generate")]
    validate: Option<String>,

    /// Minimum word length
    #[arg(short = 'm', long, default_value_t = 3)]
    min_word_length: usize,

    /// List every formable word instead of searching for a full grid
    #[arg(short = 'a', long)]
    all_words: bool,

    /// Maximum number of solutions to return
    #[arg(short = 'n', long, default_value_t = 100)]
    num_results: usize,

    /// Path to a dictionary file (one word per line); the built-in word list
    /// is used if omitted
    #[arg(short, long)]
    dictionary: Option<String>,
}

/// Entry point of the Q-Less CLI solver.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    // Set up logging
    let debug_enabled = std::env::var("QLESS_DEBUG").is_ok();
    qless_solver::logging::init_logger(debug_enabled);

    match try_main() {
        Ok(code) => code,
        Err(e) => {
            // Print the error to stderr, with detailed formatting where the
            // error type carries a code and help text
            if let Some(solver_err) = e.downcast_ref::<solver::SolverError>() {
                eprintln!("Error: {}", solver_err.display_detailed());
            } else if let Some(input_err) = e.downcast_ref::<InputError>() {
                eprintln!("Error: {}", input_err.display_detailed());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Core application logic.
///
/// Steps:
/// 1. Parse CLI arguments with Clap.
/// 2. Load the dictionary (from disk or the built-in list).
/// 3. Resolve the letters: as given, or rolled with `--generate`.
/// 4. Validate a layout file, or solve, per the flags.
/// 5. Print solutions on stdout; timings and status on stderr.
fn try_main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. Load the dictionary
    let t_load = Instant::now();
    let dictionary = match &cli.dictionary {
        Some(path) => Dictionary::load_from_path(path)?,
        None => Dictionary::builtin(),
    };
    let load_secs = t_load.elapsed().as_secs_f64();

    // 2. Resolve the roll. Clap guarantees letters is set unless --generate
    // was given; an empty fallback fails the roll check below.
    let letters = if cli.generate {
        let roll = dice::generate_random_roll();
        println!("Rolled: {roll}");
        roll
    } else {
        cli.letters.clone().unwrap_or_default()
    };
    check_roll(&letters)?;

    // 3a. Validation mode: check the caller's own arrangement
    if let Some(path) = &cli.validate {
        let contents = std::fs::read_to_string(path)?;
        let rows = layout::parse_layout(&contents);
        let report = layout::validate_layout(&dictionary, &letters, &rows, cli.min_word_length);

        if report.is_valid() {
            println!("Valid arrangement.");
            return Ok(ExitCode::SUCCESS);
        }
        println!("Invalid arrangement:");
        for violation in &report.violations {
            println!("  - {violation}");
        }
        return Ok(ExitCode::FAILURE);
    }

    // 3b. Solve mode
    let config = SolveConfig {
        min_word_length: cli.min_word_length,
        mode: if cli.all_words { SolveMode::AllWords } else { SolveMode::Complete },
        max_solutions: cli.num_results,
        ..SolveConfig::default()
    };

    let t_solve = Instant::now();
    let solve_result = solver::solve(&letters, &dictionary, &config)?;
    let solve_secs = t_solve.elapsed().as_secs_f64();

    // 4. Print each solution on stdout
    if cli.all_words {
        for solution in &solve_result.solutions {
            for word in solution.words() {
                println!("{word}");
            }
        }
    } else {
        for (i, solution) in solve_result.solutions.iter().enumerate() {
            let words: Vec<&str> = solution.words().collect();
            println!("Solution {}: {}", i + 1, words.join(" "));
            for line in solution.grid.render() {
                println!("  {line}");
            }
            println!();
        }
        if solve_result.solutions.is_empty() {
            println!("No solution found.");
        }
    }

    match solve_result.status {
        SolveStatus::BudgetExhausted { elapsed, nodes } => {
            eprintln!(
                "⚠️  Stopped after {:.1}s / {nodes} nodes; some solutions may not have been found",
                elapsed.as_secs_f64()
            );
        }
        SolveStatus::FoundEnough => {
            eprintln!(
                "✓ Stopped after finding {}/{} requested solutions",
                solve_result.solutions.len(),
                cli.num_results
            );
        }
        SolveStatus::SearchExhausted => {
            eprintln!("✓ Search space exhausted");
        }
    }

    // 5. Diagnostics to stderr
    eprintln!(
        "Loaded {} words in {:.3}s; solved in {:.3}s ({} solutions, {} nodes).",
        dictionary.len(),
        load_secs,
        solve_secs,
        solve_result.solutions.len(),
        solve_result.nodes_visited
    );

    Ok(ExitCode::SUCCESS)
}
