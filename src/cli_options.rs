/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Zveno.

Zveno is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Zveno is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Zveno. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! The command line gives access to the puzzle operations: create a puzzle, print its
//! topology, and check an answer.
//!
//! # Examples
//!
//! Create a puzzle and print its ID:
//!
//! ```
//! $ zveno --create --complexity 1.2
//! Q2hbq0a4bQk
//! ```
//!
//! Check an answer:
//!
//! ```
//! $ zveno --check Q2hbq0a4bQk --answer 0.75
//! false
//! ```
//!
//! Generate a puzzle without saving it, and print its topology and answer:
//!
//! ```
//! $ zveno --solve --seed 12 --complexity 0.8
//! ```

use clap::{ArgGroup, Parser};
use log::{debug, error};
use std::env;
use std::path::PathBuf;

use zveno::circuit::graph::CircuitGraph;
use zveno::circuit::mapper;
use zveno::config::{DEFAULT_COMPLEXITY, Settings};
use zveno::generator::prng::Prng;
use zveno::puzzle::{self, CreatedPuzzle, Puzzle, PuzzleError, PuzzleService};
use zveno::saver::puzzles::SaverPuzzles;

/// Create and check resistor network puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version)]
#[command(group(ArgGroup::new("action").required(true).args(["create", "show", "check", "solve"])))]
struct Args {
    /// Create and save a puzzle, and print its ID
    #[arg(long, default_value_t = false)]
    create: bool,

    /// Print the topology of the puzzle with the given ID
    #[arg(long, value_name = "ID")]
    show: Option<String>,

    /// Check the answer for the puzzle with the given ID
    #[arg(long, value_name = "ID")]
    check: Option<String>,

    /// Generate a puzzle without saving it, and print its topology and answer
    #[arg(long, default_value_t = false)]
    solve: bool,

    /// Answer to check
    #[arg(short, long)]
    answer: Option<f64>,

    /// Complexity of the generated puzzle
    #[arg(short, long, default_value_t = DEFAULT_COMPLEXITY)]
    complexity: f64,

    /// Seed for the random generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Path to the puzzle store (overrides the DB_PATH environment variable)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Exit code for the errors caused by the request.
const EXIT_REQUEST: u8 = 1;

/// Exit code for the other errors.
const EXIT_FAILURE: u8 = 2;

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let seeded: bool = args.seed.is_some();
    let mut prng: Prng = match args.seed {
        Some(seed) => Prng::from_seed(seed),
        None => Prng::from_os_rng(),
    };

    //
    // Generate a puzzle without the store
    //
    if args.solve {
        return match puzzle::build_puzzle(args.complexity, &mut prng) {
            Ok(p) => {
                print_puzzle(&p);
                0
            }
            Err(e) => report(e, seeded),
        };
    }

    let settings: Settings = Settings::from_env().with_db_path(args.db);
    debug!("Settings: {settings:?}");
    let service: PuzzleService = PuzzleService::new(SaverPuzzles::new(settings.db_path));

    if args.create {
        return match service.create_puzzle(args.complexity, &mut prng) {
            Ok(CreatedPuzzle { id, .. }) => {
                println!("{id}");
                0
            }
            Err(e) => report(e, seeded),
        };
    }

    if let Some(id) = args.show {
        return match service.get_puzzle(&id) {
            Ok(json) => {
                println!("{json}");
                0
            }
            Err(e) => report(e, seeded),
        };
    }

    if let Some(id) = args.check {
        return match service.check_answer(&id, args.answer) {
            Ok(result) => {
                println!("{result}");
                0
            }
            Err(e) => report(e, seeded),
        };
    }
    0
}

/// Print the topology, the size of the network, and the answer.
fn print_puzzle(p: &Puzzle) {
    match serde_json::to_string_pretty(&p.topology) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Cannot serialize the topology: {e}"),
    }
    let graph: CircuitGraph = match mapper::map_to_graph(&p.topology) {
        Ok(g) => g,
        Err(e) => {
            error!("Cannot map the topology: {e}");
            return;
        }
    };
    println!(
        "
    blocks = {}
 resistors = {}
     nodes = {}
    answer = {}",
        p.topology.num_blocks(),
        graph.edges().len(),
        graph.num_nodes(),
        p.answer.value()
    );
}

/// Return a suggestion for the errors that can go away by running the command again.
fn hint(e: &PuzzleError, seeded: bool) -> Option<&'static str> {
    match e {
        PuzzleError::DegenerateNetwork if seeded => {
            Some("the same seed always gives this network, try another --seed")
        }
        PuzzleError::DegenerateNetwork => Some("run the command again to get another network"),
        _ => None,
    }
}

/// Print the error and return the exit code.
fn report(e: PuzzleError, seeded: bool) -> u8 {
    eprintln!("Error: {e}");
    if let Some(h) = hint(&e, seeded) {
        eprintln!("Hint: {h}");
    }
    match e {
        PuzzleError::NotFound(_) | PuzzleError::BadRequest(_) | PuzzleError::InvalidParameter(_) => {
            EXIT_REQUEST
        }
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_network_suggests_a_retry() {
        let unseeded: &str = hint(&PuzzleError::DegenerateNetwork, false).unwrap();
        assert!(unseeded.contains("again"));
        let seeded: &str = hint(&PuzzleError::DegenerateNetwork, true).unwrap();
        assert!(seeded.contains("--seed"));
        assert_eq!(report(PuzzleError::DegenerateNetwork, false), EXIT_FAILURE);
    }

    #[test]
    fn request_errors_have_no_hint() {
        let e: PuzzleError = PuzzleError::NotFound("abc".to_string());
        assert_eq!(hint(&e, false), None);
        assert_eq!(report(e, false), EXIT_REQUEST);
    }
}
