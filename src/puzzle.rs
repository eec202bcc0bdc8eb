/*
puzzle.rs

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

//! Create puzzles and check the player's answers.
//!
//! [`build_puzzle`] runs the whole pipeline for one puzzle: generate the topology, map it to
//! its electrical graph, and solve the graph.
//! [`PuzzleService`] adds the persistence: it stores the created puzzles with
//! [`SaverPuzzles`] and retrieves them by ID.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Local;
use log::{debug, info};
use std::error::Error;
use std::fmt;

use crate::circuit::graph::CircuitGraph;
use crate::circuit::mapper::{self, MapError};
use crate::circuit::solver::{self, Answer, SolveError};
use crate::config::{EPS, MAX_COMPLEXITY, is_valid_complexity};
use crate::generator::block::{Block, Orientation};
use crate::generator::prng::Prng;
use crate::saver::puzzles::{PuzzleRecord, SaverPuzzles};

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PuzzleError {
    /// The complexity is missing or out of range.
    InvalidParameter(String),

    /// No puzzle with that ID.
    NotFound(String),

    /// The request is incomplete, such as a check without an answer.
    BadRequest(String),

    /// The generated network has no path between the input and the ground.
    DegenerateNetwork,

    /// The topology cannot be placed on the integer plane.
    Map(MapError),

    /// The electrical network cannot be solved.
    Solve(SolveError),

    /// The puzzle store failed.
    Storage(String),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            PuzzleError::NotFound(id) => write!(f, "puzzle {id} not found"),
            PuzzleError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            PuzzleError::DegenerateNetwork => {
                write!(f, "the network does not connect the input to the ground")
            }
            PuzzleError::Map(e) => write!(f, "cannot map the topology: {e}"),
            PuzzleError::Solve(e) => write!(f, "cannot solve the network: {e}"),
            PuzzleError::Storage(msg) => write!(f, "puzzle store error: {msg}"),
        }
    }
}

impl Error for PuzzleError {}

impl From<MapError> for PuzzleError {
    fn from(e: MapError) -> Self {
        PuzzleError::Map(e)
    }
}

impl From<SolveError> for PuzzleError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::DegenerateNetwork => PuzzleError::DegenerateNetwork,
            e => PuzzleError::Solve(e),
        }
    }
}

impl From<Box<dyn Error>> for PuzzleError {
    fn from(e: Box<dyn Error>) -> Self {
        PuzzleError::Storage(e.to_string())
    }
}

/// Generated puzzle with its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// Block tree, for drawing the puzzle.
    pub topology: Block,

    /// Effective resistance between the input and the ground terminals.
    pub answer: Answer,
}

/// Puzzle returned by [`PuzzleService::create_puzzle`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPuzzle {
    pub id: String,
    pub puzzle: Puzzle,
}

/// Whether the two values are equal within [`EPS`].
pub fn answers_match(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Generate a topology and compute its answer.
pub fn build_puzzle(complexity: f64, prng: &mut Prng) -> Result<Puzzle, PuzzleError> {
    if !is_valid_complexity(complexity) {
        return Err(PuzzleError::InvalidParameter(format!(
            "complexity must be in (0, {MAX_COMPLEXITY}], got {complexity}"
        )));
    }
    let topology: Block = Block::generate(prng, complexity, Orientation::Vertical);
    let answer: Answer = solve_topology(&topology)?;
    Ok(Puzzle { topology, answer })
}

/// Map the topology to its electrical graph and solve it.
pub fn solve_topology(topology: &Block) -> Result<Answer, PuzzleError> {
    let graph: CircuitGraph = mapper::map_to_graph(topology)?;
    let answer: Answer = solver::solve(&graph)?;
    debug!("Answer: {answer:?}");
    Ok(answer)
}

/// Return a new puzzle ID from the random stream.
pub fn generate_id(prng: &mut Prng) -> String {
    URL_SAFE_NO_PAD.encode(prng.random_bytes::<8>())
}

/// Puzzle operations, backed by a puzzle store.
pub struct PuzzleService {
    saver: SaverPuzzles,
}

impl PuzzleService {
    /// Create a [`PuzzleService`] object.
    pub fn new(saver: SaverPuzzles) -> Self {
        Self { saver }
    }

    /// Generate, solve, and save a new puzzle.
    ///
    /// The ID and the puzzle come from the same random stream.
    pub fn create_puzzle(
        &self,
        complexity: f64,
        prng: &mut Prng,
    ) -> Result<CreatedPuzzle, PuzzleError> {
        let id: String = generate_id(prng);
        let puzzle: Puzzle = build_puzzle(complexity, prng)?;
        let json: String =
            serde_json::to_string(&puzzle.topology).map_err(|e| PuzzleError::Storage(e.to_string()))?;

        self.saver.insert(PuzzleRecord {
            id: id.clone(),
            json,
            answer: puzzle.answer.value(),
            created: Local::now(),
        })?;
        info!("Puzzle {id} created (complexity {complexity})");
        Ok(CreatedPuzzle { id, puzzle })
    }

    /// Return the serialized topology of the given puzzle.
    pub fn get_puzzle(&self, id: &str) -> Result<String, PuzzleError> {
        match self.saver.get(id)? {
            Some(record) => Ok(record.json),
            None => Err(PuzzleError::NotFound(id.to_string())),
        }
    }

    /// Compare the player's guess with the answer of the given puzzle.
    pub fn check_answer(&self, id: &str, guess: Option<f64>) -> Result<bool, PuzzleError> {
        let guess: f64 = match guess {
            Some(g) if g.is_finite() => g,
            Some(g) => return Err(PuzzleError::BadRequest(format!("invalid answer {g}"))),
            None => return Err(PuzzleError::BadRequest("answer not provided".to_string())),
        };
        match self.saver.get(id)? {
            Some(record) => {
                let ok: bool = answers_match(record.answer, guess);
                debug!("Puzzle {id}: guess {guess} -> {ok}");
                Ok(ok)
            }
            None => Err(PuzzleError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_match_is_symmetric() {
        for (a, b) in [(1.0, 1.005), (1.0, 1.02), (0.0, 0.00999), (2.5, -2.5)] {
            assert_eq!(answers_match(a, b), answers_match(b, a));
        }
        assert!(answers_match(1.0, 1.005));
        assert!(!answers_match(1.0, 1.02));
    }

    #[test]
    fn invalid_complexity_is_rejected() {
        let mut prng: Prng = Prng::from_seed(1);
        for c in [0.0, -0.5, MAX_COMPLEXITY * 2.0, f64::NAN] {
            assert!(matches!(
                build_puzzle(c, &mut prng),
                Err(PuzzleError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn ids_are_short_and_url_safe() {
        let mut prng: Prng = Prng::from_seed(8);
        let id: String = generate_id(&mut prng);
        assert_eq!(id.len(), 11);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(id, generate_id(&mut prng));
    }

    #[test]
    fn built_puzzles_are_solved_or_degenerate() {
        for seed in 0..100 {
            match build_puzzle(1.0, &mut Prng::from_seed(seed)) {
                Ok(p) => assert!(p.answer.value() >= 0.0),
                Err(e) => assert_eq!(e, PuzzleError::DegenerateNetwork),
            }
        }
    }
}
