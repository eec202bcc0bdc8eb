/*
config.rs

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

//! Generation parameters and runtime settings.
//!
//! The generation constants control the shape of the random block trees and therefore the
//! difficulty of the puzzles.
//! Changing them changes the puzzles produced for a given seed.
//!
//! The runtime settings are read from the environment by [`Settings::from_env`].
//! Command-line options can override them.

use log::debug;
use std::env;
use std::path::PathBuf;

/// Probability factor for splitting a block into two more children.
pub const P_DIV: f64 = 0.7;

/// Maximum number of children for a block. Children are always added by pairs.
pub const MAX_CHILDREN: usize = 4;

/// Temperature multiplier applied at each recursion level.
pub const TEMP_MUL: f64 = 0.6;

/// Starting temperature when building the block tree.
pub const BASE_TEMP: f64 = 2.0;

/// Starting temperature when placing the resistors.
pub const BASE_R_TEMP: f64 = 2.0;

/// Threshold for placing a resistor on a free side of a leaf block.
pub const R_PROB: f64 = 1.0;

/// Resistance of every resistor in the puzzle, in ohms.
pub const UNIT_RESISTANCE: f64 = 1.0;

/// Voltage of the source connected between the input and the ground terminals.
pub const SOURCE_VOLTAGE: f64 = 1.0;

/// Tolerance when comparing the player's answer with the computed resistance.
pub const EPS: f64 = 1e-2;

/// Source current, in amperes, above which the network is considered short-circuited.
pub const SATURATION_CURRENT: f64 = 500.0 - EPS;

/// Complexity used when the caller does not provide one.
pub const DEFAULT_COMPLEXITY: f64 = 0.5;

/// Largest accepted complexity. Above that value the trees grow too large to be playable.
pub const MAX_COMPLEXITY: f64 = 4.0;

/// Environment variable that points to the puzzle store.
pub const DB_PATH_VAR: &str = "DB_PATH";

/// Puzzle store used when [`DB_PATH_VAR`] is not set.
pub const DEFAULT_DB_PATH: &str = "/tmp/zveno_db.json";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Path to the JSON file that stores the puzzles.
    pub db_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl Settings {
    /// Build the settings from the environment.
    pub fn from_env() -> Self {
        let db_path: PathBuf = match env::var(DB_PATH_VAR) {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => PathBuf::from(DEFAULT_DB_PATH),
        };
        debug!("Puzzle store: {db_path:?}");
        Self { db_path }
    }

    /// Replace the store path when one is given on the command line.
    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        if let Some(p) = db_path {
            self.db_path = p;
        }
        self
    }
}

/// Whether the given complexity can be used to generate a puzzle.
pub fn is_valid_complexity(complexity: f64) -> bool {
    complexity.is_finite() && complexity > 0.0 && complexity <= MAX_COMPLEXITY
}
