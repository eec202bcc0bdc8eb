/*
topology.rs

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

//! Generate the random block tree.
//!
//! A block keeps adding pairs of children while a random draw stays below a probability that
//! decreases with the number of children already added and with the temperature.
//! The temperature is multiplied by [`TEMP_MUL`] at each level, so the tree is always finite.

use log::{Level, debug, info, log_enabled};

use super::block::{Block, Orientation};
use super::prng::Prng;
use crate::config::{BASE_R_TEMP, BASE_TEMP, MAX_CHILDREN, P_DIV, SOURCE_VOLTAGE, TEMP_MUL};

impl Block {
    /// Build a complete puzzle topology.
    ///
    /// The tree is generated, the root block gets its four sides free because it borders the
    /// puzzle, and then the resistors are placed.
    pub fn generate(prng: &mut Prng, complexity: f64, orientation: Orientation) -> Self {
        let mut root: Block = Block::new(orientation, complexity);
        root.populate(prng, BASE_TEMP);
        root.set_all_free();
        root.place_resistors(prng, BASE_R_TEMP);
        root.start_v = SOURCE_VOLTAGE;

        info!(
            "Generated {} blocks with {} resistors (depth {})",
            root.num_blocks(),
            root.num_resistors(),
            root.depth()
        );
        if log_enabled!(Level::Debug) {
            root.debug();
        }
        root
    }

    /// Recursively add children to the block.
    pub fn populate(&mut self, prng: &mut Prng, temperature: f64) {
        while prng.draw() < self.split_probability(temperature)
            && self.children.len() < MAX_CHILDREN
        {
            let mut first: Block = Block::new(self.orientation.other(), self.complexity);
            let mut second: Block = Block::new(self.orientation.other(), self.complexity);
            first.populate(prng, temperature * TEMP_MUL);
            second.populate(prng, temperature * TEMP_MUL);
            self.children.push(first);
            self.children.push(second);
            debug!(
                "{:?} block split in {} children (temperature {temperature})",
                self.orientation,
                self.children.len()
            );
        }
    }

    /// Probability of adding another pair of children.
    fn split_probability(&self, temperature: f64) -> f64 {
        self.complexity * P_DIV * temperature / (self.children.len() + 1) as f64
    }
}
