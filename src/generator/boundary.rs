/*
boundary.rs

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

//! Propagate the free sides down the block tree and place the resistors on the leaves.
//!
//! Between two adjacent siblings, exactly one of them gets the shared side free: the sibling
//! with fewer children, or the later sibling when both have the same number of children.
//! The first and the last siblings inherit the outer sides of their parent, and the sides
//! orthogonal to the split axis are copied from the parent to every child.
//!
//! Only the leaves carry resistors. Each free side of a leaf gets a resistor when a random draw,
//! scaled by the temperature, stays below [`R_PROB`].

use log::debug;

use super::block::{Block, Side};
use super::prng::Prng;
use crate::config::{R_PROB, TEMP_MUL, UNIT_RESISTANCE};

impl Block {
    /// Recursively assign the free sides of the children and place the resistors on the leaves.
    ///
    /// The free sides of `self` must already be set.
    pub fn place_resistors(&mut self, prng: &mut Prng, temperature: f64) {
        if self.is_leaf() {
            self.place_leaf_resistors(prng, temperature);
            return;
        }

        self.clear_resistors();
        self.propagate_free_sides();
        for child in &mut self.children {
            child.place_resistors(prng, temperature * TEMP_MUL);
        }
    }

    /// Compute the free sides of all the children from the free sides of `self` and from the
    /// number of children of each sibling.
    pub fn propagate_free_sides(&mut self) {
        if self.is_leaf() {
            return;
        }
        let (leading, trailing) = self.orientation.split_sides();
        let (cross_a, cross_b) = self.orientation.cross_sides();
        let outer_leading: bool = self.is_free(leading);
        let outer_trailing: bool = self.is_free(trailing);
        let cross: (bool, bool) = (self.is_free(cross_a), self.is_free(cross_b));

        // For each pair of adjacent siblings, whether the later one owns the shared side
        let later_owns: Vec<bool> = self
            .children
            .windows(2)
            .map(|pair| pair[0].children.len() >= pair[1].children.len())
            .collect();

        let last: usize = self.children.len() - 1;
        for (i, child) in self.children.iter_mut().enumerate() {
            let lead_free: bool = if i == 0 {
                outer_leading
            } else {
                later_owns[i - 1]
            };
            let trail_free: bool = if i == last {
                outer_trailing
            } else {
                !later_owns[i]
            };
            child.set_free(leading, lead_free);
            child.set_free(trailing, trail_free);
            child.set_free(cross_a, cross.0);
            child.set_free(cross_b, cross.1);
        }
    }

    /// Randomly place a resistor on each free side of a leaf.
    fn place_leaf_resistors(&mut self, prng: &mut Prng, temperature: f64) {
        for side in Side::all() {
            if self.is_free(side) && prng.draw() * temperature < R_PROB {
                self.set_resistor(side, Some(UNIT_RESISTANCE));
                debug!("Resistor placed on the {side:?} side (temperature {temperature})");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BASE_R_TEMP, BASE_TEMP};
    use crate::generator::block::Orientation;

    fn with_children(orientation: Orientation, counts: &[usize]) -> Block {
        let mut parent: Block = Block::new(orientation, 1.0);
        for &n in counts {
            let mut child: Block = Block::new(orientation.other(), 1.0);
            for _ in 0..n {
                child.children.push(Block::new(orientation, 1.0));
            }
            parent.children.push(child);
        }
        parent
    }

    #[test]
    fn fewer_children_owns_the_shared_side() {
        let mut parent: Block = with_children(Orientation::Vertical, &[2, 0, 0, 4]);
        parent.set_all_free();
        parent.propagate_free_sides();
        let c: &Vec<Block> = &parent.children;

        // 2 vs 0: the second child has fewer children
        assert!(!c[0].free_right && c[1].free_left);
        // 0 vs 0: tie, the later child owns the side
        assert!(!c[1].free_right && c[2].free_left);
        // 0 vs 4: the first child has fewer children
        assert!(c[2].free_right && !c[3].free_left);
        // Outer sides come from the parent
        assert!(c[0].free_left && c[3].free_right);
        assert!(c.iter().all(|b| b.free_up && b.free_down));
    }

    #[test]
    fn closed_parent_sides_stay_closed() {
        let mut parent: Block = with_children(Orientation::Horizontal, &[0, 0]);
        parent.free_up = false;
        parent.free_down = true;
        parent.free_left = true;
        parent.free_right = false;
        parent.propagate_free_sides();
        let c: &Vec<Block> = &parent.children;
        assert!(!c[0].free_up);
        assert!(c[1].free_down);
        assert!(c[1].free_up && !c[0].free_down);
        assert!(c.iter().all(|b| b.free_left && !b.free_right));
    }

    fn check_tree(block: &Block) {
        if block.is_leaf() {
            for side in Side::all() {
                if let Some(r) = block.resistor(side) {
                    assert_eq!(r, UNIT_RESISTANCE);
                    assert!(block.is_free(side));
                }
            }
            return;
        }
        assert!(Side::all().all(|s| block.resistor(s).is_none()));
        let (leading, trailing) = block.orientation.split_sides();
        for pair in block.children.windows(2) {
            assert!(pair[0].is_free(trailing) ^ pair[1].is_free(leading));
        }
        for child in &block.children {
            check_tree(child);
        }
    }

    #[test]
    fn generated_trees_respect_the_boundary_rules() {
        for seed in 0..200 {
            let mut prng: Prng = Prng::from_seed(seed);
            let mut root: Block = Block::new(Orientation::Vertical, 2.0);
            root.populate(&mut prng, BASE_TEMP);
            root.set_all_free();
            root.place_resistors(&mut prng, BASE_R_TEMP);
            check_tree(&root);
        }
    }

    #[test]
    fn cold_leaf_gets_every_free_resistor() {
        let mut prng: Prng = Prng::from_seed(11);
        let mut leaf: Block = Block::new(Orientation::Vertical, 1.0);
        leaf.free_left = true;
        leaf.free_up = true;
        // draw() * 1.0 < 1.0 always holds
        leaf.place_resistors(&mut prng, 1.0);
        assert_eq!(leaf.left_r, Some(UNIT_RESISTANCE));
        assert_eq!(leaf.up_r, Some(UNIT_RESISTANCE));
        assert_eq!(leaf.right_r, None);
        assert_eq!(leaf.down_r, None);
    }
}
