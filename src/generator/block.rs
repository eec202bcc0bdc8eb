/*
block.rs

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

//! Blocks of the puzzle.
//!
//! The puzzle is a rectangle that is recursively split into smaller rectangles, the blocks.
//! A [`Block`] either is a leaf, and then each of its four sides may carry a resistor, or it is
//! split in an even number of children along its [`Orientation`].
//!
//! The serialized form of a [`Block`] is the topology that clients use to draw the puzzle.

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::FromRepr;

/// Axis along which a block is split into children.
///
/// - A `Vertical` block has its children side by side, from left to right.
/// - A `Horizontal` block has its children stacked, from top to bottom.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    #[serde(rename = "V")]
    Vertical,
    #[serde(rename = "H")]
    Horizontal,
}

impl Orientation {
    /// Return the other orientation. Children always use the orientation opposite to their
    /// parent.
    pub fn other(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }

    /// Sides facing the previous and the next sibling when a block is split along this axis.
    pub fn split_sides(self) -> (Side, Side) {
        match self {
            Orientation::Vertical => (Side::Left, Side::Right),
            Orientation::Horizontal => (Side::Up, Side::Down),
        }
    }

    /// Sides that are orthogonal to the split axis. All the children share these sides with
    /// their parent.
    pub fn cross_sides(self) -> (Side, Side) {
        match self {
            Orientation::Vertical => (Side::Up, Side::Down),
            Orientation::Horizontal => (Side::Left, Side::Right),
        }
    }
}

/// Side of a block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Side {
    Left,
    Right,
    Up,
    Down,
}

impl Side {
    /// The four sides, in the order used when placing resistors.
    pub fn all() -> impl Iterator<Item = Side> {
        (0..4).filter_map(Side::from_repr)
    }
}

/// Node of the block tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Split axis for the children.
    #[serde(rename = "orient")]
    pub orientation: Orientation,

    /// Children, always added by pairs.
    pub children: Vec<Block>,

    /// Branching propensity. Identical for all the blocks of a tree.
    pub complexity: f64,

    /// Whether a resistor may be placed on the left side.
    pub free_left: bool,

    /// Whether a resistor may be placed on the right side.
    pub free_right: bool,

    /// Whether a resistor may be placed on the top side.
    pub free_up: bool,

    /// Whether a resistor may be placed on the bottom side.
    pub free_down: bool,

    /// Resistor on the left side, in ohms.
    #[serde(rename = "leftR")]
    pub left_r: Option<f64>,

    /// Resistor on the right side, in ohms.
    #[serde(rename = "rightR")]
    pub right_r: Option<f64>,

    /// Resistor on the top side, in ohms.
    #[serde(rename = "upR")]
    pub up_r: Option<f64>,

    /// Resistor on the bottom side, in ohms.
    #[serde(rename = "downR")]
    pub down_r: Option<f64>,

    /// Voltage of the source applied to the puzzle. Only set on the root block.
    #[serde(default)]
    pub start_v: f64,
}

impl Block {
    /// Create a leaf block with no free side and no resistor.
    pub fn new(orientation: Orientation, complexity: f64) -> Self {
        Self {
            orientation,
            children: Vec::new(),
            complexity,
            free_left: false,
            free_right: false,
            free_up: false,
            free_down: false,
            left_r: None,
            right_r: None,
            up_r: None,
            down_r: None,
            start_v: 0.0,
        }
    }

    /// Whether the block has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a resistor may be placed on the given side.
    pub fn is_free(&self, side: Side) -> bool {
        match side {
            Side::Left => self.free_left,
            Side::Right => self.free_right,
            Side::Up => self.free_up,
            Side::Down => self.free_down,
        }
    }

    /// Set the free status of the given side.
    pub fn set_free(&mut self, side: Side, free: bool) {
        match side {
            Side::Left => self.free_left = free,
            Side::Right => self.free_right = free,
            Side::Up => self.free_up = free,
            Side::Down => self.free_down = free,
        }
    }

    /// Mark all four sides free. Used for the root block, which borders the puzzle.
    pub fn set_all_free(&mut self) {
        for side in Side::all() {
            self.set_free(side, true);
        }
    }

    /// Return the resistor on the given side.
    pub fn resistor(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left_r,
            Side::Right => self.right_r,
            Side::Up => self.up_r,
            Side::Down => self.down_r,
        }
    }

    /// Set or remove the resistor on the given side.
    pub fn set_resistor(&mut self, side: Side, resistance: Option<f64>) {
        match side {
            Side::Left => self.left_r = resistance,
            Side::Right => self.right_r = resistance,
            Side::Up => self.up_r = resistance,
            Side::Down => self.down_r = resistance,
        }
    }

    /// Remove the four resistors.
    pub fn clear_resistors(&mut self) {
        for side in Side::all() {
            self.set_resistor(side, None);
        }
    }

    /// Number of blocks in the tree, including this one.
    pub fn num_blocks(&self) -> usize {
        1 + self.children.iter().map(Block::num_blocks).sum::<usize>()
    }

    /// Number of resistors placed in the tree.
    pub fn num_resistors(&self) -> usize {
        let own: usize = Side::all().filter(|s| self.resistor(*s).is_some()).count();
        own + self
            .children
            .iter()
            .map(Block::num_resistors)
            .sum::<usize>()
    }

    /// Depth of the tree. A leaf has a depth of 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Block::depth).max().unwrap_or(0)
    }

    /// Print the tree.
    pub fn debug(&self) {
        self.debug_level(0);
    }

    fn debug_level(&self, level: usize) {
        let mut s: String = format!("{:indent$}{:?}", "", self.orientation, indent = level * 2);
        if self.is_leaf() {
            for side in Side::all() {
                let free: &str = if self.is_free(side) { "free" } else { "closed" };
                match self.resistor(side) {
                    Some(r) => s.push_str(&format!(" {side:?}={r}({free})")),
                    None => s.push_str(&format!(" {side:?}=-({free})")),
                }
            }
        } else {
            s.push_str(&format!(" {} children", self.children.len()));
        }
        debug!("{s}");
        for child in &self.children {
            child.debug_level(level + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_alternates() {
        assert_eq!(Orientation::Vertical.other(), Orientation::Horizontal);
        assert_eq!(Orientation::Horizontal.other(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.split_sides(), (Side::Left, Side::Right));
        assert_eq!(Orientation::Horizontal.cross_sides(), (Side::Left, Side::Right));
    }

    #[test]
    fn sides_in_placement_order() {
        let sides: Vec<Side> = Side::all().collect();
        assert_eq!(sides, vec![Side::Left, Side::Right, Side::Up, Side::Down]);
    }

    #[test]
    fn side_accessors() {
        let mut b: Block = Block::new(Orientation::Vertical, 1.0);
        b.set_free(Side::Down, true);
        b.set_resistor(Side::Down, Some(1.0));
        assert!(b.free_down);
        assert_eq!(b.down_r, Some(1.0));
        assert_eq!(b.num_resistors(), 1);
        b.clear_resistors();
        assert_eq!(b.num_resistors(), 0);
        b.set_all_free();
        assert!(Side::all().all(|s| b.is_free(s)));
    }

    #[test]
    fn serialized_field_names() {
        let mut b: Block = Block::new(Orientation::Horizontal, 0.5);
        b.left_r = Some(1.0);
        b.free_left = true;
        let json: serde_json::Value = serde_json::to_value(&b).unwrap();
        assert_eq!(json["orient"], "H");
        assert_eq!(json["freeLeft"], true);
        assert_eq!(json["leftR"], 1.0);
        assert!(json["rightR"].is_null());
        assert_eq!(json["startV"], 0.0);
        assert!(json["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn orientation_uses_uppercase_letters() {
        assert_eq!(serde_json::to_string(&Orientation::Vertical).unwrap(), "\"V\"");
        assert_eq!(serde_json::to_string(&Orientation::Horizontal).unwrap(), "\"H\"");
        let o: Orientation = serde_json::from_str("\"V\"").unwrap();
        assert_eq!(o, Orientation::Vertical);
        assert!(serde_json::from_str::<Orientation>("\"v\"").is_err());
    }
}
