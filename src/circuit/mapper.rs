/*
mapper.rs

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

//! Map a block tree onto the integer plane and build its electrical graph.
//!
//! The root block covers the square `[0, EXTENT] x [0, EXTENT]`. Each side of a block that
//! carries a resistor connects the two corners of that side. Children split the width
//! ([`Orientation::Vertical`]) or the height ([`Orientation::Horizontal`]) of their parent in
//! equal parts.
//!
//! The input terminal is the bottom-left corner of the root block and the ground terminal is
//! its top-right corner.

use log::{Level, debug, log_enabled};
use std::error::Error;
use std::fmt;

use super::graph::{CircuitGraph, GraphBuilder, NodeId, Point};
use crate::generator::block::{Block, Orientation, Side};

/// Size of the root block. Divisible by two and four for many more levels than a generated
/// tree can have.
pub const EXTENT: i64 = 1 << 60;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum MapError {
    /// The block at the given depth cannot be split evenly on the integer plane.
    ResolutionExhausted { depth: usize },

    /// The rectangle does not have a positive width and height.
    InvalidExtent { width: i64, height: i64 },

    /// A corner of the rectangle falls outside of the 64-bit plane.
    OutOfPlane,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::ResolutionExhausted { depth } => {
                write!(f, "block at depth {depth} is too small to be split")
            }
            MapError::InvalidExtent { width, height } => {
                write!(f, "invalid rectangle size {width}x{height}")
            }
            MapError::OutOfPlane => write!(f, "rectangle does not fit in the plane"),
        }
    }
}

impl Error for MapError {}

/// Rectangle covered by a block.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Rect {
    origin: Point,
    width: i64,
    height: i64,
}

impl Rect {
    /// Return the corner opposite to the origin.
    fn far_corner(&self) -> Result<Point, MapError> {
        match (
            self.origin.x.checked_add(self.width),
            self.origin.y.checked_add(self.height),
        ) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(MapError::OutOfPlane),
        }
    }

    /// Return the two corners of the given side.
    fn side(&self, side: Side) -> Result<(Point, Point), MapError> {
        let Point { x, y } = self.origin;
        let Point { x: xw, y: yh } = self.far_corner()?;
        Ok(match side {
            Side::Up => (Point::new(x, y), Point::new(xw, y)),
            Side::Down => (Point::new(x, yh), Point::new(xw, yh)),
            Side::Left => (Point::new(x, y), Point::new(x, yh)),
            Side::Right => (Point::new(xw, y), Point::new(xw, yh)),
        })
    }
}

/// Build the electrical graph of the tree, with the root block covering the default square.
pub fn map_to_graph(root: &Block) -> Result<CircuitGraph, MapError> {
    map_to_graph_at(root, Point::new(0, 0), EXTENT, EXTENT)
}

/// Build the electrical graph of the tree, with the root block covering the given rectangle.
///
/// # Errors
///
/// The function returns [`MapError::InvalidExtent`] if the width or the height is not
/// positive, and [`MapError::OutOfPlane`] if the rectangle overflows the 64-bit plane.
pub fn map_to_graph_at(
    root: &Block,
    origin: Point,
    width: i64,
    height: i64,
) -> Result<CircuitGraph, MapError> {
    if width <= 0 || height <= 0 {
        return Err(MapError::InvalidExtent { width, height });
    }
    let rect: Rect = Rect {
        origin,
        width,
        height,
    };
    let far: Point = rect.far_corner()?;
    let mut builder: GraphBuilder = GraphBuilder::new();

    // The terminals are registered first so that they always get the first two IDs
    let input: NodeId = builder.node(Point::new(origin.x, far.y));
    let ground: NodeId = builder.node(Point::new(far.x, origin.y));

    map_block(root, rect, 1, &mut builder)?;
    let graph: CircuitGraph = builder.finish(input, ground, root.start_v);

    if log_enabled!(Level::Debug) {
        for e in graph.edges() {
            debug!("    {} --{}-- {}", e.a, e.resistance, e.b);
        }
    }
    Ok(graph)
}

/// Recursively add the resistors of the block and of its children.
fn map_block(
    block: &Block,
    rect: Rect,
    depth: usize,
    builder: &mut GraphBuilder,
) -> Result<(), MapError> {
    // The order of the sides fixes the node IDs
    for side in [Side::Up, Side::Down, Side::Left, Side::Right] {
        if let Some(r) = block.resistor(side) {
            let (from, to) = rect.side(side)?;
            builder.connect(from, to, r);
        }
    }

    if block.is_leaf() {
        return Ok(());
    }

    let n: i64 = block.children.len() as i64;
    let span: i64 = match block.orientation {
        Orientation::Vertical => rect.width,
        Orientation::Horizontal => rect.height,
    };
    if span % n != 0 || span / n == 0 {
        return Err(MapError::ResolutionExhausted { depth });
    }
    let step: i64 = span / n;

    for (i, child) in block.children.iter().enumerate() {
        // Children stay inside the parent, which is already known to fit in the plane
        let offset: i64 = step * i as i64;
        let child_rect: Rect = match block.orientation {
            Orientation::Vertical => Rect {
                origin: Point::new(rect.origin.x + offset, rect.origin.y),
                width: step,
                height: rect.height,
            },
            Orientation::Horizontal => Rect {
                origin: Point::new(rect.origin.x, rect.origin.y + offset),
                width: rect.width,
                height: step,
            },
        };
        map_block(child, child_rect, depth + 1, builder)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::prng::Prng;

    fn full_leaf() -> Block {
        let mut b: Block = Block::new(Orientation::Vertical, 1.0);
        b.set_all_free();
        for side in Side::all() {
            b.set_resistor(side, Some(1.0));
        }
        b.start_v = 1.0;
        b
    }

    #[test]
    fn single_leaf_uses_the_four_corners() {
        let g: CircuitGraph = map_to_graph_at(&full_leaf(), Point::new(0, 0), 8, 8).unwrap();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.edges().len(), 4);
        assert_eq!(g.point(g.input), Some(Point::new(0, 8)));
        assert_eq!(g.point(g.ground), Some(Point::new(8, 0)));
        assert_eq!(g.input, 0);
        assert_eq!(g.ground, 1);
        assert_eq!(g.source_voltage, 1.0);
    }

    #[test]
    fn children_split_the_parent_evenly() {
        let mut root: Block = Block::new(Orientation::Vertical, 1.0);
        for _ in 0..4 {
            let mut child: Block = Block::new(Orientation::Horizontal, 1.0);
            child.up_r = Some(1.0);
            root.children.push(child);
        }
        let g: CircuitGraph = map_to_graph_at(&root, Point::new(0, 0), 8, 8).unwrap();
        for x in [0, 2, 4, 6, 8] {
            assert!(g.node_at(Point::new(x, 0)).is_some());
        }
        assert_eq!(g.edges().len(), 4);
    }

    #[test]
    fn uneven_split_is_reported() {
        let mut root: Block = Block::new(Orientation::Horizontal, 1.0);
        root.children.push(Block::new(Orientation::Vertical, 1.0));
        root.children.push(Block::new(Orientation::Vertical, 1.0));
        assert_eq!(
            map_to_graph_at(&root, Point::new(0, 0), 3, 3),
            Err(MapError::ResolutionExhausted { depth: 1 })
        );
    }

    #[test]
    fn rectangle_past_the_plane_edge_is_an_error() {
        let leaf: Block = full_leaf();
        assert_eq!(
            map_to_graph_at(&leaf, Point::new(i64::MAX - 5, 0), 10, 10),
            Err(MapError::OutOfPlane)
        );
        assert_eq!(
            map_to_graph_at(&leaf, Point::new(0, i64::MAX - 5), 10, 10),
            Err(MapError::OutOfPlane)
        );
        // Touching the edge is fine
        let g: CircuitGraph = map_to_graph_at(&leaf, Point::new(i64::MAX - 10, 0), 10, 10).unwrap();
        assert_eq!(g.point(g.ground), Some(Point::new(i64::MAX, 0)));
    }

    #[test]
    fn empty_or_negative_rectangle_is_an_error() {
        let leaf: Block = full_leaf();
        assert_eq!(
            map_to_graph_at(&leaf, Point::new(0, 0), 0, 8),
            Err(MapError::InvalidExtent {
                width: 0,
                height: 8
            })
        );
        assert_eq!(
            map_to_graph_at(&leaf, Point::new(0, 0), 8, -8),
            Err(MapError::InvalidExtent {
                width: 8,
                height: -8
            })
        );
    }

    #[test]
    fn generated_trees_fit_in_the_plane() {
        for seed in 0..100 {
            let root: Block = Block::generate(&mut Prng::from_seed(seed), 2.0, Orientation::Vertical);
            let g: CircuitGraph = map_to_graph(&root).unwrap();
            assert_eq!(g.edges().len(), root.num_resistors());
            for e in g.edges() {
                let (pa, pb) = (g.point(e.a).unwrap(), g.point(e.b).unwrap());
                // Resistors are axis-aligned and inside the root square
                assert!(pa.x == pb.x || pa.y == pb.y);
                for p in [pa, pb] {
                    assert!((0..=EXTENT).contains(&p.x) && (0..=EXTENT).contains(&p.y));
                }
            }
        }
    }
}
