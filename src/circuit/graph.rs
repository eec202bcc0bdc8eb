/*
graph.rs

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

//! Electrical graph of the puzzle.
//!
//! Nodes are points of an integer plane. A node receives its identifier the first time its
//! point is referenced, so identifiers only depend on the order in which the blocks are mapped.

use log::debug;
use std::collections::HashMap;

/// Point of the integer plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Identifier of an electrical node.
pub type NodeId = usize;

/// Resistor between two nodes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResistorEdge {
    pub a: NodeId,
    pub b: NodeId,

    /// Resistance in ohms.
    pub resistance: f64,
}

impl ResistorEdge {
    /// Given one end of the resistor, return the other end.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.a == node { self.b } else { self.a }
    }
}

/// Build a [`CircuitGraph`] while walking the block tree.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Point of each node, indexed by node ID.
    points: Vec<Point>,

    /// Node ID of each referenced point.
    index: HashMap<Point, NodeId>,

    /// Resistors.
    edges: Vec<ResistorEdge>,
}

impl GraphBuilder {
    /// Create a [`GraphBuilder`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node at the given point, creating it if needed.
    pub fn node(&mut self, point: Point) -> NodeId {
        if let Some(id) = self.index.get(&point) {
            return *id;
        }
        let id: NodeId = self.points.len();
        self.points.push(point);
        self.index.insert(point, id);
        id
    }

    /// Add a resistor between the nodes at the two given points.
    pub fn connect(&mut self, from: Point, to: Point, resistance: f64) {
        let a: NodeId = self.node(from);
        let b: NodeId = self.node(to);
        self.edges.push(ResistorEdge { a, b, resistance });
    }

    /// Return the graph, with the given terminals.
    pub fn finish(self, input: NodeId, ground: NodeId, source_voltage: f64) -> CircuitGraph {
        debug!(
            "Circuit graph: {} nodes, {} resistors",
            self.points.len(),
            self.edges.len()
        );
        CircuitGraph {
            points: self.points,
            index: self.index,
            edges: self.edges,
            input,
            ground,
            source_voltage,
        }
    }
}

/// Flat electrical network: nodes, resistors, and the two terminals of the voltage source.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitGraph {
    points: Vec<Point>,

    /// Node ID of each point, kept from the builder.
    index: HashMap<Point, NodeId>,

    edges: Vec<ResistorEdge>,

    /// Node connected to the positive side of the source.
    pub input: NodeId,

    /// Reference node, at 0V.
    pub ground: NodeId,

    /// Voltage of the source, in volts.
    pub source_voltage: f64,
}

impl CircuitGraph {
    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.points.len()
    }

    /// Resistors of the network.
    pub fn edges(&self) -> &[ResistorEdge] {
        &self.edges[..]
    }

    /// Point of the given node.
    pub fn point(&self, node: NodeId) -> Option<Point> {
        self.points.get(node).copied()
    }

    /// Node at the given point, if that point has been referenced.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.index.get(&point).copied()
    }

    /// For each node, the resistors connected to it. Resistors with both ends on the same node
    /// are skipped.
    pub fn adjacency(&self) -> Vec<Vec<(NodeId, f64)>> {
        let mut adjacent: Vec<Vec<(NodeId, f64)>> = vec![Vec::new(); self.points.len()];
        for e in self.edges.iter().filter(|e| e.a != e.b) {
            adjacent[e.a].push((e.b, e.resistance));
            adjacent[e.b].push((e.a, e.resistance));
        }
        adjacent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_created_once_per_point() {
        let mut b: GraphBuilder = GraphBuilder::new();
        let n0: NodeId = b.node(Point::new(0, 0));
        let n1: NodeId = b.node(Point::new(5, 0));
        assert_eq!(b.node(Point::new(0, 0)), n0);
        b.connect(Point::new(5, 0), Point::new(5, 5), 1.0);
        let g: CircuitGraph = b.finish(n0, n1, 1.0);

        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.edges()[0].a, n1);
        assert_eq!(g.edges()[0].other(n1), 2);
        assert_eq!(g.node_at(Point::new(5, 5)), Some(2));
        assert_eq!(g.point(2), Some(Point::new(5, 5)));
        assert_eq!(g.node_at(Point::new(1, 1)), None);
    }

    #[test]
    fn adjacency_skips_self_loops() {
        let mut b: GraphBuilder = GraphBuilder::new();
        b.connect(Point::new(0, 0), Point::new(0, 0), 1.0);
        b.connect(Point::new(0, 0), Point::new(1, 0), 2.0);
        b.connect(Point::new(0, 0), Point::new(1, 0), 3.0);
        let g: CircuitGraph = b.finish(0, 1, 1.0);
        let adj: Vec<Vec<(NodeId, f64)>> = g.adjacency();
        assert_eq!(adj[0], vec![(1, 2.0), (1, 3.0)]);
        assert_eq!(adj[1], vec![(0, 2.0), (0, 3.0)]);
    }

    #[test]
    fn every_point_finds_its_node() {
        let mut b: GraphBuilder = GraphBuilder::new();
        for i in 0..50 {
            b.connect(Point::new(i, 0), Point::new(i, i * 3), 1.0);
        }
        let g: CircuitGraph = b.finish(0, 1, 1.0);
        for id in 0..g.num_nodes() {
            let p: Point = g.point(id).unwrap();
            assert_eq!(g.node_at(p), Some(id));
        }
        assert_eq!(g.node_at(Point::new(-1, -1)), None);
    }
}
