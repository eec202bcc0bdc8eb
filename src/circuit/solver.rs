/*
solver.rs

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

//! Compute the effective resistance of a circuit graph by nodal analysis.
//!
//! A source of [`CircuitGraph::source_voltage`] volts is connected between the input and the
//! ground nodes. Kirchhoff's current law at every other node gives a linear system
//! `G v = b`, where `G` is the conductance matrix restricted to the unknown node voltages and `b`
//! collects the currents injected by the input node.
//! The source current is then the sum of the currents leaving the input node, and the
//! effective resistance is the source voltage divided by that current.
//!
//! Only the nodes connected to the input node take part in the system. Floating parts of the
//! network carry no current and would make `G` singular.
//! Because every remaining node is connected to the ground through resistors, `G` is symmetric
//! positive definite.
//! Small systems are solved with a dense Cholesky factorization, larger ones with the
//! conjugate gradient method on the sparse adjacency lists.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use super::graph::{CircuitGraph, NodeId};
use crate::config::SATURATION_CURRENT;

/// Above this number of unknown voltages, the conjugate gradient method is used.
pub const DENSE_LIMIT: usize = 400;

/// Relative residual at which the conjugate gradient iterations stop.
const CG_TOLERANCE: f64 = 1e-12;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SolveError {
    /// There is no conductive path between the input and the ground nodes.
    DegenerateNetwork,

    /// A resistor with a zero, negative, or non-finite resistance.
    InvalidResistance(f64),

    /// The source voltage is zero, negative, or not finite.
    InvalidSource(f64),

    /// The dense factorization failed.
    Singular,

    /// The conjugate gradient iterations did not reach the tolerance.
    NotConverged { iterations: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::DegenerateNetwork => {
                write!(f, "no conductive path between the input and the ground")
            }
            SolveError::InvalidResistance(r) => write!(f, "invalid resistance: {r}"),
            SolveError::InvalidSource(v) => write!(f, "invalid source voltage: {v}"),
            SolveError::Singular => write!(f, "the conductance matrix is singular"),
            SolveError::NotConverged { iterations } => {
                write!(f, "no convergence after {iterations} iterations")
            }
        }
    }
}

impl Error for SolveError {}

/// Result of the analysis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Answer {
    /// Effective resistance, in ohms.
    Resistance(f64),

    /// The source current exceeds [`SATURATION_CURRENT`]. The network is treated as a short
    /// circuit.
    NearShort { current: f64 },
}

impl Answer {
    /// Value stored as the puzzle answer. A near short circuit counts as 0 ohms.
    pub fn value(&self) -> f64 {
        match self {
            Answer::Resistance(r) => *r,
            Answer::NearShort { .. } => 0.0,
        }
    }
}

/// Linear solver selection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Method {
    /// Dense Cholesky up to [`DENSE_LIMIT`] unknowns, conjugate gradient above.
    Auto,
    Dense,
    ConjugateGradient,
}

/// Compute the effective resistance between the input and the ground nodes.
pub fn solve(graph: &CircuitGraph) -> Result<Answer, SolveError> {
    solve_with(graph, Method::Auto)
}

/// Compute the effective resistance with the given linear solver.
pub fn solve_with(graph: &CircuitGraph, method: Method) -> Result<Answer, SolveError> {
    let voltage: f64 = graph.source_voltage;
    if !(voltage.is_finite() && voltage > 0.0) {
        return Err(SolveError::InvalidSource(voltage));
    }
    if let Some(e) = graph
        .edges()
        .iter()
        .find(|e| !(e.resistance.is_finite() && e.resistance > 0.0))
    {
        return Err(SolveError::InvalidResistance(e.resistance));
    }

    let adjacent: Vec<Vec<(NodeId, f64)>> = graph.adjacency();
    let reached: Vec<bool> = reachable(&adjacent, graph.input);
    if !reached[graph.ground] {
        debug!("Ground node {} not reachable from the input", graph.ground);
        return Err(SolveError::DegenerateNetwork);
    }

    let system: NodalSystem = NodalSystem::build(graph, &adjacent, &reached);
    let x: DVector<f64> = match method {
        Method::Dense => system.solve_dense()?,
        Method::ConjugateGradient => system.solve_cg()?,
        Method::Auto if system.len() <= DENSE_LIMIT => system.solve_dense()?,
        Method::Auto => system.solve_cg()?,
    };

    // Current leaving the input node
    let current: f64 = adjacent[graph.input]
        .iter()
        .map(|(v, r)| (voltage - system.voltage(*v, &x)) / r)
        .sum();
    debug!(
        "{} unknown voltages, source current {current}A",
        system.len()
    );

    if !(current.is_finite() && current > 0.0) {
        return Err(SolveError::DegenerateNetwork);
    }
    if current > SATURATION_CURRENT {
        warn!("Source current {current}A above {SATURATION_CURRENT}A: answer set to 0");
        return Ok(Answer::NearShort { current });
    }
    Ok(Answer::Resistance(voltage / current))
}

/// Mark the nodes connected to the given node.
fn reachable(adjacent: &[Vec<(NodeId, f64)>], start: NodeId) -> Vec<bool> {
    let mut reached: Vec<bool> = vec![false; adjacent.len()];
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    reached[start] = true;
    queue.push_back(start);
    while let Some(u) = queue.pop_front() {
        for (v, _) in &adjacent[u] {
            if !reached[*v] {
                reached[*v] = true;
                queue.push_back(*v);
            }
        }
    }
    reached
}

/// Conductance system over the unknown node voltages.
struct NodalSystem {
    /// Row of each node in the system, for the nodes with an unknown voltage.
    row: Vec<Option<usize>>,

    /// Sum of the conductances at each unknown node.
    diagonal: Vec<f64>,

    /// Conductances towards the other unknown nodes. The matrix entries are the opposite values.
    coupling: Vec<Vec<(usize, f64)>>,

    /// Currents injected by the input node.
    rhs: DVector<f64>,

    input: NodeId,
    ground: NodeId,
    source_voltage: f64,
}

impl NodalSystem {
    fn build(graph: &CircuitGraph, adjacent: &[Vec<(NodeId, f64)>], reached: &[bool]) -> Self {
        let mut row: Vec<Option<usize>> = vec![None; adjacent.len()];
        let mut nodes: Vec<NodeId> = Vec::new();
        for (node, r) in row.iter_mut().enumerate() {
            if reached[node] && node != graph.input && node != graph.ground {
                *r = Some(nodes.len());
                nodes.push(node);
            }
        }

        let n: usize = nodes.len();
        let mut diagonal: Vec<f64> = vec![0.0; n];
        let mut coupling: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut rhs: DVector<f64> = DVector::zeros(n);
        for (k, u) in nodes.iter().enumerate() {
            for (v, r) in &adjacent[*u] {
                let c: f64 = 1.0 / r;
                diagonal[k] += c;
                if *v == graph.input {
                    rhs[k] += c * graph.source_voltage;
                } else if let Some(j) = row[*v] {
                    coupling[k].push((j, c));
                }
            }
        }

        Self {
            row,
            diagonal,
            coupling,
            rhs,
            input: graph.input,
            ground: graph.ground,
            source_voltage: graph.source_voltage,
        }
    }

    fn len(&self) -> usize {
        self.diagonal.len()
    }

    /// Voltage of any node, given the solution of the system.
    fn voltage(&self, node: NodeId, x: &DVector<f64>) -> f64 {
        if node == self.input {
            self.source_voltage
        } else if node == self.ground {
            0.0
        } else {
            self.row[node].map(|k| x[k]).unwrap_or(0.0)
        }
    }

    fn to_dense(&self) -> DMatrix<f64> {
        let n: usize = self.len();
        let mut m: DMatrix<f64> = DMatrix::zeros(n, n);
        for k in 0..n {
            m[(k, k)] = self.diagonal[k];
            for (j, c) in &self.coupling[k] {
                m[(k, *j)] -= c;
            }
        }
        m
    }

    /// Matrix-vector product without building the matrix.
    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.len(),
            (0..self.len()).map(|k| {
                self.diagonal[k] * x[k]
                    - self.coupling[k]
                        .iter()
                        .map(|(j, c)| c * x[*j])
                        .sum::<f64>()
            }),
        )
    }

    fn solve_dense(&self) -> Result<DVector<f64>, SolveError> {
        let m: DMatrix<f64> = self.to_dense();
        match m.clone().cholesky() {
            Some(cholesky) => Ok(cholesky.solve(&self.rhs)),
            None => {
                debug!("Cholesky factorization failed, trying LU");
                m.lu().solve(&self.rhs).ok_or(SolveError::Singular)
            }
        }
    }

    fn solve_cg(&self) -> Result<DVector<f64>, SolveError> {
        let n: usize = self.len();
        let mut x: DVector<f64> = DVector::zeros(n);
        let b_norm: f64 = self.rhs.norm();
        if b_norm == 0.0 {
            return Ok(x);
        }

        let mut r: DVector<f64> = self.rhs.clone();
        let mut p: DVector<f64> = r.clone();
        let mut rs: f64 = r.dot(&r);
        let max_iterations: usize = 10 * n.max(1);
        for i in 0..max_iterations {
            let ap: DVector<f64> = self.apply(&p);
            let alpha: f64 = rs / p.dot(&ap);
            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);
            let rs_new: f64 = r.dot(&r);
            if rs_new.sqrt() <= CG_TOLERANCE * b_norm {
                debug!("Conjugate gradient converged in {} iterations", i + 1);
                return Ok(x);
            }
            p *= rs_new / rs;
            p += &r;
            rs = rs_new;
        }
        Err(SolveError::NotConverged {
            iterations: max_iterations,
        })
    }
}
