/*
circuit.rs

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

//! Electrical side of the puzzle.
//!
//! [`mapper::map_to_graph`] converts a block tree into a [`graph::CircuitGraph`] and
//! [`solver::solve`] computes the effective resistance between its two terminals.

pub mod graph;
pub mod mapper;
pub mod solver;
