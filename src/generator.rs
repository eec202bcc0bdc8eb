/*
generator.rs

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

//! Generate random puzzle topologies.
//!
//! A topology is a tree of [`block::Block`] objects. Building one takes three steps, all driven
//! by the same [`prng::Prng`] stream:
//!
//! * [`block::Block::populate`] grows the tree. Each block randomly gets zero, two, or four
//!   children, with the orientation opposite to its own.
//! * The root block gets its four sides free, because it borders the puzzle.
//! * [`block::Block::place_resistors`] propagates the free sides down to the leaves and
//!   randomly places a resistor on the free sides of each leaf.
//!
//! [`block::Block::generate`] runs the three steps.

pub mod block;
pub mod boundary;
pub mod prng;
pub mod topology;
