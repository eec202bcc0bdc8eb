/*
lib.rs

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

//! Resistor network puzzles.
//!
//! A puzzle is a rectangle recursively split into blocks, with unit resistors along some of the
//! block sides. The player must find the effective resistance between the bottom-left and the
//! top-right corners of the rectangle.
//!
//! * [`generator`] builds random block trees.
//! * [`circuit`] converts a block tree into an electrical graph and solves it.
//! * [`puzzle`] ties both together and stores the puzzles with [`saver`].

pub mod circuit;
pub mod config;
pub mod generator;
pub mod puzzle;
pub mod saver;
