/*
prng.rs

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

//! Seedable stream of uniform random draws.
//!
//! A [`Prng`] object is created for each puzzle and passed by reference to all the generation
//! steps. Two streams created from the same seed produce the same puzzle.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pseudo-random stream.
#[derive(Debug, Clone)]
pub struct Prng {
    rng: StdRng,
}

impl Prng {
    /// Create a stream that always produces the same draws for the given seed.
    pub fn from_seed(seed: u64) -> Self {
        debug!("Random stream seeded with {seed}");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a stream seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Return a uniform draw in `[0, 1)`.
    pub fn draw(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Return `N` random bytes.
    pub fn random_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes: [u8; N] = [0; N];
        self.rng.fill(&mut bytes[..]);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a: Prng = Prng::from_seed(42);
        let mut b: Prng = Prng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.draw().to_bits(), b.draw().to_bits());
        }
        assert_eq!(a.random_bytes::<8>(), b.random_bytes::<8>());
    }

    #[test]
    fn draws_are_in_unit_interval() {
        let mut p: Prng = Prng::from_seed(7);
        for _ in 0..1000 {
            let d: f64 = p.draw();
            assert!((0.0..1.0).contains(&d));
        }
    }
}
