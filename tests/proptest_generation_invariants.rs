/*
proptest_generation_invariants.rs

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

use proptest::prelude::*;

use zveno::circuit::graph::CircuitGraph;
use zveno::circuit::mapper::map_to_graph;
use zveno::circuit::solver::{SolveError, solve};
use zveno::config::{MAX_CHILDREN, UNIT_RESISTANCE};
use zveno::generator::block::{Block, Orientation, Side};
use zveno::generator::prng::Prng;

fn check_block(block: &Block, complexity: f64) -> Result<(), TestCaseError> {
    prop_assert_eq!(block.complexity, complexity);
    if block.is_leaf() {
        for side in Side::all() {
            if let Some(r) = block.resistor(side) {
                prop_assert_eq!(r, UNIT_RESISTANCE);
                prop_assert!(block.is_free(side));
            }
        }
        return Ok(());
    }

    let n: usize = block.children.len();
    prop_assert!(n >= 2 && n <= MAX_CHILDREN && n % 2 == 0);
    prop_assert!(Side::all().all(|s| block.resistor(s).is_none()));

    let (leading, trailing) = block.orientation.split_sides();
    let (cross_a, cross_b) = block.orientation.cross_sides();
    prop_assert_eq!(block.children[0].is_free(leading), block.is_free(leading));
    prop_assert_eq!(block.children[n - 1].is_free(trailing), block.is_free(trailing));
    for pair in block.children.windows(2) {
        // Exactly one sibling owns the shared side
        prop_assert!(pair[0].is_free(trailing) != pair[1].is_free(leading));
    }
    for child in &block.children {
        prop_assert_eq!(child.orientation, block.orientation.other());
        prop_assert_eq!(child.is_free(cross_a), block.is_free(cross_a));
        prop_assert_eq!(child.is_free(cross_b), block.is_free(cross_b));
        check_block(child, complexity)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generated_trees_are_well_formed(seed in any::<u64>(), complexity in 0.05f64..3.0) {
        let root: Block = Block::generate(&mut Prng::from_seed(seed), complexity, Orientation::Vertical);
        prop_assert!(Side::all().all(|s| root.is_free(s)));
        check_block(&root, complexity)?;
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>(), complexity in 0.05f64..3.0) {
        let a: Block = Block::generate(&mut Prng::from_seed(seed), complexity, Orientation::Horizontal);
        let b: Block = Block::generate(&mut Prng::from_seed(seed), complexity, Orientation::Horizontal);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn answers_are_positive_or_degenerate(seed in any::<u64>(), complexity in 0.05f64..2.0) {
        let root: Block = Block::generate(&mut Prng::from_seed(seed), complexity, Orientation::Vertical);
        let graph: CircuitGraph = map_to_graph(&root).unwrap();
        match solve(&graph) {
            Ok(answer) => {
                let r: f64 = answer.value();
                prop_assert!(r.is_finite() && r >= 0.0);
            }
            Err(e) => prop_assert_eq!(e, SolveError::DegenerateNetwork),
        }
    }
}
