//! Property-based tests for binding stack ordering.
//!
//! Applies random bind/dispose sequences to the registry and to a plain
//! model of per-combination stacks, then checks the head and depth agree.

mod helpers;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use helpers::*;
use proptest::prelude::*;
use stash_tui::hotkeys::{Disposer, callback};

const COMBOS: [&str; 3] = ["a", "r 3", "ctrl+s"];

#[derive(Debug, Clone)]
enum Op {
    Bind(usize),
    Dispose(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..COMBOS.len()).prop_map(Op::Bind),
        any::<usize>().prop_map(Op::Dispose),
    ]
}

proptest! {
    #[test]
    fn head_matches_most_recent_live_binding(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let registry = registry();
        let fired = Rc::new(Cell::new(usize::MAX));
        let mut live: Vec<(usize, usize, Disposer)> = Vec::new();
        let mut next_id = 0;

        for op in ops {
            match op {
                Op::Bind(combo) => {
                    let id = next_id;
                    next_id += 1;
                    let fired = Rc::clone(&fired);
                    let disposer = registry.bind(COMBOS[combo], callback(move |_| fired.set(id)));
                    live.push((combo, id, disposer));
                }
                Op::Dispose(pick) => {
                    if !live.is_empty() {
                        let (_, _, disposer) = live.remove(pick % live.len());
                        disposer.dispose();
                    }
                }
            }
        }

        let mut model: HashMap<usize, Vec<usize>> = HashMap::new();
        for (combo, id, _) in &live {
            model.entry(*combo).or_default().push(*id);
        }

        for (index, combo) in COMBOS.iter().enumerate() {
            let stack = model.get(&index).cloned().unwrap_or_default();
            prop_assert_eq!(registry.depth(combo), stack.len());
            prop_assert_eq!(registry.is_bound(combo), !stack.is_empty());

            fired.set(usize::MAX);
            let ran = registry.dispatch(combo);
            prop_assert_eq!(ran, !stack.is_empty());
            if let Some(head) = stack.last() {
                prop_assert_eq!(fired.get(), *head);
            }
        }
    }

    #[test]
    fn disposing_everything_empties_the_table(binds in prop::collection::vec(0..COMBOS.len(), 0..20)) {
        let registry = registry();
        let disposers: Vec<Disposer> = binds
            .iter()
            .map(|combo| registry.bind(COMBOS[*combo], recorder(&log(), "x")))
            .collect();

        for disposer in disposers.into_iter().rev() {
            disposer.dispose();
        }
        prop_assert!(registry.combinations().is_empty());
    }
}
