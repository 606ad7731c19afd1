//! FIRST/FOLLOW fixpoint engine.
//!
//! Each set is computed by an outer fixpoint loop around a memoised,
//! path-guarded recursion: a non-terminal already on the current
//! recursion path is skipped to break cycles, and a per-round `visited` set
//! makes each round linear. FIRST and FOLLOW keep fully independent
//! visited/path state, so a cycle broken while computing one can never
//! suppress progress on the other.

use std::collections::HashSet;

use log::debug;

use crate::grammar::Grammar;
use crate::symbol::SymbolId;

/// Runs the FIRST-set fixpoint to completion.
pub fn compute_first_sets(grammar: &mut Grammar) {
    let order = sorted_non_terminals(grammar);
    let mut sizes = first_sizes(grammar, &order);

    let mut round = 0;
    loop {
        round += 1;
        let mut visited = HashSet::new();
        for &nt in &order {
            let mut path = Vec::new();
            compute_first_for(grammar, nt, &mut visited, &mut path);
        }
        let next = first_sizes(grammar, &order);
        if next == sizes {
            debug!("FIRST sets converged after {round} round(s)");
            break;
        }
        sizes = next;
    }
}

/// Runs the FOLLOW-set fixpoint to completion. Must run after
/// [`compute_first_sets`]: `substring_first` requires FIRST sets to already
/// be populated.
pub fn compute_follow_sets(grammar: &mut Grammar) {
    let root = grammar
        .root()
        .expect("root must be resolved before computing FOLLOW sets");
    let end = grammar.ensure_end();
    grammar.follow_set_mut(root).insert(end);

    let order = sorted_non_terminals(grammar);
    let mut sizes = follow_sizes(grammar, &order);

    let mut round = 0;
    loop {
        round += 1;
        let mut visited = HashSet::new();
        for &nt in &order {
            let mut path = Vec::new();
            compute_follow_for(grammar, nt, &mut visited, &mut path);
        }
        let next = follow_sizes(grammar, &order);
        if next == sizes {
            debug!("FOLLOW sets converged after {round} round(s)");
            break;
        }
        sizes = next;
    }
}

fn sorted_non_terminals(grammar: &Grammar) -> Vec<SymbolId> {
    let mut v: Vec<SymbolId> = grammar.non_terminals().iter().copied().collect();
    v.sort_by(|a, b| grammar.name_of(*a).cmp(grammar.name_of(*b)));
    v
}

fn first_sizes(grammar: &Grammar, order: &[SymbolId]) -> Vec<usize> {
    order.iter().map(|id| grammar.first_set_of(*id).len()).collect()
}

fn follow_sizes(grammar: &Grammar, order: &[SymbolId]) -> Vec<usize> {
    order.iter().map(|id| grammar.follow_set(*id).len()).collect()
}

fn compute_first_for(
    grammar: &mut Grammar,
    id: SymbolId,
    visited: &mut HashSet<SymbolId>,
    path: &mut Vec<SymbolId>,
) {
    if visited.contains(&id) {
        return;
    }
    visited.insert(id);
    if path.contains(&id) {
        return;
    }
    path.push(id);

    let empty = grammar.ensure_empty();
    for pid in grammar.productions_of_sorted(id) {
        let rhs = grammar.production(pid).rhs().to_vec();
        let mut derives_empty = true;

        for &sym in &rhs {
            if grammar.is_terminal(sym) {
                grammar.first_set_mut(id).insert(sym);
                grammar.production_first_set_mut(pid).insert(sym);
                derives_empty = false;
                break;
            }

            compute_first_for(grammar, sym, visited, path);
            let sym_first = grammar.first_set_of(sym);
            grammar.first_set_mut(id).extend(sym_first.iter().copied());
            grammar
                .production_first_set_mut(pid)
                .extend(sym_first.iter().copied());

            if !sym_first.contains(&empty) {
                derives_empty = false;
                break;
            }
        }

        if derives_empty {
            grammar.first_set_mut(id).insert(empty);
            grammar.production_first_set_mut(pid).insert(empty);
        }
    }

    path.pop();
}

fn compute_follow_for(
    grammar: &mut Grammar,
    id: SymbolId,
    visited: &mut HashSet<SymbolId>,
    path: &mut Vec<SymbolId>,
) {
    if visited.contains(&id) {
        return;
    }
    visited.insert(id);
    if path.contains(&id) {
        return;
    }
    path.push(id);

    let empty = grammar.ensure_empty();
    let occurrences: Vec<crate::production::ProductionId> =
        grammar.nt_data(id).rhs_productions.iter().copied().collect();

    for pid in occurrences {
        let rhs = grammar.production(pid).rhs().to_vec();
        let lhs = grammar.production(pid).lhs();
        let positions = grammar.production(pid).symbol_positions(id);

        for index in positions {
            if index == rhs.len() - 1 {
                compute_follow_for(grammar, lhs, visited, path);
                let lhs_follow: Vec<SymbolId> = grammar.follow_set(lhs).iter().copied().collect();
                grammar.follow_set_mut(id).extend(lhs_follow);
            } else {
                let sigma = grammar.substring_first(&rhs, index + 1);
                let without_empty: Vec<SymbolId> =
                    sigma.iter().copied().filter(|s| *s != empty).collect();
                grammar.follow_set_mut(id).extend(without_empty);

                if sigma.contains(&empty) {
                    compute_follow_for(grammar, lhs, visited, path);
                    let lhs_follow: Vec<SymbolId> = grammar.follow_set(lhs).iter().copied().collect();
                    grammar.follow_set_mut(id).extend(lhs_follow);
                }
            }
        }
    }

    path.pop();
}
