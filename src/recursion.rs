//! Left-recursion detection and direct-left-recursion elimination.
//!
//! Direct left recursion (`A -> A γ | δ`) is rewritten away by introducing a
//! fresh non-terminal; indirect left recursion (`A ⇒* A γ` through
//! intermediate non-terminals) is detected but never eliminated — rewriting
//! it away is out of scope, so it is rejected by the validator instead.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use crate::grammar::Grammar;
use crate::symbol::SymbolId;

/// Eliminates direct left recursion for every non-terminal present when the
/// rewriter starts. Runs over a snapshot: non-terminals synthesised during
/// the rewrite (the `A'` symbols) are never themselves re-examined in this
/// pass.
pub fn eliminate_direct_left_recursion(grammar: &mut Grammar) {
    let mut snapshot: Vec<SymbolId> = grammar.non_terminals().iter().copied().collect();
    snapshot.sort_by(|a, b| grammar.name_of(*a).cmp(grammar.name_of(*b)));

    for nt in snapshot {
        eliminate_for(grammar, nt);
    }
}

fn eliminate_for(grammar: &mut Grammar, nt: SymbolId) {
    let prods = grammar.productions_of_sorted(nt);

    let mut alpha_rhs = Vec::new();
    let mut beta_rhs = Vec::new();
    for &pid in &prods {
        let rhs = grammar.production(pid).rhs().to_vec();
        if rhs[0] == nt {
            alpha_rhs.push(rhs);
        } else {
            beta_rhs.push(rhs);
        }
    }

    if alpha_rhs.is_empty() {
        return;
    }

    debug!(
        "eliminating direct left recursion on {}: {} alpha, {} beta",
        grammar.name_of(nt),
        alpha_rhs.len(),
        beta_rhs.len()
    );

    for pid in prods {
        grammar.retire_production(pid);
    }

    let new_nt = synthesize_fresh_non_terminal(grammar, nt);
    let empty = grammar.ensure_empty();

    for rhs in beta_rhs {
        let new_rhs = if rhs.len() == 1 && rhs[0] == empty {
            vec![new_nt]
        } else {
            let mut r = rhs;
            r.push(new_nt);
            r
        };
        grammar
            .create_production(nt, new_rhs)
            .expect("freshly rewritten beta production cannot already exist");
    }

    for rhs in alpha_rhs {
        let mut r = rhs[1..].to_vec();
        r.push(new_nt);
        grammar
            .create_production(new_nt, r)
            .expect("freshly rewritten alpha production cannot already exist");
    }

    grammar
        .create_production(new_nt, vec![empty])
        .expect("A' -> T_ cannot already exist for a freshly synthesised A'");
}

/// Synthesises `A-1`, `A-2`, ... until a name not already owned by the
/// grammar is found, so a synthesised name never collides with a
/// user-declared one.
fn synthesize_fresh_non_terminal(grammar: &mut Grammar, base: SymbolId) -> SymbolId {
    loop {
        let candidate = grammar.new_non_terminal_name(base);
        if let Some(id) = grammar.declare_non_terminal(&candidate) {
            return id;
        }
    }
}

/// Whether any of `id`'s current productions begins with `id` itself. Used
/// post-rewrite as the residual check (validator check 1); should always be
/// `false` once [`eliminate_direct_left_recursion`] has run.
pub fn has_direct_left_recursion(grammar: &Grammar, id: SymbolId) -> bool {
    grammar
        .productions_of(id)
        .any(|pid| grammar.production(pid).rhs()[0] == id)
}

/// Whether `id` is reachable from itself by following only left-most
/// non-terminal RHS symbols (validator check 2).
pub fn has_indirect_left_recursion(grammar: &mut Grammar, id: SymbolId) -> bool {
    let mut in_progress = HashSet::new();
    build_first_rhs_set(grammar, id, &mut in_progress).contains(&id)
}

/// Memoised recursive build of `first_rhs_set(id)`: the set of
/// non-terminals reachable as the left-most RHS symbol of some derivation
/// from `id`. `in_progress` breaks cycles without caching a partial result
/// for the symbol currently being unwound — the enclosing call still
/// inserts its direct left-most child before recursing, so a cycle is
/// always visible from at least one participant even though not
/// necessarily from every one of them.
fn build_first_rhs_set(
    grammar: &mut Grammar,
    id: SymbolId,
    in_progress: &mut HashSet<SymbolId>,
) -> BTreeSet<SymbolId> {
    if let Some(cached) = grammar.nt_data(id).first_rhs_set.clone() {
        return cached;
    }
    if in_progress.contains(&id) {
        return BTreeSet::new();
    }

    in_progress.insert(id);
    let mut result = BTreeSet::new();
    for pid in grammar.productions_of_sorted(id) {
        let first = grammar.production(pid).rhs()[0];
        if grammar.is_non_terminal(first) {
            result.insert(first);
            let nested = build_first_rhs_set(grammar, first, in_progress);
            result.extend(nested);
        }
    }
    in_progress.remove(&id);

    grammar.nt_data_mut(id).first_rhs_set = Some(result.clone());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_str;

    #[test]
    fn direct_rewrite_introduces_a_fresh_non_terminal() {
        let mut g = load_str("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n").unwrap();
        eliminate_direct_left_recursion(&mut g);

        let e = g.symbol_id("E").unwrap();
        assert!(!has_direct_left_recursion(&g, e));
        let e1 = g.symbol_id("E-1").expect("E-1 should have been synthesised");
        let e1_prods: Vec<String> = g.productions_of_sorted(e1).iter().map(|p| g.format_production(*p)).collect();
        assert!(e1_prods.iter().any(|p| p.contains("T_PLUS")));
        assert!(e1_prods.iter().any(|p| p.contains("T_")));
    }

    #[test]
    fn epsilon_beta_collapses_to_just_the_new_non_terminal() {
        let mut g = load_str("S:\n    S T_A\n    T_\n").unwrap();
        eliminate_direct_left_recursion(&mut g);

        let s = g.symbol_id("S").unwrap();
        let reprs: Vec<String> = g
            .productions_of_sorted(s)
            .iter()
            .map(|p| g.format_production(*p))
            .collect();
        assert_eq!(reprs.len(), 1);
        assert!(reprs[0].contains("S-1"));
        assert!(!reprs[0].contains("T_ "));
    }

    #[test]
    fn indirect_recursion_is_detected() {
        // S and A reference each other, so neither can stand as root on its
        // own (see `Grammar::find_root_candidates`); R gives the grammar a
        // loadable root while leaving the S/A cycle intact underneath it.
        let mut g = load_str("R:\n    S\nS:\n    A T_X\nA:\n    S T_Y\n").unwrap();
        let s = g.symbol_id("S").unwrap();
        let a = g.symbol_id("A").unwrap();
        assert!(has_indirect_left_recursion(&mut g, s) || has_indirect_left_recursion(&mut g, a));
    }

    #[test]
    fn idempotent_second_pass_adds_nothing() {
        let mut g = load_str("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n").unwrap();
        eliminate_direct_left_recursion(&mut g);
        let before: usize = g.live_productions().count();
        let before_nts: usize = g.non_terminals().len();
        eliminate_direct_left_recursion(&mut g);
        assert_eq!(g.live_productions().count(), before);
        assert_eq!(g.non_terminals().len(), before_nts);
    }
}
