//! Predictive parse table construction.
//!
//! For each live production `A -> rhs`, every terminal in its FIRST set
//! predicts it; if EMPTY is in that FIRST set, every terminal in FOLLOW(A)
//! predicts it too. A collision here means the validator let something
//! through it shouldn't have.

use log::debug;

use crate::error::{GrammarError, Result, TableError};
use crate::grammar::Grammar;

/// Builds `grammar`'s parse table from its live productions' FIRST/FOLLOW
/// sets. Must run after validation has passed.
pub fn build_parse_table(grammar: &mut Grammar) -> Result<()> {
    let empty = grammar.empty_id();
    let pids: Vec<_> = grammar.live_productions().collect();

    for pid in pids {
        let production = grammar.production(pid);
        let lhs = production.lhs();
        let mut lookaheads: Vec<_> = production.first_set().iter().copied().collect();

        if let Some(empty) = empty {
            if production.first_set().contains(&empty) {
                lookaheads.extend(grammar.follow_set(lhs).iter().copied());
            }
        }

        for terminal in lookaheads {
            if Some(terminal) == empty {
                continue;
            }
            insert_cell(grammar, lhs, terminal, pid)?;
        }
    }

    debug!("parse table built with {} cell(s)", grammar.parse_table().len());
    Ok(())
}

fn insert_cell(
    grammar: &mut Grammar,
    lhs: crate::symbol::SymbolId,
    terminal: crate::symbol::SymbolId,
    pid: crate::production::ProductionId,
) -> Result<()> {
    if let Some(&existing) = grammar.parse_table().get(&(lhs, terminal)) {
        if existing != pid {
            return Err(GrammarError::Table(TableError::DuplicateCell {
                nonterminal: grammar.name_of(lhs).to_string(),
                terminal: grammar.name_of(terminal).to_string(),
                existing: grammar.format_production(existing),
                incoming: grammar.format_production(pid),
            }));
        }
        return Ok(());
    }
    grammar.parse_table_mut().insert((lhs, terminal), pid);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::loader::load_str;
    use crate::recursion::eliminate_direct_left_recursion;
    use crate::validator::validate;

    #[test]
    fn builds_a_table_for_the_classic_expression_grammar() {
        let mut g = load_str("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n").unwrap();
        eliminate_direct_left_recursion(&mut g);
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g);
        validate(&mut g).unwrap();
        build_parse_table(&mut g).unwrap();

        let t = g.symbol_id("T").unwrap();
        let t_id = g.symbol_id("T_ID").unwrap();
        assert!(g.parse_table().contains_key(&(t, t_id)));
    }

    #[test]
    fn epsilon_production_is_reachable_via_follow() {
        let mut g = load_str("S:\n    A T_C\nA:\n    T_A\n    T_\n").unwrap();
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g);
        validate(&mut g).unwrap();
        build_parse_table(&mut g).unwrap();

        let a = g.symbol_id("A").unwrap();
        let t_c = g.symbol_id("T_C").unwrap();
        assert!(g.parse_table().contains_key(&(a, t_c)));
    }
}
