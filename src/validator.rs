//! LL(1) well-formedness validator.
//!
//! Runs seven well-formedness checks plus an internal-consistency check
//! on cached production FIRST sets, fail-fast in the order the checks are
//! numbered. Every failure names the offending symbol(s)/production(s).

use std::collections::HashSet;

use crate::error::{GrammarError, LL1Error, RecursionError, Result};
use crate::grammar::Grammar;
use crate::recursion::{has_direct_left_recursion, has_indirect_left_recursion};
use crate::symbol::SymbolId;

/// Runs all seven LL(1) checks plus the FIRST-set consistency check.
pub fn validate(grammar: &mut Grammar) -> Result<()> {
    check_no_direct_left_recursion(grammar)?;
    check_no_indirect_left_recursion(grammar)?;
    check_first_sets_disjoint(grammar)?;
    check_first_follow_conflict(grammar)?;
    check_empty_only_sole_symbol(grammar)?;
    check_repeated_symbol_in_production(grammar)?;
    check_empty_not_in_follow(grammar)?;
    check_first_set_consistency(grammar)?;
    Ok(())
}

/// Check 1: no residual direct left recursion after the rewrite pass.
fn check_no_direct_left_recursion(grammar: &Grammar) -> Result<()> {
    for nt in grammar.non_terminals().iter().copied() {
        if has_direct_left_recursion(grammar, nt) {
            return Err(GrammarError::Recursion(RecursionError::Direct(
                grammar.name_of(nt).to_string(),
            )));
        }
    }
    Ok(())
}

/// Check 2: no indirect left recursion (`A` unreachable from itself via
/// left-most non-terminal RHS symbols).
fn check_no_indirect_left_recursion(grammar: &mut Grammar) -> Result<()> {
    let nts: Vec<SymbolId> = grammar.non_terminals().iter().copied().collect();
    for nt in nts {
        if has_indirect_left_recursion(grammar, nt) {
            return Err(GrammarError::Recursion(RecursionError::Indirect(
                grammar.name_of(nt).to_string(),
            )));
        }
    }
    Ok(())
}

/// Check 3: for every non-terminal, its productions' FIRST sets are
/// pairwise disjoint.
fn check_first_sets_disjoint(grammar: &Grammar) -> Result<()> {
    for nt in grammar.sorted_non_terminals() {
        let prods = grammar.productions_of_sorted(nt);
        for i in 1..prods.len() {
            for j in 0..i {
                let first_i = grammar.production(prods[i]).first_set();
                let first_j = grammar.production(prods[j]).first_set();
                if first_i.intersection(first_j).next().is_some() {
                    return Err(GrammarError::LL1(LL1Error::FirstSetsOverlap {
                        nonterminal: grammar.name_of(nt).to_string(),
                        prod1: grammar.format_production(prods[j]),
                        prod2: grammar.format_production(prods[i]),
                    }));
                }
            }
        }
    }
    Ok(())
}

/// Check 4: if one alternative can derive EMPTY, no other alternative's
/// FIRST set may intersect the non-terminal's FOLLOW set.
fn check_first_follow_conflict(grammar: &Grammar) -> Result<()> {
    let Some(empty) = grammar.empty_id() else {
        return Ok(());
    };
    for nt in grammar.sorted_non_terminals() {
        let prods = grammar.productions_of_sorted(nt);
        let follow = grammar.follow_set(nt);
        for i in 0..prods.len() {
            for j in 0..prods.len() {
                if i == j {
                    continue;
                }
                let pi = grammar.production(prods[i]);
                let pj = grammar.production(prods[j]);
                if pi.first_set().contains(&empty)
                    && pj.first_set().intersection(follow).next().is_some()
                {
                    return Err(GrammarError::LL1(LL1Error::FirstFollowConflict {
                        nonterminal: grammar.name_of(nt).to_string(),
                        prod1: grammar.format_production(prods[i]),
                        prod2: grammar.format_production(prods[j]),
                    }));
                }
            }
        }
    }
    Ok(())
}

/// Check 5: EMPTY only ever appears as a production's sole RHS symbol.
fn check_empty_only_sole_symbol(grammar: &Grammar) -> Result<()> {
    let Some(empty) = grammar.empty_id() else {
        return Ok(());
    };
    for pid in grammar.live_productions() {
        let p = grammar.production(pid);
        if p.rhs().contains(&empty) && p.rhs().len() != 1 {
            return Err(GrammarError::LL1(LL1Error::EmptyNotSole(
                grammar.format_production(pid),
            )));
        }
    }
    Ok(())
}

/// Check 6: a non-terminal occurs at most once in any single production's
/// RHS.
fn check_repeated_symbol_in_production(grammar: &Grammar) -> Result<()> {
    for pid in grammar.live_productions() {
        let p = grammar.production(pid);
        let mut seen: HashSet<SymbolId> = HashSet::new();
        for &sym in p.rhs() {
            if grammar.is_non_terminal(sym) && !seen.insert(sym) {
                return Err(GrammarError::LL1(LL1Error::RepeatedSymbolInProduction {
                    symbol: grammar.name_of(sym).to_string(),
                    production: grammar.format_production(pid),
                }));
            }
        }
    }
    Ok(())
}

/// Check 7: EMPTY never appears in any FOLLOW set.
fn check_empty_not_in_follow(grammar: &Grammar) -> Result<()> {
    let Some(empty) = grammar.empty_id() else {
        return Ok(());
    };
    for nt in grammar.non_terminals().iter().copied() {
        if grammar.follow_set(nt).contains(&empty) {
            return Err(GrammarError::LL1(LL1Error::EmptyInFollow(
                grammar.name_of(nt).to_string(),
            )));
        }
    }
    Ok(())
}

/// Internal-consistency check: a production's cached FIRST set must equal
/// `substring_first(0)` recomputed from the current grammar.
fn check_first_set_consistency(grammar: &Grammar) -> Result<()> {
    for pid in grammar.live_productions() {
        let p = grammar.production(pid);
        let recomputed = grammar.substring_first(p.rhs(), 0);
        if &recomputed != p.first_set() {
            return Err(GrammarError::LL1(LL1Error::FirstSetInconsistent {
                production: grammar.format_production(pid),
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::loader::load_str;
    use crate::recursion::eliminate_direct_left_recursion;

    fn pipeline(text: &str) -> Result<Grammar> {
        let mut g = load_str(text)?;
        eliminate_direct_left_recursion(&mut g);
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g);
        validate(&mut g)?;
        Ok(g)
    }

    #[test]
    fn direct_rewrite_scenario_is_valid() {
        assert!(pipeline("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n").is_ok());
    }

    #[test]
    fn indirect_recursion_is_rejected() {
        let err = pipeline("R:\n    S\nS:\n    A T_X\nA:\n    S T_Y\n").unwrap_err();
        assert!(matches!(err, GrammarError::Recursion(RecursionError::Indirect(_))));
    }

    #[test]
    fn overlapping_first_sets_are_rejected() {
        let err = pipeline("S:\n    A T_C\n    T_A\nA:\n    T_A\n    T_\n").unwrap_err();
        assert!(matches!(err, GrammarError::LL1(_)));
    }
}
