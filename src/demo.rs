//! Predictive-parse demo driver.
//!
//! Drives the parse table over a stream of terminal names the way a real
//! LL(1) parser would, reporting exactly where and why a string is
//! rejected rather than a bare accept/reject bit.

use crate::error::DemoError;
use crate::grammar::Grammar;
use crate::symbol::SymbolId;

/// Runs the table-driven predictive parse of `tokens` (terminal names,
/// without the trailing end marker) against `grammar`. Returns the
/// sequence of productions applied, in application order, on success.
pub fn run_demo(grammar: &Grammar, tokens: &[String]) -> Result<Vec<String>, DemoError> {
    let end = grammar
        .end_id()
        .expect("end marker must exist once a grammar has been loaded");
    let root = grammar
        .root()
        .expect("root must be resolved before the demo can run");

    let mut input: Vec<SymbolId> = Vec::with_capacity(tokens.len() + 1);
    for token in tokens {
        let id = grammar.symbol_id(token).ok_or_else(|| DemoError::NoTableEntry {
            nonterminal: "<input>".to_string(),
            terminal: token.clone(),
        })?;
        input.push(id);
    }
    input.push(end);

    let mut stack = vec![end, root];
    let mut position = 0usize;
    let mut applied = Vec::new();

    while let Some(&top) = stack.last() {
        let current = *input.get(position).ok_or_else(|| {
            DemoError::InputExhausted(grammar.name_of(top).to_string())
        })?;

        if top == current {
            stack.pop();
            position += 1;
            if top == end {
                break;
            }
            continue;
        }

        if grammar.is_terminal(top) {
            return Err(DemoError::TerminalMismatch {
                expected: grammar.name_of(top).to_string(),
                found: grammar.name_of(current).to_string(),
                position,
            });
        }

        let pid = grammar
            .parse_table()
            .get(&(top, current))
            .copied()
            .ok_or_else(|| DemoError::NoTableEntry {
                nonterminal: grammar.name_of(top).to_string(),
                terminal: grammar.name_of(current).to_string(),
            })?;

        stack.pop();
        let production = grammar.production(pid);
        let empty = grammar.empty_id();
        let is_epsilon = production.rhs().len() == 1 && Some(production.rhs()[0]) == empty;
        if !is_epsilon {
            for &sym in production.rhs().iter().rev() {
                stack.push(sym);
            }
        }
        applied.push(grammar.format_production(pid));
    }

    if position != input.len() {
        return Err(DemoError::TrailingInput { position });
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::loader::load_str;
    use crate::recursion::eliminate_direct_left_recursion;
    use crate::table::build_parse_table;
    use crate::validator::validate;

    fn build(text: &str) -> Grammar {
        let mut g = load_str(text).unwrap();
        eliminate_direct_left_recursion(&mut g);
        compute_first_sets(&mut g);
        compute_follow_sets(&mut g);
        validate(&mut g).unwrap();
        build_parse_table(&mut g).unwrap();
        g
    }

    #[test]
    fn accepts_a_valid_token_stream() {
        let g = build("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n");
        let tokens: Vec<String> = ["T_ID", "T_PLUS", "T_ID"].iter().map(|s| s.to_string()).collect();
        assert!(run_demo(&g, &tokens).is_ok());
    }

    #[test]
    fn rejects_a_mismatched_token() {
        let g = build("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n");
        let tokens: Vec<String> = ["T_ID", "T_ID"].iter().map(|s| s.to_string()).collect();
        let err = run_demo(&g, &tokens).unwrap_err();
        assert!(matches!(err, DemoError::TerminalMismatch { .. }));
    }

    #[test]
    fn rejects_trailing_input() {
        let g = build("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n");
        let tokens: Vec<String> = ["T_ID", "T_ID"].iter().map(|s| s.to_string()).collect();
        assert!(run_demo(&g, &tokens).is_err());
    }

    #[test]
    fn accepts_a_longer_valid_expression() {
        let g = build("E:\n    E T_PLUS T\n    T\nT:\n    T_ID\n");
        let tokens: Vec<String> = ["T_ID", "T_PLUS", "T_ID", "T_PLUS", "T_ID"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(run_demo(&g, &tokens).is_ok());
    }

    #[test]
    fn accepts_via_epsilon_production() {
        let g = build("S:\n    A T_C\nA:\n    T_A\n    T_\n");
        let tokens: Vec<String> = ["T_C"].iter().map(|s| s.to_string()).collect();
        assert!(run_demo(&g, &tokens).is_ok());
    }
}
