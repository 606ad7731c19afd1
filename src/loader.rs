//! Grammar file loader.
//!
//! Parses the line-oriented grammar notation into a [`Grammar`]: a
//! symbol pass classifies every name as terminal or non-terminal, then
//! a production pass builds the productions, and finally the unique
//! root non-terminal is resolved.

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::error::{GrammarError, LoadError, Result, StructureError};
use crate::grammar::Grammar;
use crate::symbol::{SymbolId, EMPTY_NAME, END_NAME};

/// Loads a grammar from a file on disk.
pub fn load_path(path: &Path) -> Result<Grammar> {
    let text = std::fs::read_to_string(path).map_err(LoadError::Io)?;
    load_str(&text)
}

/// Loads a grammar from its textual notation.
pub fn load_str(text: &str) -> Result<Grammar> {
    let lines = filter_lines(text);
    let mut grammar = Grammar::new();

    symbol_pass(&mut grammar, &lines)?;
    production_pass(&mut grammar, &lines)?;

    let root = resolve_root(&grammar)?;
    grammar.set_root(root);

    debug!(
        "loaded grammar: {} terminal(s), {} non-terminal(s), root {}",
        grammar.terminals().len(),
        grammar.non_terminals().len(),
        grammar.name_of(root)
    );

    Ok(grammar)
}

/// Trims every line and drops blank lines and comment lines (first
/// non-space character `#`).
fn filter_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Symbol pass: `name:` lines declare non-terminals; every other
/// whitespace-separated token is provisionally unclassified until any name
/// not later declared as a non-terminal is fixed as a terminal.
fn symbol_pass(grammar: &mut Grammar, lines: &[&str]) -> Result<()> {
    let mut unclassified: HashSet<String> = HashSet::new();

    for line in lines {
        if let Some(name) = line.strip_suffix(':') {
            if name == END_NAME {
                return Err(GrammarError::Load(LoadError::ReservedEndSymbol));
            }
            if grammar.declare_non_terminal(name).is_none() {
                return Err(GrammarError::Load(LoadError::DuplicateNonTerminal(
                    name.to_string(),
                )));
            }
            unclassified.remove(name);
        } else {
            for token in line.split_whitespace() {
                if grammar.symbol_id(token).is_some() {
                    continue;
                }
                unclassified.insert(token.to_string());
            }
        }
    }

    for name in unclassified {
        if name == END_NAME {
            return Err(GrammarError::Load(LoadError::ReservedEndSymbol));
        }
        if name == EMPTY_NAME {
            grammar.ensure_empty();
        } else {
            grammar.declare_terminal(&name);
        }
    }

    Ok(())
}

/// Production pass: each `name:` line opens a new LHS; every subsequent
/// body line becomes one production for that LHS until the next `name:`
/// line or end of input.
fn production_pass(grammar: &mut Grammar, lines: &[&str]) -> Result<()> {
    let mut current_lhs: Option<SymbolId> = None;
    let mut has_body = true;

    for line in lines {
        if let Some(name) = line.strip_suffix(':') {
            if !has_body {
                let prev = grammar.name_of(current_lhs.expect("has_body implies a current LHS"));
                return Err(GrammarError::Load(LoadError::ProductionWithoutBody(
                    prev.to_string(),
                )));
            }
            has_body = false;
            current_lhs = grammar.symbol_id(name);
            continue;
        }

        let lhs = current_lhs
            .ok_or_else(|| GrammarError::Load(LoadError::BodyBeforeLhs(line.to_string())))?;
        has_body = true;

        let mut rhs = Vec::new();
        for token in line.split_whitespace() {
            let symbol = grammar
                .symbol_id(token)
                .ok_or_else(|| GrammarError::Load(LoadError::UnknownSymbol(token.to_string())))?;
            rhs.push(symbol);
        }

        if grammar.create_production(lhs, rhs.clone()).is_none() {
            let repr = grammar.format_production_raw(lhs, &rhs);
            return Err(GrammarError::Load(LoadError::DuplicateProduction(repr)));
        }
    }

    if !has_body {
        let prev = grammar.name_of(current_lhs.expect("has_body implies a current LHS"));
        return Err(GrammarError::Load(LoadError::ProductionWithoutBody(
            prev.to_string(),
        )));
    }

    Ok(())
}

fn resolve_root(grammar: &Grammar) -> Result<SymbolId> {
    let candidates = grammar.find_root_candidates();
    match candidates.as_slice() {
        [] => Err(GrammarError::Structure(StructureError::NoRoot)),
        [only] => Ok(*only),
        many => Err(GrammarError::Structure(StructureError::MultipleRoots(
            many.iter().map(|id| grammar.name_of(*id).to_string()).collect(),
        ))),
    }
}
