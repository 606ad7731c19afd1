//! Textual report writers.
//!
//! Neither function is part of the core pipeline: `cli.rs` calls these
//! after validation succeeds to write the `<path>.dump`/`<path>.table`
//! side files. Kept out of `grammar.rs` so the library itself stays free
//! of file-format concerns.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{GrammarError, LoadError, Result};
use crate::grammar::Grammar;

/// Renders the grammar dump: one block per non-terminal (sorted by
/// name), each production on its own line with its cached FIRST set.
pub fn dump_grammar(grammar: &Grammar) -> String {
    let mut out = String::new();
    for nt in grammar.sorted_non_terminals() {
        let _ = writeln!(
            out,
            "{}: {} {}",
            grammar.name_of(nt),
            grammar.format_set(&grammar.first_set_of(nt)),
            grammar.format_set(grammar.follow_set(nt))
        );
        for pid in grammar.productions_of_sorted(nt) {
            let production = grammar.production(pid);
            let rhs: Vec<&str> = production.rhs().iter().map(|s| grammar.name_of(*s)).collect();
            let _ = writeln!(
                out,
                "    {}; {}",
                rhs.join(" "),
                grammar.format_set(production.first_set())
            );
        }
        out.push('\n');
    }
    out
}

/// Renders the parse-table dump: rows sorted by `(LHS, lookahead)`, a
/// blank line whenever the LHS changes.
pub fn dump_table(grammar: &Grammar) -> String {
    let mut cells: Vec<_> = grammar.parse_table().iter().collect();
    cells.sort_by(|a, b| {
        let ((lhs_a, term_a), _) = a;
        let ((lhs_b, term_b), _) = b;
        grammar
            .name_of(*lhs_a)
            .cmp(grammar.name_of(*lhs_b))
            .then_with(|| grammar.name_of(*term_a).cmp(grammar.name_of(*term_b)))
    });

    let mut out = String::new();
    let mut last_lhs: Option<&str> = None;
    for ((lhs, terminal), pid) in cells {
        let lhs_name = grammar.name_of(*lhs);
        if let Some(prev) = last_lhs {
            if prev != lhs_name {
                out.push('\n');
            }
        }
        last_lhs = Some(lhs_name);
        let _ = writeln!(
            out,
            "({}, {}): {}",
            lhs_name,
            grammar.name_of(*terminal),
            grammar.format_production(*pid)
        );
    }
    out
}

/// Writes `<path>.dump` and `<path>.table` next to the grammar file.
pub fn write_reports(grammar: &Grammar, grammar_path: &Path) -> Result<()> {
    let dump_path = with_suffix(grammar_path, "dump");
    let table_path = with_suffix(grammar_path, "table");
    std::fs::write(&dump_path, dump_grammar(grammar))
        .map_err(|e| GrammarError::Load(LoadError::Io(e)))?;
    std::fs::write(&table_path, dump_table(grammar)).map_err(|e| GrammarError::Load(LoadError::Io(e)))?;
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    std::path::PathBuf::from(name)
}
