//! The grammar container.
//!
//! `Grammar` is the sole owner of every symbol and production: the
//! interning table, the terminal/non-terminal partitions, the production
//! arena, and (once the table builder runs) the predictive parse table.
//! Every other pass (loader, rewriter, FIRST/FOLLOW engine, validator,
//! table builder) operates through `&Grammar`/`&mut Grammar` rather than
//! holding its own copies, so cross-reference sets never drift out of
//! lockstep with the arena.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::production::{Production, ProductionId};
use crate::symbol::{Symbol, SymbolId, SymbolKind, EMPTY_NAME, END_NAME};

/// Per-non-terminal bookkeeping: cross-reference sets, FIRST/FOLLOW, and the
/// fresh-name counter used by the left-recursion rewriter.
#[derive(Debug, Default, Clone)]
pub(crate) struct NonTerminalData {
    pub lhs_productions: BTreeSet<ProductionId>,
    pub rhs_productions: BTreeSet<ProductionId>,
    pub first_set: BTreeSet<SymbolId>,
    pub follow_set: BTreeSet<SymbolId>,
    pub first_rhs_set: Option<BTreeSet<SymbolId>>,
    pub new_name_counter: u32,
}

impl NonTerminalData {
    fn fresh() -> Self {
        Self {
            new_name_counter: 1,
            ..Default::default()
        }
    }
}

/// Owns every symbol and production of one grammar.
#[derive(Debug, Default)]
pub struct Grammar {
    symbols: Vec<Symbol>,
    symbols_by_name: HashMap<String, SymbolId>,
    terminals: BTreeSet<SymbolId>,
    non_terminals: BTreeSet<SymbolId>,
    nt_data: HashMap<SymbolId, NonTerminalData>,
    productions: Vec<Production>,
    live_productions: BTreeSet<ProductionId>,
    production_index: HashMap<(SymbolId, Vec<SymbolId>), ProductionId>,
    root: Option<SymbolId>,
    parse_table: HashMap<(SymbolId, SymbolId), ProductionId>,
    empty_id: Option<SymbolId>,
    end_id: Option<SymbolId>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    // -- symbol lookups ---------------------------------------------------

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn name_of(&self, id: SymbolId) -> &str {
        self.symbol(id).name()
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.symbol(id).is_terminal()
    }

    pub fn is_non_terminal(&self, id: SymbolId) -> bool {
        self.symbol(id).is_non_terminal()
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols_by_name.get(name).copied()
    }

    pub fn terminals(&self) -> &BTreeSet<SymbolId> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<SymbolId> {
        &self.non_terminals
    }

    /// Non-terminals sorted by name, for dumps and other output that must
    /// stay stable across runs regardless of internal id assignment.
    pub fn sorted_non_terminals(&self) -> Vec<SymbolId> {
        let mut v: Vec<SymbolId> = self.non_terminals.iter().copied().collect();
        v.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        v
    }

    pub fn sorted_terminals(&self) -> Vec<SymbolId> {
        let mut v: Vec<SymbolId> = self.terminals.iter().copied().collect();
        v.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        v
    }

    pub fn empty_id(&self) -> Option<SymbolId> {
        self.empty_id
    }

    pub fn end_id(&self) -> Option<SymbolId> {
        self.end_id
    }

    pub fn root(&self) -> Option<SymbolId> {
        self.root
    }

    // -- interning ---------------------------------------------------------

    fn intern(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        if let Some(&id) = self.symbols_by_name.get(name) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name, kind));
        self.symbols_by_name.insert(name.to_string(), id);
        match kind {
            SymbolKind::Terminal => {
                self.terminals.insert(id);
            }
            SymbolKind::NonTerminal => {
                self.non_terminals.insert(id);
                self.nt_data.insert(id, NonTerminalData::fresh());
            }
        }
        id
    }

    /// Declares a non-terminal. Returns `None` if the name is already
    /// owned by this grammar (duplicate declaration); the caller turns
    /// that into a loader error naming the offending name.
    pub(crate) fn declare_non_terminal(&mut self, name: &str) -> Option<SymbolId> {
        if self.symbols_by_name.contains_key(name) {
            return None;
        }
        Some(self.intern(name, SymbolKind::NonTerminal))
    }

    /// Declares a terminal for a name known not to already exist (the
    /// loader only calls this for names left unclassified after the
    /// symbol pass).
    pub(crate) fn declare_terminal(&mut self, name: &str) -> SymbolId {
        self.intern(name, SymbolKind::Terminal)
    }

    /// Returns the sentinel empty terminal, creating it on first use.
    pub fn ensure_empty(&mut self) -> SymbolId {
        if let Some(id) = self.empty_id {
            return id;
        }
        let id = self.intern(EMPTY_NAME, SymbolKind::Terminal);
        self.empty_id = Some(id);
        id
    }

    /// Returns the sentinel end-of-input terminal, creating it on first use.
    pub fn ensure_end(&mut self) -> SymbolId {
        if let Some(id) = self.end_id {
            return id;
        }
        let id = self.intern(END_NAME, SymbolKind::Terminal);
        self.end_id = Some(id);
        id
    }

    // -- non-terminal data ---------------------------------------------------

    pub(crate) fn nt_data(&self, id: SymbolId) -> &NonTerminalData {
        self.nt_data
            .get(&id)
            .expect("nt_data requested for a non-terminal-only field")
    }

    pub(crate) fn nt_data_mut(&mut self, id: SymbolId) -> &mut NonTerminalData {
        self.nt_data
            .get_mut(&id)
            .expect("nt_data_mut requested for a non-terminal-only field")
    }

    /// FIRST set of a symbol: `{symbol}` for a terminal, the maintained
    /// set for a non-terminal.
    pub fn first_set_of(&self, id: SymbolId) -> BTreeSet<SymbolId> {
        if self.is_terminal(id) {
            BTreeSet::from([id])
        } else {
            self.nt_data(id).first_set.clone()
        }
    }

    pub fn follow_set(&self, id: SymbolId) -> &BTreeSet<SymbolId> {
        &self.nt_data(id).follow_set
    }

    /// Synthesises the next fresh name derived from `base`, of the form
    /// `base.name + "-" + k` for the next counter value.
    pub(crate) fn new_non_terminal_name(&mut self, base: SymbolId) -> String {
        let base_name = self.name_of(base).to_string();
        let data = self.nt_data_mut(base);
        let k = data.new_name_counter;
        data.new_name_counter += 1;
        format!("{base_name}-{k}")
    }

    // -- productions ---------------------------------------------------------

    /// Creates `lhs -> rhs`, wiring up cross-references. Returns `None`
    /// (without mutating anything) if an equal production already exists.
    pub(crate) fn create_production(
        &mut self,
        lhs: SymbolId,
        rhs: Vec<SymbolId>,
    ) -> Option<ProductionId> {
        let key = (lhs, rhs.clone());
        if self.production_index.contains_key(&key) {
            return None;
        }
        let pid = ProductionId(self.productions.len() as u32);
        self.productions.push(Production::new(lhs, rhs.clone()));
        self.production_index.insert(key, pid);
        self.live_productions.insert(pid);
        self.nt_data_mut(lhs).lhs_productions.insert(pid);
        for &sym in &rhs {
            if self.is_non_terminal(sym) {
                self.nt_data_mut(sym).rhs_productions.insert(pid);
            }
        }
        Some(pid)
    }

    /// Removes a production from every set that references it. The id
    /// must not be used again afterwards.
    pub(crate) fn retire_production(&mut self, pid: ProductionId) {
        let (lhs, rhs) = {
            let p = self.production(pid);
            (p.lhs, p.rhs.clone())
        };
        self.nt_data_mut(lhs).lhs_productions.remove(&pid);
        for &sym in &rhs {
            if self.is_non_terminal(sym) {
                self.nt_data_mut(sym).rhs_productions.remove(&pid);
            }
        }
        self.production_index.remove(&(lhs, rhs));
        self.live_productions.remove(&pid);
    }

    pub fn production(&self, pid: ProductionId) -> &Production {
        &self.productions[pid.0 as usize]
    }

    pub fn live_productions(&self) -> impl Iterator<Item = ProductionId> + '_ {
        self.live_productions.iter().copied()
    }

    pub fn productions_of(&self, nt: SymbolId) -> impl Iterator<Item = ProductionId> + '_ {
        self.nt_data(nt).lhs_productions.iter().copied()
    }

    /// `productions_of`, sorted by textual representation, so rewriting
    /// and dumping always visit alternatives in the same order regardless
    /// of internal id assignment.
    pub fn productions_of_sorted(&self, nt: SymbolId) -> Vec<ProductionId> {
        let mut v: Vec<ProductionId> = self.productions_of(nt).collect();
        v.sort_by(|a, b| self.format_production(*a).cmp(&self.format_production(*b)));
        v
    }

    pub fn first_set_mut(&mut self, id: SymbolId) -> &mut BTreeSet<SymbolId> {
        &mut self.nt_data_mut(id).first_set
    }

    pub fn follow_set_mut(&mut self, id: SymbolId) -> &mut BTreeSet<SymbolId> {
        &mut self.nt_data_mut(id).follow_set
    }

    pub(crate) fn production_first_set_mut(&mut self, pid: ProductionId) -> &mut BTreeSet<SymbolId> {
        &mut self.productions[pid.0 as usize].first_set
    }

    // -- root detection ------------------------------------------------------

    /// Finds the unique non-terminal with empty `rhs_productions`.
    /// `None`/multiple candidates are reported by the caller as a
    /// `StructureError`.
    pub(crate) fn find_root_candidates(&self) -> Vec<SymbolId> {
        let mut v: Vec<SymbolId> = self
            .non_terminals
            .iter()
            .copied()
            .filter(|id| self.nt_data(*id).rhs_productions.is_empty())
            .collect();
        v.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        v
    }

    pub(crate) fn set_root(&mut self, id: SymbolId) {
        self.root = Some(id);
    }

    // -- FIRST of a symbol sequence ------------------------------------------

    /// FIRST of `rhs[start..]`: unions FIRST sets of the leading run of
    /// symbols that can derive the empty string, stopping at the first
    /// symbol (terminal, or non-terminal) that cannot, and adding EMPTY
    /// only if the whole suffix can derive it.
    ///
    /// Requires every non-terminal in `rhs[start..]` to already have its
    /// FIRST set computed (the FIRST-set pass must have run, or be in the
    /// middle of its fixpoint for a symbol whose set is known to be
    /// monotonically growing).
    pub fn substring_first(&self, rhs: &[SymbolId], start: usize) -> BTreeSet<SymbolId> {
        let empty = self.empty_id.expect("EMPTY must exist once a grammar is loaded");
        let mut result = BTreeSet::new();
        for &sym in &rhs[start..] {
            if self.is_terminal(sym) {
                result.insert(sym);
                return result;
            }
            let first = &self.nt_data(sym).first_set;
            let had_empty = first.contains(&empty);
            result.extend(first.iter().copied().filter(|s| *s != empty));
            if !had_empty {
                return result;
            }
        }
        result.insert(empty);
        result
    }

    // -- parse table (the table builder writes through these) ---------------

    pub fn parse_table(&self) -> &HashMap<(SymbolId, SymbolId), ProductionId> {
        &self.parse_table
    }

    pub(crate) fn parse_table_mut(&mut self) -> &mut HashMap<(SymbolId, SymbolId), ProductionId> {
        &mut self.parse_table
    }

    // -- formatting ------------------------------------------------------------

    pub(crate) fn format_production_raw(&self, lhs: SymbolId, rhs: &[SymbolId]) -> String {
        let mut s = format!("[{} ->", self.name_of(lhs));
        for sym in rhs {
            s.push(' ');
            s.push_str(self.name_of(*sym));
        }
        s.push(']');
        s
    }

    /// Production repr used in dumps and diagnostics: `[LHS -> s1 s2 ...]`.
    pub fn format_production(&self, pid: ProductionId) -> String {
        let p = self.production(pid);
        self.format_production_raw(p.lhs, &p.rhs)
    }

    pub(crate) fn format_set(&self, set: &BTreeSet<SymbolId>) -> String {
        let mut names: Vec<&str> = set.iter().map(|id| self.name_of(*id)).collect();
        names.sort_unstable();
        format!("{{{}}}", names.join(", "))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nt in self.sorted_non_terminals() {
            for pid in self.productions_of_sorted(nt) {
                writeln!(f, "{}", self.format_production(pid))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_production_rejects_duplicates() {
        let mut g = Grammar::new();
        let a = g.declare_non_terminal("A").unwrap();
        let t = g.declare_terminal("t");
        assert!(g.create_production(a, vec![t]).is_some());
        assert!(g.create_production(a, vec![t]).is_none());
    }

    #[test]
    fn retire_production_clears_cross_references() {
        let mut g = Grammar::new();
        let a = g.declare_non_terminal("A").unwrap();
        let b = g.declare_non_terminal("B").unwrap();
        let pid = g.create_production(a, vec![b]).unwrap();
        assert!(g.nt_data(b).rhs_productions.contains(&pid));
        g.retire_production(pid);
        assert!(!g.nt_data(a).lhs_productions.contains(&pid));
        assert!(!g.nt_data(b).rhs_productions.contains(&pid));
        assert!(g.live_productions().next().is_none());
    }

    #[test]
    fn root_candidates_are_non_terminals_unreferenced_on_any_rhs() {
        let mut g = Grammar::new();
        let s = g.declare_non_terminal("S").unwrap();
        let a = g.declare_non_terminal("A").unwrap();
        g.create_production(s, vec![a]).unwrap();
        assert_eq!(g.find_root_candidates(), vec![s]);
    }
}
