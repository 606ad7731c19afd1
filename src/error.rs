//! Error taxonomy for the grammar pipeline.
//!
//! Every variant is fatal: the pipeline (loader -> rewriter -> FIRST/FOLLOW
//! -> validator -> table builder) aborts on the first error and the CLI
//! prints it to stderr.

use thiserror::Error;

/// Errors raised while reading a grammar file and building the initial
/// symbol/production graph.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("duplicate non-terminal declaration: {0}")]
    DuplicateNonTerminal(String),

    #[error("production body line before any non-terminal was declared: {0:?}")]
    BodyBeforeLhs(String),

    #[error("production has no body: {0}")]
    ProductionWithoutBody(String),

    #[error("unknown symbol referenced in production: {0}")]
    UnknownSymbol(String),

    #[error("T_EOF is reserved for the end-of-input sentinel and may not appear in a grammar file")]
    ReservedEndSymbol,

    #[error("duplicate production: {0}")]
    DuplicateProduction(String),

    #[error("I/O error reading grammar file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors about the overall shape of the symbol/production graph.
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("no root non-terminal found: every non-terminal is referenced on some RHS")]
    NoRoot,

    #[error("multiple root candidates found: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("duplicate production after rewriting: {0}")]
    DuplicateProduction(String),
}

/// Left-recursion errors (validator checks 1-2).
#[derive(Error, Debug)]
pub enum RecursionError {
    #[error("indirect left recursion detected, reachable from non-terminal {0}")]
    Indirect(String),

    #[error("residual direct left recursion on non-terminal {0} after rewriting")]
    Direct(String),
}

/// LL(1) well-formedness failures (validator checks 3-7).
#[derive(Error, Debug)]
pub enum LL1Error {
    #[error("FIRST sets of {nonterminal}'s productions are not pairwise disjoint:\n  {prod1}\n  {prod2}")]
    FirstSetsOverlap {
        nonterminal: String,
        prod1: String,
        prod2: String,
    },

    #[error("FIRST/FOLLOW conflict on {nonterminal}:\n  {prod1}\n  {prod2}")]
    FirstFollowConflict {
        nonterminal: String,
        prod1: String,
        prod2: String,
    },

    #[error("empty symbol appears in the middle of production {0}")]
    EmptyNotSole(String),

    #[error("non-terminal {symbol} occurs more than once in production {production}")]
    RepeatedSymbolInProduction { symbol: String, production: String },

    #[error("empty symbol found in FOLLOW({0})")]
    EmptyInFollow(String),

    #[error("cached FIRST set for production {production} disagrees with substring_first(0)")]
    FirstSetInconsistent { production: String },
}

/// Parse-table construction failures. Should never occur once the
/// validator has passed; its presence indicates an internal invariant bug.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(
        "internal error: cell ({nonterminal}, {terminal}) assigned twice: {existing} vs {incoming}"
    )]
    DuplicateCell {
        nonterminal: String,
        terminal: String,
        existing: String,
        incoming: String,
    },
}

/// The union of all pipeline errors.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Recursion(#[from] RecursionError),

    #[error(transparent)]
    LL1(#[from] LL1Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Type alias for results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Fatal errors raised by the demo driver. Kept distinct from
/// [`GrammarError`] because they describe a rejected *input string*, not a
/// malformed grammar.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("input exhausted but stack still expects {0}")]
    InputExhausted(String),

    #[error("expected terminal {expected}, found {found} at input position {position}")]
    TerminalMismatch {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("no parse table entry for ({nonterminal}, {terminal})")]
    NoTableEntry { nonterminal: String, terminal: String },

    #[error("input not fully consumed: stack empty at position {position}, expected T_EOF")]
    TrailingInput { position: usize },
}
