//! LL(1) grammar analyzer and predictive-parse demo driver.
//!
//! Loads a grammar file, eliminates direct left recursion, computes
//! FIRST/FOLLOW sets, checks LL(1) well-formedness, builds the
//! predictive parse table, and writes the `.dump`/`.table` reports
//! next to the input file.

use std::process::ExitCode;

mod cli;
mod demo;
mod dump;
mod error;
mod first_follow;
mod grammar;
mod loader;
mod production;
mod recursion;
mod symbol;
mod table;
mod validator;

fn main() -> ExitCode {
    cli::run()
}
