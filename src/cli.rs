//! CLI surface.
//!
//! Runs the whole pipeline over a grammar file, writes the two report
//! files next to it, and optionally drives the demo parser over a
//! token stream.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use crate::demo;
use crate::dump;
use crate::error::GrammarError;
use crate::first_follow::{compute_first_sets, compute_follow_sets};
use crate::loader;
use crate::recursion::eliminate_direct_left_recursion;
use crate::table::build_parse_table;
use crate::validator::validate;

/// Loads, rewrites, validates and tabulates an LL(1) grammar.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the grammar file.
    grammar_path: PathBuf,

    /// Token names (space-separated) to run through the demo parser.
    #[arg(long = "demo", num_args = 1.., value_name = "TOKEN")]
    demo_tokens: Vec<String>,

    /// Emit debug-level trace logging regardless of RUST_LOG.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point called from `main`. Returns a process exit code rather
/// than panicking, so `main` stays a one-liner.
pub fn run() -> ExitCode {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match run_pipeline(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_pipeline(args: &Args) -> Result<(), GrammarError> {
    let mut grammar = loader::load_path(&args.grammar_path)?;
    eliminate_direct_left_recursion(&mut grammar);
    compute_first_sets(&mut grammar);
    compute_follow_sets(&mut grammar);
    validate(&mut grammar)?;
    build_parse_table(&mut grammar)?;
    info!("grammar is LL(1), parse table has {} cell(s)", grammar.parse_table().len());

    dump::write_reports(&grammar, &args.grammar_path)?;

    if !args.demo_tokens.is_empty() {
        match demo::run_demo(&grammar, &args.demo_tokens) {
            Ok(steps) => {
                println!("accepted, {} production(s) applied:", steps.len());
                for step in steps {
                    println!("  {step}");
                }
            }
            Err(e) => println!("rejected: {e}"),
        }
    }

    Ok(())
}
