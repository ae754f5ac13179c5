//! Entry point that parses the command line, initialises tracing and hands off
//! to `run.rs`.
//!
//! Functions:
//!
//! - `main` parses CLI input, initialises tracing, and runs the sequence.

mod cli;
mod run;
mod settings;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    run::run(cli)
}
