//! # titrapeak
//!
//! Command-line front end for titration analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Full analysis of a time,pH export
//! titrapeak analyze run.csv --c-b 0.1 --v0 100 --pump-rate 1.0 -o results/
//!
//! # Peaks only, from a pH,delta_b table
//! titrapeak peaks excess.csv --no-cutoff
//!
//! # Background-acid curve
//! titrapeak model-curve --c-a 0.01
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
