//! volcano - Display a volcano plot of screening results.

use anyhow::Context;
use clap::Parser;
use screenviz::cli::{self, VolcanoArgs};

fn main() -> anyhow::Result<()> {
    let args = VolcanoArgs::parse();
    cli::init_logging(args.output.verbose);

    let summary = cli::volcano::run(&args)
        .with_context(|| format!("volcano plot of {} failed", args.input.display()))?;
    println!("{}", summary.plot.display());
    Ok(())
}
