//! efpr - Explore a null distribution of shuffle scores and return a cutoff.
//!
//! Every sub-directory of the input directory is one shuffle run holding a
//! `predictive_capability.xls` table. The pooled `kernel_mcc` scores give the
//! cutoff for the requested empirical false-positive rate, which is printed
//! and drawn over a violin plot of the distribution.

use anyhow::Context;
use clap::Parser;
use screenviz::cli::{self, EfprArgs};

fn main() -> anyhow::Result<()> {
    let args = EfprArgs::parse();
    cli::init_logging(args.output.verbose);

    let summary = cli::efpr::run(&args)
        .with_context(|| format!("eFPR run on {} failed", args.input_dir.display()))?;
    print!("{}", summary.report());
    Ok(())
}
