//! `efpr`: empirical false-positive-rate cutoff from pooled shuffle scores.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::args::EfprArgs;
use crate::charts::{null_distribution_file, StaticChartRenderer, ViolinChart};
use crate::data::NullDistribution;
use crate::stats::StatsCalculator;
use crate::Result;

/// Outcome of an eFPR run.
#[derive(Debug, Clone, Serialize)]
pub struct EfprSummary {
    pub input_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub n_scores: usize,
    pub percent: f64,
    pub cutoff: f64,
    pub n_above_cutoff: usize,
    pub plot: PathBuf,
}

impl EfprSummary {
    /// Human readable report printed on stdout.
    pub fn report(&self) -> String {
        format!(
            "# of MCC: {}\ncutoff for an eFPR < {}: {}\n# of MCC > cutoff: {}\n",
            self.n_scores,
            StatsCalculator::format_number(self.percent),
            StatsCalculator::format_number(StatsCalculator::round_to(self.cutoff, 2)),
            self.n_above_cutoff
        )
    }
}

/// Pool the shuffle scores, derive the cutoff and plot the distribution.
pub fn run(args: &EfprArgs) -> Result<EfprSummary> {
    let style = args.output.load_style()?;
    let format = args.output.format;

    info!("exploring null distribution in {}", args.input_dir.display());
    let null = NullDistribution::from_shuffle_dir(&args.input_dir)?;

    let cutoff = StatsCalculator::efpr_cutoff(&null.scores, args.percent)?;
    let n_above_cutoff = StatsCalculator::count_above(&null.scores, cutoff);
    info!(
        scores = null.len(),
        runs = null.files.len(),
        cutoff,
        "null distribution ready"
    );

    let chart = ViolinChart::new(&null.scores, cutoff, args.percent)?;

    fs::create_dir_all(&args.output_dir)?;
    let plot = args.output_dir.join(null_distribution_file(format));
    StaticChartRenderer::render_violin(&chart, &style, &plot, format)?;
    info!("wrote {}", plot.display());

    let summary = EfprSummary {
        input_dir: args.input_dir.clone(),
        n_scores: null.len(),
        files: null.files,
        percent: args.percent,
        cutoff,
        n_above_cutoff,
        plot,
    };

    if args.output.summary {
        write_summary(&summary.plot, &summary)?;
    }

    Ok(summary)
}

/// Write `value` as pretty JSON beside `plot`, swapping its extension.
pub(crate) fn write_summary<T: Serialize>(plot: &Path, value: &T) -> Result<PathBuf> {
    let path = plot.with_extension("json");
    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, value)?;
    info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(percent: f64, cutoff: f64) -> EfprSummary {
        EfprSummary {
            input_dir: PathBuf::from("shuffles"),
            files: Vec::new(),
            n_scores: 100,
            percent,
            cutoff,
            n_above_cutoff: 0,
            plot: PathBuf::from("null_distribution.svg"),
        }
    }

    #[test]
    fn report_writes_small_percent_in_exponent_form() {
        let report = summary(1e-5, 1.0).report();
        assert_eq!(
            report,
            "# of MCC: 100\ncutoff for an eFPR < 1e-05: 1.0\n# of MCC > cutoff: 0\n"
        );
    }

    #[test]
    fn report_rounds_cutoff_to_two_decimals() {
        let report = summary(0.01, 0.4567).report();
        assert!(report.contains("cutoff for an eFPR < 0.01: 0.46\n"));
    }
}
