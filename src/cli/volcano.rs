//! `volcano`: fold change against significance, with the top hits labelled.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::args::VolcanoArgs;
use super::efpr::write_summary;
use crate::charts::{volcano_file, StaticChartRenderer, VolcanoChart};
use crate::data::{Metric, TopHits, VolcanoTable};
use crate::Result;

/// Outcome of a volcano run.
#[derive(Debug, Clone, Serialize)]
pub struct VolcanoSummary {
    pub input: PathBuf,
    pub annotation: Option<PathBuf>,
    pub metric: Metric,
    pub threshold: Option<f64>,
    pub n_features: usize,
    pub hits: TopHits,
    pub plot: PathBuf,
}

/// Load the results, select the hits to label and draw the volcano plot.
pub fn run(args: &VolcanoArgs) -> Result<VolcanoSummary> {
    let style = args.output.load_style()?;
    let format = args.output.format;
    let metric = Metric::from_pvalue_flag(args.pvalue);

    info!("reading {}", args.input.display());
    let table = VolcanoTable::load(&args.input, args.anno.as_deref(), metric)?;
    info!(features = table.len(), axis = metric.axis_label(), "volcano table ready");

    let chart = VolcanoChart::new(&table, args.threshold, args.top);
    for hit in chart.hits.positive.iter().chain(&chart.hits.negative) {
        info!(label = %hit.label, l2fc = hit.l2fc, y = hit.y, "labelled hit");
    }

    fs::create_dir_all(&args.output_dir)?;
    let plot = args
        .output_dir
        .join(volcano_file(metric, args.threshold.is_some(), format));
    StaticChartRenderer::render_volcano(&chart, &style, &plot, format)?;
    info!("wrote {}", plot.display());

    let summary = VolcanoSummary {
        input: args.input.clone(),
        annotation: args.anno.clone(),
        metric,
        threshold: args.threshold,
        n_features: table.len(),
        hits: chart.hits.clone(),
        plot,
    };

    if args.output.summary {
        write_summary(&summary.plot, &summary)?;
    }

    Ok(summary)
}
