//! Static Chart Renderer
//! Draws the null distribution violin and the volcano scatter with plotters.
//!
//! Violin layout (horizontal):
//! 1. Title: "threshold = {cutoff}, eFPR < {percent}"
//! 2. Kernel density outline mirrored around the centre line
//! 3. Inner box: quartile bar, whiskers, white median dot
//! 4. Dashed vertical line at the cutoff
//!
//! Volcano layout: l2fc on x, metric on y, dashed horizontal threshold line
//! and text labels for the top hits on each side.

use crate::charts::style::{OutputFormat, PlotStyle};
use crate::data::{TopHits, VolcanoTable, MCC_COLUMN};
use crate::error::{Error, Result};
use crate::stats::{KernelDensity, StatsCalculator, ViolinSummary};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

/// Half the violin thickness at the density peak, in category units.
const VIOLIN_HALF_WIDTH: f64 = 0.4;
const BOX_HALF_HEIGHT: f64 = 0.03;
const INNER_COLOR: RGBColor = RGBColor(64, 64, 64);

/// Horizontal offset of labels for hits with positive fold change.
pub const POSITIVE_LABEL_DX: f64 = -1.0;
/// Horizontal offset of labels for hits with negative fold change.
pub const NEGATIVE_LABEL_DX: f64 = 0.01;

/// Number of dashes drawn along a threshold line.
const DASHES: usize = 40;

/// Everything drawn on the null distribution chart.
#[derive(Debug, Clone)]
pub struct ViolinChart {
    pub summary: ViolinSummary,
    pub density: Option<KernelDensity>,
    pub cutoff: f64,
    pub percent: f64,
}

impl ViolinChart {
    pub fn new(scores: &[f64], cutoff: f64, percent: f64) -> Result<Self> {
        let summary = ViolinSummary::from_values(scores).ok_or(Error::EmptyDistribution)?;
        let density = KernelDensity::scott(scores)?;
        Ok(Self {
            summary,
            density,
            cutoff,
            percent,
        })
    }

    pub fn title(&self) -> String {
        format!(
            "threshold = {}, eFPR < {}",
            StatsCalculator::format_number(StatsCalculator::round_to(self.cutoff, 2)),
            StatsCalculator::format_number(self.percent)
        )
    }

    /// Mirrored density outline, clockwise from the lowest support point.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let Some(kde) = &self.density else {
            return Vec::new();
        };
        let peak = kde.peak();
        if peak <= 0.0 {
            return Vec::new();
        }
        let scale = VIOLIN_HALF_WIDTH / peak;

        let upper = kde
            .support
            .iter()
            .zip(&kde.density)
            .map(|(&x, &d)| (x, d * scale));
        let lower = kde
            .support
            .iter()
            .zip(&kde.density)
            .rev()
            .map(|(&x, &d)| (x, -d * scale));
        upper.chain(lower).collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        let (lo, hi) = match &self.density {
            Some(kde) => (
                kde.support.first().copied().unwrap_or(self.summary.min),
                kde.support.last().copied().unwrap_or(self.summary.max),
            ),
            None => (self.summary.min, self.summary.max),
        };
        padded_range([lo, hi, self.cutoff].into_iter(), 0.05)
    }
}

/// Everything drawn on the volcano chart.
#[derive(Debug, Clone)]
pub struct VolcanoChart<'a> {
    pub table: &'a VolcanoTable,
    pub threshold: Option<f64>,
    pub hits: TopHits,
}

impl<'a> VolcanoChart<'a> {
    pub fn new(table: &'a VolcanoTable, threshold: Option<f64>, top: usize) -> Self {
        let hits = threshold
            .map(|t| table.top_hits(t, top))
            .unwrap_or_default();
        Self {
            table,
            threshold,
            hits,
        }
    }

    /// Text and anchor point of every hit label.
    pub fn labels(&self) -> Vec<(String, (f64, f64))> {
        let positive = self
            .hits
            .positive
            .iter()
            .map(|f| (f.label.clone(), (f.l2fc + POSITIVE_LABEL_DX, f.y)));
        let negative = self
            .hits
            .negative
            .iter()
            .map(|f| (f.label.clone(), (f.l2fc + NEGATIVE_LABEL_DX, f.y)));
        positive.chain(negative).collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        let points = self.table.features.iter().map(|f| f.l2fc);
        let labels = self.labels().into_iter().map(|(_, (x, _))| x);
        padded_range(points.chain(labels), 0.05)
    }

    pub fn y_range(&self) -> Range<f64> {
        let points = self.table.features.iter().map(|f| f.y);
        padded_range(points.chain(self.threshold), 0.05)
    }
}

/// Smallest range holding every finite value, widened by `pad` of its span
/// on both ends. Falls back to a unit span around a single value.
pub fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 0.5)..(hi + 0.5);
    }
    (lo - span * pad)..(hi + span * pad)
}

/// Split the segment `from`-`to` into `count` dashes separated by gaps of
/// equal length.
pub fn dash_segments(from: (f64, f64), to: (f64, f64), count: usize) -> Vec<[(f64, f64); 2]> {
    if count == 0 {
        return Vec::new();
    }
    let pieces = (2 * count - 1) as f64;
    let dx = (to.0 - from.0) / pieces;
    let dy = (to.1 - from.1) / pieces;
    (0..count)
        .map(|i| {
            let k = (2 * i) as f64;
            [
                (from.0 + k * dx, from.1 + k * dy),
                (from.0 + (k + 1.0) * dx, from.1 + (k + 1.0) * dy),
            ]
        })
        .collect()
}

/// Renders charts to SVG or PNG files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_violin(
        chart: &ViolinChart,
        style: &PlotStyle,
        path: &Path,
        format: OutputFormat,
    ) -> Result<()> {
        let size = (style.width, style.height);
        match format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw_violin(&root, chart, style)
            }
            OutputFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw_violin(&root, chart, style)
            }
        }
    }

    pub fn render_volcano(
        chart: &VolcanoChart,
        style: &PlotStyle,
        path: &Path,
        format: OutputFormat,
    ) -> Result<()> {
        let size = (style.width, style.height);
        match format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw_volcano(&root, chart, style)
            }
            OutputFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw_volcano(&root, chart, style)
            }
        }
    }

    fn draw_violin<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ViolinChart,
        style: &PlotStyle,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(Error::plot)?;

        let font = style.font_family.as_str();
        let mut cc = ChartBuilder::on(root)
            .caption(chart.title(), (font, style.title_size))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(10)
            .build_cartesian_2d(chart.x_range(), -0.5f64..0.5f64)
            .map_err(Error::plot)?;

        cc.configure_mesh()
            .disable_mesh()
            .y_labels(0)
            .x_desc(MCC_COLUMN)
            .label_style((font, style.tick_label_size))
            .axis_desc_style((font, style.axis_label_size))
            .draw()
            .map_err(Error::plot)?;

        let violin = style.violin_rgb();
        let outline = chart.outline();
        if outline.is_empty() {
            // No spread to estimate a density from: collapse to a line.
            let x = chart.summary.median;
            cc.draw_series(std::iter::once(PathElement::new(
                vec![(x, -VIOLIN_HALF_WIDTH), (x, VIOLIN_HALF_WIDTH)],
                violin.stroke_width(2),
            )))
            .map_err(Error::plot)?;
        } else {
            cc.draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                violin.mix(0.6).filled(),
            )))
            .map_err(Error::plot)?;

            let mut closed = outline;
            if let Some(&first) = closed.first() {
                closed.push(first);
            }
            cc.draw_series(std::iter::once(PathElement::new(
                closed,
                INNER_COLOR.stroke_width(1),
            )))
            .map_err(Error::plot)?;
        }

        let s = &chart.summary;
        cc.draw_series(std::iter::once(PathElement::new(
            vec![(s.whisker_low, 0.0), (s.whisker_high, 0.0)],
            INNER_COLOR.stroke_width(1),
        )))
        .map_err(Error::plot)?;
        cc.draw_series(std::iter::once(Rectangle::new(
            [(s.q1, -BOX_HALF_HEIGHT), (s.q3, BOX_HALF_HEIGHT)],
            INNER_COLOR.filled(),
        )))
        .map_err(Error::plot)?;
        cc.draw_series(std::iter::once(Circle::new(
            (s.median, 0.0),
            3,
            WHITE.filled(),
        )))
        .map_err(Error::plot)?;

        let threshold = style.threshold_rgb();
        cc.draw_series(
            dash_segments((chart.cutoff, -0.5), (chart.cutoff, 0.5), DASHES)
                .into_iter()
                .map(|seg| PathElement::new(seg.to_vec(), threshold.stroke_width(2))),
        )
        .map_err(Error::plot)?;

        root.present().map_err(Error::plot)?;
        Ok(())
    }

    fn draw_volcano<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &VolcanoChart,
        style: &PlotStyle,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(Error::plot)?;

        let font = style.font_family.as_str();
        let x_range = chart.x_range();
        let mut cc = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), chart.y_range())
            .map_err(Error::plot)?;

        cc.configure_mesh()
            .disable_mesh()
            .x_desc("l2fc")
            .y_desc(chart.table.metric.axis_label())
            .label_style((font, style.tick_label_size))
            .axis_desc_style((font, style.axis_label_size))
            .draw()
            .map_err(Error::plot)?;

        let point = style.point_rgb().mix(0.8).filled();
        cc.draw_series(
            chart
                .table
                .features
                .iter()
                .map(|f| Circle::new((f.l2fc, f.y), style.point_radius, point)),
        )
        .map_err(Error::plot)?;

        if let Some(t) = chart.threshold {
            let threshold = style.threshold_rgb();
            cc.draw_series(
                dash_segments((x_range.start, t), (x_range.end, t), DASHES)
                    .into_iter()
                    .map(|seg| PathElement::new(seg.to_vec(), threshold.stroke_width(2))),
            )
            .map_err(Error::plot)?;

            let text_style = (font, style.annotation_size)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center));
            cc.draw_series(
                chart
                    .labels()
                    .into_iter()
                    .map(|(label, at)| Text::new(label, at, text_style.clone())),
            )
            .map_err(Error::plot)?;
        }

        root.present().map_err(Error::plot)?;
        Ok(())
    }
}
