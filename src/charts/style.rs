//! Plot appearance and output file naming.

use crate::data::Metric;
use crate::error::Result;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Image format of a rendered chart.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// File name of the null distribution chart.
pub fn null_distribution_file(format: OutputFormat) -> String {
    format!("null_distribution.{}", format.extension())
}

/// File name of a volcano chart, e.g. `volcano_pvalue_threshold.svg`.
pub fn volcano_file(metric: Metric, with_threshold: bool, format: OutputFormat) -> String {
    let suffix = if with_threshold { "_threshold" } else { "" };
    format!(
        "volcano_{}{}.{}",
        metric.file_tag(),
        suffix,
        format.extension()
    )
}

/// Fonts, sizes and colours shared by both charts.
///
/// Every field has a default, so a style file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub font_family: String,
    pub tick_label_size: f64,
    pub axis_label_size: f64,
    pub title_size: f64,
    pub annotation_size: f64,
    pub width: u32,
    pub height: u32,
    pub point_radius: u32,
    pub point_color: [u8; 3],
    pub violin_color: [u8; 3],
    pub threshold_color: [u8; 3],
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            tick_label_size: 14.0,
            axis_label_size: 16.0,
            title_size: 18.0,
            annotation_size: 12.0,
            width: 640,
            height: 480,
            point_radius: 3,
            point_color: [31, 119, 180],
            violin_color: [31, 119, 180],
            threshold_color: [214, 39, 40],
        }
    }
}

impl PlotStyle {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn point_rgb(&self) -> RGBColor {
        rgb(self.point_color)
    }

    pub fn violin_rgb(&self) -> RGBColor {
        rgb(self.violin_color)
    }

    pub fn threshold_rgb(&self) -> RGBColor {
        rgb(self.threshold_color)
    }
}

fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}
