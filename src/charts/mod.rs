//! Charts module - Static chart rendering

mod renderer;
mod style;

pub use renderer::{
    dash_segments, padded_range, StaticChartRenderer, ViolinChart, VolcanoChart,
    NEGATIVE_LABEL_DX, POSITIVE_LABEL_DX,
};
pub use style::{null_distribution_file, volcano_file, OutputFormat, PlotStyle};
