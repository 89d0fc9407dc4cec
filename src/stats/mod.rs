//! Stats module - Quantiles, transforms and density estimates

mod calculator;

pub use calculator::{KernelDensity, StatsCalculator, ViolinSummary, KDE_CUT, KDE_GRID_SIZE};
