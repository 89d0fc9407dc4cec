//! screenviz - eFPR cutoff and volcano plots for screening results
//!
//! Loads tab-separated result tables produced by a screening pipeline,
//! derives thresholds and plotted columns, and renders static charts.
//! The `efpr` and `volcano` binaries are thin wrappers over [`cli`].

pub mod charts;
pub mod cli;
pub mod data;
pub mod error;
pub mod stats;

pub use error::{Error, Result};
