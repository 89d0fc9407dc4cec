//! Data Processor Module
//! Turns loaded result tables into the values each chart needs: the pooled
//! null distribution of shuffle scores, and the per-feature volcano points.

use crate::data::TsvLoader;
use crate::error::{Error, Result};
use crate::stats::StatsCalculator;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result table written by each shuffle run (tab-separated despite the name).
pub const SHUFFLE_FILE: &str = "predictive_capability.xls";

pub const ID_COLUMN: &str = "id";
pub const MCC_COLUMN: &str = "kernel_mcc";
pub const PVALUE_COLUMN: &str = "t_pv";
pub const L2FC_COLUMN: &str = "l2fc";
pub const GENE_ID_COLUMN: &str = "gene_id";
pub const GENE_NAME_COLUMN: &str = "gene_name";

/// Scores pooled across every shuffle run of a screen.
#[derive(Debug, Clone)]
pub struct NullDistribution {
    pub scores: Vec<f64>,
    pub files: Vec<PathBuf>,
}

impl NullDistribution {
    /// Read `<run>/predictive_capability.xls` for every sub-directory `run` of
    /// `shuffle_dir` and pool their `kernel_mcc` values.
    pub fn from_shuffle_dir(shuffle_dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(shuffle_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                files.push(path.join(SHUFFLE_FILE));
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(Error::NoShuffleRuns(shuffle_dir.display().to_string()));
        }

        for file in &files {
            info!("read: {}", file.display());
        }

        let per_run = files
            .par_iter()
            .map(|file| Self::read_run(file))
            .collect::<Result<Vec<_>>>()?;

        let scores: Vec<f64> = per_run.into_iter().flatten().collect();
        if scores.is_empty() {
            return Err(Error::EmptyDistribution);
        }

        Ok(Self { scores, files })
    }

    fn read_run(file: &Path) -> Result<Vec<f64>> {
        let mut loader = TsvLoader::new();
        loader.load_tsv(file)?;
        loader.drop_incomplete_rows()?;
        debug!("{} complete rows in {}", loader.get_row_count(), file.display());
        let scores = loader
            .float_column(MCC_COLUMN)?
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect();
        Ok(scores)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Significance measure on the volcano y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Kernel Matthews correlation coefficient, plotted as is.
    Mcc,
    /// t-test p-value, plotted as -log10(p).
    PValue,
}

impl Metric {
    pub fn from_pvalue_flag(pvalue: bool) -> Self {
        if pvalue {
            Metric::PValue
        } else {
            Metric::Mcc
        }
    }

    /// Column read from the results table.
    pub fn source_column(&self) -> &'static str {
        match self {
            Metric::Mcc => MCC_COLUMN,
            Metric::PValue => PVALUE_COLUMN,
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Mcc => MCC_COLUMN,
            Metric::PValue => "-log10(pvalue)",
        }
    }

    /// Tag used in output file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            Metric::Mcc => "mcc",
            Metric::PValue => "pvalue",
        }
    }

    fn transform(&self, raw: f64) -> f64 {
        match self {
            Metric::Mcc => raw,
            Metric::PValue => StatsCalculator::neg_log10(raw),
        }
    }
}

/// One point of the volcano plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub label: String,
    pub l2fc: f64,
    pub y: f64,
}

/// Features above a threshold on either side of zero fold change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopHits {
    pub positive: Vec<Feature>,
    pub negative: Vec<Feature>,
}

impl TopHits {
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Volcano points, sorted by descending y.
#[derive(Debug, Clone)]
pub struct VolcanoTable {
    pub metric: Metric,
    pub features: Vec<Feature>,
}

impl VolcanoTable {
    /// Load a results table indexed by `id`, optionally relabelled through an
    /// annotation table mapping `gene_id` to `gene_name`.
    ///
    /// Features missing any value, or missing from the annotation when one is
    /// given, are left out.
    pub fn load(results: &Path, annotation: Option<&Path>, metric: Metric) -> Result<Self> {
        let mut loader = TsvLoader::new();
        loader.load_tsv(results)?;
        loader.drop_incomplete_rows()?;

        let ids = loader.string_column(ID_COLUMN)?;
        let l2fc = loader.float_column(L2FC_COLUMN)?;
        let raw = loader.float_column(metric.source_column())?;

        let gene_names = annotation.map(Self::load_annotation).transpose()?;

        let mut unannotated = 0usize;
        let mut non_finite = 0usize;
        let mut features = Vec::with_capacity(ids.len());

        for ((id, l2fc), raw) in ids.into_iter().zip(l2fc).zip(raw) {
            if l2fc.is_nan() || raw.is_nan() {
                continue;
            }

            let label = match &gene_names {
                Some(names) => match names.get(&id) {
                    Some(name) => name.clone(),
                    None => {
                        unannotated += 1;
                        continue;
                    }
                },
                None => id,
            };

            let y = metric.transform(raw);
            if !y.is_finite() {
                non_finite += 1;
                continue;
            }

            features.push(Feature { label, l2fc, y });
        }

        if unannotated > 0 {
            warn!("{} features have no annotation and are not plotted", unannotated);
        }
        if non_finite > 0 {
            warn!(
                "{} features have a non-finite {} and are not plotted",
                non_finite,
                metric.axis_label()
            );
        }

        features.sort_by(|a, b| b.y.total_cmp(&a.y));

        Ok(Self { metric, features })
    }

    /// Map `gene_id` to `gene_name`; the first occurrence of an id wins.
    fn load_annotation(path: &Path) -> Result<HashMap<String, String>> {
        let mut loader = TsvLoader::new();
        loader.load_tsv(path)?;
        loader.drop_incomplete_rows()?;

        let gene_ids = loader.string_column(GENE_ID_COLUMN)?;
        let gene_names = loader.string_column(GENE_NAME_COLUMN)?;

        let mut map = HashMap::with_capacity(gene_ids.len());
        for (id, name) in gene_ids.into_iter().zip(gene_names) {
            map.entry(id).or_insert(name);
        }
        Ok(map)
    }

    /// Up to `n` features on each side of zero fold change with `y` at or
    /// above `threshold`, highest first.
    pub fn top_hits(&self, threshold: f64, n: usize) -> TopHits {
        let above = |f: &&Feature| f.y >= threshold;
        TopHits {
            positive: self
                .features
                .iter()
                .filter(|f| f.l2fc > 0.0)
                .filter(above)
                .take(n)
                .cloned()
                .collect(),
            negative: self
                .features
                .iter()
                .filter(|f| f.l2fc < 0.0)
                .filter(above)
                .take(n)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
