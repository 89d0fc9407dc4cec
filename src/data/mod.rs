//! Data module - TSV loading and processing

mod loader;
mod processor;

pub use loader::{TsvLoader, NULL_TOKENS};
pub use processor::{
    Feature, Metric, NullDistribution, TopHits, VolcanoTable, GENE_ID_COLUMN, GENE_NAME_COLUMN,
    ID_COLUMN, L2FC_COLUMN, MCC_COLUMN, PVALUE_COLUMN, SHUFFLE_FILE,
};
