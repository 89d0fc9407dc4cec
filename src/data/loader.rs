//! TSV Data Loader Module
//! Handles tab-separated file loading and column extraction using Polars.

use crate::error::{Error, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Field values treated as missing, in addition to empty fields.
pub const NULL_TOKENS: [&str; 5] = ["NA", "NaN", "nan", "N/A", ""];

/// Handles TSV file loading with Polars.
pub struct TsvLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for TsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TsvLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a tab-separated file with a header row.
    ///
    /// Column types are inferred from every row, so a late decimal value in a
    /// column of integers widens the column instead of being lost.
    pub fn load_tsv(&mut self, file_path: &Path) -> Result<&DataFrame> {
        self.file_path = Some(file_path.to_path_buf());

        let null_values = NULL_TOKENS.iter().map(|t| (*t).into()).collect();
        let df = LazyCsvReader::new(file_path)
            .with_separator(b'\t')
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()?
            .collect()?;

        debug!(
            "loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.df = Some(df);
        self.get_dataframe()
    }

    /// Drop every row holding a null (or NaN) in any column.
    pub fn drop_incomplete_rows(&mut self) -> Result<usize> {
        let df = self.df.as_ref().ok_or_else(|| self.missing_data())?;
        let mask = complete_row_mask(df)?;
        let filtered = df.filter(&mask)?;
        let dropped = df.height() - filtered.height();
        if dropped > 0 {
            debug!("dropped {} incomplete rows", dropped);
        }
        self.df = Some(filtered);
        Ok(dropped)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Result<&DataFrame> {
        self.df.as_ref().ok_or_else(|| self.missing_data())
    }

    /// Extract a column as floats. Non-numeric cells become NaN.
    pub fn float_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.column(name)?;
        let as_f64 = column.cast(&DataType::Float64)?;
        let unparsed = as_f64.null_count().saturating_sub(column.null_count());
        if unparsed > 0 {
            warn!(
                "{} non-numeric values in column '{}' of {}",
                unparsed,
                name,
                self.source_name()
            );
        }
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Ok(values)
    }

    /// Extract a column as strings. Null cells become empty strings.
    pub fn string_column(&self, name: &str) -> Result<Vec<String>> {
        let column = self.column(name)?;
        let as_str = column.cast(&DataType::String)?;
        let values = as_str
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        Ok(values)
    }

    fn column(&self, name: &str) -> Result<&Column> {
        let df = self.get_dataframe()?;
        df.column(name).map_err(|_| Error::MissingColumn {
            column: name.to_string(),
            source_name: self.source_name(),
            available: self.get_columns().join(", "),
        })
    }

    fn source_name(&self) -> String {
        self.file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<no file>".to_string())
    }

    fn missing_data(&self) -> Error {
        Error::NoData(self.source_name())
    }
}

/// Rows with no null and no NaN in any column.
fn complete_row_mask(df: &DataFrame) -> Result<BooleanChunked> {
    let mut keep = vec![true; df.height()];

    for column in df.get_columns() {
        if column.dtype().is_float() {
            let as_f64 = column.cast(&DataType::Float64)?;
            for (i, v) in as_f64.f64()?.into_iter().enumerate() {
                keep[i] &= v.is_some_and(|x| !x.is_nan());
            }
        } else {
            for (i, v) in column.is_not_null().into_iter().enumerate() {
                keep[i] &= v.unwrap_or(false);
            }
        }
    }

    Ok(BooleanChunked::from_slice("complete".into(), &keep))
}
