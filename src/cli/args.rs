//! Command-line arguments shared by the `efpr` and `volcano` binaries.

use clap::{Args, Parser};
use std::path::{Path, PathBuf};

use crate::charts::{OutputFormat, PlotStyle};
use crate::Result;

/// Number of hits labelled on each side of a volcano plot by default.
pub const DEFAULT_TOP_HITS: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "efpr",
    version,
    about = "Explore a null distribution of shuffle scores and return an eFPR cutoff"
)]
pub struct EfprArgs {
    /// Shuffle directory, one sub-directory per shuffle run
    #[arg(short = 'd', long = "input-dir", value_name = "INPUT_DIR", value_parser = existing_dir)]
    pub input_dir: PathBuf,

    /// Path of directory output
    #[arg(short = 'o', long = "output-dir", value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Percent of eFPR accepted, as a fraction in [0, 1]
    #[arg(short = 'p', long = "percent", value_name = "PERCENT", default_value_t = 0.0001, value_parser = fraction)]
    pub percent: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "volcano",
    version,
    about = "Display a volcano plot of screening results"
)]
pub struct VolcanoArgs {
    /// Path to the predictive_capability.xls results file
    #[arg(short = 'i', long = "input", value_name = "INPUT_FILE", value_parser = existing_file)]
    pub input: PathBuf,

    /// Path of directory output
    #[arg(short = 'o', long = "output-dir", value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Threshold on the plotted y axis; enables hit labelling
    #[arg(short = 't', long = "threshold", value_name = "THRESHOLD")]
    pub threshold: Option<f64>,

    /// Annotation table mapping gene_id to gene_name, used as feature labels
    #[arg(long = "anno", value_name = "ANNO", value_parser = existing_file)]
    pub anno: Option<PathBuf>,

    /// Display volcano using -log10(pvalue) instead of MCC
    #[arg(long = "pvalue", default_value_t = false)]
    pub pvalue: bool,

    /// Number of hits labelled on each side of zero fold change
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_HITS)]
    pub top: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options shared by both tools.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Image format of the plot
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// JSON file overriding plot fonts, sizes and colours
    #[arg(long, value_name = "STYLE", value_parser = existing_file)]
    pub style: Option<PathBuf>,

    /// Also write a JSON summary next to the plot
    #[arg(long, default_value_t = false)]
    pub summary: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl OutputArgs {
    pub fn load_style(&self) -> Result<PlotStyle> {
        match &self.style {
            Some(path) => PlotStyle::from_json_file(path),
            None => Ok(PlotStyle::default()),
        }
    }
}

fn absolute(p: &str) -> std::result::Result<PathBuf, String> {
    std::path::absolute(Path::new(p)).map_err(|e| e.to_string())
}

/// Accept an existing directory, made absolute.
pub fn existing_dir(p: &str) -> std::result::Result<PathBuf, String> {
    let path = absolute(p)?;
    if !path.exists() {
        return Err(format!("The path {} does not exist!", path.display()));
    }
    if !path.is_dir() {
        return Err(format!("The path {} is not a directory!", path.display()));
    }
    Ok(path)
}

/// Accept an existing file, made absolute.
pub fn existing_file(p: &str) -> std::result::Result<PathBuf, String> {
    let path = absolute(p)?;
    if !path.exists() {
        return Err(format!("The file {} does not exist!", path.display()));
    }
    if !path.is_file() {
        return Err(format!("The path {} is not a file!", path.display()));
    }
    Ok(path)
}

/// Accept a number in [0, 1].
pub fn fraction(s: &str) -> std::result::Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("{s} is not a number"))?;
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("{s} is not between 0 and 1"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;

    #[test]
    fn commands_are_well_formed() {
        EfprArgs::command().debug_assert();
        VolcanoArgs::command().debug_assert();
    }

    #[test]
    fn efpr_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().to_str().unwrap();
        let args = EfprArgs::try_parse_from(["efpr", "-d", d, "-o", "out"]).unwrap();

        assert_eq!(args.percent, 0.0001);
        assert_eq!(args.output.format, OutputFormat::Svg);
        assert!(args.input_dir.is_absolute());
        assert!(!args.output.summary);
    }

    #[test]
    fn efpr_rejects_missing_dir_and_bad_percent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let missing = missing.to_str().unwrap();
        let err = EfprArgs::try_parse_from(["efpr", "-d", missing, "-o", "out"]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let d = dir.path().to_str().unwrap();
        assert!(EfprArgs::try_parse_from(["efpr", "-d", d, "-o", "out", "-p", "2"]).is_err());
    }

    #[test]
    fn volcano_flags() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pc.xls");
        fs::write(&input, "id\tl2fc\tkernel_mcc\n").unwrap();
        let i = input.to_str().unwrap();

        let args = VolcanoArgs::try_parse_from([
            "volcano", "-i", i, "-o", "out", "-t", "0.5", "--pvalue", "-f", "png",
        ])
        .unwrap();

        assert_eq!(args.threshold, Some(0.5));
        assert!(args.pvalue);
        assert!(args.anno.is_none());
        assert_eq!(args.top, DEFAULT_TOP_HITS);
        assert_eq!(args.output.format, OutputFormat::Png);

        let err = VolcanoArgs::try_parse_from(["volcano", "-i", i, "-o", "out", "--anno", "x.tsv"])
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn fraction_bounds() {
        assert_eq!(fraction("0.05"), Ok(0.05));
        assert_eq!(fraction("0"), Ok(0.0));
        assert_eq!(fraction("1"), Ok(1.0));
        assert!(fraction("-0.1").is_err());
        assert!(fraction("abc").is_err());
    }
}
