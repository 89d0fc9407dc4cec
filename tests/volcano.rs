use clap::Parser;
use screenviz::cli::{self, VolcanoArgs};
use screenviz::data::Metric;
use std::fs;
use std::path::{Path, PathBuf};

const RESULTS: &str = "id\tkernel_mcc\tt_pv\tl2fc\n\
    ENSG1\t0.95\t0.0001\t3.1\n\
    ENSG2\t0.91\t0.0005\t-2.2\n\
    ENSG3\t0.85\t0.002\t1.7\n\
    ENSG4\t0.80\t0.004\t-1.1\n\
    ENSG5\t0.55\t0.2\t0.4\n\
    ENSG6\t0.30\t0.6\t-0.2\n\
    ENSG7\tNA\t0.01\t2.0\n";

const ANNOTATION: &str = "gene_id\tgene_name\n\
    ENSG1\tTP53\n\
    ENSG2\tMYC\n\
    ENSG3\tEGFR\n\
    ENSG5\tBRCA1\n";

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn args(input: &Path, output: &Path, extra: &[&str]) -> VolcanoArgs {
    let mut argv = vec![
        "volcano".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-o".to_string(),
        output.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    VolcanoArgs::try_parse_from(argv).unwrap()
}

#[test]
fn mcc_volcano_without_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "predictive_capability.xls", RESULTS);
    let out = dir.path().join("out");

    let summary = cli::volcano::run(&args(&input, &out, &[])).unwrap();

    assert_eq!(summary.metric, Metric::Mcc);
    assert_eq!(summary.n_features, 6);
    assert!(summary.hits.is_empty());
    assert_eq!(summary.plot, out.join("volcano_mcc.svg"));
    assert!(summary.plot.is_file());
}

#[test]
fn mcc_volcano_labels_top_hits() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "predictive_capability.xls", RESULTS);
    let out = dir.path().join("out");

    let summary = cli::volcano::run(&args(&input, &out, &["-t", "0.8", "--top", "1"])).unwrap();

    assert_eq!(summary.plot, out.join("volcano_mcc_threshold.svg"));
    assert!(summary.plot.is_file());
    assert_eq!(summary.hits.positive.len(), 1);
    assert_eq!(summary.hits.positive[0].label, "ENSG1");
    assert_eq!(summary.hits.negative.len(), 1);
    assert_eq!(summary.hits.negative[0].label, "ENSG2");

    let svg = fs::read_to_string(&summary.plot).unwrap();
    assert!(svg.contains("ENSG1"));
    assert!(svg.contains("ENSG2"));
}

#[test]
fn pvalue_volcano_with_annotation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "predictive_capability.xls", RESULTS);
    let anno = write(dir.path(), "annotation.tsv", ANNOTATION);
    let anno_arg = anno.display().to_string();
    let out = dir.path().join("out");

    let summary = cli::volcano::run(&args(
        &input,
        &out,
        &["--pvalue", "-t", "2", "--anno", &anno_arg, "--summary"],
    ))
    .unwrap();

    assert_eq!(summary.metric, Metric::PValue);
    assert_eq!(summary.n_features, 4);
    assert_eq!(summary.plot, out.join("volcano_pvalue_threshold.svg"));

    let positive: Vec<&str> = summary.hits.positive.iter().map(|f| f.label.as_str()).collect();
    let negative: Vec<&str> = summary.hits.negative.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(positive, vec!["TP53", "EGFR"]);
    assert_eq!(negative, vec!["MYC"]);

    let json = fs::read_to_string(out.join("volcano_pvalue_threshold.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metric"], "pvalue");
    assert_eq!(value["n_features"], 4);
    assert_eq!(value["hits"]["negative"][0]["label"], "MYC");
}

#[test]
fn png_volcano_honours_style_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "predictive_capability.xls", RESULTS);
    let style = write(dir.path(), "style.json", r#"{"width": 320, "height": 240}"#);
    let style_arg = style.display().to_string();
    let out = dir.path().join("out");

    let summary = cli::volcano::run(&args(
        &input,
        &out,
        &["--pvalue", "-f", "png", "--style", &style_arg],
    ))
    .unwrap();

    assert_eq!(summary.plot, out.join("volcano_pvalue.png"));
    assert!(fs::metadata(&summary.plot).unwrap().len() > 0);
}

#[test]
fn missing_l2fc_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "pc.xls", "id\tkernel_mcc\nENSG1\t0.5\n");

    let err = cli::volcano::run(&args(&input, &dir.path().join("out"), &[])).unwrap_err();
    assert!(err.to_string().contains("l2fc"));
}
