use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde::{Deserialize, Serialize};

use seqnms_core::pipeline::seq_nms_use_case::{SeqNmsConfig, SeqNmsUseCase};
use seqnms_core::pipeline::suppression_logger::{LogSuppressionLogger, SuppressionLogger};
use seqnms_core::sequence::domain::rescorer::ScoreMetric;
use seqnms_core::shared::bbox::BBox;
use seqnms_core::shared::clip::Clip;
use seqnms_core::shared::constants::{DEFAULT_IOU_THRESHOLD, DEFAULT_LINKAGE_THRESHOLD};

/// Rescore per-frame video detections with sequence non-maximum suppression.
///
/// Reads a JSON document `{"boxes": [...], "scores": [...], "classes": [...]}`
/// holding `F x N x 4` boxes and `F x N` scores and classes. Writes
/// `{"scores": [...]}` with the rescored `F x N` scores.
#[derive(Parser)]
#[command(name = "seq-nms")]
struct Cli {
    /// Input detections (JSON).
    input: PathBuf,

    /// Output file for rescored scores (stdout when omitted).
    output: Option<PathBuf>,

    /// Minimum IoU for linking boxes in consecutive frames (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_LINKAGE_THRESHOLD)]
    linkage_threshold: f32,

    /// Minimum IoU for suppressing boxes that overlap a selected track (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_IOU_THRESHOLD)]
    iou_threshold: f32,

    /// Rescoring metric: avg or max.
    #[arg(long, default_value = "avg")]
    metric: String,

    /// Log every selected track and a run summary.
    #[arg(long)]
    summary: bool,
}

#[derive(Deserialize)]
struct Detections {
    boxes: Vec<Vec<BBox>>,
    scores: Vec<Vec<f32>>,
    classes: Vec<Vec<i32>>,
}

#[derive(Serialize)]
struct Rescored {
    scores: Vec<Vec<f32>>,
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.summary { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;

    let config = SeqNmsConfig::new(
        cli.linkage_threshold,
        cli.iou_threshold,
        cli.metric.parse::<ScoreMetric>()?,
    );
    let logger: Option<Box<dyn SuppressionLogger>> = if cli.summary {
        Some(Box::new(LogSuppressionLogger::new()))
    } else {
        None
    };
    let mut use_case = SeqNmsUseCase::new(config, logger)?;

    let clip = read_clip(&cli.input)?;
    log::info!(
        "Rescoring {} frames x {} boxes ({}, linkage {}, iou {})",
        clip.frame_count(),
        clip.boxes_per_frame(),
        config.metric,
        config.linkage_threshold,
        config.iou_threshold
    );
    let scores = use_case.execute(&clip);

    let rescored = Rescored {
        scores: scores.outer_iter().map(|row| row.to_vec()).collect(),
    };
    write_scores(&rescored, cli.output.as_deref())
}

fn read_clip(path: &Path) -> Result<Clip, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let detections: Detections = serde_json::from_str(&text)?;
    Ok(Clip::from_frames(
        detections.boxes,
        detections.scores,
        detections.classes,
    )?)
}

fn write_scores(
    rescored: &Rescored,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            let file = fs::File::create(path)?;
            serde_json::to_writer(file, rescored)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, rescored)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !(0.0..=1.0).contains(&cli.linkage_threshold) {
        return Err(format!(
            "Linkage threshold must be between 0.0 and 1.0, got {}",
            cli.linkage_threshold
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.iou_threshold) {
        return Err(format!(
            "IoU threshold must be between 0.0 and 1.0, got {}",
            cli.iou_threshold
        )
        .into());
    }
    if cli.metric != "avg" && cli.metric != "max" {
        return Err(format!("Metric must be 'avg' or 'max', got '{}'", cli.metric).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DETECTIONS: &str = r#"{
        "boxes": [
            [[0, 0, 10, 10], [1, 0, 11, 10]],
            [[1, 0, 11, 10], [2, 0, 12, 10]],
            [[2, 0, 12, 10], [3, 0, 13, 10]]
        ],
        "scores": [[0.9, 0.6], [0.8, 0.5], [0.7, 0.4]],
        "classes": [[0, 0], [0, 0], [0, 0]]
    }"#;

    fn cli_for(input: PathBuf, output: Option<PathBuf>) -> Cli {
        Cli {
            input,
            output,
            linkage_threshold: 0.5,
            iou_threshold: 0.5,
            metric: "avg".to_string(),
            summary: false,
        }
    }

    fn write_input(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("detections.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, DETECTIONS);
        let output = dir.path().join("rescored.json");

        run(cli_for(input, Some(output.clone()))).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let scores = written["scores"].as_array().unwrap();
        assert_eq!(scores.len(), 3);
        for (f, row) in scores.iter().enumerate() {
            let row = row.as_array().unwrap();
            assert_eq!(row.len(), 2);
            assert_relative_eq!(row[0].as_f64().unwrap(), 0.8, epsilon = 1e-6);
            let duplicate = [0.6, 0.5, 0.4][f];
            assert_relative_eq!(row[1].as_f64().unwrap(), duplicate, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ragged_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            &dir,
            r#"{"boxes": [[[0, 0, 1, 1]], []], "scores": [[0.5], []], "classes": [[0], []]}"#,
        );
        let err = run(cli_for(input, None)).unwrap_err();
        assert!(err.to_string().contains("frame 1"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "{\"boxes\": ");
        assert!(read_clip(&input).is_err());
    }

    #[test]
    fn test_missing_input_rejected() {
        let cli = cli_for(PathBuf::from("/nonexistent/detections.json"), None);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Input file not found"));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = cli_for(write_input(&dir, DETECTIONS), None);
        cli.iou_threshold = 1.5;
        let err = validate(&cli).unwrap_err();
        assert_eq!(err.to_string(), "IoU threshold must be between 0.0 and 1.0, got 1.5");
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = cli_for(write_input(&dir, DETECTIONS), None);
        cli.metric = "median".to_string();
        let err = validate(&cli).unwrap_err();
        assert_eq!(err.to_string(), "Metric must be 'avg' or 'max', got 'median'");
    }

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["seq-nms", "in.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert!(cli.output.is_none());
        assert_relative_eq!(cli.linkage_threshold, DEFAULT_LINKAGE_THRESHOLD);
        assert_relative_eq!(cli.iou_threshold, DEFAULT_IOU_THRESHOLD);
        assert_eq!(cli.metric, "avg");
        assert!(!cli.summary);
    }
}
