//! Sequence non-maximum suppression (Seq-NMS) for per-frame video detections.
//!
//! Boxes that overlap across consecutive frames are linked into tracks. The
//! best tracks are rescored so that every member carries the track's score,
//! and same-frame competitors of a selected track are cut out of further
//! linking.

pub mod shared {
    pub mod bbox;
    pub mod clip;
    pub mod constants;
    pub mod error;
}

pub mod linking {
    pub mod domain {
        pub mod linkage_graph;
    }
    pub mod infrastructure;
}

pub mod sequence {
    pub mod domain {
        pub mod rescorer;
        pub mod sequence_pruner;
        pub mod sequence_search;
        pub mod track;
    }
}

pub mod pipeline {
    pub mod seq_nms_use_case;
    pub mod suppression_logger;
}

use ndarray::{Array2, ArrayView2, ArrayView3};

pub use linking::domain::linkage_graph::LinkageGraph;
pub use pipeline::seq_nms_use_case::{SeqNmsConfig, SeqNmsUseCase};
pub use sequence::domain::rescorer::ScoreMetric;
pub use sequence::domain::track::Track;
pub use shared::clip::Clip;
pub use shared::error::SeqNmsError;

/// Runs Seq-NMS over `F x N x 4` boxes with `F x N` scores and classes.
///
/// Returns rescored scores of the same `F x N` shape. The inputs are copied
/// and never modified. Thresholds are checked before the inputs are.
pub fn run_seq_nms(
    boxes: ArrayView3<'_, f32>,
    scores: ArrayView2<'_, f32>,
    classes: ArrayView2<'_, i32>,
    linkage_threshold: f32,
    iou_threshold: f32,
    metric: ScoreMetric,
) -> Result<Array2<f32>, SeqNmsError> {
    let config = SeqNmsConfig::new(linkage_threshold, iou_threshold, metric);
    let mut use_case = SeqNmsUseCase::new(config, None)?;
    let clip = Clip::from_views(boxes, scores, classes)?;
    Ok(use_case.execute(&clip))
}

/// Same as [`run_seq_nms`], with the metric given by name (`"avg"` or `"max"`).
pub fn run_seq_nms_with_metric_name(
    boxes: ArrayView3<'_, f32>,
    scores: ArrayView2<'_, f32>,
    classes: ArrayView2<'_, i32>,
    linkage_threshold: f32,
    iou_threshold: f32,
    metric: &str,
) -> Result<Array2<f32>, SeqNmsError> {
    let metric = metric.parse::<ScoreMetric>()?;
    run_seq_nms(boxes, scores, classes, linkage_threshold, iou_threshold, metric)
}
