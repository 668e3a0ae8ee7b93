use ndarray::Array2;

use crate::linking::infrastructure::iou_linkage_builder::IouLinkageBuilder;
use crate::pipeline::suppression_logger::{NullSuppressionLogger, SuppressionLogger};
use crate::sequence::domain::rescorer::{rescore_track, ScoreMetric};
use crate::sequence::domain::sequence_pruner::prune_track;
use crate::sequence::domain::sequence_search::find_best_sequence;
use crate::shared::clip::Clip;
use crate::shared::constants::{DEFAULT_IOU_THRESHOLD, DEFAULT_LINKAGE_THRESHOLD};
use crate::shared::error::SeqNmsError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeqNmsConfig {
    /// Minimum IoU for linking boxes of consecutive frames.
    pub linkage_threshold: f32,
    /// Minimum IoU for suppressing a same-frame competitor of a selected box.
    pub iou_threshold: f32,
    pub metric: ScoreMetric,
}

impl SeqNmsConfig {
    pub fn new(linkage_threshold: f32, iou_threshold: f32, metric: ScoreMetric) -> Self {
        Self {
            linkage_threshold,
            iou_threshold,
            metric,
        }
    }

    pub fn validate(&self) -> Result<(), SeqNmsError> {
        check_unit_range("linkage_threshold", self.linkage_threshold)?;
        check_unit_range("iou_threshold", self.iou_threshold)
    }
}

impl Default for SeqNmsConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_LINKAGE_THRESHOLD,
            DEFAULT_IOU_THRESHOLD,
            ScoreMetric::default(),
        )
    }
}

fn check_unit_range(name: &'static str, value: f32) -> Result<(), SeqNmsError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SeqNmsError::InvalidThreshold { name, value });
    }
    Ok(())
}

/// Seq-NMS over one clip: link → (search → rescore → prune)* → scores.
///
/// The linkage graph is built once. Each round finds the best-scoring track
/// on the current graph and scores, rewrites its members' scores, then cuts
/// it and its overlapping competitors out of the graph. The loop ends at the
/// first round whose best track has fewer than two boxes. Every round
/// removes at least the selected track's own edges, so it always ends.
pub struct SeqNmsUseCase {
    config: SeqNmsConfig,
    builder: IouLinkageBuilder,
    logger: Box<dyn SuppressionLogger>,
}

impl SeqNmsUseCase {
    /// Fails before any work if the configuration is out of range.
    pub fn new(
        config: SeqNmsConfig,
        logger: Option<Box<dyn SuppressionLogger>>,
    ) -> Result<Self, SeqNmsError> {
        config.validate()?;
        Ok(Self {
            config,
            builder: IouLinkageBuilder::new(config.linkage_threshold),
            logger: logger.unwrap_or_else(|| Box::new(NullSuppressionLogger)),
        })
    }

    pub fn config(&self) -> &SeqNmsConfig {
        &self.config
    }

    /// Returns rescored scores with the clip's `F x N` shape. The clip is
    /// left untouched.
    pub fn execute(&mut self, clip: &Clip) -> Array2<f32> {
        let mut graph = self.builder.build(clip);
        log::debug!(
            "linked {} frames x {} boxes: {} edges",
            clip.frame_count(),
            clip.boxes_per_frame(),
            graph.edge_count()
        );

        let mut scores = clip.scores().to_owned();
        let mut iteration = 0;
        loop {
            let track = find_best_sequence(&graph, scores.view());
            if track.len() <= 1 {
                break;
            }
            iteration += 1;

            let new_score = rescore_track(&track, &mut scores, self.config.metric);
            self.logger.track_selected(iteration, &track, new_score);

            let removed = prune_track(&track, clip, &mut graph, self.config.iou_threshold);
            self.logger.edges_pruned(removed);
        }

        self.logger.info(&format!(
            "converged after {iteration} tracks, {} edges left",
            graph.edge_count()
        ));
        self.logger.summary();
        scores
    }
}
