use std::collections::BTreeSet;

use crate::linking::domain::linkage_graph::LinkageGraph;
use crate::shared::bbox::pairwise_iou;
use crate::shared::clip::Clip;
use crate::shared::constants::MIN_LINKABLE_CLASS;

/// Links boxes of consecutive frames by IoU and class.
///
/// Box `b` of frame `f` links to box `t` of frame `f + 1` when their IoU is at
/// least the linkage threshold, both carry the same class, and that class is
/// not an ignore label (negative).
pub struct IouLinkageBuilder {
    linkage_threshold: f32,
}

impl IouLinkageBuilder {
    pub fn new(linkage_threshold: f32) -> Self {
        Self { linkage_threshold }
    }

    pub fn build(&self, clip: &Clip) -> LinkageGraph {
        let pairs = clip.frame_count().saturating_sub(1);

        #[cfg(feature = "parallel")]
        let layers: Vec<Vec<BTreeSet<usize>>> = {
            use rayon::prelude::*;
            (0..pairs)
                .into_par_iter()
                .map(|f| self.build_layer(clip, f))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let layers: Vec<Vec<BTreeSet<usize>>> =
            (0..pairs).map(|f| self.build_layer(clip, f)).collect();

        LinkageGraph::new(layers)
    }

    fn build_layer(&self, clip: &Clip, frame: usize) -> Vec<BTreeSet<usize>> {
        let overlaps = pairwise_iou(
            clip.frame_boxes(frame),
            clip.frame_areas(frame),
            clip.frame_boxes(frame + 1),
            clip.frame_areas(frame + 1),
        );
        let sources = clip.frame_classes(frame);
        let targets = clip.frame_classes(frame + 1);

        sources
            .iter()
            .enumerate()
            .map(|(b, &class)| {
                if class < MIN_LINKABLE_CLASS {
                    return BTreeSet::new();
                }
                targets
                    .iter()
                    .enumerate()
                    .filter(|&(t, &target_class)| {
                        target_class == class && overlaps[[b, t]] >= self.linkage_threshold
                    })
                    .map(|(t, _)| t)
                    .collect()
            })
            .collect()
    }
}
