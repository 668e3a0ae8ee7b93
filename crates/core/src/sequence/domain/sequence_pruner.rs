use super::track::Track;
use crate::linking::domain::linkage_graph::LinkageGraph;
use crate::shared::bbox::{box_at, iou};
use crate::shared::clip::Clip;

/// Removes a selected track and its same-frame competitors from the graph.
///
/// At every frame the track covers, each box whose IoU with the track's box
/// reaches `iou_threshold` loses its outgoing edges and every incoming edge
/// from the previous frame. The track's own box is always removed, so each
/// call drops at least the edges the track was built from. Returns the
/// number of edges removed.
pub fn prune_track(
    track: &Track,
    clip: &Clip,
    graph: &mut LinkageGraph,
    iou_threshold: f32,
) -> usize {
    track
        .members()
        .map(|(frame, b)| {
            let suppressed = overlapping_boxes(clip, frame, b, iou_threshold);
            graph.excise(frame, &suppressed)
        })
        .sum()
}

/// Indices of boxes in `frame` overlapping box `index` by at least
/// `iou_threshold`, the box itself included.
pub fn overlapping_boxes(
    clip: &Clip,
    frame: usize,
    index: usize,
    iou_threshold: f32,
) -> Vec<usize> {
    let own = clip.bbox(frame, index);
    let own_area = clip.area(frame, index);
    let boxes = clip.frame_boxes(frame);
    let areas = clip.frame_areas(frame);

    (0..clip.boxes_per_frame())
        .filter(|&i| {
            i == index || iou(&box_at(boxes, i), areas[i], &own, own_area) >= iou_threshold
        })
        .collect()
}
