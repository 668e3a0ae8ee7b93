//! Axis-aligned box geometry shared by graph construction and pruning.
//!
//! Boxes are `[x_min, y_min, x_max, y_max]`. Coordinates are taken as-is:
//! inverted boxes produce a negative area rather than an error.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3};

use super::constants::IOU_EPSILON;

pub type BBox = [f32; 4];

pub fn area(b: &BBox) -> f32 {
    (b[2] - b[0]) * (b[3] - b[1])
}

/// IoU between two boxes whose areas are already known.
///
/// The denominator is guarded by [`IOU_EPSILON`], so two degenerate boxes
/// give 0 rather than NaN.
pub fn iou(a: &BBox, area_a: f32, b: &BBox, area_b: f32) -> f32 {
    let inter_w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let inter_h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let inter = inter_w * inter_h;
    inter / (area_a + area_b - inter + IOU_EPSILON)
}

/// Reads row `i` of an `N x 4` box array.
pub fn box_at(boxes: ArrayView2<'_, f32>, i: usize) -> BBox {
    [boxes[[i, 0]], boxes[[i, 1]], boxes[[i, 2]], boxes[[i, 3]]]
}

/// Areas of an `N x 4` box array.
pub fn areas(boxes: ArrayView2<'_, f32>) -> Array1<f32> {
    Array1::from_shape_fn(boxes.nrows(), |i| area(&box_at(boxes, i)))
}

/// Areas of an `F x N x 4` box array, shape `F x N`.
pub fn clip_areas(boxes: ArrayView3<'_, f32>) -> Array2<f32> {
    let (frames, n, _) = boxes.dim();
    Array2::from_shape_fn((frames, n), |(f, b)| {
        (boxes[[f, b, 2]] - boxes[[f, b, 0]]) * (boxes[[f, b, 3]] - boxes[[f, b, 1]])
    })
}

/// All-pairs IoU, shape `N x M`, between the rows of `boxes_a` and `boxes_b`.
pub fn pairwise_iou(
    boxes_a: ArrayView2<'_, f32>,
    areas_a: ArrayView1<'_, f32>,
    boxes_b: ArrayView2<'_, f32>,
    areas_b: ArrayView1<'_, f32>,
) -> Array2<f32> {
    Array2::from_shape_fn((boxes_a.nrows(), boxes_b.nrows()), |(i, j)| {
        iou(
            &box_at(boxes_a, i),
            areas_a[i],
            &box_at(boxes_b, j),
            areas_b[j],
        )
    })
}
