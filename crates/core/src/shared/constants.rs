/// Minimum IoU for linking boxes in consecutive frames.
pub const DEFAULT_LINKAGE_THRESHOLD: f32 = 0.3;

/// Minimum IoU for treating two same-frame boxes as the same object.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.2;

/// Added to the IoU denominator so two degenerate boxes yield 0 instead of NaN.
pub const IOU_EPSILON: f32 = 1e-16;

/// Class labels below this value mark a box as ineligible for linkage.
pub const MIN_LINKABLE_CLASS: i32 = 0;
