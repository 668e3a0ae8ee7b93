use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};

use super::bbox::{clip_areas, BBox};
use super::error::SeqNmsError;

/// Detections for a whole clip: `F` frames of `N` boxes each.
///
/// Holds private copies of boxes, scores and classes, so running
/// suppression never touches the caller's arrays. Box areas are
/// computed once at construction.
#[derive(Clone, Debug)]
pub struct Clip {
    boxes: Array3<f32>,
    scores: Array2<f32>,
    classes: Array2<i32>,
    areas: Array2<f32>,
}

impl Clip {
    /// Takes ownership of `F x N x 4` boxes, `F x N` scores and `F x N` classes.
    ///
    /// Scores are expected to be non-negative. Negative values are accepted
    /// but can never win a sequence search, so they are reported with a warning.
    pub fn new(
        boxes: Array3<f32>,
        scores: Array2<f32>,
        classes: Array2<i32>,
    ) -> Result<Self, SeqNmsError> {
        let (frames, n, coords) = boxes.dim();
        if coords != 4 {
            return Err(SeqNmsError::ShapeMismatch {
                what: "boxes",
                expected: vec![frames, n, 4],
                actual: boxes.shape().to_vec(),
            });
        }
        if frames == 0 {
            return Err(SeqNmsError::EmptyClip);
        }
        check_shape("scores", scores.shape(), frames, n)?;
        check_shape("classes", classes.shape(), frames, n)?;

        if scores.iter().any(|&s| s < 0.0) {
            log::warn!("clip contains negative scores; those boxes will never seed a sequence");
        }

        let areas = clip_areas(boxes.view());
        Ok(Self {
            boxes,
            scores,
            classes,
            areas,
        })
    }

    /// Copies borrowed arrays into a new clip.
    pub fn from_views(
        boxes: ArrayView3<'_, f32>,
        scores: ArrayView2<'_, f32>,
        classes: ArrayView2<'_, i32>,
    ) -> Result<Self, SeqNmsError> {
        Self::new(boxes.to_owned(), scores.to_owned(), classes.to_owned())
    }

    /// Builds a clip from per-frame lists. Every frame must hold as many
    /// entries as frame 0.
    pub fn from_frames(
        boxes: Vec<Vec<BBox>>,
        scores: Vec<Vec<f32>>,
        classes: Vec<Vec<i32>>,
    ) -> Result<Self, SeqNmsError> {
        let frames = boxes.len();
        if frames == 0 {
            return Err(SeqNmsError::EmptyClip);
        }
        if scores.len() != frames {
            return Err(SeqNmsError::ShapeMismatch {
                what: "scores",
                expected: vec![frames],
                actual: vec![scores.len()],
            });
        }
        if classes.len() != frames {
            return Err(SeqNmsError::ShapeMismatch {
                what: "classes",
                expected: vec![frames],
                actual: vec![classes.len()],
            });
        }

        let n = boxes[0].len();
        for f in 0..frames {
            for actual in [boxes[f].len(), scores[f].len(), classes[f].len()] {
                if actual != n {
                    return Err(SeqNmsError::RaggedFrame {
                        frame: f,
                        expected: n,
                        actual,
                    });
                }
            }
        }

        let flat_boxes: Vec<f32> = boxes.into_iter().flatten().flatten().collect();
        let flat_scores: Vec<f32> = scores.into_iter().flatten().collect();
        let flat_classes: Vec<i32> = classes.into_iter().flatten().collect();

        Self::new(
            Array3::from_shape_vec((frames, n, 4), flat_boxes).map_err(|_| shape_error(frames, n))?,
            Array2::from_shape_vec((frames, n), flat_scores).map_err(|_| shape_error(frames, n))?,
            Array2::from_shape_vec((frames, n), flat_classes)
                .map_err(|_| shape_error(frames, n))?,
        )
    }

    pub fn frame_count(&self) -> usize {
        self.boxes.dim().0
    }

    pub fn boxes_per_frame(&self) -> usize {
        self.boxes.dim().1
    }

    pub fn boxes(&self) -> ArrayView3<'_, f32> {
        self.boxes.view()
    }

    pub fn scores(&self) -> ArrayView2<'_, f32> {
        self.scores.view()
    }

    pub fn classes(&self) -> ArrayView2<'_, i32> {
        self.classes.view()
    }

    pub fn areas(&self) -> ArrayView2<'_, f32> {
        self.areas.view()
    }

    /// Boxes of one frame, shape `N x 4`.
    pub fn frame_boxes(&self, frame: usize) -> ArrayView2<'_, f32> {
        self.boxes.index_axis(Axis(0), frame)
    }

    pub fn frame_areas(&self, frame: usize) -> ArrayView1<'_, f32> {
        self.areas.row(frame)
    }

    pub fn frame_classes(&self, frame: usize) -> ArrayView1<'_, i32> {
        self.classes.row(frame)
    }

    pub fn bbox(&self, frame: usize, index: usize) -> BBox {
        let b = self.boxes.slice(ndarray::s![frame, index, ..]);
        [b[0], b[1], b[2], b[3]]
    }

    pub fn area(&self, frame: usize, index: usize) -> f32 {
        self.areas[[frame, index]]
    }
}

fn check_shape(
    what: &'static str,
    actual: &[usize],
    frames: usize,
    n: usize,
) -> Result<(), SeqNmsError> {
    if actual != [frames, n] {
        return Err(SeqNmsError::ShapeMismatch {
            what,
            expected: vec![frames, n],
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn shape_error(frames: usize, n: usize) -> SeqNmsError {
    SeqNmsError::ShapeMismatch {
        what: "clip",
        expected: vec![frames, n],
        actual: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr2, Array2, Array3};

    fn two_frame_clip() -> Clip {
        Clip::from_frames(
            vec![
                vec![[1.0, 2.0, 3.0, 4.0], [10.0, 10.0, 20.0, 20.0]],
                vec![[1.0, 2.0, 2.0, 3.0], [20.0, 20.0, 30.0, 30.0]],
            ],
            vec![vec![0.5, 0.4], vec![0.3, 0.2]],
            vec![vec![0, 0], vec![0, -1]],
        )
        .unwrap()
    }

    #[test]
    fn test_from_frames_shapes_and_accessors() {
        let clip = two_frame_clip();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.boxes_per_frame(), 2);
        assert_eq!(clip.bbox(1, 0), [1.0, 2.0, 2.0, 3.0]);
        assert_eq!(clip.frame_boxes(0).dim(), (2, 4));
        assert_eq!(clip.frame_classes(1)[1], -1);
        assert_relative_eq!(clip.scores()[[0, 1]], 0.4);
    }

    #[test]
    fn test_areas_precomputed() {
        let clip = two_frame_clip();
        assert_relative_eq!(clip.area(0, 0), 4.0);
        assert_relative_eq!(clip.area(0, 1), 100.0);
        assert_relative_eq!(clip.frame_areas(1)[0], 1.0);
    }

    #[test]
    fn test_from_views_copies_input() {
        let boxes = Array3::<f32>::zeros((1, 2, 4));
        let scores = arr2(&[[0.1_f32, 0.2]]);
        let classes = arr2(&[[0, 1]]);
        let clip = Clip::from_views(boxes.view(), scores.view(), classes.view()).unwrap();
        assert_eq!(clip.scores(), scores.view());
    }

    #[test]
    fn test_zero_boxes_per_frame_is_valid() {
        let clip = Clip::new(
            Array3::zeros((3, 0, 4)),
            Array2::zeros((3, 0)),
            Array2::zeros((3, 0)),
        )
        .unwrap();
        assert_eq!(clip.frame_count(), 3);
        assert_eq!(clip.boxes_per_frame(), 0);
    }

    #[test]
    fn test_empty_clip_rejected() {
        let result = Clip::new(
            Array3::zeros((0, 2, 4)),
            Array2::zeros((0, 2)),
            Array2::zeros((0, 2)),
        );
        assert_eq!(result.unwrap_err(), SeqNmsError::EmptyClip);
        let result = Clip::from_frames(vec![], vec![], vec![]);
        assert_eq!(result.unwrap_err(), SeqNmsError::EmptyClip);
    }

    #[test]
    fn test_box_coordinate_count_checked() {
        let result = Clip::new(
            Array3::zeros((1, 2, 3)),
            Array2::zeros((1, 2)),
            Array2::zeros((1, 2)),
        );
        assert!(matches!(
            result,
            Err(SeqNmsError::ShapeMismatch { what: "boxes", .. })
        ));
    }

    #[test]
    fn test_score_shape_mismatch_rejected() {
        let result = Clip::new(
            Array3::zeros((2, 2, 4)),
            Array2::zeros((2, 3)),
            Array2::zeros((2, 2)),
        );
        assert_eq!(
            result.unwrap_err(),
            SeqNmsError::ShapeMismatch {
                what: "scores",
                expected: vec![2, 2],
                actual: vec![2, 3],
            }
        );
    }

    #[test]
    fn test_class_shape_mismatch_rejected() {
        let result = Clip::new(
            Array3::zeros((2, 2, 4)),
            Array2::zeros((2, 2)),
            Array2::zeros((1, 2)),
        );
        assert!(matches!(
            result,
            Err(SeqNmsError::ShapeMismatch { what: "classes", .. })
        ));
    }

    #[test]
    fn test_ragged_frame_rejected() {
        let result = Clip::from_frames(
            vec![vec![[0.0, 0.0, 1.0, 1.0]], vec![]],
            vec![vec![0.5], vec![]],
            vec![vec![0], vec![]],
        );
        assert_eq!(
            result.unwrap_err(),
            SeqNmsError::RaggedFrame {
                frame: 1,
                expected: 1,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_frame_list_length_mismatch_rejected() {
        let result = Clip::from_frames(
            vec![vec![[0.0, 0.0, 1.0, 1.0]]],
            vec![vec![0.5], vec![0.5]],
            vec![vec![0]],
        );
        assert!(matches!(
            result,
            Err(SeqNmsError::ShapeMismatch { what: "scores", .. })
        ));
    }
}
