/// A chain of linked boxes over consecutive frames.
///
/// `boxes[i]` is the box index in frame `start_frame + i`. `score` is the
/// cumulative score of the members at the time the track was found.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub start_frame: usize,
    pub boxes: Vec<usize>,
    pub score: f32,
}

impl Track {
    pub fn new(start_frame: usize, boxes: Vec<usize>, score: f32) -> Self {
        Self {
            start_frame,
            boxes,
            score,
        }
    }

    /// The "nothing found" result: no boxes, zero score.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Last frame covered, or `None` for an empty track.
    pub fn end_frame(&self) -> Option<usize> {
        (!self.boxes.is_empty()).then(|| self.start_frame + self.boxes.len() - 1)
    }

    /// `(frame, box_index)` pairs in chronological order.
    pub fn members(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .map(move |(offset, &b)| (self.start_frame + offset, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_track() {
        let track = Track::empty();
        assert!(track.is_empty());
        assert_eq!(track.start_frame, 0);
        assert_eq!(track.score, 0.0);
        assert_eq!(track.end_frame(), None);
        assert_eq!(track.members().count(), 0);
    }

    #[test]
    fn test_members_are_offset_by_start_frame() {
        let track = Track::new(2, vec![4, 0, 1], 1.5);
        let members: Vec<_> = track.members().collect();
        assert_eq!(members, vec![(2, 4), (3, 0), (4, 1)]);
        assert_eq!(track.end_frame(), Some(4));
        assert_eq!(track.len(), 3);
    }
}
