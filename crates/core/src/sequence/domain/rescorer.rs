use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use super::track::Track;
use crate::shared::error::SeqNmsError;

/// Rule for the score written back to every member of a selected track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScoreMetric {
    /// Cumulative track score divided by track length.
    #[default]
    Avg,
    /// Highest current member score.
    Max,
}

impl FromStr for ScoreMetric {
    type Err = SeqNmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Self::Avg),
            "max" => Ok(Self::Max),
            other => Err(SeqNmsError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for ScoreMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avg => f.write_str("avg"),
            Self::Max => f.write_str("max"),
        }
    }
}

/// Overwrites the score of every track member and returns the value written.
///
/// For [`ScoreMetric::Max`] the maximum is taken over member scores before
/// any of them is overwritten. An empty track leaves `scores` untouched.
pub fn rescore_track(track: &Track, scores: &mut Array2<f32>, metric: ScoreMetric) -> f32 {
    if track.is_empty() {
        return 0.0;
    }

    let new_score = match metric {
        ScoreMetric::Avg => track.score / track.len() as f32,
        ScoreMetric::Max => track.members().fold(0.0, |best, (f, b)| {
            let s = scores[[f, b]];
            if s > best {
                s
            } else {
                best
            }
        }),
    };

    for (f, b) in track.members() {
        scores[[f, b]] = new_score;
    }
    new_score
}
