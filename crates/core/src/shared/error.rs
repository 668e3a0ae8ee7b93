use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqNmsError {
    #[error("unsupported rescoring metric '{0}', expected 'avg' or 'max'")]
    UnknownMetric(String),
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("{what} has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("clip must contain at least one frame")]
    EmptyClip,
    #[error("frame {frame} holds {actual} entries, expected {expected}")]
    RaggedFrame {
        frame: usize,
        expected: usize,
        actual: usize,
    },
}
