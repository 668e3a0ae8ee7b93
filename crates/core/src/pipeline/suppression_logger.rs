use std::time::Instant;

use crate::sequence::domain::track::Track;

/// Observer for suppression-loop events.
///
/// Keeps the driver independent of where diagnostics go (log crate,
/// a host's own reporting, nowhere).
pub trait SuppressionLogger: Send {
    /// A track was selected and its members rescored to `new_score`.
    fn track_selected(&mut self, iteration: usize, track: &Track, new_score: f32);

    /// Pruning after the latest selection removed `count` edges.
    fn edges_pruned(&mut self, count: usize);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSuppressionLogger;

impl SuppressionLogger for NullSuppressionLogger {
    fn track_selected(&mut self, _iteration: usize, _track: &Track, _new_score: f32) {}
    fn edges_pruned(&mut self, _count: usize) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger backed by the `log` crate that also keeps run totals for a
/// closing summary.
pub struct LogSuppressionLogger {
    start_time: Instant,
    tracks: usize,
    rescored_boxes: usize,
    longest_track: usize,
    pruned_edges: usize,
    messages: Vec<String>,
}

impl LogSuppressionLogger {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            tracks: 0,
            rescored_boxes: 0,
            longest_track: 0,
            pruned_edges: 0,
            messages: Vec::new(),
        }
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    pub fn rescored_boxes(&self) -> usize {
        self.rescored_boxes
    }

    pub fn pruned_edges(&self) -> usize {
        self.pruned_edges
    }

    /// Returns the formatted summary string, or `None` if no track was selected.
    pub fn summary_string(&self) -> Option<String> {
        if self.tracks == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let avg_len = self.rescored_boxes as f64 / self.tracks as f64;
        let lines = [
            format!("Seq-NMS summary ({elapsed_ms:.1}ms):"),
            format!("  tracks selected : {}", self.tracks),
            format!("  boxes rescored  : {}", self.rescored_boxes),
            format!(
                "  track length    : avg {avg_len:.1}, max {}",
                self.longest_track
            ),
            format!("  edges pruned    : {}", self.pruned_edges),
        ];
        Some(lines.join("\n"))
    }
}

impl Default for LogSuppressionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SuppressionLogger for LogSuppressionLogger {
    fn track_selected(&mut self, iteration: usize, track: &Track, new_score: f32) {
        self.tracks += 1;
        self.rescored_boxes += track.len();
        self.longest_track = self.longest_track.max(track.len());
        log::debug!(
            "iteration {iteration}: track of {} boxes from frame {} (sum {:.4}) rescored to {new_score:.4}",
            track.len(),
            track.start_frame,
            track.score
        );
    }

    fn edges_pruned(&mut self, count: usize) {
        self.pruned_edges += count;
        log::trace!("pruned {count} edges");
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullSuppressionLogger;
        logger.track_selected(1, &Track::new(0, vec![0, 1], 1.0), 0.5);
        logger.edges_pruned(3);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_counts_tracks_and_boxes() {
        let mut logger = LogSuppressionLogger::new();
        logger.track_selected(1, &Track::new(0, vec![0, 1, 2], 1.2), 0.4);
        logger.track_selected(2, &Track::new(3, vec![1, 1], 0.8), 0.4);
        logger.edges_pruned(5);
        logger.edges_pruned(2);

        assert_eq!(logger.tracks(), 2);
        assert_eq!(logger.rescored_boxes(), 5);
        assert_eq!(logger.pruned_edges(), 7);
        assert_eq!(logger.longest_track, 3);
    }

    #[test]
    fn test_summary_contents() {
        let mut logger = LogSuppressionLogger::new();
        logger.track_selected(1, &Track::new(0, vec![0, 1, 2], 1.2), 0.4);
        logger.track_selected(2, &Track::new(3, vec![1, 1], 0.8), 0.4);
        logger.edges_pruned(4);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Seq-NMS summary"));
        assert!(summary.contains("tracks selected : 2"));
        assert!(summary.contains("avg 2.5, max 3"));
        assert!(summary.contains("edges pruned    : 4"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogSuppressionLogger::default();
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogSuppressionLogger::new();
        logger.info("graph built");
        assert_eq!(logger.messages, vec!["graph built".to_string()]);
    }
}
