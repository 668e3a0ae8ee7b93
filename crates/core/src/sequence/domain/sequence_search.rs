//! Highest-scoring track search over a linkage graph.
//!
//! A backward dynamic-programming pass computes, for every box, the best
//! chain starting at that box. Only boxes without a surviving incoming edge
//! (sequence roots) are candidates for the answer: any other box is the
//! interior of a chain that already extends further back.
//!
//! Scores must be non-negative. With that precondition, extending along an
//! edge never lowers a chain's total, so a box with outgoing edges always
//! extends through its best successor.

use ndarray::ArrayView2;

use super::track::Track;
use crate::linking::domain::linkage_graph::LinkageGraph;

/// A box that no surviving edge from the previous frame reaches.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRoot {
    pub box_index: usize,
    /// Cumulative score of the best chain starting at this box.
    pub score: f32,
}

impl SequenceRoot {
    pub fn new(box_index: usize, score: f32) -> Self {
        Self { box_index, score }
    }
}

/// Best chain starting at one box: its total and the successor it goes through.
#[derive(Clone, Copy, Debug)]
struct ChainHead {
    score: f32,
    next: Option<usize>,
}

/// Finds the track with the highest cumulative score.
///
/// Recomputed from scratch on every call; the graph and scores are read-only
/// snapshots. Returns [`Track::empty`] when no chain scores above zero.
pub fn find_best_sequence(graph: &LinkageGraph, scores: ArrayView2<'_, f32>) -> Track {
    if scores.nrows() == 0 {
        return Track::empty();
    }
    debug_assert_eq!(graph.layer_count(), scores.nrows() - 1);

    let (heads, roots) = backward_pass(graph, scores);
    match select_best_root(&roots) {
        Some((frame, root)) => {
            let boxes = follow_chain(&heads, frame, root.box_index);
            Track::new(frame, boxes, root.score)
        }
        None => Track::empty(),
    }
}

/// Picks the best root across frames, scanning chronologically.
///
/// Within a frame the first maximum wins; across frames a later candidate
/// must be strictly better, starting from a floor of 0.0. Returns the
/// root's frame alongside it.
pub fn select_best_root(roots: &[Vec<SequenceRoot>]) -> Option<(usize, &SequenceRoot)> {
    let mut best_score = 0.0;
    let mut best = None;

    for (frame, candidates) in roots.iter().enumerate() {
        let Some(top) = first_max(candidates) else {
            continue;
        };
        if top.score > best_score {
            best_score = top.score;
            best = Some((frame, top));
        }
    }

    best
}

fn first_max(candidates: &[SequenceRoot]) -> Option<&SequenceRoot> {
    candidates.iter().fold(None, |acc, candidate| match acc {
        Some(current) if candidate.score <= current.score => Some(current),
        _ => Some(candidate),
    })
}

/// Walks frames from last to first, building per-box chain heads and
/// recording roots for each frame.
fn backward_pass(
    graph: &LinkageGraph,
    scores: ArrayView2<'_, f32>,
) -> (Vec<Vec<ChainHead>>, Vec<Vec<SequenceRoot>>) {
    let frames = scores.nrows();
    let last = frames - 1;
    let mut heads: Vec<Vec<ChainHead>> = vec![Vec::new(); frames];
    let mut roots: Vec<Vec<SequenceRoot>> = vec![Vec::new(); frames];

    heads[last] = scores
        .row(last)
        .iter()
        .map(|&score| ChainHead { score, next: None })
        .collect();

    for f in (0..last).rev() {
        let successors = &heads[f + 1];
        let mut consumed = vec![false; successors.len()];

        let current: Vec<ChainHead> = graph
            .layer(f)
            .iter()
            .enumerate()
            .map(|(b, targets)| {
                let own = scores[[f, b]];
                let mut best: Option<usize> = None;
                for &t in targets {
                    consumed[t] = true;
                    if best.map_or(true, |cur| successors[t].score > successors[cur].score) {
                        best = Some(t);
                    }
                }
                match best {
                    Some(t) => ChainHead {
                        score: own + successors[t].score,
                        next: Some(t),
                    },
                    None => ChainHead {
                        score: own,
                        next: None,
                    },
                }
            })
            .collect();

        roots[f + 1] = successors
            .iter()
            .enumerate()
            .filter(|&(b, _)| !consumed[b])
            .map(|(b, head)| SequenceRoot::new(b, head.score))
            .collect();
        heads[f] = current;
    }

    roots[0] = heads[0]
        .iter()
        .enumerate()
        .map(|(b, head)| SequenceRoot::new(b, head.score))
        .collect();

    (heads, roots)
}

fn follow_chain(heads: &[Vec<ChainHead>], frame: usize, box_index: usize) -> Vec<usize> {
    let mut path = vec![box_index];
    let (mut f, mut b) = (frame, box_index);
    while let Some(next) = heads[f][b].next {
        path.push(next);
        f += 1;
        b = next;
    }
    path
}
