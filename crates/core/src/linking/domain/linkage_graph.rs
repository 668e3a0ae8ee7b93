use std::collections::BTreeSet;

/// Forward links between boxes of consecutive frames.
///
/// Layer `f` maps each box of frame `f` to the boxes of frame `f + 1` it may
/// continue into. A clip of `F` frames always has `F - 1` layers. After
/// construction, edges are only ever removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkageGraph {
    layers: Vec<Vec<BTreeSet<usize>>>,
}

impl LinkageGraph {
    pub fn new(layers: Vec<Vec<BTreeSet<usize>>>) -> Self {
        Self { layers }
    }

    /// Builds a graph from plain adjacency lists.
    pub fn from_adjacency(adjacency: Vec<Vec<Vec<usize>>>) -> Self {
        Self::new(
            adjacency
                .into_iter()
                .map(|layer| {
                    layer
                        .into_iter()
                        .map(|targets| targets.into_iter().collect())
                        .collect()
                })
                .collect(),
        )
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, frame: usize) -> &[BTreeSet<usize>] {
        &self.layers[frame]
    }

    pub fn targets(&self, frame: usize, source: usize) -> &BTreeSet<usize> {
        &self.layers[frame][source]
    }

    pub fn edge_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| layer.iter())
            .map(BTreeSet::len)
            .sum()
    }

    /// Snapshot of the graph as nested index lists, targets in ascending order.
    pub fn adjacency(&self) -> Vec<Vec<Vec<usize>>> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|targets| targets.iter().copied().collect())
                    .collect()
            })
            .collect()
    }

    /// Cuts `boxes` of `frame` out of the graph.
    ///
    /// Touches two layers: outgoing edges of those boxes in layer `frame`
    /// (absent for the last frame) and incoming edges to them in layer
    /// `frame - 1` (absent for the first frame). Returns the number of
    /// edges removed.
    pub fn excise(&mut self, frame: usize, boxes: &[usize]) -> usize {
        let mut removed = 0;

        if let Some(outgoing) = self.layers.get_mut(frame) {
            for &b in boxes {
                if let Some(targets) = outgoing.get_mut(b) {
                    removed += targets.len();
                    targets.clear();
                }
            }
        }

        if frame > 0 {
            if let Some(incoming) = self.layers.get_mut(frame - 1) {
                for targets in incoming.iter_mut() {
                    for b in boxes {
                        if targets.remove(b) {
                            removed += 1;
                        }
                    }
                }
            }
        }

        removed
    }
}
