//! CSR graph description handed to the engine.

use crate::error::{Error, Result};
use crate::weights::WeightStore;

/// A validated graph in compressed sparse row form.
///
/// `node_offsets[i]..node_offsets[i + 1]` is the range of `adjacency` holding the neighbors of
/// node `i`. Symmetry is not checked: the graph is passed on exactly as stored. Use
/// [`GraphDescriptor::defects`] if the caller wants to make sure the input is undirected.
///
/// The descriptor owns its buffers. [`crate::Backend::partition`] takes it by value because the
/// embedding convention lets the engine reorder and contract the arrays in place, so a graph that
/// has been partitioned is gone. Keep a clone if the arrays are needed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescriptor {
    node_offsets: Vec<u64>,
    adjacency: Vec<u32>,
}

impl GraphDescriptor {
    /// Validates `node_offsets` and `adjacency` and wraps them.
    ///
    /// Fails with [`Error::MalformedOffsets`] if the offsets are empty, decrease, do not start at
    /// zero, do not end at `adjacency.len()` or describe more nodes than a 32-bit node id can
    /// address, and with [`Error::OutOfRangeAdjacency`] if an adjacency entry is not a node.
    pub fn new(node_offsets: Vec<u64>, adjacency: Vec<u32>) -> Result<Self> {
        validate(&node_offsets, &adjacency)?;
        Ok(GraphDescriptor {
            node_offsets,
            adjacency,
        })
    }

    /// The empty graph: one offset, no nodes.
    pub fn empty() -> Self {
        GraphDescriptor {
            node_offsets: vec![0],
            adjacency: Vec::new(),
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_offsets.len() - 1
    }

    /// number of stored arcs, i.e. twice the number of undirected edges for symmetric input
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn node_offsets(&self) -> &[u64] {
        &self.node_offsets
    }

    #[inline]
    pub fn adjacency(&self) -> &[u32] {
        &self.adjacency
    }

    /// the neighbors of `node`
    ///
    /// # Panics
    ///
    /// if `node >= self.node_count()`
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[u32] {
        &self.adjacency[self.arc_range(node)]
    }

    #[inline]
    pub(crate) fn arc_range(&self, node: usize) -> std::ops::Range<usize> {
        // offsets are bounded by adjacency.len(), so these fit in usize
        self.node_offsets[node] as usize..self.node_offsets[node + 1] as usize
    }

    /// Gives the buffers back.
    pub fn into_parts(self) -> (Vec<u64>, Vec<u32>) {
        (self.node_offsets, self.adjacency)
    }

    /// Reports every self loop, duplicate arc, missing reverse arc and (when edge weights are
    /// attached) every pair of opposite arcs with different weights.
    ///
    /// This is never run by `partition`. It is for callers whose engine configuration expects an
    /// undirected graph and who want to check before paying for a partitioning run.
    pub fn defects(&self, weights: &WeightStore) -> Result<Vec<GraphDefect>> {
        weights.check_against(self)?;
        let edge_weights = weights.edge_weights();
        let node_count = self.node_count();
        let mut defects = Vec::new();

        let mut seen = vec![false; node_count];
        let mut seenlist = Vec::new();
        for u in 0..node_count {
            for arc in self.arc_range(u) {
                let v = self.adjacency[arc] as usize;

                if u == v {
                    defects.push(GraphDefect::SelfLoop { node: u as u32 });
                    continue;
                }

                if seen[v] {
                    defects.push(GraphDefect::DuplicateArc {
                        from: u as u32,
                        to: v as u32,
                    });
                } else {
                    seen[v] = true;
                    seenlist.push(v);
                }

                let reverse = self
                    .arc_range(v)
                    .find(|&back| self.adjacency[back] as usize == u);
                match (reverse, edge_weights) {
                    (None, _) => defects.push(GraphDefect::MissingReverseArc {
                        from: u as u32,
                        to: v as u32,
                    }),
                    // report each asymmetric pair once, from its lower endpoint
                    (Some(back), Some(w)) if u < v && w[arc] != w[back] => {
                        defects.push(GraphDefect::AsymmetricWeight {
                            from: u as u32,
                            to: v as u32,
                            forward: w[arc],
                            backward: w[back],
                        })
                    }
                    _ => {}
                }
            }
            for v in seenlist.drain(..) {
                seen[v] = false;
            }
        }

        Ok(defects)
    }
}

/// A structural property that makes a stored graph something other than a simple undirected graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphDefect {
    SelfLoop { node: u32 },
    DuplicateArc { from: u32, to: u32 },
    MissingReverseArc { from: u32, to: u32 },
    AsymmetricWeight {
        from: u32,
        to: u32,
        forward: i64,
        backward: i64,
    },
}

fn validate(node_offsets: &[u64], adjacency: &[u32]) -> Result<()> {
    let Some((&first, _)) = node_offsets.split_first() else {
        return Err(Error::MalformedOffsets(
            "node offsets are empty, the empty graph has a single offset of 0".into(),
        ));
    };
    if first != 0 {
        return Err(Error::MalformedOffsets(format!(
            "node offsets start at {first}, expected 0"
        )));
    }
    if let Some(i) = node_offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(Error::MalformedOffsets(format!(
            "node offsets decrease at node {i}: {} > {}",
            node_offsets[i],
            node_offsets[i + 1]
        )));
    }

    let node_count = node_offsets.len() - 1;
    // node ids are u32 on the engine side, and so is every adjacency entry
    if node_count > u32::MAX as usize {
        return Err(Error::MalformedOffsets(format!(
            "{node_count} nodes do not fit in 32-bit node ids"
        )));
    }

    let last = node_offsets[node_count];
    if last != adjacency.len() as u64 {
        return Err(Error::MalformedOffsets(format!(
            "last node offset is {last}, but there are {} adjacency entries",
            adjacency.len()
        )));
    }

    if let Some(position) = adjacency.iter().position(|&v| v as usize >= node_count) {
        return Err(Error::OutOfRangeAdjacency {
            position,
            node: adjacency[position],
            node_count,
        });
    }

    Ok(())
}
