//! Block assignment returned to the caller.

use crate::error::{Error, Result};
use crate::graph::GraphDescriptor;
use crate::weights::WeightStore;

/// `blocks()[i]` is the block of node `i`. Every id is below the requested block count.
///
/// Always owned by the caller. The assignment is copied out of engine memory before the engine
/// handle is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionResult {
    blocks: Vec<u32>,
}

impl PartitionResult {
    /// Takes a buffer the engine filled in place.
    pub(crate) fn from_vec(blocks: Vec<u32>, node_count: usize, num_partitions: u32) -> Result<Self> {
        check_shape(&blocks, node_count, num_partitions)?;
        Ok(PartitionResult { blocks })
    }

    /// Copies an engine-owned assignment.
    pub(crate) fn copy_from_engine(
        blocks: &[u32],
        node_count: usize,
        num_partitions: u32,
    ) -> Result<Self> {
        check_shape(blocks, node_count, num_partitions)?;
        Ok(PartitionResult {
            blocks: blocks.to_vec(),
        })
    }

    #[inline]
    pub fn blocks(&self) -> &[u32] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.blocks
    }

    /// Weighted number of arcs whose endpoints are in different blocks, halved.
    ///
    /// For a symmetric graph with symmetric weights this is the edge cut. Summed in `i128`, which
    /// holds the cut of any graph with 64-bit edge weights.
    pub fn edge_cut(&self, graph: &GraphDescriptor, weights: &WeightStore) -> Result<i128> {
        self.check_graph(graph)?;
        weights.check_against(graph)?;

        let mut cut: i128 = 0;
        for u in 0..graph.node_count() {
            for arc in graph.arc_range(u) {
                let v = graph.adjacency()[arc] as usize;
                if self.blocks[u] != self.blocks[v] {
                    cut += weights.edge_weight(arc) as i128;
                }
            }
        }
        Ok(cut / 2)
    }

    /// Total node weight of each of the `num_partitions` blocks.
    pub fn block_weights(&self, num_partitions: u32, weights: &WeightStore) -> Result<Vec<i64>> {
        if let Some(w) = weights.node_weights() {
            if w.len() != self.blocks.len() {
                return Err(Error::WeightLengthMismatch {
                    kind: "node",
                    expected: self.blocks.len(),
                    actual: w.len(),
                });
            }
        }

        let mut pwgts = vec![0; num_partitions as usize];
        for (node, &block) in self.blocks.iter().enumerate() {
            let Some(pwgt) = pwgts.get_mut(block as usize) else {
                return Err(Error::EngineFailure(format!(
                    "node {node} is in block {block}, but there are only {num_partitions} blocks"
                )));
            };
            *pwgt += weights.node_weight(node);
        }
        Ok(pwgts)
    }

    /// `max_block_weight / ceil(total_weight / num_partitions) - 1`
    ///
    /// 0 for a perfectly balanced assignment, and at most epsilon when the engine met the
    /// balance constraint.
    pub fn imbalance(&self, num_partitions: u32, weights: &WeightStore) -> Result<f64> {
        let pwgts = self.block_weights(num_partitions, weights)?;
        let total: i64 = pwgts.iter().sum();
        let max = pwgts.iter().copied().max().unwrap_or(0);
        if total <= 0 {
            return Ok(0.0);
        }
        let k = num_partitions as i64;
        let perfect = (total + k - 1) / k;
        Ok(max as f64 / perfect as f64 - 1.0)
    }

    fn check_graph(&self, graph: &GraphDescriptor) -> Result<()> {
        if graph.node_count() != self.blocks.len() {
            return Err(Error::MalformedOffsets(format!(
                "graph has {} nodes, the partition covers {}",
                graph.node_count(),
                self.blocks.len()
            )));
        }
        Ok(())
    }
}

impl AsRef<[u32]> for PartitionResult {
    fn as_ref(&self) -> &[u32] {
        &self.blocks
    }
}

impl From<PartitionResult> for Vec<u32> {
    fn from(result: PartitionResult) -> Self {
        result.blocks
    }
}

fn check_shape(blocks: &[u32], node_count: usize, num_partitions: u32) -> Result<()> {
    if blocks.len() != node_count {
        return Err(Error::EngineFailure(format!(
            "engine returned {} block ids for {node_count} nodes",
            blocks.len()
        )));
    }
    if let Some(node) = blocks.iter().position(|&b| b >= num_partitions) {
        return Err(Error::EngineFailure(format!(
            "engine assigned node {node} to block {}, but only {num_partitions} blocks were requested",
            blocks[node]
        )));
    }
    Ok(())
}
