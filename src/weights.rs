//! Optional node and edge weights.

use crate::error::{Error, Result};
use crate::graph::GraphDescriptor;

/// Weights attached to a graph for one `partition` call.
///
/// An absent array means unit weights. That is a distinct state: an empty array for a
/// non-empty graph is a length mismatch, not "no weights". Build it with [`WeightStore::attach`]
/// or [`WeightStore::for_graph`] so the lengths are checked. The adapters check again against the
/// graph they are given.
///
/// Edge weights are 64-bit here. Engines with narrower edge weights convert at the adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WeightStore {
    #[default]
    Unit,
    PerNode(Vec<i32>),
    PerEdge(Vec<i64>),
    Both(Vec<i32>, Vec<i64>),
}

/// Which weights a [`WeightStore`] carries, without the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightKind {
    Unit,
    PerNode,
    PerEdge,
    Both,
}

impl WeightStore {
    /// Checks that `node_weights` has `node_count` entries and `edge_weights` has `edge_count`
    /// entries, for whichever of them is present.
    pub fn attach(
        node_weights: Option<Vec<i32>>,
        edge_weights: Option<Vec<i64>>,
        node_count: usize,
        edge_count: usize,
    ) -> Result<Self> {
        if let Some(w) = &node_weights {
            check_len("node", node_count, w.len())?;
        }
        if let Some(w) = &edge_weights {
            check_len("edge", edge_count, w.len())?;
        }

        Ok(match (node_weights, edge_weights) {
            (None, None) => WeightStore::Unit,
            (Some(n), None) => WeightStore::PerNode(n),
            (None, Some(e)) => WeightStore::PerEdge(e),
            (Some(n), Some(e)) => WeightStore::Both(n, e),
        })
    }

    /// [`WeightStore::attach`] with the dimensions taken from `graph`
    pub fn for_graph(
        node_weights: Option<Vec<i32>>,
        edge_weights: Option<Vec<i64>>,
        graph: &GraphDescriptor,
    ) -> Result<Self> {
        Self::attach(node_weights, edge_weights, graph.node_count(), graph.edge_count())
    }

    pub fn kind(&self) -> WeightKind {
        match self {
            WeightStore::Unit => WeightKind::Unit,
            WeightStore::PerNode(_) => WeightKind::PerNode,
            WeightStore::PerEdge(_) => WeightKind::PerEdge,
            WeightStore::Both(_, _) => WeightKind::Both,
        }
    }

    pub fn node_weights(&self) -> Option<&[i32]> {
        match self {
            WeightStore::PerNode(n) | WeightStore::Both(n, _) => Some(n.as_slice()),
            WeightStore::Unit | WeightStore::PerEdge(_) => None,
        }
    }

    pub fn edge_weights(&self) -> Option<&[i64]> {
        match self {
            WeightStore::PerEdge(e) | WeightStore::Both(_, e) => Some(e.as_slice()),
            WeightStore::Unit | WeightStore::PerNode(_) => None,
        }
    }

    /// weight of `node`, 1 when unweighted
    #[inline]
    pub fn node_weight(&self, node: usize) -> i64 {
        self.node_weights().map_or(1, |w| w[node] as i64)
    }

    /// weight of the arc stored at `arc`, 1 when unweighted
    #[inline]
    pub fn edge_weight(&self, arc: usize) -> i64 {
        self.edge_weights().map_or(1, |w| w[arc])
    }

    /// Fails with [`Error::WeightLengthMismatch`] unless the present arrays fit `graph`.
    pub fn check_against(&self, graph: &GraphDescriptor) -> Result<()> {
        if let Some(w) = self.node_weights() {
            check_len("node", graph.node_count(), w.len())?;
        }
        if let Some(w) = self.edge_weights() {
            check_len("edge", graph.edge_count(), w.len())?;
        }
        Ok(())
    }
}

fn check_len(kind: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::WeightLengthMismatch {
            kind,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn four_combinations() {
        let unit = WeightStore::attach(None, None, 4, 8).unwrap();
        assert_eq!(unit.kind(), WeightKind::Unit);

        let node = WeightStore::attach(Some(vec![1; 4]), None, 4, 8).unwrap();
        assert_eq!(node.kind(), WeightKind::PerNode);
        assert_eq!(node.node_weights(), Some(&[1, 1, 1, 1][..]));
        assert_eq!(node.edge_weights(), None);

        let edge = WeightStore::attach(None, Some(vec![2; 8]), 4, 8).unwrap();
        assert_eq!(edge.kind(), WeightKind::PerEdge);
        assert_eq!(edge.node_weights(), None);

        let both = WeightStore::attach(Some(vec![1; 4]), Some(vec![2; 8]), 4, 8).unwrap();
        assert_eq!(both.kind(), WeightKind::Both);
        assert_eq!(both.edge_weights().map(<[i64]>::len), Some(8));
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            WeightStore::attach(Some(vec![1; 3]), None, 4, 8),
            Err(Error::WeightLengthMismatch {
                kind: "node",
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            WeightStore::attach(None, Some(vec![1; 9]), 4, 8),
            Err(Error::WeightLengthMismatch {
                kind: "edge",
                expected: 8,
                actual: 9
            })
        );
    }

    #[test]
    fn empty_is_not_absent() {
        assert!(WeightStore::attach(Some(vec![]), None, 4, 8).is_err());
        // ... unless the graph is empty too
        let store = WeightStore::attach(Some(vec![]), Some(vec![]), 0, 0).unwrap();
        assert_eq!(store.kind(), WeightKind::Both);
    }

    #[test]
    fn unit_weights_read_as_one() {
        let store = WeightStore::Unit;
        assert_eq!(store.node_weight(3), 1);
        assert_eq!(store.edge_weight(7), 1);

        let store = WeightStore::Both(vec![4, 5], vec![-2, 9]);
        assert_eq!(store.node_weight(1), 5);
        assert_eq!(store.edge_weight(0), -2);
    }

    #[test]
    fn checked_against_other_graph() {
        let g = GraphDescriptor::new(vec![0, 1, 2], vec![1, 0]).unwrap();
        let store = WeightStore::PerNode(vec![1, 2, 3]);
        assert!(matches!(
            store.check_against(&g),
            Err(Error::WeightLengthMismatch { kind: "node", .. })
        ));
        assert!(WeightStore::PerEdge(vec![1, 1]).check_against(&g).is_ok());
    }
}
