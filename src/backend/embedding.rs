//! Direct embedding convention: the engine borrows the caller's arrays and may mutate them.

use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroU32;

use log::debug;

use super::Backend;
use crate::config::PartitionConfig;
use crate::error::{EngineError, Result};
use crate::graph::GraphDescriptor;
use crate::result::PartitionResult;
use crate::weights::WeightStore;

/// The parts of the engine's default context that the bridge overrides.
///
/// Built fresh for every call from a config snapshot. No process-wide state is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingContext {
    pub epsilon: f64,
    pub seed: u64,
}

impl EmbeddingContext {
    pub fn from_config(config: &PartitionConfig) -> Self {
        EmbeddingContext {
            epsilon: config.epsilon(),
            seed: config.seed(),
        }
    }
}

/// Converts a seed to the engine's `int` seed, refusing any that would be truncated.
pub fn narrow_seed(seed: u64) -> Result<i32, EngineError> {
    i32::try_from(seed).map_err(|_| {
        EngineError::invalid_parameter(format!(
            "seed {seed} does not fit the engine's 32-bit seed (at most {})",
            i32::MAX
        ))
    })
}

/// The graph as lent to the engine for one call.
///
/// Every array may be reordered or overwritten. An absent weight array is passed to the native
/// side as a null pointer.
#[derive(Debug)]
pub struct BorrowedGraph<'a> {
    pub node_offsets: &'a mut [u64],
    pub adjacency: &'a mut [u32],
    pub node_weights: Option<&'a mut [i32]>,
    pub edge_weights: Option<&'a mut [i64]>,
}

impl BorrowedGraph<'_> {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_offsets.len() - 1
    }
}

/// An engine with the `borrow_and_mutate_graph` + `compute_partition` API.
pub trait EmbeddingEngine: Sized {
    /// Constructs the engine with `threads` workers and its default context, adjusted by
    /// `context`.
    fn create(threads: NonZeroU32, context: &EmbeddingContext) -> Result<Self, EngineError>;

    /// Lends `graph` to the engine and writes the block of node `i` to `partition[i]`.
    ///
    /// `partition` has exactly `graph.node_count()` entries.
    fn compute_partition(
        &mut self,
        graph: BorrowedGraph<'_>,
        num_partitions: u32,
        partition: &mut [u32],
    ) -> Result<(), EngineError>;
}

/// [`Backend`] for engines with the embedding convention.
pub struct Embedding<E> {
    _engine: PhantomData<fn() -> E>,
}

impl<E> Embedding<E> {
    pub const fn new() -> Self {
        Embedding {
            _engine: PhantomData,
        }
    }
}

impl<E> Default for Embedding<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Embedding<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Embedding<E> {}

impl<E> fmt::Debug for Embedding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("engine", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: EmbeddingEngine> Backend for Embedding<E> {
    const CONVENTION: &'static str = "embedding";

    fn partition(
        &self,
        graph: GraphDescriptor,
        mut weights: WeightStore,
        config: &PartitionConfig,
        num_partitions: u32,
    ) -> Result<PartitionResult> {
        let config = *config;
        weights.check_against(&graph)?;

        let node_count = graph.node_count();
        debug!(
            "partitioning {} nodes / {} arcs into {} blocks ({:?} weights, {} convention, {} threads)",
            node_count,
            graph.edge_count(),
            num_partitions,
            weights.kind(),
            Self::CONVENTION,
            config.threads()
        );

        let context = EmbeddingContext::from_config(&config);
        let mut engine = E::create(config.threads(), &context)?;

        let (mut node_offsets, mut adjacency) = graph.into_parts();
        let (node_weights, edge_weights) = match &mut weights {
            WeightStore::Unit => (None, None),
            WeightStore::PerNode(n) => (Some(&mut n[..]), None),
            WeightStore::PerEdge(e) => (None, Some(&mut e[..])),
            WeightStore::Both(n, e) => (Some(&mut n[..]), Some(&mut e[..])),
        };
        let borrowed = BorrowedGraph {
            node_offsets: &mut node_offsets,
            adjacency: &mut adjacency,
            node_weights,
            edge_weights,
        };

        let mut partition = vec![0; node_count];
        let status = engine.compute_partition(borrowed, num_partitions, &mut partition);
        // the native engine may refer to the lent arrays until it is released
        drop(engine);
        status?;

        PartitionResult::from_vec(partition, node_count, num_partitions)
    }
}
