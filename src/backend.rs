//! The engine-facing side of the bridge.
//!
//! Different KaMinPar releases expose incompatible APIs. Each one is wrapped by its own adapter:
//!
//! - [`Embedding`]: the engine is constructed with a thread count and a context, and then borrows
//!   the CSR arrays mutably (`borrow_and_mutate_graph`). The caller's buffers are consumed.
//! - [`Builder`]: a builder copies the CSR arrays, weights are attached through setters, and the
//!   resulting partitioner is configured with string options.
//!
//! Both implement [`Backend`], and callers only see that trait. The adapters are generic over
//! the engine, and a build links exactly one real engine, selected by the `embedding` or
//! `builder` feature and exposed as [`DefaultBackend`]. Nothing is dispatched at runtime.

use crate::config::PartitionConfig;
use crate::error::Result;
use crate::graph::GraphDescriptor;
use crate::result::PartitionResult;
use crate::weights::WeightStore;

pub mod builder;
pub mod embedding;

pub use builder::{Builder, BuilderEngine, OptionPartitioner, RawPartition};
pub use embedding::{
    narrow_seed, BorrowedGraph, Embedding, EmbeddingContext, EmbeddingEngine,
};

/// A way of running the engine on one graph.
pub trait Backend {
    /// name of the calling convention, for logs
    const CONVENTION: &'static str;

    /// Partitions `graph` into `num_partitions` blocks.
    ///
    /// The graph and its weights are consumed. With the embedding convention the engine uses
    /// them as scratch space, so they could not be handed back intact anyway:
    ///
    /// ```compile_fail
    /// use kaminpar::{Backend, GraphDescriptor, PartitionConfig, WeightStore};
    ///
    /// fn twice<B: Backend>(backend: &B, graph: GraphDescriptor) {
    ///     let config = PartitionConfig::default();
    ///     let _ = backend.partition(graph, WeightStore::Unit, &config, 2);
    ///     let _ = backend.partition(graph, WeightStore::Unit, &config, 2);
    /// }
    /// ```
    ///
    /// `num_partitions` is not special-cased. 0, 1 and more blocks than nodes all go to the
    /// engine, and whatever it decides comes back as the result or the error. The engine is
    /// called at most once, and on failure nothing partial is returned.
    fn partition(
        &self,
        graph: GraphDescriptor,
        weights: WeightStore,
        config: &PartitionConfig,
        num_partitions: u32,
    ) -> Result<PartitionResult>;

    /// Validates raw CSR sequences and weights, then calls [`Backend::partition`].
    ///
    /// Any structural or length error is returned before the engine is touched.
    fn partition_csr(
        &self,
        node_offsets: Vec<u64>,
        adjacency: Vec<u32>,
        node_weights: Option<Vec<i32>>,
        edge_weights: Option<Vec<i64>>,
        config: &PartitionConfig,
        num_partitions: u32,
    ) -> Result<PartitionResult> {
        let graph = GraphDescriptor::new(node_offsets, adjacency)?;
        let weights = WeightStore::for_graph(node_weights, edge_weights, &graph)?;
        self.partition(graph, weights, config, num_partitions)
    }
}

#[cfg(feature = "embedding")]
pub type DefaultBackend = Embedding<crate::native::EmbeddedKaMinPar>;

#[cfg(feature = "builder")]
pub type DefaultBackend = Builder<crate::native::KaMinParBuilder>;
