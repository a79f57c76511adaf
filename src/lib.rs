//! Bridge from CSR graphs to the KaMinPar shared-memory graph partitioner.
//!
//! A graph is described by a [`GraphDescriptor`] (node offsets and adjacency) and an optional
//! [`WeightStore`]. [`PartitionConfig`] holds the thread count, imbalance tolerance and seed.
//! A [`Backend`] hands all of it to the engine and returns a [`PartitionResult`] owned by the
//! caller.
//!
//! The engine is linked at build time through one of two features:
//!
//! - `embedding`: KaMinPar's `borrow_and_mutate_graph` API
//! - `builder`: libkaminpar's `PartitionerBuilder` with string options
//!
//! Add `vendored` to build the engine from `vendor/KaMinPar`. Otherwise the build looks for an
//! install prefix in `KAMINPAR_DIR`. Without either engine feature only the adapter layer is
//! built, and any type implementing [`EmbeddingEngine`] or [`BuilderEngine`] can be plugged in.
//!
//! ```
//! use kaminpar::{GraphDescriptor, WeightStore};
//!
//! // a 4-cycle, each edge stored in both directions
//! let graph = GraphDescriptor::new(vec![0, 2, 4, 6, 8], vec![1, 3, 0, 2, 1, 3, 0, 2])?;
//! assert_eq!(graph.node_count(), 4);
//! assert!(graph.defects(&WeightStore::Unit)?.is_empty());
//! # Ok::<(), kaminpar::Error>(())
//! ```
#![allow(clippy::needless_range_loop, clippy::missing_safety_doc)]

#[cfg(all(feature = "embedding", feature = "builder"))]
compile_error!("features `embedding` and `builder` select different engines; enable only one");

pub mod backend;
pub mod config;
pub mod error;
pub mod graph;
pub mod options;
pub mod result;
pub mod weights;

#[cfg(any(feature = "embedding", feature = "builder"))]
pub mod bindings;
#[cfg(any(feature = "embedding", feature = "builder"))]
pub mod native;

pub use backend::{
    Backend, BorrowedGraph, Builder, BuilderEngine, Embedding, EmbeddingContext, EmbeddingEngine,
    OptionPartitioner, RawPartition,
};
pub use config::PartitionConfig;
pub use error::{EngineError, Error, Result, Status};
pub use graph::{GraphDefect, GraphDescriptor};
pub use result::PartitionResult;
pub use weights::{WeightKind, WeightStore};

#[cfg(any(feature = "embedding", feature = "builder"))]
pub use backend::DefaultBackend;

/// Partitions `graph` with the engine this build links against.
#[cfg(any(feature = "embedding", feature = "builder"))]
pub fn partition(
    graph: GraphDescriptor,
    weights: WeightStore,
    config: &PartitionConfig,
    num_partitions: u32,
) -> Result<PartitionResult> {
    DefaultBackend::default().partition(graph, weights, config, num_partitions)
}

/// [`partition`] from raw sequences. See [`Backend::partition_csr`].
#[cfg(any(feature = "embedding", feature = "builder"))]
pub fn partition_csr(
    node_offsets: Vec<u64>,
    adjacency: Vec<u32>,
    node_weights: Option<Vec<i32>>,
    edge_weights: Option<Vec<i64>>,
    config: &PartitionConfig,
    num_partitions: u32,
) -> Result<PartitionResult> {
    DefaultBackend::default().partition_csr(
        node_offsets,
        adjacency,
        node_weights,
        edge_weights,
        config,
        num_partitions,
    )
}
