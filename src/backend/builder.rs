//! Builder convention: the engine copies the CSR arrays and is configured with string options.

use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};

use super::Backend;
use crate::config::PartitionConfig;
use crate::error::{EngineError, Error, Result};
use crate::graph::GraphDescriptor;
use crate::options;
use crate::result::PartitionResult;
use crate::weights::WeightStore;

/// Graph builder half of the convention.
///
/// None of these calls may keep a reference to its arguments after it returns.
pub trait BuilderEngine: Sized {
    type Partitioner: OptionPartitioner;

    fn from_adjacency_array(node_offsets: &[u64], adjacency: &[u32]) -> Result<Self, EngineError>;

    fn with_node_weights(&mut self, node_weights: &[i32]) -> Result<(), EngineError>;

    /// The engine's edge weights are 32-bit.
    fn with_edge_weights(&mut self, edge_weights: &[i32]) -> Result<(), EngineError>;

    fn create(self) -> Result<Self::Partitioner, EngineError>;
}

/// Partitioner half of the convention, configured through `set_option`.
pub trait OptionPartitioner {
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError>;

    /// Runs the engine. The assignment stays owned by the partitioner.
    fn partition(&mut self, num_partitions: u32) -> Result<RawPartition<'_>, EngineError>;
}

/// Engine-owned block ids, valid for as long as the partitioner that produced them is borrowed.
pub struct RawPartition<'p> {
    ptr: *const u32,
    len: usize,
    _owner: PhantomData<&'p [u32]>,
}

impl<'p> RawPartition<'p> {
    pub fn from_slice(blocks: &'p [u32]) -> Self {
        RawPartition {
            ptr: blocks.as_ptr(),
            len: blocks.len(),
            _owner: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for `len` reads of `u32` for all of `'p`, or `len` must be 0.
    pub unsafe fn from_raw_parts(ptr: *const u32, len: usize) -> Self {
        RawPartition {
            ptr,
            len,
            _owner: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u32] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY: guaranteed by the constructors
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl fmt::Debug for RawPartition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPartition")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

/// [`Backend`] for engines with the builder convention.
pub struct Builder<E> {
    _engine: PhantomData<fn() -> E>,
}

impl<E> Builder<E> {
    pub const fn new() -> Self {
        Builder {
            _engine: PhantomData,
        }
    }
}

impl<E> Default for Builder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Builder<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Builder<E> {}

impl<E> fmt::Debug for Builder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("engine", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: BuilderEngine> Builder<E> {
    /// [`Backend::partition`] without giving up the graph.
    ///
    /// This convention never writes to the caller's arrays, so they can be borrowed here. Code
    /// that has to work with either convention should use [`Backend::partition`].
    pub fn partition_borrowed(
        &self,
        graph: &GraphDescriptor,
        weights: &WeightStore,
        config: &PartitionConfig,
        num_partitions: u32,
    ) -> Result<PartitionResult> {
        let config = *config;
        weights.check_against(graph)?;

        // everything that can be rejected locally is, before the engine sees anything
        let options = options::encode(&config)?;
        let edge_weights = weights
            .edge_weights()
            .map(narrow_edge_weights)
            .transpose()?;

        let node_count = graph.node_count();
        debug!(
            "partitioning {} nodes / {} arcs into {} blocks ({:?} weights, {} convention, {} threads)",
            node_count,
            graph.edge_count(),
            num_partitions,
            weights.kind(),
            <Self as Backend>::CONVENTION,
            config.threads()
        );

        let mut builder = E::from_adjacency_array(graph.node_offsets(), graph.adjacency())?;
        if let Some(node_weights) = weights.node_weights() {
            builder.with_node_weights(node_weights)?;
        }
        if let Some(edge_weights) = &edge_weights {
            builder.with_edge_weights(edge_weights)?;
        }

        let mut partitioner = builder.create()?;
        for option in &options {
            trace!("set_option {}={}", option.name, option.value);
            partitioner.set_option(option.name, &option.value)?;
        }

        let raw = partitioner.partition(num_partitions)?;
        PartitionResult::copy_from_engine(raw.as_slice(), node_count, num_partitions)
    }
}

impl<E: BuilderEngine> Backend for Builder<E> {
    const CONVENTION: &'static str = "builder";

    fn partition(
        &self,
        graph: GraphDescriptor,
        weights: WeightStore,
        config: &PartitionConfig,
        num_partitions: u32,
    ) -> Result<PartitionResult> {
        self.partition_borrowed(&graph, &weights, config, num_partitions)
    }
}

/// Converts 64-bit edge weights to the engine's 32-bit ones, refusing any that do not fit.
pub fn narrow_edge_weights(edge_weights: &[i64]) -> Result<Vec<i32>> {
    edge_weights
        .iter()
        .enumerate()
        .map(|(arc, &w)| {
            i32::try_from(w).map_err(|_| {
                Error::BackendConfiguration(format!(
                    "edge weight {w} of arc {arc} does not fit the engine's 32-bit edge weights"
                ))
            })
        })
        .collect()
}
