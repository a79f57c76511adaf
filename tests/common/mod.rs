//! Recording stand-ins for the two engine conventions.
//!
//! Every call is appended to a thread-local log, so tests running in parallel each see only
//! their own calls. Call [`reset`] first in every test.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;

use kaminpar::{
    BorrowedGraph, BuilderEngine, EmbeddingContext, EmbeddingEngine, EngineError,
    GraphDescriptor, OptionPartitioner, RawPartition, Status,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // embedding convention
    Create {
        threads: u32,
        epsilon: f64,
        seed: u64,
    },
    Compute {
        node_count: usize,
        arc_count: usize,
        node_weights: Option<Vec<i32>>,
        edge_weights: Option<Vec<i64>>,
        num_partitions: u32,
    },
    EngineDropped,

    // builder convention
    FromAdjacencyArray {
        node_offsets: Vec<u64>,
        adjacency: Vec<u32>,
    },
    NodeWeights(Vec<i32>),
    EdgeWeights(Vec<i32>),
    CreatePartitioner,
    SetOption(String, String),
    Partition(u32),
    PartitionerDropped,
}

/// Misbehavior to inject into the next engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// engine construction fails
    RejectConstruction(Status),
    /// the partitioning call fails
    Reject(Status),
    /// node 0 is put into block `num_partitions`
    BlockOutOfRange,
    /// one block id too few (builder convention only)
    ShortResult,
}

thread_local! {
    static EVENTS: RefCell<Vec<Event>> = const { RefCell::new(Vec::new()) };
    static FAULT: Cell<Fault> = const { Cell::new(Fault::None) };
}

pub fn reset() {
    EVENTS.with(|e| e.borrow_mut().clear());
    FAULT.with(|f| f.set(Fault::None));
}

pub fn inject(fault: Fault) {
    FAULT.with(|f| f.set(fault));
}

/// Everything recorded since the last call (or [`reset`]).
pub fn take_events() -> Vec<Event> {
    EVENTS.with(|e| std::mem::take(&mut *e.borrow_mut()))
}

fn record(event: Event) {
    EVENTS.with(|e| e.borrow_mut().push(event));
}

fn fault() -> Fault {
    FAULT.with(|f| f.get())
}

pub const REJECTED: &str = "rejected by the mock engine";

/// Round robin over the blocks, starting at a block chosen by `seed`.
///
/// Balanced for every `num_partitions`, identical for identical seeds, and all zeros for a
/// single block.
pub fn assignment(node_count: usize, num_partitions: u32, seed: u64) -> Vec<u32> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let first = rng.u64(0..num_partitions as u64);
    (0..node_count as u64)
        .map(|i| ((first + i) % num_partitions as u64) as u32)
        .collect()
}

/// 0 - 1 - 2 - 3 - 0, each edge stored in both directions
pub fn cycle4() -> (Vec<u64>, Vec<u32>) {
    (vec![0, 2, 4, 6, 8], vec![1, 3, 0, 2, 1, 3, 0, 2])
}

pub fn cycle4_graph() -> GraphDescriptor {
    let (offsets, adjacency) = cycle4();
    GraphDescriptor::new(offsets, adjacency).unwrap()
}

/// A random symmetric graph without self loops or duplicate edges.
pub fn random_graph(rng: &mut fastrand::Rng, node_count: usize, edges: usize) -> GraphDescriptor {
    let mut neighbors = vec![Vec::new(); node_count];
    for _ in 0..edges {
        let u = rng.usize(0..node_count);
        let v = rng.usize(0..node_count);
        if u == v || neighbors[u].contains(&(v as u32)) {
            continue;
        }
        neighbors[u].push(v as u32);
        neighbors[v].push(u as u32);
    }

    let mut offsets = vec![0];
    let mut adjacency = Vec::new();
    for list in neighbors {
        adjacency.extend(list);
        offsets.push(adjacency.len() as u64);
    }
    GraphDescriptor::new(offsets, adjacency).unwrap()
}

/// Embedding-convention engine that overwrites everything it is lent.
#[derive(Debug)]
pub struct MockEmbedding {
    seed: u64,
}

impl EmbeddingEngine for MockEmbedding {
    fn create(threads: NonZeroU32, context: &EmbeddingContext) -> Result<Self, EngineError> {
        record(Event::Create {
            threads: threads.get(),
            epsilon: context.epsilon,
            seed: context.seed,
        });
        if let Fault::RejectConstruction(status) = fault() {
            return Err(EngineError::new(status, REJECTED));
        }
        Ok(MockEmbedding { seed: context.seed })
    }

    fn compute_partition(
        &mut self,
        graph: BorrowedGraph<'_>,
        num_partitions: u32,
        partition: &mut [u32],
    ) -> Result<(), EngineError> {
        record(Event::Compute {
            node_count: graph.node_count(),
            arc_count: graph.adjacency.len(),
            node_weights: graph.node_weights.as_deref().map(<[i32]>::to_vec),
            edge_weights: graph.edge_weights.as_deref().map(<[i64]>::to_vec),
            num_partitions,
        });

        // the engine owns these for the duration of the call
        graph.node_offsets.fill(u64::MAX);
        graph.adjacency.fill(u32::MAX);
        if let Some(w) = graph.node_weights {
            w.fill(-1);
        }
        if let Some(w) = graph.edge_weights {
            w.fill(-1);
        }

        if let Fault::Reject(status) = fault() {
            return Err(EngineError::new(status, REJECTED));
        }
        if num_partitions == 0 {
            return Err(EngineError::invalid_parameter("number of blocks must be positive"));
        }

        partition.copy_from_slice(&assignment(partition.len(), num_partitions, self.seed));
        if fault() == Fault::BlockOutOfRange {
            if let Some(first) = partition.first_mut() {
                *first = num_partitions;
            }
        }
        Ok(())
    }
}

impl Drop for MockEmbedding {
    fn drop(&mut self) {
        record(Event::EngineDropped);
    }
}

/// Builder-convention engine.
#[derive(Debug)]
pub struct MockBuilder {
    node_count: usize,
}

impl BuilderEngine for MockBuilder {
    type Partitioner = MockPartitioner;

    fn from_adjacency_array(node_offsets: &[u64], adjacency: &[u32]) -> Result<Self, EngineError> {
        record(Event::FromAdjacencyArray {
            node_offsets: node_offsets.to_vec(),
            adjacency: adjacency.to_vec(),
        });
        if let Fault::RejectConstruction(status) = fault() {
            return Err(EngineError::new(status, REJECTED));
        }
        Ok(MockBuilder {
            node_count: node_offsets.len() - 1,
        })
    }

    fn with_node_weights(&mut self, node_weights: &[i32]) -> Result<(), EngineError> {
        record(Event::NodeWeights(node_weights.to_vec()));
        Ok(())
    }

    fn with_edge_weights(&mut self, edge_weights: &[i32]) -> Result<(), EngineError> {
        record(Event::EdgeWeights(edge_weights.to_vec()));
        Ok(())
    }

    fn create(self) -> Result<MockPartitioner, EngineError> {
        record(Event::CreatePartitioner);
        Ok(MockPartitioner {
            node_count: self.node_count,
            seed: 0,
            blocks: Vec::new(),
        })
    }
}

/// Keeps its last assignment and poisons it when dropped.
#[derive(Debug)]
pub struct MockPartitioner {
    node_count: usize,
    seed: u64,
    blocks: Vec<u32>,
}

impl OptionPartitioner for MockPartitioner {
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        record(Event::SetOption(name.to_string(), value.to_string()));
        let invalid = || EngineError::invalid_parameter(format!("invalid value {value:?} for {name}"));
        match name {
            "--threads" => {
                let threads: u32 = value.parse().map_err(|_| invalid())?;
                if threads == 0 {
                    return Err(invalid());
                }
            }
            "--epsilon" => {
                value.parse::<f64>().map_err(|_| invalid())?;
            }
            "--seed" => self.seed = value.parse().map_err(|_| invalid())?,
            _ => {
                return Err(EngineError::invalid_parameter(format!("unknown option {name}")));
            }
        }
        Ok(())
    }

    fn partition(&mut self, num_partitions: u32) -> Result<RawPartition<'_>, EngineError> {
        record(Event::Partition(num_partitions));
        if let Fault::Reject(status) = fault() {
            return Err(EngineError::new(status, REJECTED));
        }
        if num_partitions == 0 {
            return Err(EngineError::invalid_parameter("number of blocks must be positive"));
        }

        self.blocks = assignment(self.node_count, num_partitions, self.seed);
        match fault() {
            Fault::BlockOutOfRange => {
                if let Some(first) = self.blocks.first_mut() {
                    *first = num_partitions;
                }
            }
            Fault::ShortResult => {
                self.blocks.pop();
            }
            _ => {}
        }
        Ok(RawPartition::from_slice(&self.blocks))
    }
}

impl Drop for MockPartitioner {
    fn drop(&mut self) {
        self.blocks.fill(u32::MAX);
        record(Event::PartitionerDropped);
    }
}
