//! Owning handles over the native shim. They implement the engine traits for the convention
//! this build links against.

use std::ffi::CStr;
use std::ptr::NonNull;

use log::trace;

use crate::bindings::*;
use crate::error::{EngineError, Status};

/// Converts a shim error into an [`EngineError`] and releases its message.
///
/// # Safety
///
/// `err.msg` is null or a NUL-terminated string allocated with `malloc`.
unsafe fn take_error(err: &mut kmp_error_t) -> EngineError {
    let status = match err.status {
        KMP_INVALID_PARAMETER => Status::InvalidParameter,
        KMP_OUT_OF_MEMORY => Status::OutOfMemory,
        _ => Status::Failure,
    };
    let message = if err.msg.is_null() {
        "<no error message>".to_string()
    } else {
        let m = CStr::from_ptr(err.msg).to_string_lossy().into_owned();
        libc::free(err.msg.cast());
        m
    };
    *err = kmp_error_t::new();
    EngineError { status, message }
}

/// # Safety
///
/// as [`take_error`]
unsafe fn check_status(status: kmp_status_t, err: &mut kmp_error_t) -> Result<(), EngineError> {
    if status == KMP_OK {
        return Ok(());
    }
    // the status return wins if the shim forgot to fill in err
    if err.status == KMP_OK {
        err.status = status;
    }
    Err(take_error(err))
}

fn node_count_u32(node_count: usize) -> Result<u32, EngineError> {
    u32::try_from(node_count).map_err(|_| {
        EngineError::invalid_parameter(format!("{node_count} nodes exceed 32-bit node ids"))
    })
}

#[cfg(feature = "embedding")]
pub use self::embedding::EmbeddedKaMinPar;

#[cfg(feature = "embedding")]
mod embedding {
    use std::num::NonZeroU32;
    use std::ptr;

    use super::*;
    use crate::backend::{narrow_seed, BorrowedGraph, EmbeddingContext, EmbeddingEngine};

    /// `kaminpar::KaMinPar` instance. Freed on drop.
    pub struct EmbeddedKaMinPar {
        raw: NonNull<kmp_embedding_t>,
    }

    impl Drop for EmbeddedKaMinPar {
        fn drop(&mut self) {
            trace!("releasing engine {:p}", self.raw);
            unsafe { kmp_embedding_free(self.raw.as_ptr()) };
        }
    }

    impl EmbeddingEngine for EmbeddedKaMinPar {
        fn create(threads: NonZeroU32, context: &EmbeddingContext) -> Result<Self, EngineError> {
            let threads = libc::c_int::try_from(threads.get()).map_err(|_| {
                EngineError::invalid_parameter(format!("{threads} threads is more than the engine accepts"))
            })?;

            let seed = narrow_seed(context.seed)?;

            let mut err = kmp_error_t::new();
            let raw = unsafe { kmp_embedding_new(threads, context.epsilon, seed, &mut err) };
            match NonNull::new(raw) {
                Some(raw) => {
                    trace!("created engine {raw:p} with {threads} threads");
                    Ok(EmbeddedKaMinPar { raw })
                }
                None => Err(unsafe { take_error(&mut err) }),
            }
        }

        fn compute_partition(
            &mut self,
            graph: BorrowedGraph<'_>,
            num_partitions: u32,
            partition: &mut [u32],
        ) -> Result<(), EngineError> {
            let n = node_count_u32(graph.node_count())?;
            if partition.len() != graph.node_count() {
                return Err(EngineError::failure(format!(
                    "output buffer holds {} block ids for {n} nodes",
                    partition.len()
                )));
            }

            let vwgt = graph.node_weights.map_or(ptr::null_mut(), |w| w.as_mut_ptr());
            let adjwgt = graph.edge_weights.map_or(ptr::null_mut(), |w| w.as_mut_ptr());

            let mut err = kmp_error_t::new();
            unsafe {
                let status = kmp_embedding_borrow_and_mutate_graph(
                    self.raw.as_ptr(),
                    n,
                    graph.node_offsets.as_mut_ptr(),
                    graph.adjacency.as_mut_ptr(),
                    vwgt,
                    adjwgt,
                    &mut err,
                );
                check_status(status, &mut err)?;

                let status = kmp_embedding_compute_partition(
                    self.raw.as_ptr(),
                    num_partitions,
                    partition.as_mut_ptr(),
                    &mut err,
                );
                check_status(status, &mut err)
            }
        }
    }
}

#[cfg(feature = "builder")]
pub use self::builder::{KaMinParBuilder, KaMinParPartitioner};

#[cfg(feature = "builder")]
mod builder {
    use std::ffi::CString;

    use super::*;
    use crate::backend::{BuilderEngine, OptionPartitioner, RawPartition};

    /// `libkaminpar::PartitionerBuilder` holding its own copy of the graph. Freed on drop.
    pub struct KaMinParBuilder {
        raw: NonNull<kmp_builder_t>,
        node_count: usize,
        edge_count: usize,
    }

    impl Drop for KaMinParBuilder {
        fn drop(&mut self) {
            trace!("releasing builder {:p}", self.raw);
            unsafe { kmp_builder_free(self.raw.as_ptr()) };
        }
    }

    impl BuilderEngine for KaMinParBuilder {
        type Partitioner = KaMinParPartitioner;

        fn from_adjacency_array(node_offsets: &[u64], adjacency: &[u32]) -> Result<Self, EngineError> {
            let node_count = node_offsets.len().saturating_sub(1);
            let n = node_count_u32(node_count)?;

            let mut err = kmp_error_t::new();
            let raw = unsafe {
                kmp_builder_from_adjacency_array(n, node_offsets.as_ptr(), adjacency.as_ptr(), &mut err)
            };
            match NonNull::new(raw) {
                Some(raw) => Ok(KaMinParBuilder {
                    raw,
                    node_count,
                    edge_count: adjacency.len(),
                }),
                None => Err(unsafe { take_error(&mut err) }),
            }
        }

        fn with_node_weights(&mut self, node_weights: &[i32]) -> Result<(), EngineError> {
            if node_weights.len() != self.node_count {
                return Err(EngineError::invalid_parameter(format!(
                    "{} node weights for {} nodes",
                    node_weights.len(),
                    self.node_count
                )));
            }
            let mut err = kmp_error_t::new();
            unsafe {
                let status =
                    kmp_builder_with_node_weights(self.raw.as_ptr(), node_weights.as_ptr(), &mut err);
                check_status(status, &mut err)
            }
        }

        fn with_edge_weights(&mut self, edge_weights: &[i32]) -> Result<(), EngineError> {
            if edge_weights.len() != self.edge_count {
                return Err(EngineError::invalid_parameter(format!(
                    "{} edge weights for {} arcs",
                    edge_weights.len(),
                    self.edge_count
                )));
            }
            let mut err = kmp_error_t::new();
            unsafe {
                let status =
                    kmp_builder_with_edge_weights(self.raw.as_ptr(), edge_weights.as_ptr(), &mut err);
                check_status(status, &mut err)
            }
        }

        fn create(self) -> Result<KaMinParPartitioner, EngineError> {
            let mut err = kmp_error_t::new();
            let raw = unsafe { kmp_builder_create(self.raw.as_ptr(), &mut err) };
            // self (the builder) is released when this returns
            match NonNull::new(raw) {
                Some(raw) => Ok(KaMinParPartitioner { raw }),
                None => Err(unsafe { take_error(&mut err) }),
            }
        }
    }

    /// `libkaminpar::Partitioner`. Owns the last assignment it computed. Freed on drop.
    pub struct KaMinParPartitioner {
        raw: NonNull<kmp_partitioner_t>,
    }

    impl Drop for KaMinParPartitioner {
        fn drop(&mut self) {
            trace!("releasing partitioner {:p}", self.raw);
            unsafe { kmp_partitioner_free(self.raw.as_ptr()) };
        }
    }

    impl OptionPartitioner for KaMinParPartitioner {
        fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
            let (Ok(c_name), Ok(c_value)) = (CString::new(name), CString::new(value)) else {
                return Err(EngineError::invalid_parameter(format!(
                    "option {name:?}={value:?} contains a NUL byte"
                )));
            };
            let mut err = kmp_error_t::new();
            unsafe {
                let status = kmp_partitioner_set_option(
                    self.raw.as_ptr(),
                    c_name.as_ptr(),
                    c_value.as_ptr(),
                    &mut err,
                );
                check_status(status, &mut err)
            }
        }

        fn partition(&mut self, num_partitions: u32) -> Result<RawPartition<'_>, EngineError> {
            let mut len = 0;
            let mut err = kmp_error_t::new();
            let ptr = unsafe {
                kmp_partitioner_partition(self.raw.as_ptr(), num_partitions, &mut len, &mut err)
            };
            if err.status != KMP_OK {
                return Err(unsafe { take_error(&mut err) });
            }
            if ptr.is_null() && len != 0 {
                return Err(EngineError::failure(format!(
                    "engine returned no partition array but a length of {len}"
                )));
            }
            // SAFETY: the array lives inside the partitioner, which stays borrowed for '_
            Ok(unsafe { RawPartition::from_raw_parts(ptr, len) })
        }
    }
}
