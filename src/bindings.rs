//! Raw declarations of `csrc/kaminpar_shim.h`.
//!
//! The shim gives each engine convention a C ABI. C++ exceptions are caught on the C++ side and
//! reported through `kmp_error_t`.
#![allow(bad_style, unused)]

use libc::{c_char, c_double, c_int, size_t};

pub type kmp_status_t = c_int;

pub const KMP_OK: kmp_status_t = 0;
pub const KMP_INVALID_PARAMETER: kmp_status_t = 1;
pub const KMP_OUT_OF_MEMORY: kmp_status_t = 2;
pub const KMP_FAILURE: kmp_status_t = 3;

/// `msg` is allocated with `malloc` by the shim and released by the caller with `free`.
#[repr(C)]
#[derive(Debug)]
pub struct kmp_error_t {
    pub status: kmp_status_t,
    pub msg: *mut c_char,
    pub msg_len: size_t,
}

impl kmp_error_t {
    pub const fn new() -> Self {
        kmp_error_t {
            status: KMP_OK,
            msg: std::ptr::null_mut(),
            msg_len: 0,
        }
    }
}

#[cfg(feature = "embedding")]
#[repr(C)]
pub struct kmp_embedding_t {
    _private: [u8; 0],
}

#[cfg(feature = "embedding")]
extern "C" {
    /// `kaminpar::KaMinPar(threads, create_default_context())` with epsilon and seed applied and
    /// console output silenced
    pub fn kmp_embedding_new(
        threads: c_int,
        epsilon: c_double,
        seed: c_int,
        err: *mut kmp_error_t,
    ) -> *mut kmp_embedding_t;

    /// `vwgt` and `adjwgt` may be null. All arrays stay borrowed (and may be mutated) until
    /// `kmp_embedding_free`.
    pub fn kmp_embedding_borrow_and_mutate_graph(
        handle: *mut kmp_embedding_t,
        n: u32,
        xadj: *mut u64,
        adjncy: *mut u32,
        vwgt: *mut i32,
        adjwgt: *mut i64,
        err: *mut kmp_error_t,
    ) -> kmp_status_t;

    /// writes `n` block ids to `partition`. `k == 0` is refused with `KMP_INVALID_PARAMETER`.
    pub fn kmp_embedding_compute_partition(
        handle: *mut kmp_embedding_t,
        k: u32,
        partition: *mut u32,
        err: *mut kmp_error_t,
    ) -> kmp_status_t;

    pub fn kmp_embedding_free(handle: *mut kmp_embedding_t);
}

#[cfg(feature = "builder")]
#[repr(C)]
pub struct kmp_builder_t {
    _private: [u8; 0],
}

#[cfg(feature = "builder")]
#[repr(C)]
pub struct kmp_partitioner_t {
    _private: [u8; 0],
}

#[cfg(feature = "builder")]
extern "C" {
    /// copies `nodes[0..=n]` and `edges[0..nodes[n]]`
    pub fn kmp_builder_from_adjacency_array(
        n: u32,
        nodes: *const u64,
        edges: *const u32,
        err: *mut kmp_error_t,
    ) -> *mut kmp_builder_t;

    /// copies `n` weights
    pub fn kmp_builder_with_node_weights(
        builder: *mut kmp_builder_t,
        node_weights: *const i32,
        err: *mut kmp_error_t,
    ) -> kmp_status_t;

    /// copies `nodes[n]` weights
    pub fn kmp_builder_with_edge_weights(
        builder: *mut kmp_builder_t,
        edge_weights: *const i32,
        err: *mut kmp_error_t,
    ) -> kmp_status_t;

    /// Moves the builder's arrays into the partitioner, which keeps them alive until it is freed.
    /// The emptied builder must still be freed and is not reused.
    pub fn kmp_builder_create(
        builder: *mut kmp_builder_t,
        err: *mut kmp_error_t,
    ) -> *mut kmp_partitioner_t;

    pub fn kmp_builder_free(builder: *mut kmp_builder_t);

    pub fn kmp_partitioner_set_option(
        partitioner: *mut kmp_partitioner_t,
        name: *const c_char,
        value: *const c_char,
        err: *mut kmp_error_t,
    ) -> kmp_status_t;

    /// `k == 0` is refused with `KMP_INVALID_PARAMETER`.
    ///
    /// The returned array is owned by the partitioner and lives until the next call to
    /// `kmp_partitioner_partition` or `kmp_partitioner_free`.
    pub fn kmp_partitioner_partition(
        partitioner: *mut kmp_partitioner_t,
        k: u32,
        len: *mut size_t,
        err: *mut kmp_error_t,
    ) -> *const u32;

    pub fn kmp_partitioner_free(partitioner: *mut kmp_partitioner_t);
}
