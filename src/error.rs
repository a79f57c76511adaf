//! Error taxonomy of the bridge.
//!
//! Everything up to [`Error::WeightLengthMismatch`] is raised locally, before the engine is
//! touched. The last two variants wrap what the engine reported.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// structural CSR violation in the node offsets
    #[error("malformed node offsets: {0}")]
    MalformedOffsets(String),

    /// an adjacency entry names a node that does not exist
    #[error("adjacency[{position}] = {node} is out of range for {node_count} nodes")]
    OutOfRangeAdjacency {
        position: usize,
        node: u32,
        node_count: usize,
    },

    #[error("{kind} weights have length {actual}, expected {expected}")]
    WeightLengthMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// the engine (or the encoding step in front of it) rejected a configuration value
    #[error("engine rejected configuration: {0}")]
    BackendConfiguration(String),

    #[error("engine failure: {0}")]
    EngineFailure(String),
}

/// Status reported by the native shim, see `csrc/kaminpar_shim.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InvalidParameter,
    OutOfMemory,
    Failure,
}

/// Failure reported by an engine implementation.
///
/// Engine traits return this instead of [`Error`] so that an engine does not need to know the
/// bridge's taxonomy. The adapters convert it with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub status: Status,
    pub message: String,
}

impl EngineError {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        EngineError {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(Status::InvalidParameter, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(Status::Failure, message)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)
    }
}

impl std::error::Error for EngineError {}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err.status {
            Status::InvalidParameter => Error::BackendConfiguration(err.message),
            Status::OutOfMemory => Error::EngineFailure(format!("out of memory: {}", err.message)),
            Status::Failure => Error::EngineFailure(err.message),
        }
    }
}
