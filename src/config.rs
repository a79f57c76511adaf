//! Partitioning parameters that do not depend on the graph.

use std::num::NonZeroU32;

pub const DEFAULT_EPSILON: f64 = 0.03;
pub const DEFAULT_SEED: u64 = 1;

/// Thread count, imbalance tolerance and seed for a partitioning run.
///
/// The setters never fail. Values the bridge can't represent are clamped, and everything else
/// goes to the engine unchanged because the engine decides what it accepts. The config is
/// `Copy`: `partition` works on its own snapshot, so changing the config afterwards does not
/// affect a call that already started or finished. The same config can be reused for any number
/// of graphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    threads: NonZeroU32,
    epsilon: f64,
    seed: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }
}

impl PartitionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// a single-threaded config with seed 1 and the given imbalance
    pub fn with_epsilon(epsilon: f64) -> Self {
        let mut config = PartitionConfig {
            threads: NonZeroU32::MIN,
            epsilon: DEFAULT_EPSILON,
            seed: DEFAULT_SEED,
        };
        config.set_epsilon(epsilon);
        config
    }

    /// Default config using every thread `std::thread::available_parallelism` reports, or one
    /// thread if it can't tell.
    pub fn with_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get().min(u32::MAX as usize) as u32)
            .unwrap_or(1);
        let mut config = Self::default();
        config.set_threads(threads);
        config
    }

    /// Number of engine worker threads. 0 is treated as 1.
    pub fn set_threads(&mut self, threads: u32) -> &mut Self {
        self.threads = NonZeroU32::new(threads).unwrap_or(NonZeroU32::MIN);
        self
    }

    /// Maximum fractional deviation of any block's weight from the balanced target.
    ///
    /// Negative values and NaN become 0. Infinity is kept. The embedding engine receives it
    /// as-is, and the option-string encoding refuses it.
    pub fn set_epsilon(&mut self, epsilon: f64) -> &mut Self {
        // also maps NaN and -0.0 to 0
        self.epsilon = if epsilon > 0.0 { epsilon } else { 0.0 };
        self
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn threads(&self) -> NonZeroU32 {
        self.threads
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
