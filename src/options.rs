//! String encoding of a [`PartitionConfig`] for engines configured through CLI-style options.
//!
//! The engine parses these strings itself, so a malformed value is a runtime misconfiguration
//! on its side. Everything numeric is therefore produced here, in one place.

use crate::config::PartitionConfig;
use crate::error::{Error, Result};

pub const THREADS: &str = "--threads";
pub const EPSILON: &str = "--epsilon";
pub const SEED: &str = "--seed";

/// One `name=value` pair as handed to the engine's `set_option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOption {
    pub name: &'static str,
    pub value: String,
}

/// Encodes `config` as the option list the builder convention expects, in the order it is
/// applied: threads, epsilon, seed.
///
/// Counts and the seed are plain decimal integers. Epsilon is a decimal literal that parses back
/// to the same `f64`. A non-finite epsilon has no such literal and fails with
/// [`Error::BackendConfiguration`].
pub fn encode(config: &PartitionConfig) -> Result<Vec<EngineOption>> {
    Ok(vec![
        EngineOption {
            name: THREADS,
            value: config.threads().to_string(),
        },
        EngineOption {
            name: EPSILON,
            value: format_epsilon(config.epsilon())?,
        },
        EngineOption {
            name: SEED,
            value: config.seed().to_string(),
        },
    ])
}

/// `Display` for `f64` prints the shortest digit string that round-trips and never switches to
/// exponent notation, which is what a `strtod`-style parser wants.
pub fn format_epsilon(epsilon: f64) -> Result<String> {
    if !epsilon.is_finite() {
        return Err(Error::BackendConfiguration(format!(
            "epsilon {epsilon} has no decimal encoding"
        )));
    }
    Ok(format!("{epsilon}"))
}
