use thiserror::Error;

use crate::prelude::Float;

/// Errors that escape a simulation step.
///
/// Everything that can be recovered locally is: a non-converged
/// smoothing-length iteration keeps the previous value, an
/// overflowing neighbour list is truncated and an energy drop below
/// the floor is clamped. Those paths log and raise per-particle
/// diagnostic flags instead of returning an error.
#[derive(Debug, Error)]
pub enum SphError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(
        "this binary was compiled for {compiled} dimension(s) but the \
         configuration requests {requested}; rebuild with the matching \
         dimension feature"
    )]
    DimensionMismatch { compiled: usize, requested: usize },
    #[error("{field} of particle {id} became non-finite at t = {time}")]
    NonFinite {
        field: &'static str,
        id: usize,
        time: Float,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
}
