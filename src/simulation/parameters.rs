use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::NUM_DIMENSIONS;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationParameters {
    /// The time at which the run stops.
    pub end_time: Float,
    /// The spatial dimension of the run. Checked against the
    /// dimension this binary was compiled for.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// The initial-condition file read at startup (unless the run is
    /// resumed from a checkpoint).
    #[serde(default)]
    pub initial_conditions: Option<PathBuf>,
}

fn default_dimension() -> usize {
    NUM_DIMENSIONS
}
