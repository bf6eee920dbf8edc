use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimestepParameters {
    /// The Courant factor on h / c.
    #[serde(default = "default_cfl_sound")]
    pub cfl_sound: Float,
    /// The factor on sqrt(h / |a|).
    #[serde(default = "default_cfl_force")]
    pub cfl_force: Float,
    /// The factor on the global minimum of h / v_sig.
    #[serde(default = "default_cfl_signal")]
    pub cfl_signal: Float,
    #[serde(default = "default_min_timestep")]
    pub min_timestep: Float,
    #[serde(default = "default_max_timestep")]
    pub max_timestep: Float,
}

fn default_cfl_sound() -> Float {
    0.3
}

fn default_cfl_force() -> Float {
    0.25
}

fn default_cfl_signal() -> Float {
    0.2
}

fn default_min_timestep() -> Float {
    0.0
}

fn default_max_timestep() -> Float {
    Float::INFINITY
}

impl Default for TimestepParameters {
    fn default() -> Self {
        Self {
            cfl_sound: default_cfl_sound(),
            cfl_force: default_cfl_force(),
            cfl_signal: default_cfl_signal(),
            min_timestep: default_min_timestep(),
            max_timestep: default_max_timestep(),
        }
    }
}
