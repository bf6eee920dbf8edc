use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;

/// Parameters of the self-gravity solver. Gravity is off unless the
/// section is present and enabled.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GravityParameters {
    #[serde(default)]
    pub enabled: bool,
    /// The gravitational constant in code units.
    #[serde(default = "default_gravity_constant")]
    pub gravity_constant: Float,
    /// The tree opening angle. Nodes with size/distance above this
    /// value are opened during the walk; zero degenerates to direct
    /// summation.
    #[serde(default = "default_opening_angle")]
    pub opening_angle: Float,
}

fn default_gravity_constant() -> Float {
    1.0
}

fn default_opening_angle() -> Float {
    0.5
}

impl Default for GravityParameters {
    fn default() -> Self {
        Self {
            enabled: false,
            gravity_constant: default_gravity_constant(),
            opening_angle: default_opening_angle(),
        }
    }
}
