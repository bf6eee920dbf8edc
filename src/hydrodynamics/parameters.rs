use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::KernelType;

/// The four compressible-flow discretisations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SphVariant {
    Ssph,
    Disph,
    Gsph,
    Gdisph,
}

impl SphVariant {
    /// Whether the volume-element (energy-density) backbone is used.
    pub fn is_density_independent(&self) -> bool {
        matches!(self, Self::Disph | Self::Gdisph)
    }

    /// Whether pair interactions go through the Riemann solver.
    pub fn is_godunov(&self) -> bool {
        matches!(self, Self::Gsph | Self::Gdisph)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrodynamicsParameters {
    pub sph_type: SphVariant,
    #[serde(default)]
    pub kernel: KernelType,
    /// The adiabatic index of the ideal-gas equation of state.
    #[serde(default = "default_gamma")]
    pub gamma: Float,
    /// The number of neighbours the adaptive smoothing length aims
    /// for.
    #[serde(default = "default_neighbor_number")]
    pub neighbor_number: usize,
    /// Whether to solve for the smoothing length iteratively every
    /// step. When disabled, smoothing lengths keep their initial
    /// values.
    #[serde(default = "default_true")]
    pub iterative_sml: bool,
    /// The hard cap on the neighbour list. An overflowing search
    /// logs a warning and truncates; the timestep may become unsafe.
    #[serde(default = "default_max_neighbor_number")]
    pub max_neighbor_number: usize,
    #[serde(default)]
    pub artificial_viscosity: ArtificialViscosityParameters,
    /// Second-order MUSCL reconstruction of the Riemann states
    /// (Godunov variants only).
    #[serde(default)]
    pub use_second_order: bool,
    /// The floor on the specific internal energy, in code units.
    #[serde(default = "default_ene_floor")]
    pub ene_floor: Float,
    /// The thin-slab mode: three-dimensional positions with a
    /// two-dimensional kernel normalisation and a fixed vertical
    /// smoothing length.
    #[serde(default)]
    pub two_and_half_sim: Option<TwoAndHalfParameters>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoAndHalfParameters {
    pub h_z: Float,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtificialViscosityParameters {
    #[serde(default = "default_true")]
    pub use_balsara_switch: bool,
    #[serde(default)]
    pub use_time_dependent_av: bool,
    /// The viscosity coefficient used when the time-dependent
    /// evolution is off, and the initial value when it is on.
    #[serde(default = "default_alpha")]
    pub alpha: Float,
    #[serde(default = "default_alpha_min")]
    pub alpha_min: Float,
    #[serde(default = "default_alpha_max")]
    pub alpha_max: Float,
    /// The decay-rate coefficient of the time-dependent viscosity.
    #[serde(default = "default_epsilon")]
    pub epsilon: Float,
    /// The small-r regularisation of the viscous tensor, in units of
    /// the pair-averaged smoothing length.
    #[serde(default = "default_eta_coefficient")]
    pub eta_coefficient: Float,
}

fn default_gamma() -> Float {
    5.0 / 3.0
}

fn default_neighbor_number() -> usize {
    32
}

fn default_true() -> bool {
    true
}

fn default_max_neighbor_number() -> usize {
    256
}

fn default_alpha() -> Float {
    1.0
}

fn default_alpha_min() -> Float {
    0.1
}

fn default_alpha_max() -> Float {
    2.0
}

fn default_epsilon() -> Float {
    0.2
}

fn default_eta_coefficient() -> Float {
    0.1
}

fn default_ene_floor() -> Float {
    1e-8
}

impl Default for ArtificialViscosityParameters {
    fn default() -> Self {
        Self {
            use_balsara_switch: true,
            use_time_dependent_av: false,
            alpha: default_alpha(),
            alpha_min: default_alpha_min(),
            alpha_max: default_alpha_max(),
            epsilon: default_epsilon(),
            eta_coefficient: default_eta_coefficient(),
        }
    }
}

impl HydrodynamicsParameters {
    /// The initial viscosity coefficient of a freshly created
    /// particle.
    pub fn initial_alpha(&self) -> Float {
        if self.artificial_viscosity.use_time_dependent_av {
            self.artificial_viscosity.alpha_max
        } else {
            self.artificial_viscosity.alpha
        }
    }
}
