use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::MVec;

/// The full per-particle state. Particles are kept in one contiguous
/// `Vec<Particle>`; every interaction pass reads the whole slice and
/// writes only to its own index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    pub pos: MVec,
    pub vel: MVec,
    /// Velocity predicted to the middle of the current step.
    pub vel_pred: MVec,
    pub acc: MVec,
    pub mass: Float,
    pub dens: Float,
    pub pres: Float,
    /// Specific internal energy.
    pub ene: Float,
    pub ene_pred: Float,
    /// du/dt.
    pub dene: Float,
    /// Smoothing length.
    pub sml: Float,
    /// Sound speed.
    pub sound: Float,
    /// Volume element m / rho.
    pub volume: Float,
    /// Smoothed internal-energy density, the primary quantity of the
    /// density-independent formulations.
    pub q_ene: Float,
    /// grad-h correction factor.
    pub gradh: Float,
    /// Balsara shear limiter, in [0, 1].
    pub balsara: Float,
    /// Artificial-viscosity coefficient.
    pub alpha: Float,
    /// Gravitational potential.
    pub phi: Float,
    pub id: usize,
    pub neighbor_count: usize,
    /// Point masses source external gravity but feel no SPH forces
    /// and do not enter density sums.
    pub is_point_mass: bool,
    /// Wall particles contribute to all sums but are held static.
    pub is_wall: bool,
    pub shock_sensor: Float,
    pub shock_mode: bool,
    pub old_shock_mode: bool,
    pub switch_to_no_shock_region: bool,
    /// Raised whenever the energy floor was applied during the
    /// correction step.
    pub ene_floored: bool,
}

impl Particle {
    pub fn new(pos: MVec, vel: MVec, mass: Float, ene: Float, id: usize) -> Self {
        Self {
            pos,
            vel,
            vel_pred: vel,
            acc: MVec::ZERO,
            mass,
            dens: 0.0,
            pres: 0.0,
            ene,
            ene_pred: ene,
            dene: 0.0,
            sml: 0.0,
            sound: 0.0,
            volume: 0.0,
            q_ene: 0.0,
            gradh: 1.0,
            balsara: 1.0,
            alpha: 0.0,
            phi: 0.0,
            id,
            neighbor_count: 0,
            is_point_mass: false,
            is_wall: false,
            shock_sensor: 0.0,
            shock_mode: false,
            old_shock_mode: false,
            switch_to_no_shock_region: false,
            ene_floored: false,
        }
    }

    pub fn point_mass(pos: MVec, vel: MVec, mass: Float, softening: Float, id: usize) -> Self {
        let mut particle = Self::new(pos, vel, mass, 0.0, id);
        particle.is_point_mass = true;
        particle.sml = softening;
        particle
    }
}
