pub(crate) mod artificial_viscosity;
mod disph;
mod gdisph;
mod gradients;
mod gsph;
pub mod parameters;
pub mod riemann;
mod scheme;
pub(crate) mod smoothing_length;
mod ssph;

use log::warn;

pub use self::gradients::register_gradient_columns;
pub use self::parameters::ArtificialViscosityParameters;
pub use self::parameters::HydrodynamicsParameters;
pub use self::parameters::SphVariant;
pub use self::parameters::TwoAndHalfParameters;
pub use self::scheme::make_scheme;
pub use self::scheme::Scheme;
pub use self::smoothing_length::initial_smoothing_length;
use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::quadtree::LeafData;
use crate::quadtree::SphTree;

/// p = (gamma - 1) rho u.
pub fn equation_of_state_pressure(gamma: Float, dens: Float, ene: Float) -> Float {
    (gamma - 1.0) * dens * ene
}

/// c = sqrt(gamma p / rho).
pub fn sound_speed(gamma: Float, pres: Float, dens: Float) -> Float {
    if pres > 0.0 && dens > 0.0 {
        (gamma * pres / dens).sqrt()
    } else {
        0.0
    }
}

/// The ball neighbour query with the configured hard cap. An
/// overflowing list is truncated; the force sums then miss pairs and
/// the timestep may become unsafe, which is why this warns.
pub(crate) fn neighbour_search<'a>(
    tree: &'a SphTree,
    box_: &SimulationBox,
    pos: &MVec,
    radius: Float,
    max_neighbor_number: usize,
) -> Vec<&'a LeafData> {
    let mut neighbours = tree.get_particles_in_radius(box_, pos, radius);
    if neighbours.len() > max_neighbor_number {
        warn!(
            "neighbour list overflow: {} > {}, truncating",
            neighbours.len(),
            max_neighbor_number
        );
        neighbours.truncate(max_neighbor_number);
    }
    neighbours
}

/// Pressure, sound speed and volume element from the predicted
/// internal energy (standard and Godunov variants).
pub(crate) fn set_standard_pressures(particles: &mut [Particle], gamma: Float) {
    for particle in particles.iter_mut() {
        if particle.is_point_mass {
            continue;
        }
        particle.pres = equation_of_state_pressure(gamma, particle.dens, particle.ene_pred);
        particle.sound = sound_speed(gamma, particle.pres, particle.dens);
        if particle.dens > 0.0 {
            particle.volume = particle.mass / particle.dens;
        }
    }
}

/// The density-independent primary quantities: the smoothed
/// internal-energy density q = sum_j m_j u_j W_ij(h_i), its grad-h
/// analogue on dq/dh, and the pressure p = (gamma - 1) q.
///
/// Smoothing lengths and kernel-weighted densities must already be
/// solved; the sound speed still uses the mass density.
pub(crate) fn update_energy_densities(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &crate::prelude::Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
) {
    use rayon::prelude::*;
    struct EnergyDensityUpdate {
        q_ene: Float,
        gradh: Float,
    }
    let dim = kernel.dim() as Float;
    let updates: Vec<Option<EnergyDensityUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass {
                return None;
            }
            let support = kernel.support_radius(particle.sml);
            let mut q_ene = 0.0;
            let mut dq_dh = 0.0;
            for neighbour in neighbour_search(
                tree,
                box_,
                &particle.pos,
                support,
                parameters.max_neighbor_number,
            ) {
                let other = &particles[neighbour.index];
                let dist = box_.periodic_distance_vec(&particle.pos, &other.pos);
                q_ene += other.mass * other.ene_pred * kernel.w_vec(&dist, particle.sml);
                dq_dh += other.mass * other.ene_pred * kernel.dw_dh_vec(&dist, particle.sml);
            }
            let gradh = if q_ene > 0.0 {
                1.0 / (1.0 + particle.sml / (dim * q_ene) * dq_dh)
            } else {
                1.0
            };
            Some(EnergyDensityUpdate { q_ene, gradh })
        })
        .collect();
    for (particle, update) in particles.iter_mut().zip(updates) {
        if let Some(update) = update {
            particle.q_ene = update.q_ene;
            particle.gradh = update.gradh;
            particle.pres = (parameters.gamma - 1.0) * update.q_ene;
            particle.sound = sound_speed(parameters.gamma, particle.pres, particle.dens);
            if particle.dens > 0.0 {
                particle.volume = particle.mass / particle.dens;
            }
        }
    }
}
