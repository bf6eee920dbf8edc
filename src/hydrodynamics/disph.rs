use rayon::prelude::*;

use super::artificial_viscosity::balsara_and_signal_pass;
use super::artificial_viscosity::pair_viscosity;
use super::neighbour_search;
use super::scheme::Scheme;
use super::smoothing_length::update_smoothing_lengths_and_densities;
use super::update_energy_densities;
use super::HydrodynamicsParameters;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::Simulation;
use crate::prelude::SimulationBox;
use crate::quadtree::SphTree;

/// Density-independent SPH in the energy-density formulation: the
/// smoothed internal-energy density q is the primary quantity and
/// the pressure is p = (gamma - 1) q, which removes the spurious
/// surface tension of the standard formulation at contact
/// discontinuities.
pub struct Disph;

impl Scheme for Disph {
    fn pre_interaction(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let dt = sim.dt;
        let (particles, tree, kernel, box_, _) = sim.interaction_views();
        // The smoothing length is still solved against the mass
        // density; the energy density rides on the converged h.
        update_smoothing_lengths_and_densities(particles, tree, kernel, box_, hydro);
        update_energy_densities(particles, tree, kernel, box_, hydro);
        let h_per_v_sig = balsara_and_signal_pass(particles, tree, kernel, box_, hydro, dt);
        sim.h_per_v_sig = h_per_v_sig;
    }

    fn fluid_force(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let (particles, tree, kernel, box_, _) = sim.interaction_views();
        energy_density_force(particles, tree, kernel, box_, hydro);
    }
}

struct ForceUpdate {
    acc: MVec,
    dene: Float,
}

fn energy_density_force(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
) {
    let gamma_1 = parameters.gamma - 1.0;
    let updates: Vec<Option<ForceUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass || particle.dens == 0.0 || particle.pres == 0.0 {
                return None;
            }
            let support = kernel.support_radius(particle.sml);
            let mut acc = MVec::ZERO;
            let mut dene = 0.0;
            for neighbour in neighbour_search(
                tree,
                box_,
                &particle.pos,
                support,
                parameters.max_neighbor_number,
            ) {
                if neighbour.index == index {
                    continue;
                }
                let other = &particles[neighbour.index];
                if other.dens == 0.0 || other.pres == 0.0 {
                    continue;
                }
                let dist = box_.periodic_distance_vec(&particle.pos, &other.pos);
                let r = dist.length();
                if r == 0.0 {
                    continue;
                }
                let grad_i = kernel.grad_w_vec(&dist, particle.sml);
                let grad_j = kernel.grad_w_vec(&dist, other.sml);
                let grad_mean = (grad_i + grad_j) * 0.5;
                let vel_ij = particle.vel_pred - other.vel_pred;
                // Saitoh & Makino 2013, energy-density momentum and
                // energy equations.
                let pair_energy =
                    gamma_1.powi(2) * other.mass * particle.ene_pred * other.ene_pred;
                acc -= (grad_i * (particle.gradh / particle.pres)
                    + grad_j * (other.gradh / other.pres))
                    * pair_energy;
                dene += pair_energy * particle.gradh / particle.pres * vel_ij.dot(grad_i);
                let viscosity = pair_viscosity(particle, other, &dist, r, parameters);
                acc -= grad_mean * (other.mass * viscosity);
                dene += 0.5 * other.mass * viscosity * vel_ij.dot(grad_mean);
            }
            Some(ForceUpdate { acc, dene })
        })
        .collect();
    for (particle, update) in particles.iter_mut().zip(updates) {
        match update {
            Some(update) => {
                particle.acc = update.acc;
                particle.dene = update.dene;
            }
            None => {
                particle.acc = MVec::ZERO;
                particle.dene = 0.0;
            }
        }
    }
}
