use rayon::prelude::*;

use super::artificial_viscosity::balsara_and_signal_pass;
use super::artificial_viscosity::pair_viscosity;
use super::neighbour_search;
use super::scheme::Scheme;
use super::set_standard_pressures;
use super::smoothing_length::update_smoothing_lengths_and_densities;
use super::HydrodynamicsParameters;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::Simulation;
use crate::prelude::SimulationBox;
use crate::quadtree::SphTree;

/// Standard SPH: kernel-weighted density, symmetric pressure
/// gradients with grad-h corrections, Monaghan artificial viscosity.
pub struct Ssph;

impl Scheme for Ssph {
    fn pre_interaction(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let dt = sim.dt;
        let (particles, tree, kernel, box_, _) = sim.interaction_views();
        update_smoothing_lengths_and_densities(particles, tree, kernel, box_, hydro);
        set_standard_pressures(particles, hydro.gamma);
        let h_per_v_sig = balsara_and_signal_pass(particles, tree, kernel, box_, hydro, dt);
        sim.h_per_v_sig = h_per_v_sig;
    }

    fn fluid_force(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let (particles, tree, kernel, box_, _) = sim.interaction_views();
        pressure_gradient_force(particles, tree, kernel, box_, hydro);
    }
}

struct ForceUpdate {
    acc: MVec,
    dene: Float,
}

fn pressure_gradient_force(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
) {
    let updates: Vec<Option<ForceUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass || particle.dens == 0.0 {
                return None;
            }
            let term_i = particle.pres * particle.gradh / particle.dens.powi(2);
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
                if other.dens == 0.0 {
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
                let term_j = other.pres * other.gradh / other.dens.powi(2);
                let vel_ij = particle.vel_pred - other.vel_pred;
                let viscosity = pair_viscosity(particle, other, &dist, r, parameters);
                acc -= (grad_i * term_i + grad_j * term_j + grad_mean * viscosity) * other.mass;
                dene += other.mass * term_i * vel_ij.dot(grad_i)
                    + 0.5 * other.mass * viscosity * vel_ij.dot(grad_mean);
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
