use rayon::prelude::*;

use super::artificial_viscosity::balsara_and_signal_pass;
use super::gradients::gradient_pass;
use super::gradients::reconstruct_pair;
use super::neighbour_search;
use super::riemann::solve_hll;
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
use crate::simulation::AuxColumns;

/// Godunov SPH: the pair interaction pressure comes from a
/// one-dimensional HLL Riemann problem on the pair axis, which
/// provides the upwinding that artificial viscosity provides in the
/// standard formulation.
pub struct Gsph;

impl Scheme for Gsph {
    fn pre_interaction(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let dt = sim.dt;
        let (particles, tree, kernel, box_, aux) = sim.interaction_views();
        update_smoothing_lengths_and_densities(particles, tree, kernel, box_, hydro);
        set_standard_pressures(particles, hydro.gamma);
        gradient_pass(particles, tree, kernel, box_, hydro, aux);
        let h_per_v_sig = balsara_and_signal_pass(particles, tree, kernel, box_, hydro, dt);
        sim.h_per_v_sig = h_per_v_sig;
    }

    fn fluid_force(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let (particles, tree, kernel, box_, aux) = sim.interaction_views();
        riemann_force(particles, tree, kernel, box_, hydro, aux);
    }
}

struct ForceUpdate {
    acc: MVec,
    dene: Float,
}

fn riemann_force(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
    aux: &AuxColumns,
) {
    let updates: Vec<Option<ForceUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass || particle.dens == 0.0 {
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
                if other.dens == 0.0 {
                    continue;
                }
                let dist = box_.periodic_distance_vec(&particle.pos, &other.pos);
                let r = dist.length();
                if r == 0.0 {
                    continue;
                }
                // The pair axis, pointing from i towards j, so that
                // approaching pairs pose a compressive Riemann
                // problem.
                let e_ij = -dist / r;
                let (left, right) = reconstruct_pair(
                    particles,
                    index,
                    neighbour.index,
                    e_ij,
                    r,
                    parameters.gamma,
                    aux,
                    parameters.use_second_order,
                );
                let solution = solve_hll(left, right);
                let grad_i = kernel.grad_w_vec(&dist, particle.sml);
                let grad_j = kernel.grad_w_vec(&dist, other.sml);
                // The symmetrised gradient keeps the pair force
                // exactly antisymmetric.
                let grad_mean = (grad_i + grad_j) * 0.5;
                let coefficient = other.mass
                    * solution.pres_star
                    * (1.0 / particle.dens.powi(2) + 1.0 / other.dens.powi(2));
                acc -= grad_mean * coefficient;
                let vel_star = e_ij * solution.vel_star;
                dene += coefficient * (particle.vel_pred - vel_star).dot(grad_mean);
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
