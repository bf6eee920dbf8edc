use rayon::prelude::*;

use super::artificial_viscosity::balsara_and_signal_pass;
use super::gradients::gradient_pass;
use super::gradients::reconstruct_pair;
use super::neighbour_search;
use super::riemann::solve_hll;
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
use crate::simulation::AuxColumns;

/// Godunov SPH on the density-independent backbone: the Riemann step
/// of the Godunov variant combined with the energy-density volume
/// elements. In smooth flow the pair pressure is blended back
/// towards the inviscid mean pressure through the shock diagnostics
/// and the Balsara factor, so the Riemann dissipation acts where
/// shocks are and contact surfaces stay quiet.
pub struct Gdisph;

impl Scheme for Gdisph {
    fn pre_interaction(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let dt = sim.dt;
        let (particles, tree, kernel, box_, aux) = sim.interaction_views();
        update_smoothing_lengths_and_densities(particles, tree, kernel, box_, hydro);
        update_energy_densities(particles, tree, kernel, box_, hydro);
        gradient_pass(particles, tree, kernel, box_, hydro, aux);
        let h_per_v_sig = balsara_and_signal_pass(particles, tree, kernel, box_, hydro, dt);
        sim.h_per_v_sig = h_per_v_sig;
    }

    fn fluid_force(&self, sim: &mut Simulation, parameters: &Parameters) {
        let hydro = &parameters.hydrodynamics;
        let (particles, tree, kernel, box_, aux) = sim.interaction_views();
        riemann_energy_density_force(particles, tree, kernel, box_, hydro, aux);
    }
}

struct ForceUpdate {
    acc: MVec,
    dene: Float,
}

/// The effective pair pressure: the full Riemann pressure inside and
/// just downstream of shocks, the Balsara-weighted blend with the
/// mean pressure elsewhere.
fn effective_pair_pressure(particle: &Particle, other: &Particle, pres_star: Float) -> Float {
    let shock = particle.shock_mode
        || other.shock_mode
        || particle.switch_to_no_shock_region
        || other.switch_to_no_shock_region;
    let weight = if shock {
        1.0
    } else {
        0.5 * (particle.balsara + other.balsara)
    };
    let pres_mean = 0.5 * (particle.pres + other.pres);
    pres_mean + weight * (pres_star - pres_mean)
}

fn riemann_energy_density_force(
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
            if particle.is_point_mass || particle.dens == 0.0 || particle.q_ene == 0.0 {
                return None;
            }
            let volume_i = particle.mass * particle.ene_pred / particle.q_ene;
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
                if other.dens == 0.0 || other.q_ene == 0.0 {
                    continue;
                }
                let dist = box_.periodic_distance_vec(&particle.pos, &other.pos);
                let r = dist.length();
                if r == 0.0 {
                    continue;
                }
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
                let pres_eff = effective_pair_pressure(particle, other, solution.pres_star);
                let volume_j = other.mass * other.ene_pred / other.q_ene;
                let grad_i = kernel.grad_w_vec(&dist, particle.sml);
                let grad_j = kernel.grad_w_vec(&dist, other.sml);
                let grad_mean = (grad_i + grad_j) * 0.5;
                let coefficient =
                    pres_eff * (volume_i.powi(2) + volume_j.powi(2)) / particle.mass;
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
