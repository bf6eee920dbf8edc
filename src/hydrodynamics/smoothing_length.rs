use std::f64::consts::PI;

use log::warn;
use rayon::prelude::*;

use super::neighbour_search;
use super::HydrodynamicsParameters;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::quadtree::SphTree;

const MAX_ITERATIONS: usize = 10;
const RELATIVE_TOLERANCE: Float = 1e-4;

/// The volume of the unit ball in the effective dimension.
pub fn ball_volume_factor(dim: usize) -> Float {
    match dim {
        1 => 2.0,
        2 => PI,
        3 => 4.0 / 3.0 * PI,
        _ => unreachable!(),
    }
}

/// The smoothing length a particle starts out with, from the
/// initial-condition density: h = (N m / (rho A_d))^(1/d).
pub fn initial_smoothing_length(
    kernel: &Kernel,
    neighbor_number: usize,
    mass: Float,
    dens: Float,
) -> Float {
    let dim = kernel.dim() as Float;
    (neighbor_number as Float * mass / (dens * ball_volume_factor(kernel.dim()))).powf(1.0 / dim)
}

pub(super) struct SmlSolution {
    sml: Float,
    dens: Float,
    gradh: Float,
    neighbor_count: usize,
    converged: bool,
}

struct DensityEvaluation {
    dens: Float,
    dens_dh: Float,
    neighbor_count: usize,
}

fn evaluate_density(
    index: usize,
    particles: &[Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
    h: Float,
) -> DensityEvaluation {
    let pos = particles[index].pos;
    let support = kernel.support_radius(h);
    let mut dens = 0.0;
    let mut dens_dh = 0.0;
    let mut neighbor_count = 0;
    for neighbour in neighbour_search(tree, box_, &pos, support, parameters.max_neighbor_number) {
        let dist = box_.periodic_distance_vec(&pos, &neighbour.pos);
        if dist.length() < support {
            neighbor_count += 1;
        }
        dens += neighbour.mass * kernel.w_vec(&dist, h);
        dens_dh += neighbour.mass * kernel.dw_dh_vec(&dist, h);
    }
    DensityEvaluation {
        dens,
        dens_dh,
        neighbor_count,
    }
}

/// Newton-Raphson iteration on rho(h) h^d = m N / A_d with a
/// monotone bisection bracket. On failure the last iterate is kept
/// and the caller logs once.
fn solve_smoothing_length(
    index: usize,
    particles: &[Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
) -> SmlSolution {
    let particle = &particles[index];
    let dim = kernel.dim() as i32;
    let dim_float = kernel.dim() as Float;
    let target =
        particle.mass * parameters.neighbor_number as Float / ball_volume_factor(kernel.dim());
    let mut h = particle.sml;
    debug_assert!(h > 0.0);
    let mut lower: Float = 0.0;
    let mut upper = Float::INFINITY;
    let mut converged = !parameters.iterative_sml;
    if parameters.iterative_sml {
        for _ in 0..MAX_ITERATIONS {
            let evaluation =
                evaluate_density(index, particles, tree, kernel, box_, parameters, h);
            let residual = evaluation.dens * h.powi(dim) - target;
            if residual > 0.0 {
                upper = upper.min(h);
            } else {
                lower = lower.max(h);
            }
            let slope =
                evaluation.dens_dh * h.powi(dim) + dim_float * evaluation.dens * h.powi(dim - 1);
            let mut h_new = if slope > 0.0 { h - residual / slope } else { Float::NAN };
            let invalid = !h_new.is_finite()
                || h_new <= lower
                || h_new >= upper
                || h_new < 0.5 * h
                || h_new > 2.0 * h;
            if invalid {
                // Bisect the bracket, or expand towards the open end.
                h_new = if residual > 0.0 {
                    if lower > 0.0 {
                        0.5 * (h + lower)
                    } else {
                        0.5 * h
                    }
                } else if upper.is_finite() {
                    0.5 * (h + upper)
                } else {
                    2.0 * h
                };
            }
            let change = (h_new - h).abs() / h;
            h = h_new;
            if change < RELATIVE_TOLERANCE {
                converged = true;
                break;
            }
        }
    }
    let evaluation = evaluate_density(index, particles, tree, kernel, box_, parameters, h);
    let gradh = if evaluation.dens > 0.0 {
        1.0 / (1.0 + h / (dim_float * evaluation.dens) * evaluation.dens_dh)
    } else {
        1.0
    };
    SmlSolution {
        sml: h,
        dens: evaluation.dens,
        gradh,
        neighbor_count: evaluation.neighbor_count,
        converged,
    }
}

/// Solves the smoothing-length condition for every SPH particle and
/// stores h, the kernel-weighted density, the grad-h correction and
/// the neighbour count.
pub(crate) fn update_smoothing_lengths_and_densities(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
) {
    let solutions: Vec<Option<SmlSolution>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            if particles[index].is_point_mass {
                return None;
            }
            Some(solve_smoothing_length(
                index, particles, tree, kernel, box_, parameters,
            ))
        })
        .collect();
    for (particle, solution) in particles.iter_mut().zip(solutions) {
        if let Some(solution) = solution {
            if !solution.converged {
                warn!(
                    "smoothing length of particle {} did not converge, keeping h = {:.6e}",
                    particle.id, solution.sml
                );
            }
            particle.sml = solution.sml;
            particle.dens = solution.dens;
            particle.gradh = solution.gradh;
            particle.neighbor_count = solution.neighbor_count;
            if solution.dens > 0.0 {
                particle.volume = particle.mass / solution.dens;
            }
        }
    }
}
