use ordered_float::OrderedFloat;
use rayon::prelude::*;

use super::neighbour_search;
use super::HydrodynamicsParameters;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::quadtree::SphTree;

/// Above this value of -h div(v) / c a particle counts as sitting in
/// a shock.
pub(crate) const SHOCK_SENSOR_THRESHOLD: Float = 0.3;

/// The Monaghan viscous tensor Pi_ij for one pair, already modulated
/// by the Balsara switch. Zero for receding pairs.
pub(crate) fn pair_viscosity(
    particle_i: &Particle,
    particle_j: &Particle,
    dist: &MVec,
    r: Float,
    parameters: &HydrodynamicsParameters,
) -> Float {
    let av = &parameters.artificial_viscosity;
    let vel_ij = particle_i.vel_pred - particle_j.vel_pred;
    let approach = dist.dot(vel_ij);
    if approach >= 0.0 {
        return 0.0;
    }
    let h_mean = 0.5 * (particle_i.sml + particle_j.sml);
    let eta_squared = (av.eta_coefficient * h_mean).powi(2);
    let mu = h_mean * approach / (r.powi(2) + eta_squared);
    let sound_mean = 0.5 * (particle_i.sound + particle_j.sound);
    let dens_mean = 0.5 * (particle_i.dens + particle_j.dens);
    let alpha = 0.5 * (particle_i.alpha + particle_j.alpha);
    let beta = 2.0 * alpha;
    let mut viscosity = (-alpha * sound_mean * mu + beta * mu.powi(2)) / dens_mean;
    if av.use_balsara_switch {
        viscosity *= 0.5 * (particle_i.balsara + particle_j.balsara);
    }
    viscosity
}

#[cfg(feature = "1d")]
fn cross_magnitude_accumulate(curl: &mut Float, _dv: MVec, _grad: MVec, _mass: Float) {
    *curl = 0.0;
}

#[cfg(all(feature = "2d", not(feature = "1d")))]
fn cross_magnitude_accumulate(curl: &mut Float, dv: MVec, grad: MVec, mass: Float) {
    *curl += mass * (dv.x * grad.y - dv.y * grad.x);
}

#[cfg(not(any(feature = "1d", feature = "2d")))]
fn cross_magnitude_accumulate(curl: &mut MVec, dv: MVec, grad: MVec, mass: Float) {
    *curl += mass * dv.cross(grad);
}

#[cfg(any(feature = "1d", feature = "2d"))]
type CurlAccumulator = Float;
#[cfg(not(any(feature = "1d", feature = "2d")))]
type CurlAccumulator = MVec;

#[cfg(any(feature = "1d", feature = "2d"))]
fn curl_magnitude(curl: CurlAccumulator) -> Float {
    curl.abs()
}

#[cfg(not(any(feature = "1d", feature = "2d")))]
fn curl_magnitude(curl: CurlAccumulator) -> Float {
    curl.length()
}

#[cfg(any(feature = "1d", feature = "2d"))]
fn curl_zero() -> CurlAccumulator {
    0.0
}

#[cfg(not(any(feature = "1d", feature = "2d")))]
fn curl_zero() -> CurlAccumulator {
    MVec::ZERO
}

struct SignalUpdate {
    balsara: Float,
    alpha: Float,
    shock_sensor: Float,
    shock_mode: bool,
    h_per_v_sig: Float,
}

/// Computes the Balsara switch, integrates the time-dependent
/// viscosity coefficient, updates the shock diagnostics and returns
/// the global minimum of h / v_sig over all approaching pairs.
///
/// Requires densities, pressures and sound speeds of the current
/// step.
pub(crate) fn balsara_and_signal_pass(
    particles: &mut [Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
    dt: Float,
) -> Float {
    let av = &parameters.artificial_viscosity;
    let updates: Vec<Option<SignalUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass {
                return None;
            }
            let pos = particle.pos;
            let h = particle.sml;
            let support = kernel.support_radius(h);
            let mut div_v = 0.0;
            let mut curl = curl_zero();
            let mut min_h_per_v_sig = Float::INFINITY;
            for neighbour in
                neighbour_search(tree, box_, &pos, support, parameters.max_neighbor_number)
            {
                if neighbour.index == index {
                    continue;
                }
                let other = &particles[neighbour.index];
                let dist = box_.periodic_distance_vec(&pos, &other.pos);
                let r = dist.length();
                if r == 0.0 {
                    continue;
                }
                let grad = kernel.grad_w_vec(&dist, h);
                let dv = other.vel_pred - particle.vel_pred;
                div_v += other.mass * dv.dot(grad);
                cross_magnitude_accumulate(&mut curl, dv, grad, other.mass);
                // Signal velocity of approaching pairs.
                let vel_ij = particle.vel_pred - other.vel_pred;
                let approach = dist.dot(vel_ij);
                if approach < 0.0 {
                    let v_sig = particle.sound + other.sound - 3.0 * approach / r;
                    if v_sig > 0.0 {
                        min_h_per_v_sig = min_h_per_v_sig.min(h / v_sig);
                    }
                }
            }
            let (div_v, curl_v) = if particle.dens > 0.0 {
                (div_v / particle.dens, curl_magnitude(curl) / particle.dens)
            } else {
                (0.0, 0.0)
            };
            let balsara = if crate::prelude::NUM_DIMENSIONS == 1 || !av.use_balsara_switch {
                1.0
            } else {
                let correction = 1e-4 * particle.sound / h;
                div_v.abs() / (div_v.abs() + curl_v + correction)
            };
            let alpha = if av.use_time_dependent_av {
                let decay = -(particle.alpha - av.alpha_min) * av.epsilon * particle.sound / h;
                let source = (-div_v).max(0.0) * (av.alpha_max - particle.alpha);
                (particle.alpha + (decay + source) * dt).clamp(av.alpha_min, av.alpha_max)
            } else {
                av.alpha
            };
            let shock_sensor = if particle.sound > 0.0 {
                -div_v * h / particle.sound
            } else {
                0.0
            };
            Some(SignalUpdate {
                balsara,
                alpha,
                shock_sensor,
                shock_mode: shock_sensor > SHOCK_SENSOR_THRESHOLD,
                h_per_v_sig: min_h_per_v_sig,
            })
        })
        .collect();
    let mut global_h_per_v_sig = Float::INFINITY;
    for (particle, update) in particles.iter_mut().zip(updates) {
        if let Some(update) = update {
            particle.balsara = update.balsara;
            particle.alpha = update.alpha;
            particle.old_shock_mode = particle.shock_mode;
            particle.shock_mode = update.shock_mode;
            particle.switch_to_no_shock_region = particle.old_shock_mode && !update.shock_mode;
            particle.shock_sensor = update.shock_sensor;
            global_h_per_v_sig = global_h_per_v_sig.min(update.h_per_v_sig);
        }
    }
    global_h_per_v_sig
}

/// Rayon-friendly minimum over a parallel iterator of floats.
pub(crate) fn parallel_min(values: impl ParallelIterator<Item = Float>) -> Float {
    values
        .map(OrderedFloat)
        .min()
        .map(|value| value.0)
        .unwrap_or(Float::INFINITY)
}
