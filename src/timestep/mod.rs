mod parameters;

use rayon::prelude::*;

pub use self::parameters::TimestepParameters;
use crate::hydrodynamics::artificial_viscosity::parallel_min;
use crate::prelude::Float;
use crate::prelude::Simulation;

/// The global timestep: the minimum over all particles of the sound
/// and force criteria, combined with the signal-velocity bound
/// accumulated during the pre-interaction pass, clamped to the
/// configured range.
pub fn compute_timestep(sim: &Simulation, parameters: &TimestepParameters) -> Float {
    let per_particle = parallel_min(sim.particles.par_iter().flat_map_iter(|particle| {
        let mut candidates = Vec::with_capacity(2);
        if !particle.is_point_mass {
            if particle.sound > 0.0 {
                candidates.push(parameters.cfl_sound * particle.sml / particle.sound);
            }
            let acc = particle.acc.length();
            if acc > 0.0 {
                candidates.push(parameters.cfl_force * (particle.sml / acc).sqrt());
            }
        }
        candidates.into_iter()
    }));
    let signal = parameters.cfl_signal * sim.h_per_v_sig;
    per_particle
        .min(signal)
        .clamp(parameters.min_timestep, parameters.max_timestep)
}
