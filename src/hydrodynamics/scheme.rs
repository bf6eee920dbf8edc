use super::disph::Disph;
use super::gdisph::Gdisph;
use super::gsph::Gsph;
use super::parameters::SphVariant;
use super::ssph::Ssph;
use crate::prelude::Parameters;
use crate::prelude::Simulation;

/// One discretisation of the fluid equations: the pre-interaction
/// pass (smoothing lengths, densities, pressures, viscosity state,
/// signal velocities) and the force pass (accelerations and energy
/// rates). The driver owns a single scheme chosen at start.
pub trait Scheme: Send + Sync {
    fn pre_interaction(&self, sim: &mut Simulation, parameters: &Parameters);
    fn fluid_force(&self, sim: &mut Simulation, parameters: &Parameters);
}

pub fn make_scheme(variant: SphVariant) -> Box<dyn Scheme> {
    match variant {
        SphVariant::Ssph => Box::new(Ssph),
        SphVariant::Disph => Box::new(Disph),
        SphVariant::Gsph => Box::new(Gsph),
        SphVariant::Gdisph => Box::new(Gdisph),
    }
}

#[cfg(test)]
mod tests {
    use super::make_scheme;
    use crate::hydrodynamics::parameters::SphVariant;
    use crate::prelude::Float;
    use crate::prelude::MVec;
    use crate::prelude::Simulation;
    use crate::test_utils::get_test_lattice;
    use crate::test_utils::test_parameters;

    fn prepare(variant: SphVariant) -> (Simulation, crate::prelude::Parameters) {
        let parameters = test_parameters(variant);
        let mut particles = get_test_lattice(1.0);
        for particle in particles.iter_mut() {
            // A smooth, sheared velocity field so that viscosity and
            // the Riemann step both act.
            let pos = particle.pos;
            for axis in 0..crate::prelude::NUM_DIMENSIONS {
                let phase = pos[(axis + 1) % crate::prelude::NUM_DIMENSIONS];
                particle.vel[axis] = 0.1 * (2.0 * std::f64::consts::PI * phase).sin();
            }
            particle.vel_pred = particle.vel;
        }
        let mut sim = Simulation::new(&parameters, particles).unwrap();
        sim.rebuild_tree(&parameters.tree);
        (sim, parameters)
    }

    #[test]
    fn all_variants_conserve_momentum_and_energy() {
        for variant in [
            SphVariant::Ssph,
            SphVariant::Disph,
            SphVariant::Gsph,
            SphVariant::Gdisph,
        ] {
            let (mut sim, parameters) = prepare(variant);
            let scheme = make_scheme(variant);
            scheme.pre_interaction(&mut sim, &parameters);
            scheme.fluid_force(&mut sim, &parameters);
            let total_force: MVec = sim
                .particles
                .iter()
                .map(|particle| particle.acc * particle.mass)
                .sum();
            let force_scale: Float = sim
                .particles
                .iter()
                .map(|particle| particle.acc.length() * particle.mass)
                .sum();
            assert!(
                total_force.length() <= 1e-11 * force_scale + 1e-30,
                "{:?}: momentum violation {} vs scale {}",
                variant,
                total_force.length(),
                force_scale
            );
            let total_energy_rate: Float = sim
                .particles
                .iter()
                .map(|particle| {
                    particle.mass * (particle.dene + particle.vel_pred.dot(particle.acc))
                })
                .sum();
            let energy_scale: Float = sim
                .particles
                .iter()
                .map(|particle| {
                    particle.mass
                        * (particle.dene.abs() + particle.vel_pred.dot(particle.acc).abs())
                })
                .sum();
            assert!(
                total_energy_rate.abs() <= 1e-10 * energy_scale + 1e-30,
                "{:?}: energy-rate violation {} vs scale {}",
                variant,
                total_energy_rate,
                energy_scale
            );
        }
    }

    #[test]
    fn pre_interaction_fills_the_hydro_state() {
        for variant in [SphVariant::Ssph, SphVariant::Disph] {
            let (mut sim, parameters) = prepare(variant);
            let scheme = make_scheme(variant);
            scheme.pre_interaction(&mut sim, &parameters);
            for particle in sim.particles.iter() {
                assert!(particle.dens > 0.0);
                assert!(particle.pres > 0.0);
                assert!(particle.sound > 0.0);
                assert!(particle.volume > 0.0);
                assert!(particle.neighbor_count > 0);
                if variant.is_density_independent() {
                    assert!(particle.q_ene > 0.0);
                }
            }
        }
    }
}
