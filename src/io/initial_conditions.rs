use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::SphError;

/// One particle of the initial conditions. Either the specific
/// internal energy or the pressure must be given; everything else
/// receives the documented defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticleRecord {
    pub pos: MVec,
    #[serde(default = "MVec::default")]
    pub vel: MVec,
    pub mass: Float,
    pub dens: Float,
    #[serde(default)]
    pub pres: Option<Float>,
    #[serde(default)]
    pub ene: Option<Float>,
    #[serde(default)]
    pub sml: Option<Float>,
    #[serde(default)]
    pub id: Option<usize>,
    #[serde(default)]
    pub is_point_mass: bool,
    #[serde(default)]
    pub is_wall: bool,
}

pub fn load_initial_conditions(
    path: &Path,
    parameters: &Parameters,
) -> Result<Vec<Particle>, SphError> {
    let contents = fs::read_to_string(path).map_err(|error| {
        SphError::Config(format!(
            "failed to read initial conditions {:?}: {}",
            path, error
        ))
    })?;
    let records: Vec<ParticleRecord> = serde_yaml::from_str(&contents)
        .map_err(|error| SphError::Config(error.to_string()))?;
    build_particles(records, parameters)
}

pub fn build_particles(
    records: Vec<ParticleRecord>,
    parameters: &Parameters,
) -> Result<Vec<Particle>, SphError> {
    let gamma = parameters.hydrodynamics.gamma;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = record.id.unwrap_or(index);
            let ene = match (record.ene, record.pres) {
                (Some(ene), _) => ene,
                (None, Some(pres)) => {
                    if record.dens <= 0.0 {
                        return Err(SphError::Config(format!(
                            "particle {} needs a positive density to derive its energy",
                            id
                        )));
                    }
                    pres / ((gamma - 1.0) * record.dens)
                }
                (None, None) => {
                    if record.is_point_mass {
                        0.0
                    } else {
                        return Err(SphError::Config(format!(
                            "particle {} carries neither an energy nor a pressure",
                            id
                        )));
                    }
                }
            };
            let mut particle = Particle::new(record.pos, record.vel, record.mass, ene, id);
            particle.dens = record.dens;
            particle.sml = record.sml.unwrap_or(0.0);
            particle.is_point_mass = record.is_point_mass;
            particle.is_wall = record.is_wall;
            Ok(particle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::build_particles;
    use super::ParticleRecord;
    use crate::hydrodynamics::parameters::SphVariant;
    use crate::prelude::MVec;
    use crate::prelude::Simulation;
    use crate::test_utils::assert_float_is_close;
    use crate::test_utils::test_parameters;

    fn record() -> ParticleRecord {
        ParticleRecord {
            pos: MVec::ONE * 0.5,
            vel: MVec::ZERO,
            mass: 0.001,
            dens: 1.0,
            pres: None,
            ene: Some(1.5),
            sml: None,
            id: None,
            is_point_mass: false,
            is_wall: false,
        }
    }

    #[test]
    fn missing_fields_receive_defaults() {
        let parameters = test_parameters(SphVariant::Ssph);
        let particles = build_particles(vec![record()], &parameters).unwrap();
        assert_eq!(particles[0].id, 0);
        assert_eq!(particles[0].sml, 0.0);
        // The simulation fills the smoothing length from the
        // initial-smoothing formula and seeds the viscosity
        // coefficient.
        let sim = Simulation::new(&parameters, particles).unwrap();
        assert!(sim.particles[0].sml > 0.0);
        assert_eq!(
            sim.particles[0].alpha,
            parameters.hydrodynamics.artificial_viscosity.alpha
        );
    }

    #[test]
    fn the_energy_can_come_from_the_pressure() {
        let parameters = test_parameters(SphVariant::Ssph);
        let gamma = parameters.hydrodynamics.gamma;
        let mut with_pressure = record();
        with_pressure.ene = None;
        with_pressure.pres = Some(2.0);
        let particles = build_particles(vec![with_pressure], &parameters).unwrap();
        assert_float_is_close(particles[0].ene, 2.0 / (gamma - 1.0));
    }

    #[test]
    fn a_record_without_energy_or_pressure_is_rejected() {
        let parameters = test_parameters(SphVariant::Ssph);
        let mut bad = record();
        bad.ene = None;
        assert!(build_particles(vec![bad], &parameters).is_err());
    }

    #[test]
    fn records_parse_from_yaml() {
        let ones = vec!["0.5"; crate::prelude::NUM_DIMENSIONS].join(", ");
        let yaml = format!("- pos: [{}]\n  mass: 1.0\n  dens: 1.0\n  ene: 2.5\n", ones);
        let records: Vec<ParticleRecord> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ene, Some(2.5));
        assert_eq!(records[0].vel, MVec::ZERO);
    }
}
