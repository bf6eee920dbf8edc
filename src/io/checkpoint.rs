use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::Simulation;
use crate::prelude::SphError;

/// Everything needed to resume a run at a step boundary.
#[derive(Serialize, Deserialize)]
pub struct Checkpoint {
    pub time: Float,
    pub dt: Float,
    pub step: usize,
    pub particles: Vec<Particle>,
    pub parameters: Parameters,
}

impl Checkpoint {
    pub fn from_simulation(sim: &Simulation, parameters: &Parameters) -> Self {
        Self {
            time: sim.time,
            dt: sim.dt,
            step: sim.step,
            particles: sim.particles.clone(),
            parameters: parameters.clone(),
        }
    }

    pub fn into_simulation(self) -> Result<(Simulation, Parameters), SphError> {
        let sim = Simulation::from_checkpoint(
            &self.parameters,
            self.particles,
            self.time,
            self.dt,
            self.step,
        )?;
        Ok((sim, self.parameters))
    }
}

pub fn save(path: &Path, sim: &Simulation, parameters: &Parameters) -> Result<(), SphError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = BufWriter::new(File::create(path)?);
    bincode::serialize_into(file, &Checkpoint::from_simulation(sim, parameters))
        .map_err(|error| SphError::Checkpoint(error.to_string()))
}

pub fn load(path: &Path) -> Result<Checkpoint, SphError> {
    let file = BufReader::new(File::open(path)?);
    bincode::deserialize_from(file).map_err(|error| SphError::Checkpoint(error.to_string()))
}
