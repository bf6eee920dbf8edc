use log::error;
use log::info;
use rayon::prelude::*;

use super::Simulation;
use crate::gravity::add_gravity_forces;
use crate::hydrodynamics::make_scheme;
use crate::hydrodynamics::Scheme;
use crate::io::checkpoint;
use crate::io::output::Snapshot;
use crate::io::output::SnapshotSink;
use crate::prelude::Float;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::SphError;
use crate::timestep::compute_timestep;

/// An optional source term added to du/dt only, after the fluid and
/// gravity passes.
pub type HeatingSource = Box<dyn Fn(&Particle) -> Float + Send + Sync>;

/// The kick-drift-kick predictor/corrector loop stitching the
/// modules together. Owns the scheme chosen from the configured
/// variant and the snapshot sink.
pub struct Driver {
    scheme: Box<dyn Scheme>,
    sink: Box<dyn SnapshotSink>,
    heating: Option<HeatingSource>,
    next_snapshot_time: Float,
    next_checkpoint_time: Float,
}

impl Driver {
    pub fn new(parameters: &Parameters, sink: Box<dyn SnapshotSink>) -> Result<Self, SphError> {
        parameters.validate()?;
        Ok(Self {
            scheme: make_scheme(parameters.hydrodynamics.sph_type),
            sink,
            heating: None,
            next_snapshot_time: 0.0,
            next_checkpoint_time: 0.0,
        })
    }

    pub fn with_heating_source(mut self, heating: HeatingSource) -> Self {
        self.heating = Some(heating);
        self
    }

    pub fn run(&mut self, sim: &mut Simulation, parameters: &Parameters) -> Result<(), SphError> {
        info!(
            "running {:?} with {} particles to t = {:.4e}",
            parameters.hydrodynamics.sph_type,
            sim.particles.len(),
            parameters.simulation.end_time
        );
        while sim.time < parameters.simulation.end_time {
            self.maybe_write_snapshot(sim, parameters)?;
            self.maybe_write_checkpoint(sim, parameters)?;
            self.step(sim, parameters)?;
        }
        self.sink.write_snapshot(&Snapshot::from_simulation(sim))?;
        info!(
            "finished after {} steps at t = {:.4e}",
            sim.step, sim.time
        );
        Ok(())
    }

    /// One kick-drift-kick step. The timestep applied to this step
    /// was computed at the end of the previous one; the very first
    /// step therefore integrates over dt = 0 and only initialises
    /// forces and the timestep.
    pub fn step(&mut self, sim: &mut Simulation, parameters: &Parameters) -> Result<(), SphError> {
        sim.rebuild_tree(&parameters.tree);
        predict(sim, parameters);
        self.scheme.pre_interaction(sim, parameters);
        self.scheme.fluid_force(sim, parameters);
        if parameters.gravity.enabled {
            let (particles, tree, _, box_, _) = sim.interaction_views();
            add_gravity_forces(particles, tree, box_, &parameters.gravity);
        }
        if let Some(heating) = &self.heating {
            for particle in sim.particles.iter_mut() {
                if !particle.is_point_mass {
                    let source = heating(particle);
                    particle.dene += source;
                }
            }
        }
        let next_dt = compute_timestep(sim, &parameters.timestep);
        correct(sim, parameters);
        if let Err(fatal) = sim.check_finite() {
            error!("{}", fatal);
            self.dump_state(sim, parameters);
            return Err(fatal);
        }
        sim.time += sim.dt;
        sim.step += 1;
        sim.dt = next_dt;
        Ok(())
    }

    fn maybe_write_snapshot(
        &mut self,
        sim: &Simulation,
        parameters: &Parameters,
    ) -> Result<(), SphError> {
        let interval = match parameters.output.snapshot_interval {
            Some(interval) => interval,
            None => return Ok(()),
        };
        if sim.time >= self.next_snapshot_time {
            self.sink.write_snapshot(&Snapshot::from_simulation(sim))?;
            while self.next_snapshot_time <= sim.time {
                self.next_snapshot_time += interval;
            }
        }
        Ok(())
    }

    fn maybe_write_checkpoint(
        &mut self,
        sim: &Simulation,
        parameters: &Parameters,
    ) -> Result<(), SphError> {
        let interval = match parameters.output.checkpoint_interval {
            Some(interval) => interval,
            None => return Ok(()),
        };
        if sim.time >= self.next_checkpoint_time {
            let path = parameters.output.output_dir.join("checkpoint.bin");
            checkpoint::save(&path, sim, parameters)?;
            while self.next_checkpoint_time <= sim.time {
                self.next_checkpoint_time += interval;
            }
        }
        Ok(())
    }

    fn dump_state(&self, sim: &Simulation, parameters: &Parameters) {
        let path = parameters.output.output_dir.join("crash_dump.bin");
        match checkpoint::save(&path, sim, parameters) {
            Ok(()) => error!("state dumped to {:?}", path),
            Err(dump_error) => error!("state dump failed: {}", dump_error),
        }
    }
}

/// Half-kick on velocity and energy, full drift on positions. Wall
/// particles are held in place; point masses drift kinematically.
fn predict(sim: &mut Simulation, parameters: &Parameters) {
    let dt = sim.dt;
    let box_ = sim.box_.clone();
    let ene_floor = parameters.hydrodynamics.ene_floor;
    sim.particles.par_iter_mut().for_each(|particle| {
        if particle.is_wall {
            return;
        }
        if particle.is_point_mass {
            particle.pos = box_.periodic_wrap(particle.pos + particle.vel * dt);
            return;
        }
        particle.vel_pred = particle.vel + particle.acc * (0.5 * dt);
        particle.ene_pred = (particle.ene + particle.dene * (0.5 * dt)).max(ene_floor);
        particle.pos = box_.periodic_wrap(particle.pos + particle.vel * dt);
    });
}

/// Second half-kick with the fresh accelerations, then the energy
/// floor.
fn correct(sim: &mut Simulation, parameters: &Parameters) {
    let dt = sim.dt;
    let ene_floor = parameters.hydrodynamics.ene_floor;
    sim.particles.par_iter_mut().for_each(|particle| {
        if particle.is_wall || particle.is_point_mass {
            return;
        }
        particle.vel = particle.vel_pred + particle.acc * (0.5 * dt);
        let ene = particle.ene_pred + particle.dene * (0.5 * dt);
        if ene < ene_floor {
            particle.ene = ene_floor;
            particle.ene_floored = true;
        } else {
            particle.ene = ene;
            particle.ene_floored = false;
        }
    });
}
