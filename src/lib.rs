//! # gsph
//!
//! A particle-based Lagrangian solver for compressible flows with
//! self-gravity, built around four discretisations of the fluid
//! equations: standard SPH, density-independent SPH and their
//! Godunov counterparts that replace artificial viscosity by an HLL
//! Riemann problem at every pair interaction.
//!
//! The engine works in code units on a compile-time dimension
//! (features `1d`, `2d`, `3d`) and provides adaptive smoothing
//! lengths, a Barnes-Hut tree serving both the ball neighbour search
//! and the gravity walk, a kick-drift-kick predictor/corrector
//! driver and YAML-configured parameters. Per-step interaction
//! passes parallelise over particles with rayon; every iteration
//! writes only to its own particle, so the passes need no locks.
//!
//! ```no_run
//! use gsph::io::initial_conditions::load_initial_conditions;
//! use gsph::io::output::TextSnapshotWriter;
//! use gsph::prelude::*;
//! use gsph::simulation::Driver;
//!
//! fn main() -> Result<(), SphError> {
//!     let parameters = Parameters::from_yaml_file("parameters.yml".as_ref())?;
//!     let particles =
//!         load_initial_conditions("initial_conditions.yml".as_ref(), &parameters)?;
//!     let mut sim = Simulation::new(&parameters, particles)?;
//!     let sink = Box::new(TextSnapshotWriter::new(parameters.output.output_dir.clone()));
//!     Driver::new(&parameters, sink)?.run(&mut sim, &parameters)
//! }
//! ```

pub(crate) mod config;
pub mod error;
pub mod extent;
pub mod gravity;
pub mod hydrodynamics;
pub mod io;
pub mod kernel;
pub mod parameters;
pub mod particle;
pub mod prelude;
pub mod quadtree;
pub mod simulation;
pub mod simulation_box;
pub mod timestep;
#[cfg(feature = "1d")]
pub mod vec1;

#[cfg(test)]
pub(crate) mod test_utils;
