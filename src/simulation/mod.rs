mod driver;
mod fields;
mod parameters;

pub use self::driver::Driver;
pub use self::fields::AuxColumns;
pub use self::parameters::SimulationParameters;
use crate::hydrodynamics::initial_smoothing_length;
use crate::hydrodynamics::register_gradient_columns;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::prelude::SphError;
use crate::quadtree::QuadTreeConfig;
use crate::quadtree::SphTree;

/// The shared state of a run: the particle array, the global clock
/// and the resources every interaction pass reads (kernel, box,
/// tree, auxiliary columns).
pub struct Simulation {
    pub particles: Vec<Particle>,
    pub time: Float,
    pub dt: Float,
    pub step: usize,
    /// The global minimum of h / v_sig over all approaching pairs,
    /// accumulated during the pre-interaction pass.
    pub h_per_v_sig: Float,
    pub kernel: Kernel,
    pub box_: SimulationBox,
    pub tree: Option<SphTree>,
    pub aux: AuxColumns,
}

impl Simulation {
    /// Consumes the initial conditions: positions are wrapped into
    /// the box, missing smoothing lengths come from the
    /// initial-smoothing formula and the viscosity coefficients
    /// start at their configured value.
    pub fn new(parameters: &Parameters, mut particles: Vec<Particle>) -> Result<Self, SphError> {
        parameters.validate()?;
        let kernel = parameters.kernel();
        let box_ = parameters.box_size.clone();
        let hydro = &parameters.hydrodynamics;
        for particle in particles.iter_mut() {
            particle.pos = box_.periodic_wrap(particle.pos);
            if particle.is_point_mass {
                continue;
            }
            if particle.sml <= 0.0 {
                if particle.dens <= 0.0 {
                    return Err(SphError::Config(format!(
                        "particle {} carries neither a smoothing length nor a density",
                        particle.id
                    )));
                }
                particle.sml = initial_smoothing_length(
                    &kernel,
                    hydro.neighbor_number,
                    particle.mass,
                    particle.dens,
                );
            }
            if particle.alpha == 0.0 {
                particle.alpha = hydro.initial_alpha();
            }
        }
        let mut aux = AuxColumns::new();
        if hydro.sph_type.is_godunov() {
            register_gradient_columns(&mut aux);
        }
        Ok(Self {
            particles,
            time: 0.0,
            dt: 0.0,
            step: 0,
            h_per_v_sig: Float::INFINITY,
            kernel,
            box_,
            tree: None,
            aux,
        })
    }

    /// Restores the state saved in a checkpoint.
    pub fn from_checkpoint(
        parameters: &Parameters,
        particles: Vec<Particle>,
        time: Float,
        dt: Float,
        step: usize,
    ) -> Result<Self, SphError> {
        let mut sim = Self::new(parameters, particles)?;
        sim.time = time;
        sim.dt = dt;
        sim.step = step;
        Ok(sim)
    }

    pub fn rebuild_tree(&mut self, config: &QuadTreeConfig) {
        self.tree = Some(SphTree::construct(
            config,
            &self.particles,
            &self.kernel,
            &self.box_,
        ));
    }

    /// The views every interaction pass works on: the mutable
    /// particle array plus the read-only tree, kernel and box, and
    /// the auxiliary columns.
    pub(crate) fn interaction_views(
        &mut self,
    ) -> (
        &mut [Particle],
        &SphTree,
        &Kernel,
        &SimulationBox,
        &mut AuxColumns,
    ) {
        let tree = self
            .tree
            .as_ref()
            .expect("interaction pass before tree construction");
        (
            self.particles.as_mut_slice(),
            tree,
            &self.kernel,
            &self.box_,
            &mut self.aux,
        )
    }

    pub fn total_mass(&self) -> Float {
        self.particles.iter().map(|particle| particle.mass).sum()
    }

    pub fn total_momentum(&self) -> MVec {
        self.particles
            .iter()
            .map(|particle| particle.vel * particle.mass)
            .sum()
    }

    /// Thermal plus kinetic energy.
    pub fn total_energy(&self) -> Float {
        self.particles
            .iter()
            .filter(|particle| !particle.is_point_mass)
            .map(|particle| {
                particle.mass * (particle.ene + 0.5 * particle.vel.length_squared())
            })
            .sum()
    }

    /// NaN or infinity in a conserved field is unrecoverable; the
    /// caller dumps the state and aborts.
    pub fn check_finite(&self) -> Result<(), SphError> {
        for particle in self.particles.iter() {
            let checks: [(&'static str, bool); 4] = [
                ("position", particle.pos.is_finite()),
                ("velocity", particle.vel.is_finite()),
                ("internal energy", particle.ene.is_finite()),
                ("density", particle.dens.is_finite()),
            ];
            for (field, is_finite) in checks {
                if !is_finite {
                    return Err(SphError::NonFinite {
                        field,
                        id: particle.id,
                        time: self.time,
                    });
                }
            }
        }
        Ok(())
    }
}
