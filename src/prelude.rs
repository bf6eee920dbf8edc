pub use crate::config::NUM_DIMENSIONS;
pub use crate::config::TWO_TO_NUM_DIMENSIONS;
pub use crate::error::SphError;
pub use crate::extent::Extent;
pub use crate::kernel::Kernel;
pub use crate::kernel::KernelType;
pub use crate::parameters::Parameters;
pub use crate::particle::Particle;
pub use crate::simulation::Simulation;
pub use crate::simulation_box::SimulationBox;

pub type Float = f64;

#[cfg(feature = "1d")]
pub type MVec = crate::vec1::MVec1;
#[cfg(all(feature = "2d", not(feature = "1d")))]
pub type MVec = glam::DVec2;
#[cfg(not(any(feature = "1d", feature = "2d")))]
pub type MVec = glam::DVec3;

/// Builds a vector by evaluating `f` once per axis.
pub fn mvec_from_fn(mut f: impl FnMut(usize) -> Float) -> MVec {
    let mut v = MVec::ZERO;
    for axis in 0..NUM_DIMENSIONS {
        v[axis] = f(axis);
    }
    v
}
