use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::hydrodynamics::parameters::HydrodynamicsParameters;
use crate::hydrodynamics::parameters::SphVariant;
use crate::prelude::mvec_from_fn;
use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::Parameters;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::prelude::NUM_DIMENSIONS;
use crate::quadtree::LeafData;
use crate::simulation::SimulationParameters;

pub fn assert_float_is_close(x: Float, y: Float) {
    assert!((x - y).abs() < 1e-10 * x.abs().max(y.abs()).max(1.0), "{} {}", x, y)
}

pub fn assert_is_close_tolerance(x: Float, y: Float, tolerance: Float) {
    assert!(
        (x - y).abs() <= tolerance * x.abs().max(y.abs()).max(1.0),
        "{} {}",
        x,
        y
    )
}

pub fn assert_vec_is_close(x: MVec, y: MVec) {
    assert!((x - y).length() < 1e-10, "{:?} {:?}", x, y)
}

/// A neighbour target that makes sense for the compiled dimension.
pub fn test_neighbor_number() -> usize {
    match NUM_DIMENSIONS {
        1 => 5,
        2 => 16,
        _ => 32,
    }
}

fn test_lattice_points_per_axis() -> usize {
    match NUM_DIMENSIONS {
        1 => 64,
        2 => 12,
        _ => 6,
    }
}

/// A unit-density lattice of unit total mass filling `[0, side)^D`.
pub fn get_test_lattice(side: Float) -> Vec<Particle> {
    let n = test_lattice_points_per_axis();
    get_particle_lattice(n, side / n as Float, 1.0 / (n.pow(NUM_DIMENSIONS as u32) as Float))
}

/// A lattice of `n^D` particles with the given spacing and
/// per-particle mass. Densities are set consistently; smoothing
/// lengths start from twice the spacing and are left to the
/// adaptive solve.
pub fn get_particle_lattice(n: usize, spacing: Float, mass: Float) -> Vec<Particle> {
    let total = n.pow(NUM_DIMENSIONS as u32);
    let mut particles = Vec::with_capacity(total);
    for index in 0..total {
        let pos = mvec_from_fn(|axis| {
            let cell = (index / n.pow(axis as u32)) % n;
            (cell as Float + 0.5) * spacing
        });
        let mut particle = Particle::new(pos, MVec::ZERO, mass, 1.0, index);
        particle.dens = mass / spacing.powi(NUM_DIMENSIONS as i32);
        particle.sml = 2.0 * spacing;
        particles.push(particle);
    }
    particles
}

/// A deterministic pseudo-random cloud in the unit box with a fixed
/// smoothing length, for the gravity tests.
pub fn get_particle_cloud(n: usize, sml: Float) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|index| {
            let pos = mvec_from_fn(|_| rng.gen_range(0.0..1.0));
            let mut particle = Particle::new(pos, MVec::ZERO, 1.0 / n as Float, 1.0, index);
            particle.dens = 1.0;
            particle.sml = sml;
            particle
        })
        .collect()
}

/// A stretched lattice in the unit box whose density varies by
/// `contrast` along the first axis.
pub fn get_density_gradient_cloud(count: usize, contrast: Float) -> Vec<Particle> {
    let n = (count as Float).powf(1.0 / NUM_DIMENSIONS as Float).ceil() as usize;
    let total = n.pow(NUM_DIMENSIONS as u32);
    let mut particles = Vec::with_capacity(total);
    for index in 0..total {
        let pos = mvec_from_fn(|axis| {
            let cell = (index / n.pow(axis as u32)) % n;
            let uniform = (cell as Float + 0.5) / n as Float;
            if axis == 0 {
                // Compresses the lattice towards x = 0.
                (1.0 + (contrast - 1.0) * uniform).ln() / contrast.ln()
            } else {
                uniform
            }
        });
        let mut particle = Particle::new(pos, MVec::ZERO, 1.0 / total as Float, 1.0, index);
        particle.sml = 1.0 / n as Float;
        particles.push(particle);
    }
    particles
}

/// Tree leaves on an integer lattice with varying masses and
/// smoothing lengths.
pub fn get_leaf_lattice(n: usize) -> Vec<LeafData> {
    let total = n.pow(NUM_DIMENSIONS as u32);
    (0..total)
        .map(|index| {
            let pos = mvec_from_fn(|axis| {
                let cell = (index / n.pow(axis as u32)) % n;
                (cell + 1) as Float
            });
            LeafData {
                index,
                id: index,
                pos,
                smoothing_length: 0.3 + 0.2 * ((index % 4) as Float),
                mass: 1.0 + 0.1 * index as Float,
            }
        })
        .collect()
}

/// A complete parameter set for in-memory tests: unit periodic box,
/// dimension-appropriate neighbour target, no gravity.
pub fn test_parameters(variant: SphVariant) -> Parameters {
    Parameters {
        simulation: SimulationParameters {
            end_time: 1.0,
            dimension: NUM_DIMENSIONS,
            initial_conditions: None,
        },
        box_size: SimulationBox::cube_from_side_length(1.0),
        hydrodynamics: HydrodynamicsParameters {
            sph_type: variant,
            kernel: Default::default(),
            gamma: 5.0 / 3.0,
            neighbor_number: test_neighbor_number(),
            iterative_sml: true,
            max_neighbor_number: 1024,
            artificial_viscosity: Default::default(),
            use_second_order: false,
            ene_floor: 1e-8,
            two_and_half_sim: None,
        },
        gravity: Default::default(),
        timestep: Default::default(),
        tree: Default::default(),
        output: Default::default(),
    }
}
