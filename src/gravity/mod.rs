mod mass_moments;
mod parameters;
mod softening;

use rayon::prelude::*;

pub use self::mass_moments::MassMoments;
pub use self::parameters::GravityParameters;
pub use self::softening::force_prefactor;
pub use self::softening::potential_prefactor;
use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::quadtree::Node;
use crate::quadtree::SphTree;

pub struct Solver<'a> {
    pub opening_angle: Float,
    pub gravity_constant: Float,
    pub box_: &'a SimulationBox,
}

impl<'a> Solver<'a> {
    pub fn new(parameters: &GravityParameters, box_: &'a SimulationBox) -> Self {
        Self {
            opening_angle: parameters.opening_angle,
            gravity_constant: parameters.gravity_constant,
            box_,
        }
    }

    /// Acceleration and potential sourced at `pos2`. The half-sum of
    /// the two softened prefactors keeps pairwise forces
    /// antisymmetric; beyond twice the larger softening scale both
    /// prefactors are Newtonian.
    fn calc_gravity_acceleration(
        &self,
        pos1: &MVec,
        pos2: &MVec,
        mass2: Float,
        softening1: Float,
        softening2: Float,
    ) -> (MVec, Float) {
        let dist = self.box_.periodic_distance_vec(pos1, pos2);
        let r = dist.length();
        if r == 0.0 {
            return (MVec::ZERO, 0.0);
        }
        let g = 0.5 * (force_prefactor(r, softening1) + force_prefactor(r, softening2));
        let f = 0.5 * (potential_prefactor(r, softening1) + potential_prefactor(r, softening2));
        (
            -dist * (self.gravity_constant * mass2 * g),
            -self.gravity_constant * mass2 * f,
        )
    }

    fn calc_gravity_acceleration_for_moments(
        &self,
        pos: &MVec,
        moments: &MassMoments,
        softening1: Float,
        softening2: Float,
    ) -> (MVec, Float) {
        self.calc_gravity_acceleration(
            pos,
            &moments.center_of_mass(),
            moments.total(),
            softening1,
            softening2,
        )
    }

    /// Walks the tree and accumulates the monopole acceleration and
    /// potential on the particle at `pos` with leaf index
    /// `skip_index` (its self-interaction is excluded).
    pub fn traverse_tree(
        &self,
        tree: &SphTree,
        pos: &MVec,
        softening: Float,
        skip_index: usize,
    ) -> (MVec, Float) {
        let mut acc = MVec::ZERO;
        let mut phi = 0.0;
        self.traverse(tree, pos, softening, skip_index, &mut acc, &mut phi);
        (acc, phi)
    }

    fn traverse(
        &self,
        tree: &SphTree,
        pos: &MVec,
        softening: Float,
        skip_index: usize,
        acc: &mut MVec,
        phi: &mut Float,
    ) {
        match tree.node {
            Node::Tree(ref children) => {
                for child in children.iter() {
                    if child.data.moments.count() == 0 {
                        continue;
                    }
                    if self.should_be_opened(child, pos) {
                        self.traverse(child, pos, softening, skip_index, acc, phi);
                    } else {
                        let (acc_child, phi_child) = self.calc_gravity_acceleration_for_moments(
                            pos,
                            &child.data.moments,
                            softening,
                            child.data.largest_smoothing_length,
                        );
                        *acc += acc_child;
                        *phi += phi_child;
                    }
                }
            }
            Node::Leaf(ref leaf) => {
                for particle in leaf.iter() {
                    if particle.index == skip_index {
                        continue;
                    }
                    let (acc_particle, phi_particle) = self.calc_gravity_acceleration(
                        pos,
                        &particle.pos,
                        particle.mass,
                        softening,
                        particle.smoothing_length,
                    );
                    *acc += acc_particle;
                    *phi += phi_particle;
                }
            }
        }
    }

    fn should_be_opened(&self, child: &SphTree, pos: &MVec) -> bool {
        let distance = self.box_.periodic_distance(pos, &child.extent.center());
        let length = child.extent.max_side_length();
        length > distance * self.opening_angle
    }
}

/// Adds the gravitational acceleration on top of the fluid
/// acceleration: the tree walk for self-gravity plus a direct sum
/// over external point masses. Point masses source gravity but do
/// not receive any.
pub fn add_gravity_forces(
    particles: &mut [Particle],
    tree: &SphTree,
    box_: &SimulationBox,
    parameters: &GravityParameters,
) {
    let solver = Solver::new(parameters, box_);
    let point_masses: Vec<_> = particles
        .iter()
        .filter(|particle| particle.is_point_mass)
        .map(|particle| (particle.pos, particle.mass, particle.sml))
        .collect();
    let contributions: Vec<Option<(MVec, Float)>> = particles
        .par_iter()
        .enumerate()
        .map(|(index, particle)| {
            if particle.is_point_mass {
                return None;
            }
            let (mut acc, mut phi) =
                solver.traverse_tree(tree, &particle.pos, particle.sml, index);
            for (pos, mass, softening) in point_masses.iter() {
                let (acc_point, phi_point) = solver.calc_gravity_acceleration(
                    &particle.pos,
                    pos,
                    *mass,
                    particle.sml,
                    *softening,
                );
                acc += acc_point;
                phi += phi_point;
            }
            Some((acc, phi))
        })
        .collect();
    for (particle, contribution) in particles.iter_mut().zip(contributions) {
        if let Some((acc, phi)) = contribution {
            particle.acc += acc;
            particle.phi = phi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::add_gravity_forces;
    use super::GravityParameters;
    use super::Solver;
    use crate::prelude::Float;
    use crate::prelude::Kernel;
    use crate::prelude::KernelType;
    use crate::prelude::MVec;
    use crate::prelude::SimulationBox;
    use crate::prelude::NUM_DIMENSIONS;
    use crate::quadtree::QuadTreeConfig;
    use crate::quadtree::SphTree;
    use crate::test_utils::assert_is_close_tolerance;
    use crate::test_utils::get_particle_cloud;

    fn non_periodic_box() -> SimulationBox {
        SimulationBox::new(
            crate::prelude::Extent::cube_from_side_length(100.0),
            [false; NUM_DIMENSIONS],
        )
    }

    fn direct_sum(
        solver: &Solver,
        particles: &[crate::prelude::Particle],
        index: usize,
    ) -> (MVec, Float) {
        let mut acc = MVec::ZERO;
        let mut phi = 0.0;
        for (other_index, other) in particles.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let (acc_other, phi_other) = solver.calc_gravity_acceleration(
                &particles[index].pos,
                &other.pos,
                other.mass,
                particles[index].sml,
                other.sml,
            );
            acc += acc_other;
            phi += phi_other;
        }
        (acc, phi)
    }

    #[test]
    fn tree_walk_with_zero_opening_angle_equals_direct_sum() {
        let particles = get_particle_cloud(64, 0.05);
        let box_ = non_periodic_box();
        let kernel = Kernel::new(KernelType::CubicSpline, NUM_DIMENSIONS);
        let tree = SphTree::construct(&QuadTreeConfig::default(), &particles, &kernel, &box_);
        let parameters = GravityParameters {
            enabled: true,
            gravity_constant: 1.0,
            opening_angle: 0.0,
        };
        let solver = Solver::new(&parameters, &box_);
        for (index, particle) in particles.iter().enumerate() {
            let (tree_acc, tree_phi) =
                solver.traverse_tree(&tree, &particle.pos, particle.sml, index);
            let (direct_acc, direct_phi) = direct_sum(&solver, &particles, index);
            assert!((tree_acc - direct_acc).length() <= 1e-10 * direct_acc.length().max(1e-30));
            assert_is_close_tolerance(tree_phi, direct_phi, 1e-10);
        }
    }

    #[test]
    #[cfg(not(any(feature = "1d", feature = "2d")))]
    fn tree_walk_with_finite_opening_angle_is_close_to_direct_sum() {
        let particles = get_particle_cloud(256, 0.02);
        let box_ = non_periodic_box();
        let kernel = Kernel::new(KernelType::CubicSpline, NUM_DIMENSIONS);
        let tree = SphTree::construct(&QuadTreeConfig::default(), &particles, &kernel, &box_);
        let parameters = GravityParameters {
            enabled: true,
            gravity_constant: 1.0,
            opening_angle: 0.5,
        };
        let solver = Solver::new(&parameters, &box_);
        let mut sum_error_squared = 0.0;
        let mut sum_norm_squared = 0.0;
        for (index, particle) in particles.iter().enumerate() {
            let (tree_acc, _) = solver.traverse_tree(&tree, &particle.pos, particle.sml, index);
            let (direct_acc, _) = direct_sum(&solver, &particles, index);
            sum_error_squared += (tree_acc - direct_acc).length_squared();
            sum_norm_squared += direct_acc.length_squared();
        }
        let relative_rms = (sum_error_squared / sum_norm_squared).sqrt();
        assert!(relative_rms < 0.01, "relative rms error {}", relative_rms);
    }

    #[test]
    fn gravity_conserves_momentum() {
        let mut particles = get_particle_cloud(64, 0.05);
        let box_ = non_periodic_box();
        let kernel = Kernel::new(KernelType::CubicSpline, NUM_DIMENSIONS);
        let tree = SphTree::construct(&QuadTreeConfig::default(), &particles, &kernel, &box_);
        let parameters = GravityParameters {
            enabled: true,
            gravity_constant: 1.0,
            // Zero opening angle, so no monopole truncation error
            // spoils the pairwise antisymmetry.
            opening_angle: 0.0,
        };
        add_gravity_forces(&mut particles, &tree, &box_, &parameters);
        let total_force: MVec = particles
            .iter()
            .map(|particle| particle.acc * particle.mass)
            .sum();
        let force_scale: Float = particles
            .iter()
            .map(|particle| particle.acc.length() * particle.mass)
            .sum();
        assert!(total_force.length() < 1e-11 * force_scale);
    }

    #[test]
    fn point_masses_source_but_do_not_receive_gravity() {
        let mut particles = get_particle_cloud(16, 0.05);
        let point_mass_id = particles.len();
        particles.push(crate::prelude::Particle::point_mass(
            MVec::ONE * 0.5,
            MVec::ZERO,
            100.0,
            0.01,
            point_mass_id,
        ));
        let box_ = non_periodic_box();
        let kernel = Kernel::new(KernelType::CubicSpline, NUM_DIMENSIONS);
        let tree = SphTree::construct(&QuadTreeConfig::default(), &particles, &kernel, &box_);
        let parameters = GravityParameters {
            enabled: true,
            gravity_constant: 1.0,
            opening_angle: 0.5,
        };
        add_gravity_forces(&mut particles, &tree, &box_, &parameters);
        let point_mass = particles.last().unwrap();
        assert_eq!(point_mass.acc, MVec::ZERO);
        // The heavy point mass dominates every acceleration.
        for particle in particles.iter().take(16) {
            assert!(particle.acc.length() > 0.0);
        }
    }
}
