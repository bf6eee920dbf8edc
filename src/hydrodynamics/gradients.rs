use rayon::prelude::*;

use super::neighbour_search;
use super::riemann::RiemannState;
use super::HydrodynamicsParameters;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;
use crate::prelude::NUM_DIMENSIONS;
use crate::quadtree::SphTree;
use crate::simulation::AuxColumns;

pub(crate) const GRAD_DENS: &str = "grad_dens";
pub(crate) const GRAD_PRES: &str = "grad_pres";

const GRAD_VEL: [&str; 3] = ["grad_vel_x", "grad_vel_y", "grad_vel_z"];

pub(crate) fn velocity_gradient_name(axis: usize) -> &'static str {
    GRAD_VEL[axis]
}

/// Creates the gradient columns of the Godunov variants, once at
/// startup. Snapshots pick the columns up in this order.
pub fn register_gradient_columns(aux: &mut AuxColumns) {
    aux.register_vector(GRAD_DENS);
    aux.register_vector(GRAD_PRES);
    for axis in 0..NUM_DIMENSIONS {
        aux.register_vector(velocity_gradient_name(axis));
    }
}

struct GradientUpdate {
    dens: MVec,
    pres: MVec,
    vel: [MVec; NUM_DIMENSIONS],
}

/// SPH estimates of the density, pressure and velocity-component
/// gradients, stored in the named auxiliary columns for the MUSCL
/// reconstruction.
pub(crate) fn gradient_pass(
    particles: &[Particle],
    tree: &SphTree,
    kernel: &Kernel,
    box_: &SimulationBox,
    parameters: &HydrodynamicsParameters,
    aux: &mut AuxColumns,
) {
    let updates: Vec<Option<GradientUpdate>> = (0..particles.len())
        .into_par_iter()
        .map(|index| {
            let particle = &particles[index];
            if particle.is_point_mass || particle.dens == 0.0 {
                return None;
            }
            let support = kernel.support_radius(particle.sml);
            let mut update = GradientUpdate {
                dens: MVec::ZERO,
                pres: MVec::ZERO,
                vel: [MVec::ZERO; NUM_DIMENSIONS],
            };
            for neighbour in neighbour_search(
                tree,
                box_,
                &particle.pos,
                support,
                parameters.max_neighbor_number,
            ) {
                if neighbour.index == index {
                    continue;
                }
                let other = &particles[neighbour.index];
                let dist = box_.periodic_distance_vec(&particle.pos, &other.pos);
                if dist.length() == 0.0 {
                    continue;
                }
                let grad = kernel.grad_w_vec(&dist, particle.sml);
                update.dens += grad * (other.mass * (other.dens - particle.dens));
                update.pres += grad * (other.mass * (other.pres - particle.pres));
                for axis in 0..NUM_DIMENSIONS {
                    update.vel[axis] += grad
                        * (other.mass * (other.vel_pred[axis] - particle.vel_pred[axis]));
                }
            }
            update.dens /= particle.dens;
            update.pres /= particle.dens;
            for axis in 0..NUM_DIMENSIONS {
                update.vel[axis] /= particle.dens;
            }
            Some(update)
        })
        .collect();
    let zero_or = |value: Option<&GradientUpdate>, get: &dyn Fn(&GradientUpdate) -> MVec| {
        value.map(get).unwrap_or(MVec::ZERO)
    };
    aux.set_vector(
        GRAD_DENS,
        updates
            .iter()
            .map(|update| zero_or(update.as_ref(), &|update| update.dens))
            .collect(),
    );
    aux.set_vector(
        GRAD_PRES,
        updates
            .iter()
            .map(|update| zero_or(update.as_ref(), &|update| update.pres))
            .collect(),
    );
    for axis in 0..NUM_DIMENSIONS {
        aux.set_vector(
            velocity_gradient_name(axis),
            updates
                .iter()
                .map(|update| zero_or(update.as_ref(), &|update| update.vel[axis]))
                .collect(),
        );
    }
}

/// The van Leer slope limiter: the harmonic mean of same-signed
/// slopes, zero otherwise.
pub(crate) fn van_leer(a: Float, b: Float) -> Float {
    if a * b > 0.0 {
        2.0 * a * b / (a + b)
    } else {
        0.0
    }
}

/// Builds the left/right Riemann states of the pair (i, j) on the
/// axis `e_ij` (the unit vector from i towards j), optionally
/// MUSCL-reconstructed to the interface midpoint.
#[allow(clippy::too_many_arguments)]
pub(crate) fn reconstruct_pair(
    particles: &[Particle],
    index_i: usize,
    index_j: usize,
    e_ij: MVec,
    r: Float,
    gamma: Float,
    aux: &AuxColumns,
    second_order: bool,
) -> (RiemannState, RiemannState) {
    let particle_i = &particles[index_i];
    let particle_j = &particles[index_j];
    let vel_i = particle_i.vel_pred.dot(e_ij);
    let vel_j = particle_j.vel_pred.dot(e_ij);
    let mut left = RiemannState {
        vel: vel_i,
        dens: particle_i.dens,
        pres: particle_i.pres,
        sound: particle_i.sound,
    };
    let mut right = RiemannState {
        vel: vel_j,
        dens: particle_j.dens,
        pres: particle_j.pres,
        sound: particle_j.sound,
    };
    if second_order {
        let half_separation = 0.5 * r;
        let limited = |value_i: Float,
                       value_j: Float,
                       grad_i: MVec,
                       grad_j: MVec|
         -> (Float, Float) {
            let pair_slope = (value_j - value_i) / r;
            let slope_i = van_leer(grad_i.dot(e_ij), pair_slope);
            let slope_j = van_leer(grad_j.dot(e_ij), pair_slope);
            (
                value_i + slope_i * half_separation,
                value_j - slope_j * half_separation,
            )
        };
        let grad_dens = aux.vector(GRAD_DENS).expect("gradient columns not registered");
        let grad_pres = aux.vector(GRAD_PRES).expect("gradient columns not registered");
        let (dens_left, dens_right) = limited(
            particle_i.dens,
            particle_j.dens,
            grad_dens[index_i],
            grad_dens[index_j],
        );
        let (pres_left, pres_right) = limited(
            particle_i.pres,
            particle_j.pres,
            grad_pres[index_i],
            grad_pres[index_j],
        );
        // The directional derivative of the projected velocity.
        let mut dvel_i = 0.0;
        let mut dvel_j = 0.0;
        for axis in 0..NUM_DIMENSIONS {
            let grad_vel = aux
                .vector(velocity_gradient_name(axis))
                .expect("gradient columns not registered");
            dvel_i += grad_vel[index_i].dot(e_ij) * e_ij[axis];
            dvel_j += grad_vel[index_j].dot(e_ij) * e_ij[axis];
        }
        let pair_slope = (vel_j - vel_i) / r;
        let vel_left = vel_i + van_leer(dvel_i, pair_slope) * half_separation;
        let vel_right = vel_j - van_leer(dvel_j, pair_slope) * half_separation;
        if dens_left > 0.0 && pres_left > 0.0 {
            left = RiemannState {
                vel: vel_left,
                dens: dens_left,
                pres: pres_left,
                sound: (gamma * pres_left / dens_left).sqrt(),
            };
        }
        if dens_right > 0.0 && pres_right > 0.0 {
            right = RiemannState {
                vel: vel_right,
                dens: dens_right,
                pres: pres_right,
                sound: (gamma * pres_right / dens_right).sqrt(),
            };
        }
    }
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::gradient_pass;
    use super::van_leer;
    use super::GRAD_PRES;
    use crate::hydrodynamics::parameters::HydrodynamicsParameters;
    use crate::hydrodynamics::parameters::SphVariant;
    use crate::hydrodynamics::smoothing_length::update_smoothing_lengths_and_densities;
    use crate::prelude::Extent;
    use crate::prelude::Kernel;
    use crate::prelude::KernelType;
    use crate::prelude::SimulationBox;
    use crate::prelude::NUM_DIMENSIONS;
    use crate::quadtree::QuadTreeConfig;
    use crate::quadtree::SphTree;
    use crate::simulation::AuxColumns;
    use crate::test_utils::assert_is_close_tolerance;
    use crate::test_utils::get_test_lattice;
    use crate::test_utils::test_neighbor_number;

    #[test]
    fn van_leer_limits_opposing_slopes_to_zero() {
        assert_eq!(van_leer(1.0, -2.0), 0.0);
        assert_eq!(van_leer(-1.0, 2.0), 0.0);
        assert_eq!(van_leer(0.0, 2.0), 0.0);
    }

    #[test]
    fn van_leer_is_bounded_by_twice_the_smaller_slope() {
        assert_is_close_tolerance(van_leer(1.0, 1.0), 1.0, 1e-12);
        let limited = van_leer(1.0, 100.0);
        assert!(limited < 2.0);
        assert!(limited > 1.0);
    }

    #[test]
    fn reconstruction_meets_at_the_interface_midpoint_for_linear_fields() {
        use crate::prelude::mvec_from_fn;
        use crate::prelude::MVec;
        use crate::prelude::Particle;

        let e_x = mvec_from_fn(|axis| if axis == 0 { 1.0 } else { 0.0 });
        let mut particle_i = Particle::new(MVec::ZERO, MVec::ZERO, 1.0, 1.0, 0);
        let mut particle_j = Particle::new(e_x * 0.4, MVec::ZERO, 1.0, 1.0, 1);
        for (particle, value) in [(&mut particle_i, 1.0), (&mut particle_j, 1.4)] {
            particle.dens = value;
            particle.pres = value;
            particle.sound = 1.0;
        }
        let mut aux = AuxColumns::new();
        super::register_gradient_columns(&mut aux);
        aux.set_vector(super::GRAD_DENS, vec![e_x, e_x]);
        aux.set_vector(GRAD_PRES, vec![e_x, e_x]);
        for axis in 0..NUM_DIMENSIONS {
            aux.set_vector(
                super::velocity_gradient_name(axis),
                vec![MVec::ZERO, MVec::ZERO],
            );
        }
        let particles = vec![particle_i, particle_j];
        let (left, right) =
            super::reconstruct_pair(&particles, 0, 1, e_x, 0.4, 5.0 / 3.0, &aux, true);
        assert_is_close_tolerance(left.dens, 1.2, 1e-12);
        assert_is_close_tolerance(right.dens, 1.2, 1e-12);
        assert_is_close_tolerance(left.pres, 1.2, 1e-12);
        assert_is_close_tolerance(right.pres, 1.2, 1e-12);
        // First order keeps the particle values.
        let (left, right) =
            super::reconstruct_pair(&particles, 0, 1, e_x, 0.4, 5.0 / 3.0, &aux, false);
        assert_is_close_tolerance(left.dens, 1.0, 1e-12);
        assert_is_close_tolerance(right.dens, 1.4, 1e-12);
    }

    #[test]
    fn gradients_recover_a_linear_pressure_field() {
        let parameters = HydrodynamicsParameters {
            sph_type: SphVariant::Gsph,
            kernel: KernelType::CubicSpline,
            gamma: 5.0 / 3.0,
            neighbor_number: test_neighbor_number(),
            iterative_sml: true,
            max_neighbor_number: 1024,
            artificial_viscosity: Default::default(),
            use_second_order: true,
            ene_floor: 1e-8,
            two_and_half_sim: None,
        };
        let kernel = Kernel::new(KernelType::CubicSpline, NUM_DIMENSIONS);
        let box_ = SimulationBox::new(
            Extent::cube_from_side_length(1.0),
            [false; NUM_DIMENSIONS],
        );
        let mut particles = get_test_lattice(1.0);
        let tree = SphTree::construct(&QuadTreeConfig::default(), &particles, &kernel, &box_);
        update_smoothing_lengths_and_densities(&mut particles, &tree, &kernel, &box_, &parameters);
        for particle in particles.iter_mut() {
            particle.pres = 1.0 + 2.0 * particle.pos[0];
        }
        let mut aux = AuxColumns::new();
        super::register_gradient_columns(&mut aux);
        gradient_pass(&particles, &tree, &kernel, &box_, &parameters, &mut aux);
        let grad_pres = aux.vector(GRAD_PRES).unwrap();
        for (index, particle) in particles.iter().enumerate() {
            let interior = (0..NUM_DIMENSIONS)
                .all(|axis| particle.pos[axis] > 0.3 && particle.pos[axis] < 0.7);
            if !interior {
                continue;
            }
            assert!(
                (grad_pres[index][0] - 2.0).abs() < 0.2,
                "grad_p = {:?}",
                grad_pres[index]
            );
            for axis in 1..NUM_DIMENSIONS {
                assert!(grad_pres[index][axis].abs() < 0.2);
            }
        }
    }
}
