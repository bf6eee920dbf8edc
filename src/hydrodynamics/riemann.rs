use crate::prelude::Float;

/// A one-dimensional primitive state at a pair interface, with the
/// velocity already projected onto the pair axis.
#[derive(Clone, Copy, Debug)]
pub struct RiemannState {
    pub vel: Float,
    pub dens: Float,
    pub pres: Float,
    pub sound: Float,
}

#[derive(Clone, Copy, Debug)]
pub struct RiemannSolution {
    pub pres_star: Float,
    pub vel_star: Float,
}

/// The HLL pair solver: two wave-speed estimates from Roe averages,
/// then the intermediate pressure and velocity from the
/// Rankine-Hugoniot conditions across the two waves. With identical
/// left and right states this returns the input state and drives no
/// flux.
pub fn solve_hll(left: RiemannState, right: RiemannState) -> RiemannSolution {
    let weight_left = left.dens.max(0.0).sqrt();
    let weight_right = right.dens.max(0.0).sqrt();
    let total_weight = weight_left + weight_right;
    let (vel_roe, sound_roe) = if total_weight > 0.0 {
        (
            (weight_left * left.vel + weight_right * right.vel) / total_weight,
            (weight_left * left.sound + weight_right * right.sound) / total_weight,
        )
    } else {
        (
            0.5 * (left.vel + right.vel),
            0.5 * (left.sound + right.sound),
        )
    };
    let s_left = (left.vel - left.sound).min(vel_roe - sound_roe);
    let s_right = (right.vel + right.sound).max(vel_roe + sound_roe);
    // The mass fluxes through the two waves; c_left <= 0 <= c_right.
    let c_left = left.dens * (s_left - left.vel);
    let c_right = right.dens * (s_right - right.vel);
    let denominator = c_right - c_left;
    if denominator <= 0.0 {
        return RiemannSolution {
            pres_star: 0.5 * (left.pres + right.pres),
            vel_star: 0.5 * (left.vel + right.vel),
        };
    }
    let vel_star =
        (c_right * right.vel - c_left * left.vel + left.pres - right.pres) / denominator;
    let pres_star = (c_right * left.pres - c_left * right.pres
        + c_left * c_right * (right.vel - left.vel))
        / denominator;
    RiemannSolution {
        pres_star: pres_star.max(0.0),
        vel_star,
    }
}

#[cfg(test)]
mod tests {
    use super::solve_hll;
    use super::RiemannState;
    use crate::test_utils::assert_is_close_tolerance;

    fn state(vel: f64, dens: f64, pres: f64, gamma: f64) -> RiemannState {
        RiemannState {
            vel,
            dens,
            pres,
            sound: (gamma * pres / dens).sqrt(),
        }
    }

    #[test]
    fn identical_states_produce_no_flux() {
        let gamma = 1.4;
        for vel in [-2.0, 0.0, 0.7] {
            let left = state(vel, 1.3, 2.4, gamma);
            let solution = solve_hll(left, left);
            assert_is_close_tolerance(solution.vel_star, vel, 1e-12);
            assert_is_close_tolerance(solution.pres_star, 2.4, 1e-12);
        }
    }

    #[test]
    fn mirror_symmetry() {
        let gamma = 5.0 / 3.0;
        let left = state(0.3, 1.0, 1.0, gamma);
        let right = state(-0.2, 0.5, 0.8, gamma);
        let solution = solve_hll(left, right);
        let mirrored = solve_hll(
            state(0.2, 0.5, 0.8, gamma),
            state(-0.3, 1.0, 1.0, gamma),
        );
        assert_is_close_tolerance(solution.pres_star, mirrored.pres_star, 1e-12);
        assert_is_close_tolerance(solution.vel_star, -mirrored.vel_star, 1e-12);
    }

    #[test]
    fn compression_raises_and_rarefaction_lowers_the_pressure() {
        let gamma = 1.4;
        let compressing = solve_hll(state(1.0, 1.0, 1.0, gamma), state(-1.0, 1.0, 1.0, gamma));
        assert!(compressing.pres_star > 1.0);
        assert_is_close_tolerance(compressing.vel_star, 0.0, 1e-12);
        let expanding = solve_hll(state(-0.3, 1.0, 1.0, gamma), state(0.3, 1.0, 1.0, gamma));
        assert!(expanding.pres_star < 1.0);
    }

    #[test]
    fn sod_states_give_intermediate_pressure() {
        let gamma = 1.4;
        let solution = solve_hll(state(0.0, 1.0, 1.0, gamma), state(0.0, 0.125, 0.1, gamma));
        assert!(solution.pres_star > 0.1);
        assert!(solution.pres_star < 1.0);
        assert!(solution.vel_star > 0.0);
    }
}
