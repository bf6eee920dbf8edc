use crate::prelude::Float;

// Kernel-compatible gravitational softening (Hernquist & Katz 1989),
// on u = r / (h/2): a cubic-spline mass distribution inside u < 1, a
// transitional polynomial on 1 <= u < 2 and the Newtonian law beyond.

/// The prefactor g(r, h) of the softened force law, defined such that
/// the acceleration of a particle at displacement `dist` from a
/// source of mass m is -G m g(r, h) dist.
pub fn force_prefactor(r: Float, h: Float) -> Float {
    let half = 0.5 * h;
    let u = r / half;
    if u < 1.0 {
        (4.0 / 3.0 - 6.0 / 5.0 * u.powi(2) + 0.5 * u.powi(3)) / half.powi(3)
    } else if u < 2.0 {
        (-1.0 / 15.0 + 8.0 / 3.0 * u.powi(3) - 3.0 * u.powi(4) + 6.0 / 5.0 * u.powi(5)
            - 1.0 / 6.0 * u.powi(6))
            / r.powi(3)
    } else {
        1.0 / r.powi(3)
    }
}

/// The prefactor f(r, h) of the softened potential, defined such that
/// the potential sourced by a mass m is -G m f(r, h). Finite at the
/// origin, 1/r beyond twice the scale radius.
pub fn potential_prefactor(r: Float, h: Float) -> Float {
    let half = 0.5 * h;
    let u = r / half;
    if u < 1.0 {
        (7.0 / 5.0 - 2.0 / 3.0 * u.powi(2) + 3.0 / 10.0 * u.powi(4) - 1.0 / 10.0 * u.powi(5))
            / half
    } else if u < 2.0 {
        (8.0 / 5.0 - 4.0 / 3.0 * u.powi(2) + u.powi(3) - 3.0 / 10.0 * u.powi(4)
            + 1.0 / 30.0 * u.powi(5)
            - 1.0 / (15.0 * u))
            / half
    } else {
        1.0 / r
    }
}
