use std::f64::consts::PI;

use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::NUM_DIMENSIONS;

/// The available kernel shapes. Both have compact support `[0, h)`
/// on `q = r / h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    CubicSpline,
    Wendland,
}

impl Default for KernelType {
    fn default() -> Self {
        Self::CubicSpline
    }
}

/// A smoothing kernel, constructed once and shared by every
/// interaction pass.
///
/// The effective dimension may differ from the compiled ambient
/// dimension: in the thin-slab ("2.5D") mode positions are
/// three-dimensional while the kernel is normalised two-dimensionally
/// and carries a second, fixed smoothing length for the z axis.
#[derive(Clone, Debug)]
pub struct Kernel {
    kind: KernelType,
    dim: usize,
    h_z: Option<Float>,
}

impl Kernel {
    pub fn new(kind: KernelType, dim: usize) -> Self {
        assert!((1..=3).contains(&dim));
        Self {
            kind,
            dim,
            h_z: None,
        }
    }

    /// The anisotropic thin-slab kernel: two-dimensional
    /// normalisation, fixed vertical smoothing length `h_z`.
    #[cfg(not(any(feature = "1d", feature = "2d")))]
    pub fn anisotropic(kind: KernelType, h_z: Float) -> Self {
        assert!(h_z > 0.0);
        Self {
            kind,
            dim: 2,
            h_z: Some(h_z),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_anisotropic(&self) -> bool {
        self.h_z.is_some()
    }

    /// The radius beyond which a particle with smoothing length `h`
    /// cannot interact.
    pub fn support_radius(&self, h: Float) -> Float {
        match self.h_z {
            Some(h_z) => h.max(h_z),
            None => h,
        }
    }

    fn sigma(&self) -> Float {
        match (self.kind, self.dim) {
            (KernelType::CubicSpline, 1) => 4.0 / 3.0,
            (KernelType::CubicSpline, 2) => 40.0 / (7.0 * PI),
            (KernelType::CubicSpline, 3) => 8.0 / PI,
            (KernelType::Wendland, 1) => 3.0 / 2.0,
            (KernelType::Wendland, 2) => 9.0 / PI,
            (KernelType::Wendland, 3) => 495.0 / (32.0 * PI),
            _ => unreachable!(),
        }
    }

    fn f(&self, q: Float) -> Float {
        match self.kind {
            KernelType::CubicSpline => {
                // Spline kernel, Monaghan & Lattanzio 1985
                if q < 0.5 {
                    1.0 - 6.0 * q.powi(2) + 6.0 * q.powi(3)
                } else if q < 1.0 {
                    2.0 * (1.0 - q).powi(3)
                } else {
                    0.0
                }
            }
            KernelType::Wendland => {
                // Wendland C4, Dehnen & Aly 2012
                if q >= 1.0 {
                    0.0
                } else if self.dim == 1 {
                    (1.0 - q).powi(5) * (1.0 + 5.0 * q + 8.0 * q.powi(2))
                } else {
                    (1.0 - q).powi(6) * (1.0 + 6.0 * q + 35.0 / 3.0 * q.powi(2))
                }
            }
        }
    }

    fn df(&self, q: Float) -> Float {
        match self.kind {
            KernelType::CubicSpline => {
                if q < 0.5 {
                    -12.0 * q + 18.0 * q.powi(2)
                } else if q < 1.0 {
                    -6.0 * (1.0 - q).powi(2)
                } else {
                    0.0
                }
            }
            KernelType::Wendland => {
                if q >= 1.0 {
                    0.0
                } else if self.dim == 1 {
                    -14.0 * q * (1.0 + 4.0 * q) * (1.0 - q).powi(4)
                } else {
                    -56.0 / 3.0 * q * (1.0 + 5.0 * q) * (1.0 - q).powi(5)
                }
            }
        }
    }

    /// W(r, h).
    pub fn w(&self, r: Float, h: Float) -> Float {
        let q = r / h;
        if q >= 1.0 {
            return 0.0;
        }
        self.sigma() / h.powi(self.dim as i32) * self.f(q)
    }

    /// dW/dh at fixed r.
    pub fn dw_dh(&self, r: Float, h: Float) -> Float {
        let q = r / h;
        if q >= 1.0 {
            return 0.0;
        }
        -self.sigma() / h.powi(self.dim as i32 + 1)
            * (self.dim as Float * self.f(q) + q * self.df(q))
    }

    /// The gradient of W with respect to the first particle of the
    /// pair, given their displacement `dist` of length `r`. Zero at
    /// r = 0 and beyond the support.
    pub fn grad_w(&self, dist: MVec, r: Float, h: Float) -> MVec {
        let q = r / h;
        if r == 0.0 || q >= 1.0 {
            return MVec::ZERO;
        }
        dist / r * (self.sigma() / h.powi(self.dim as i32 + 1) * self.df(q))
    }

    /// W evaluated on a displacement vector; routes the anisotropic
    /// mode.
    pub fn w_vec(&self, dist: &MVec, h: Float) -> Float {
        #[cfg(not(any(feature = "1d", feature = "2d")))]
        if let Some(h_z) = self.h_z {
            let q = anisotropic_q(dist, h, h_z);
            if q >= 1.0 {
                return 0.0;
            }
            return self.sigma() / h.powi(2) * self.f(q);
        }
        self.w(dist.length(), h)
    }

    pub fn grad_w_vec(&self, dist: &MVec, h: Float) -> MVec {
        #[cfg(not(any(feature = "1d", feature = "2d")))]
        if let Some(h_z) = self.h_z {
            let q = anisotropic_q(dist, h, h_z);
            if q == 0.0 || q >= 1.0 {
                return MVec::ZERO;
            }
            let scale = self.sigma() / h.powi(2) * self.df(q) / q;
            return MVec::new(
                dist.x / h.powi(2),
                dist.y / h.powi(2),
                dist.z / h_z.powi(2),
            ) * scale;
        }
        self.grad_w(*dist, dist.length(), h)
    }

    /// dW/dh on a displacement vector. In the anisotropic mode this
    /// is the derivative with respect to the planar smoothing length,
    /// `h_z` held fixed.
    pub fn dw_dh_vec(&self, dist: &MVec, h: Float) -> Float {
        #[cfg(not(any(feature = "1d", feature = "2d")))]
        if let Some(h_z) = self.h_z {
            let q = anisotropic_q(dist, h, h_z);
            if q >= 1.0 {
                return 0.0;
            }
            let q_xy = dist.truncate().length() / h;
            let df_term = if q == 0.0 {
                0.0
            } else {
                q_xy.powi(2) / q * self.df(q)
            };
            return -self.sigma() / h.powi(3) * (2.0 * self.f(q) + df_term);
        }
        self.dw_dh(dist.length(), h)
    }
}

#[cfg(not(any(feature = "1d", feature = "2d")))]
fn anisotropic_q(dist: &MVec, h: Float, h_z: Float) -> Float {
    let q_xy = dist.truncate().length() / h;
    let q_z = dist.z / h_z;
    (q_xy.powi(2) + q_z.powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::Kernel;
    use super::KernelType;
    use crate::prelude::Float;
    use crate::prelude::MVec;
    use crate::test_utils::assert_is_close_tolerance;

    fn surface_of_unit_sphere(dim: usize) -> Float {
        match dim {
            1 => 2.0,
            2 => 2.0 * PI,
            3 => 4.0 * PI,
            _ => unreachable!(),
        }
    }

    #[test]
    fn kernels_are_normalized() {
        let num_points = 200_000;
        let h = 1.3;
        for kind in [KernelType::CubicSpline, KernelType::Wendland] {
            for dim in 1..=3 {
                let kernel = Kernel::new(kind, dim);
                let dr = h / num_points as Float;
                let mut integral = 0.0;
                for bin in 0..num_points {
                    let r = (bin as Float + 0.5) * dr;
                    integral += surface_of_unit_sphere(dim)
                        * r.powi(dim as i32 - 1)
                        * kernel.w(r, h)
                        * dr;
                }
                assert_is_close_tolerance(integral, 1.0, 1e-6);
            }
        }
    }

    #[test]
    fn kernels_have_compact_support() {
        for kind in [KernelType::CubicSpline, KernelType::Wendland] {
            for dim in 1..=3 {
                let kernel = Kernel::new(kind, dim);
                assert_eq!(kernel.w(1.0, 1.0), 0.0);
                assert_eq!(kernel.w(1.5, 1.0), 0.0);
                assert_eq!(kernel.dw_dh(1.0, 1.0), 0.0);
                assert_eq!(kernel.grad_w(MVec::ONE, 1.0, 1.0), MVec::ZERO);
                assert_eq!(kernel.grad_w(MVec::ZERO, 0.0, 1.0), MVec::ZERO);
            }
        }
    }

    #[test]
    fn kernel_derivatives_match_finite_differences() {
        let h = 0.8;
        let eps = 1e-7;
        for kind in [KernelType::CubicSpline, KernelType::Wendland] {
            for dim in 1..=3 {
                let kernel = Kernel::new(kind, dim);
                for r in [0.1, 0.3, 0.45, 0.62, 0.79] {
                    let dw_dh = (kernel.w(r, h + eps) - kernel.w(r, h - eps)) / (2.0 * eps);
                    assert_is_close_tolerance(kernel.dw_dh(r, h), dw_dh, 1e-5);
                    let dw_dr = (kernel.w(r + eps, h) - kernel.w(r - eps, h)) / (2.0 * eps);
                    let mut dist = MVec::ZERO;
                    dist[0] = r;
                    let grad = kernel.grad_w(dist, r, h);
                    assert_is_close_tolerance(grad[0], dw_dr, 1e-5);
                }
            }
        }
    }

    #[test]
    #[cfg(not(any(feature = "1d", feature = "2d")))]
    fn anisotropic_kernel_reduces_to_planar_form_in_the_midplane() {
        let h = 0.6;
        let h_z = 0.2;
        let kernel = Kernel::anisotropic(KernelType::CubicSpline, h_z);
        let planar = Kernel::new(KernelType::CubicSpline, 2);
        for r in [0.0, 0.1, 0.3, 0.55] {
            let dist = MVec::new(r, 0.0, 0.0);
            assert_is_close_tolerance(kernel.w_vec(&dist, h), planar.w(r, h), 1e-12);
        }
        // Support in z is governed by h_z.
        assert_eq!(kernel.w_vec(&MVec::new(0.0, 0.0, h_z), h), 0.0);
        assert!(kernel.w_vec(&MVec::new(0.0, 0.0, 0.9 * h_z), h) > 0.0);
    }
}
