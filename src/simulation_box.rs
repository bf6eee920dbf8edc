use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Extent;
use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::NUM_DIMENSIONS;

/// The simulation box. Along every axis marked periodic, positions
/// are wrapped back into the box and pairwise displacements use the
/// minimum image; along the other axes the raw difference is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationBox {
    pub min: MVec,
    pub max: MVec,
    #[serde(default)]
    pub periodic: [bool; NUM_DIMENSIONS],
}

fn periodic_wrap_component(v: Float, min: Float, max: Float) -> Float {
    (v - min).rem_euclid(max - min) + min
}

fn minimize_component(v: Float, length: Float) -> Float {
    if v < 0.0 {
        if v.abs() < (v + length).abs() {
            v
        } else {
            v + length
        }
    } else if v.abs() < (v - length).abs() {
        v
    } else {
        v - length
    }
}

impl SimulationBox {
    pub fn new(extent: Extent, periodic: [bool; NUM_DIMENSIONS]) -> Self {
        Self {
            min: extent.min,
            max: extent.max,
            periodic,
        }
    }

    pub fn cube_from_side_length(side_length: Float) -> Self {
        Self::new(
            Extent::cube_from_side_length(side_length),
            [true; NUM_DIMENSIONS],
        )
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.min, self.max)
    }

    pub fn side_lengths(&self) -> MVec {
        self.max - self.min
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic.iter().any(|axis| *axis)
    }

    pub fn periodic_wrap(&self, mut pos: MVec) -> MVec {
        for axis in 0..NUM_DIMENSIONS {
            if self.periodic[axis] {
                pos[axis] = periodic_wrap_component(pos[axis], self.min[axis], self.max[axis]);
            }
        }
        pos
    }

    pub fn periodic_distance_vec(&self, p1: &MVec, p2: &MVec) -> MVec {
        let mut dist = *p1 - *p2;
        let side_lengths = self.side_lengths();
        for axis in 0..NUM_DIMENSIONS {
            if self.periodic[axis] {
                dist[axis] = minimize_component(dist[axis], side_lengths[axis]);
            }
        }
        dist
    }

    pub fn periodic_distance(&self, p1: &MVec, p2: &MVec) -> Float {
        self.periodic_distance_vec(p1, p2).length()
    }
}

#[cfg(test)]
#[cfg(not(any(feature = "1d", feature = "2d")))]
mod tests {
    use super::SimulationBox;
    use crate::extent::Extent;
    use crate::prelude::MVec;
    use crate::test_utils::assert_float_is_close;
    use crate::test_utils::assert_vec_is_close;

    #[test]
    fn periodic_wrap() {
        let check_wrap = |box_: &SimulationBox, (x, y, z), (x_wrapped, y_wrapped, z_wrapped)| {
            let v = box_.periodic_wrap(MVec::new(x, y, z));
            assert_vec_is_close(v, MVec::new(x_wrapped, y_wrapped, z_wrapped));
        };
        let box_ = SimulationBox::new(
            Extent::new(MVec::new(0.0, 0.0, 0.0), MVec::new(1.0, 2.0, 3.0)),
            [true; 3],
        );
        check_wrap(&box_, (0.5, 0.5, 0.5), (0.5, 0.5, 0.5));
        check_wrap(&box_, (1.5, 0.5, 0.5), (0.5, 0.5, 0.5));
        check_wrap(&box_, (0.5, 2.5, 0.5), (0.5, 0.5, 0.5));
        check_wrap(&box_, (0.5, 0.5, 3.5), (0.5, 0.5, 0.5));
        check_wrap(&box_, (1.5, 2.5, 3.5), (0.5, 0.5, 0.5));
        check_wrap(&box_, (-0.5, -0.5, -0.5), (0.5, 1.5, 2.5));
    }

    #[test]
    fn periodic_distance() {
        let check_dist = |box_: &SimulationBox, (x1, y1, z1), (x2, y2, z2), distance| {
            let v1 = MVec::new(x1, y1, z1);
            let v2 = MVec::new(x2, y2, z2);
            assert_float_is_close(box_.periodic_distance(&v1, &v2), distance);
        };
        let box_ = SimulationBox::new(
            Extent::new(MVec::new(0.0, 0.0, 0.0), MVec::new(1.0, 2.0, 3.0)),
            [true; 3],
        );
        check_dist(&box_, (0.0, 0.0, 0.0), (0.0, 0.0, 0.0), 0.0);
        check_dist(&box_, (-0.1, 0.0, 0.0), (0.1, 0.0, 0.0), 0.2);
        check_dist(&box_, (0.0, -0.1, 0.0), (0.0, 0.1, 0.0), 0.2);
        check_dist(&box_, (0.0, 0.0, -0.1), (0.0, 0.0, 0.1), 0.2);
        check_dist(&box_, (0.0, 0.0, 0.0), (0.5, 0.0, 0.0), 0.5);
        check_dist(&box_, (0.2, 0.0, 0.0), (0.7, 0.0, 0.0), 0.5);
    }

    #[test]
    fn disabled_axes_use_the_raw_difference() {
        let box_ = SimulationBox::new(
            Extent::new(MVec::ZERO, MVec::new(1.0, 1.0, 1.0)),
            [true, false, false],
        );
        let v1 = MVec::new(0.05, 0.05, 0.05);
        let v2 = MVec::new(0.95, 0.95, 0.95);
        let dist = box_.periodic_distance_vec(&v1, &v2);
        assert_float_is_close(dist.x, 0.1);
        assert_float_is_close(dist.y, -0.9);
        assert_float_is_close(dist.z, -0.9);
        let wrapped = box_.periodic_wrap(MVec::new(1.2, 1.2, 1.2));
        assert_float_is_close(wrapped.x, 0.2);
        assert_float_is_close(wrapped.y, 1.2);
        assert_float_is_close(wrapped.z, 1.2);
    }

    #[test]
    fn periodic_distance_is_antisymmetric() {
        let box_ = SimulationBox::cube_from_side_length(1.0);
        let positions = [
            MVec::new(0.1, 0.2, 0.3),
            MVec::new(0.9, 0.8, 0.7),
            MVec::new(0.5, 0.1, 0.9),
        ];
        for p1 in positions.iter() {
            for p2 in positions.iter() {
                let d1 = box_.periodic_distance_vec(p1, p2);
                let d2 = box_.periodic_distance_vec(p2, p1);
                assert_vec_is_close(d1, -d2);
            }
        }
    }
}
