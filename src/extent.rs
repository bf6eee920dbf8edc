use serde::Deserialize;
use serde::Serialize;

use crate::prelude::mvec_from_fn;
use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::NUM_DIMENSIONS;
use crate::prelude::TWO_TO_NUM_DIMENSIONS;

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: MVec,
    pub max: MVec,
}

impl Extent {
    pub fn new(min: MVec, max: MVec) -> Self {
        for axis in 0..NUM_DIMENSIONS {
            debug_assert!(min[axis] <= max[axis]);
        }
        Self { min, max }
    }

    pub fn cube_from_side_length(side_length: Float) -> Self {
        Self {
            min: MVec::ZERO,
            max: MVec::ONE * side_length,
        }
    }

    pub fn center(&self) -> MVec {
        (self.min + self.max) * 0.5
    }

    pub fn side_lengths(&self) -> MVec {
        self.max - self.min
    }

    pub fn max_side_length(&self) -> Float {
        self.side_lengths().max_element()
    }

    pub fn contains(&self, pos: &MVec) -> bool {
        (0..NUM_DIMENSIONS)
            .all(|axis| self.min[axis] <= pos[axis] && pos[axis] <= self.max[axis])
    }

    /// Return an extent with slightly increased size
    /// but the same center
    pub fn pad(self) -> Self {
        const PADDING_FRACTION: Float = 0.01;
        let center = self.center();
        let dist_to_min = self.min - center;
        let dist_to_max = self.max - center;
        Self {
            min: center + dist_to_min * (1.0 + PADDING_FRACTION),
            max: center + dist_to_max * (1.0 + PADDING_FRACTION),
        }
    }

    pub fn from_positions<'a>(positions: impl Iterator<Item = &'a MVec>) -> Option<Self> {
        let mut min: Option<MVec> = None;
        let mut max: Option<MVec> = None;
        for pos in positions {
            min = Some(min.map_or(*pos, |min| min.min(*pos)));
            max = Some(max.map_or(*pos, |max| max.max(*pos)));
        }
        Some(Self {
            min: min?,
            max: max?,
        })
    }

    /// The index of the subdivision (child octant/quadrant/half) that
    /// contains `pos`. Axis `a` contributes bit `a`.
    pub fn get_subdivision_index(&self, pos: &MVec) -> usize {
        let center = self.center();
        let mut index = 0;
        for axis in 0..NUM_DIMENSIONS {
            if pos[axis] >= center[axis] {
                index |= 1 << axis;
            }
        }
        index
    }

    pub fn get_subdivisions(&self) -> [Self; TWO_TO_NUM_DIMENSIONS] {
        let center = self.center();
        array_init::array_init(|index| {
            let min = mvec_from_fn(|axis| {
                if index & (1 << axis) == 0 {
                    self.min[axis]
                } else {
                    center[axis]
                }
            });
            let max = mvec_from_fn(|axis| {
                if index & (1 << axis) == 0 {
                    center[axis]
                } else {
                    self.max[axis]
                }
            });
            Self { min, max }
        })
    }
}

impl std::fmt::Debug for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Extent({:.3?} {:.3?})", self.min, self.max)
    }
}
