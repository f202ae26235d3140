//! Pyramid layouts: the structure of a whole pyramid as plain data.
//!
//! A `PyramidLayout` can be built in code, loaded from any `serde` format (with the `serde` feature), and passed to
//! `Resource::create_model` to create a pyramid with one empty mosaic per level.
//!
//! ```
//! use coverage_pyramids_core::prelude::*;
//! use coverage_pyramids_storage::PyramidLayout;
//!
//! let layout = PyramidLayout::power_of_two(
//!     Crs::Epsg3857, PointN([0.0, 0.0]), 10.0, PointN([256, 256]), PointN([5, 3]), 3,
//! );
//!
//! let grids: Vec<_> = layout.levels.iter().map(|l| l.grid_size).collect();
//! assert_eq!(grids, vec![PointN([5, 3]), PointN([3, 2]), PointN([2, 1])]);
//! ```

use crate::{MosaicDescriptor, PyramidModel, Result};

use coverage_pyramids_core::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PyramidLayout {
    pub crs: Crs,
    pub levels: Vec<MosaicDescriptor>,
}

impl PyramidLayout {
    /// A layout with no levels.
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            levels: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: MosaicDescriptor) -> Self {
        self.levels.push(level);
        self
    }

    /// A classic power-of-two pyramid. Level 0 has `base_scale` and `base_grid`; each following level doubles the scale and
    /// halves the grid, rounding up so the coarser level still covers the finer one. All levels share `upper_left` and
    /// `tile_shape`.
    pub fn power_of_two(
        crs: Crs,
        upper_left: Point2d,
        base_scale: f64,
        tile_shape: Point2i,
        base_grid: Point2i,
        num_levels: u8,
    ) -> Self {
        let mut levels = Vec::with_capacity(num_levels as usize);
        let mut scale = base_scale;
        let mut grid_size = base_grid;
        for _ in 0..num_levels {
            levels.push(MosaicDescriptor::new(upper_left, grid_size, tile_shape, scale));
            scale *= 2.0;
            grid_size = grid_size.scalar_div_ceil(2).join(&Point2i::ONES);
        }

        Self { crs, levels }
    }

    /// Returns the first invalid level, if any.
    pub fn validate(&self) -> Result<()> {
        self.levels.iter().try_for_each(MosaicDescriptor::validate)
    }
}

impl PyramidModel for PyramidLayout {
    fn model_crs(&self) -> Crs {
        self.crs.clone()
    }

    fn mosaic_descriptors(&self) -> Vec<MosaicDescriptor> {
        self.levels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::PyramidError;

    use pretty_assertions::assert_eq;

    #[test]
    fn power_of_two_doubles_scale_and_halves_grid() {
        let layout = PyramidLayout::power_of_two(
            Crs::WGS84,
            PointN([-180.0, 90.0]),
            0.25,
            PointN([256, 256]),
            PointN([8, 4]),
            5,
        );

        let scales: Vec<_> = layout.levels.iter().map(|l| l.scale()).collect();
        assert_eq!(scales, vec![0.25, 0.5, 1.0, 2.0, 4.0]);

        let grids: Vec<_> = layout.levels.iter().map(|l| l.grid_size).collect();
        assert_eq!(
            grids,
            vec![
                PointN([8, 4]),
                PointN([4, 2]),
                PointN([2, 1]),
                PointN([1, 1]),
                PointN([1, 1])
            ]
        );
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn validate_reports_bad_levels() {
        let good = MosaicDescriptor::new(PointN([0.0, 0.0]), PointN([1, 1]), PointN([16, 16]), 1.0);
        let bad = MosaicDescriptor::new(PointN([0.0, 0.0]), PointN([1, 1]), PointN([16, 0]), 1.0);

        let layout = PyramidLayout::new(Crs::Epsg3857)
            .with_level(good)
            .with_level(bad);

        assert!(matches!(
            layout.validate(),
            Err(PyramidError::InvalidLayout(_))
        ));
    }
}
