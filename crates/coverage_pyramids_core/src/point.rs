pub mod point2;
pub mod point_traits;

pub use point2::*;
pub use point_traits::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2-dimensional point, which is just a primitive array of type `N`. It is most convenient to construct points as:
///
/// ```
/// use coverage_pyramids_core::PointN;
///
/// let grid_position = PointN([1, 2]);
/// let geo_position = PointN([-9500.0, 20500.0]);
/// ```
///
/// Points support basic linear algebraic operations such as addition, subtraction, component-wise multiplication and scalar
/// multiplication.
///
/// ```
/// use coverage_pyramids_core::PointN;
///
/// let p1 = PointN([1, 2]);
/// let p2 = PointN([3, 4]);
///
/// assert_eq!(p1 + p2, PointN([4, 6]));
/// assert_eq!(p1 - p2, PointN([-2, -2]));
/// assert_eq!(p1 * 2, PointN([2, 4]));
/// ```
///
/// There is also a partial order defined on points which says that a point A is greater than a point B if and only if all of
/// the components of point A are greater than point B. This is how grid bounds are checked:
///
/// ```
/// use coverage_pyramids_core::PointN;
///
/// let min = PointN([0, 0]);
/// let grid_size = PointN([4, 4]);
///
/// let p = PointN([1, 3]);
/// assert!(min <= p && p < grid_size);
/// assert!(!(PointN([4, 0]) < grid_size));
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PointN<N>(pub N);
