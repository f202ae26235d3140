use crate::{point::point_traits::*, Point2d, Point2i, PointN};

use core::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2-dimensional extent with scalar type `T`.
pub type Extent2<T> = ExtentN<[T; 2]>;
/// A 2-dimensional extent with scalar type `i32`. Used for ranges of tiles within a grid, and ranges of pixels within a tile.
pub type Extent2i = ExtentN<[i32; 2]>;
/// A 2-dimensional extent with scalar type `f64`. Used for envelopes in a coordinate reference system.
pub type Extent2d = ExtentN<[f64; 2]>;

/// A 2-dimensional extent. This is mathematically the Cartesian product of a half-closed interval `[a, b)` in each dimension.
/// You can also just think of it as an axis-aligned box with some shape and a minimum point.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ExtentN<N> {
    /// The least point contained in the extent.
    pub minimum: PointN<N>,
    /// The length of each dimension.
    pub shape: PointN<N>,
}

impl<N> ExtentN<N> {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub fn from_min_and_shape(minimum: PointN<N>, shape: PointN<N>) -> Self {
        Self { minimum, shape }
    }
}

impl<N> ExtentN<N>
where
    PointN<N>: Copy + Add<Output = PointN<N>> + PartialOrd,
{
    /// The least point `p` for which all points `q` in the extent satisfy `q < p`.
    #[inline]
    pub fn least_upper_bound(&self) -> PointN<N> {
        self.minimum + self.shape
    }

    /// Returns `true` iff the point `p` is contained in this extent.
    #[inline]
    pub fn contains(&self, p: PointN<N>) -> bool {
        let lub = self.least_upper_bound();

        self.minimum <= p && p < lub
    }
}

impl<N> ExtentN<N>
where
    PointN<N>: Copy + ConstZero + LatticeOrder + Add<Output = PointN<N>> + Sub<Output = PointN<N>> + PartialOrd,
{
    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: PointN<N>, least_upper_bound: PointN<N>) -> Self {
        // We want to avoid negative shape components.
        let shape = (least_upper_bound - minimum).join(&PointN::ZERO);

        Self { minimum, shape }
    }

    /// Returns the extent containing only the points in both `self` and `other`.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.join(&other.minimum);
        let lub = self.least_upper_bound().meet(&other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// Returns the smallest extent containing both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        let minimum = self.minimum.meet(&other.minimum);
        let lub = self.least_upper_bound().join(&other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// Returns `true` iff the intersection of `self` and `other` is equal to `self`.
    #[inline]
    pub fn is_subset_of(&self, other: &Self) -> bool
    where
        Self: PartialEq,
    {
        self.intersection(other).eq(self)
    }
}

impl Extent2i {
    /// The number of points contained in the extent.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.shape.join(&Point2i::ZERO).volume() as usize
    }

    /// Returns `true` iff the number of points in the extent is 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// An alternative representation of an integer extent as the minimum point and maximum point. This only works for integer
    /// extents, where there is a unique maximum point.
    #[inline]
    pub fn from_min_and_max(minimum: Point2i, max: Point2i) -> Self {
        Self::from_min_and_lub(minimum, max + Point2i::ONES)
    }

    /// Iterate over all points in the extent, in row-major order.
    /// ```
    /// # use coverage_pyramids_core::prelude::*;
    /// #
    /// let extent = Extent2i::from_min_and_shape(PointN([0, 0]), PointN([2, 2]));
    /// let points = extent.iter_points().collect::<Vec<_>>();
    /// assert_eq!(points, vec![PointN([0, 0]), PointN([1, 0]), PointN([0, 1]), PointN([1, 1])]);
    /// ```
    #[inline]
    pub fn iter_points(&self) -> <Point2i as IterExtent>::PointIter {
        Point2i::iter_extent(&self.minimum, &self.least_upper_bound())
    }
}

impl Extent2d {
    /// Returns `true` iff the extent has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.shape.x() > 0.0 && self.shape.y() > 0.0)
    }

    /// Returns `true` iff `self` and `other` share some area. Touching edges do not count.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The upper-left corner, assuming the Y axis points north.
    #[inline]
    pub fn upper_left(&self) -> Point2d {
        PointN([self.minimum.x(), self.minimum.y() + self.shape.y()])
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn row_major_extent_iter() {
        let extent = Extent2i::from_min_and_shape(PointN([0, 0]), PointN([2, 2]));

        let points: Vec<_> = extent.iter_points().collect();

        assert_eq!(
            points,
            vec![
                PointN([0, 0]),
                PointN([1, 0]),
                PointN([0, 1]),
                PointN([1, 1]),
            ]
        );
    }

    #[test]
    fn empty_intersection_is_empty() {
        let e1 = Extent2i::from_min_and_max(PointN([0; 2]), PointN([1; 2]));
        let e2 = Extent2i::from_min_and_max(PointN([3; 2]), PointN([4; 2]));

        // A naive implementation might say the shape is [-1, -1].
        assert_eq!(e1.intersection(&e2).shape, PointN([0; 2]));
        assert!(e1.intersection(&e2).is_empty());
    }

    #[test]
    fn union_bounds_both() {
        let e1 = Extent2d::from_min_and_shape(PointN([0.0, 0.0]), PointN([1.0, 1.0]));
        let e2 = Extent2d::from_min_and_shape(PointN([2.0, -1.0]), PointN([1.0, 1.0]));

        let u = e1.union(&e2);
        assert_eq!(u.minimum, PointN([0.0, -1.0]));
        assert_eq!(u.shape, PointN([3.0, 2.0]));
        assert!(!e1.intersects(&e2));
        assert!(e1.is_subset_of(&u));
    }

    #[test]
    fn touching_envelopes_do_not_intersect() {
        let e1 = Extent2d::from_min_and_shape(PointN([0.0, 0.0]), PointN([1.0, 1.0]));
        let e2 = Extent2d::from_min_and_shape(PointN([1.0, 0.0]), PointN([1.0, 1.0]));

        assert!(!e1.intersects(&e2));
        assert_eq!(e1.upper_left(), PointN([0.0, 1.0]));
    }
}
