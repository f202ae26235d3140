/// Applies functions to every component of a point.
pub trait MapComponents {
    type Scalar;

    /// Returns the point after applying `f` component-wise.
    fn map_components_unary(&self, f: impl Fn(Self::Scalar) -> Self::Scalar) -> Self;

    /// Returns the point after applying `f` component-wise to both `self` and `other` in parallel.
    fn map_components_binary(
        &self,
        other: &Self,
        f: impl Fn(Self::Scalar, Self::Scalar) -> Self::Scalar,
    ) -> Self;
}

// `num::Zero` doesn't allow associated constants because of bignums.
pub trait ConstZero: Copy {
    const ZERO: Self;
}

pub trait Ones: Copy {
    /// A point of all ones.
    const ONES: Self;
}

pub trait LatticeOrder {
    /// Component-wise maximum.
    fn join(&self, other: &Self) -> Self;

    /// Component-wise minimum.
    fn meet(&self, other: &Self) -> Self;
}

/// Division of integer points that rounds in a chosen direction instead of towards zero.
pub trait IntegerDiv {
    fn vector_div_floor(&self, rhs: &Self) -> Self;

    fn scalar_div_floor(&self, rhs: i32) -> Self;

    fn scalar_div_ceil(&self, rhs: i32) -> Self;
}

/// Iterates over the points of a half-open box in row-major order.
pub trait IterExtent {
    type PointIter: Iterator<Item = Self>;

    fn iter_extent(min: &Self, lub: &Self) -> Self::PointIter;
}
