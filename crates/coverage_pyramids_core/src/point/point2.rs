use super::{point_traits::*, PointN};

use core::ops::{Add, Div, Mul, Range, Sub};
use itertools::{iproduct, Product};
use num::Integer;
use std::cmp::Ordering;

/// A 2-dimensional point with scalar type `T`.
pub type Point2<T> = PointN<[T; 2]>;
/// A 2-dimensional point with scalar type `i32`. Used for grid positions, grid sizes and pixel shapes.
pub type Point2i = PointN<[i32; 2]>;
/// A 2-dimensional point with scalar type `f64`. Used for positions and scales in a coordinate reference system.
pub type Point2d = PointN<[f64; 2]>;

impl<T> Point2<T>
where
    T: Copy,
{
    #[inline]
    pub fn fill(value: T) -> Self {
        PointN([value; 2])
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }
}

impl Point2i {
    /// The product of the components. For a grid size, this is the number of slots. Widened so it cannot overflow.
    #[inline]
    pub fn volume(&self) -> i64 {
        i64::from(self.x()) * i64::from(self.y())
    }

    /// Component-wise product, or `None` if any component overflows.
    #[inline]
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Some(PointN([
            self.x().checked_mul(rhs.x())?,
            self.y().checked_mul(rhs.y())?,
        ]))
    }

    /// Returns `true` iff all components are strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.x() > 0 && self.y() > 0
    }
}

impl Point2d {
    #[inline]
    pub fn floor(&self) -> Self {
        self.map_components_unary(f64::floor)
    }

    #[inline]
    pub fn ceil(&self) -> Self {
        self.map_components_unary(f64::ceil)
    }

    /// Truncating cast of each component.
    #[inline]
    pub fn as_2i(&self) -> Point2i {
        PointN([self.x() as i32, self.y() as i32])
    }

    /// The integer cell containing this point.
    #[inline]
    pub fn in_cell(&self) -> Point2i {
        self.floor().as_2i()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Returns `true` iff any component is NaN.
    #[inline]
    pub fn has_nan(&self) -> bool {
        self.x().is_nan() || self.y().is_nan()
    }

    /// Returns `true` iff all components are finite and strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.is_finite() && self.x() > 0.0 && self.y() > 0.0
    }
}

impl From<Point2i> for Point2d {
    #[inline]
    fn from(p: Point2i) -> Self {
        PointN([p.x() as f64, p.y() as f64])
    }
}

impl<T> MapComponents for Point2<T>
where
    T: Copy,
{
    type Scalar = T;

    #[inline]
    fn map_components_unary(&self, f: impl Fn(Self::Scalar) -> Self::Scalar) -> Self {
        PointN([f(self.x()), f(self.y())])
    }

    #[inline]
    fn map_components_binary(
        &self,
        other: &Self,
        f: impl Fn(Self::Scalar, Self::Scalar) -> Self::Scalar,
    ) -> Self {
        PointN([f(self.x(), other.x()), f(self.y(), other.y())])
    }
}

impl ConstZero for Point2i {
    const ZERO: Self = PointN([0; 2]);
}

impl ConstZero for Point2d {
    const ZERO: Self = PointN([0.0; 2]);
}

impl Ones for Point2i {
    const ONES: Self = PointN([1; 2]);
}

impl Ones for Point2d {
    const ONES: Self = PointN([1.0; 2]);
}

impl LatticeOrder for Point2i {
    #[inline]
    fn join(&self, other: &Self) -> Self {
        self.map_components_binary(other, i32::max)
    }

    #[inline]
    fn meet(&self, other: &Self) -> Self {
        self.map_components_binary(other, i32::min)
    }
}

impl LatticeOrder for Point2d {
    #[inline]
    fn join(&self, other: &Self) -> Self {
        self.map_components_binary(other, f64::max)
    }

    #[inline]
    fn meet(&self, other: &Self) -> Self {
        self.map_components_binary(other, f64::min)
    }
}

impl IntegerDiv for Point2i {
    #[inline]
    fn vector_div_floor(&self, rhs: &Self) -> Self {
        self.map_components_binary(rhs, |c1, c2| Integer::div_floor(&c1, &c2))
    }

    #[inline]
    fn scalar_div_floor(&self, rhs: i32) -> Self {
        self.map_components_unary(|c| Integer::div_floor(&c, &rhs))
    }

    #[inline]
    fn scalar_div_ceil(&self, rhs: i32) -> Self {
        self.map_components_unary(|c| Integer::div_ceil(&c, &rhs))
    }
}

impl<T> Add for Point2<T>
where
    T: Copy + Add<Output = T>,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 + c2)
    }
}

impl<T> Sub for Point2<T>
where
    T: Copy + Sub<Output = T>,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 - c2)
    }
}

macro_rules! impl_mul_ops {
    ($t:ty, $scalar:ty) => {
        impl Mul<$scalar> for $t {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self {
                self.map_components_unary(|c| rhs * c)
            }
        }

        impl Mul<$t> for $scalar {
            type Output = $t;

            #[inline]
            fn mul(self, rhs: $t) -> $t {
                rhs * self
            }
        }

        impl Mul<Self> for $t {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.map_components_binary(&rhs, |c1, c2| c1 * c2)
            }
        }
    };
}

impl_mul_ops!(Point2i, i32);
impl_mul_ops!(Point2d, f64);

// Use specialized implementation for integers because the default Div impl rounds towards zero,
// which is not what we want.
impl Div<i32> for Point2i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        self.scalar_div_floor(rhs)
    }
}

impl Div<Point2i> for Point2i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Point2i) -> Self {
        self.vector_div_floor(&rhs)
    }
}

impl Div<f64> for Point2d {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        self.map_components_unary(|c| c / rhs)
    }
}

impl Div<Self> for Point2d {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.map_components_binary(&rhs, |c1, c2| c1 / c2)
    }
}

// This particular partial order allows us to say that an `Extent2i` e contains a `Point2i` p iff p
// is GEQ the minimum of e and p is LT the least upper bound of e.
impl<T> PartialOrd for Point2<T>
where
    T: Copy + PartialOrd,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self < other {
            Some(Ordering::Less)
        } else if self > other {
            Some(Ordering::Greater)
        } else if self.x() == other.x() && self.y() == other.y() {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y()
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y()
    }

    #[inline]
    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y()
    }

    #[inline]
    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y()
    }
}

/// An iterator over all points in an `Extent2i`, in row-major order.
pub struct Extent2PointIter<T>
where
    Range<T>: Iterator<Item = T>,
{
    product_iter: Product<Range<T>, Range<T>>,
}

impl<T> Iterator for Extent2PointIter<T>
where
    T: Clone,
    Range<T>: Iterator<Item = T>,
{
    type Item = Point2<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.product_iter.next().map(|(y, x)| PointN([x, y]))
    }
}

impl IterExtent for Point2i {
    type PointIter = Extent2PointIter<i32>;

    #[inline]
    fn iter_extent(min: &Point2i, lub: &Point2i) -> Self::PointIter {
        Extent2PointIter {
            // iproduct is opposite of row-major order.
            product_iter: iproduct!(min.y()..lub.y(), min.x()..lub.x()),
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
