//! The core data types for addressing tiled rasters:
//! - `PointN`: a 2-dimensional point, most importantly `Point2i` (grid positions, pixel shapes) and `Point2d` (positions in a
//!   coordinate reference system)
//! - `ExtentN`: a 2-dimensional extent, most importantly `Extent2i` (tile ranges) and `Extent2d` (envelopes)
//! - `Identifier`: case-insensitive names for resources, pyramids and mosaics
//! - `Crs`: the coordinate reference system tag carried by every pyramid

pub mod crs;
pub mod extent;
pub mod identifier;
pub mod point;

pub use crs::{Crs, CrsParseError};
pub use extent::{Extent2, Extent2d, Extent2i, ExtentN};
pub use identifier::{IdStr, Identifier};
pub use point::{
    ConstZero, Extent2PointIter, IntegerDiv, IterExtent, LatticeOrder, MapComponents, Ones, Point2,
    Point2d, Point2i, PointN,
};

pub mod prelude {
    pub use super::{
        ConstZero, Crs, Extent2, Extent2d, Extent2i, ExtentN, IdStr, Identifier, IntegerDiv, LatticeOrder,
        MapComponents, Ones, Point2, Point2d, Point2i, PointN,
    };
}
