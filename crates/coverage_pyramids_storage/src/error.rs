use crate::{ColorModel, SampleModel};

use coverage_pyramids_core::{Identifier, Point2i};

use thiserror::Error;

/// The two failure categories of the storage core. Neither is transient, so nothing is ever retried internally.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The caller addressed something that doesn't fit the structure: an unknown write target, an oversized tile, or raster
    /// metadata that contradicts what the resource already holds.
    StructuralMismatch,
    /// An explicit removal named something that isn't there.
    NotFound,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PyramidError {
    /// Raised by model removal and cloning when the pyramid id is unknown.
    #[error("pyramid {0} not found")]
    PyramidNotFound(Identifier),

    #[error("resource {0} not found")]
    ResourceNotFound(Identifier),

    /// A read or write addressed a pyramid that doesn't exist.
    #[error("pyramid {0} not found")]
    UnresolvedPyramid(Identifier),

    /// A read or write addressed a mosaic that doesn't exist.
    #[error("mosaic {mosaic} not found in pyramid {pyramid}")]
    UnresolvedMosaic {
        pyramid: Identifier,
        mosaic: Identifier,
    },

    #[error("{0} already exists")]
    AlreadyExists(Identifier),

    #[error("incorrect image size: tile is {tile_shape:?} but mosaic tiles are at most {max_shape:?}")]
    IncorrectTileSize {
        tile_shape: Point2i,
        max_shape: Point2i,
    },

    #[error("tile position {position:?} is outside of grid size {grid_size:?}")]
    TileOutOfGrid {
        position: Point2i,
        grid_size: Point2i,
    },

    #[error("color model mismatch: resource uses {expected:?} but got {found:?}")]
    ColorModelMismatch {
        expected: ColorModel,
        found: ColorModel,
    },

    #[error("sample model mismatch: resource uses {expected:?} but got {found:?}")]
    SampleModelMismatch {
        expected: SampleModel,
        found: SampleModel,
    },

    #[error("invalid sample buffer: {0}")]
    InvalidSampleBuffer(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

impl PyramidError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PyramidError::PyramidNotFound(_) | PyramidError::ResourceNotFound(_) => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::StructuralMismatch,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T, E = PyramidError> = std::result::Result<T, E>;
