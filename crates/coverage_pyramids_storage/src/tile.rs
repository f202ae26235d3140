//! Tile payloads: rectangular blocks of typed samples positioned within a mosaic grid.
//!
//! A `TilePayload` is immutable once constructed. Mosaics hold tiles as `Arc<TilePayload>`, so replacing a tile is a handle
//! swap and reading one is a reference count increment.
//!
//! Samples are stored pixel-interleaved: all bands of pixel `(0, 0)`, then all bands of pixel `(1, 0)`, and so on in
//! row-major order.
//!
//! ```
//! use coverage_pyramids_core::prelude::*;
//! use coverage_pyramids_storage::prelude::*;
//!
//! let tile = TilePayload::new(
//!     PointN([1, 2]),
//!     PointN([2, 2]),
//!     1,
//!     SampleBuffer::from(vec![0.5f32, 1.5, 2.5, 3.5]),
//! )
//! .unwrap();
//!
//! assert_eq!(tile.pixel_type(), PixelType::F32);
//! assert_eq!(tile.sample(PointN([1, 1]), 0), Some(3.5));
//! assert_eq!(tile.samples().as_bytes().len(), 16);
//! ```

use crate::{ColorModel, PyramidError, Result, SampleModel};

use coverage_pyramids_core::prelude::*;

use bytemuck::Pod;
use std::convert::TryFrom;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A shared handle to an immutable tile.
pub type TileRef = Arc<TilePayload>;

/// The numeric encoding of a single sample.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum PixelType {
    U8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl PixelType {
    pub fn size_in_bytes(&self) -> usize {
        match self {
            PixelType::U8 => 1,
            PixelType::U16 | PixelType::I16 => 2,
            PixelType::I32 | PixelType::F32 => 4,
            PixelType::F64 => 8,
        }
    }
}

/// A buffer of samples, all of one `PixelType`.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// A primitive that can be stored in a `SampleBuffer`.
pub trait Sample: Pod {
    const PIXEL_TYPE: PixelType;

    fn into_buffer(samples: Vec<Self>) -> SampleBuffer;

    fn view(buffer: &SampleBuffer) -> Option<&[Self]>;
}

macro_rules! impl_sample {
    ($t:ty, $variant:ident) => {
        impl Sample for $t {
            const PIXEL_TYPE: PixelType = PixelType::$variant;

            #[inline]
            fn into_buffer(samples: Vec<Self>) -> SampleBuffer {
                SampleBuffer::$variant(samples)
            }

            #[inline]
            fn view(buffer: &SampleBuffer) -> Option<&[Self]> {
                match buffer {
                    SampleBuffer::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }

        impl From<Vec<$t>> for SampleBuffer {
            #[inline]
            fn from(samples: Vec<$t>) -> Self {
                SampleBuffer::$variant(samples)
            }
        }
    };
}

impl_sample!(u8, U8);
impl_sample!(u16, U16);
impl_sample!(i16, I16);
impl_sample!(i32, I32);
impl_sample!(f32, F32);
impl_sample!(f64, F64);

macro_rules! for_each_variant {
    ($buffer:expr, $s:ident => $body:expr) => {
        match $buffer {
            SampleBuffer::U8($s) => $body,
            SampleBuffer::U16($s) => $body,
            SampleBuffer::I16($s) => $body,
            SampleBuffer::I32($s) => $body,
            SampleBuffer::F32($s) => $body,
            SampleBuffer::F64($s) => $body,
        }
    };
}

impl SampleBuffer {
    /// `len` copies of `value`.
    pub fn filled<T: Sample>(len: usize, value: T) -> Self {
        T::into_buffer(vec![value; len])
    }

    /// Copies native-endian `bytes` into a buffer of `pixel_type` samples.
    pub fn from_bytes(pixel_type: PixelType, bytes: &[u8]) -> Result<Self> {
        let size = pixel_type.size_in_bytes();
        if bytes.len() % size != 0 {
            return Err(PyramidError::InvalidSampleBuffer(format!(
                "{} bytes is not a whole number of {:?} samples",
                bytes.len(),
                pixel_type
            )));
        }

        Ok(match pixel_type {
            PixelType::U8 => SampleBuffer::U8(bytes.to_vec()),
            PixelType::U16 => SampleBuffer::U16(bytemuck::pod_collect_to_vec(bytes)),
            PixelType::I16 => SampleBuffer::I16(bytemuck::pod_collect_to_vec(bytes)),
            PixelType::I32 => SampleBuffer::I32(bytemuck::pod_collect_to_vec(bytes)),
            PixelType::F32 => SampleBuffer::F32(bytemuck::pod_collect_to_vec(bytes)),
            PixelType::F64 => SampleBuffer::F64(bytemuck::pod_collect_to_vec(bytes)),
        })
    }

    pub fn pixel_type(&self) -> PixelType {
        match self {
            SampleBuffer::U8(_) => PixelType::U8,
            SampleBuffer::U16(_) => PixelType::U16,
            SampleBuffer::I16(_) => PixelType::I16,
            SampleBuffer::I32(_) => PixelType::I32,
            SampleBuffer::F32(_) => PixelType::F32,
            SampleBuffer::F64(_) => PixelType::F64,
        }
    }

    /// The number of samples (not bytes).
    pub fn len(&self) -> usize {
        for_each_variant!(self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The samples viewed as native-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        for_each_variant!(self, s => bytemuck::cast_slice(s.as_slice()))
    }

    /// Borrow the samples as a slice of `T`, if that is the stored type.
    pub fn as_slice<T: Sample>(&self) -> Option<&[T]> {
        T::view(self)
    }

    /// The sample at `index`, widened to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        for_each_variant!(self, s => s.get(index).map(|&v| v as f64))
    }
}

/// The number of interleaved samples in a tile of `shape` with `bands` bands.
fn sample_count(shape: Point2i, bands: u16) -> Result<usize> {
    if !shape.is_positive() || bands == 0 {
        return Err(PyramidError::InvalidSampleBuffer(format!(
            "tile shape {:?} with {} bands has no samples",
            shape, bands
        )));
    }

    usize::try_from(shape.volume())
        .ok()
        .and_then(|pixels| pixels.checked_mul(usize::from(bands)))
        .ok_or_else(|| {
            PyramidError::InvalidSampleBuffer(format!(
                "tile shape {:?} with {} bands overflows the sample count",
                shape, bands
            ))
        })
}

/// A rectangular block of samples at a grid position within a mosaic.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePayload {
    position: Point2i,
    shape: Point2i,
    bands: u16,
    samples: SampleBuffer,
    color_model: Option<ColorModel>,
}

impl TilePayload {
    /// Construct a tile at grid `position` holding `shape.x() * shape.y() * bands` interleaved samples.
    pub fn new(position: Point2i, shape: Point2i, bands: u16, samples: SampleBuffer) -> Result<Self> {
        let expected = sample_count(shape, bands)?;
        if samples.len() != expected {
            return Err(PyramidError::InvalidSampleBuffer(format!(
                "expected {} samples for shape {:?} with {} bands, got {}",
                expected,
                shape,
                bands,
                samples.len()
            )));
        }

        Ok(Self {
            position,
            shape,
            bands,
            samples,
            color_model: None,
        })
    }

    /// A tile where every sample is `value`.
    pub fn filled<T: Sample>(position: Point2i, shape: Point2i, bands: u16, value: T) -> Result<Self> {
        let len = sample_count(shape, bands)?;

        Self::new(position, shape, bands, SampleBuffer::filled(len, value))
    }

    /// Construct a tile from native-endian bytes.
    pub fn from_bytes(
        position: Point2i,
        shape: Point2i,
        bands: u16,
        pixel_type: PixelType,
        bytes: &[u8],
    ) -> Result<Self> {
        Self::new(position, shape, bands, SampleBuffer::from_bytes(pixel_type, bytes)?)
    }

    /// Declare the color model of the producer that rendered this tile.
    pub fn with_color_model(mut self, color_model: ColorModel) -> Self {
        self.color_model = Some(color_model);
        self
    }

    /// The (column, row) of this tile within its mosaic.
    #[inline]
    pub fn position(&self) -> Point2i {
        self.position
    }

    #[inline]
    pub fn column(&self) -> i32 {
        self.position.x()
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.position.y()
    }

    /// The (width, height) in pixels.
    #[inline]
    pub fn shape(&self) -> Point2i {
        self.shape
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.shape.x()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.shape.y()
    }

    #[inline]
    pub fn bands(&self) -> u16 {
        self.bands
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.samples.pixel_type()
    }

    #[inline]
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    #[inline]
    pub fn color_model(&self) -> Option<&ColorModel> {
        self.color_model.as_ref()
    }

    pub fn sample_model(&self) -> SampleModel {
        SampleModel {
            pixel_type: self.pixel_type(),
            bands: self.bands,
        }
    }

    /// The pixels of this tile in tile-local coordinates.
    pub fn pixel_extent(&self) -> Extent2i {
        Extent2i::from_min_and_shape(Point2i::ZERO, self.shape)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.samples.as_bytes().len()
    }

    /// The value of `band` at tile-local `pixel`, widened to `f64`.
    pub fn sample(&self, pixel: Point2i, band: u16) -> Option<f64> {
        if !self.pixel_extent().contains(pixel) || band >= self.bands {
            return None;
        }
        let pixel_index = pixel.y() as usize * self.shape.x() as usize + pixel.x() as usize;

        self.samples
            .get_f64(pixel_index * self.bands as usize + band as usize)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
