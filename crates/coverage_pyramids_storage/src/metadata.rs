//! Raster metadata shared by every tile of a resource.
//!
//! The color model and sample model are established once, usually by the first tile written, and every later tile must
//! agree with them. Sample dimensions are descriptive and never validated.

use crate::{sync, PixelType, PyramidError, Result, TilePayload};

use std::sync::RwLock;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes one band: its name, valid numeric range, and the values that mean "no data".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SampleDimension {
    pub name: String,
    pub range: (f64, f64),
    pub no_data: Vec<f64>,
}

impl SampleDimension {
    pub fn new(name: impl Into<String>, range: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            range,
            no_data: Vec::new(),
        }
    }

    pub fn with_no_data(mut self, value: f64) -> Self {
        self.no_data.push(value);
        self
    }
}

/// How sample values map to colors.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ColorModel {
    Gray,
    Rgb,
    Rgba,
    /// Single-band samples indexing into an RGBA palette.
    Indexed { palette: Vec<[u8; 4]> },
}

/// The sample layout every tile of a resource must share.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SampleModel {
    pub pixel_type: PixelType,
    pub bands: u16,
}

#[derive(Default)]
struct MetadataState {
    sample_dimensions: Vec<SampleDimension>,
    color_model: Option<ColorModel>,
    sample_model: Option<SampleModel>,
}

/// The shared, read-mostly metadata cell of a `Resource`. Its mosaics hold a handle to it so that tile writes can enforce a
/// single color model and sample model across the whole resource.
#[derive(Default)]
pub struct RasterMetadata {
    state: RwLock<MetadataState>,
}

impl RasterMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_dimensions(&self) -> Vec<SampleDimension> {
        sync::read(&self.state).sample_dimensions.clone()
    }

    pub fn set_sample_dimensions(&self, dimensions: Vec<SampleDimension>) {
        sync::write(&self.state).sample_dimensions = dimensions;
    }

    pub fn color_model(&self) -> Option<ColorModel> {
        sync::read(&self.state).color_model.clone()
    }

    /// Establish the color model. Setting the model that is already set does nothing; setting a different one fails with
    /// `ColorModelMismatch` and leaves the current model in place.
    pub fn set_color_model(&self, color_model: ColorModel) -> Result<()> {
        let mut state = sync::write(&self.state);
        check_color_model(state.color_model.as_ref(), &color_model)?;
        state.color_model = Some(color_model);

        Ok(())
    }

    pub fn sample_model(&self) -> Option<SampleModel> {
        sync::read(&self.state).sample_model
    }

    /// Establish the sample model, with the same single-assignment rule as `set_color_model`.
    pub fn set_sample_model(&self, sample_model: SampleModel) -> Result<()> {
        let mut state = sync::write(&self.state);
        check_sample_model(state.sample_model.as_ref(), &sample_model)?;
        state.sample_model = Some(sample_model);

        Ok(())
    }

    /// Check `tile` against the established models and adopt whichever of its models are not established yet. Either
    /// everything is adopted or nothing is.
    pub(crate) fn admit_tile(&self, tile: &TilePayload) -> Result<()> {
        let tile_sample_model = tile.sample_model();

        {
            let state = sync::read(&self.state);
            check_tile(&state, tile, &tile_sample_model)?;
            let color_settled = tile.color_model().is_none() || state.color_model.is_some();
            if color_settled && state.sample_model.is_some() {
                return Ok(());
            }
        }

        // Another writer may have established the models since we released the read lock.
        let mut state = sync::write(&self.state);
        check_tile(&state, tile, &tile_sample_model)?;
        if state.sample_model.is_none() {
            state.sample_model = Some(tile_sample_model);
        }
        if state.color_model.is_none() {
            state.color_model = tile.color_model().cloned();
        }

        Ok(())
    }
}

fn check_tile(state: &MetadataState, tile: &TilePayload, sample_model: &SampleModel) -> Result<()> {
    let result = check_sample_model(state.sample_model.as_ref(), sample_model).and_then(|()| {
        tile.color_model().map_or(Ok(()), |color_model| {
            check_color_model(state.color_model.as_ref(), color_model)
        })
    });
    if let Err(e) = &result {
        warn!(position = ?tile.position(), "rejected tile: {}", e);
    }

    result
}

fn check_color_model(current: Option<&ColorModel>, incoming: &ColorModel) -> Result<()> {
    match current {
        Some(expected) if expected != incoming => Err(PyramidError::ColorModelMismatch {
            expected: expected.clone(),
            found: incoming.clone(),
        }),
        _ => Ok(()),
    }
}

fn check_sample_model(current: Option<&SampleModel>, incoming: &SampleModel) -> Result<()> {
    match current {
        Some(expected) if expected != incoming => Err(PyramidError::SampleModelMismatch {
            expected: *expected,
            found: *incoming,
        }),
        _ => Ok(()),
    }
}
