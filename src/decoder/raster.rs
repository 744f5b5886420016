//! Validation of the numeric (non-pixel) raster formats.

use crate::directory::Directory;
use crate::error::{TiffFormatError, TiffResult, TiffUnsupportedError};
use crate::tags::{Predictor, SampleFormat, Tag};

use super::params::DecodeParameters;

/// The sample types a numeric raster can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Float32,
    Float64,
    Int16,
    Int32,
}

impl RasterFormat {
    pub const fn byte_width(self) -> usize {
        match self {
            RasterFormat::Float32 => 4,
            RasterFormat::Float64 => 8,
            RasterFormat::Int16 => 2,
            RasterFormat::Int32 => 4,
        }
    }
}

/// A raster decode needs an explicit, non-empty sample-format field; a
/// directory without one describes pixels, not numeric data.
pub(crate) fn require_sample_format(directory: &Directory) -> TiffResult<Vec<u16>> {
    let values = directory
        .find_tag(Tag::SampleFormat)
        .ok_or(TiffFormatError::RequiredTagNotFound(Tag::SampleFormat))?
        .clone()
        .into_u16_vec()?;

    if values.is_empty() {
        return Err(TiffFormatError::RequiredTagEmpty(Tag::SampleFormat).into());
    }

    Ok(values)
}

/// Check sample format against bit depth and predictor, and name the
/// in-memory raster type the combination decodes to.
///
/// Floating-point data must be 32- or 64-bit and may only carry the
/// floating-point predictor; signed integer data must be a single 16- or
/// 32-bit sample per pixel and may only carry horizontal differencing.
/// Unsigned and void sample formats have no raster representation.
pub(crate) fn validate_raster_format(
    sample_format: &[u16],
    parameters: &DecodeParameters,
) -> TiffResult<RasterFormat> {
    match SampleFormat::from_u16_exhaustive(sample_format[0]) {
        SampleFormat::IEEEFP => {
            let bits = parameters.bits_per_sample.first().copied().unwrap_or(1);
            let format = match bits {
                32 => RasterFormat::Float32,
                64 => RasterFormat::Float64,
                other => {
                    return Err(TiffUnsupportedError::FloatingPointBitsPerSample(other).into())
                }
            };

            match parameters.predictor {
                None | Some(Predictor::None) | Some(Predictor::FloatingPoint) => {}
                Some(predictor) => {
                    return Err(TiffUnsupportedError::FloatingPointPredictor(predictor).into())
                }
            }

            Ok(format)
        }
        SampleFormat::Int => {
            if parameters.samples_per_pixel != 1 {
                return Err(
                    TiffUnsupportedError::IntegerSampleCount(parameters.samples_per_pixel).into(),
                );
            }

            let format = match parameters.bits_per_pixel {
                16 => RasterFormat::Int16,
                32 => RasterFormat::Int32,
                other => return Err(TiffUnsupportedError::IntegerBitsPerPixel(other).into()),
            };

            match parameters.predictor {
                None | Some(Predictor::None) | Some(Predictor::Horizontal) => {}
                Some(predictor) => {
                    return Err(TiffUnsupportedError::IntegerPredictor(predictor).into())
                }
            }

            Ok(format)
        }
        format => Err(TiffUnsupportedError::UnsupportedRasterFormat(format).into()),
    }
}
