//! Mapping of the photometric interpretation code to a pixel-decoding
//! strategy.

use crate::directory::Directory;
use crate::error::{TiffError, TiffFormatError, TiffResult, TiffUnsupportedError};
use crate::tags::{PhotometricInterpretation, Predictor, Tag};

use super::params::DecodeParameters;

/// The sample geometry every strategy carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub samples_per_pixel: u16,
    pub bits_per_sample: Vec<u16>,
    pub predictor: Option<Predictor>,
    pub width: u32,
    pub height: u32,
}

/// How sample values of one pixel turn into color.
///
/// This is a closed set: every photometric interpretation the decoder accepts
/// maps to exactly one variant, and an unlisted interpretation code fails
/// selection instead of falling back to a default.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotometricStrategy {
    /// Grayscale, including bi-level. `invert` is set for white-is-zero data.
    BiLevel {
        invert: bool,
        params: StrategyParams,
    },
    /// Palette-indexed color with a `3 * 2^bits` color map (all reds, then
    /// all greens, then all blues, 16 bits per component).
    Palette {
        color_map: Vec<u16>,
        params: StrategyParams,
    },
    Rgb(StrategyParams),
    Cmyk(StrategyParams),
    YCbCr(StrategyParams),
    CieLab(StrategyParams),
    LogLuv(StrategyParams),
}

impl PhotometricStrategy {
    pub fn params(&self) -> &StrategyParams {
        match self {
            PhotometricStrategy::BiLevel { params, .. }
            | PhotometricStrategy::Palette { params, .. }
            | PhotometricStrategy::Rgb(params)
            | PhotometricStrategy::Cmyk(params)
            | PhotometricStrategy::YCbCr(params)
            | PhotometricStrategy::CieLab(params)
            | PhotometricStrategy::LogLuv(params) => params,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            PhotometricStrategy::BiLevel { .. } => "bi-level",
            PhotometricStrategy::Palette { .. } => "palette",
            PhotometricStrategy::Rgb(_) => "RGB",
            PhotometricStrategy::Cmyk(_) => "CMYK",
            PhotometricStrategy::YCbCr(_) => "YCbCr",
            PhotometricStrategy::CieLab(_) => "CIE L*a*b*",
            PhotometricStrategy::LogLuv(_) => "LogLuv",
        }
    }

    /// Select the strategy for an interpretation code.
    ///
    /// Palette images additionally need a color-map field whose length
    /// matches the pixel depth; everything else is fully described by the
    /// code itself.
    pub fn select(
        directory: &Directory,
        photometric_interpretation: u16,
        parameters: &DecodeParameters,
        width: u32,
        height: u32,
    ) -> TiffResult<PhotometricStrategy> {
        let params = StrategyParams {
            samples_per_pixel: parameters.samples_per_pixel,
            bits_per_sample: parameters.bits_per_sample.clone(),
            predictor: parameters.predictor,
            width,
            height,
        };

        let interpretation = PhotometricInterpretation::from_u16(photometric_interpretation)
            .ok_or(TiffUnsupportedError::UnknownInterpretation(
                photometric_interpretation,
            ))?;

        match interpretation {
            PhotometricInterpretation::WhiteIsZero | PhotometricInterpretation::BlackIsZero => {
                Ok(PhotometricStrategy::BiLevel {
                    invert: interpretation == PhotometricInterpretation::WhiteIsZero,
                    params,
                })
            }
            PhotometricInterpretation::RGB => Ok(PhotometricStrategy::Rgb(params)),
            PhotometricInterpretation::RGBPalette => {
                let color_map = directory.get_tag_u16_vec(Tag::ColorMap)?;
                let expected = 1usize
                    .checked_shl(parameters.bits_per_pixel)
                    .and_then(|entries| entries.checked_mul(3))
                    .ok_or(TiffError::IntSizeError)?;
                if color_map.len() != expected {
                    return Err(TiffFormatError::InvalidColorMap {
                        len: color_map.len(),
                        expected,
                    }
                    .into());
                }
                Ok(PhotometricStrategy::Palette { color_map, params })
            }
            PhotometricInterpretation::CMYK => Ok(PhotometricStrategy::Cmyk(params)),
            PhotometricInterpretation::YCbCr => Ok(PhotometricStrategy::YCbCr(params)),
            PhotometricInterpretation::CIELab => Ok(PhotometricStrategy::CieLab(params)),
            PhotometricInterpretation::LogL | PhotometricInterpretation::LogLuv => {
                Ok(PhotometricStrategy::LogLuv(params))
            }
            PhotometricInterpretation::TransparencyMask
            | PhotometricInterpretation::IccLab
            | PhotometricInterpretation::ItuLab => Err(
                TiffUnsupportedError::UnknownInterpretation(photometric_interpretation).into(),
            ),
        }
    }
}
