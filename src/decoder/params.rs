//! Resolution of the scalar decode parameters of one directory.

use crate::directory::Directory;
use crate::error::{TiffFormatError, TiffResult};
use crate::tags::{CompressionMethod, PlanarConfiguration, Predictor, Tag};

/// The tag values that steer a decode, with defaults applied for the
/// optional ones.
///
/// Built once per decode call and never mutated afterwards. Resolution itself
/// does not fail for absent tags, only for tags that are present with a
/// malformed value.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeParameters {
    /// Samples per pixel; 1 when the tag is absent.
    pub samples_per_pixel: u16,
    /// One bit count per sample; `[1]` when the tag is absent.
    pub bits_per_sample: Vec<u16>,
    /// Total bits per pixel, i.e. the scalar value or the sum over the
    /// bits-per-sample array.
    pub bits_per_pixel: u32,
    /// `None` when no predictor tag is present.
    pub predictor: Option<Predictor>,
    /// Defaults to no compression; unknown codes are carried through opaquely
    /// and are only rejected by the data reader that has to decompress them.
    pub compression: CompressionMethod,
    /// Defaults to interleaved storage, leniently so for unrecognized values.
    pub planar_configuration: PlanarConfiguration,
    /// Raw photometric interpretation code; `None` when the tag is absent.
    /// Only the pixel-decode path requires it.
    pub photometric_interpretation: Option<u16>,
}

impl DecodeParameters {
    pub fn resolve(directory: &Directory) -> TiffResult<DecodeParameters> {
        let samples_per_pixel = directory.find_tag_u16(Tag::SamplesPerPixel)?.unwrap_or(1);

        let (bits_per_sample, bits_per_pixel) = match directory.find_tag(Tag::BitsPerSample) {
            Some(value) => (
                value.clone().into_u16_vec()?,
                value.clone().into_sum_u32()?,
            ),
            None => (vec![1], u32::from(samples_per_pixel)),
        };

        let predictor = directory
            .find_tag_u16(Tag::Predictor)?
            .map(|code| {
                Predictor::from_u16(code).ok_or(TiffFormatError::UnknownPredictor(code))
            })
            .transpose()?;

        let compression = directory
            .find_tag_u16(Tag::Compression)?
            .map(CompressionMethod::from_u16_exhaustive)
            .unwrap_or(CompressionMethod::None);

        let planar_configuration = directory
            .find_tag_u16(Tag::PlanarConfiguration)?
            .map(PlanarConfiguration::from_u16_lenient)
            .unwrap_or(PlanarConfiguration::Chunky);

        let photometric_interpretation =
            directory.find_tag_u16(Tag::PhotometricInterpretation)?;

        Ok(DecodeParameters {
            samples_per_pixel,
            bits_per_sample,
            bits_per_pixel,
            predictor,
            compression,
            planar_configuration,
            photometric_interpretation,
        })
    }

    /// The bits-per-sample array must carry exactly one entry per sample.
    pub fn check_sample_count(&self) -> TiffResult<()> {
        if usize::from(self.samples_per_pixel) != self.bits_per_sample.len() {
            return Err(TiffFormatError::SampleCountMismatch {
                samples_per_pixel: self.samples_per_pixel,
                bits_per_sample: self.bits_per_sample.len(),
            }
            .into());
        }
        Ok(())
    }
}
