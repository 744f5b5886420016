//! Decoding of one image file directory into pixels or numeric samples.
//!
//! The entry points are [`decode_image`] and [`decode_raster`]. Both take a
//! caller-built [`Directory`] describing one sub-image, the byte order of the
//! containing file, and a seekable source for the strip or tile data. The
//! directory and source are only read; nothing is cached between calls, so
//! concurrent decodes of different directories are independent.

use std::io::{Read, Seek};

use crate::directory::Directory;
use crate::error::{TiffError, TiffFormatError, TiffResult};
use crate::tags::{ByteOrder, Tag};

mod alpha;
mod params;
mod photometric;
mod planar;
mod predictor;
mod raster;
mod read;
mod region;
mod stream;

pub use self::alpha::AlphaInfo;
pub use self::params::DecodeParameters;
pub use self::photometric::{PhotometricStrategy, StrategyParams};
pub use self::raster::RasterFormat;
pub use self::read::ImageDataReader;
pub use self::region::Region;

use self::read::ImageDataLayout;

/// Decoding limits
#[derive(Clone, Debug)]
pub struct Limits {
    /// The maximum size of any decoded buffer in bytes, the default is
    /// 256MiB. With a sub-image request this bounds the sub-image, not the
    /// whole image.
    pub decoding_buffer_size: usize,
    /// Maximum size for intermediate per-chunk buffers, the default is
    /// 128MiB.
    pub intermediate_buffer_size: usize,
    /// The purpose of this is to prevent all the fields of the struct from
    /// being public, as this would make adding new fields a major version
    /// bump.
    _non_exhaustive: (),
}

impl Limits {
    /// A configuration that does not impose any limits.
    ///
    /// This is a good start if the caller only wants to impose selective limits, contrary to the
    /// default limits which allows selectively disabling limits.
    ///
    /// Note that this configuration is likely to crash on excessively large images since,
    /// naturally, the machine running the program does not have infinite memory.
    pub fn unlimited() -> Limits {
        Limits {
            decoding_buffer_size: usize::MAX,
            intermediate_buffer_size: usize::MAX,
            _non_exhaustive: (),
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            decoding_buffer_size: 256 * 1024 * 1024,
            intermediate_buffer_size: 128 * 1024 * 1024,
            _non_exhaustive: (),
        }
    }
}

/// Per-call decode configuration.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    sub_image: Option<Region>,
    custom_strategy: Option<PhotometricStrategy>,
    strict: bool,
    limits: Limits,
}

impl DecodeOptions {
    pub fn new() -> DecodeOptions {
        Default::default()
    }

    /// Decode only the given rectangle instead of the whole image.
    ///
    /// The rectangle must lie fully inside the raster; a request covering
    /// exactly the whole image decodes the same pixels as no request at all.
    pub fn with_sub_image(mut self, region: Region) -> DecodeOptions {
        self.sub_image = Some(region);
        self
    }

    /// Use the given strategy instead of selecting one from the photometric
    /// interpretation tag. No selection or color-map validation happens for
    /// a custom strategy.
    pub fn with_custom_strategy(mut self, strategy: PhotometricStrategy) -> DecodeOptions {
        self.custom_strategy = Some(strategy);
        self
    }

    /// Request strict handling. This setting is consumed by directory-parsing
    /// front-ends sharing this options type; the decode itself is always
    /// strict about the combinations it validates.
    pub fn with_strict(mut self, strict: bool) -> DecodeOptions {
        self.strict = strict;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> DecodeOptions {
        self.limits = limits;
        self
    }

    pub fn sub_image(&self) -> Option<Region> {
        self.sub_image
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

/// A decoded image: packed `0xAARRGGBB` pixels in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    has_alpha: bool,
    is_premultiplied: bool,
    data: Vec<u32>,
}

impl PixelBuffer {
    pub(crate) fn new(
        width: u32,
        height: u32,
        alpha: AlphaInfo,
        limits: &Limits,
    ) -> TiffResult<PixelBuffer> {
        let len = usize::try_from(width)?
            .checked_mul(usize::try_from(height)?)
            .ok_or(TiffError::IntSizeError)?;
        if len.checked_mul(4).ok_or(TiffError::IntSizeError)? > limits.decoding_buffer_size {
            return Err(TiffError::LimitsExceeded);
        }

        Ok(PixelBuffer {
            width,
            height,
            has_alpha: alpha.has_alpha,
            is_premultiplied: alpha.is_premultiplied,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn is_premultiplied(&self) -> bool {
        self.is_premultiplied
    }

    /// The packed pixels, row by row.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        self.data[y as usize * self.width as usize + x as usize] = value;
    }
}

/// The typed sample storage of a numeric raster.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterBuffer {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I16(Vec<i16>),
    I32(Vec<i32>),
}

/// A decoded numeric raster: samples in row-major order, interleaved when
/// there is more than one sample per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterData {
    width: u32,
    height: u32,
    samples_per_pixel: u16,
    pub(crate) buffer: RasterBuffer,
}

impl RasterData {
    pub(crate) fn new(
        width: u32,
        height: u32,
        samples_per_pixel: u16,
        format: RasterFormat,
        limits: &Limits,
    ) -> TiffResult<RasterData> {
        let len = usize::try_from(width)?
            .checked_mul(usize::try_from(height)?)
            .and_then(|n| n.checked_mul(usize::from(samples_per_pixel)))
            .ok_or(TiffError::IntSizeError)?;
        if len
            .checked_mul(format.byte_width())
            .ok_or(TiffError::IntSizeError)?
            > limits.decoding_buffer_size
        {
            return Err(TiffError::LimitsExceeded);
        }

        let buffer = match format {
            RasterFormat::Float32 => RasterBuffer::F32(vec![0.0; len]),
            RasterFormat::Float64 => RasterBuffer::F64(vec![0.0; len]),
            RasterFormat::Int16 => RasterBuffer::I16(vec![0; len]),
            RasterFormat::Int32 => RasterBuffer::I32(vec![0; len]),
        };

        Ok(RasterData {
            width,
            height,
            samples_per_pixel,
            buffer,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.samples_per_pixel
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> RasterBuffer {
        self.buffer
    }
}

fn image_dimensions(directory: &Directory) -> TiffResult<(u32, u32)> {
    let width = directory.get_tag_u32(Tag::ImageWidth)?;
    let height = directory.get_tag_u32(Tag::ImageLength)?;
    if width == 0 || height == 0 {
        return Err(TiffFormatError::InvalidDimensions(width, height).into());
    }
    Ok((width, height))
}

/// Decode the pixels of one directory.
///
/// The sequence is: resolve parameters, validate the requested sub-image,
/// resolve alpha, select (or accept) the photometric strategy, guard the
/// planar configuration, then hand everything to the data reader derived
/// from the directory's strip or tile layout. Every validation failure
/// aborts the call; there is no partial result.
pub fn decode_image<R: Read + Seek>(
    source: R,
    directory: &Directory,
    byte_order: ByteOrder,
    options: DecodeOptions,
) -> TiffResult<PixelBuffer> {
    let parameters = DecodeParameters::resolve(directory)?;
    let (width, height) = image_dimensions(directory)?;
    let region = region::normalize(options.sub_image, width, height)?;

    parameters.check_sample_count()?;

    let photometric_interpretation = parameters.photometric_interpretation.ok_or(
        TiffFormatError::RequiredTagNotFound(Tag::PhotometricInterpretation),
    )?;

    let alpha = alpha::resolve_alpha(
        directory,
        photometric_interpretation,
        parameters.samples_per_pixel,
    )?;

    let strategy = match options.custom_strategy {
        Some(strategy) => strategy,
        None => PhotometricStrategy::select(
            directory,
            photometric_interpretation,
            &parameters,
            width,
            height,
        )?,
    };

    planar::check_planar_configuration(
        directory,
        parameters.planar_configuration,
        photometric_interpretation,
    )?;

    let layout = ImageDataLayout::from_directory(directory, height)?;
    let mut reader = layout.data_reader(
        source,
        &strategy,
        &parameters,
        width,
        height,
        byte_order,
        None,
        options.limits,
    );

    reader.read_image_data(region, alpha)
}

/// Decode the numeric samples of one directory.
///
/// This is for files that carry measurements rather than colors, like
/// elevation models. The directory must declare a floating-point or signed
/// integer sample format; the photometric machinery is bypassed apart from a
/// placeholder strategy the shared reader interface wants.
pub fn decode_raster<R: Read + Seek>(
    source: R,
    directory: &Directory,
    byte_order: ByteOrder,
    options: DecodeOptions,
) -> TiffResult<RasterData> {
    let sample_format = raster::require_sample_format(directory)?;
    let parameters = DecodeParameters::resolve(directory)?;
    let (width, height) = image_dimensions(directory)?;
    let region = region::normalize(options.sub_image, width, height)?;

    parameters.check_sample_count()?;

    let format = raster::validate_raster_format(&sample_format, &parameters)?;

    // Numeric data has no photometric interpretation; the reader interface
    // still wants a strategy, so hand it a non-inverting bi-level one.
    let strategy = PhotometricStrategy::BiLevel {
        invert: false,
        params: StrategyParams {
            samples_per_pixel: parameters.samples_per_pixel,
            bits_per_sample: parameters.bits_per_sample.clone(),
            predictor: parameters.predictor,
            width,
            height,
        },
    };

    let layout = ImageDataLayout::from_directory(directory, height)?;
    let mut reader = layout.data_reader(
        source,
        &strategy,
        &parameters,
        width,
        height,
        byte_order,
        Some(format),
        options.limits,
    );

    reader.read_raster_data(region)
}
