use std::error::Error;
use std::fmt;
use std::io;
use std::num::TryFromIntError;

use crate::ifd::Value;
use crate::tags::{CompressionMethod, Predictor, SampleFormat, Tag};

/// Tiff error kinds.
#[derive(Debug)]
#[non_exhaustive]
pub enum TiffError {
    /// The directory is not formatted properly.
    FormatError(TiffFormatError),

    /// The decoder does not support features required by the directory.
    UnsupportedError(TiffUnsupportedError),

    /// An I/O Error occurred while reading image data.
    IoError(io::Error),

    /// The decoder limits were exceeded.
    LimitsExceeded,

    /// An integer conversion to or from a platform size failed.
    IntSizeError,
}

/// The directory data is malformed.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TiffFormatError {
    RequiredTagNotFound(Tag),
    RequiredTagEmpty(Tag),
    InvalidTagValueType(Tag),
    UnsignedIntegerExpected(Value),
    SignedIntegerExpected(Value),
    NumericExpected(Value),
    InvalidDimensions(u32, u32),
    SampleCountMismatch {
        samples_per_pixel: u16,
        bits_per_sample: usize,
    },
    InvalidColorMap {
        len: usize,
        expected: usize,
    },
    InvalidRegion(RegionError),
    UnknownPredictor(u16),
    InconsistentSizesEncountered,
    ChunkLayoutNotFound,
}

impl fmt::Display for TiffFormatError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use self::TiffFormatError::*;
        match *self {
            RequiredTagNotFound(ref tag) => write!(fmt, "Required tag `{tag:?}` not found."),
            RequiredTagEmpty(ref tag) => write!(fmt, "Required tag `{tag:?}` has no values."),
            InvalidTagValueType(ref tag) => {
                write!(fmt, "Tag `{tag:?}` did not have the expected value type.")
            }
            UnsignedIntegerExpected(ref val) => {
                write!(fmt, "Expected unsigned integer, {val:?} found.")
            }
            SignedIntegerExpected(ref val) => {
                write!(fmt, "Expected signed integer, {val:?} found.")
            }
            NumericExpected(ref val) => write!(fmt, "Expected numeric value, {val:?} found."),
            InvalidDimensions(width, height) => {
                write!(fmt, "Invalid dimensions: {width}x{height}.")
            }
            SampleCountMismatch {
                samples_per_pixel,
                bits_per_sample,
            } => write!(
                fmt,
                "Samples per pixel ({samples_per_pixel}) does not match the \
                 bits-per-sample count ({bits_per_sample})."
            ),
            InvalidColorMap { len, expected } => write!(
                fmt,
                "Color map length ({len}) does not match the expected length ({expected})."
            ),
            InvalidRegion(ref err) => write!(fmt, "Invalid sub-image: {err}"),
            UnknownPredictor(ref predictor) => {
                write!(fmt, "Unknown predictor “{predictor}” encountered")
            }
            InconsistentSizesEncountered => write!(fmt, "Inconsistent sizes encountered."),
            ChunkLayoutNotFound => write!(fmt, "Neither strip nor tile offsets were found."),
        }
    }
}

/// A requested sub-image does not describe a rectangle inside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    ZeroWidth,
    ZeroHeight,
    XOutsideRaster,
    XPlusWidthOutsideRaster,
    YOutsideRaster,
    YPlusHeightOutsideRaster,
}

impl fmt::Display for RegionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            RegionError::ZeroWidth => write!(fmt, "zero sub-image width"),
            RegionError::ZeroHeight => write!(fmt, "zero sub-image height"),
            RegionError::XOutsideRaster => write!(fmt, "sub-image x is outside the raster"),
            RegionError::XPlusWidthOutsideRaster => {
                write!(fmt, "sub-image (x + width) is outside the raster")
            }
            RegionError::YOutsideRaster => write!(fmt, "sub-image y is outside the raster"),
            RegionError::YPlusHeightOutsideRaster => {
                write!(fmt, "sub-image (y + height) is outside the raster")
            }
        }
    }
}

/// The directory makes use of features that are not supported.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TiffUnsupportedError {
    UnknownInterpretation(u16),
    UnsupportedCompressionMethod(CompressionMethod),
    PlanarInterpretation(u16),
    PlanarTiles,
    UnsupportedRasterFormat(SampleFormat),
    FloatingPointBitsPerSample(u16),
    FloatingPointPredictor(Predictor),
    IntegerSampleCount(u16),
    IntegerBitsPerPixel(u32),
    IntegerPredictor(Predictor),
    PlanarRasterData,
    UnsupportedBitsPerSample(Vec<u16>),
    ColorConversionNotSupported(&'static str),
}

impl fmt::Display for TiffUnsupportedError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use self::TiffUnsupportedError::*;
        match *self {
            UnknownInterpretation(code) => {
                write!(fmt, "Unsupported photometric interpretation: {code}.")
            }
            UnsupportedCompressionMethod(method) => {
                write!(fmt, "Compression method {method:?} is unsupported")
            }
            PlanarInterpretation(code) => write!(
                fmt,
                "For planar configuration 2, only RGB is supported \
                 (photometric interpretation code {code})."
            ),
            PlanarTiles => write!(
                fmt,
                "For planar configuration 2, only strip organization is supported."
            ),
            UnsupportedRasterFormat(format) => write!(
                fmt,
                "Sample format {format:?} is not a supported raster-data format."
            ),
            FloatingPointBitsPerSample(bits) => write!(
                fmt,
                "Floating-point raster data uses unsupported bits-per-sample: {bits}."
            ),
            FloatingPointPredictor(predictor) => write!(
                fmt,
                "Floating-point raster data uses unsupported predictor {predictor:?}."
            ),
            IntegerSampleCount(samples) => write!(
                fmt,
                "Integer raster data uses unsupported samples per pixel: {samples}."
            ),
            IntegerBitsPerPixel(bits) => write!(
                fmt,
                "Integer raster data uses unsupported bits-per-pixel: {bits}."
            ),
            IntegerPredictor(predictor) => write!(
                fmt,
                "Integer raster data uses unsupported predictor {predictor:?}."
            ),
            PlanarRasterData => write!(
                fmt,
                "Planar organization is not supported for raster data."
            ),
            UnsupportedBitsPerSample(ref bits) => {
                write!(fmt, "Bits per sample {bits:?} are unsupported")
            }
            ColorConversionNotSupported(strategy) => write!(
                fmt,
                "The {strategy} color conversion is not implemented by this data reader."
            ),
        }
    }
}

impl fmt::Display for TiffError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            TiffError::FormatError(ref e) => write!(fmt, "Format error: {e}"),
            TiffError::UnsupportedError(ref f) => write!(
                fmt,
                "The Decoder does not support the image format `{f}`"
            ),
            TiffError::IoError(ref e) => e.fmt(fmt),
            TiffError::LimitsExceeded => write!(fmt, "The Decoder limits are exceeded"),
            TiffError::IntSizeError => write!(fmt, "Platform or format size limits exceeded"),
        }
    }
}

impl Error for TiffError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            TiffError::IoError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(err: io::Error) -> TiffError {
        TiffError::IoError(err)
    }
}

impl From<TiffFormatError> for TiffError {
    fn from(err: TiffFormatError) -> TiffError {
        TiffError::FormatError(err)
    }
}

impl From<TiffUnsupportedError> for TiffError {
    fn from(err: TiffUnsupportedError) -> TiffError {
        TiffError::UnsupportedError(err)
    }
}

impl From<RegionError> for TiffError {
    fn from(err: RegionError) -> TiffError {
        TiffError::FormatError(TiffFormatError::InvalidRegion(err))
    }
}

impl From<TryFromIntError> for TiffError {
    fn from(_err: TryFromIntError) -> TiffError {
        TiffError::IntSizeError
    }
}

/// Result of an image decoding process
pub type TiffResult<T> = Result<T, TiffError>;
