//! Decoding of TIFF image file directories
//!
//! TIFF (Tagged Image File Format) containers describe each sub-image with a
//! tag directory (IFD). This crate takes an already-parsed directory, resolves
//! and validates the tag combination that maps raw strip or tile bytes to
//! content, and decodes either packed pixels or a numeric raster. A caller
//! can also request just a rectangle of the image instead of all of it.
//!
//! Parsing the container bytes into a [`Directory`] (byte-order detection,
//! IFD walking, offset resolution) is the job of a front-end and out of scope
//! here, as is encoding.
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

pub mod decoder;
mod directory;
mod error;
pub mod ifd;
pub mod tags;

pub use self::directory::{Directory, Entry};
pub use self::error::{
    RegionError, TiffError, TiffFormatError, TiffResult, TiffUnsupportedError,
};
