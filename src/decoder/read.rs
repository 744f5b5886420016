//! The built-in strip and tile data reader.
//!
//! This is the default [`ImageDataReader`] used by the decode entry points.
//! It decompresses only the chunks intersecting the requested region and
//! interprets their samples through the selected photometric strategy. The
//! YCbCr, CIE L*a*b* and LogLuv color conversions are not implemented here;
//! images selecting those strategies have to be read by an external reader.

use std::io::{Read, Seek};

use crate::directory::Directory;
use crate::error::{TiffError, TiffFormatError, TiffResult, TiffUnsupportedError};
use crate::tags::{ByteOrder, CompressionMethod, PlanarConfiguration, Predictor, Tag};

use super::params::DecodeParameters;
use super::photometric::PhotometricStrategy;
use super::predictor::{fp_predict_f32, fp_predict_f64, rev_hpredict_nsamp};
use super::raster::RasterFormat;
use super::region::Region;
use super::stream::{PackBitsReader, SmartReader};
use super::{AlphaInfo, Limits, PixelBuffer, RasterBuffer, RasterData};

/// Reads decoded image content out of the physical chunk layout.
///
/// The decode entry points construct the built-in implementation from the
/// directory's layout tags; callers with their own byte management can
/// implement this to plug in a different reader.
pub trait ImageDataReader {
    /// Produce the pixels of the requested region (or of the whole image).
    fn read_image_data(
        &mut self,
        region: Option<Region>,
        alpha: AlphaInfo,
    ) -> TiffResult<PixelBuffer>;

    /// Produce the numeric samples of the requested region (or of the whole
    /// image).
    fn read_raster_data(&mut self, region: Option<Region>) -> TiffResult<RasterData>;
}

/// Where the image data of one sub-image physically lives.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ImageDataLayout {
    Strips {
        offsets: Vec<u64>,
        byte_counts: Vec<u64>,
        rows_per_strip: u32,
    },
    Tiles {
        offsets: Vec<u64>,
        byte_counts: Vec<u64>,
        tile_width: u32,
        tile_length: u32,
    },
}

impl ImageDataLayout {
    /// Derive the layout from the strip or tile tags of the directory.
    pub fn from_directory(directory: &Directory, image_height: u32) -> TiffResult<ImageDataLayout> {
        if directory.contains(Tag::StripOffsets) {
            let offsets = directory.get_tag_u64_vec(Tag::StripOffsets)?;
            let byte_counts = directory.get_tag_u64_vec(Tag::StripByteCounts)?;
            if offsets.len() != byte_counts.len() {
                return Err(TiffFormatError::InconsistentSizesEncountered.into());
            }

            let rows_per_strip = directory
                .find_tag_u32(Tag::RowsPerStrip)?
                .unwrap_or(image_height);
            if rows_per_strip == 0 {
                return Err(TiffFormatError::InvalidTagValueType(Tag::RowsPerStrip).into());
            }

            Ok(ImageDataLayout::Strips {
                offsets,
                byte_counts,
                rows_per_strip,
            })
        } else if directory.contains(Tag::TileOffsets) {
            let offsets = directory.get_tag_u64_vec(Tag::TileOffsets)?;
            let byte_counts = directory.get_tag_u64_vec(Tag::TileByteCounts)?;
            if offsets.len() != byte_counts.len() {
                return Err(TiffFormatError::InconsistentSizesEncountered.into());
            }

            let tile_width = directory.get_tag_u32(Tag::TileWidth)?;
            let tile_length = directory.get_tag_u32(Tag::TileLength)?;
            if tile_width == 0 {
                return Err(TiffFormatError::InvalidTagValueType(Tag::TileWidth).into());
            }
            if tile_length == 0 {
                return Err(TiffFormatError::InvalidTagValueType(Tag::TileLength).into());
            }

            Ok(ImageDataLayout::Tiles {
                offsets,
                byte_counts,
                tile_width,
                tile_length,
            })
        } else {
            Err(TiffFormatError::ChunkLayoutNotFound.into())
        }
    }

    /// Build the built-in reader over `source` for this layout.
    #[allow(clippy::too_many_arguments)]
    pub fn data_reader<'a, R: Read + Seek>(
        self,
        source: R,
        strategy: &'a PhotometricStrategy,
        parameters: &DecodeParameters,
        width: u32,
        height: u32,
        byte_order: ByteOrder,
        raster_format: Option<RasterFormat>,
        limits: Limits,
    ) -> ChunkReader<'a, R> {
        ChunkReader {
            source: SmartReader::wrap(source, byte_order),
            layout: self,
            strategy,
            bits_per_sample: parameters.bits_per_sample.clone(),
            bits_per_pixel: parameters.bits_per_pixel,
            predictor: parameters.predictor,
            samples_per_pixel: parameters.samples_per_pixel,
            width,
            height,
            compression: parameters.compression,
            planar_configuration: parameters.planar_configuration,
            raster_format,
            limits,
        }
    }
}

fn create_reader<'r, R: 'r + Read>(
    reader: R,
    method: CompressionMethod,
    compressed_length: u64,
) -> TiffResult<Box<dyn Read + 'r>> {
    Ok(match method {
        CompressionMethod::None => Box::new(reader.take(compressed_length)),
        #[cfg(feature = "lzw")]
        CompressionMethod::LZW => Box::new(super::stream::LZWReader::new(
            reader,
            usize::try_from(compressed_length)?,
        )),
        #[cfg(feature = "deflate")]
        CompressionMethod::Deflate | CompressionMethod::OldDeflate => {
            Box::new(super::stream::DeflateReader::new(reader))
        }
        CompressionMethod::PackBits => Box::new(PackBitsReader::new(reader, compressed_length)),
        method => {
            return Err(TiffError::UnsupportedError(
                TiffUnsupportedError::UnsupportedCompressionMethod(method),
            ))
        }
    })
}

fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// A numeric sample type the raster path can materialize.
trait RasterSample: Copy + Default {
    const BYTES: usize;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Self;

    fn undo_fp_row(_encoded: &mut [u8], _row: &mut [Self], _samples: usize) -> TiffResult<()> {
        Err(TiffUnsupportedError::FloatingPointPredictor(Predictor::FloatingPoint).into())
    }

    fn undo_horizontal_row(_row: &mut [Self], _samples: usize) -> TiffResult<()> {
        Err(TiffUnsupportedError::IntegerPredictor(Predictor::Horizontal).into())
    }
}

impl RasterSample for f32 {
    const BYTES: usize = 4;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Self {
        let bytes: [u8; 4] = bytes.try_into().unwrap();
        match byte_order {
            ByteOrder::LittleEndian => f32::from_le_bytes(bytes),
            ByteOrder::BigEndian => f32::from_be_bytes(bytes),
        }
    }

    fn undo_fp_row(encoded: &mut [u8], row: &mut [Self], samples: usize) -> TiffResult<()> {
        fp_predict_f32(encoded, row, samples);
        Ok(())
    }
}

impl RasterSample for f64 {
    const BYTES: usize = 8;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Self {
        let bytes: [u8; 8] = bytes.try_into().unwrap();
        match byte_order {
            ByteOrder::LittleEndian => f64::from_le_bytes(bytes),
            ByteOrder::BigEndian => f64::from_be_bytes(bytes),
        }
    }

    fn undo_fp_row(encoded: &mut [u8], row: &mut [Self], samples: usize) -> TiffResult<()> {
        fp_predict_f64(encoded, row, samples);
        Ok(())
    }
}

impl RasterSample for i16 {
    const BYTES: usize = 2;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Self {
        let bytes: [u8; 2] = bytes.try_into().unwrap();
        match byte_order {
            ByteOrder::LittleEndian => i16::from_le_bytes(bytes),
            ByteOrder::BigEndian => i16::from_be_bytes(bytes),
        }
    }

    fn undo_horizontal_row(row: &mut [Self], samples: usize) -> TiffResult<()> {
        rev_hpredict_nsamp(row, samples);
        Ok(())
    }
}

impl RasterSample for i32 {
    const BYTES: usize = 4;

    fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> Self {
        let bytes: [u8; 4] = bytes.try_into().unwrap();
        match byte_order {
            ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
            ByteOrder::BigEndian => i32::from_be_bytes(bytes),
        }
    }

    fn undo_horizontal_row(row: &mut [Self], samples: usize) -> TiffResult<()> {
        rev_hpredict_nsamp(row, samples);
        Ok(())
    }
}

/// The built-in reader over a seekable byte source.
#[derive(Debug)]
pub struct ChunkReader<'a, R: Read + Seek> {
    source: SmartReader<R>,
    layout: ImageDataLayout,
    strategy: &'a PhotometricStrategy,
    bits_per_sample: Vec<u16>,
    bits_per_pixel: u32,
    predictor: Option<Predictor>,
    samples_per_pixel: u16,
    width: u32,
    height: u32,
    compression: CompressionMethod,
    planar_configuration: PlanarConfiguration,
    raster_format: Option<RasterFormat>,
    limits: Limits,
}

impl<R: Read + Seek> ChunkReader<'_, R> {
    fn chunk_file_range(&self, chunk: usize) -> TiffResult<(u64, u64)> {
        let (offsets, byte_counts) = match &self.layout {
            ImageDataLayout::Strips {
                offsets,
                byte_counts,
                ..
            }
            | ImageDataLayout::Tiles {
                offsets,
                byte_counts,
                ..
            } => (offsets, byte_counts),
        };

        let offset = offsets
            .get(chunk)
            .ok_or(TiffFormatError::InconsistentSizesEncountered)?;
        let compressed_bytes = byte_counts
            .get(chunk)
            .ok_or(TiffFormatError::InconsistentSizesEncountered)?;

        Ok((*offset, *compressed_bytes))
    }

    /// Decompress one chunk into a freshly allocated buffer of
    /// `expected_len` bytes. A short chunk leaves the trailing samples
    /// zeroed.
    fn expand_chunk(&mut self, chunk: usize, expected_len: usize) -> TiffResult<Vec<u8>> {
        let (offset, compressed_bytes) = self.chunk_file_range(chunk)?;

        if expected_len > self.limits.intermediate_buffer_size
            || usize::try_from(compressed_bytes)? > self.limits.intermediate_buffer_size
        {
            return Err(TiffError::LimitsExceeded);
        }

        self.source.goto_offset(offset)?;
        let mut data = vec![0u8; expected_len];
        {
            let reader = create_reader(&mut self.source, self.compression, compressed_bytes)?;
            let mut slice: &mut [u8] = &mut data[..];
            std::io::copy(&mut reader.take(expected_len as u64), &mut slice)?;
        }
        Ok(data)
    }

    /// Bytes of one chunky row that is `row_width` pixels wide. Rows are
    /// byte aligned, so sub-byte depths round up.
    fn chunky_row_bytes(&self, row_width: u32) -> TiffResult<usize> {
        let bits = u64::from(row_width) * u64::from(self.bits_per_pixel);
        Ok(usize::try_from((bits + 7) / 8)?)
    }

    /// The uniform bit depth of single-sample strategies.
    fn uniform_bits(&self) -> TiffResult<u16> {
        let bits = *self.bits_per_sample.first().unwrap_or(&1);
        if matches!(bits, 1 | 2 | 4 | 8 | 16)
            && self.bits_per_sample.iter().all(|&b| b == bits)
        {
            Ok(bits)
        } else {
            Err(TiffUnsupportedError::UnsupportedBitsPerSample(self.bits_per_sample.clone()).into())
        }
    }

    fn require_eight_bit(&self, min_samples: u16) -> TiffResult<()> {
        if self.samples_per_pixel >= min_samples && self.bits_per_sample.iter().all(|&b| b == 8) {
            Ok(())
        } else {
            Err(TiffUnsupportedError::UnsupportedBitsPerSample(self.bits_per_sample.clone()).into())
        }
    }

    /// The predictors this reader can undo on pixel data.
    fn check_pixel_predictor(&self) -> TiffResult<()> {
        match self.predictor {
            None | Some(Predictor::None) => Ok(()),
            Some(Predictor::Horizontal) => {
                if self.bits_per_sample.iter().all(|&b| b == 8) {
                    Ok(())
                } else {
                    Err(TiffUnsupportedError::UnsupportedBitsPerSample(
                        self.bits_per_sample.clone(),
                    )
                    .into())
                }
            }
            Some(Predictor::FloatingPoint) => {
                Err(TiffUnsupportedError::FloatingPointPredictor(Predictor::FloatingPoint).into())
            }
        }
    }

    /// Reject strategy/depth combinations up front so the per-row
    /// interpretation can index unchecked.
    fn check_strategy_support(&self) -> TiffResult<()> {
        match self.strategy {
            PhotometricStrategy::BiLevel { .. } | PhotometricStrategy::Palette { .. } => {
                self.uniform_bits().map(|_| ())
            }
            PhotometricStrategy::Rgb(_) => self.require_eight_bit(3),
            PhotometricStrategy::Cmyk(_) => self.require_eight_bit(4),
            PhotometricStrategy::YCbCr(_)
            | PhotometricStrategy::CieLab(_)
            | PhotometricStrategy::LogLuv(_) => Err(
                TiffUnsupportedError::ColorConversionNotSupported(self.strategy.name()).into(),
            ),
        }
    }

    fn undo_horizontal_rows(&self, data: &mut [u8], row_bytes: usize) {
        if self.predictor == Some(Predictor::Horizontal) {
            let samples = usize::from(self.samples_per_pixel);
            for row in data.chunks_exact_mut(row_bytes) {
                rev_hpredict_nsamp(row, samples);
            }
        }
    }

    /// One sample out of a chunky row, by flat sample index.
    fn unpack_sample(&self, src: &[u8], index: usize, bits: u16) -> u32 {
        match bits {
            1 | 2 | 4 => {
                let bits = usize::from(bits);
                let bit = index * bits;
                let shift = 8 - bits - (bit % 8);
                u32::from((src[bit / 8] >> shift) & ((1u8 << bits) - 1))
            }
            8 => u32::from(src[index]),
            16 => {
                let pair = [src[index * 2], src[index * 2 + 1]];
                u32::from(match self.source.byte_order {
                    ByteOrder::LittleEndian => u16::from_le_bytes(pair),
                    ByteOrder::BigEndian => u16::from_be_bytes(pair),
                })
            }
            _ => unreachable!("depth was checked before interpretation"),
        }
    }

    /// Turn `span` pixels of one chunky row into packed ARGB.
    #[allow(clippy::too_many_arguments)]
    fn interpret_span(
        &self,
        src: &[u8],
        src_x: u32,
        dest_x: u32,
        span: u32,
        dest_row: u32,
        buffer: &mut PixelBuffer,
        alpha: AlphaInfo,
    ) -> TiffResult<()> {
        let samples = usize::from(self.samples_per_pixel);

        match self.strategy {
            PhotometricStrategy::BiLevel { invert, .. } => {
                let bits = self.uniform_bits()?;
                let max = (1u32 << bits) - 1;
                for i in 0..span {
                    let mut sample =
                        self.unpack_sample(src, (src_x + i) as usize * samples, bits);
                    if *invert {
                        sample = max - sample;
                    }
                    let gray = ((sample * 255) / max) as u8;
                    buffer.set_pixel(dest_x + i, dest_row, argb(0xFF, gray, gray, gray));
                }
            }
            PhotometricStrategy::Palette { color_map, .. } => {
                let bits = self.uniform_bits()?;
                // The selector checked the map against 3 * 2^bits-per-pixel,
                // so every unpacked index has its three components.
                let count = color_map.len() / 3;
                for i in 0..span {
                    let index = self.unpack_sample(src, (src_x + i) as usize * samples, bits)
                        as usize;
                    let r = (color_map[index] >> 8) as u8;
                    let g = (color_map[count + index] >> 8) as u8;
                    let b = (color_map[2 * count + index] >> 8) as u8;
                    buffer.set_pixel(dest_x + i, dest_row, argb(0xFF, r, g, b));
                }
            }
            PhotometricStrategy::Rgb(_) => {
                for i in 0..span {
                    let p = (src_x + i) as usize * samples;
                    let a = if alpha.has_alpha { src[p + 3] } else { 0xFF };
                    buffer.set_pixel(
                        dest_x + i,
                        dest_row,
                        argb(a, src[p], src[p + 1], src[p + 2]),
                    );
                }
            }
            PhotometricStrategy::Cmyk(_) => {
                for i in 0..span {
                    let p = (src_x + i) as usize * samples;
                    let (c, m, y, k) = (
                        u32::from(src[p]),
                        u32::from(src[p + 1]),
                        u32::from(src[p + 2]),
                        u32::from(src[p + 3]),
                    );
                    let r = ((255 - c) * (255 - k) / 255) as u8;
                    let g = ((255 - m) * (255 - k) / 255) as u8;
                    let b = ((255 - y) * (255 - k) / 255) as u8;
                    buffer.set_pixel(dest_x + i, dest_row, argb(0xFF, r, g, b));
                }
            }
            PhotometricStrategy::YCbCr(_)
            | PhotometricStrategy::CieLab(_)
            | PhotometricStrategy::LogLuv(_) => {
                return Err(TiffUnsupportedError::ColorConversionNotSupported(
                    self.strategy.name(),
                )
                .into())
            }
        }

        Ok(())
    }

    fn read_chunky_strips(
        &mut self,
        buffer: &mut PixelBuffer,
        x0: u32,
        y0: u32,
        out_w: u32,
        out_h: u32,
        alpha: AlphaInfo,
    ) -> TiffResult<()> {
        let rows_per_strip = match &self.layout {
            ImageDataLayout::Strips { rows_per_strip, .. } => *rows_per_strip,
            ImageDataLayout::Tiles { .. } => unreachable!("strip read on tile layout"),
        };
        let row_bytes = self.chunky_row_bytes(self.width)?;

        let first_strip = y0 / rows_per_strip;
        let last_strip = (y0 + out_h - 1) / rows_per_strip;

        for strip in first_strip..=last_strip {
            let strip_row0 = strip * rows_per_strip;
            let rows_in_strip = rows_per_strip.min(self.height - strip_row0);

            let expected = row_bytes
                .checked_mul(usize::try_from(rows_in_strip)?)
                .ok_or(TiffError::IntSizeError)?;
            let mut data = self.expand_chunk(usize::try_from(strip)?, expected)?;
            self.undo_horizontal_rows(&mut data, row_bytes);

            let row_start = y0.max(strip_row0);
            let row_end = (y0 + out_h).min(strip_row0 + rows_in_strip);
            for row in row_start..row_end {
                let chunk_row = usize::try_from(row - strip_row0)?;
                let src = &data[chunk_row * row_bytes..][..row_bytes];
                self.interpret_span(src, x0, 0, out_w, row - y0, buffer, alpha)?;
            }
        }

        Ok(())
    }

    fn read_chunky_tiles(
        &mut self,
        buffer: &mut PixelBuffer,
        x0: u32,
        y0: u32,
        out_w: u32,
        out_h: u32,
        alpha: AlphaInfo,
    ) -> TiffResult<()> {
        let (tile_width, tile_length) = match &self.layout {
            ImageDataLayout::Tiles {
                tile_width,
                tile_length,
                ..
            } => (*tile_width, *tile_length),
            ImageDataLayout::Strips { .. } => unreachable!("tile read on strip layout"),
        };

        let tiles_across = (self.width + tile_width - 1) / tile_width;
        let tile_row_bytes = self.chunky_row_bytes(tile_width)?;
        let expected = tile_row_bytes
            .checked_mul(usize::try_from(tile_length)?)
            .ok_or(TiffError::IntSizeError)?;

        for tile_y in y0 / tile_length..=(y0 + out_h - 1) / tile_length {
            for tile_x in x0 / tile_width..=(x0 + out_w - 1) / tile_width {
                let tile = tile_y * tiles_across + tile_x;
                // Tiles are padded to full size, so the whole tile expands
                // even at the image boundary.
                let mut data = self.expand_chunk(usize::try_from(tile)?, expected)?;
                self.undo_horizontal_rows(&mut data, tile_row_bytes);

                let tile_row0 = tile_y * tile_length;
                let tile_col0 = tile_x * tile_width;

                let row_start = y0.max(tile_row0);
                let row_end = (y0 + out_h).min((tile_row0 + tile_length).min(self.height));
                let col_start = x0.max(tile_col0);
                let col_end = (x0 + out_w).min((tile_col0 + tile_width).min(self.width));

                for row in row_start..row_end {
                    let chunk_row = usize::try_from(row - tile_row0)?;
                    let src = &data[chunk_row * tile_row_bytes..][..tile_row_bytes];
                    self.interpret_span(
                        src,
                        col_start - tile_col0,
                        col_start - x0,
                        col_end - col_start,
                        row - y0,
                        buffer,
                        alpha,
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Planar storage: one plane of strips per sample. Only the 8-bit,
    /// three-sample RGB form is readable here.
    fn read_planar_strips(
        &mut self,
        buffer: &mut PixelBuffer,
        x0: u32,
        y0: u32,
        out_w: u32,
        out_h: u32,
    ) -> TiffResult<()> {
        if self.samples_per_pixel != 3 || self.bits_per_sample.iter().any(|&b| b != 8) {
            return Err(TiffUnsupportedError::UnsupportedBitsPerSample(
                self.bits_per_sample.clone(),
            )
            .into());
        }

        let (rows_per_strip, strip_count) = match &self.layout {
            ImageDataLayout::Strips {
                rows_per_strip,
                offsets,
                ..
            } => (*rows_per_strip, offsets.len()),
            ImageDataLayout::Tiles { .. } => {
                return Err(TiffUnsupportedError::PlanarTiles.into())
            }
        };

        let strips_per_plane = (self.height + rows_per_strip - 1) / rows_per_strip;
        if strip_count != usize::try_from(strips_per_plane)? * 3 {
            return Err(TiffFormatError::InconsistentSizesEncountered.into());
        }

        let row_bytes = usize::try_from(self.width)?;

        for strip in y0 / rows_per_strip..=(y0 + out_h - 1) / rows_per_strip {
            let strip_row0 = strip * rows_per_strip;
            let rows_in_strip = rows_per_strip.min(self.height - strip_row0);
            let expected = row_bytes
                .checked_mul(usize::try_from(rows_in_strip)?)
                .ok_or(TiffError::IntSizeError)?;

            let mut planes = Vec::with_capacity(3);
            for plane in 0..3u32 {
                let chunk = usize::try_from(plane * strips_per_plane + strip)?;
                let mut data = self.expand_chunk(chunk, expected)?;
                if self.predictor == Some(Predictor::Horizontal) {
                    // Differencing runs within each plane, one sample apart.
                    for row in data.chunks_exact_mut(row_bytes) {
                        rev_hpredict_nsamp(row, 1);
                    }
                }
                planes.push(data);
            }

            let row_start = y0.max(strip_row0);
            let row_end = (y0 + out_h).min(strip_row0 + rows_in_strip);
            for row in row_start..row_end {
                let offset = usize::try_from(row - strip_row0)? * row_bytes;
                for i in 0..out_w {
                    let p = offset + usize::try_from(x0 + i)?;
                    buffer.set_pixel(
                        i,
                        row - y0,
                        argb(0xFF, planes[0][p], planes[1][p], planes[2][p]),
                    );
                }
            }
        }

        Ok(())
    }

    fn read_raster_generic<T: RasterSample>(
        &mut self,
        x0: u32,
        y0: u32,
        out_w: u32,
        out_h: u32,
        out: &mut [T],
    ) -> TiffResult<()> {
        let samples = usize::from(self.samples_per_pixel);
        let byte_order = self.source.byte_order;

        // Chunk geometry: strips span the image width, tiles their own.
        let (chunk_width, chunk_length, strip_mode) = match &self.layout {
            ImageDataLayout::Strips { rows_per_strip, .. } => (self.width, *rows_per_strip, true),
            ImageDataLayout::Tiles {
                tile_width,
                tile_length,
                ..
            } => (*tile_width, *tile_length, false),
        };

        let row_samples = usize::try_from(chunk_width)? * samples;
        let row_bytes = row_samples * T::BYTES;
        let mut scratch = vec![T::default(); row_samples];

        let tiles_across = (self.width + chunk_width - 1) / chunk_width;

        for chunk_y in y0 / chunk_length..=(y0 + out_h - 1) / chunk_length {
            let x_range = if strip_mode {
                0..=0u32
            } else {
                x0 / chunk_width..=(x0 + out_w - 1) / chunk_width
            };

            for chunk_x in x_range {
                let chunk = chunk_y * tiles_across + chunk_x;
                let chunk_row0 = chunk_y * chunk_length;
                let chunk_col0 = chunk_x * chunk_width;

                let rows_in_chunk = if strip_mode {
                    chunk_length.min(self.height - chunk_row0)
                } else {
                    chunk_length
                };

                let expected = row_bytes
                    .checked_mul(usize::try_from(rows_in_chunk)?)
                    .ok_or(TiffError::IntSizeError)?;
                let mut data = self.expand_chunk(usize::try_from(chunk)?, expected)?;

                let row_start = y0.max(chunk_row0);
                let row_end = (y0 + out_h).min((chunk_row0 + rows_in_chunk).min(self.height));
                let col_start = x0.max(chunk_col0);
                let col_end =
                    (x0 + out_w).min((chunk_col0 + chunk_width).min(self.width));

                for row in row_start..row_end {
                    let chunk_row = usize::try_from(row - chunk_row0)?;
                    let encoded = &mut data[chunk_row * row_bytes..][..row_bytes];

                    if self.predictor == Some(Predictor::FloatingPoint) {
                        T::undo_fp_row(encoded, &mut scratch, samples)?;
                    } else {
                        for (value, bytes) in
                            scratch.iter_mut().zip(encoded.chunks_exact(T::BYTES))
                        {
                            *value = T::from_bytes(bytes, byte_order);
                        }
                        if self.predictor == Some(Predictor::Horizontal) {
                            T::undo_horizontal_row(&mut scratch, samples)?;
                        }
                    }

                    let src_offset = usize::try_from(col_start - chunk_col0)? * samples;
                    let span = usize::try_from(col_end - col_start)? * samples;
                    let dest_offset = (usize::try_from(row - y0)? * usize::try_from(out_w)?
                        + usize::try_from(col_start - x0)?)
                        * samples;
                    out[dest_offset..dest_offset + span]
                        .copy_from_slice(&scratch[src_offset..src_offset + span]);
                }
            }
        }

        Ok(())
    }
}

impl<R: Read + Seek> ImageDataReader for ChunkReader<'_, R> {
    fn read_image_data(
        &mut self,
        region: Option<Region>,
        alpha: AlphaInfo,
    ) -> TiffResult<PixelBuffer> {
        let (x0, y0, out_w, out_h) = match region {
            Some(region) => (region.x, region.y, region.width, region.height),
            None => (0, 0, self.width, self.height),
        };

        self.check_pixel_predictor()?;

        let mut buffer = PixelBuffer::new(out_w, out_h, alpha, &self.limits)?;
        let strips = matches!(self.layout, ImageDataLayout::Strips { .. });

        if self.planar_configuration == PlanarConfiguration::Planar {
            self.read_planar_strips(&mut buffer, x0, y0, out_w, out_h)?;
        } else {
            self.check_strategy_support()?;
            if strips {
                self.read_chunky_strips(&mut buffer, x0, y0, out_w, out_h, alpha)?;
            } else {
                self.read_chunky_tiles(&mut buffer, x0, y0, out_w, out_h, alpha)?;
            }
        }

        Ok(buffer)
    }

    fn read_raster_data(&mut self, region: Option<Region>) -> TiffResult<RasterData> {
        let format = self
            .raster_format
            .ok_or(TiffFormatError::RequiredTagNotFound(Tag::SampleFormat))?;

        if self.planar_configuration == PlanarConfiguration::Planar {
            return Err(TiffUnsupportedError::PlanarRasterData.into());
        }

        let (x0, y0, out_w, out_h) = match region {
            Some(region) => (region.x, region.y, region.width, region.height),
            None => (0, 0, self.width, self.height),
        };

        let mut raster =
            RasterData::new(out_w, out_h, self.samples_per_pixel, format, &self.limits)?;

        match &mut raster.buffer {
            RasterBuffer::F32(data) => self.read_raster_generic(x0, y0, out_w, out_h, data)?,
            RasterBuffer::F64(data) => self.read_raster_generic(x0, y0, out_w, out_h, data)?,
            RasterBuffer::I16(data) => self.read_raster_generic(x0, y0, out_w, out_h, data)?,
            RasterBuffer::I32(data) => self.read_raster_generic(x0, y0, out_w, out_h, data)?,
        }

        Ok(raster)
    }
}
