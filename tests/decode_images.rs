//! End-to-end pixel decodes over small synthetic images.

use std::io::Cursor;

use tiff_raster::decoder::{
    decode_image, DecodeOptions, PhotometricStrategy, PixelBuffer, Region, StrategyParams,
};
use tiff_raster::ifd::Value;
use tiff_raster::tags::{ByteOrder, Tag, Type};
use tiff_raster::{
    Directory, Entry, RegionError, TiffError, TiffFormatError, TiffUnsupportedError,
};

fn short(val: u16) -> Entry {
    Entry::new(Type::SHORT, Value::Short(val))
}

fn long(val: u32) -> Entry {
    Entry::new(Type::LONG, Value::Unsigned(val))
}

fn shorts(vals: &[u16]) -> Entry {
    Entry::new(
        Type::SHORT,
        Value::List(vals.iter().copied().map(Value::Short).collect()),
    )
}

fn longs(vals: &[u32]) -> Entry {
    Entry::new(
        Type::LONG,
        Value::List(vals.iter().copied().map(Value::Unsigned).collect()),
    )
}

fn gray(value: u8) -> u32 {
    0xFF00_0000 | u32::from(value) * 0x0001_0101
}

fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// A byte source assembled from chunks placed back to back.
#[derive(Default)]
struct SourceBuilder {
    data: Vec<u8>,
    offsets: Vec<u32>,
    byte_counts: Vec<u32>,
}

impl SourceBuilder {
    fn add(&mut self, chunk: &[u8]) -> &mut Self {
        self.offsets.push(self.data.len() as u32);
        self.byte_counts.push(chunk.len() as u32);
        self.data.extend_from_slice(chunk);
        self
    }

    fn strip_entries(&self) -> [(Tag, Entry); 2] {
        [
            (Tag::StripOffsets, longs(&self.offsets)),
            (Tag::StripByteCounts, longs(&self.byte_counts)),
        ]
    }

    fn tile_entries(&self) -> [(Tag, Entry); 2] {
        [
            (Tag::TileOffsets, longs(&self.offsets)),
            (Tag::TileByteCounts, longs(&self.byte_counts)),
        ]
    }

    fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.data.clone())
    }
}

fn decode(directory: &Directory, source: &SourceBuilder, options: DecodeOptions) -> PixelBuffer {
    decode_image(source.cursor(), directory, ByteOrder::LittleEndian, options)
        .expect("decode failed")
}

/// 4x4 8-bit grayscale with pixel values 0..16 in one strip.
fn gray_4x4() -> (Directory, SourceBuilder) {
    let mut source = SourceBuilder::default();
    source.add(&(0u8..16).collect::<Vec<_>>());

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(4)),
        (Tag::BitsPerSample, short(8)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(4)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());
    (dir, source)
}

#[test]
fn gray_8bit_full_image() {
    let (dir, source) = gray_4x4();
    let buffer = decode(&dir, &source, DecodeOptions::new());

    assert_eq!((buffer.width(), buffer.height()), (4, 4));
    assert!(!buffer.has_alpha());
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(buffer.pixel(x, y), gray((y * 4 + x) as u8));
        }
    }
}

#[test]
fn full_region_request_decodes_identically() {
    let (dir, source) = gray_4x4();
    let implicit = decode(&dir, &source, DecodeOptions::new());
    let explicit = decode(
        &dir,
        &source,
        DecodeOptions::new().with_sub_image(Region::new(0, 0, 4, 4)),
    );
    assert_eq!(implicit, explicit);
}

#[test]
fn gray_8bit_sub_region() {
    let (dir, source) = gray_4x4();
    let buffer = decode(
        &dir,
        &source,
        DecodeOptions::new().with_sub_image(Region::new(1, 2, 2, 2)),
    );

    assert_eq!((buffer.width(), buffer.height()), (2, 2));
    assert_eq!(buffer.pixel(0, 0), gray(9));
    assert_eq!(buffer.pixel(1, 0), gray(10));
    assert_eq!(buffer.pixel(0, 1), gray(13));
    assert_eq!(buffer.pixel(1, 1), gray(14));
}

#[test]
fn sub_region_across_strips() {
    // Two strips of two rows each.
    let mut source = SourceBuilder::default();
    source.add(&(0u8..8).collect::<Vec<_>>());
    source.add(&(8u8..16).collect::<Vec<_>>());

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(4)),
        (Tag::BitsPerSample, short(8)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(
        &dir,
        &source,
        DecodeOptions::new().with_sub_image(Region::new(2, 1, 2, 2)),
    );
    assert_eq!(buffer.pixel(0, 0), gray(6));
    assert_eq!(buffer.pixel(1, 0), gray(7));
    assert_eq!(buffer.pixel(0, 1), gray(10));
    assert_eq!(buffer.pixel(1, 1), gray(11));
}

#[test]
fn bilevel_white_is_zero_inverts() {
    // One row of ten 1-bit pixels: 1011001011, padded to two bytes.
    let mut source = SourceBuilder::default();
    source.add(&[0b1011_0010, 0b1100_0000]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(10)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(1)),
        (Tag::PhotometricInterpretation, short(0)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    let expected = [1, 0, 1, 1, 0, 0, 1, 0, 1, 1];
    for (x, bit) in expected.iter().enumerate() {
        // white-is-zero: a set bit is black
        let value = if *bit == 1 { 0 } else { 255 };
        assert_eq!(buffer.pixel(x as u32, 0), gray(value), "pixel {x}");
    }
}

#[test]
fn palette_4bit_looks_up_the_color_map() {
    // One row of four 4-bit indices: 1, 2, 3, 0.
    let mut source = SourceBuilder::default();
    source.add(&[0x12, 0x30]);

    // 3 * 2^4 entries; component i of each plane encodes its index in the
    // high byte.
    let map: Vec<u16> = (0u16..48).map(|i| i << 8).collect();

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(4)),
        (Tag::PhotometricInterpretation, short(3)),
        (Tag::ColorMap, shorts(&map)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert_eq!(buffer.pixel(0, 0), rgb(1, 17, 33));
    assert_eq!(buffer.pixel(1, 0), rgb(2, 18, 34));
    assert_eq!(buffer.pixel(2, 0), rgb(3, 19, 35));
    assert_eq!(buffer.pixel(3, 0), rgb(0, 16, 32));
}

#[test]
fn palette_with_short_color_map_is_malformed() {
    let mut source = SourceBuilder::default();
    source.add(&[0x12, 0x30]);

    let map: Vec<u16> = (0u16..47).map(|i| i << 8).collect();
    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(4)),
        (Tag::PhotometricInterpretation, short(3)),
        (Tag::ColorMap, shorts(&map)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let err = decode_image(
        source.cursor(),
        &dir,
        ByteOrder::LittleEndian,
        DecodeOptions::new(),
    )
    .unwrap_err();
    match err {
        TiffError::FormatError(TiffFormatError::InvalidColorMap { len, expected }) => {
            assert_eq!((len, expected), (47, 48));
        }
        other => panic!("expected a color-map error, got {other}"),
    }
}

fn rgb_directory(samples: u16, source: &SourceBuilder) -> Directory {
    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(1)),
        (Tag::SamplesPerPixel, short(samples)),
        (Tag::BitsPerSample, shorts(&vec![8; usize::from(samples)])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());
    dir
}

#[test]
fn rgb_8bit_pixels() {
    let mut source = SourceBuilder::default();
    source.add(&[10, 20, 30, 40, 50, 60]);
    let dir = rgb_directory(3, &source);

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert!(!buffer.has_alpha());
    assert_eq!(buffer.pixel(0, 0), rgb(10, 20, 30));
    assert_eq!(buffer.pixel(1, 0), rgb(40, 50, 60));
}

#[test]
fn four_sample_rgb_without_extra_samples_is_argb() {
    let mut source = SourceBuilder::default();
    source.add(&[10, 20, 30, 128, 40, 50, 60, 0]);
    let dir = rgb_directory(4, &source);

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert!(buffer.has_alpha());
    assert!(!buffer.is_premultiplied());
    assert_eq!(buffer.pixel(0, 0), 0x800A141E);
    assert_eq!(buffer.pixel(1, 0), 0x0028323C);
}

#[test]
fn four_sample_rgb_extra_samples_table() {
    let mut source = SourceBuilder::default();
    source.add(&[10, 20, 30, 128, 40, 50, 60, 0]);

    // 0: the fourth sample means nothing, pixels decode opaque.
    let mut dir = rgb_directory(4, &source);
    dir.insert(Tag::ExtraSamples, short(0));
    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert!(!buffer.has_alpha());
    assert_eq!(buffer.pixel(0, 0), rgb(10, 20, 30));

    // 1: unassociated alpha.
    dir.insert(Tag::ExtraSamples, short(1));
    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert!(buffer.has_alpha());
    assert!(!buffer.is_premultiplied());

    // 2: associated (premultiplied) alpha.
    dir.insert(Tag::ExtraSamples, short(2));
    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert!(buffer.has_alpha());
    assert!(buffer.is_premultiplied());
}

#[test]
fn cmyk_converts_to_rgb() {
    let mut source = SourceBuilder::default();
    source.add(&[0, 0, 0, 0, 255, 0, 0, 0]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(1)),
        (Tag::SamplesPerPixel, short(4)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8, 8])),
        (Tag::PhotometricInterpretation, short(5)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert_eq!(buffer.pixel(0, 0), rgb(255, 255, 255));
    assert_eq!(buffer.pixel(1, 0), rgb(0, 255, 255));
}

#[test]
fn packbits_strip_decompresses() {
    // 8 pixels of value 0xAA: one repeat run.
    let mut source = SourceBuilder::default();
    source.add(&[0xF9, 0xAA]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(8)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(8)),
        (Tag::Compression, short(0x8005)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    for x in 0..8 {
        assert_eq!(buffer.pixel(x, 0), gray(0xAA));
    }
}

#[cfg(feature = "lzw")]
#[test]
fn lzw_strip_decompresses() {
    let pixels: Vec<u8> = (0u8..16).collect();
    let compressed = weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
        .encode(&pixels)
        .unwrap();

    let mut source = SourceBuilder::default();
    source.add(&compressed);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(4)),
        (Tag::BitsPerSample, short(8)),
        (Tag::Compression, short(5)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(4)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(buffer.pixel(x, y), gray((y * 4 + x) as u8));
        }
    }
}

#[cfg(feature = "deflate")]
#[test]
fn deflate_strip_decompresses() {
    use std::io::Write;

    let pixels: Vec<u8> = (0u8..16).collect();
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&pixels).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut source = SourceBuilder::default();
    source.add(&compressed);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(4)),
        (Tag::BitsPerSample, short(8)),
        (Tag::Compression, short(8)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(4)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert_eq!(buffer.pixel(3, 3), gray(15));
}

#[test]
fn horizontal_predictor_on_rgb_rows() {
    // Two pixels per row, stored as differences against the previous pixel.
    let row0 = [10u8, 20, 30, 5, 5, 5]; // decodes to (10,20,30), (15,25,35)
    let row1 = [100u8, 100, 100, 156, 206, 0]; // wraps to (0, 50, 100)
    let mut source = SourceBuilder::default();
    source.add(&[row0.as_slice(), row1.as_slice()].concat());

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(2)),
        (Tag::SamplesPerPixel, short(3)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::Predictor, short(2)),
        (Tag::RowsPerStrip, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert_eq!(buffer.pixel(0, 0), rgb(10, 20, 30));
    assert_eq!(buffer.pixel(1, 0), rgb(15, 25, 35));
    assert_eq!(buffer.pixel(0, 1), rgb(100, 100, 100));
    assert_eq!(buffer.pixel(1, 1), rgb(0, 50, 100));
}

#[test]
fn tiled_rgb_with_padding() {
    // 4x4 image in 3x3 tiles: four tiles, padded at the right and bottom.
    let width = 4u32;
    let height = 4u32;
    let tile_size = 3u32;

    let pixel_value = |x: u32, y: u32| ((y * width + x) * 3) as u8;

    let mut source = SourceBuilder::default();
    for tile_y in 0..2 {
        for tile_x in 0..2 {
            let mut tile = Vec::new();
            for row in 0..tile_size {
                for col in 0..tile_size {
                    let (x, y) = (tile_x * tile_size + col, tile_y * tile_size + row);
                    let value = if x < width && y < height {
                        pixel_value(x, y)
                    } else {
                        0 // padding
                    };
                    tile.extend_from_slice(&[value, value + 1, value + 2]);
                }
            }
            source.add(&tile);
        }
    }

    let mut dir: Directory = [
        (Tag::ImageWidth, long(width)),
        (Tag::ImageLength, long(height)),
        (Tag::SamplesPerPixel, short(3)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::TileWidth, long(tile_size)),
        (Tag::TileLength, long(tile_size)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.tile_entries());

    let full = decode(&dir, &source, DecodeOptions::new());
    for y in 0..height {
        for x in 0..width {
            let v = pixel_value(x, y);
            assert_eq!(full.pixel(x, y), rgb(v, v + 1, v + 2), "pixel {x},{y}");
        }
    }

    // A sub-region spanning all four tiles.
    let sub = decode(
        &dir,
        &source,
        DecodeOptions::new().with_sub_image(Region::new(2, 2, 2, 2)),
    );
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(sub.pixel(x, y), full.pixel(x + 2, y + 2));
        }
    }
}

#[test]
fn planar_rgb_strips_match_chunky() {
    // 2x2 RGB stored as three single-plane strips.
    let reds = [10u8, 20, 30, 40];
    let greens = [50u8, 60, 70, 80];
    let blues = [90u8, 100, 110, 120];

    let mut source = SourceBuilder::default();
    source.add(&reds);
    source.add(&greens);
    source.add(&blues);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(2)),
        (Tag::SamplesPerPixel, short(3)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::PlanarConfiguration, short(2)),
        (Tag::RowsPerStrip, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode(&dir, &source, DecodeOptions::new());
    assert_eq!(buffer.pixel(0, 0), rgb(10, 50, 90));
    assert_eq!(buffer.pixel(1, 0), rgb(20, 60, 100));
    assert_eq!(buffer.pixel(0, 1), rgb(30, 70, 110));
    assert_eq!(buffer.pixel(1, 1), rgb(40, 80, 120));

    let sub = decode(
        &dir,
        &source,
        DecodeOptions::new().with_sub_image(Region::new(1, 0, 1, 2)),
    );
    assert_eq!(sub.pixel(0, 0), rgb(20, 60, 100));
    assert_eq!(sub.pixel(0, 1), rgb(40, 80, 120));
}

#[test]
fn planar_non_rgb_is_unsupported() {
    let mut source = SourceBuilder::default();
    source.add(&[0; 16]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(2)),
        (Tag::SamplesPerPixel, short(4)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8, 8])),
        (Tag::PhotometricInterpretation, short(5)),
        (Tag::PlanarConfiguration, short(2)),
        (Tag::RowsPerStrip, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    assert!(matches!(
        decode_image(source.cursor(), &dir, ByteOrder::LittleEndian, DecodeOptions::new()),
        Err(TiffError::UnsupportedError(
            TiffUnsupportedError::PlanarInterpretation(5)
        ))
    ));
}

#[test]
fn planar_tiled_storage_is_unsupported() {
    let mut source = SourceBuilder::default();
    source.add(&[0; 12]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(2)),
        (Tag::SamplesPerPixel, short(3)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::PlanarConfiguration, short(2)),
        (Tag::TileWidth, long(2)),
        (Tag::TileLength, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.tile_entries());

    assert!(matches!(
        decode_image(source.cursor(), &dir, ByteOrder::LittleEndian, DecodeOptions::new()),
        Err(TiffError::UnsupportedError(TiffUnsupportedError::PlanarTiles))
    ));
}

#[test]
fn unknown_photometric_interpretation_fails() {
    let (dir, source) = gray_4x4();
    let mut dir: Directory = dir.iter().map(|(t, e)| (t, e.clone())).collect();
    dir.insert(Tag::PhotometricInterpretation, short(4));

    assert!(matches!(
        decode_image(source.cursor(), &dir, ByteOrder::LittleEndian, DecodeOptions::new()),
        Err(TiffError::UnsupportedError(
            TiffUnsupportedError::UnknownInterpretation(4)
        ))
    ));
}

#[test]
fn sample_count_mismatch_fails() {
    let mut source = SourceBuilder::default();
    source.add(&[0; 16]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(2)),
        (Tag::SamplesPerPixel, short(4)),
        (Tag::BitsPerSample, shorts(&[8, 8, 8])),
        (Tag::PhotometricInterpretation, short(2)),
        (Tag::RowsPerStrip, long(2)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    assert!(matches!(
        decode_image(source.cursor(), &dir, ByteOrder::LittleEndian, DecodeOptions::new()),
        Err(TiffError::FormatError(TiffFormatError::SampleCountMismatch {
            samples_per_pixel: 4,
            bits_per_sample: 3,
        }))
    ));
}

#[test]
fn zero_height_region_is_invalid() {
    let (dir, source) = gray_4x4();
    assert!(matches!(
        decode_image(
            source.cursor(),
            &dir,
            ByteOrder::LittleEndian,
            DecodeOptions::new().with_sub_image(Region::new(0, 0, 2, 0)),
        ),
        Err(TiffError::FormatError(TiffFormatError::InvalidRegion(
            RegionError::ZeroHeight
        )))
    ));
}

#[test]
fn custom_strategy_bypasses_selection() {
    // YCbCr data would normally select a conversion this reader does not
    // implement; a caller-supplied grayscale strategy reads it anyway.
    let mut source = SourceBuilder::default();
    source.add(&[1, 2, 3, 4]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(4)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(8)),
        (Tag::PhotometricInterpretation, short(6)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    // Selection path refuses to read it.
    assert!(matches!(
        decode_image(
            source.cursor(),
            &dir,
            ByteOrder::LittleEndian,
            DecodeOptions::new()
        ),
        Err(TiffError::UnsupportedError(
            TiffUnsupportedError::ColorConversionNotSupported("YCbCr")
        ))
    ));

    let custom = PhotometricStrategy::BiLevel {
        invert: false,
        params: StrategyParams {
            samples_per_pixel: 1,
            bits_per_sample: vec![8],
            predictor: None,
            width: 4,
            height: 1,
        },
    };
    let buffer = decode(
        &dir,
        &source,
        DecodeOptions::new().with_custom_strategy(custom),
    );
    assert_eq!(buffer.pixel(3, 0), gray(4));
}

#[test]
fn big_endian_16bit_gray() {
    // Two 16-bit samples, big endian: 0x0100 and 0xFFFF.
    let mut source = SourceBuilder::default();
    source.add(&[0x01, 0x00, 0xFF, 0xFF]);

    let mut dir: Directory = [
        (Tag::ImageWidth, long(2)),
        (Tag::ImageLength, long(1)),
        (Tag::BitsPerSample, short(16)),
        (Tag::PhotometricInterpretation, short(1)),
        (Tag::RowsPerStrip, long(1)),
    ]
    .into_iter()
    .collect();
    dir.extend(source.strip_entries());

    let buffer = decode_image(
        source.cursor(),
        &dir,
        ByteOrder::BigEndian,
        DecodeOptions::new(),
    )
    .unwrap();
    // 0x0100 of 0xFFFF scales to 0, 0xFFFF to 255.
    assert_eq!(buffer.pixel(0, 0), gray(0));
    assert_eq!(buffer.pixel(1, 0), gray(255));
}
