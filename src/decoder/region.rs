//! Sub-image rectangles and their validation against the raster bounds.

use crate::error::{RegionError, TiffResult};

/// A rectangular part of the raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Region {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that the region is non-empty and fully contained in an
    /// `image_width` × `image_height` raster.
    ///
    /// The checks are consistent with cropping a buffered image: the corner
    /// must lie strictly inside the raster and the far edges must not extend
    /// past it. Sums are computed in `u64` so `x + width` cannot wrap.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<(), RegionError> {
        if self.width == 0 {
            return Err(RegionError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(RegionError::ZeroHeight);
        }
        if self.x >= image_width {
            return Err(RegionError::XOutsideRaster);
        }
        if u64::from(self.x) + u64::from(self.width) > u64::from(image_width) {
            return Err(RegionError::XPlusWidthOutsideRaster);
        }
        if self.y >= image_height {
            return Err(RegionError::YOutsideRaster);
        }
        if u64::from(self.y) + u64::from(self.height) > u64::from(image_height) {
            return Err(RegionError::YPlusHeightOutsideRaster);
        }
        Ok(())
    }
}

/// Validate a requested sub-image and collapse a request covering the whole
/// raster to "no sub-image".
///
/// The collapse suppresses the cropping copy in the data reader; it must not
/// be observable in the output, only in allocation behavior.
pub(crate) fn normalize(
    region: Option<Region>,
    image_width: u32,
    image_height: u32,
) -> TiffResult<Option<Region>> {
    let Some(region) = region else {
        return Ok(None);
    };

    region.validate(image_width, image_height)?;

    if region.x == 0
        && region.y == 0
        && region.width == image_width
        && region.height == image_height
    {
        return Ok(None);
    }

    Ok(Some(region))
}

#[cfg(test)]
mod tests {
    use super::{normalize, Region};
    use crate::error::RegionError;

    #[test]
    fn accepts_contained_regions() {
        // {10, 10, 5, 5} inside 100x100
        assert!(Region::new(10, 10, 5, 5).validate(100, 100).is_ok());
        // corner cases on the far edges
        assert!(Region::new(99, 99, 1, 1).validate(100, 100).is_ok());
        assert!(Region::new(0, 0, 100, 100).validate(100, 100).is_ok());
    }

    #[test]
    fn rejects_each_violated_bound() {
        assert_eq!(
            Region::new(0, 0, 0, 5).validate(100, 100),
            Err(RegionError::ZeroWidth)
        );
        assert_eq!(
            Region::new(0, 0, 5, 0).validate(100, 100),
            Err(RegionError::ZeroHeight)
        );
        assert_eq!(
            Region::new(100, 0, 1, 1).validate(100, 100),
            Err(RegionError::XOutsideRaster)
        );
        assert_eq!(
            Region::new(98, 0, 5, 5).validate(100, 100),
            Err(RegionError::XPlusWidthOutsideRaster)
        );
        assert_eq!(
            Region::new(0, 100, 1, 1).validate(100, 100),
            Err(RegionError::YOutsideRaster)
        );
        assert_eq!(
            Region::new(0, 98, 5, 5).validate(100, 100),
            Err(RegionError::YPlusHeightOutsideRaster)
        );
    }

    #[test]
    fn validity_matches_the_containment_predicate() {
        let image = (7u32, 5u32);
        for x in 0..9 {
            for y in 0..7 {
                for width in 0..9 {
                    for height in 0..7 {
                        let contained = width > 0
                            && height > 0
                            && x < image.0
                            && y < image.1
                            && x + width <= image.0
                            && y + height <= image.1;
                        let region = Region::new(x, y, width, height);
                        assert_eq!(
                            region.validate(image.0, image.1).is_ok(),
                            contained,
                            "mismatch for {region:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn full_image_request_collapses() {
        assert_eq!(normalize(None, 100, 100).unwrap(), None);
        assert_eq!(
            normalize(Some(Region::new(0, 0, 100, 100)), 100, 100).unwrap(),
            None
        );
        assert_eq!(
            normalize(Some(Region::new(0, 0, 99, 100)), 100, 100).unwrap(),
            Some(Region::new(0, 0, 99, 100))
        );
    }

    #[test]
    fn huge_offsets_do_not_wrap() {
        assert_eq!(
            Region::new(u32::MAX, 0, u32::MAX, 1).validate(100, 100),
            Err(RegionError::XOutsideRaster)
        );
        assert_eq!(
            Region::new(1, 0, u32::MAX, 1).validate(100, 100),
            Err(RegionError::XPlusWidthOutsideRaster)
        );
    }
}
