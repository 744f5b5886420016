//! Alpha channel semantics of four-sample RGB images.

use crate::directory::Directory;
use crate::error::TiffResult;
use crate::tags::{ExtraSamples, PhotometricInterpretation, Tag};

/// Whether a decoded image carries an alpha channel, and if so, whether the
/// color values are premultiplied by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlphaInfo {
    pub has_alpha: bool,
    pub is_premultiplied: bool,
}

impl AlphaInfo {
    const OPAQUE: AlphaInfo = AlphaInfo {
        has_alpha: false,
        is_premultiplied: false,
    };

    const STRAIGHT: AlphaInfo = AlphaInfo {
        has_alpha: true,
        is_premultiplied: false,
    };

    const PREMULTIPLIED: AlphaInfo = AlphaInfo {
        has_alpha: true,
        is_premultiplied: true,
    };
}

/// Determine the alpha semantics of the fourth sample of an RGB image.
///
/// Anything that is not four-sample RGB never carries alpha here. For
/// four-sample RGB the extra-samples tag decides; a missing tag is not
/// defined by the specification and is interpreted as unassociated alpha
/// (ARGB), which is what files without the tag mean in practice.
pub(crate) fn resolve_alpha(
    directory: &Directory,
    photometric_interpretation: u16,
    samples_per_pixel: u16,
) -> TiffResult<AlphaInfo> {
    if photometric_interpretation != PhotometricInterpretation::RGB.to_u16()
        || samples_per_pixel != 4
    {
        return Ok(AlphaInfo::OPAQUE);
    }

    let extra_samples = directory
        .find_tag(Tag::ExtraSamples)
        .cloned()
        .map(|value| value.into_u16_vec())
        .transpose()?;

    let Some(code) = extra_samples.and_then(|values| values.first().copied()) else {
        return Ok(AlphaInfo::STRAIGHT);
    };

    Ok(match ExtraSamples::from_u16(code) {
        Some(ExtraSamples::UnassociatedAlpha) => AlphaInfo::STRAIGHT,
        Some(ExtraSamples::AssociatedAlpha) => AlphaInfo::PREMULTIPLIED,
        Some(ExtraSamples::Unspecified) | None => AlphaInfo::OPAQUE,
    })
}
