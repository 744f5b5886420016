//! Guard for planar (non-interleaved) sample storage.

use crate::directory::Directory;
use crate::error::{TiffResult, TiffUnsupportedError};
use crate::tags::{PhotometricInterpretation, PlanarConfiguration, Tag};

/// Planar storage keeps each sample in its own plane of strips. Only the
/// 24-bit RGB, strip-organized form of it is accepted: anything that is not
/// RGB fails outright, and so does tiled storage.
///
/// The 24-bit depth itself is not enforced at this point; a planar RGB image
/// with another depth passes the guard and is rejected later by the data
/// reader that cannot unpack its planes.
pub(crate) fn check_planar_configuration(
    directory: &Directory,
    planar_configuration: PlanarConfiguration,
    photometric_interpretation: u16,
) -> TiffResult<()> {
    if planar_configuration != PlanarConfiguration::Planar {
        return Ok(());
    }

    if photometric_interpretation != PhotometricInterpretation::RGB.to_u16() {
        return Err(
            TiffUnsupportedError::PlanarInterpretation(photometric_interpretation).into(),
        );
    }

    if !directory.contains(Tag::StripOffsets) {
        return Err(TiffUnsupportedError::PlanarTiles.into());
    }

    Ok(())
}
