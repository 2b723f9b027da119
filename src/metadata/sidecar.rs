use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{constants::SIDECAR_SUFFIX, geotag_errors::GeotagError};

use super::{ExifMap, MetadataCodec};

/// Metadata codec keeping the [`ExifMap`] of `photo.jpg` in `photo.jpg.exif.json`
///
/// Writing stores the merged map as the destination's sidecar, then copies the image bytes
/// untouched to the destination. A failed copy removes the sidecar again.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSidecarCodec;

/// Path of the sidecar document describing `image`
pub fn sidecar_path(image: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{image}{SIDECAR_SUFFIX}"))
}

impl MetadataCodec for JsonSidecarCodec {
    fn read(&self, path: &Utf8Path) -> Result<ExifMap, GeotagError> {
        let sidecar = sidecar_path(path);
        if !sidecar.is_file() {
            return Err(GeotagError::MetadataNotFound(path.to_string()));
        }

        let text = fs::read_to_string(&sidecar)?;
        serde_json::from_str(&text).map_err(|e| GeotagError::SidecarFormat(format!("{sidecar}: {e}")))
    }

    fn write(
        &self,
        metadata: &ExifMap,
        source: &Utf8Path,
        destination: &Utf8Path,
    ) -> Result<(), GeotagError> {
        let text = serde_json::to_string_pretty(metadata)
            .map_err(|e| GeotagError::SidecarFormat(format!("{destination}: {e}")))?;

        // an image is never left at `destination` without its sidecar
        let sidecar = sidecar_path(destination);
        fs::write(&sidecar, text)?;
        if let Err(e) = fs::copy(source, destination) {
            let _ = fs::remove_file(&sidecar);
            return Err(e.into());
        }
        Ok(())
    }
}
