//! # Image metadata map
//!
//! The crate never encodes nor decodes an image container itself. It works on a plain
//! key-path value map, [`ExifMap`], made of three image file directories (IFDs) keyed by EXIF
//! tag number:
//!
//! ```text
//! ExifMap
//! ├── primary  (0th IFD)
//! ├── exif     (Exif IFD: DateTimeOriginal, SceneType, ...)
//! └── gps      (GPS IFD: latitude, longitude, date/time stamps, ...)
//! ```
//!
//! Reading and persisting the map is delegated to a [`MetadataCodec`]. The crate ships
//! [`JsonSidecarCodec`](crate::metadata::sidecar::JsonSidecarCodec), which keeps the map in a
//! JSON document next to each image.
//!
//! ## Helpers
//!
//! * [`ExifMap::has_location`] – does the target already carry a position?
//! * [`ExifMap::shooting_time`] – `DateTimeOriginal` anchored at the configured civil offset.
//! * [`ExifMap::normalize_scene_type`] – repairs a numeric `SceneType`, which EXIF requires to
//!   be a single undefined byte.
pub mod sidecar;

use std::collections::BTreeMap;

use camino::Utf8Path;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{exif_tag, gps_tag, Rational},
    geotag_errors::GeotagError,
    time::parse_date_time_original,
};

/// Value of one EXIF field, tagged by its EXIF type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExifValue {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    Undefined(Vec<u8>),
}

impl ExifValue {
    /// Text content of an ASCII field, or of a byte field holding UTF-8
    pub fn as_text(&self) -> Option<String> {
        match self {
            ExifValue::Ascii(s) => Some(s.clone()),
            ExifValue::Byte(b) | ExifValue::Undefined(b) => {
                std::str::from_utf8(b).ok().map(str::to_string)
            }
            _ => None,
        }
    }

    /// First numeric value of a SHORT or LONG field
    fn as_integer(&self) -> Option<u32> {
        match self {
            ExifValue::Short(v) => v.first().map(|x| *x as u32),
            ExifValue::Long(v) => v.first().copied(),
            _ => None,
        }
    }
}

/// One image file directory: EXIF tag number → value
pub type IfdMap = BTreeMap<u16, ExifValue>;

/// The metadata of one image, split by IFD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifMap {
    #[serde(default)]
    pub primary: IfdMap,
    #[serde(default)]
    pub exif: IfdMap,
    #[serde(default)]
    pub gps: IfdMap,
}

impl ExifMap {
    /// True when the GPS IFD already holds both coordinates and their references
    pub fn has_location(&self) -> bool {
        [
            gps_tag::LATITUDE_REF,
            gps_tag::LATITUDE,
            gps_tag::LONGITUDE_REF,
            gps_tag::LONGITUDE,
        ]
        .iter()
        .all(|tag| self.gps.contains_key(tag))
    }

    /// Shooting time of the image
    ///
    /// Arguments
    /// ---------
    /// * `offset`: the civil offset the camera clock was set to
    ///
    /// Return
    /// ------
    /// * `Ok(None)` when `DateTimeOriginal` is absent
    /// * `Ok(Some(time))` when it parses
    /// * [`GeotagError::TimestampFormat`] when it is present but malformed
    pub fn shooting_time(
        &self,
        offset: FixedOffset,
    ) -> Result<Option<DateTime<FixedOffset>>, GeotagError> {
        let Some(value) = self.exif.get(&exif_tag::DATE_TIME_ORIGINAL) else {
            return Ok(None);
        };
        let raw = value.as_text().ok_or_else(|| {
            GeotagError::TimestampFormat(format!("DateTimeOriginal is not text ({value:?})"))
        })?;
        parse_date_time_original(&raw, offset).map(Some)
    }

    /// Rewrite a numeric `SceneType` as a single undefined byte
    ///
    /// Return
    /// ------
    /// * `Ok(true)` if the field was rewritten
    /// * [`GeotagError::InvalidExifValue`] if the number does not fit in a byte
    pub fn normalize_scene_type(&mut self) -> Result<bool, GeotagError> {
        let Some(value) = self
            .exif
            .get(&exif_tag::SCENE_TYPE)
            .and_then(ExifValue::as_integer)
        else {
            return Ok(false);
        };
        let byte = u8::try_from(value).map_err(|_| {
            GeotagError::InvalidExifValue(format!("SceneType {value} does not fit in a byte"))
        })?;
        self.exif
            .insert(exif_tag::SCENE_TYPE, ExifValue::Undefined(vec![byte]));
        Ok(true)
    }
}

/// Read and persist the metadata of target images
///
/// Implementations own the container format. The orchestrator only hands them an
/// [`ExifMap`] already merged with the location patch.
pub trait MetadataCodec {
    /// Decode the metadata of the image at `path`
    fn read(&self, path: &Utf8Path) -> Result<ExifMap, GeotagError>;

    /// Persist `metadata` together with the image `source` at `destination`
    fn write(
        &self,
        metadata: &ExifMap,
        source: &Utf8Path,
        destination: &Utf8Path,
    ) -> Result<(), GeotagError>;
}

#[cfg(test)]
mod metadata_test {
    use super::*;
    use crate::time::{default_utc_offset, parse_timestamp};

    fn located() -> ExifMap {
        let mut map = ExifMap::default();
        map.gps
            .insert(gps_tag::LATITUDE_REF, ExifValue::Ascii("N".into()));
        map.gps.insert(
            gps_tag::LATITUDE,
            ExifValue::Rational(vec![(35, 1), (30, 1), (0, 1)]),
        );
        map.gps
            .insert(gps_tag::LONGITUDE_REF, ExifValue::Ascii("E".into()));
        map.gps.insert(
            gps_tag::LONGITUDE,
            ExifValue::Rational(vec![(139, 1), (45, 1), (0, 1)]),
        );
        map
    }

    #[test]
    fn test_has_location() {
        assert!(!ExifMap::default().has_location());
        assert!(located().has_location());

        let mut partial = located();
        partial.gps.remove(&gps_tag::LONGITUDE_REF);
        assert!(!partial.has_location());
    }

    #[test]
    fn test_shooting_time() {
        let offset = default_utc_offset();
        let mut map = ExifMap::default();
        assert_eq!(map.shooting_time(offset), Ok(None));

        map.exif.insert(
            exif_tag::DATE_TIME_ORIGINAL,
            ExifValue::Ascii("2018:04:16 12:22:42".into()),
        );
        assert_eq!(
            map.shooting_time(offset).unwrap(),
            Some(parse_timestamp("2018-04-16T03:22:42Z").unwrap())
        );

        map.exif.insert(
            exif_tag::DATE_TIME_ORIGINAL,
            ExifValue::Undefined(b"2018:04:16 12:22:42".to_vec()),
        );
        assert!(map.shooting_time(offset).unwrap().is_some());

        map.exif.insert(
            exif_tag::DATE_TIME_ORIGINAL,
            ExifValue::Ascii("yesterday".into()),
        );
        assert!(matches!(
            map.shooting_time(offset),
            Err(GeotagError::TimestampFormat(_))
        ));
    }

    #[test]
    fn test_normalize_scene_type() {
        let mut map = ExifMap::default();
        assert_eq!(map.normalize_scene_type(), Ok(false));

        map.exif
            .insert(exif_tag::SCENE_TYPE, ExifValue::Short(vec![1]));
        assert_eq!(map.normalize_scene_type(), Ok(true));
        assert_eq!(
            map.exif.get(&exif_tag::SCENE_TYPE),
            Some(&ExifValue::Undefined(vec![1]))
        );

        // already a byte: untouched
        assert_eq!(map.normalize_scene_type(), Ok(false));

        map.exif
            .insert(exif_tag::SCENE_TYPE, ExifValue::Long(vec![255]));
        assert_eq!(map.normalize_scene_type(), Ok(true));
        assert_eq!(
            map.exif.get(&exif_tag::SCENE_TYPE),
            Some(&ExifValue::Undefined(vec![255]))
        );
    }

    #[test]
    fn test_normalize_scene_type_out_of_range() {
        let mut map = ExifMap::default();
        map.exif
            .insert(exif_tag::SCENE_TYPE, ExifValue::Short(vec![257]));

        assert!(matches!(
            map.normalize_scene_type(),
            Err(GeotagError::InvalidExifValue(msg)) if msg.contains("257")
        ));
        // left as found
        assert_eq!(
            map.exif.get(&exif_tag::SCENE_TYPE),
            Some(&ExifValue::Short(vec![257]))
        );
    }
}
