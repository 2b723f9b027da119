//! # Location observations
//!
//! A [`LocationObservation`] records *where* someone was *when*: a timestamp, a latitude and a
//! longitude, and for samples derived from a stationary visit the display name of the place.
//!
//! Observations are plain immutable values. They are produced by the timeline
//! normalizer ([`crate::timeline`]), sorted once into a [`LocationLog`](crate::location_log::LocationLog),
//! and finally projected into the GPS IFD of a target image with
//! [`LocationObservation::to_patch`].
//!
//! ## GPS patch
//!
//! | Tag                  | Value                                            |
//! |----------------------|--------------------------------------------------|
//! | `GPSVersionID`       | `2.0.0.0`, only when the target carries none     |
//! | `GPSLatitudeRef`     | `N` / `S`                                        |
//! | `GPSLatitude`        | `(D/1, M/1, S/1)`                                |
//! | `GPSLongitudeRef`    | `E` / `W`                                        |
//! | `GPSLongitude`       | `(D/1, M/1, S/1)`                                |
//! | `GPSDateStamp`       | `YYYY:MM:DD` (UTC)                               |
//! | `GPSTimeStamp`       | `(h/1, m/1, s/1)` (UTC)                          |
//! | `GPSAreaInformation` | raw UTF-8 bytes of the place name, when known    |
use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::{
    constants::{gps_tag, Degree, GPS_VERSION},
    conversion::{degree_to_dms_ref, Axis},
    metadata::{ExifMap, ExifValue},
};

/// A position observed at a point in time, optionally at a named place
#[derive(Debug, Clone, PartialEq)]
pub struct LocationObservation {
    timestamp: DateTime<FixedOffset>,
    lat: Degree,
    lon: Degree,
    area_information: Option<String>,
}

impl LocationObservation {
    /// Create a new observation
    ///
    /// Arguments
    /// ---------
    /// * `timestamp`: the time of the observation
    /// * `lat`: latitude in degrees, positive north
    /// * `lon`: longitude in degrees, positive east
    /// * `area_information`: the display name of the place, if any
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        lat: Degree,
        lon: Degree,
        area_information: Option<String>,
    ) -> Self {
        LocationObservation {
            timestamp,
            lat,
            lon,
            area_information,
        }
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn lat(&self) -> Degree {
        self.lat
    }

    pub fn lon(&self) -> Degree {
        self.lon
    }

    pub fn area_information(&self) -> Option<&str> {
        self.area_information.as_deref()
    }

    /// Copy `metadata` and write this observation into the copy's GPS IFD
    ///
    /// The input map is left untouched, the returned map shares nothing with it.
    ///
    /// Arguments
    /// ---------
    /// * `metadata`: the current metadata of the target image
    ///
    /// Return
    /// ------
    /// * a new [`ExifMap`] carrying the position, the UTC date/time stamps and the place name
    pub fn to_patch(&self, metadata: &ExifMap) -> ExifMap {
        let mut patched = metadata.clone();
        let gps = &mut patched.gps;

        let (lat, lat_ref) = degree_to_dms_ref(self.lat, Axis::Latitude);
        let (lon, lon_ref) = degree_to_dms_ref(self.lon, Axis::Longitude);
        let utc = self.timestamp.with_timezone(&Utc);

        gps.entry(gps_tag::VERSION_ID)
            .or_insert_with(|| ExifValue::Byte(GPS_VERSION.to_vec()));
        gps.insert(gps_tag::LATITUDE_REF, ExifValue::Ascii(lat_ref.to_string()));
        gps.insert(gps_tag::LATITUDE, ExifValue::Rational(lat.to_vec()));
        gps.insert(gps_tag::LONGITUDE_REF, ExifValue::Ascii(lon_ref.to_string()));
        gps.insert(gps_tag::LONGITUDE, ExifValue::Rational(lon.to_vec()));
        gps.insert(
            gps_tag::DATE_STAMP,
            ExifValue::Ascii(utc.format("%Y:%m:%d").to_string()),
        );
        gps.insert(
            gps_tag::TIME_STAMP,
            ExifValue::Rational(vec![(utc.hour(), 1), (utc.minute(), 1), (utc.second(), 1)]),
        );
        if let Some(name) = &self.area_information {
            gps.insert(
                gps_tag::AREA_INFORMATION,
                ExifValue::Undefined(name.as_bytes().to_vec()),
            );
        }

        patched
    }
}

impl fmt::Display for LocationObservation {
    /// `(lat, lon)` followed by `,name` when the place is known
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)?;
        if let Some(name) = &self.area_information {
            write!(f, ",{name}")?;
        }
        Ok(())
    }
}
