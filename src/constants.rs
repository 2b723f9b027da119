//! # Constants and type definitions for timeline_geotag
//!
//! This module centralizes the **scaling factors**, **run defaults**, **EXIF tag identifiers**
//! and **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Fixed-point encodings of the location history export (E7)
//! - Default values of a geotagging run (directories, tolerance, civil offset)
//! - Interpolation step for stationary visits
//! - EXIF tag numbers written or inspected by the crate
//! - Core type aliases

// -------------------------------------------------------------------------------------------------
// Coordinate encodings
// -------------------------------------------------------------------------------------------------

/// Scale of the E7 encoding: degrees × 10^7 truncated to an integer
pub const E7_SCALE: i64 = 10_000_000;

/// Minutes per degree, seconds per minute
pub const SEXAGESIMAL: f64 = 60.0;

// -------------------------------------------------------------------------------------------------
// Run defaults
// -------------------------------------------------------------------------------------------------

/// Directory searched recursively for images to geotag
pub const DEFAULT_DIR_JPEG_INPUT: &str = "./picture";

/// Root directory searched recursively for location history files
pub const DEFAULT_DIR_LOCATION_HISTORY: &str = "./google";

/// Directory receiving the geotagged images
pub const DEFAULT_DIR_OUTPUT: &str = "./output";

/// A shooting time and an observation closer than this (seconds) are considered a match
pub const DEFAULT_TOLERANCE_SEC: u64 = 5 * 60;

/// Civil offset applied to every consumed timestamp (+09:00)
pub const DEFAULT_UTC_OFFSET_SEC: i32 = 9 * 3600;

/// Image extensions accepted as geotagging targets (compared case-insensitively)
pub const DEFAULT_TARGET_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Extension of the location history export files
pub const LOCATION_HISTORY_EXTENSION: &str = "json";

/// Suffix appended to an image path to locate its metadata sidecar
pub const SIDECAR_SUFFIX: &str = ".exif.json";

/// Step between the synthetic "still here" samples of a stationary visit (seconds)
pub const VISIT_INTERPOLATION_STEP_SEC: i64 = 5 * 60;

// -------------------------------------------------------------------------------------------------
// EXIF tags
// -------------------------------------------------------------------------------------------------

/// GPS IFD tag numbers (EXIF 2.3, section 4.6.6)
pub mod gps_tag {
    pub const VERSION_ID: u16 = 0;
    pub const LATITUDE_REF: u16 = 1;
    pub const LATITUDE: u16 = 2;
    pub const LONGITUDE_REF: u16 = 3;
    pub const LONGITUDE: u16 = 4;
    pub const TIME_STAMP: u16 = 7;
    pub const AREA_INFORMATION: u16 = 28;
    pub const DATE_STAMP: u16 = 29;
}

/// Exif IFD tag numbers
pub mod exif_tag {
    pub const DATE_TIME_ORIGINAL: u16 = 36867;
    pub const SCENE_TYPE: u16 = 41729;
}

/// Version written in `GPSVersionID` when the target carries none
pub const GPS_VERSION: [u8; 4] = [2, 0, 0, 0];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Unsigned EXIF rational as `(numerator, denominator)`
pub type Rational = (u32, u32);

/// Degree / minute / second triple of EXIF rationals
pub type Dms = [Rational; 3];
