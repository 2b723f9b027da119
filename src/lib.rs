//! # timeline_geotag
//!
//! Geotag photos from a semantic location history export.
//!
//! The pipeline:
//!
//! 1. [`timeline`] reads each monthly location history file and normalizes its transit and
//!    visit segments into [`LocationObservation`]s;
//! 2. [`location_log`] merges every file into one time-sorted [`LocationLog`] and answers
//!    nearest-timestamp queries within a tolerance;
//! 3. [`observations`] projects a matched observation into the GPS IFD of an image's
//!    [`metadata::ExifMap`], using the coordinate codecs of [`conversion`];
//! 4. [`geotag`] drives a run over two directory trees and reports through [`events`].
pub mod constants;
pub mod conversion;
pub mod events;
pub mod geotag;
pub mod geotag_errors;
pub mod location_log;
pub mod metadata;
pub mod observations;
pub mod time;
pub mod timeline;

pub use geotag::{Geotagger, GeotagConfig, RunReport};
pub use geotag_errors::GeotagError;
pub use location_log::{LocationLog, LocationLogBuilder};
pub use observations::LocationObservation;
