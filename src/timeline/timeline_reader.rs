use std::fs;

use camino::Utf8Path;
use chrono::FixedOffset;
use itertools::Itertools;
use serde_json::error::Category;

use crate::{geotag_errors::GeotagError, observations::LocationObservation};

use super::segment::{TimelineFile, TimelineObject};

/// Parse the content of a location history file into observations
///
/// The result is **not** sorted: observations appear segment by segment, in construction
/// order. Global ordering is the job of
/// [`LocationLogBuilder::build`](crate::location_log::LocationLogBuilder::build).
///
/// Arguments
/// ---------
/// * `json`: the file content
/// * `offset`: the civil offset every produced timestamp is expressed in
///
/// Return
/// ------
/// * the observations of every segment of the file
/// * [`GeotagError::InvalidFileFormat`] if the content is not JSON, misses a required key, or
///   holds a malformed timestamp anywhere in the file
pub fn parse_timeline_str(
    json: &str,
    offset: FixedOffset,
) -> Result<Vec<LocationObservation>, GeotagError> {
    let timeline: TimelineFile = serde_json::from_str(json).map_err(|e| match e.classify() {
        Category::Data => GeotagError::InvalidFileFormat(e.to_string()),
        Category::Io | Category::Syntax | Category::Eof => {
            GeotagError::InvalidFileFormat("Json parse error.".into())
        }
    })?;

    timeline
        .timeline_objects
        .into_iter()
        .filter_map(TimelineObject::into_segment)
        .map(|segment| segment.normalize(offset))
        .flatten_ok()
        .collect()
}

/// Read a location history file (`.json`) into observations
///
/// See [`parse_timeline_str`] for the content rules. A file that cannot be read is reported
/// as [`GeotagError::IoError`].
pub fn read_timeline_file(
    path: &Utf8Path,
    offset: FixedOffset,
) -> Result<Vec<LocationObservation>, GeotagError> {
    let json = fs::read_to_string(path)?;
    parse_timeline_str(&json, offset)
}
