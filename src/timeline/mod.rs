//! # Location history ingestion
//!
//! Parses the semantic location history export (one JSON file per month) and normalizes its
//! heterogeneous segments into a flat list of
//! [`LocationObservation`](crate::observations::LocationObservation)s.
//!
//! ## File layout
//!
//! ```text
//! {
//!   "timelineObjects": [
//!     { "activitySegment": { "startLocation": {..}, "endLocation": {..},
//!                            "duration": {..}, "simplifiedRawPath": { "points": [..] } } },
//!     { "placeVisit":      { "location": {..}, "duration": {..} } },
//!     ...
//!   ]
//! }
//! ```
//!
//! Coordinates are E7 integers (`latitudeE7`/`longitudeE7`, `latE7`/`lngE7`), timestamps are
//! ISO-8601 with or without milliseconds.
//!
//! ## Normalization
//!
//! * **Transit** (`activitySegment`): start position at the start time, end position at the end
//!   time, then every path point at its own time. Each of the three is optional.
//! * **Stationary visit** (`placeVisit`): arrival, then a sample every five minutes while more
//!   than five minutes remain, then departure at the exact end time. A visit without position
//!   yields nothing.
//!
//! ## Error semantics
//!
//! Problems are reported per **file**: invalid JSON, a missing required key (`timelineObjects`,
//! `duration`, path `points`, a `longitudeE7` next to a `latitudeE7`) or a malformed timestamp
//! reject the whole file with [`GeotagError::InvalidFileFormat`](crate::geotag_errors::GeotagError::InvalidFileFormat).
//! Entries holding neither segment shape are ignored.
pub mod segment;
pub mod timeline_reader;

pub use segment::{Segment, TimelineFile, TimelineObject};
pub use timeline_reader::{parse_timeline_str, read_timeline_file};
