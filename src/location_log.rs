//! # Location log: time index and nearest-timestamp matching
//!
//! A [`LocationLog`] is the merged, time-sorted sequence of every observation loaded during a
//! run. It is assembled with a [`LocationLogBuilder`], which concatenates the observations of
//! each source file and performs the **single** stable sort in [`LocationLogBuilder::build`].
//! Once built, the log is read-only and answers repeated point queries.
//!
//! ## Matching
//!
//! [`LocationLog::match_at`] locates the insertion point of the query with a binary search and
//! compares the two neighbours around it:
//!
//! * the candidate with the smallest **absolute** time delta wins;
//! * on equal deltas the earlier entry wins, and among entries sharing a timestamp the first
//!   one in log order wins;
//! * the candidate is accepted only if `|candidate - query| <= tolerance`, compared at full
//!   precision (no rounding to milliseconds).
//!
//! A search that simply returns the index where its pointers collide can land on the farther
//! neighbour, and a one-sided `candidate - query <= tolerance` test accepts any candidate
//! earlier than the query. Both are avoided here, see the regression tests below.
//!
//! ## Example
//!
//! ```rust
//! use timeline_geotag::location_log::LocationLogBuilder;
//! use timeline_geotag::observations::LocationObservation;
//! use timeline_geotag::time::parse_timestamp;
//!
//! let at = |ts: &str| LocationObservation::new(parse_timestamp(ts).unwrap(), 35.0, 139.0, None);
//!
//! let mut builder = LocationLogBuilder::new();
//! builder.add_observations(vec![at("2018-04-16T05:10:00Z"), at("2018-04-16T05:00:00Z")]);
//! let log = builder.build();
//!
//! let query = parse_timestamp("2018-04-16T05:02:00Z").ok();
//! let found = log.match_at(query, 300).unwrap();
//! assert_eq!(found.timestamp(), parse_timestamp("2018-04-16T05:00:00Z").unwrap());
//! ```
use camino::Utf8Path;
use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::{
    geotag_errors::GeotagError, observations::LocationObservation,
    timeline::read_timeline_file,
};

/// Accumulates observations from any number of sources before the single global sort
#[derive(Debug, Default)]
pub struct LocationLogBuilder {
    pending: Vec<LocationObservation>,
}

impl LocationLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append already normalized observations, keeping their order
    pub fn add_observations(&mut self, observations: Vec<LocationObservation>) -> &mut Self {
        self.pending.extend(observations);
        self
    }

    /// Read a location history file and append its observations
    ///
    /// Nothing is appended if the file is rejected, so a failing file never leaves a partial
    /// contribution behind.
    ///
    /// Arguments
    /// ---------
    /// * `path`: a `.json` location history file
    /// * `offset`: the civil offset every timestamp is normalized to
    ///
    /// Return
    /// ------
    /// * the number of observations read from the file
    /// * the reader error otherwise, see [`read_timeline_file`]
    pub fn add_from_timeline(
        &mut self,
        path: &Utf8Path,
        offset: FixedOffset,
    ) -> Result<usize, GeotagError> {
        let observations = read_timeline_file(path, offset)?;
        let count = observations.len();
        self.pending.extend(observations);
        Ok(count)
    }

    /// Number of observations gathered so far
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Sort everything once, by timestamp, and freeze the result
    ///
    /// The sort is stable: observations sharing a timestamp keep their concatenation order.
    pub fn build(self) -> LocationLog {
        let mut observations = self.pending;
        observations.sort_by_key(LocationObservation::timestamp);
        LocationLog { observations }
    }
}

/// Time-sorted, read-only sequence of observations
#[derive(Debug, Clone, Default)]
pub struct LocationLog {
    observations: Vec<LocationObservation>,
}

impl LocationLog {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationObservation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[LocationObservation] {
        &self.observations
    }

    /// First and last timestamps of the log, `None` when empty
    pub fn time_span(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Some((
            self.observations.first()?.timestamp(),
            self.observations.last()?.timestamp(),
        ))
    }

    /// Index of the first observation at or after `query`
    fn insertion_point(&self, query: DateTime<FixedOffset>) -> usize {
        self.observations.partition_point(|o| o.timestamp() < query)
    }

    /// The observation closest in time to `query`, whatever the distance
    ///
    /// Return
    /// ------
    /// * `None` only when the log is empty
    pub fn nearest(&self, query: DateTime<FixedOffset>) -> Option<&LocationObservation> {
        let idx = self.insertion_point(query);
        let after = self.observations.get(idx);
        let before = idx
            .checked_sub(1)
            .and_then(|i| self.observations.get(i))
            // first entry of a run of identical timestamps
            .map(|o| &self.observations[self.insertion_point(o.timestamp())]);

        match (before, after) {
            (Some(b), Some(a)) => {
                if delta(b, query) <= delta(a, query) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (b, a) => b.or(a),
        }
    }

    /// Match a shooting time against the log
    ///
    /// Arguments
    /// ---------
    /// * `query`: the shooting time, `None` when the caller could not determine it
    /// * `tolerance_sec`: the largest accepted absolute time delta, in seconds
    ///
    /// Return
    /// ------
    /// * the nearest observation if it lies within `tolerance_sec` of `query`
    /// * `None` when `query` is absent, the log is empty or nothing is close enough
    pub fn match_at(
        &self,
        query: Option<DateTime<FixedOffset>>,
        tolerance_sec: u64,
    ) -> Option<&LocationObservation> {
        let query = query?;
        let candidate = self.nearest(query)?;
        let tolerance = i64::try_from(tolerance_sec)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        (delta(candidate, query) <= tolerance).then_some(candidate)
    }
}

/// Absolute time delta between an observation and a query, at full precision
fn delta(observation: &LocationObservation, query: DateTime<FixedOffset>) -> TimeDelta {
    (observation.timestamp() - query).abs()
}

impl<'a> IntoIterator for &'a LocationLog {
    type Item = &'a LocationObservation;
    type IntoIter = std::slice::Iter<'a, LocationObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
