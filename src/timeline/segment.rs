use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Deserializer};

use crate::{
    constants::{Degree, VISIT_INTERPOLATION_STEP_SEC},
    conversion::e7_to_degree,
    geotag_errors::GeotagError,
    observations::LocationObservation,
    time::parse_timestamp,
};

/// Root of a location history export file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFile {
    pub timeline_objects: Vec<TimelineObject>,
}

/// One entry of `timelineObjects`, holding one of the two segment shapes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineObject {
    pub activity_segment: Option<ActivitySegment>,
    pub place_visit: Option<PlaceVisit>,
}

impl TimelineObject {
    /// The segment carried by this entry, a transit winning over a visit
    pub fn into_segment(self) -> Option<Segment> {
        match (self.activity_segment, self.place_visit) {
            (Some(transit), _) => Some(Segment::Transit(transit)),
            (None, Some(visit)) => Some(Segment::Visit(visit)),
            (None, None) => None,
        }
    }
}

/// A segment of the export, discarded once normalized into observations
#[derive(Debug)]
pub enum Segment {
    Transit(ActivitySegment),
    Visit(PlaceVisit),
}

impl Segment {
    /// Normalize the segment into observations, in construction order
    ///
    /// Arguments
    /// ---------
    /// * `offset`: the civil offset every produced timestamp is expressed in
    ///
    /// Return
    /// ------
    /// * the observations of the segment, possibly none
    /// * [`GeotagError::InvalidFileFormat`] if a location block is structurally incomplete
    pub fn normalize(&self, offset: FixedOffset) -> Result<Vec<LocationObservation>, GeotagError> {
        match self {
            Segment::Transit(transit) => transit.normalize(offset),
            Segment::Visit(visit) => visit.normalize(offset),
        }
    }
}

/// Movement between two places (`activitySegment`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    pub start_location: Option<LocationE7>,
    pub end_location: Option<LocationE7>,
    pub duration: Duration,
    pub simplified_raw_path: Option<RawPath>,
}

impl ActivitySegment {
    /// Start, end, then every path point, each at its own time
    fn normalize(&self, offset: FixedOffset) -> Result<Vec<LocationObservation>, GeotagError> {
        let mut observations = Vec::new();
        let endpoints = [
            (&self.start_location, self.duration.start_timestamp),
            (&self.end_location, self.duration.end_timestamp),
        ];

        for (location, timestamp) in endpoints {
            let Some(location) = location else { continue };
            if let Some((lat, lon)) = location.position()? {
                observations.push(LocationObservation::new(
                    timestamp.with_timezone(&offset),
                    lat,
                    lon,
                    None,
                ));
            }
        }

        let Some(path) = &self.simplified_raw_path else {
            return Ok(observations);
        };
        observations.extend(path.points.iter().map(|p| {
            LocationObservation::new(
                p.timestamp.with_timezone(&offset),
                e7_to_degree(p.lat_e7),
                e7_to_degree(p.lng_e7),
                None,
            )
        }));

        Ok(observations)
    }
}

/// Stay at a single place (`placeVisit`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceVisit {
    pub location: Option<LocationE7>,
    pub duration: Duration,
    pub name: Option<String>,
}

impl PlaceVisit {
    /// Arrival, a sample every five minutes while more than five minutes remain, departure
    fn normalize(&self, offset: FixedOffset) -> Result<Vec<LocationObservation>, GeotagError> {
        let Some(location) = &self.location else {
            return Ok(Vec::new());
        };
        let Some((lat, lon)) = location.position()? else {
            return Ok(Vec::new());
        };

        let name = self.name.clone().or_else(|| location.name.clone());
        let at = |timestamp: DateTime<FixedOffset>| {
            LocationObservation::new(timestamp, lat, lon, name.clone())
        };

        let start = self.duration.start_timestamp.with_timezone(&offset);
        let end = self.duration.end_timestamp.with_timezone(&offset);
        let step = TimeDelta::seconds(VISIT_INTERPOLATION_STEP_SEC);

        let mut observations = vec![at(start)];
        let mut current = start;
        while end - current > step {
            current += step;
            observations.push(at(current));
        }
        observations.push(at(end));

        Ok(observations)
    }
}

/// A location block with E7 coordinates
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationE7 {
    pub latitude_e7: Option<i64>,
    pub longitude_e7: Option<i64>,
    pub name: Option<String>,
}

impl LocationE7 {
    /// Position in degrees
    ///
    /// Return
    /// ------
    /// * `Ok(None)` when the block carries no `latitudeE7`
    /// * [`GeotagError::InvalidFileFormat`] when `latitudeE7` comes without `longitudeE7`
    pub fn position(&self) -> Result<Option<(Degree, Degree)>, GeotagError> {
        let Some(lat) = self.latitude_e7 else {
            return Ok(None);
        };
        let lon = self.longitude_e7.ok_or_else(|| {
            GeotagError::InvalidFileFormat("Json key 'longitudeE7' not found.".into())
        })?;
        Ok(Some((e7_to_degree(lat), e7_to_degree(lon))))
    }
}

/// Time span of a segment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duration {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_timestamp: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_timestamp: DateTime<FixedOffset>,
}

/// Dense path recorded during a transit
#[derive(Debug, Deserialize)]
pub struct RawPath {
    pub points: Vec<PathPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub lat_e7: i64,
    pub lng_e7: i64,
    pub accuracy_meters: Option<f64>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
