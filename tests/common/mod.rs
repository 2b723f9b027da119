#![allow(dead_code)]

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use timeline_geotag::{
    constants::exif_tag,
    metadata::{sidecar::sidecar_path, ExifMap, ExifValue},
};

/// Temporary workspace holding `picture/`, `google/` and `output/`
pub struct Workspace {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Workspace { _dir: dir, root }
    }

    pub fn picture(&self) -> Utf8PathBuf {
        self.root.join("picture")
    }

    pub fn google(&self) -> Utf8PathBuf {
        self.root.join("google")
    }

    pub fn output(&self) -> Utf8PathBuf {
        self.root.join("output")
    }

    /// Write a location history file under `google/`
    pub fn write_timeline(&self, relative: &str, content: &str) -> Utf8PathBuf {
        write_file(&self.google().join(relative), content.as_bytes())
    }

    /// Write an image under `picture/` together with its metadata sidecar
    pub fn write_image(&self, relative: &str, metadata: &ExifMap) -> Utf8PathBuf {
        let image = write_file(&self.picture().join(relative), b"\xFF\xD8\xFF\xE0 jpeg");
        fs::write(
            sidecar_path(&image),
            serde_json::to_string(metadata).unwrap(),
        )
        .unwrap();
        image
    }
}

pub fn write_file(path: &Utf8Path, content: &[u8]) -> Utf8PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_owned()
}

/// Metadata of an image shot at `date_time_original` (`YYYY:MM:DD HH:MM:SS`)
pub fn shot_at(date_time_original: &str) -> ExifMap {
    let mut map = ExifMap::default();
    map.exif.insert(
        exif_tag::DATE_TIME_ORIGINAL,
        ExifValue::Ascii(date_time_original.into()),
    );
    map
}

/// A month of location history: a drive to Motosuko, then a visit there (JST 12:22 - 14:35)
pub const APRIL_2018: &str = r#"{"timelineObjects": [
    {"activitySegment": {
        "startLocation": {"latitudeE7": 355050042, "longitudeE7": 1387341570},
        "endLocation": {"latitudeE7": 354423067, "longitudeE7": 1386030378},
        "duration": {"startTimestamp": "2018-04-16T03:22:42.995Z",
                     "endTimestamp": "2018-04-16T05:19:38.001Z"},
        "simplifiedRawPath": {"points": [
            {"latE7": 355000000, "lngE7": 1387000000, "accuracyMeters": 10,
             "timestamp": "2018-04-16T04:00:00Z"}
        ]}
    }},
    {"placeVisit": {
        "location": {"latitudeE7": 354423067, "longitudeE7": 1386030378,
                     "name": "Fuji Motosuko Resort"},
        "duration": {"startTimestamp": "2018-04-16T05:19:38.001Z",
                     "endTimestamp": "2018-04-16T05:35:21.010Z"}
    }}
]}"#;

/// A second export overlapping the first one in time
pub const APRIL_2018_OVERLAP: &str = r#"{"timelineObjects": [
    {"placeVisit": {
        "location": {"latitudeE7": 356580000, "longitudeE7": 1397016000},
        "duration": {"startTimestamp": "2018-04-16T03:50:00Z",
                     "endTimestamp": "2018-04-16T04:07:00Z"}
    }},
    {"activitySegment": {
        "startLocation": {"latitudeE7": -338688000, "longitudeE7": 1512093000},
        "duration": {"startTimestamp": "2018-04-16T02:00:00Z",
                     "endTimestamp": "2018-04-16T06:00:00Z"}
    }}
]}"#;
