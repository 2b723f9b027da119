mod common;

use approx::assert_relative_eq;
use timeline_geotag::{
    constants::{exif_tag, gps_tag},
    events::{MemorySink, RunEvent, SkipSeverity},
    geotag::{EarlyExit, FileOutcome, FileStatus, GeotagConfig, Geotagger, RunReport},
    geotag_errors::GeotagError,
    metadata::{
        sidecar::{sidecar_path, JsonSidecarCodec},
        ExifValue, MetadataCodec,
    },
};

use common::{shot_at, Workspace, APRIL_2018, APRIL_2018_OVERLAP};

fn geotagger(ws: &Workspace) -> Geotagger<JsonSidecarCodec> {
    let config = GeotagConfig::builder()
        .jpeg_input_dir(ws.picture())
        .location_history_dir(ws.google())
        .output_dir(ws.output())
        .build()
        .unwrap();
    Geotagger::new(config, JsonSidecarCodec)
}

fn outcome<'a>(report: &'a RunReport, ws: &Workspace, relative: &str) -> &'a FileOutcome {
    let path = ws.picture().join(relative);
    report
        .outcomes
        .iter()
        .find(|o| o.path == path)
        .unwrap_or_else(|| panic!("no outcome for {relative}"))
}

/// Location history with one broken export, and a tree of images covering every outcome
fn populated_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.write_timeline("2018/2018_APRIL.json", APRIL_2018);
    ws.write_timeline("2018/2018_APRIL_shared.json", APRIL_2018_OVERLAP);
    ws.write_timeline("2018/2018_MAY.json", "{ this is not json");
    common::write_file(&ws.google().join("archive_browser.html"), b"<html/>");

    // 05:25:00Z, 22 s after the first visit sample
    ws.write_image("day1/added.jpg", &shot_at("2018:04:16 14:25:00"));
    // 04:00:00Z, both a path point and a sample of the overlapping visit
    ws.write_image("day1/UPPER.JPG", &shot_at("2018:04:16 13:00:00"));

    let mut located = shot_at("2018:04:16 14:25:00");
    located
        .gps
        .insert(gps_tag::LATITUDE_REF, ExifValue::Ascii("N".into()));
    located
        .gps
        .insert(gps_tag::LATITUDE, ExifValue::Rational(vec![(1, 1), (0, 1), (0, 1)]));
    located
        .gps
        .insert(gps_tag::LONGITUDE_REF, ExifValue::Ascii("E".into()));
    located
        .gps
        .insert(gps_tag::LONGITUDE, ExifValue::Rational(vec![(2, 1), (0, 1), (0, 1)]));
    ws.write_image("day2/located.jpg", &located);

    ws.write_image("day2/far.jpg", &shot_at("2018:04:17 09:00:00"));
    ws.write_image("bad.jpg", &shot_at("2018-04-16 14:25"));

    let mut scene = shot_at("2018:04:16 12:22:43");
    scene
        .exif
        .insert(exif_tag::SCENE_TYPE, ExifValue::Short(vec![1]));
    ws.write_image("scene.jpeg", &scene);

    common::write_file(&ws.picture().join("notes.txt"), b"not an image");
    ws
}

#[test]
fn test_end_to_end_run() {
    let ws = populated_workspace();
    let tagger = geotagger(&ws);
    let mut sink = MemorySink::default();

    let report = tagger.run(&mut sink).unwrap();

    assert_eq!(report.early_exit, None);
    assert_eq!(report.source_files, 3);
    assert_eq!(report.loaded_files, 2);
    assert_eq!(report.observations, 14);
    assert_eq!(report.outcomes.len(), 6);

    let added = outcome(&report, &ws, "day1/added.jpg");
    assert_eq!(added.status, FileStatus::Added);
    let observation = added.observation.as_ref().unwrap();
    assert_eq!(observation.area_information(), Some("Fuji Motosuko Resort"));
    assert!(added
        .success_msg
        .as_deref()
        .unwrap()
        .ends_with(",Fuji Motosuko Resort"));

    // equal timestamps: the file read first wins
    let upper = outcome(&report, &ws, "day1/UPPER.JPG");
    assert_eq!(upper.status, FileStatus::Added);
    assert_relative_eq!(upper.observation.as_ref().unwrap().lat(), 35.5);

    assert_eq!(
        outcome(&report, &ws, "day2/located.jpg").status,
        FileStatus::Skipped
    );
    let far = outcome(&report, &ws, "day2/far.jpg");
    assert_eq!(far.status, FileStatus::Skipped);
    assert!(far.observation.is_none());

    let bad = outcome(&report, &ws, "bad.jpg");
    assert_eq!(bad.status, FileStatus::Failed);
    assert!(bad
        .error_msg
        .as_deref()
        .unwrap()
        .starts_with("Unable to interpret timestamp"));

    let scene = outcome(&report, &ws, "scene.jpeg");
    assert_eq!(scene.status, FileStatus::Warned);
    assert_eq!(scene.observation.as_ref().unwrap().area_information(), None);

    assert_eq!(report.count(FileStatus::Added), 2);
    assert_eq!(report.count(FileStatus::Warned), 1);
    assert_eq!(report.count(FileStatus::Skipped), 2);
    assert_eq!(report.count(FileStatus::Failed), 1);

    assert!(sink.events.iter().any(|event| matches!(
        event,
        RunEvent::SourceSkipped { path, severity: SkipSeverity::InvalidFormat, .. }
            if path.as_str().ends_with("2018_MAY.json")
    )));
    assert_eq!(
        sink.events.last(),
        Some(&RunEvent::RunFinished { processed: 6 })
    );
}

#[test]
fn test_output_tree_mirrors_input() {
    let ws = populated_workspace();
    geotagger(&ws).run(&mut MemorySink::default()).unwrap();

    let codec = JsonSidecarCodec;
    for written in ["day1/added.jpg", "day1/UPPER.JPG", "scene.jpeg"] {
        let copy = ws.output().join(written);
        assert!(copy.is_file(), "{copy}");
        assert_eq!(
            std::fs::read(&copy).unwrap(),
            std::fs::read(ws.picture().join(written)).unwrap()
        );
        assert!(codec.read(&copy).unwrap().has_location(), "{copy}");
    }
    for untouched in ["day2/located.jpg", "day2/far.jpg", "bad.jpg", "notes.txt"] {
        assert!(!ws.output().join(untouched).exists(), "{untouched}");
    }

    // originals keep their metadata
    let original = codec.read(&ws.picture().join("day1/added.jpg")).unwrap();
    assert!(!original.has_location());

    let repaired = codec.read(&ws.output().join("scene.jpeg")).unwrap();
    assert_eq!(
        repaired.exif.get(&exif_tag::SCENE_TYPE),
        Some(&ExifValue::Undefined(vec![1]))
    );
    assert_eq!(
        repaired.gps.get(&gps_tag::TIME_STAMP),
        Some(&ExifValue::Rational(vec![(3, 1), (22, 1), (42, 1)]))
    );
}

#[test]
fn test_csv_report() {
    let ws = populated_workspace();
    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();

    let csv_path = ws.root.join("report.csv");
    report.write_csv(&csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        vec!["path", "status", "latitude", "longitude", "area", "message"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), report.outcomes.len());

    let added = rows
        .iter()
        .find(|row| row[0].ends_with("added.jpg"))
        .unwrap();
    assert_eq!(&added[1], "ADDED");
    assert_eq!(&added[4], "Fuji Motosuko Resort");
}

#[test]
fn test_early_exits() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.google()).unwrap();
    std::fs::create_dir_all(ws.picture()).unwrap();
    ws.write_timeline("2018_MAY.json", r#"{"timelineObjects": []}"#);
    ws.write_image("a.jpg", &shot_at("2018:04:16 14:25:00"));

    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();
    assert_eq!(report.early_exit, Some(EarlyExit::NoLocationHistory));
    assert_eq!(report.loaded_files, 1);
    assert!(report.outcomes.is_empty());

    let ws = Workspace::new();
    ws.write_timeline("2018_APRIL.json", APRIL_2018);
    common::write_file(&ws.picture().join("clip.mov"), b"mov");

    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();
    assert_eq!(report.early_exit, Some(EarlyExit::NoTargets));
    assert_eq!(report.observations, 8);
    assert!(!ws.output().exists());
}

#[test]
fn test_missing_directory_aborts() {
    let ws = Workspace::new();
    ws.write_timeline("2018_APRIL.json", APRIL_2018);

    let result = geotagger(&ws).run(&mut MemorySink::default());
    assert_eq!(
        result,
        Err(GeotagError::DirectoryNotFound(ws.picture().to_string()))
    );
}

#[test]
fn test_tolerance_is_configurable() {
    let ws = Workspace::new();
    ws.write_timeline("2018_APRIL.json", APRIL_2018);
    // 12:15:00 JST, 7 min 43 s before the first observation
    ws.write_image("early.jpg", &shot_at("2018:04:16 12:15:00"));

    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();
    assert_eq!(report.outcomes[0].status, FileStatus::Skipped);

    let config = GeotagConfig::builder()
        .jpeg_input_dir(ws.picture())
        .location_history_dir(ws.google())
        .output_dir(ws.output())
        .tolerance_sec(600)
        .build()
        .unwrap();
    let report = Geotagger::new(config, JsonSidecarCodec)
        .run(&mut MemorySink::default())
        .unwrap();
    assert_eq!(report.outcomes[0].status, FileStatus::Added);
    assert!(sidecar_path(&ws.output().join("early.jpg")).is_file());
}

#[test]
fn test_out_of_range_scene_type_fails_target() {
    let ws = Workspace::new();
    ws.write_timeline("2018_APRIL.json", APRIL_2018);
    let mut scene = shot_at("2018:04:16 14:25:00");
    scene
        .exif
        .insert(exif_tag::SCENE_TYPE, ExifValue::Short(vec![257]));
    ws.write_image("wide.jpg", &scene);

    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();
    let wide = outcome(&report, &ws, "wide.jpg");
    assert_eq!(wide.status, FileStatus::Failed);
    assert!(wide.error_msg.as_deref().unwrap().contains("257"));
    assert!(!ws.output().join("wide.jpg").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_names_are_left_out() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let ws = Workspace::new();
    ws.write_timeline("2018_APRIL.json", APRIL_2018);
    ws.write_image("added.jpg", &shot_at("2018:04:16 14:25:00"));

    // Latin-1 "café"
    for (dir, name) in [
        (ws.google(), &b"caf\xE9.txt"[..]),
        (ws.google(), &b"caf\xE9.json"[..]),
        (ws.picture(), &b"caf\xE9.jpg"[..]),
    ] {
        let path = dir.as_std_path().join(OsStr::from_bytes(name));
        std::fs::write(path, b"{}").unwrap();
    }

    let report = geotagger(&ws).run(&mut MemorySink::default()).unwrap();
    assert_eq!(report.early_exit, None);
    assert_eq!(report.source_files, 1);
    assert_eq!(report.observations, 8);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(
        outcome(&report, &ws, "added.jpg").status,
        FileStatus::Added
    );
}
