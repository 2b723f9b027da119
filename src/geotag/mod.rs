//! # Geotagging run
//!
//! [`Geotagger`] drives a whole run over two directory trees:
//!
//! 1. every `.json` file under the location history directory is read into a
//!    [`LocationLogBuilder`]; a rejected file is skipped and reported, never fatal;
//! 2. every image with an accepted extension under the input directory is listed;
//! 3. each image is matched against the log and, on success, a copy carrying the GPS patch is
//!    written under the output directory at the same relative path.
//!
//! Only a missing input directory aborts the run with an error. An empty log or an empty image
//! tree ends the run early, with [`RunReport::early_exit`] set.
//!
//! Progress goes through the [`EventSink`] handed to [`Geotagger::run`].
pub mod config;
pub mod report;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use crate::{
    constants::LOCATION_HISTORY_EXTENSION,
    events::{EventSink, RunEvent, SkipSeverity},
    geotag_errors::GeotagError,
    location_log::{LocationLog, LocationLogBuilder},
    metadata::MetadataCodec,
};

pub use config::{GeotagConfig, GeotagConfigBuilder};
pub use report::{EarlyExit, FileOutcome, FileStatus, RunReport};

/// Runs the geotagging of a directory tree with a given metadata codec
#[derive(Debug, Clone)]
pub struct Geotagger<C: MetadataCodec> {
    config: GeotagConfig,
    codec: C,
}

/// Files found under `dir`, recursively, sorted by path
///
/// `keep` is called with the file extension. Entries the walk cannot read and kept files whose
/// path is not UTF-8 are left out, only a missing `dir` is an error.
fn list_files(
    dir: &Utf8Path,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<Utf8PathBuf>, GeotagError> {
    if !dir.is_dir() {
        return Err(GeotagError::DirectoryNotFound(dir.to_string()));
    }

    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(&keep)
        })
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .collect();
    Ok(files)
}

impl<C: MetadataCodec> Geotagger<C> {
    pub fn new(config: GeotagConfig, codec: C) -> Self {
        Geotagger { config, codec }
    }

    pub fn config(&self) -> &GeotagConfig {
        &self.config
    }

    /// Run the whole pipeline
    ///
    /// Arguments
    /// ---------
    /// * `sink`: receives one [`RunEvent`] per step
    ///
    /// Return
    /// ------
    /// * the [`RunReport`], with `early_exit` set when nothing could be processed
    /// * [`GeotagError::DirectoryNotFound`] if an input directory is missing
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<RunReport, GeotagError> {
        let mut report = RunReport::default();

        let log = self.load_location_log(sink, &mut report)?;
        if log.is_empty() {
            return Ok(Self::end_early(sink, report, EarlyExit::NoLocationHistory));
        }

        let targets = self.list_targets()?;
        sink.emit(RunEvent::TargetsListed {
            directory: self.config.jpeg_input_dir.clone(),
            files: targets.len(),
        });
        if targets.is_empty() {
            return Ok(Self::end_early(sink, report, EarlyExit::NoTargets));
        }

        let total = targets.len();
        for (i, target) in targets.iter().enumerate() {
            let outcome = self
                .process_file(&log, target)
                .unwrap_or_else(|err| FileOutcome::failed(target, &err));
            sink.emit(RunEvent::TargetProcessed {
                index: i + 1,
                total,
                outcome: outcome.clone(),
            });
            report.outcomes.push(outcome);
        }

        sink.emit(RunEvent::RunFinished {
            processed: report.outcomes.len(),
        });
        Ok(report)
    }

    fn end_early(sink: &mut dyn EventSink, mut report: RunReport, reason: EarlyExit) -> RunReport {
        sink.emit(RunEvent::EarlyExit(reason));
        report.early_exit = Some(reason);
        report
    }

    /// Read every location history file into a single sorted log
    ///
    /// Files are read in path order. A file rejected by the reader contributes nothing and
    /// emits a [`RunEvent::SourceSkipped`]. The counters of `report` are updated.
    pub fn load_location_log(
        &self,
        sink: &mut dyn EventSink,
        report: &mut RunReport,
    ) -> Result<LocationLog, GeotagError> {
        let directory = &self.config.location_history_dir;
        let sources = list_files(directory, |ext| {
            ext.eq_ignore_ascii_case(LOCATION_HISTORY_EXTENSION)
        })?;

        let total = sources.len();
        report.source_files = total;
        sink.emit(RunEvent::LoadStarted {
            directory: directory.clone(),
            files: total,
        });

        let mut builder = LocationLogBuilder::new();
        for (i, source) in sources.into_iter().enumerate() {
            match builder.add_from_timeline(&source, self.config.utc_offset) {
                Ok(observations) => {
                    report.loaded_files += 1;
                    sink.emit(RunEvent::SourceLoaded {
                        index: i + 1,
                        total,
                        path: source,
                        observations,
                    });
                }
                Err(err) => {
                    let severity = match err {
                        GeotagError::InvalidFileFormat(_) | GeotagError::TimestampFormat(_) => {
                            SkipSeverity::InvalidFormat
                        }
                        _ => SkipSeverity::Unexpected,
                    };
                    sink.emit(RunEvent::SourceSkipped {
                        index: i + 1,
                        total,
                        path: source,
                        severity,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let log = builder.build();
        report.observations = log.len();
        sink.emit(RunEvent::LoadFinished {
            loaded_files: report.loaded_files,
            observations: log.len(),
        });
        Ok(log)
    }

    /// Images under the input directory with an accepted extension, sorted by path
    pub fn list_targets(&self) -> Result<Vec<Utf8PathBuf>, GeotagError> {
        list_files(&self.config.jpeg_input_dir, |ext| {
            self.config.accepts_extension(ext)
        })
    }

    /// Destination of the geotagged copy of `target`
    ///
    /// The output directory joined with the path of `target` relative to the input directory.
    pub fn output_path(&self, target: &Utf8Path) -> Result<Utf8PathBuf, GeotagError> {
        let relative = target
            .strip_prefix(&self.config.jpeg_input_dir)
            .map_err(|_| {
                GeotagError::Utf8PathError(format!(
                    "'{target}' is not under '{}'",
                    self.config.jpeg_input_dir
                ))
            })?;
        Ok(self.config.output_dir.join(relative))
    }

    /// Geotag one image
    ///
    /// Return
    /// ------
    /// * `Skipped` if the image already holds a position or no observation is close enough
    /// * `Added` once the copy is written, `Warned` if its `SceneType` had to be repaired
    /// * an error for anything preventing the copy; [`Geotagger::run`] turns it into `Failed`
    pub fn process_file(
        &self,
        log: &LocationLog,
        target: &Utf8Path,
    ) -> Result<FileOutcome, GeotagError> {
        let metadata = self.codec.read(target)?;
        if metadata.has_location() {
            return Ok(FileOutcome::skipped(
                target,
                "Location information already exists.",
            ));
        }

        let shooting_time = metadata.shooting_time(self.config.utc_offset)?;
        let Some(observation) = log.match_at(shooting_time, self.config.tolerance_sec) else {
            return Ok(FileOutcome::skipped(
                target,
                "No location history entry close enough to the shooting time.",
            ));
        };

        let mut patched = observation.to_patch(&metadata);
        let scene_type_fixed = patched.normalize_scene_type()?;

        let destination = self.output_path(target)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|_| GeotagError::UnableToCreateOutputDir(parent.to_string()))?;
        }
        self.codec.write(&patched, target, &destination)?;

        Ok(if scene_type_fixed {
            FileOutcome::warned(
                target,
                observation.clone(),
                "'SceneType' was not a single byte and has been converted.".into(),
            )
        } else {
            FileOutcome::added(target, observation.clone())
        })
    }
}
