use std::{fmt, io};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::{geotag_errors::GeotagError, observations::LocationObservation};

/// Result category of one target image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    /// A geotagged copy was written
    Added,
    /// Nothing to do: already located, or no observation close enough
    Skipped,
    /// A geotagged copy was written, but the metadata had to be repaired
    Warned,
    /// The target could not be processed
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "ADDED",
            FileStatus::Skipped => "SKIP",
            FileStatus::Warned => "WARN",
            FileStatus::Failed => "ERROR",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one target image
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: Utf8PathBuf,
    pub status: FileStatus,
    pub success_msg: Option<String>,
    pub error_msg: Option<String>,
    pub observation: Option<LocationObservation>,
}

impl FileOutcome {
    pub fn added(path: &Utf8Path, observation: LocationObservation) -> Self {
        FileOutcome {
            path: path.to_owned(),
            status: FileStatus::Added,
            success_msg: Some(observation.to_string()),
            error_msg: None,
            observation: Some(observation),
        }
    }

    pub fn warned(path: &Utf8Path, observation: LocationObservation, warning: String) -> Self {
        FileOutcome {
            status: FileStatus::Warned,
            error_msg: Some(warning),
            ..FileOutcome::added(path, observation)
        }
    }

    pub fn skipped(path: &Utf8Path, reason: impl Into<String>) -> Self {
        FileOutcome {
            path: path.to_owned(),
            status: FileStatus::Skipped,
            success_msg: Some(reason.into()),
            error_msg: None,
            observation: None,
        }
    }

    pub fn failed(path: &Utf8Path, error: &GeotagError) -> Self {
        FileOutcome {
            path: path.to_owned(),
            status: FileStatus::Failed,
            success_msg: None,
            error_msg: Some(error.to_string()),
            observation: None,
        }
    }

    /// The message worth showing for this outcome: the error if any, else the success text
    pub fn message(&self) -> Option<&str> {
        self.error_msg
            .as_deref()
            .or(self.success_msg.as_deref())
    }
}

/// Why a run stopped before processing any target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyExit {
    NoLocationHistory,
    NoTargets,
}

impl fmt::Display for EarlyExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EarlyExit::NoLocationHistory => write!(f, "No location history was found."),
            EarlyExit::NoTargets => write!(f, "No target image was found."),
        }
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// `.json` files found under the location history directory
    pub source_files: usize,
    /// Of those, the ones read without error
    pub loaded_files: usize,
    /// Observations in the built log
    pub observations: usize,
    /// One entry per target, in processing order
    pub outcomes: Vec<FileOutcome>,
    pub early_exit: Option<EarlyExit>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    path: &'a str,
    status: &'static str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    area: Option<&'a str>,
    message: Option<&'a str>,
}

impl RunReport {
    /// Number of outcomes with the given status
    pub fn count(&self, status: FileStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Write one CSV row per outcome to `path`
    pub fn write_csv(&self, path: &Utf8Path) -> Result<(), GeotagError> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(file)
    }

    /// Write the CSV report to any writer
    ///
    /// Columns: `path,status,latitude,longitude,area,message`. The header is written even
    /// when there is no outcome.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<(), GeotagError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(["path", "status", "latitude", "longitude", "area", "message"])?;

        for outcome in &self.outcomes {
            let observation = outcome.observation.as_ref();
            wtr.serialize(ReportRow {
                path: outcome.path.as_str(),
                status: outcome.status.as_str(),
                latitude: observation.map(LocationObservation::lat),
                longitude: observation.map(LocationObservation::lon),
                area: observation.and_then(LocationObservation::area_information),
                message: outcome.message(),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
