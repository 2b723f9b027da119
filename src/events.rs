//! # Run events
//!
//! The orchestrator reports progress through an explicit [`EventSink`] instead of a global
//! logger. The core (timeline reader, location log, projection) only returns values and errors.
//!
//! * [`LogSink`] forwards every event to the [`log`] facade, one line per event.
//! * [`MemorySink`] keeps the events in memory, for tests and embedding applications.
use camino::Utf8PathBuf;
use log::{error, info, warn};

use crate::geotag::report::{EarlyExit, FileOutcome, FileStatus};

/// How a skipped location history file should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipSeverity {
    /// The file is not a location history export (structure, JSON, timestamps)
    InvalidFormat,
    /// Anything else, typically I/O
    Unexpected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    LoadStarted {
        directory: Utf8PathBuf,
        files: usize,
    },
    SourceLoaded {
        index: usize,
        total: usize,
        path: Utf8PathBuf,
        observations: usize,
    },
    SourceSkipped {
        index: usize,
        total: usize,
        path: Utf8PathBuf,
        severity: SkipSeverity,
        reason: String,
    },
    LoadFinished {
        loaded_files: usize,
        observations: usize,
    },
    TargetsListed {
        directory: Utf8PathBuf,
        files: usize,
    },
    TargetProcessed {
        index: usize,
        total: usize,
        outcome: FileOutcome,
    },
    EarlyExit(EarlyExit),
    RunFinished {
        processed: usize,
    },
}

/// Receiver of the events of a geotagging run
pub trait EventSink {
    fn emit(&mut self, event: RunEvent);
}

/// Sink writing every event through the `log` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: RunEvent) {
        match event {
            RunEvent::LoadStarted { directory, files } => {
                info!("[START]\tLoading location history from '{directory}'.");
                info!("{files} JSON file(s) found.");
            }
            RunEvent::SourceLoaded {
                index,
                total,
                path,
                observations,
            } => info!("({index}/{total})\t{path}\tLOADED\t{observations} observation(s)"),
            RunEvent::SourceSkipped {
                index,
                total,
                path,
                severity: SkipSeverity::InvalidFormat,
                reason,
            } => warn!("({index}/{total})\t{path}\tSKIP\tUnreadable file structure: {reason}"),
            RunEvent::SourceSkipped {
                index,
                total,
                path,
                severity: SkipSeverity::Unexpected,
                reason,
            } => error!("({index}/{total})\t{path}\tSKIP\tUnexpected error: {reason}"),
            RunEvent::LoadFinished {
                loaded_files,
                observations,
            } => info!(
                "[END]\t{loaded_files} location history file(s) loaded, {observations} observation(s)."
            ),
            RunEvent::TargetsListed { directory, files } => {
                info!("{files} target file(s) found under '{directory}'.")
            }
            RunEvent::TargetProcessed {
                index,
                total,
                outcome,
            } => {
                let path = &outcome.path;
                let status = outcome.status;
                let success = outcome.success_msg.as_deref().unwrap_or_default();
                let failure = outcome.error_msg.as_deref().unwrap_or_default();
                match status {
                    FileStatus::Failed => error!("({index}/{total})\t{path}\t{status}\t{failure}"),
                    FileStatus::Warned => {
                        warn!("({index}/{total})\t{path}\t{status}\t{success}\t{failure}")
                    }
                    FileStatus::Added | FileStatus::Skipped => {
                        info!("({index}/{total})\t{path}\t{status}\t{success}")
                    }
                }
            }
            RunEvent::EarlyExit(reason) => info!("{reason}"),
            RunEvent::RunFinished { processed } => info!("{processed} file(s) processed."),
        }
    }
}

/// Sink keeping every event, in emission order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub events: Vec<RunEvent>,
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: RunEvent) {
        self.events.push(event);
    }
}
