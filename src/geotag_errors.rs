use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeotagError {
    #[error("Directory not found: '{0}'")]
    DirectoryNotFound(String),

    #[error("Invalid location history file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unable to interpret timestamp: {0}")]
    TimestampFormat(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidUtcOffset(String),

    #[error("Invalid geotagging parameter: {0}")]
    InvalidGeotagParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),


    #[error("Unable to create output directory: '{0}'")]
    UnableToCreateOutputDir(String),

    #[error("Metadata not found for: '{0}'")]
    MetadataNotFound(String),

    #[error("Invalid metadata sidecar: {0}")]
    SidecarFormat(String),

    #[error("Invalid EXIF value: {0}")]
    InvalidExifValue(String),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for GeotagError {
    fn eq(&self, other: &Self) -> bool {
        use GeotagError::*;
        match (self, other) {
            (DirectoryNotFound(a), DirectoryNotFound(b)) => a == b,
            (InvalidFileFormat(a), InvalidFileFormat(b)) => a == b,
            (TimestampFormat(a), TimestampFormat(b)) => a == b,
            (InvalidUtcOffset(a), InvalidUtcOffset(b)) => a == b,
            (InvalidGeotagParameter(a), InvalidGeotagParameter(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (InvalidExifValue(a), InvalidExifValue(b)) => a == b,
            (UnableToCreateOutputDir(a), UnableToCreateOutputDir(b)) => a == b,
            (MetadataNotFound(a), MetadataNotFound(b)) => a == b,
            (SidecarFormat(a), SidecarFormat(b)) => a == b,

            // not comparable: equal when same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
