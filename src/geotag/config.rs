use camino::{Utf8Path, Utf8PathBuf};
use chrono::FixedOffset;

use crate::{
    constants::{
        DEFAULT_DIR_JPEG_INPUT, DEFAULT_DIR_LOCATION_HISTORY, DEFAULT_DIR_OUTPUT,
        DEFAULT_TARGET_EXTENSIONS, DEFAULT_TOLERANCE_SEC,
    },
    geotag_errors::GeotagError,
    time::default_utc_offset,
};

/// Parameters of a geotagging run
///
/// Obtained from [`GeotagConfig::default`] or through the validating
/// [`GeotagConfig::builder`]. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeotagConfig {
    /// Root of the images to geotag, walked recursively
    pub jpeg_input_dir: Utf8PathBuf,
    /// Root of the location history export, walked recursively for `.json` files
    pub location_history_dir: Utf8PathBuf,
    /// Root of the geotagged copies, mirroring the input tree
    pub output_dir: Utf8PathBuf,
    /// Largest accepted absolute delta between shooting time and observation, in seconds
    pub tolerance_sec: u64,
    /// Civil offset of the camera clock and of the normalized observations
    pub utc_offset: FixedOffset,
    /// Accepted image extensions, lowercase and without the leading dot
    pub target_extensions: Vec<String>,
}

impl GeotagConfig {
    /// Create a new [`GeotagConfigBuilder`] starting from the default values
    ///
    /// # Example
    ///
    /// ```rust
    /// use timeline_geotag::geotag::GeotagConfig;
    /// use timeline_geotag::time::parse_utc_offset;
    ///
    /// let config = GeotagConfig::builder()
    ///     .jpeg_input_dir("holidays/2018")
    ///     .output_dir("holidays/2018_geotagged")
    ///     .tolerance_sec(600)
    ///     .utc_offset(parse_utc_offset("+02:00").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.tolerance_sec, 600);
    /// ```
    pub fn builder() -> GeotagConfigBuilder {
        GeotagConfigBuilder::new()
    }

    /// True when `path` carries one of the accepted extensions, whatever its case
    pub fn is_target(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.accepts_extension(ext))
    }

    /// True when `ext` (without the dot) is one of the accepted extensions, whatever its case
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.target_extensions.iter().any(|accepted| *accepted == ext)
    }
}

impl Default for GeotagConfig {
    fn default() -> Self {
        GeotagConfig {
            jpeg_input_dir: DEFAULT_DIR_JPEG_INPUT.into(),
            location_history_dir: DEFAULT_DIR_LOCATION_HISTORY.into(),
            output_dir: DEFAULT_DIR_OUTPUT.into(),
            tolerance_sec: DEFAULT_TOLERANCE_SEC,
            utc_offset: default_utc_offset(),
            target_extensions: DEFAULT_TARGET_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Builder for [`GeotagConfig`], with validation.
#[derive(Debug, Clone)]
pub struct GeotagConfigBuilder {
    config: GeotagConfig,
}

impl Default for GeotagConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeotagConfigBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            config: GeotagConfig::default(),
        }
    }

    // --- Directories ---
    pub fn jpeg_input_dir(mut self, v: impl Into<Utf8PathBuf>) -> Self {
        self.config.jpeg_input_dir = v.into();
        self
    }
    pub fn location_history_dir(mut self, v: impl Into<Utf8PathBuf>) -> Self {
        self.config.location_history_dir = v.into();
        self
    }
    pub fn output_dir(mut self, v: impl Into<Utf8PathBuf>) -> Self {
        self.config.output_dir = v.into();
        self
    }

    // --- Matching ---
    pub fn tolerance_sec(mut self, v: u64) -> Self {
        self.config.tolerance_sec = v;
        self
    }
    pub fn utc_offset(mut self, v: FixedOffset) -> Self {
        self.config.utc_offset = v;
        self
    }

    /// Replace the accepted extensions; a leading dot is ignored and case does not matter
    pub fn target_extensions<I, S>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.target_extensions = v
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Validate and return the configuration
    ///
    /// Errors
    /// ------
    /// * [`GeotagError::InvalidGeotagParameter`] if a directory is empty, if the output
    ///   directory is the image input directory (originals would be overwritten), or if no
    ///   usable extension is given.
    pub fn build(self) -> Result<GeotagConfig, GeotagError> {
        let c = &self.config;

        if c.jpeg_input_dir.as_str().is_empty()
            || c.location_history_dir.as_str().is_empty()
            || c.output_dir.as_str().is_empty()
        {
            return Err(GeotagError::InvalidGeotagParameter(
                "directories must not be empty".into(),
            ));
        }
        if c.output_dir.components().eq(c.jpeg_input_dir.components()) {
            return Err(GeotagError::InvalidGeotagParameter(
                "output_dir must differ from jpeg_input_dir".into(),
            ));
        }
        if c.target_extensions.is_empty() || c.target_extensions.iter().any(String::is_empty) {
            return Err(GeotagError::InvalidGeotagParameter(
                "target_extensions must hold at least one non-empty extension".into(),
            ));
        }

        Ok(self.config)
    }
}
