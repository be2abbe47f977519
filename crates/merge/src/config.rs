use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::MergeError;

/// Config file looked up in the run folder when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "merger.toml";

/// Subdirectory of the run folder holding the indexed batch files.
pub const BATCH_DIR_NAME: &str = "subscribers";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Column bindings and run options. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub email_column: String,
    pub timestamp_column: String,
    /// First sticky-boolean column (newsletter consent).
    pub updates_column: String,
    /// Second sticky-boolean column (survey consent).
    pub survey_column: String,
    pub output_file: String,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            email_column: "Email".into(),
            timestamp_column: "Timestamp".into(),
            updates_column: "subscrube".into(),
            survey_column: "subscribe_survey".into(),
            output_file: "subscribers.csv".into(),
            start_index: None,
            end_index: None,
        }
    }
}

/// On-disk layout: all keys live under `[columns]`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    columns: MergeConfig,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, MergeError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| MergeError::ConfigParse(e.to_string()))?;
        file.columns.validate()?;
        Ok(file.columns)
    }

    /// Load `path` if it exists; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self, MergeError> {
        match std::fs::read_to_string(path) {
            Ok(input) => {
                debug!(path = %path.display(), "loading merge config");
                Self::from_toml(&input)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no merge config, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(MergeError::io(path, e)),
        }
    }

    /// Load `<folder>/merger.toml`.
    pub fn load_from_folder(folder: &Path) -> Result<Self, MergeError> {
        Self::load(&folder.join(CONFIG_FILE_NAME))
    }

    /// Apply command-line index bounds over whatever the file set.
    pub fn with_range(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        if start.is_some() {
            self.start_index = start;
        }
        if end.is_some() {
            self.end_index = end;
        }
        self
    }

    /// The two sticky-boolean columns, in policy order.
    pub fn sticky_columns(&self) -> [&str; 2] {
        [self.updates_column.as_str(), self.survey_column.as_str()]
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.email_column.trim().is_empty() {
            return Err(MergeError::ConfigValidation(
                "email_column must not be empty".into(),
            ));
        }
        if self.output_file.trim().is_empty() {
            return Err(MergeError::ConfigValidation(
                "output_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
