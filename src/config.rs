//! Runtime settings for the pipeline.
//!
//! Settings are layered: built-in defaults, then an optional
//! `tickboard.toml` next to the working directory, then `TICKBOARD_*`
//! environment variables, then explicit command-line overrides.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::models::NutsLevel;
use crate::utils::constants::{
    DEFAULT_DATA_DIR, MODELS_FILE, PREDICTIONS_DIR, PREDICTIONS_FILE_SUFFIX, UPLOAD_LOCK_FILE,
    VERSIONS_FILE,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding the canonical datasets, version log, model
    /// registry and prediction files.
    pub data_dir: PathBuf,
    /// NUTS level whose dataset defines the code universe for uploads.
    pub nuts_level: u8,
    /// Suppress progress bars and console chatter.
    #[serde(default)]
    pub silent: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            nuts_level: NutsLevel::Nuts3.number(),
            silent: false,
        }
    }
}

impl Settings {
    /// Loads settings from defaults, `tickboard.toml` and `TICKBOARD_*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .set_default("nuts_level", NutsLevel::Nuts3.number() as i64)
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .set_default("silent", false)
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .add_source(File::with_name("tickboard").required(false))
            .add_source(Environment::with_prefix("TICKBOARD"))
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Settings rooted at an explicit data directory, bypassing file and
    /// environment sources.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// NUTS level targeted by uploads, validated against the known levels.
    pub fn upload_level(&self) -> Result<NutsLevel> {
        NutsLevel::from_number(self.nuts_level).ok_or_else(|| {
            PipelineError::Config(format!(
                "nuts_level must be 1, 2 or 3, got {}",
                self.nuts_level
            ))
        })
    }

    pub fn dataset_path(&self) -> Result<PathBuf> {
        Ok(self.dataset_path_for(self.upload_level()?))
    }

    pub fn dataset_path_for(&self, level: NutsLevel) -> PathBuf {
        self.data_dir.join(level.dataset_file_name())
    }

    pub fn versions_path(&self) -> PathBuf {
        self.data_dir.join(VERSIONS_FILE)
    }

    pub fn models_path(&self) -> PathBuf {
        self.data_dir.join(MODELS_FILE)
    }

    pub fn predictions_dir(&self) -> PathBuf {
        self.data_dir.join(PREDICTIONS_DIR)
    }

    pub fn predictions_path(&self, model_id: u32) -> PathBuf {
        self.predictions_dir()
            .join(format!("{}{}", model_id, PREDICTIONS_FILE_SUFFIX))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(UPLOAD_LOCK_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
