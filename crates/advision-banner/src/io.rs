//! JSON configuration and report helpers for batch rectification.

use crate::observation::RectangleObservation;
use advision_core::{PixelRect, RectifyError, RectifyParams};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum BannerIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_output_dir() -> String {
    "rectified".to_string()
}

/// Input for a batch rectification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifyConfig {
    pub image_path: String,
    pub observations: Vec<RectangleObservation>,
    #[serde(default)]
    pub rectify: RectifyParams,
    /// Directory for rectified PNGs, relative to the config file.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl RectifyConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BannerIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BannerIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path (defaults to `rectify_report.json` in the output dir).
    pub fn report_path(&self, base: &Path) -> PathBuf {
        match &self.report_path {
            Some(p) => base.join(p),
            None => self.output_dir(base).join("rectify_report.json"),
        }
    }

    pub fn output_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.output_dir)
    }

    pub fn image_path(&self, base: &Path) -> PathBuf {
        base.join(&self.image_path)
    }
}

/// Result for one observation in a [`RectifyReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifiedEntry {
    pub index: usize,
    pub region: PixelRect,
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RectifiedEntry {
    pub fn ok(index: usize, region: PixelRect, width: usize, height: usize, path: &Path) -> Self {
        Self {
            index,
            region,
            width: Some(width),
            height: Some(height),
            output_path: Some(path.to_string_lossy().into_owned()),
            error: None,
        }
    }

    pub fn failed(index: usize, region: PixelRect, err: &RectifyError) -> Self {
        Self {
            index,
            region,
            width: None,
            height: None,
            output_path: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifyReport {
    pub image_path: String,
    pub config_path: String,
    pub image_width: usize,
    pub image_height: usize,
    pub entries: Vec<RectifiedEntry>,
}

impl RectifyReport {
    pub fn new(cfg: &RectifyConfig, config_path: &Path, width: usize, height: usize) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            image_width: width,
            image_height: height,
            entries: Vec::with_capacity(cfg.observations.len()),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_ok()).count()
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BannerIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BannerIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
