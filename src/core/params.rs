use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::frame::DEFAULT_FRAME_DURATION_MS;
use crate::error::{Error, Result};

pub const DEFAULT_THRESHOLD: u8 = 240;

/// Conversion parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertParams {
    /// Pixels with R, G and B all strictly above this become transparent
    pub threshold: u8,
    /// Duration used for frames whose source carries no usable delay
    pub default_frame_ms: u32,
    /// WebP quality factor, 0.0..=100.0
    pub webp_quality: f32,
    /// WebP compression effort, 0 (fast) ..= 6 (slowest)
    pub webp_method: i32,
    pub webp_lossless: bool,
}

impl Default for ConvertParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            default_frame_ms: DEFAULT_FRAME_DURATION_MS,
            webp_quality: 90.0,
            webp_method: 6,
            webp_lossless: false,
        }
    }
}

impl ConvertParams {
    /// Load parameters from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let params: ConvertParams = serde_json::from_str(&raw)?;
        params.validate(path)?;
        Ok(params)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("webp_quality must be within 0..=100, got {}", self.webp_quality),
            });
        }
        if !(0..=6).contains(&self.webp_method) {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("webp_method must be within 0..=6, got {}", self.webp_method),
            });
        }
        if self.default_frame_ms == 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "default_frame_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
