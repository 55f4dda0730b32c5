//! # Configuration Module
//!
//! This module provides configuration structures and validation for the
//! analysis pipeline. It is the common interface between the CLI driver and
//! the core library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `max_width` | `u32` | > 0 | Width bound for normalized photos |
//! | `quality` | `f32` | (0, 1] | JPEG quality factor |
//! | `model` | `String` | non-empty | Inference model identifier |
//! | `timeout_secs` | `u64` | > 0 | Per-request timeout |
//! | `max_images` | `usize` | > 0 | Photos accepted per analysis |
//!
//! ## Presets
//!
//! The driver maps `snap_prep::presets::UploadPreset` values onto the
//! `(max_width, quality)` pair; `Balanced` reproduces the production
//! defaults (1200 px, 0.7).

use snap_prep::presets::UploadPreset;

use crate::error::{SnapError, SnapResult};

/// Default inference model; matches the production deployment.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default inference endpoint root (model name and verb are appended).
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Photo normalization parameters.
///
/// The two knobs trade payload size and inference cost against the model's
/// ability to read printed label text. They are deliberately configuration,
/// not constants.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Width bound in pixels. Photos wider than this shrink to exactly this
    /// width; narrower photos are left untouched (never upscaled).
    pub max_width: u32,

    /// JPEG quality factor on a 0.0–1.0 scale, mapped to the encoder's
    /// 1–100 range at encode time.
    pub quality: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            quality: 0.7,
        }
    }
}

impl NormalizeConfig {
    /// Build the configuration from an upload preset.
    pub fn from_preset(preset: UploadPreset) -> Self {
        Self {
            max_width: preset.max_width(),
            quality: preset.quality(),
        }
    }

    /// Validates the normalization parameters.
    pub fn validate(&self) -> SnapResult<()> {
        if self.max_width == 0 {
            return Err(SnapError::config(
                "max_width",
                self.max_width.to_string(),
                "must be greater than 0",
            ));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(SnapError::config(
                "quality",
                self.quality.to_string(),
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Full configuration for one analysis action.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Photo normalization parameters.
    pub normalize: NormalizeConfig,

    /// Inference model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,

    /// Inference endpoint root. The request URL is
    /// `{endpoint}/{model}:generateContent`.
    pub endpoint: String,

    /// API key. When `None`, the client falls back to the `GEMINI_API_KEY`
    /// environment variable.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of photos accepted in one analysis. A package front
    /// plus a nutrition table plus an ingredient list is three; the cap
    /// exists to bound payload size, not to model the product.
    pub max_images: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeConfig::default(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_images: 6,
        }
    }
}

impl AnalyzeConfig {
    /// Build the configuration from an upload preset, keeping the request
    /// defaults for everything else.
    pub fn from_preset(preset: UploadPreset) -> Self {
        Self {
            normalize: NormalizeConfig::from_preset(preset),
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> SnapResult<()> {
        self.normalize.validate()?;
        if self.model.trim().is_empty() {
            return Err(SnapError::config("model", "", "must not be empty"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(SnapError::config("endpoint", "", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(SnapError::config(
                "timeout_secs",
                "0",
                "must be greater than 0",
            ));
        }
        if self.max_images == 0 {
            return Err(SnapError::config(
                "max_images",
                "0",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
