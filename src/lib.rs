//! # Nutri Snap Library
//!
//! Photograph a packaged food product, hand the photos to a generative
//! vision model, and get back a typed, renderable nutrition report. The
//! library owns everything around that single inference call: photo
//! normalization, request batching, response parsing, and the session state
//! a driver needs to run the flow.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `normalize`: decode → width-bounded resample → JPEG re-encode pipeline
//! - `inference`: the collaborator seam and the Gemini client behind it
//! - `report`: typed report model, fence stripping, parsing, rendering
//! - `session`: explicit state container for one analysis flow
//! - `config`: tunable normalization and request parameters
//!
//! ## Control flow
//!
//! A driver collects raw photos, each photo normalizes independently and
//! concurrently, the batch goes out in one request, and the text answer is
//! parsed into a [`report::NutritionReport`]. A single bad photo aborts the
//! batch before any network traffic; collaborator failures surface as
//! retryable errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutri_snap::config::AnalyzeConfig;
//! use nutri_snap::inference::GeminiClient;
//! use nutri_snap::normalize::RawImage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalyzeConfig::default();
//! let client = GeminiClient::new(&config)?;
//! let photos = vec![RawImage::new(std::fs::read("label.jpg")?, "image/jpeg")];
//!
//! let report = nutri_snap::analyze_images(photos, &config, &client).await?;
//! println!("{}", nutri_snap::report::render(&report));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod inference;
pub mod normalize;
pub mod report;
pub mod session;

/// Re-export error types for convenience
pub use error::{Retryable, SnapError, SnapResult};

pub use config::{AnalyzeConfig, NormalizeConfig};
pub use normalize::{normalize, normalize_batch, NormalizedImage, RawImage};
pub use report::NutritionReport;
pub use session::{AnalysisSession, AnalysisTask, SessionState};

use inference::{AnalysisRequest, Collaborator};

/// Run one complete analysis: normalize the batch, submit it, parse the
/// answer.
///
/// This is the library's main entry point; the session layer wraps it with
/// state tracking and cancellation. Normalization failures abort before any
/// network call is made.
pub async fn analyze_images(
    raws: Vec<RawImage>,
    config: &AnalyzeConfig,
    collaborator: &dyn Collaborator,
) -> SnapResult<NutritionReport> {
    config.validate()?;
    if raws.len() > config.max_images {
        return Err(SnapError::config(
            "max_images",
            raws.len().to_string(),
            format!("at most {} photos per analysis", config.max_images),
        ));
    }

    let normalized = normalize_batch(raws, &config.normalize).await?;
    log::info!("normalized {} photo(s), submitting for analysis", normalized.len());

    let request = AnalysisRequest::new(normalized);
    let text = collaborator.analyze(&request).await?;

    report::parse_report(&text)
}
