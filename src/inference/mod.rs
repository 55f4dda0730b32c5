//! Inference collaborator interface.
//!
//! The vision model is a black box: an ordered sequence of normalized photos
//! plus one instruction string goes in, raw text comes out. Everything after
//! that (fence stripping, parsing) belongs to the report module.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiClient;

use crate::error::SnapResult;
use crate::normalize::NormalizedImage;

/// The instruction sent with every analysis request. Demands the exact
/// report JSON shape; the fence stripper still runs on the answer because
/// models do not always comply with the no-markdown clause.
pub const ANALYSIS_PROMPT: &str = "\
You are a sharp but friendly dietitian reviewing photos of one packaged food \
product (package front, nutrition facts table, ingredient list).

Tasks:
1. Identify the nutrition figures (calories, fat, carbohydrates, sugar, sodium).
2. Spot food additives in the ingredient list and translate them to plain language.
3. Give an overall verdict: solid nutrition or a calorie trap.

Respond with a single JSON object and nothing else, using exactly this shape:
{
  \"productName\": \"...\",
  \"verdict\": { \"title\": \"one-line quip\", \"color\": \"green|yellow|red\" },
  \"highlights\": [{ \"label\": \"...\", \"value\": \"...\", \"desc\": \"...\", \"type\": \"good|bad\" }],
  \"translations\": [{ \"origin\": \"...\", \"simplified\": \"...\", \"explain\": \"...\" }],
  \"advice\": { \"target\": \"who it suits\", \"warning\": \"what to watch\", \"action\": \"what to do\" }
}
Keep the tone light and concrete. Do not wrap the JSON in markdown code fences.";

/// One outbound analysis request: an ordered photo batch plus the fixed
/// instruction. Transient; built per analyze action and dropped with it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub images: Vec<NormalizedImage>,
    pub prompt: String,
}

impl AnalysisRequest {
    /// Build a request around the standard instruction prompt.
    pub fn new(images: Vec<NormalizedImage>) -> Self {
        Self {
            images,
            prompt: ANALYSIS_PROMPT.to_string(),
        }
    }
}

/// Abstract interface to the external vision model.
/// Enables pluggable backends and canned collaborators in tests.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Submit a request and return the model's raw text answer.
    ///
    /// Implementations map transport failures and error statuses to
    /// collaborator errors and an answer with no extractable text to a
    /// malformed-report error. No contract on latency beyond the
    /// implementation's own timeout.
    async fn analyze(&self, request: &AnalysisRequest) -> SnapResult<String>;
}
