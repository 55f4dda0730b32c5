//! Gemini `generateContent` client.
//!
//! Speaks the REST shape `{ contents: [{ parts: [text, inline_data...] }] }`
//! against `{endpoint}/{model}:generateContent` and pulls the answer out of
//! `candidates[0].content.parts[0].text`.

use std::time::Duration;

use async_trait::async_trait;

use super::{AnalysisRequest, Collaborator};
use crate::config::AnalyzeConfig;
use crate::error::{SnapError, SnapResult};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client from the analysis configuration.
    ///
    /// The API key comes from the config or falls back to `GEMINI_API_KEY`;
    /// it is never logged.
    pub fn new(config: &AnalyzeConfig) -> SnapResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SnapError::config(
                    "api_key",
                    "<unset>",
                    format!("pass --api-key or set {}", API_KEY_ENV),
                )
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SnapError::collaborator("client setup", e.to_string(), Some(Box::new(e)))
            })?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Collaborator for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> SnapResult<String> {
        let mut parts = vec![serde_json::json!({ "text": request.prompt })];
        for image in &request.images {
            parts.push(serde_json::json!({
                "inline_data": {
                    "mime_type": image.media_type(),
                    "data": image.base64_payload(),
                }
            }));
        }
        let body = serde_json::json!({ "contents": [{ "parts": parts }] });

        log::info!(
            "submitting {} photo(s) to {} for analysis",
            request.images.len(),
            self.model
        );

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // reqwest's Display includes the URL, which carries the key.
                let detail = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    "connection failed".to_string()
                } else {
                    "transport error".to_string()
                };
                SnapError::collaborator("generateContent", detail, Some(Box::new(e.without_url())))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SnapError::collaborator(
                "generateContent",
                format!("HTTP {}: {}", status, detail),
                None,
            ));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            SnapError::collaborator("read response", "invalid response body", Some(Box::new(e)))
        })?;

        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| SnapError::malformed_report("response carried no text part"))?;

        Ok(text.to_string())
    }
}
