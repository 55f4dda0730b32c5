//! # Analysis Session
//!
//! Explicit state container for one user's analysis flow. The selection, the
//! current phase, and the last report live here as owned state; observers
//! receive immutable snapshots instead of reaching into shared mutables.
//!
//! ## Lifecycle
//!
//! Idle → Ready (photos selected) → Analyzing → Done or Failed, with
//! `reset()` returning to Idle from anywhere. Starting an analysis clones
//! the current selection into a spawned task, so later selection edits never
//! affect an in-flight batch. Resetting aborts the in-flight task, which
//! releases its buffers and surfaces `Cancelled` to whoever awaits it.
//!
//! Collaborator failures are absorbed here as a `Failed` state with a
//! user-facing message; the session stays usable for a retry.

use std::sync::Arc;

use tokio::task::{AbortHandle, JoinHandle};

use crate::config::AnalyzeConfig;
use crate::error::{SnapError, SnapResult};
use crate::inference::Collaborator;
use crate::normalize::RawImage;
use crate::report::NutritionReport;

/// Phase of the analysis flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected yet.
    Idle,
    /// Photos selected, waiting for the user to start.
    Ready { image_count: usize },
    /// A batch is being normalized and submitted.
    Analyzing,
    /// A report is available.
    Done,
    /// The last attempt failed; the message is ready for display.
    Failed { message: String },
}

/// Immutable view of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub image_count: usize,
    pub report: Option<NutritionReport>,
}

/// Handle to an in-flight analysis.
#[derive(Debug)]
pub struct AnalysisTask {
    handle: JoinHandle<SnapResult<NutritionReport>>,
}

impl AnalysisTask {
    /// Abort the analysis. Awaiting the task afterwards yields `Cancelled`.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the analysis to finish.
    pub async fn join(self) -> SnapResult<NutritionReport> {
        match self.handle.await {
            Ok(result) => result,
            Err(join) if join.is_cancelled() => Err(SnapError::Cancelled),
            Err(join) => Err(SnapError::collaborator(
                "analysis task",
                join.to_string(),
                None,
            )),
        }
    }
}

/// Owner of the analysis flow's state.
pub struct AnalysisSession {
    config: AnalyzeConfig,
    images: Vec<RawImage>,
    state: SessionState,
    report: Option<NutritionReport>,
    in_flight: Option<AbortHandle>,
}

impl AnalysisSession {
    pub fn new(config: AnalyzeConfig) -> SnapResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            images: Vec::new(),
            state: SessionState::Idle,
            report: None,
            in_flight: None,
        })
    }

    /// Add a photo to the selection.
    pub fn add_image(&mut self, raw: RawImage) -> SnapResult<()> {
        if self.images.len() >= self.config.max_images {
            return Err(SnapError::config(
                "max_images",
                (self.images.len() + 1).to_string(),
                format!("at most {} photos per analysis", self.config.max_images),
            ));
        }
        self.images.push(raw);
        if !matches!(self.state, SessionState::Analyzing) {
            self.state = SessionState::Ready {
                image_count: self.images.len(),
            };
        }
        Ok(())
    }

    /// Remove one photo from the selection by position.
    pub fn remove_image(&mut self, index: usize) -> Option<RawImage> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        if !matches!(self.state, SessionState::Analyzing) {
            self.state = if self.images.is_empty() {
                SessionState::Idle
            } else {
                SessionState::Ready {
                    image_count: self.images.len(),
                }
            };
        }
        Some(removed)
    }

    /// Drop the selection and any report, abort an in-flight analysis, and
    /// return to Idle.
    pub fn reset(&mut self) {
        if let Some(abort) = self.in_flight.take() {
            abort.abort();
        }
        self.images.clear();
        self.report = None;
        self.state = SessionState::Idle;
    }

    /// Start analyzing the current selection.
    ///
    /// The selection and config are cloned into a spawned task; the returned
    /// handle is the only way to obtain the outcome. Call [`finish`] with
    /// the joined result to record it in the session.
    ///
    /// [`finish`]: AnalysisSession::finish
    pub fn start(&mut self, collaborator: Arc<dyn Collaborator>) -> SnapResult<AnalysisTask> {
        if self.images.is_empty() {
            return Err(SnapError::NoImages);
        }
        let images = self.images.clone();
        let config = self.config.clone();
        let handle = tokio::spawn(async move {
            crate::analyze_images(images, &config, collaborator.as_ref()).await
        });
        self.in_flight = Some(handle.abort_handle());
        self.state = SessionState::Analyzing;
        self.report = None;
        Ok(AnalysisTask { handle })
    }

    /// Record the outcome of a joined analysis task.
    ///
    /// A no-op unless the session is still Analyzing, so a reset that raced
    /// the task keeps its Idle state.
    pub fn finish(&mut self, outcome: SnapResult<NutritionReport>) -> &SessionState {
        if matches!(self.state, SessionState::Analyzing) {
            self.in_flight = None;
            match outcome {
                Ok(report) => {
                    self.report = Some(report);
                    self.state = SessionState::Done;
                }
                Err(err) => {
                    log::warn!("analysis failed: {}", err);
                    self.state = SessionState::Failed {
                        message: err.user_message(),
                    };
                }
            }
        }
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            image_count: self.images.len(),
            report: self.report.clone(),
        }
    }
}
