//! Composition session management.

use chrono::{DateTime, Utc};
use serde::Serialize;

use livemix_common::error::LivemixResult;
use livemix_platform_core::Orientation;
use livemix_source_model::Source;

use crate::engine::{CompositionEngine, PreviewSurface};
use crate::transcode::{OutputConfig, TranscodingConfig};

/// State of the engine composition as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No composition running.
    Inactive,
    /// Composition running with an output canvas fixed at start.
    Active {
        orientation: Orientation,
        started_at: DateTime<Utc>,
    },
}

/// Which engine call a registry sync produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCall {
    Started,
    Updated,
}

/// Decides, for every registry mutation, between starting a composition and
/// reconfiguring the running one.
///
/// Engine failures are returned to the caller. The registry mutation that
/// triggered the call is never rolled back, so the model and the engine may
/// diverge until the next successful call or an explicit stop.
#[derive(Debug)]
pub struct CompositionSessionManager {
    state: SessionState,
    surface: PreviewSurface,
    frame_rate: u32,
}

impl CompositionSessionManager {
    pub fn new(surface: PreviewSurface, frame_rate: u32) -> Self {
        Self {
            state: SessionState::Inactive,
            surface,
            frame_rate,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Orientation the running session was started with.
    pub fn active_orientation(&self) -> Option<Orientation> {
        match self.state {
            SessionState::Active { orientation, .. } => Some(orientation),
            SessionState::Inactive => None,
        }
    }

    /// Push the committed registry to the engine.
    ///
    /// Starts a session (and attaches the preview surface) when inactive,
    /// otherwise issues an incremental update. A failed start leaves the
    /// session inactive so the next mutation retries it.
    pub fn sync<E: CompositionEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        sources: &[Source],
        orientation: Orientation,
    ) -> LivemixResult<SessionCall> {
        match self.state {
            SessionState::Inactive => {
                let config = TranscodingConfig::new(sources, self.output(orientation));
                tracing::info!(
                    streams = config.stream_count,
                    width = config.output.width,
                    height = config.output.height,
                    "Starting composition session"
                );
                engine.start_composition(&config).composition("start")?;

                let attach = engine.attach_preview(Some(self.surface));
                if !attach.is_ok() {
                    tracing::warn!(status = attach.0, "Failed to attach preview surface");
                }

                self.state = SessionState::Active {
                    orientation,
                    started_at: Utc::now(),
                };
                tracing::info!("Composition session started");
                Ok(SessionCall::Started)
            }
            SessionState::Active {
                orientation: active,
                ..
            } => {
                if active != orientation {
                    tracing::warn!(
                        ?active,
                        requested = ?orientation,
                        "Output canvas is fixed for the running session; keeping active orientation"
                    );
                }
                let config = TranscodingConfig::new(sources, self.output(active));
                tracing::debug!(streams = config.stream_count, "Updating composition");
                engine.update_composition(&config).composition("update")?;
                Ok(SessionCall::Updated)
            }
        }
    }

    /// Push a non-committed candidate layer list while a gesture is in
    /// progress. Does nothing while inactive; returns whether a call was made.
    pub fn push_live<E: CompositionEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        candidate: &[Source],
    ) -> LivemixResult<bool> {
        let Some(orientation) = self.active_orientation() else {
            return Ok(false);
        };
        let config = TranscodingConfig::new(candidate, self.output(orientation));
        engine
            .update_composition(&config)
            .composition("live update")?;
        Ok(true)
    }

    /// Tear down the running session. Returns whether a session was running.
    ///
    /// The session is considered stopped even if the engine reports a
    /// failure; the failure is still returned.
    pub fn stop<E: CompositionEngine + ?Sized>(&mut self, engine: &mut E) -> LivemixResult<bool> {
        if !self.is_active() {
            return Ok(false);
        }

        tracing::info!("Stopping composition session");
        let status = engine.stop_composition();
        let detach = engine.attach_preview(None);
        if !detach.is_ok() {
            tracing::warn!(status = detach.0, "Failed to detach preview surface");
        }
        self.state = SessionState::Inactive;
        status.composition("stop")?;
        tracing::info!("Composition session stopped");
        Ok(true)
    }

    fn output(&self, orientation: Orientation) -> OutputConfig {
        OutputConfig::for_orientation(orientation, self.frame_rate)
    }
}
