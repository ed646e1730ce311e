//! An engine that renders nothing and records every call.
//!
//! Used by the CLI to replay preview sessions without a real engine, and by
//! tests to assert on the exact call sequence the controller produces.

use std::path::{Path, PathBuf};

use serde::Serialize;

use livemix_platform_core::{
    CaptureConfig, CaptureRegion, DeviceDescriptor, ScreenSource, ScreenSourceKind,
};
use livemix_source_model::{MediaPlayerHandle, SourceType};

use crate::engine::{CompositionEngine, PreviewSurface, StatusCode};
use crate::transcode::TranscodingConfig;

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", content = "args", rename_all = "snake_case")]
pub enum EngineCall {
    StartComposition(TranscodingConfig),
    UpdateComposition(TranscodingConfig),
    StopComposition,
    AttachPreview(Option<PreviewSurface>),
    StartCapture {
        source_type: SourceType,
        config: CaptureConfig,
    },
    StopCapture(SourceType),
    CreateMediaPlayer(MediaPlayerHandle),
    OpenMedia {
        handle: MediaPlayerHandle,
        path: PathBuf,
    },
    PlayMedia(MediaPlayerHandle),
}

/// Recording engine with configurable inventory and failure injection.
#[derive(Debug, Default)]
pub struct DryRunEngine {
    calls: Vec<EngineCall>,
    devices: Vec<DeviceDescriptor>,
    screens: Vec<ScreenSource>,
    next_player: i32,
    fail_start: Option<i32>,
    fail_update: Option<i32>,
    fail_capture: Option<i32>,
    fail_open_media: Option<i32>,
}

impl DryRunEngine {
    /// An engine with no cameras and a single 1920x1080 display.
    pub fn new() -> Self {
        Self {
            screens: vec![ScreenSource {
                source_id: 1,
                kind: ScreenSourceKind::Display,
                name: "Display 1".to_string(),
                position: CaptureRegion {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1080,
                },
            }],
            next_player: 1,
            ..Self::default()
        }
    }

    pub fn with_devices(mut self, devices: Vec<DeviceDescriptor>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_screen_sources(mut self, screens: Vec<ScreenSource>) -> Self {
        self.screens = screens;
        self
    }

    /// Make start calls return `status` (or succeed again with `None`).
    pub fn fail_start(&mut self, status: Option<i32>) {
        self.fail_start = status;
    }

    pub fn fail_update(&mut self, status: Option<i32>) {
        self.fail_update = status;
    }

    pub fn fail_capture(&mut self, status: Option<i32>) {
        self.fail_capture = status;
    }

    pub fn fail_open_media(&mut self, status: Option<i32>) {
        self.fail_open_media = status;
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn start_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::StartComposition(_)))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::UpdateComposition(_)))
            .count()
    }

    /// Configuration of the most recent start or update call.
    pub fn last_config(&self) -> Option<&TranscodingConfig> {
        self.calls.iter().rev().find_map(|c| match c {
            EngineCall::StartComposition(config) | EngineCall::UpdateComposition(config) => {
                Some(config)
            }
            _ => None,
        })
    }

    fn status(fail: Option<i32>) -> StatusCode {
        fail.map(StatusCode).unwrap_or(StatusCode::OK)
    }
}

impl CompositionEngine for DryRunEngine {
    fn start_composition(&mut self, config: &TranscodingConfig) -> StatusCode {
        tracing::debug!(streams = config.stream_count, "dry-run: start composition");
        self.calls.push(EngineCall::StartComposition(config.clone()));
        Self::status(self.fail_start)
    }

    fn update_composition(&mut self, config: &TranscodingConfig) -> StatusCode {
        tracing::debug!(streams = config.stream_count, "dry-run: update composition");
        self.calls.push(EngineCall::UpdateComposition(config.clone()));
        Self::status(self.fail_update)
    }

    fn stop_composition(&mut self) -> StatusCode {
        tracing::debug!("dry-run: stop composition");
        self.calls.push(EngineCall::StopComposition);
        StatusCode::OK
    }

    fn attach_preview(&mut self, surface: Option<PreviewSurface>) -> StatusCode {
        self.calls.push(EngineCall::AttachPreview(surface));
        StatusCode::OK
    }

    fn start_capture(&mut self, source_type: SourceType, config: &CaptureConfig) -> StatusCode {
        tracing::debug!(?source_type, "dry-run: start capture");
        self.calls.push(EngineCall::StartCapture {
            source_type,
            config: config.clone(),
        });
        Self::status(self.fail_capture)
    }

    fn stop_capture(&mut self, source_type: SourceType) -> StatusCode {
        self.calls.push(EngineCall::StopCapture(source_type));
        StatusCode::OK
    }

    fn enumerate_capture_devices(&mut self) -> Vec<DeviceDescriptor> {
        self.devices.clone()
    }

    fn enumerate_screen_sources(&mut self) -> Vec<ScreenSource> {
        self.screens.clone()
    }

    fn create_media_player(&mut self) -> MediaPlayerHandle {
        let handle = MediaPlayerHandle(self.next_player);
        self.next_player += 1;
        self.calls.push(EngineCall::CreateMediaPlayer(handle));
        handle
    }

    fn open_media(&mut self, handle: MediaPlayerHandle, path: &Path) -> StatusCode {
        self.calls.push(EngineCall::OpenMedia {
            handle,
            path: path.to_path_buf(),
        });
        Self::status(self.fail_open_media)
    }

    fn play_media(&mut self, handle: MediaPlayerHandle) -> StatusCode {
        self.calls.push(EngineCall::PlayMedia(handle));
        StatusCode::OK
    }
}
