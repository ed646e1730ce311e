//! Capability contract of the external real-time engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use livemix_platform_core::{CaptureConfig, DeviceDescriptor, ScreenSource};
use livemix_source_model::{MediaPlayerHandle, SourceType};

use crate::transcode::TranscodingConfig;

/// Result code returned by every engine call. Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0);

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Convert into a composition result for `operation`.
    pub fn composition(self, operation: &'static str) -> livemix_common::LivemixResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(livemix_common::LivemixError::composition(operation, self.0))
        }
    }
}

/// Opaque handle of the caller-owned surface the engine renders the
/// composited preview into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewSurface(pub u64);

/// Lifecycle states reported by an engine media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPlayerState {
    Idle,
    Opening,
    OpenCompleted,
    Playing,
    Failed,
}

/// Operations the controller needs from the engine.
///
/// All calls are synchronous from the controller's point of view; the
/// engine may do asynchronous work internally.
pub trait CompositionEngine {
    /// Start compositing the given layers into the configured output.
    fn start_composition(&mut self, config: &TranscodingConfig) -> StatusCode;

    /// Reconfigure the running composition.
    fn update_composition(&mut self, config: &TranscodingConfig) -> StatusCode;

    /// Tear down the running composition.
    fn stop_composition(&mut self) -> StatusCode;

    /// Bind (or with `None`, unbind) the composited preview to a surface.
    fn attach_preview(&mut self, surface: Option<PreviewSurface>) -> StatusCode;

    /// Acquire a camera or screen capture for a capture-backed source.
    fn start_capture(&mut self, source_type: SourceType, config: &CaptureConfig) -> StatusCode;

    /// Release the capture bound to `source_type`.
    fn stop_capture(&mut self, source_type: SourceType) -> StatusCode;

    /// Cameras available for capture.
    fn enumerate_capture_devices(&mut self) -> Vec<DeviceDescriptor>;

    /// Displays and windows available for capture.
    fn enumerate_screen_sources(&mut self) -> Vec<ScreenSource>;

    fn create_media_player(&mut self) -> MediaPlayerHandle;

    fn open_media(&mut self, handle: MediaPlayerHandle, path: &Path) -> StatusCode;

    fn play_media(&mut self, handle: MediaPlayerHandle) -> StatusCode;
}

impl<E: CompositionEngine + ?Sized> CompositionEngine for Box<E> {
    fn start_composition(&mut self, config: &TranscodingConfig) -> StatusCode {
        (**self).start_composition(config)
    }

    fn update_composition(&mut self, config: &TranscodingConfig) -> StatusCode {
        (**self).update_composition(config)
    }

    fn stop_composition(&mut self) -> StatusCode {
        (**self).stop_composition()
    }

    fn attach_preview(&mut self, surface: Option<PreviewSurface>) -> StatusCode {
        (**self).attach_preview(surface)
    }

    fn start_capture(&mut self, source_type: SourceType, config: &CaptureConfig) -> StatusCode {
        (**self).start_capture(source_type, config)
    }

    fn stop_capture(&mut self, source_type: SourceType) -> StatusCode {
        (**self).stop_capture(source_type)
    }

    fn enumerate_capture_devices(&mut self) -> Vec<DeviceDescriptor> {
        (**self).enumerate_capture_devices()
    }

    fn enumerate_screen_sources(&mut self) -> Vec<ScreenSource> {
        (**self).enumerate_screen_sources()
    }

    fn create_media_player(&mut self) -> MediaPlayerHandle {
        (**self).create_media_player()
    }

    fn open_media(&mut self, handle: MediaPlayerHandle, path: &Path) -> StatusCode {
        (**self).open_media(handle, path)
    }

    fn play_media(&mut self, handle: MediaPlayerHandle) -> StatusCode {
        (**self).play_media(handle)
    }
}
