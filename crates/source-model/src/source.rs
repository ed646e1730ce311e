//! Compositable source types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geometry::SourceRect;

/// Engine-side identifier of a media player instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaPlayerHandle(pub i32);

/// Kind of video input a source composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    CameraPrimary,
    CameraSecondary,
    ScreenPrimary,
    ImagePng,
    ImageJpeg,
    ImageGif,
    MediaPlayer,
}

impl SourceType {
    /// Camera slots are bound once; adding the same slot twice reconfigures it.
    pub fn is_camera(self) -> bool {
        matches!(self, SourceType::CameraPrimary | SourceType::CameraSecondary)
    }

    /// Camera slot for an enumerated device index.
    pub fn camera_for_device(device_index: usize) -> Self {
        if device_index > 0 {
            SourceType::CameraSecondary
        } else {
            SourceType::CameraPrimary
        }
    }

    /// Still image type for a file path: `.png` or JPEG otherwise.
    pub fn image_for_path(path: &std::path::Path) -> Self {
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            SourceType::ImagePng
        } else {
            SourceType::ImageJpeg
        }
    }
}

/// Variant-specific data carried by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePayload {
    /// Camera and screen sources; already bound to the engine by a capture call.
    Capture,
    /// Still or animated image file.
    Image { url: PathBuf },
    /// Engine media player instance.
    MediaPlayer { handle: MediaPlayerHandle },
}

/// A source waiting to be inserted into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    pub source_type: SourceType,
    pub payload: SourcePayload,
}

impl NewSource {
    pub fn capture(source_type: SourceType) -> Self {
        Self {
            source_type,
            payload: SourcePayload::Capture,
        }
    }

    pub fn image(source_type: SourceType, url: impl Into<PathBuf>) -> Self {
        Self {
            source_type,
            payload: SourcePayload::Image { url: url.into() },
        }
    }

    pub fn media_player(handle: MediaPlayerHandle) -> Self {
        Self {
            source_type: SourceType::MediaPlayer,
            payload: SourcePayload::MediaPlayer { handle },
        }
    }
}

/// One compositable video input.
///
/// All geometry is in source space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub source_type: SourceType,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z_order: i32,
    /// Opacity in `[0.0, 1.0]`. Never changed by the controller.
    pub alpha: f64,
    pub payload: SourcePayload,
}

impl Source {
    pub fn rect(&self) -> SourceRect {
        SourceRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn image_url(&self) -> Option<&std::path::Path> {
        match &self.payload {
            SourcePayload::Image { url } => Some(url),
            _ => None,
        }
    }

    pub fn media_player(&self) -> Option<MediaPlayerHandle> {
        match self.payload {
            SourcePayload::MediaPlayer { handle } => Some(handle),
            _ => None,
        }
    }
}
