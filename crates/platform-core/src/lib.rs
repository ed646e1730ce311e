//! LiveMix platform core contracts.
//!
//! This crate contains the capture-device, screen-source and output-canvas
//! data structures shared by the compositor and overlay crates without
//! coupling to a concrete engine.

use serde::{Deserialize, Serialize};

/// One capture format a camera reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// A camera as reported by engine device enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    /// Supported capture formats, in engine order.
    #[serde(default)]
    pub capabilities: Vec<DeviceCapability>,
}

impl DeviceDescriptor {
    /// Capability at `index`, if the device reports one.
    pub fn capability(&self, index: usize) -> Option<DeviceCapability> {
        self.capabilities.get(index).copied()
    }
}

/// A rectangle on the physical desktop, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// The zero region, meaning "capture the whole display/window".
    pub const FULL: CaptureRegion = CaptureRegion {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };
}

/// What a screen capture source refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSourceKind {
    Display,
    Window,
}

/// A display or window the engine can capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSource {
    pub source_id: u64,
    pub kind: ScreenSourceKind,
    #[serde(default)]
    pub name: String,
    /// Position of the source on the virtual desktop.
    #[serde(default)]
    pub position: CaptureRegion,
}

/// Parameters for starting a camera capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraCaptureConfig {
    pub device_id: String,
    pub format: DeviceCapability,
}

/// Encoding parameters shared by display and window captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenCaptureParameters {
    pub width: u32,
    pub height: u32,
    /// Bitrate in Kbps.
    pub bitrate: u32,
    pub frame_rate: u32,
    pub capture_cursor: bool,
}

/// Capture request passed to the engine before a capture-backed source is
/// added to the composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureConfig {
    Camera(CameraCaptureConfig),
    Display {
        display_id: u64,
        region: CaptureRegion,
        parameters: ScreenCaptureParameters,
    },
    Window {
        window_id: u64,
        parameters: ScreenCaptureParameters,
    },
}

/// Output canvas orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Output canvas dimensions in source-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPreset {
    pub width: u32,
    pub height: u32,
}

impl Orientation {
    /// The only two output canvases the composition supports.
    pub fn preset(self) -> OutputPreset {
        match self {
            Orientation::Horizontal => OutputPreset {
                width: 1280,
                height: 720,
            },
            Orientation::Vertical => OutputPreset {
                width: 720,
                height: 1280,
            },
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// First display among enumerated screen sources.
pub fn primary_display(sources: &[ScreenSource]) -> Option<&ScreenSource> {
    sources
        .iter()
        .find(|s| s.kind == ScreenSourceKind::Display)
}

/// Window capture candidates, in engine order.
pub fn capturable_windows(sources: &[ScreenSource]) -> Vec<ScreenSource> {
    sources
        .iter()
        .filter(|s| s.kind == ScreenSourceKind::Window)
        .cloned()
        .collect()
}
