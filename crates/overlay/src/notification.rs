//! Observable events emitted by the preview controller.
//!
//! The registry is not bound to any UI reactivity mechanism; the UI redraws
//! when it drains these.

use chrono::{DateTime, Utc};
use serde::Serialize;

use livemix_platform_core::Orientation;
use livemix_source_model::{DisplayRect, SourceType};

/// Something the UI (or a script runner) may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PreviewNotification {
    /// The committed source list changed.
    SnapshotChanged { source_count: usize },
    /// The selection or its box changed.
    SelectionChanged {
        selected: Option<usize>,
        selection_box: Option<DisplayRect>,
    },
    SessionStarted {
        orientation: Orientation,
        started_at: DateTime<Utc>,
    },
    SessionStopped,
    /// An engine start/update/stop call failed; the registry was kept.
    CompositionFailed { operation: &'static str, status: i32 },
    /// The engine refused to start a capture; no source was added.
    CaptureFailed { source_type: SourceType, status: i32 },
    /// No camera is available.
    NoCaptureDevices,
}
