//! Toolkit-neutral pointer events for the preview overlay.
//!
//! The host UI classifies what the pointer is over and forwards plain
//! coordinates; the overlay never depends on a windowing toolkit.

use serde::{Deserialize, Serialize};

use livemix_common::throttle::TimestampNs;

/// Corner grip of the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::TopRight)
    }
}

/// Buttons attached to the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Delete,
    MoveUp,
    MoveDown,
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The transparent mask covering the preview canvas.
    Mask,
    /// The body of the current selection box.
    SelectionBox,
    /// A corner grip of the current selection box.
    ResizeHandle(ResizeHandle),
    /// A selection-box button.
    Control(ControlAction),
    /// Anything else in the window.
    Outside,
}

/// A pointer event in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        target: PointerTarget,
        x: i32,
        y: i32,
    },
    PointerMove {
        x: i32,
        y: i32,
        /// Event time, used to throttle live updates.
        #[serde(default)]
        timestamp_ns: TimestampNs,
    },
    PointerUp {
        x: i32,
        y: i32,
    },
    /// The pointer left the tracked surface.
    PointerLeave,
}
