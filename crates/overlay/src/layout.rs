//! Output canvas orientation.

use livemix_platform_core::{Orientation, OutputPreset};
use livemix_source_model::{preview_mask_size, Zoom};

/// Tracks whether the output canvas is horizontal or vertical.
///
/// The canvas size is fixed when a session starts, so any geometry laid out
/// for one orientation is meaningless under the other. Callers must tear
/// the session down and clear all sources when [`LayoutController::set`]
/// reports a change.
#[derive(Debug, Clone, Default)]
pub struct LayoutController {
    orientation: Orientation,
}

impl LayoutController {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn output(&self) -> OutputPreset {
        self.orientation.preset()
    }

    /// Switch orientation. Returns whether it actually changed.
    pub fn set(&mut self, orientation: Orientation) -> bool {
        if self.orientation == orientation {
            return false;
        }
        tracing::info!(from = ?self.orientation, to = ?orientation, "Output orientation changed");
        self.orientation = orientation;
        true
    }

    /// Extent of the pointer mask over the preview at `zoom`.
    pub fn mask_size(&self, zoom: Zoom) -> (i32, i32) {
        let output = self.output();
        preview_mask_size(output.width, output.height, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_changes_only() {
        let mut layout = LayoutController::default();
        assert_eq!(layout.orientation(), Orientation::Horizontal);
        assert!(!layout.set(Orientation::Horizontal));
        assert!(layout.set(Orientation::Vertical));
        assert_eq!((layout.output().width, layout.output().height), (720, 1280));
    }

    #[test]
    fn mask_tracks_orientation() {
        let mut layout = LayoutController::default();
        let zoom = Zoom::new(0.5).unwrap();
        assert_eq!(layout.mask_size(zoom), (640, 360));
        layout.set(Orientation::Vertical);
        assert_eq!(layout.mask_size(zoom), (360, 640));
    }
}
