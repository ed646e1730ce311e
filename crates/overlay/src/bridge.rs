//! Request/response messages exchanged with the host process.
//!
//! File dialogs and capture-area selection run outside the controller.
//! Requests are queued here and drained by the host; answers come back as
//! plain messages. File answers are correlated by the media tag they echo,
//! not by a request id, so only one file request can be outstanding.

use std::collections::VecDeque;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use livemix_platform_core::CaptureRegion;

/// Media type requested from the file dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Gif,
    Video,
}

impl MediaKind {
    /// File extensions the dialog should offer.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["jpg", "png"],
            MediaKind::Gif => &["gif"],
            MediaKind::Video => &["mp4", "avi"],
        }
    }

    pub fn filter_name(self) -> &'static str {
        match self {
            MediaKind::Image => "Images",
            MediaKind::Gif => "GIF",
            MediaKind::Video => "Videos",
        }
    }

    pub fn filter(self) -> FileFilter {
        FileFilter {
            name: self.filter_name().to_string(),
            extensions: self.extensions().iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A named set of extensions for the host file dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// A request for the host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum HostRequest {
    /// Open a single-file dialog for the given media type.
    SelectFile {
        kind: MediaKind,
        filters: Vec<FileFilter>,
    },
    /// Let the operator draw a capture area on the given display.
    SelectCaptureArea { display_bounds: Option<CaptureRegion> },
}

/// Host answer to [`HostRequest::SelectFile`]. `paths` is empty when the
/// operator cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    pub kind: MediaKind,
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Answer to a capture-target selection: an area of the display, or a
/// window picked from the window list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureTarget {
    Region(CaptureRegion),
    Window { window_id: u64 },
}

/// Outbox and correlation state for host requests.
#[derive(Debug, Default)]
pub struct HostBridge {
    outbox: VecDeque<HostRequest>,
    pending_file: Option<MediaKind>,
    pending_area: bool,
}

impl HostBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a file dialog request.
    ///
    /// A request issued while another is unresolved replaces it; whichever
    /// answer arrives is routed by the tag it carries.
    pub fn request_file(&mut self, kind: MediaKind) {
        if let Some(previous) = self.pending_file.replace(kind) {
            tracing::warn!(?previous, ?kind, "File request issued while another is outstanding");
        }
        self.outbox.push_back(HostRequest::SelectFile {
            kind,
            filters: vec![kind.filter()],
        });
    }

    /// Queue a capture-area request for a display.
    pub fn request_capture_area(&mut self, display_bounds: Option<CaptureRegion>) {
        self.pending_area = true;
        self.outbox.push_back(HostRequest::SelectCaptureArea { display_bounds });
    }

    /// Resolve a file answer. Returns the chosen path, or `None` if the
    /// operator cancelled.
    pub fn resolve_file(&mut self, selection: FileSelection) -> Option<(MediaKind, PathBuf)> {
        match self.pending_file.take() {
            Some(pending) if pending != selection.kind => {
                tracing::warn!(?pending, answered = ?selection.kind, "File answer does not match outstanding request");
            }
            None => {
                tracing::warn!(answered = ?selection.kind, "Unsolicited file answer");
            }
            _ => {}
        }
        let path = selection.paths.into_iter().next()?;
        Some((selection.kind, path))
    }

    /// Mark a capture-area answer as received. Returns whether one was
    /// outstanding.
    pub fn resolve_capture_area(&mut self) -> bool {
        std::mem::take(&mut self.pending_area)
    }

    /// Take all queued requests, oldest first.
    pub fn drain(&mut self) -> Vec<HostRequest> {
        self.outbox.drain(..).collect()
    }
}
