//! Error types shared across LiveMix crates.

/// Top-level error type for LiveMix operations.
///
/// Geometry and registry variants are recovered locally by the preview
/// controller; engine variants are surfaced to the caller as notifications.
#[derive(Debug, thiserror::Error)]
pub enum LivemixError {
    #[error("Index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("Capture source already active at index {index}")]
    DuplicateCaptureSource { index: usize },

    #[error("Composition {operation} failed with status {status}")]
    CompositionFailure {
        operation: &'static str,
        status: i32,
    },

    #[error("No capture devices available")]
    DeviceEnumerationEmpty,

    #[error("Zoom factor {zoom} is not usable; preview surface not ready")]
    StaleZoomFactor { zoom: f64 },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using LivemixError.
pub type LivemixResult<T> = Result<T, LivemixError>;

impl LivemixError {
    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn composition(operation: &'static str, status: i32) -> Self {
        Self::CompositionFailure { operation, status }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    /// Whether the error only means "ignore this request" from the
    /// controller's point of view.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidIndex { .. }
                | Self::DuplicateCaptureSource { .. }
                | Self::StaleZoomFactor { .. }
        )
    }
}
