//! LiveMix Overlay Controller
//!
//! The interactive layer on top of the preview surface. It owns the source
//! registry, interprets pointer gestures against it, and keeps the engine's
//! composition in step with every committed change.
//!
//! # Architecture
//!
//! ```text
//! InputEvent ──► SelectionController ──► SelectionCommand
//!                      │ reads                  │
//!                      ▼                        ▼
//!               SourceRegistry ◄──── LivePreviewController ────► CompositionSessionManager
//!                                          │        ▲                     │
//!                              HostRequest ▼        │ FileSelection        ▼
//!                                     host process ─┘ CaptureTarget   CompositionEngine
//! ```

pub mod bridge;
pub mod controller;
pub mod input;
pub mod layout;
pub mod notification;
pub mod selection;

pub use bridge::*;
pub use controller::*;
pub use input::*;
pub use layout::*;
pub use notification::*;
pub use selection::*;
