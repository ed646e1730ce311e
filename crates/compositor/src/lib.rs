//! LiveMix Compositor
//!
//! Drives the external real-time engine that captures, composites and
//! encodes the live frame. The controller never renders anything itself:
//! it translates the source registry into a transcoding configuration and
//! decides whether to start a session or reconfigure the running one.
//!
//! # Session Lifecycle
//!
//! ```text
//!                 registry mutation
//!   ┌──────────┐  (start_composition)   ┌──────────┐
//!   │ Inactive │ ─────────────────────► │  Active  │ ──┐ registry mutation
//!   └──────────┘                        └──────────┘ ◄─┘ (update_composition)
//!        ▲                                    │
//!        └──── stop / orientation change ─────┘
//!                 (stop_composition)
//! ```

pub mod dry_run;
pub mod engine;
pub mod session;
pub mod transcode;

pub use dry_run::{DryRunEngine, EngineCall};
pub use engine::*;
pub use session::*;
pub use transcode::*;
