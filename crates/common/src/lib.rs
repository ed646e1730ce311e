//! LiveMix Common Utilities
//!
//! Shared infrastructure for all LiveMix crates:
//! - Error taxonomy and result alias
//! - Live-update throttling for drag gestures
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod throttle;

pub use config::*;
pub use error::*;
pub use throttle::*;
