//! LiveMix Source Model
//!
//! Defines the core data contracts for a live composition:
//! - **Geometry:** Zoom-aware conversions between display and source space, hit testing
//! - **Source:** One compositable video input and its payload
//! - **Registry:** The ordered, authoritative collection of active sources
//!
//! Source geometry is always stored in source space, the coordinate system
//! the engine composites in. Display space only exists at the edges, where
//! pointer input arrives and the selection box is drawn.

pub mod geometry;
pub mod registry;
pub mod source;

pub use geometry::*;
pub use registry::*;
pub use source::*;
