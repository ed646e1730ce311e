//! The authoritative, ordered collection of active sources.

use livemix_common::error::{LivemixError, LivemixResult};

use crate::geometry::GeometryDelta;
use crate::source::{NewSource, Source};

/// Z-orders below this value are reserved for background layers.
pub const FIRST_SOURCE_Z_ORDER: i32 = 2;

/// Geometry given to newly inserted sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDefaults {
    pub width: i32,
    pub height: i32,
}

impl Default for SourceDefaults {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
        }
    }
}

/// Ordered source collection. Collection order is insertion order; stacking
/// is decided by `z_order`, not position.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    defaults: SourceDefaults,
}

impl SourceRegistry {
    pub fn new(defaults: SourceDefaults) -> Self {
        Self {
            sources: Vec::new(),
            defaults,
        }
    }

    /// Append a source at the origin with default size, stacked above
    /// everything inserted before it.
    ///
    /// A camera whose slot is already present is not inserted; the error
    /// carries the index of the existing entry.
    pub fn add(&mut self, new: NewSource) -> LivemixResult<usize> {
        if new.source_type.is_camera() {
            if let Some(index) = self.position_of(new.source_type) {
                tracing::debug!(source_type = ?new.source_type, index, "Camera slot already active");
                return Err(LivemixError::DuplicateCaptureSource { index });
            }
        }

        let z_order = self.sources.len() as i32 + FIRST_SOURCE_Z_ORDER;
        self.sources.push(Source {
            source_type: new.source_type,
            x: 0,
            y: 0,
            width: self.defaults.width,
            height: self.defaults.height,
            z_order,
            alpha: 1.0,
            payload: new.payload,
        });

        let index = self.sources.len() - 1;
        tracing::info!(source_type = ?new.source_type, index, z_order, "Source added");
        Ok(index)
    }

    /// Remove the source at `index`. Remaining z-orders keep their gaps.
    pub fn remove(&mut self, index: usize) -> LivemixResult<Source> {
        self.check(index)?;
        let removed = self.sources.remove(index);
        tracing::info!(source_type = ?removed.source_type, index, "Source removed");
        Ok(removed)
    }

    /// Raise the source one z-order step.
    pub fn move_up(&mut self, index: usize) -> LivemixResult<i32> {
        self.check(index)?;
        let source = &mut self.sources[index];
        source.z_order += 1;
        tracing::debug!(index, z_order = source.z_order, "Source moved up");
        Ok(source.z_order)
    }

    /// Lower the source one z-order step, never into the reserved band.
    ///
    /// Returns whether the z-order changed.
    pub fn move_down(&mut self, index: usize) -> LivemixResult<bool> {
        self.check(index)?;
        let source = &mut self.sources[index];
        if source.z_order < FIRST_SOURCE_Z_ORDER {
            return Ok(false);
        }
        source.z_order -= 1;
        tracing::debug!(index, z_order = source.z_order, "Source moved down");
        Ok(true)
    }

    /// Apply a source-space delta. Plain integer addition, no clamping.
    pub fn update_geometry(&mut self, index: usize, delta: GeometryDelta) -> LivemixResult<()> {
        self.check(index)?;
        apply_delta(&mut self.sources[index], delta);
        let source = &self.sources[index];
        tracing::debug!(
            index,
            x = source.x,
            y = source.y,
            width = source.width,
            height = source.height,
            "Source geometry committed"
        );
        Ok(())
    }

    /// Candidate list with `delta` applied to one entry; the registry is
    /// left untouched.
    pub fn preview_with(&self, index: usize, delta: GeometryDelta) -> LivemixResult<Vec<Source>> {
        self.check(index)?;
        let mut candidate = self.sources.clone();
        apply_delta(&mut candidate[index], delta);
        Ok(candidate)
    }

    /// Immutable ordered view of the registry.
    pub fn snapshot(&self) -> &[Source] {
        &self.sources
    }

    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.sources.is_empty() {
            tracing::info!(count = self.sources.len(), "Registry cleared");
        }
        self.sources.clear();
    }

    pub fn contains_type(&self, source_type: crate::source::SourceType) -> bool {
        self.position_of(source_type).is_some()
    }

    fn position_of(&self, source_type: crate::source::SourceType) -> Option<usize> {
        self.sources
            .iter()
            .position(|s| s.source_type == source_type)
    }

    fn check(&self, index: usize) -> LivemixResult<()> {
        if index < self.sources.len() {
            Ok(())
        } else {
            Err(LivemixError::invalid_index(index, self.sources.len()))
        }
    }
}

fn apply_delta(source: &mut Source, delta: GeometryDelta) {
    source.x += delta.dx;
    source.y += delta.dy;
    source.width += delta.dw;
    source.height += delta.dh;
}
