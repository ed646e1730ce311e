//! Pointer gesture interpretation for the selection box.
//!
//! States:
//!
//! ```text
//! Idle ──down on mask──► (hit test, select) ──► Idle
//! Idle ──down on box/handle──► Dragging | Resizing ──move──► live preview
//!                                   │
//!                                   └──up / leave──► commit ──► Idle
//! ```
//!
//! The controller never mutates the registry itself; it returns a
//! [`SelectionCommand`] describing what the caller should apply.

use serde::Serialize;

use livemix_common::throttle::TimestampNs;
use livemix_source_model::{
    delta_from_display, hit_test, DisplayPoint, DisplayRect, GeometryDelta, Source, Zoom,
};

use crate::input::{ControlAction, InputEvent, PointerTarget, ResizeHandle};

/// Kind of gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

/// Display-space change of the selection box since the gesture started:
/// corner offset and size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxMotion {
    pub dx: i32,
    pub dy: i32,
    pub dw: i32,
    pub dh: i32,
}

impl BoxMotion {
    fn from_gesture(kind: GestureKind, mx: i32, my: i32) -> Self {
        match kind {
            GestureKind::Drag => Self {
                dx: mx,
                dy: my,
                dw: 0,
                dh: 0,
            },
            GestureKind::Resize(handle) => {
                let (dx, dw) = if handle.moves_left() { (mx, -mx) } else { (0, mx) };
                let (dy, dh) = if handle.moves_top() { (my, -my) } else { (0, my) };
                Self { dx, dy, dw, dh }
            }
        }
    }

    fn to_rect(self, start: DisplayRect) -> DisplayRect {
        DisplayRect {
            left: start.left + self.dx,
            top: start.top + self.dy,
            width: start.width + self.dw,
            height: start.height + self.dh,
        }
    }

    fn to_source(self, zoom: Zoom) -> GeometryDelta {
        delta_from_display(self.dx, self.dy, self.dw, self.dh, zoom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Active {
        kind: GestureKind,
        index: usize,
        anchor: DisplayPoint,
        start: DisplayRect,
        last: Option<BoxMotion>,
    },
}

/// What the caller must do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCommand {
    /// The selected index or the selection box changed; redraw.
    SelectionChanged,
    /// Push a non-committing preview with `delta` applied to `index`.
    LivePreview {
        index: usize,
        delta: GeometryDelta,
        timestamp_ns: TimestampNs,
    },
    /// Apply `delta` to the registry and push the committed state.
    Commit { index: usize, delta: GeometryDelta },
    /// Run a selection-box button against `index`.
    Control { action: ControlAction, index: usize },
}

/// Selection state machine over pointer events.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selected: Option<usize>,
    rect: Option<DisplayRect>,
    gesture: Gesture,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: None,
            rect: None,
            gesture: Gesture::Idle,
        }
    }

    /// Selected registry index, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selection box in display space, if a source is selected.
    pub fn selection_box(&self) -> Option<DisplayRect> {
        self.rect
    }

    /// A drag or resize is in progress (updates are live, not committed).
    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Active { .. })
    }

    pub fn gesture_kind(&self) -> Option<GestureKind> {
        match self.gesture {
            Gesture::Active { kind, .. } => Some(kind),
            Gesture::Idle => None,
        }
    }

    /// Drop the selection and any gesture in progress.
    pub fn clear(&mut self) {
        self.selected = None;
        self.rect = None;
        self.gesture = Gesture::Idle;
    }

    /// Recompute the selection box from committed geometry, e.g. after a
    /// registry mutation or a zoom change. A selection that no longer points
    /// into the registry is dropped. Returns whether anything changed.
    pub fn refresh(&mut self, sources: &[Source], zoom: Zoom) -> bool {
        let before = (self.selected, self.rect);
        match self.selected {
            Some(index) if index < sources.len() => {
                self.rect = Some(sources[index].rect().to_display(zoom));
            }
            Some(_) => self.clear(),
            None => self.rect = None,
        }
        before != (self.selected, self.rect)
    }

    /// Interpret one pointer event against the committed sources.
    pub fn handle(
        &mut self,
        event: InputEvent,
        sources: &[Source],
        zoom: Zoom,
    ) -> Option<SelectionCommand> {
        match event {
            InputEvent::PointerDown { target, x, y } => {
                self.pointer_down(target, DisplayPoint::new(x, y), sources, zoom)
            }
            InputEvent::PointerMove { x, y, timestamp_ns } => {
                let (index, motion, _) = self.track(DisplayPoint::new(x, y))?;
                if index >= sources.len() {
                    self.gesture = Gesture::Idle;
                    return None;
                }
                Some(SelectionCommand::LivePreview {
                    index,
                    delta: motion.to_source(zoom),
                    timestamp_ns,
                })
            }
            InputEvent::PointerUp { x, y } => {
                let (index, motion, moved) = self.track(DisplayPoint::new(x, y))?;
                self.gesture = Gesture::Idle;
                if index >= sources.len() {
                    return None;
                }
                let delta = motion.to_source(zoom);
                if !moved && delta.is_zero() {
                    // A plain click on the box: nothing live to settle.
                    tracing::debug!(index, "Gesture released without motion");
                    return None;
                }
                Some(SelectionCommand::Commit { index, delta })
            }
            InputEvent::PointerLeave => {
                // No rollback: the last live geometry stands.
                let Gesture::Active { index, last, .. } = self.gesture else {
                    return None;
                };
                self.gesture = Gesture::Idle;
                let motion = last?;
                if index >= sources.len() {
                    return None;
                }
                tracing::debug!(index, "Gesture abandoned; keeping last live geometry");
                Some(SelectionCommand::Commit {
                    index,
                    delta: motion.to_source(zoom),
                })
            }
        }
    }

    fn pointer_down(
        &mut self,
        target: PointerTarget,
        point: DisplayPoint,
        sources: &[Source],
        zoom: Zoom,
    ) -> Option<SelectionCommand> {
        match target {
            PointerTarget::Mask => {
                self.gesture = Gesture::Idle;
                let hit = hit_test(point, sources, zoom);
                tracing::debug!(x = point.x, y = point.y, ?hit, "Hit test");
                let before = (self.selected, self.rect);
                self.selected = hit;
                self.rect = hit.map(|i| sources[i].rect().to_display(zoom));
                (before != (self.selected, self.rect)).then_some(SelectionCommand::SelectionChanged)
            }
            PointerTarget::SelectionBox => self.begin(GestureKind::Drag, point),
            PointerTarget::ResizeHandle(handle) => self.begin(GestureKind::Resize(handle), point),
            PointerTarget::Control(action) => self
                .selected
                .map(|index| SelectionCommand::Control { action, index }),
            PointerTarget::Outside => {
                let had_selection = self.selected.is_some();
                self.clear();
                had_selection.then_some(SelectionCommand::SelectionChanged)
            }
        }
    }

    fn begin(&mut self, kind: GestureKind, anchor: DisplayPoint) -> Option<SelectionCommand> {
        if let (Some(index), Some(start)) = (self.selected, self.rect) {
            tracing::debug!(index, ?kind, "Gesture started");
            self.gesture = Gesture::Active {
                kind,
                index,
                anchor,
                start,
                last: None,
            };
        }
        None
    }

    /// Advance the active gesture to `point`. Returns its index, the box
    /// motion so far, and whether an earlier move had already been tracked.
    fn track(&mut self, point: DisplayPoint) -> Option<(usize, BoxMotion, bool)> {
        let Gesture::Active {
            kind,
            index,
            anchor,
            start,
            last,
        } = &mut self.gesture
        else {
            return None;
        };
        let motion = BoxMotion::from_gesture(*kind, point.x - anchor.x, point.y - anchor.y);
        let moved = last.replace(motion).is_some();
        self.rect = Some(motion.to_rect(*start));
        Some((*index, motion, moved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemix_source_model::{SourcePayload, SourceType};

    fn source(x: i32, y: i32, w: i32, h: i32, z: i32) -> Source {
        Source {
            source_type: SourceType::ScreenPrimary,
            x,
            y,
            width: w,
            height: h,
            z_order: z,
            alpha: 1.0,
            payload: SourcePayload::Capture,
        }
    }

    fn down(target: PointerTarget, x: i32, y: i32) -> InputEvent {
        InputEvent::PointerDown { target, x, y }
    }

    fn mv(x: i32, y: i32) -> InputEvent {
        InputEvent::PointerMove {
            x,
            y,
            timestamp_ns: 0,
        }
    }

    #[test]
    fn mask_click_selects_topmost() {
        let sources = vec![source(0, 0, 100, 100, 5), source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        let cmd = sel.handle(down(PointerTarget::Mask, 10, 10), &sources, Zoom::IDENTITY);
        assert_eq!(cmd, Some(SelectionCommand::SelectionChanged));
        assert_eq!(sel.selected(), Some(0));
        assert_eq!(
            sel.selection_box(),
            Some(DisplayRect {
                left: 0,
                top: 0,
                width: 100,
                height: 100
            })
        );

        // Same click again changes nothing.
        assert_eq!(
            sel.handle(down(PointerTarget::Mask, 10, 10), &sources, Zoom::IDENTITY),
            None
        );
    }

    #[test]
    fn mask_click_on_empty_area_clears() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 10, 10), &sources, Zoom::IDENTITY);
        let cmd = sel.handle(down(PointerTarget::Mask, 500, 500), &sources, Zoom::IDENTITY);
        assert_eq!(cmd, Some(SelectionCommand::SelectionChanged));
        assert_eq!(sel.selected(), None);
        assert_eq!(sel.selection_box(), None);
    }

    #[test]
    fn outside_click_clears_selection() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 10, 10), &sources, Zoom::IDENTITY);
        assert_eq!(
            sel.handle(down(PointerTarget::Outside, 0, 0), &sources, Zoom::IDENTITY),
            Some(SelectionCommand::SelectionChanged)
        );
        assert_eq!(sel.selected(), None);
        assert_eq!(
            sel.handle(down(PointerTarget::Outside, 0, 0), &sources, Zoom::IDENTITY),
            None
        );
    }

    #[test]
    fn drag_emits_live_then_commit() {
        let zoom = Zoom::new(1.5).unwrap();
        let sources = vec![source(0, 0, 300, 300, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 150, 150), &sources, zoom);
        assert_eq!(sel.handle(down(PointerTarget::SelectionBox, 150, 150), &sources, zoom), None);
        assert!(sel.is_resizing());
        assert_eq!(sel.gesture_kind(), Some(GestureKind::Drag));

        let live = sel.handle(mv(300, 300), &sources, zoom);
        assert_eq!(
            live,
            Some(SelectionCommand::LivePreview {
                index: 0,
                delta: GeometryDelta {
                    dx: 100,
                    dy: 100,
                    dw: 0,
                    dh: 0
                },
                timestamp_ns: 0
            })
        );
        assert_eq!(sel.selection_box().map(|r| r.left), Some(150));

        let commit = sel.handle(InputEvent::PointerUp { x: 450, y: 450 }, &sources, zoom);
        assert_eq!(
            commit,
            Some(SelectionCommand::Commit {
                index: 0,
                delta: GeometryDelta {
                    dx: 200,
                    dy: 200,
                    dw: 0,
                    dh: 0
                }
            })
        );
        assert!(!sel.is_resizing());
    }

    #[test]
    fn click_on_box_without_motion_leaves_geometry_unchanged() {
        let zoom = Zoom::new(1.5).unwrap();
        let sources = vec![source(101, 101, 300, 300, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 200, 200), &sources, zoom);
        sel.handle(down(PointerTarget::SelectionBox, 200, 200), &sources, zoom);

        assert_eq!(sel.handle(InputEvent::PointerUp { x: 200, y: 200 }, &sources, zoom), None);
        assert!(!sel.is_resizing());
        assert_eq!(sel.selection_box().map(|r| (r.left, r.top)), Some((151, 151)));
    }

    #[test]
    fn drag_delta_depends_on_motion_not_position() {
        let zoom = Zoom::new(1.5).unwrap();
        let sources = vec![source(101, 101, 300, 300, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 200, 200), &sources, zoom);
        sel.handle(down(PointerTarget::SelectionBox, 200, 200), &sources, zoom);

        let cmd = sel.handle(InputEvent::PointerUp { x: 350, y: 201 }, &sources, zoom);
        assert_eq!(
            cmd,
            Some(SelectionCommand::Commit {
                index: 0,
                delta: GeometryDelta {
                    dx: 100,
                    dy: 0,
                    dw: 0,
                    dh: 0
                }
            })
        );
    }

    #[test]
    fn returning_to_anchor_still_commits_after_live_motion() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 50, 50), &sources, Zoom::IDENTITY);
        sel.handle(down(PointerTarget::SelectionBox, 50, 50), &sources, Zoom::IDENTITY);
        sel.handle(mv(80, 80), &sources, Zoom::IDENTITY);

        // The engine is showing the live candidate; the release must resync it.
        assert_eq!(
            sel.handle(InputEvent::PointerUp { x: 50, y: 50 }, &sources, Zoom::IDENTITY),
            Some(SelectionCommand::Commit {
                index: 0,
                delta: GeometryDelta::default()
            })
        );
    }

    #[test]
    fn top_left_resize_moves_origin_and_shrinks() {
        let sources = vec![source(100, 100, 200, 200, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 150, 150), &sources, Zoom::IDENTITY);
        sel.handle(
            down(
                PointerTarget::ResizeHandle(ResizeHandle::TopLeft),
                100,
                100,
            ),
            &sources,
            Zoom::IDENTITY,
        );
        let cmd = sel.handle(InputEvent::PointerUp { x: 120, y: 130 }, &sources, Zoom::IDENTITY);
        assert_eq!(
            cmd,
            Some(SelectionCommand::Commit {
                index: 0,
                delta: GeometryDelta {
                    dx: 20,
                    dy: 30,
                    dw: -20,
                    dh: -30
                }
            })
        );
    }

    #[test]
    fn resize_past_zero_is_not_clamped() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 50, 50), &sources, Zoom::IDENTITY);
        sel.handle(
            down(
                PointerTarget::ResizeHandle(ResizeHandle::BottomRight),
                100,
                100,
            ),
            &sources,
            Zoom::IDENTITY,
        );
        let Some(SelectionCommand::LivePreview { delta, .. }) =
            sel.handle(mv(-50, 100), &sources, Zoom::IDENTITY)
        else {
            panic!("expected live preview");
        };
        assert_eq!((delta.dw, delta.dh), (-150, 0));
        assert_eq!(sel.selection_box().map(|r| r.width), Some(-50));
    }

    #[test]
    fn leave_commits_last_live_geometry() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 50, 50), &sources, Zoom::IDENTITY);
        sel.handle(down(PointerTarget::SelectionBox, 50, 50), &sources, Zoom::IDENTITY);
        sel.handle(mv(60, 70), &sources, Zoom::IDENTITY);
        let cmd = sel.handle(InputEvent::PointerLeave, &sources, Zoom::IDENTITY);
        assert_eq!(
            cmd,
            Some(SelectionCommand::Commit {
                index: 0,
                delta: GeometryDelta {
                    dx: 10,
                    dy: 20,
                    dw: 0,
                    dh: 0
                }
            })
        );

        // Leaving without any motion commits nothing.
        sel.handle(down(PointerTarget::SelectionBox, 50, 50), &sources, Zoom::IDENTITY);
        assert_eq!(sel.handle(InputEvent::PointerLeave, &sources, Zoom::IDENTITY), None);
        assert!(!sel.is_resizing());
    }

    #[test]
    fn gestures_and_controls_need_a_selection() {
        let sources = vec![source(0, 0, 100, 100, 2)];
        let mut sel = SelectionController::new();
        assert_eq!(
            sel.handle(down(PointerTarget::SelectionBox, 5, 5), &sources, Zoom::IDENTITY),
            None
        );
        assert!(!sel.is_resizing());
        assert_eq!(
            sel.handle(
                down(PointerTarget::Control(ControlAction::Delete), 5, 5),
                &sources,
                Zoom::IDENTITY
            ),
            None
        );

        sel.handle(down(PointerTarget::Mask, 5, 5), &sources, Zoom::IDENTITY);
        assert_eq!(
            sel.handle(
                down(PointerTarget::Control(ControlAction::MoveUp), 5, 5),
                &sources,
                Zoom::IDENTITY
            ),
            Some(SelectionCommand::Control {
                action: ControlAction::MoveUp,
                index: 0
            })
        );
    }

    #[test]
    fn refresh_tracks_zoom_and_drops_stale_index() {
        let sources = vec![source(10, 10, 100, 100, 2)];
        let mut sel = SelectionController::new();
        sel.handle(down(PointerTarget::Mask, 20, 20), &sources, Zoom::IDENTITY);
        assert!(sel.refresh(&sources, Zoom::new(2.0).unwrap()));
        assert_eq!(
            sel.selection_box(),
            Some(DisplayRect {
                left: 20,
                top: 20,
                width: 200,
                height: 200
            })
        );
        assert!(!sel.refresh(&sources, Zoom::new(2.0).unwrap()));
        assert!(sel.refresh(&[], Zoom::IDENTITY));
        assert_eq!(sel.selected(), None);
    }
}
