// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture helpers: turn raw pointer positions into pan deltas and zoom factors.
//!
//! ## Usage
//!
//! 1) Start tracking with [`PanTracker::start`] (one pointer) or [`PinchTracker::start`] (two).
//! 2) On each move, call `update` to get the delta since the previous update.
//! 3) Fold the deltas into a [`GestureDelta`] and [`GestureDelta::apply`] it to the
//!    caller's [`ViewportState`].
//! 4) Call `end` when the pointers lift.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use arbor_view::gesture::{GestureDelta, PanTracker};
//! use arbor_view::{ScaleLimits, ViewportState};
//!
//! let mut pan = PanTracker::default();
//! pan.start(Point::new(10.0, 20.0));
//! let delta = pan.update(Point::new(15.0, 26.0)).unwrap();
//!
//! let mut state = ViewportState::default();
//! let applied = GestureDelta::pan(delta).apply(&mut state, ScaleLimits::default());
//! assert_eq!(state.offset, Vec2::new(5.0, 6.0));
//! assert_eq!(applied.pan, Vec2::new(5.0, 6.0));
//! ```

use kurbo::{Point, Vec2};

use crate::{ScaleLimits, ViewportState};

/// Tracks a single-pointer drag and reports movement deltas.
#[derive(Debug, Clone, Default, Copy)]
pub struct PanTracker {
    /// Position where the drag started.
    pub start_pos: Option<Point>,
    /// Last position seen during the drag.
    pub last_pos: Option<Point>,
}

impl PanTracker {
    /// Starts tracking a drag at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Records a new position, returning the delta since the last one.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let last = self.last_pos.replace(pos)?;
        Some(pos - last)
    }

    /// Cumulative offset from the drag start.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while a drag is active.
    pub fn is_active(&self) -> bool {
        self.start_pos.is_some()
    }
}

/// Tracks a two-pointer pinch and reports zoom factors and centroid movement.
#[derive(Debug, Clone, Default, Copy)]
pub struct PinchTracker {
    last: Option<(Point, Point)>,
}

impl PinchTracker {
    /// Pointers closer than this (in pixels) do not produce zoom factors.
    pub const MIN_SPAN: f64 = 1.0;

    /// Starts tracking a pinch between `a` and `b`.
    pub fn start(&mut self, a: Point, b: Point) {
        self.last = Some((a, b));
    }

    /// Records new pointer positions.
    ///
    /// Returns the gesture since the last update: the zoom factor is the ratio
    /// of pointer spans and the pan is the centroid movement. The anchor is
    /// the new centroid.
    pub fn update(&mut self, a: Point, b: Point) -> Option<GestureDelta> {
        let (la, lb) = self.last.replace((a, b))?;
        let old_span = (lb - la).hypot();
        let new_span = (b - a).hypot();
        let zoom = if old_span < Self::MIN_SPAN || new_span < Self::MIN_SPAN {
            1.0
        } else {
            new_span / old_span
        };
        let old_mid = la.midpoint(lb);
        let new_mid = a.midpoint(b);
        Some(GestureDelta {
            pan: new_mid - old_mid,
            zoom,
            anchor: Some(new_mid),
        })
    }

    /// Ends the pinch.
    pub fn end(&mut self) {
        self.last = None;
    }

    /// Returns `true` while a pinch is active.
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// One step of a transform gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDelta {
    /// Pan in screen pixels.
    pub pan: Vec2,
    /// Multiplicative zoom factor.
    pub zoom: f64,
    /// Optional screen-space anchor for the zoom. `None` zooms about the canvas centre.
    pub anchor: Option<Point>,
}

impl GestureDelta {
    /// A pure pan.
    #[must_use]
    pub fn pan(pan: Vec2) -> Self {
        Self {
            pan,
            zoom: 1.0,
            anchor: None,
        }
    }

    /// A pure zoom about the canvas centre.
    #[must_use]
    pub fn zoom(factor: f64) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: factor,
            anchor: None,
        }
    }

    /// Applies the gesture to `state`: zoom first (clamped into `limits`), then pan.
    ///
    /// Anchored zooms need the canvas size and go through
    /// [`GestureDelta::apply_on_canvas`]; here the anchor is ignored.
    ///
    /// Returns the change that actually took effect, for reporting to the
    /// embedding UI.
    pub fn apply(self, state: &mut ViewportState, limits: ScaleLimits) -> Self {
        let zoom = state.zoom(self.zoom, limits);
        state.pan(self.pan);
        Self {
            pan: self.pan,
            zoom,
            anchor: None,
        }
    }

    /// Like [`GestureDelta::apply`], honouring the anchor on a canvas of the given size.
    pub fn apply_on_canvas(
        self,
        state: &mut ViewportState,
        limits: ScaleLimits,
        canvas: kurbo::Size,
    ) -> Self {
        let zoom = match self.anchor {
            Some(anchor) => state.zoom_about(anchor, self.zoom, limits, canvas),
            None => state.zoom(self.zoom, limits),
        };
        state.pan(self.pan);
        Self {
            pan: self.pan,
            zoom,
            anchor: self.anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::*;

    #[test]
    fn pan_tracker_reports_deltas_only_while_active() {
        let mut pan = PanTracker::default();
        assert_eq!(pan.update(Point::new(1.0, 1.0)), None);

        pan.start(Point::new(10.0, 20.0));
        assert!(pan.is_active());
        assert_eq!(pan.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
        assert_eq!(pan.update(Point::new(12.0, 25.0)), Some(Vec2::new(-3.0, 0.0)));
        assert_eq!(
            pan.total_offset(Point::new(12.0, 25.0)),
            Some(Vec2::new(2.0, 5.0))
        );

        pan.end();
        assert!(!pan.is_active());
        assert_eq!(pan.total_offset(Point::ZERO), None);
    }

    #[test]
    fn pinch_tracker_reports_span_ratio_and_centroid_motion() {
        let mut pinch = PinchTracker::default();
        assert!(pinch.update(Point::ZERO, Point::new(1.0, 0.0)).is_none());

        pinch.start(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let d = pinch
            .update(Point::new(-50.0, 10.0), Point::new(150.0, 10.0))
            .unwrap();
        assert!((d.zoom - 2.0).abs() < 1e-12);
        assert_eq!(d.pan, Vec2::new(0.0, 10.0));
        assert_eq!(d.anchor, Some(Point::new(50.0, 10.0)));
    }

    #[test]
    fn collapsed_pinch_does_not_zoom() {
        let mut pinch = PinchTracker::default();
        pinch.start(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        let d = pinch.update(Point::new(5.0, 5.0), Point::new(90.0, 5.0)).unwrap();
        assert_eq!(d.zoom, 1.0);
    }

    #[test]
    fn apply_reports_effective_zoom() {
        let limits = ScaleLimits::default();
        let mut state = ViewportState::new(2.5, Vec2::ZERO);
        let applied = GestureDelta {
            pan: Vec2::new(1.0, 2.0),
            zoom: 2.0,
            anchor: None,
        }
        .apply(&mut state, limits);
        assert_eq!(state.scale, 3.0);
        assert!((applied.zoom - 1.2).abs() < 1e-12);
        assert_eq!(state.offset, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn anchored_apply_keeps_anchor_under_pointer() {
        let limits = ScaleLimits::default();
        let canvas = Size::new(400.0, 400.0);
        let mut state = ViewportState::default();
        let anchor = Point::new(300.0, 100.0);
        let before = crate::ViewTransform::new(state, canvas).screen_to_tree(anchor);

        GestureDelta {
            pan: Vec2::ZERO,
            zoom: 1.5,
            anchor: Some(anchor),
        }
        .apply_on_canvas(&mut state, limits, canvas);

        let after = crate::ViewTransform::new(state, canvas).screen_to_tree(anchor);
        assert!((before - after).hypot() < 1e-9);
    }
}
