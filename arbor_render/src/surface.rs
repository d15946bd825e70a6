// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw surface seam between the frame pipeline and a concrete renderer.
//!
//! The pipeline emits a small imaging program: [`StateOp`]s change the
//! current transform, paint, or stroke width, and [`DrawOp`]s produce
//! pixels with that state. Backends (a GPU canvas, a CPU rasterizer, a test
//! recorder) implement [`DrawSurface`].
//!
//! [`RecordingSurface`] records every op together with the state it was
//! applied under. It does not rasterize; it exists for tests, headless
//! tooling, and debugging.

use kurbo::{Affine, Circle, CubicBez, Line, Point, Rect, RoundedRect};
use peniko::Color;

use arbor_thumbs::Thumbnail;

/// Operations that change drawing state.
#[derive(Clone, Copy, Debug)]
pub enum StateOp {
    /// Set the tree → screen transform applied to all geometry.
    SetTransform(Affine),
    /// Set the current paint.
    SetPaint(Color),
    /// Set the stroke width, in untransformed units.
    SetStrokeWidth(f64),
}

/// Horizontal alignment of a text run relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the start of the run.
    Start,
    /// Anchor is the middle of the run.
    Center,
}

/// Operations that produce pixels with the current state.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill a rectangle.
    FillRect(Rect),
    /// Stroke a rectangle.
    StrokeRect(Rect),
    /// Fill a rounded rectangle.
    FillRoundedRect(RoundedRect),
    /// Stroke a rounded rectangle.
    StrokeRoundedRect(RoundedRect),
    /// Fill a circle.
    FillCircle(Circle),
    /// Stroke a circle.
    StrokeCircle(Circle),
    /// Stroke a straight line.
    StrokeLine(Line),
    /// Stroke a cubic Bézier curve.
    StrokeCubic(CubicBez),
    /// Draw a run of text with its baseline at `anchor.y`.
    Text {
        /// Text to draw.
        text: String,
        /// Baseline anchor.
        anchor: Point,
        /// Font size in untransformed units.
        size: f64,
        /// Alignment relative to `anchor.x`.
        align: TextAlign,
    },
    /// Draw an image scaled into the bounding square of `circle`, clipped to it.
    CircleImage {
        /// Pixels to draw.
        image: Thumbnail,
        /// Destination circle.
        circle: Circle,
    },
}

/// A target for the pipeline's imaging program.
pub trait DrawSurface {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Set the current paint.
    ///
    /// This is equivalent to `self.state(StateOp::SetPaint(color))`.
    #[inline]
    fn set_paint(&mut self, color: Color) {
        self.state(StateOp::SetPaint(color));
    }

    /// Set the stroke width.
    ///
    /// This is equivalent to `self.state(StateOp::SetStrokeWidth(width))`.
    #[inline]
    fn set_stroke_width(&mut self, width: f64) {
        self.state(StateOp::SetStrokeWidth(width));
    }

    /// Set the transform.
    ///
    /// This is equivalent to `self.state(StateOp::SetTransform(transform))`.
    #[inline]
    fn set_transform(&mut self, transform: Affine) {
        self.state(StateOp::SetTransform(transform));
    }
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn state(&mut self, op: StateOp) {
        (**self).state(op);
    }

    fn draw(&mut self, op: DrawOp) {
        (**self).draw(op);
    }
}

/// Snapshot of the surface state when an op was applied.
#[derive(Clone, Copy, Debug)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Current paint, if set.
    pub paint: Option<Color>,
    /// Current stroke width.
    pub stroke_width: f64,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            paint: None,
            stroke_width: 1.0,
        }
    }
}

/// Event recorded by [`RecordingSurface`].
#[derive(Clone, Debug)]
pub enum Event {
    /// State operation and the resulting state.
    State {
        /// State operation that was applied.
        op: StateOp,
        /// Snapshot after applying it.
        state: StateSnapshot,
    },
    /// Draw operation and the state used for drawing.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
    },
}

/// Records ops and the state they ran under.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    state: StateSnapshot,
    events: Vec<Event>,
}

impl RecordingSurface {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Recorded draw ops with their state, in order.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &StateSnapshot)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw { op, state } => Some((op, state)),
            Event::State { .. } => None,
        })
    }

    /// Recorded text runs, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.draws().filter_map(|(op, _)| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of [`StateOp::SetPaint`] ops recorded.
    pub fn paint_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Event::State {
                        op: StateOp::SetPaint(_),
                        ..
                    }
                )
            })
            .count()
    }

    /// Current state.
    pub fn state(&self) -> StateSnapshot {
        self.state
    }

    /// Drops recorded events and resets state.
    pub fn clear(&mut self) {
        self.events.clear();
        self.state = StateSnapshot::default();
    }
}

impl DrawSurface for RecordingSurface {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(t) => self.state.transform = t,
            StateOp::SetPaint(c) => self.state.paint = Some(c),
            StateOp::SetStrokeWidth(w) => self.state.stroke_width = w,
        }
        self.events.push(Event::State {
            op,
            state: self.state,
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.events.push(Event::Draw {
            op,
            state: self.state,
        });
    }
}

/// The colour as 8-bit RGBA, for exact comparisons.
pub fn rgba8(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// Wraps a surface and drops state ops that would not change anything.
///
/// The frame pipeline draws through this so that batching shows up as fewer
/// paint changes at the backend.
#[derive(Debug)]
pub(crate) struct Painter<S> {
    surface: S,
    paint: Option<[u8; 4]>,
    stroke_width: Option<f64>,
    paint_changes: usize,
}

impl<S: DrawSurface> Painter<S> {
    pub(crate) fn new(surface: S) -> Self {
        Self {
            surface,
            paint: None,
            stroke_width: None,
            paint_changes: 0,
        }
    }

    pub(crate) fn paint(&mut self, color: Color) {
        let key = rgba8(color);
        if self.paint != Some(key) {
            self.paint = Some(key);
            self.paint_changes += 1;
            self.surface.set_paint(color);
        }
    }

    pub(crate) fn stroke_width(&mut self, width: f64) {
        if self.stroke_width != Some(width) {
            self.stroke_width = Some(width);
            self.surface.set_stroke_width(width);
        }
    }

    pub(crate) fn transform(&mut self, transform: Affine) {
        self.surface.set_transform(transform);
    }

    pub(crate) fn draw(&mut self, op: DrawOp) {
        self.surface.draw(op);
    }

    pub(crate) fn paint_changes(&self) -> usize {
        self.paint_changes
    }
}
