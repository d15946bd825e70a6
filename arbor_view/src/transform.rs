// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::ViewportState;

/// Multiple of the largest node dimension added around the culling rectangle.
///
/// Nodes and connections just outside the screen stay in the visible set, so
/// nothing pops in at the edges while panning.
pub const VIEWPORT_PADDING_FACTOR: f64 = 2.0;

/// A viewport state paired with the canvas it is shown on.
///
/// Build one per frame from the caller's authoritative [`ViewportState`];
/// it is cheap and holds no other state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewTransform {
    state: ViewportState,
    canvas: Size,
    origin: Point,
}

impl ViewTransform {
    /// Creates a transform for `state` on a canvas of `canvas` pixels.
    #[must_use]
    pub fn new(state: ViewportState, canvas: Size) -> Self {
        Self {
            state,
            canvas,
            origin: Point::ZERO,
        }
    }

    /// Sets the tree point shown at the canvas centre when the offset is zero.
    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// The viewport state this transform was built from.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Tree point shown at the canvas centre when the offset is zero.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Effective (guarded) scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.effective_scale()
    }

    /// Canvas centre in screen pixels.
    #[must_use]
    pub fn canvas_center(&self) -> Point {
        (self.canvas.to_vec2() * 0.5).to_point()
    }

    /// Converts a screen point into tree space.
    #[must_use]
    pub fn screen_to_tree(&self, p: Point) -> Point {
        let rel = p - self.canvas_center() - self.state.offset;
        self.origin + rel / self.scale()
    }

    /// Converts a tree point into screen space.
    #[must_use]
    pub fn tree_to_screen(&self, p: Point) -> Point {
        self.canvas_center() + self.state.offset + (p - self.origin) * self.scale()
    }

    /// Converts a screen-space delta into a tree-space delta.
    #[must_use]
    pub fn screen_to_tree_vec(&self, v: Vec2) -> Vec2 {
        v / self.scale()
    }

    /// Tree-space rectangle currently visible, grown by `padding` tree units on each side.
    ///
    /// Half-extents are `canvas / (2 * scale) + padding`; the centre is
    /// `origin - offset / scale`.
    #[must_use]
    pub fn viewport_rect(&self, padding: f64) -> Rect {
        let scale = self.scale();
        let half_w = self.canvas.width / (2.0 * scale) + padding;
        let half_h = self.canvas.height / (2.0 * scale) + padding;
        let center = self.origin - self.state.offset / scale;
        Rect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Padding for a node footprint of the given largest dimension.
    #[must_use]
    pub fn padding_for(max_node_extent: f64) -> f64 {
        VIEWPORT_PADDING_FACTOR * max_node_extent
    }

    /// Offset that places `tree_point` at the canvas centre at the current scale.
    #[must_use]
    pub fn offset_centering(&self, tree_point: Point) -> Vec2 {
        -((tree_point - self.origin) * self.scale())
    }

    /// Tree → screen transform, for draw surfaces.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let translate = self.canvas_center().to_vec2() + self.state.offset;
        Affine::translate(translate)
            * Affine::scale(self.scale())
            * Affine::translate(-self.origin.to_vec2())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size, Vec2};

    use super::ViewTransform;
    use crate::ViewportState;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn screen_tree_roundtrip() {
        let state = ViewportState::new(1.75, Vec2::new(-33.0, 12.5));
        let view =
            ViewTransform::new(state, Size::new(1024.0, 768.0)).with_origin(Point::new(40.0, 90.0));

        let tree = Point::new(-321.5, 77.25);
        assert!(close(view.screen_to_tree(view.tree_to_screen(tree)), tree));

        let screen = Point::new(13.0, 700.0);
        assert!(close(view.tree_to_screen(view.screen_to_tree(screen)), screen));
    }

    #[test]
    fn screen_to_tree_matches_formula_without_origin() {
        let state = ViewportState::new(2.0, Vec2::new(10.0, 20.0));
        let view = ViewTransform::new(state, Size::new(400.0, 300.0));
        let p = view.screen_to_tree(Point::new(250.0, 190.0));
        // (250 - 200 - 10) / 2, (190 - 150 - 20) / 2
        assert_eq!(p, Point::new(20.0, 10.0));
    }

    #[test]
    fn viewport_rect_half_extents_and_centre() {
        let state = ViewportState::new(0.5, Vec2::new(100.0, -50.0));
        let view = ViewTransform::new(state, Size::new(800.0, 600.0));
        let r = view.viewport_rect(10.0);
        // Half extents: 800 / 1 + 10 and 600 / 1 + 10; centre: (-200, 100).
        assert_eq!(r, Rect::new(-1010.0, -510.0, 610.0, 710.0));
    }

    #[test]
    fn viewport_rect_covers_screen_corners() {
        let state = ViewportState::new(1.3, Vec2::new(-70.0, 33.0));
        let view =
            ViewTransform::new(state, Size::new(640.0, 480.0)).with_origin(Point::new(5.0, 5.0));
        let r = view.viewport_rect(0.0);
        for corner in [
            Point::new(0.0, 0.0),
            Point::new(640.0, 0.0),
            Point::new(0.0, 480.0),
            Point::new(640.0, 480.0),
        ] {
            let t = view.screen_to_tree(corner);
            assert!(r.inflate(1e-9, 1e-9).contains(t), "corner {corner:?} maps outside");
        }
    }

    #[test]
    fn affine_agrees_with_tree_to_screen() {
        let state = ViewportState::new(0.8, Vec2::new(15.0, -5.0));
        let view =
            ViewTransform::new(state, Size::new(300.0, 200.0)).with_origin(Point::new(-12.0, 30.0));
        let p = Point::new(77.0, -19.0);
        assert!(close(view.to_affine() * p, view.tree_to_screen(p)));
    }

    #[test]
    fn offset_centering_puts_point_at_canvas_centre() {
        let state = ViewportState::new(1.5, Vec2::ZERO);
        let view =
            ViewTransform::new(state, Size::new(500.0, 500.0)).with_origin(Point::new(10.0, 10.0));
        let target = Point::new(210.0, -40.0);
        let moved = ViewTransform::new(
            ViewportState::new(1.5, view.offset_centering(target)),
            view.canvas(),
        )
        .with_origin(view.origin());
        assert!(close(moved.tree_to_screen(target), moved.canvas_center()));
    }
}
