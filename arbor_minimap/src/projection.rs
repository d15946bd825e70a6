// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_tree::TreeBounds;
use arbor_view::{ViewTransform, ViewportState};
use kurbo::{Point, Rect, Size, Vec2};

/// Overview geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MiniMapConfig {
    /// Overview area in pixels.
    pub size: Size,
    /// Fraction of the area the projected tree may fill.
    pub inset: f64,
    /// Radius of a node dot in overview pixels.
    pub dot_radius: f64,
}

impl Default for MiniMapConfig {
    fn default() -> Self {
        Self {
            size: Size::new(150.0, 100.0),
            inset: 0.9,
            dot_radius: 3.0,
        }
    }
}

impl MiniMapConfig {
    /// Sets the overview area.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Sets the inset fraction.
    #[must_use]
    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }
}

/// Fit-to-box projection of the tree into the overview.
///
/// Derived entirely from the tree bounds and the overview config; rebuild it
/// whenever either changes. The main view is assumed to be centred on the
/// tree bounds centre when its offset is zero, which is how the renderer
/// sets up its [`ViewTransform`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MiniMapProjection {
    bounds: TreeBounds,
    size: Size,
    scale: f64,
    offset: Vec2,
}

impl MiniMapProjection {
    /// Projects `bounds` into the overview described by `config`.
    ///
    /// Tree extents below `1.0` are treated as `1.0`, so single-node and empty
    /// trees still produce a finite scale.
    pub fn new(bounds: &TreeBounds, config: &MiniMapConfig) -> Self {
        let tree_w = bounds.width.max(1.0);
        let tree_h = bounds.height.max(1.0);
        let fit = (config.size.width / tree_w).min(config.size.height / tree_h) * config.inset;
        let scale = if fit.is_finite() && fit > 0.0 {
            fit
        } else {
            1.0
        };
        let offset = Vec2::new(
            (config.size.width - tree_w * scale) * 0.5,
            (config.size.height - tree_h * scale) * 0.5,
        );
        Self {
            bounds: *bounds,
            size: config.size,
            scale,
            offset,
        }
    }

    /// Overview pixels per tree unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Position of the tree's min corner in the overview.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Overview area.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Bounds this projection was built from.
    pub fn bounds(&self) -> &TreeBounds {
        &self.bounds
    }

    /// Tree point → overview point.
    pub fn project(&self, tree: Point) -> Point {
        let min = Point::new(self.bounds.min_x, self.bounds.min_y);
        ((tree - min) * self.scale + self.offset).to_point()
    }

    /// Overview point → tree point.
    pub fn unproject(&self, mini: Point) -> Point {
        let min = Point::new(self.bounds.min_x, self.bounds.min_y);
        min + (mini.to_vec2() - self.offset) / self.scale
    }

    /// The main view's transform, centred on the tree bounds.
    pub fn main_view(&self, state: ViewportState, canvas: Size) -> ViewTransform {
        ViewTransform::new(state, canvas).with_origin(self.bounds.center())
    }

    /// The part of the overview the main canvas currently shows.
    pub fn viewport_rect(&self, state: ViewportState, canvas: Size) -> Rect {
        let visible = self.main_view(state, canvas).viewport_rect(0.0);
        Rect::from_points(
            self.project(Point::new(visible.x0, visible.y0)),
            self.project(Point::new(visible.x1, visible.y1)),
        )
    }

    /// Main offset that centres the main canvas on the tapped overview point.
    pub fn tap_to_offset(&self, tap: Point, state: ViewportState, canvas: Size) -> Vec2 {
        self.main_view(state, canvas)
            .offset_centering(self.unproject(tap))
    }

    /// Main offset after dragging the overview by `drag` pixels.
    ///
    /// The viewport indicator follows the pointer, so the main offset moves
    /// the opposite way: `offset - drag / overview_scale * main_scale`.
    pub fn drag_to_offset(&self, drag: Vec2, state: ViewportState) -> Vec2 {
        state.offset - drag / self.scale * state.effective_scale()
    }
}
