// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Circle, Point, Rect, Size, Vec2};

use arbor_minimap::{MiniMapConfig, MiniMapProjection, MiniMapScene};
use arbor_tree::{Category, TreeBounds, TreeNode};
use arbor_view::ViewportState;

use crate::Theme;
use crate::surface::{DrawOp, DrawSurface, Painter};

/// Opacity of overview dots.
const DOT_ALPHA: f32 = 0.7;
/// Opacity of overview connectors.
const CONNECTOR_ALPHA: f32 = 0.3;
/// Stroke width of overview connectors.
const CONNECTOR_WIDTH: f64 = 0.5;
/// Opacity of the viewport indicator fill.
const VIEWPORT_FILL_ALPHA: f32 = 0.3;
/// Stroke width of the viewport indicator.
const VIEWPORT_STROKE_WIDTH: f64 = 2.0;

/// The overview of a scene, ready to draw and to translate input.
#[derive(Clone, Debug)]
pub struct MiniMapOverlay {
    projection: MiniMapProjection,
    scene: MiniMapScene,
    dot_radius: f64,
}

impl MiniMapOverlay {
    /// Projects `nodes` into an overview of `config.size`.
    pub fn new(nodes: &[TreeNode], bounds: &TreeBounds, config: &MiniMapConfig) -> Self {
        let projection = MiniMapProjection::new(bounds, config);
        Self {
            scene: MiniMapScene::build(nodes, &projection),
            projection,
            dot_radius: config.dot_radius,
        }
    }

    /// Tree ↔ overview mapping.
    pub fn projection(&self) -> &MiniMapProjection {
        &self.projection
    }

    /// Projected dots and connectors.
    pub fn scene(&self) -> &MiniMapScene {
        &self.scene
    }

    /// Main offset that centres the main view on an overview tap.
    pub fn tap_to_offset(&self, tap: Point, state: ViewportState, canvas: Size) -> Vec2 {
        self.projection.tap_to_offset(tap, state, canvas)
    }

    /// Main offset after dragging the overview by `drag` pixels.
    pub fn drag_to_offset(&self, drag: Vec2, state: ViewportState) -> Vec2 {
        self.projection.drag_to_offset(drag, state)
    }

    /// Draws the overview with its top-left corner at `placement` (screen pixels).
    ///
    /// `state` and `canvas` describe the main view; the indicator marks what it shows.
    pub fn draw<S: DrawSurface>(
        &self,
        surface: S,
        placement: Point,
        state: ViewportState,
        canvas: Size,
        theme: &Theme,
    ) {
        let mut painter = Painter::new(surface);
        painter.transform(Affine::translate(placement.to_vec2()));

        painter.paint(theme.background);
        painter.draw(DrawOp::FillRect(Rect::from_origin_size(
            Point::ZERO,
            self.projection.size(),
        )));

        if !self.scene.connectors.is_empty() {
            painter.paint(theme.outline.multiply_alpha(CONNECTOR_ALPHA));
            painter.stroke_width(CONNECTOR_WIDTH);
            for line in &self.scene.connectors {
                painter.draw(DrawOp::StrokeLine(*line));
            }
        }

        for category in Category::ALL {
            let mut dots = self
                .scene
                .dots
                .iter()
                .filter(|d| d.category == category)
                .peekable();
            if dots.peek().is_some() {
                painter.paint(theme.indicators.get(category).multiply_alpha(DOT_ALPHA));
            }
            for dot in dots {
                painter.draw(DrawOp::FillCircle(Circle::new(dot.center, self.dot_radius)));
            }
        }

        let indicator = self.projection.viewport_rect(state, canvas);
        painter.paint(theme.selection.multiply_alpha(VIEWPORT_FILL_ALPHA));
        painter.draw(DrawOp::FillRect(indicator));
        painter.paint(theme.selection);
        painter.stroke_width(VIEWPORT_STROKE_WIDTH);
        painter.draw(DrawOp::StrokeRect(indicator));
    }
}
