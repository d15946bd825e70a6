// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Taps, gestures, and overview navigation routed through `TreeActions`.

use arbor_minimap::MiniMapConfig;
use arbor_render::{RenderConfig, TapKind, TreeActions, TreeInput, TreeRenderer};
use arbor_tree::{EntityId, TreeNode};
use arbor_view::{ScaleLimits, ViewportState};
use kurbo::{Point, Size, Vec2};

#[derive(Debug, Default)]
struct Log {
    primary: Vec<EntityId>,
    secondary: Vec<EntityId>,
    scales: Vec<f64>,
    pans: Vec<Vec2>,
    offsets: Vec<Vec2>,
}

impl TreeActions for Log {
    fn primary_action(&mut self, id: EntityId) {
        self.primary.push(id);
    }

    fn secondary_action(&mut self, id: EntityId) {
        self.secondary.push(id);
    }

    fn scale_changed(&mut self, factor: f64) {
        self.scales.push(factor);
    }

    fn panned(&mut self, delta: Vec2) {
        self.pans.push(delta);
    }

    fn offset_changed(&mut self, offset: Vec2) {
        self.offsets.push(offset);
    }
}

const CANVAS: Size = Size::new(800.0, 600.0);

/// Three cards whose bounds centre is (100, 75).
fn three_nodes() -> TreeRenderer {
    TreeRenderer::new(
        RenderConfig::default(),
        vec![
            TreeNode::new(EntityId(1), 0.0, 0.0, "Ada"),
            TreeNode::new(EntityId(2), 200.0, 0.0, "Byron"),
            TreeNode::new(EntityId(3), 100.0, 150.0, "Clara"),
        ],
    )
}

/// Screen position of a tree point at scale 1 with no offset.
fn screen(tree: Point) -> Point {
    Point::new(400.0, 300.0) + (tree - Point::new(100.0, 75.0))
}

#[test]
fn taps_resolve_through_the_index() {
    let renderer = three_nodes();
    let input = TreeInput::default();
    let state = ViewportState::default();
    let mut log = Log::default();

    let hit = input.tap(
        &renderer,
        state,
        CANVAS,
        screen(Point::new(100.0, 160.0)),
        TapKind::Primary,
        &mut log,
    );
    assert_eq!(hit, Some(EntityId(3)));

    let miss = input.tap(
        &renderer,
        state,
        CANVAS,
        screen(Point::new(1000.0, 1000.0)),
        TapKind::Primary,
        &mut log,
    );
    assert_eq!(miss, None);

    input.tap(
        &renderer,
        state,
        CANVAS,
        screen(Point::new(0.0, 0.0)),
        TapKind::Secondary,
        &mut log,
    );
    assert_eq!(log.primary, [EntityId(3)]);
    assert_eq!(log.secondary, [EntityId(1)]);
}

#[test]
fn hit_testing_follows_the_pan() {
    let renderer = three_nodes();
    let mut input = TreeInput::default();
    let mut state = ViewportState::default();
    let mut log = Log::default();

    input.drag_start(Point::new(0.0, 0.0));
    assert!(input.is_gesturing());
    assert_eq!(
        input.drag_move(&renderer, Point::new(30.0, 40.0), &mut state, &mut log),
        Some(Vec2::new(30.0, 40.0))
    );
    assert_eq!(
        input.drag_move(&renderer, Point::new(50.0, 0.0), &mut state, &mut log),
        Some(Vec2::new(20.0, -40.0))
    );
    assert_eq!(input.drag_distance(Point::new(30.0, 40.0)), Some(50.0));
    input.drag_end();
    assert!(!input.is_gesturing());
    assert_eq!(input.drag_distance(Point::new(30.0, 40.0)), None);
    assert_eq!(
        input.drag_move(&renderer, Point::new(90.0, 0.0), &mut state, &mut log),
        None
    );
    assert_eq!(state.offset, Vec2::new(50.0, 0.0));
    assert_eq!(log.pans, [Vec2::new(30.0, 40.0), Vec2::new(20.0, -40.0)]);

    // The first card's right edge (x = 75) now sits 50 px further right.
    let edge = screen(Point::new(75.0, 0.0));
    assert_eq!(renderer.hit_test(state, CANVAS, edge + Vec2::new(49.0, 0.0)), Some(EntityId(1)));
    assert_eq!(renderer.hit_test(state, CANVAS, edge + Vec2::new(51.0, 0.0)), None);
}

#[test]
fn pinch_zooms_about_the_centroid() {
    let renderer = three_nodes();
    let mut input = TreeInput::new();
    let mut state = ViewportState::default();
    let mut log = Log::default();

    let before = renderer
        .view(state, CANVAS)
        .screen_to_tree(Point::new(400.0, 300.0));
    input.pinch_start(Point::new(300.0, 300.0), Point::new(500.0, 300.0));
    let applied = input
        .pinch_move(
            &renderer,
            Point::new(250.0, 300.0),
            Point::new(550.0, 300.0),
            &mut state,
            CANVAS,
            &mut log,
        )
        .unwrap();
    input.pinch_end();

    assert!((applied.zoom - 1.5).abs() < 1e-12);
    assert!((state.scale - 1.5).abs() < 1e-12);
    assert!(log.pans.is_empty());
    assert_eq!(log.scales.len(), 1);
    let after = renderer
        .view(state, CANVAS)
        .screen_to_tree(Point::new(400.0, 300.0));
    assert!((after - before).hypot() < 1e-9);
}

#[test]
fn wheel_zoom_is_clamped_to_the_render_limits() {
    let config = RenderConfig::default().with_scale_limits(ScaleLimits::new(0.2, 3.0));
    let renderer = TreeRenderer::new(config, Vec::new());
    let input = TreeInput::new();
    let mut state = ViewportState::default();
    let mut log = Log::default();

    let anchor = Point::new(100.0, 100.0);
    let applied = input.zoom_at(&renderer, anchor, 10.0, &mut state, CANVAS, &mut log);
    assert!((applied - 3.0).abs() < 1e-12);
    assert_eq!(state.scale, 3.0);

    let applied = input.zoom_at(&renderer, anchor, 2.0, &mut state, CANVAS, &mut log);
    assert_eq!(applied, 1.0);
    assert_eq!(log.scales.len(), 1);

    // Tightening the limits later is honoured by the next zoom.
    let mut renderer = renderer;
    renderer.set_config(config.with_scale_limits(ScaleLimits::new(0.2, 1.0)));
    let applied = input.zoom_at(&renderer, anchor, 1.1, &mut state, CANVAS, &mut log);
    assert!((applied - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(state.scale, 1.0);
}

#[test]
fn overview_navigation_moves_the_main_view() {
    let renderer = three_nodes();
    let overlay = renderer.minimap(&MiniMapConfig::default());
    let mut input = TreeInput::default();
    let mut state = ViewportState::new(1.0, Vec2::new(123.0, -45.0));
    let mut log = Log::default();

    // The overview centre shows the tree centre.
    input.minimap_tap(&overlay, Point::new(75.0, 50.0), &mut state, CANVAS, &mut log);
    assert!(state.offset.hypot() < 1e-9);
    assert_eq!(log.offsets.len(), 1);

    input.minimap_drag_start(Point::new(10.0, 10.0));
    let offset = input
        .minimap_drag_move(&overlay, Point::new(20.0, 10.0), &mut state, &mut log)
        .unwrap();
    input.minimap_drag_end();
    let expected = -10.0 / overlay.projection().scale();
    assert!((offset.x - expected).abs() < 1e-9);
    assert_eq!(offset.y, 0.0);
    assert_eq!(log.offsets.len(), 2);
}
