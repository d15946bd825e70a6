// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input: taps, drags, pinches, and overview navigation.
//!
//! [`TreeInput`] turns raw pointer positions into changes of the caller's
//! [`ViewportState`] and reports them through [`TreeActions`]. It never owns
//! the viewport; every call takes it by reference. Zooms are clamped to the
//! renderer's [`RenderConfig::scale_limits`](crate::RenderConfig::scale_limits).

use kurbo::{Point, Size, Vec2};

use arbor_tree::EntityId;
use arbor_view::gesture::{GestureDelta, PanTracker, PinchTracker};
use arbor_view::ViewportState;

use crate::{MiniMapOverlay, TreeRenderer};

/// Callbacks into the embedding UI.
///
/// Only the entity actions are required; the viewport notifications default
/// to doing nothing.
pub trait TreeActions {
    /// A node was tapped.
    fn primary_action(&mut self, id: EntityId);

    /// A node was long-pressed or secondary-clicked.
    fn secondary_action(&mut self, id: EntityId);

    /// The scale changed by `factor`.
    fn scale_changed(&mut self, factor: f64) {
        let _ = factor;
    }

    /// The view was panned by `delta` screen pixels.
    fn panned(&mut self, delta: Vec2) {
        let _ = delta;
    }

    /// The overview set a new main offset.
    fn offset_changed(&mut self, offset: Vec2) {
        let _ = offset;
    }
}

/// Which action a tap triggers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TapKind {
    /// Plain tap or click.
    Primary,
    /// Long press or secondary click.
    Secondary,
}

/// Gesture state for the main canvas and its overview.
#[derive(Copy, Clone, Debug, Default)]
pub struct TreeInput {
    pan: PanTracker,
    pinch: PinchTracker,
    overview: PanTracker,
}

impl TreeInput {
    /// Creates idle input handling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a drag or pinch on the main canvas is active.
    pub fn is_gesturing(&self) -> bool {
        self.pan.is_active() || self.pinch.is_active()
    }

    /// Screen distance covered by the active drag, from where it started.
    pub fn drag_distance(&self, screen: Point) -> Option<f64> {
        self.pan.total_offset(screen).map(Vec2::hypot)
    }

    /// Resolves a tap and fires the matching action.
    ///
    /// Returns the entity hit; a miss does nothing.
    pub fn tap(
        &self,
        renderer: &TreeRenderer,
        state: ViewportState,
        canvas: Size,
        screen: Point,
        kind: TapKind,
        actions: &mut impl TreeActions,
    ) -> Option<EntityId> {
        let id = renderer.hit_test(state, canvas, screen)?;
        match kind {
            TapKind::Primary => actions.primary_action(id),
            TapKind::Secondary => actions.secondary_action(id),
        }
        Some(id)
    }

    /// Starts a one-finger drag. Ignored while pinching.
    pub fn drag_start(&mut self, screen: Point) {
        if !self.pinch.is_active() {
            self.pan.start(screen);
        }
    }

    /// Continues a drag, panning `state`.
    pub fn drag_move(
        &mut self,
        renderer: &TreeRenderer,
        screen: Point,
        state: &mut ViewportState,
        actions: &mut impl TreeActions,
    ) -> Option<Vec2> {
        let delta = self.pan.update(screen)?;
        let applied = GestureDelta::pan(delta).apply(state, renderer.config().scale_limits);
        actions.panned(applied.pan);
        Some(applied.pan)
    }

    /// Ends a drag.
    pub fn drag_end(&mut self) {
        self.pan.end();
    }

    /// Starts a two-finger pinch, cancelling any drag.
    pub fn pinch_start(&mut self, a: Point, b: Point) {
        self.pan.end();
        self.pinch.start(a, b);
    }

    /// Continues a pinch: zooms about the centroid and pans with it.
    pub fn pinch_move(
        &mut self,
        renderer: &TreeRenderer,
        a: Point,
        b: Point,
        state: &mut ViewportState,
        canvas: Size,
        actions: &mut impl TreeActions,
    ) -> Option<GestureDelta> {
        let step = self.pinch.update(a, b)?;
        let applied = step.apply_on_canvas(state, renderer.config().scale_limits, canvas);
        report(&applied, actions);
        Some(applied)
    }

    /// Ends a pinch.
    pub fn pinch_end(&mut self) {
        self.pinch.end();
    }

    /// Zooms by `factor` keeping the tree point under `anchor` in place
    /// (mouse wheel, double tap).
    pub fn zoom_at(
        &self,
        renderer: &TreeRenderer,
        anchor: Point,
        factor: f64,
        state: &mut ViewportState,
        canvas: Size,
        actions: &mut impl TreeActions,
    ) -> f64 {
        let applied = state.zoom_about(anchor, factor, renderer.config().scale_limits, canvas);
        if applied != 1.0 {
            actions.scale_changed(applied);
        }
        applied
    }

    /// Recentres the main view on a tapped overview point.
    pub fn minimap_tap(
        &self,
        overlay: &MiniMapOverlay,
        tap: Point,
        state: &mut ViewportState,
        canvas: Size,
        actions: &mut impl TreeActions,
    ) {
        state.offset = overlay.tap_to_offset(tap, *state, canvas);
        actions.offset_changed(state.offset);
    }

    /// Starts dragging the overview indicator.
    pub fn minimap_drag_start(&mut self, mini: Point) {
        self.overview.start(mini);
    }

    /// Continues an overview drag, moving the main view the opposite way.
    pub fn minimap_drag_move(
        &mut self,
        overlay: &MiniMapOverlay,
        mini: Point,
        state: &mut ViewportState,
        actions: &mut impl TreeActions,
    ) -> Option<Vec2> {
        let drag = self.overview.update(mini)?;
        state.offset = overlay.drag_to_offset(drag, *state);
        actions.offset_changed(state.offset);
        Some(state.offset)
    }

    /// Ends an overview drag.
    pub fn minimap_drag_end(&mut self) {
        self.overview.end();
    }
}

fn report(applied: &GestureDelta, actions: &mut impl TreeActions) {
    if applied.zoom != 1.0 {
        actions.scale_changed(applied.zoom);
    }
    if applied.pan != Vec2::ZERO {
        actions.panned(applied.pan);
    }
}
