// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Render: the frame pipeline of the tree canvas.
//!
//! Each frame, [`TreeRenderer::render`]:
//! - computes the padded tree-space viewport from the caller's
//!   [`ViewportState`](arbor_view::ViewportState) and canvas size,
//! - queries the spatial index for the visible nodes,
//! - selects a [`LodTier`] from the scale,
//! - draws connections touching the viewport, skipping stale references,
//! - draws the cards in layers grouped by category, so paint changes stay
//!   bounded as the tree grows.
//!
//! Output goes to a [`DrawSurface`]: a small imaging program of state ops and
//! draw ops. [`RecordingSurface`] records it for tests and headless tools.
//!
//! Input goes the other way: [`TreeInput`] turns pointer gestures into
//! viewport changes and resolves taps through [`TreeRenderer::hit_test`],
//! reporting both through [`TreeActions`].
//!
//! # Example
//!
//! ```rust
//! use arbor_render::{LodTier, RecordingSurface, RenderConfig, TreeRenderer};
//! use arbor_tree::{EntityId, TreeNode};
//! use arbor_view::ViewportState;
//! use kurbo::{Point, Size};
//!
//! let nodes = vec![
//!     TreeNode::new(EntityId(1), 0.0, 0.0, "Ada").with_children([EntityId(2)]),
//!     TreeNode::new(EntityId(2), 0.0, 300.0, "Byron"),
//! ];
//! let mut renderer = TreeRenderer::new(RenderConfig::default(), nodes);
//!
//! let state = ViewportState::new(1.0, kurbo::Vec2::ZERO);
//! let canvas = Size::new(800.0, 600.0);
//! let mut surface = RecordingSurface::new();
//! let stats = renderer.render(state, canvas, &mut surface);
//!
//! assert_eq!(stats.tier, LodTier::Full);
//! assert_eq!(stats.visible, 2);
//! assert_eq!(stats.connections_drawn, 1);
//!
//! // The canvas centre shows the centre of the tree, between the two cards.
//! assert_eq!(renderer.hit_test(state, canvas, Point::new(400.0, 300.0)), None);
//! assert_eq!(
//!     renderer.hit_test(state, canvas, Point::new(400.0, 150.0)),
//!     Some(EntityId(1))
//! );
//! ```

pub mod card;
mod config;
pub mod connections;
mod input;
mod lod;
mod minimap;
mod renderer;
mod scene;
pub mod surface;
mod theme;

pub use config::RenderConfig;
pub use input::{TapKind, TreeActions, TreeInput};
pub use lod::{LodThresholds, LodTier};
pub use minimap::MiniMapOverlay;
pub use renderer::{FrameStats, TreeRenderer};
pub use scene::TreeScene;
pub use surface::{DrawOp, DrawSurface, RecordingSurface, StateOp, TextAlign};
pub use theme::{CategoryPalette, INDICATOR_PALETTE, Theme};
