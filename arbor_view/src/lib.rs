// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor View: the viewport transform of the tree canvas.
//!
//! The canvas shows tree space through a uniform scale and a pixel offset.
//! This crate provides:
//! - [`ViewportState`]: the pan/zoom state (scale and offset), bounded by [`ScaleLimits`].
//! - [`ViewTransform`]: a per-frame pairing of that state with the canvas size, used
//!   for screen ↔ tree conversion and for the padded culling rectangle.
//! - [`gesture`]: small trackers turning pointer input into pan deltas and zoom factors.
//!
//! It does **not** own the viewport. The embedding UI keeps the authoritative
//! [`ViewportState`] and passes it into every frame; nothing here caches a copy.
//!
//! ## Coordinate model
//!
//! With canvas centre `c`, offset `o`, scale `s` and origin `g` (the tree point
//! shown at the canvas centre when the offset is zero):
//!
//! - `screen_to_tree(p) = (p - c - o) / s + g`
//! - `tree_to_screen(t) = (t - g) * s + c + o`
//!
//! The origin defaults to `(0, 0)`. The Arbor renderer uses the tree bounds
//! centre so an unpanned view is centred on the tree.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use arbor_view::{ScaleLimits, ViewTransform, ViewportState};
//!
//! let limits = ScaleLimits::default();
//! let mut state = ViewportState::default();
//! state.pan(Vec2::new(40.0, -20.0));
//! state.zoom(2.0, limits);
//!
//! let view = ViewTransform::new(state, Size::new(800.0, 600.0));
//! let tree_pt = view.screen_to_tree(Point::new(440.0, 280.0));
//! assert_eq!(tree_pt, Point::ZERO);
//!
//! // Padded culling rectangle in tree space.
//! let visible = view.viewport_rect(360.0);
//! assert!(visible.contains(tree_pt));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod gesture;
mod state;
mod transform;

pub use state::{MIN_SCALE, ScaleLimits, ViewportState};
pub use transform::{VIEWPORT_PADDING_FACTOR, ViewTransform};
