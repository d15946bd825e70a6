// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor MiniMap: the overview of the whole tree.
//!
//! The overview shows every node as a dot inside a small fixed box, plus a
//! rectangle marking what the main canvas currently shows. Taps and drags on
//! the overview navigate the main canvas.
//!
//! Everything here is derived: a [`MiniMapProjection`] is recomputed from the
//! tree bounds, and every query takes the main [`ViewportState`] as input.
//! Nothing is cached between calls, so the overview cannot drift out of sync
//! with the main view.
//!
//! ```rust
//! use arbor_minimap::{MiniMapConfig, MiniMapProjection};
//! use arbor_tree::TreeBounds;
//! use arbor_view::ViewportState;
//! use kurbo::{Point, Size};
//!
//! let bounds = TreeBounds::new(0.0, 0.0, 1000.0, 500.0);
//! let minimap = MiniMapProjection::new(&bounds, &MiniMapConfig::default());
//!
//! // Tapping the overview centre recentres the main view on the tree.
//! let offset = minimap.tap_to_offset(
//!     Point::new(75.0, 50.0),
//!     ViewportState::default(),
//!     Size::new(800.0, 600.0),
//! );
//! assert!(offset.hypot() < 1e-9);
//! ```
//!
//! [`ViewportState`]: arbor_view::ViewportState
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod projection;
mod scene;

pub use projection::{MiniMapConfig, MiniMapProjection};
pub use scene::{MiniMapDot, MiniMapScene};
