// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Tree: the laid-out family tree consumed by the Arbor engine.
//!
//! Layout itself is not computed here. An external layout pass assigns every
//! member a tree-space position; this crate only describes the result:
//! - [`TreeNode`]: one member with its position, relations, and display attributes.
//! - [`TreeLayoutConfig`]: the fixed node footprint shared by layout, indexing, and drawing.
//! - [`TreeBounds`]: the extent of the whole laid-out tree.
//!
//! Nodes are centred on their position: a node at `(x, y)` occupies
//! `[x - w/2, x + w/2] × [y - h/2, y + h/2]` for a `w × h` footprint.
//!
//! ```rust
//! use arbor_tree::{EntityId, TreeBounds, TreeLayoutConfig, TreeNode};
//!
//! let config = TreeLayoutConfig::default();
//! let nodes = [
//!     TreeNode::new(EntityId(1), 0.0, 0.0, "Ada").with_children([EntityId(2)]),
//!     TreeNode::new(EntityId(2), 0.0, 300.0, "Byron"),
//! ];
//!
//! let bounds = TreeBounds::from_nodes(&nodes, &config);
//! assert_eq!(bounds.width, config.node_width);
//! assert_eq!(bounds.center_y, 150.0);
//! ```
//!
//! Enable the `serde` feature to (de)serialize the model, for example when a
//! layout service hands trees over as JSON.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod bounds;
mod node;

pub use bounds::{TreeBounds, TreeLayoutConfig};
pub use node::{Category, EntityId, TreeNode};
