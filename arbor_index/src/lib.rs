// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Index: a uniform grid over fixed-footprint tree nodes.
//!
//! Hit-testing and visibility culling on the tree canvas must not scan every
//! node on every gesture or frame. This crate buckets node boxes into square
//! cells and answers:
//! - Point queries: the first node (in insertion order) whose box contains a point.
//! - Rectangle queries: every node whose box overlaps a rectangle, deduplicated.
//!
//! Cells are `cell_multiplier × max(node_width, node_height)` on a side (3× by
//! default), so each node touches a small constant number of cells and bucket
//! occupancy stays bounded independently of tree size.
//!
//! An index is immutable. Build a new one whenever the node list or footprint
//! changes and publish it through [`SharedIndex`], which swaps it in
//! atomically for readers.
//!
//! # Example
//!
//! ```rust
//! use arbor_index::{GridIndex, IndexConfig};
//! use arbor_tree::{EntityId, TreeLayoutConfig, TreeNode};
//!
//! let nodes = [
//!     TreeNode::new(EntityId(1), 0.0, 0.0, "Ada"),
//!     TreeNode::new(EntityId(2), 200.0, 0.0, "Byron"),
//!     TreeNode::new(EntityId(3), 100.0, 150.0, "Clara"),
//! ];
//! let layout = TreeLayoutConfig::new(150.0, 180.0);
//! let index = GridIndex::from_nodes(&nodes, &layout, IndexConfig::default());
//!
//! // Keys are positions in the node slice.
//! assert_eq!(index.query_point(100.0, 160.0), Some(2));
//! assert_eq!(index.query_point(1000.0, 1000.0), None);
//! ```
//!
//! Coordinates may be negative: cells use floor division. NaN coordinates
//! never match anything.

pub mod aabb;
mod grid;
mod shared;

pub use aabb::Aabb2D;
pub use grid::{GridIndex, IndexConfig};
pub use shared::SharedIndex;
