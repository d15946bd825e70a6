// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::TreeNode;

/// Fixed node footprint shared by layout, indexing, and rendering math.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeLayoutConfig {
    /// Node width in tree units.
    pub node_width: f64,
    /// Node height in tree units.
    pub node_height: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 180.0,
        }
    }
}

impl TreeLayoutConfig {
    /// Creates a config with the given footprint.
    #[must_use]
    pub const fn new(node_width: f64, node_height: f64) -> Self {
        Self {
            node_width,
            node_height,
        }
    }

    /// The larger of the two footprint dimensions.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.node_width.max(self.node_height)
    }

    /// Bounding box of a node centred at `center`.
    #[must_use]
    pub fn footprint(&self, center: Point) -> Rect {
        let hw = self.node_width * 0.5;
        let hh = self.node_height * 0.5;
        Rect::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }
}

/// Extent of the whole laid-out tree.
///
/// The centre and size fields are derived from the min/max corners; use
/// [`TreeBounds::new`] to keep them consistent.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeBounds {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
    /// Horizontal centre.
    pub center_x: f64,
    /// Vertical centre.
    pub center_y: f64,
    /// `max_x - min_x`.
    pub width: f64,
    /// `max_y - min_y`.
    pub height: f64,
}

impl TreeBounds {
    /// Creates bounds from min/max corners, normalizing swapped coordinates.
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let (min_x, max_x) = if min_x <= max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (min_y, max_y) = if min_y <= max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            center_x: (min_x + max_x) * 0.5,
            center_y: (min_y + max_y) * 0.5,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Bounds of every node footprint. Empty input yields all-zero bounds.
    #[must_use]
    pub fn from_nodes(nodes: &[TreeNode], config: &TreeLayoutConfig) -> Self {
        let mut iter = nodes.iter().map(|n| config.footprint(n.position()));
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let r = iter.fold(first, |acc, r| acc.union(r));
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Bounds as a kurbo rectangle.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;

    #[test]
    fn footprint_is_centred() {
        let config = TreeLayoutConfig::new(150.0, 180.0);
        let r = config.footprint(Point::new(100.0, 150.0));
        assert_eq!(r, Rect::new(25.0, 60.0, 175.0, 240.0));
        assert_eq!(config.max_extent(), 180.0);
    }

    #[test]
    fn bounds_cover_all_footprints() {
        let config = TreeLayoutConfig::new(100.0, 50.0);
        let nodes = [
            TreeNode::new(EntityId(1), -200.0, 0.0, "a"),
            TreeNode::new(EntityId(2), 300.0, 400.0, "b"),
        ];
        let b = TreeBounds::from_nodes(&nodes, &config);
        assert_eq!(b.min_x, -250.0);
        assert_eq!(b.max_x, 350.0);
        assert_eq!(b.min_y, -25.0);
        assert_eq!(b.max_y, 425.0);
        assert_eq!(b.width, 600.0);
        assert_eq!(b.center(), Point::new(50.0, 200.0));
    }

    #[test]
    fn empty_nodes_give_zero_bounds() {
        let b = TreeBounds::from_nodes(&[], &TreeLayoutConfig::default());
        assert_eq!(b, TreeBounds::default());
        assert_eq!(b.width, 0.0);
    }

    #[test]
    fn new_normalizes_swapped_corners() {
        let b = TreeBounds::new(10.0, 10.0, -10.0, -20.0);
        assert_eq!(b.to_rect(), Rect::new(-10.0, -20.0, 10.0, 10.0));
        assert_eq!(b.height, 30.0);
    }
}
