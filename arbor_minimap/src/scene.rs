// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use arbor_tree::{Category, EntityId, TreeNode};
use kurbo::{Line, Point};

use crate::MiniMapProjection;

/// One node in the overview.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MiniMapDot {
    /// Member id.
    pub id: EntityId,
    /// Dot centre in overview pixels.
    pub center: Point,
    /// Category, for the dot colour.
    pub category: Category,
}

/// Everything needed to draw the overview, in overview pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiniMapScene {
    /// Node dots in node order.
    pub dots: Vec<MiniMapDot>,
    /// Parent → child connector segments.
    pub connectors: Vec<Line>,
}

impl MiniMapScene {
    /// Projects `nodes` through `projection`.
    ///
    /// Children that are not in `nodes` are skipped.
    pub fn build(nodes: &[TreeNode], projection: &MiniMapProjection) -> Self {
        let dots: Vec<MiniMapDot> = nodes
            .iter()
            .map(|n| MiniMapDot {
                id: n.id,
                center: projection.project(n.position()),
                category: n.category,
            })
            .collect();
        let by_id: BTreeMap<EntityId, Point> = dots.iter().map(|d| (d.id, d.center)).collect();
        let by_id = &by_id;

        let connectors = nodes
            .iter()
            .zip(&dots)
            .flat_map(|(node, dot)| {
                node.children
                    .iter()
                    .filter_map(move |child| by_id.get(child))
                    .map(move |&child| Line::new(dot.center, child))
            })
            .collect();

        Self { dots, connectors }
    }
}
