// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use arbor_index::{Aabb2D, GridIndex, IndexConfig, SharedIndex};
use arbor_tree::{EntityId, TreeBounds, TreeLayoutConfig, TreeNode};
use hashbrown::HashMap;

/// The laid-out tree with the derived lookup structures the pipeline needs.
///
/// Node positions, the id map, the bounds, and the spatial index change
/// together: every setter rebuilds whatever depends on what it changed, so
/// no query ever sees an index built for a different node set or footprint.
///
/// The index is keyed by [`EntityId`] and published through a
/// [`SharedIndex`]. Other threads holding a snapshot across a rebuild get
/// ids that may no longer resolve; [`TreeScene::node`] then returns `None`.
#[derive(Debug)]
pub struct TreeScene {
    nodes: Vec<TreeNode>,
    by_id: HashMap<EntityId, usize>,
    bounds: TreeBounds,
    layout: TreeLayoutConfig,
    index_config: IndexConfig,
    index: SharedIndex<EntityId>,
}

impl TreeScene {
    /// Builds a scene over `nodes`.
    pub fn new(nodes: Vec<TreeNode>, layout: TreeLayoutConfig, index_config: IndexConfig) -> Self {
        let by_id = id_map(&nodes);
        let bounds = TreeBounds::from_nodes(&nodes, &layout);
        let index = SharedIndex::new(build_index(&nodes, &by_id, &layout, index_config));
        Self {
            nodes,
            by_id,
            bounds,
            layout,
            index_config,
            index,
        }
    }

    /// Replaces the node set after a layout pass.
    pub fn set_nodes(&mut self, nodes: Vec<TreeNode>) {
        self.nodes = nodes;
        self.by_id = id_map(&self.nodes);
        self.rebuild();
    }

    /// Changes the node footprint. Rebuilds only if it differs.
    pub fn set_layout(&mut self, layout: TreeLayoutConfig) {
        if layout != self.layout {
            self.layout = layout;
            self.rebuild();
        }
    }

    /// Changes the grid tuning. Rebuilds only if it differs.
    pub fn set_index_config(&mut self, index_config: IndexConfig) {
        if index_config != self.index_config {
            self.index_config = index_config;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.bounds = TreeBounds::from_nodes(&self.nodes, &self.layout);
        self.index.replace(build_index(
            &self.nodes,
            &self.by_id,
            &self.layout,
            self.index_config,
        ));
    }

    /// Nodes in layout order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Node with the given id.
    pub fn node(&self, id: EntityId) -> Option<&TreeNode> {
        self.by_id.get(&id).map(|&i| &self.nodes[i])
    }

    /// Whether a node with the given id is present.
    pub fn contains(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Extent of the tree.
    pub fn bounds(&self) -> &TreeBounds {
        &self.bounds
    }

    /// Node footprint.
    pub fn layout(&self) -> &TreeLayoutConfig {
        &self.layout
    }

    /// Grid tuning.
    pub fn index_config(&self) -> IndexConfig {
        self.index_config
    }

    /// Current index snapshot.
    pub fn index(&self) -> Arc<GridIndex<EntityId>> {
        self.index.snapshot()
    }

    /// The shared index, for readers on other threads.
    pub fn shared_index(&self) -> &SharedIndex<EntityId> {
        &self.index
    }

    /// Number of index rebuilds since construction.
    pub fn generation(&self) -> u64 {
        self.index.generation()
    }
}

impl Default for TreeScene {
    fn default() -> Self {
        Self::new(Vec::new(), TreeLayoutConfig::default(), IndexConfig::default())
    }
}

/// Position of each id, keeping the first occurrence of duplicates.
fn id_map(nodes: &[TreeNode]) -> HashMap<EntityId, usize> {
    let mut map = HashMap::with_capacity(nodes.len());
    let mut duplicates = 0_usize;
    for (i, node) in nodes.iter().enumerate() {
        if map.contains_key(&node.id) {
            duplicates += 1;
        } else {
            map.insert(node.id, i);
        }
    }
    if duplicates > 0 {
        tracing::debug!(duplicates, "ignoring nodes with duplicate ids");
    }
    map
}

/// Indexes the node each id resolves to; later duplicates are left out so a
/// hit always names the node that gets drawn.
fn build_index(
    nodes: &[TreeNode],
    by_id: &HashMap<EntityId, usize>,
    layout: &TreeLayoutConfig,
    config: IndexConfig,
) -> GridIndex<EntityId> {
    GridIndex::build(
        config.cell_size(layout),
        nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| by_id.get(&n.id) == Some(i))
            .map(|(_, n)| {
                (
                    n.id,
                    Aabb2D::centered(n.x, n.y, layout.node_width, layout.node_height),
                )
            }),
    )
}
