// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid over node boxes.

use core::fmt::Debug;

use arbor_tree::{TreeLayoutConfig, TreeNode};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::aabb::Aabb2D;

type CellKey = (i64, i64);

/// Grid tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexConfig {
    /// Cell edge length as a multiple of the largest node dimension.
    ///
    /// At `3.0` a node overlaps at most four cells, which keeps bucket
    /// occupancy bounded independently of tree size.
    pub cell_multiplier: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cell_multiplier: 3.0,
        }
    }
}

impl IndexConfig {
    /// Sets the cell multiplier.
    #[must_use]
    pub fn with_cell_multiplier(mut self, cell_multiplier: f64) -> Self {
        self.cell_multiplier = cell_multiplier;
        self
    }

    /// Cell edge length for the given footprint.
    ///
    /// Falls back to `1.0` when the product is not a positive finite number.
    #[must_use]
    pub fn cell_size(&self, layout: &TreeLayoutConfig) -> f64 {
        let size = self.cell_multiplier * layout.max_extent();
        if size.is_finite() && size > 0.0 {
            size
        } else {
            1.0
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct Span {
    start: u32,
    len: u32,
}

/// Uniform grid index.
///
/// Every entry is registered in each cell its box overlaps. Buckets live in a
/// single arena (`slots`) addressed by per-cell spans, so a rebuild performs a
/// fixed number of allocations regardless of how many cells are touched.
///
/// The index is immutable once built: changes to the node set or footprint
/// require building a new one (see [`crate::SharedIndex`] for swapping).
pub struct GridIndex<K> {
    cell_size: f64,
    entries: Vec<(K, Aabb2D)>,
    cells: HashMap<CellKey, Span>,
    slots: Vec<u32>,
    /// Inclusive range of occupied cells, `None` when empty.
    occupied: Option<(CellKey, CellKey)>,
}

impl<K: Copy> GridIndex<K> {
    /// Builds an index with the given cell edge length.
    ///
    /// Entries keep their iteration order; it decides point-query ties and the
    /// order of rectangle-query results. Entries with non-finite or inverted
    /// boxes are dropped.
    pub fn build(cell_size: f64, items: impl IntoIterator<Item = (K, Aabb2D)>) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let mut skipped = 0_usize;
        let entries: Vec<(K, Aabb2D)> = items
            .into_iter()
            .filter(|(_, aabb)| {
                let ok = aabb.is_valid();
                if !ok {
                    skipped += 1;
                }
                ok
            })
            .collect();

        let mut index = Self {
            cell_size,
            entries,
            cells: HashMap::new(),
            slots: Vec::new(),
            occupied: None,
        };

        // Pass 1: count bucket sizes.
        let mut total = 0_usize;
        for i in 0..index.entries.len() {
            let (lo, hi) = index.cell_range(&index.entries[i].1);
            for cy in lo.1..=hi.1 {
                for cx in lo.0..=hi.0 {
                    index.cells.entry((cx, cy)).or_default().len += 1;
                    total += 1;
                }
            }
            index.occupied = Some(match index.occupied {
                None => (lo, hi),
                Some((olo, ohi)) => (
                    (olo.0.min(lo.0), olo.1.min(lo.1)),
                    (ohi.0.max(hi.0), ohi.1.max(hi.1)),
                ),
            });
        }

        // Assign spans, then reuse `len` as the fill cursor.
        let mut start = 0_u32;
        for span in index.cells.values_mut() {
            span.start = start;
            start += span.len;
            span.len = 0;
        }

        // Pass 2: fill in insertion order.
        index.slots = vec![0; total];
        for i in 0..index.entries.len() {
            let (lo, hi) = index.cell_range(&index.entries[i].1);
            for cy in lo.1..=hi.1 {
                for cx in lo.0..=hi.0 {
                    if let Some(span) = index.cells.get_mut(&(cx, cy)) {
                        index.slots[(span.start + span.len) as usize] = slot_id(i);
                        span.len += 1;
                    }
                }
            }
        }

        tracing::debug!(
            entries = index.entries.len(),
            skipped,
            cells = index.cells.len(),
            slots = index.slots.len(),
            max_bucket = index.max_bucket_len(),
            cell_size,
            "built grid index"
        );
        index
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Size of the fullest bucket.
    pub fn max_bucket_len(&self) -> usize {
        self.cells
            .values()
            .map(|s| s.len as usize)
            .max()
            .unwrap_or(0)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (K, Aabb2D)> + '_ {
        self.entries.iter().copied()
    }

    /// First entry (in insertion order) whose box contains the point.
    ///
    /// Only the point's own bucket is scanned.
    pub fn query_point(&self, x: f64, y: f64) -> Option<K> {
        self.bucket_at(x, y)
            .iter()
            .map(|&s| &self.entries[s as usize])
            .find(|(_, aabb)| aabb.contains_point(x, y))
            .map(|(k, _)| *k)
    }

    /// Every entry whose box contains the point, in insertion order.
    ///
    /// Correctly laid-out trees never produce more than one; this exists to
    /// diagnose overlapping layouts.
    pub fn query_point_all(&self, x: f64, y: f64) -> SmallVec<[K; 2]> {
        self.bucket_at(x, y)
            .iter()
            .map(|&s| &self.entries[s as usize])
            .filter(|(_, aabb)| aabb.contains_point(x, y))
            .map(|(k, _)| *k)
            .collect()
    }

    /// Entries whose box overlaps `rect`, deduplicated, in insertion order.
    pub fn query_rect(&self, rect: Aabb2D) -> Vec<K> {
        let mut out = Vec::new();
        self.query_rect_into(rect, &mut out);
        out
    }

    /// Like [`GridIndex::query_rect`], appending into a caller-owned buffer.
    ///
    /// The buffer is cleared first.
    pub fn query_rect_into(&self, rect: Aabb2D, out: &mut Vec<K>) {
        out.clear();
        let mut hits: Vec<u32> = Vec::new();
        self.visit_rect(rect, |slot| hits.push(slot));
        hits.sort_unstable();
        out.extend(hits.into_iter().map(|s| self.entries[s as usize].0));
    }

    /// Visits the slot of every entry overlapping `rect` exactly once, in no
    /// particular order.
    fn visit_rect(&self, rect: Aabb2D, mut f: impl FnMut(u32)) {
        if !rect.is_valid() {
            return;
        }
        let Some((olo, ohi)) = self.occupied else {
            return;
        };
        let (qlo, qhi) = self.cell_range(&rect);
        // Only occupied cells can hold candidates.
        let lo = (qlo.0.max(olo.0), qlo.1.max(olo.1));
        let hi = (qhi.0.min(ohi.0), qhi.1.min(ohi.1));
        if lo.0 > hi.0 || lo.1 > hi.1 {
            return;
        }
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                let Some(span) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &slot in self.span_slots(*span) {
                    let aabb = &self.entries[slot as usize].1;
                    if !aabb.overlaps(&rect) {
                        continue;
                    }
                    // Report an entry only from the first cell it shares with
                    // the scanned range, so multi-cell entries appear once.
                    let own = self.cell_for(aabb.min_x, aabb.min_y);
                    if (own.0.max(lo.0), own.1.max(lo.1)) == (cx, cy) {
                        f(slot);
                    }
                }
            }
        }
    }

    fn bucket_at(&self, x: f64, y: f64) -> &[u32] {
        if !(x.is_finite() && y.is_finite()) {
            return &[];
        }
        self.cells
            .get(&self.cell_for(x, y))
            .map(|span| self.span_slots(*span))
            .unwrap_or(&[])
    }

    fn span_slots(&self, span: Span) -> &[u32] {
        let start = span.start as usize;
        &self.slots[start..start + span.len as usize]
    }

    fn cell_range(&self, a: &Aabb2D) -> (CellKey, CellKey) {
        (
            self.cell_for(a.min_x, a.min_y),
            self.cell_for(a.max_x, a.max_y),
        )
    }

    fn cell_for(&self, x: f64, y: f64) -> CellKey {
        (
            floor_to_i64(x / self.cell_size),
            floor_to_i64(y / self.cell_size),
        )
    }
}

impl GridIndex<usize> {
    /// Builds an index over `nodes`, keyed by position in the slice.
    ///
    /// Each node contributes its footprint under `layout`; the cell size is
    /// derived from `config`.
    pub fn from_nodes(nodes: &[TreeNode], layout: &TreeLayoutConfig, config: IndexConfig) -> Self {
        let items = nodes.iter().enumerate().map(|(i, n)| {
            (
                i,
                Aabb2D::centered(n.x, n.y, layout.node_width, layout.node_height),
            )
        });
        Self::build(config.cell_size(layout), items)
    }
}

impl<K: Debug> Debug for GridIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridIndex")
            .field("cell_size", &self.cell_size)
            .field("entries", &self.entries.len())
            .field("cells", &self.cells.len())
            .field("slots", &self.slots.len())
            .field("occupied", &self.occupied)
            .finish_non_exhaustive()
    }
}

#[inline]
fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Saturating float-to-int casts are intended; cells beyond i64 are not meaningful."
    )]
    let i = v.floor() as i64;
    i
}

#[inline]
fn slot_id(i: usize) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Trees are far below u32::MAX nodes."
    )]
    let s = i as u32;
    s
}

#[cfg(test)]
mod tests {
    use arbor_tree::{EntityId, TreeLayoutConfig, TreeNode};

    use super::{GridIndex, IndexConfig};
    use crate::Aabb2D;

    fn three_nodes() -> Vec<TreeNode> {
        vec![
            TreeNode::new(EntityId(1), 0.0, 0.0, "a"),
            TreeNode::new(EntityId(2), 200.0, 0.0, "b"),
            TreeNode::new(EntityId(3), 100.0, 150.0, "c"),
        ]
    }

    #[test]
    fn three_node_scenario() {
        let nodes = three_nodes();
        let layout = TreeLayoutConfig::new(150.0, 180.0);
        let idx = GridIndex::from_nodes(&nodes, &layout, IndexConfig::default());
        assert_eq!(idx.cell_size(), 540.0);

        assert_eq!(idx.query_point(100.0, 160.0), Some(2));
        assert_eq!(idx.query_point(1000.0, 1000.0), None);
    }

    #[test]
    fn nodes_straddling_cells_are_found_from_every_cell() {
        // Cell size 10; the box spans cells x in -1..=1.
        let idx = GridIndex::build(10.0, [(7_u32, Aabb2D::new(-5.0, 1.0, 15.0, 4.0))]);
        assert_eq!(idx.cell_count(), 3);
        assert_eq!(idx.query_point(-4.0, 2.0), Some(7));
        assert_eq!(idx.query_point(5.0, 2.0), Some(7));
        assert_eq!(idx.query_point(14.0, 2.0), Some(7));
        assert_eq!(idx.query_point(16.0, 2.0), None);
    }

    #[test]
    fn rect_query_deduplicates_and_keeps_insertion_order() {
        let idx = GridIndex::build(
            10.0,
            [
                (3_u32, Aabb2D::new(0.0, 0.0, 35.0, 35.0)),
                (1, Aabb2D::new(50.0, 50.0, 55.0, 55.0)),
                (2, Aabb2D::new(-20.0, -20.0, -15.0, -15.0)),
            ],
        );
        assert_eq!(idx.query_rect(Aabb2D::new(-100.0, -100.0, 100.0, 100.0)), vec![3, 1, 2]);
        assert_eq!(idx.query_rect(Aabb2D::new(5.0, 5.0, 52.0, 52.0)), vec![3, 1]);
        assert!(idx.query_rect(Aabb2D::new(40.0, 0.0, 45.0, 10.0)).is_empty());
    }

    #[test]
    fn overlapping_boxes_resolve_by_insertion_order() {
        let idx = GridIndex::build(
            100.0,
            [
                (10_u32, Aabb2D::new(0.0, 0.0, 50.0, 50.0)),
                (20, Aabb2D::new(25.0, 25.0, 75.0, 75.0)),
            ],
        );
        assert_eq!(idx.query_point(30.0, 30.0), Some(10));
        assert_eq!(idx.query_point_all(30.0, 30.0).as_slice(), &[10, 20]);
    }

    #[test]
    fn invalid_boxes_and_queries_are_ignored() {
        let idx = GridIndex::build(
            10.0,
            [
                (1_u32, Aabb2D::new(f64::NAN, 0.0, 1.0, 1.0)),
                (2, Aabb2D::new(0.0, 0.0, 1.0, 1.0)),
            ],
        );
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.query_point(f64::NAN, 0.5), None);
        assert!(idx.query_rect(Aabb2D::new(1.0, 1.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn huge_query_is_clamped_to_occupied_cells() {
        let idx = GridIndex::build(1.0, [(1_u32, Aabb2D::new(0.0, 0.0, 1.0, 1.0))]);
        let r = Aabb2D::new(-1e15, -1e15, 1e15, 1e15);
        assert_eq!(idx.query_rect(r), vec![1]);
    }

    #[test]
    fn empty_index() {
        let idx: GridIndex<u32> = GridIndex::build(5.0, []);
        assert!(idx.is_empty());
        assert_eq!(idx.max_bucket_len(), 0);
        assert_eq!(idx.query_point(0.0, 0.0), None);
        assert!(idx.query_rect(Aabb2D::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn degenerate_cell_size_falls_back() {
        let layout = TreeLayoutConfig::new(0.0, 0.0);
        assert_eq!(IndexConfig::default().cell_size(&layout), 1.0);
        let idx = GridIndex::build(-3.0, [(1_u32, Aabb2D::new(0.0, 0.0, 2.0, 2.0))]);
        assert_eq!(idx.cell_size(), 1.0);
        assert_eq!(idx.query_point(1.5, 1.5), Some(1));
    }
}
