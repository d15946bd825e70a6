// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::PoisonError;

use kurbo::{Point, Rect, Size};

use arbor_index::Aabb2D;
use arbor_minimap::MiniMapConfig;
use arbor_thumbs::{SharedThumbnails, Thumbnail, ThumbnailLoader};
use arbor_tree::{Category, EntityId, TreeNode};
use arbor_view::{ViewTransform, ViewportState};

use crate::card::{
    CardGeometry, INITIAL_SIZE, MARKER_WIDTH, NAME_SIZE, OUTLINE_WIDTH, SECONDARY_SIZE,
    SELECTED_OUTLINE_WIDTH, age_label, truncate_label,
};
use crate::connections::draw_connections;
use crate::scene::TreeScene;
use crate::surface::{DrawOp, DrawSurface, Painter, TextAlign};
use crate::{LodTier, MiniMapOverlay, RenderConfig};

/// What one frame did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Tier the frame was drawn at.
    pub tier: LodTier,
    /// Nodes inside the padded viewport.
    pub visible: usize,
    /// Connections drawn.
    pub connections_drawn: usize,
    /// Relation references skipped because the other end is missing.
    pub connections_stale: usize,
    /// Paint changes issued to the surface.
    pub paint_changes: usize,
    /// Avatars drawn from a cached photo.
    pub thumbnails_drawn: usize,
    /// Avatars drawn as an initials placeholder.
    pub placeholders_drawn: usize,
}

/// The per-frame pipeline: culling, level of detail, connections, batched
/// cards, and hit testing.
///
/// The renderer owns the scene but not the viewport. Every call takes the
/// caller's [`ViewportState`] and canvas size, so there is no second copy of
/// the view to drift out of sync.
#[derive(Debug)]
pub struct TreeRenderer {
    config: RenderConfig,
    scene: TreeScene,
    thumbnails: Option<SharedThumbnails>,
    loader: Option<ThumbnailLoader>,
    selected: Option<EntityId>,
    requested: Vec<String>,
    visible: Vec<EntityId>,
}

impl TreeRenderer {
    /// Creates a renderer over `nodes`. Avatars are placeholders until a
    /// thumbnail source is attached.
    pub fn new(config: RenderConfig, nodes: Vec<TreeNode>) -> Self {
        Self {
            scene: TreeScene::new(nodes, config.layout, config.index),
            config,
            thumbnails: None,
            loader: None,
            selected: None,
            requested: Vec::new(),
            visible: Vec::new(),
        }
    }

    /// Draws photos found in `cache`, without requesting any.
    #[must_use]
    pub fn with_thumbnails(mut self, cache: SharedThumbnails) -> Self {
        self.thumbnails = Some(cache);
        self
    }

    /// Draws photos from `loader`'s cache and requests the visible ones.
    #[must_use]
    pub fn with_loader(mut self, loader: ThumbnailLoader) -> Self {
        self.thumbnails = Some(loader.cache().clone());
        self.loader = Some(loader);
        self
    }

    /// The attached loader, if any.
    pub fn loader(&self) -> Option<&ThumbnailLoader> {
        self.loader.as_ref()
    }

    /// Current configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replaces the configuration, rebuilding the index if the footprint or
    /// grid tuning changed.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.scene.set_layout(config.layout);
        self.scene.set_index_config(config.index);
        self.config = config;
    }

    /// The scene being drawn.
    pub fn scene(&self) -> &TreeScene {
        &self.scene
    }

    /// Replaces the nodes after a layout pass.
    pub fn set_nodes(&mut self, nodes: Vec<TreeNode>) {
        self.scene.set_nodes(nodes);
        if self.selected.is_some_and(|id| !self.scene.contains(id)) {
            self.selected = None;
        }
        tracing::debug!(
            nodes = self.scene.nodes().len(),
            generation = self.scene.generation(),
            "scene rebuilt"
        );
    }

    /// Highlights `id`, or nothing.
    pub fn select(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    /// Highlighted entity.
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// `state` with its scale clamped to the configured limits.
    pub fn clamped(&self, state: ViewportState) -> ViewportState {
        let mut state = state;
        state.clamp_scale(self.config.scale_limits);
        state
    }

    /// The transform for `state` on `canvas`, centred on the tree bounds.
    ///
    /// The scale is clamped to [`RenderConfig::scale_limits`], so frames and
    /// hit tests never use a scale the gestures could not reach.
    pub fn view(&self, state: ViewportState, canvas: Size) -> ViewTransform {
        ViewTransform::new(self.clamped(state), canvas).with_origin(self.scene.bounds().center())
    }

    /// Tree-space rectangle that is culled against.
    pub fn visible_rect(&self, state: ViewportState, canvas: Size) -> Rect {
        self.view(state, canvas)
            .viewport_rect(ViewTransform::padding_for(self.scene.layout().max_extent()))
    }

    /// Entity under a screen point, if any.
    pub fn hit_test(&self, state: ViewportState, canvas: Size, screen: Point) -> Option<EntityId> {
        let tree = self.view(state, canvas).screen_to_tree(screen);
        self.scene
            .index()
            .query_point(tree.x, tree.y)
            .filter(|&id| self.scene.contains(id))
    }

    /// Overview of the current scene.
    pub fn minimap(&self, config: &MiniMapConfig) -> MiniMapOverlay {
        MiniMapOverlay::new(self.scene.nodes(), self.scene.bounds(), config)
    }

    /// Draws one frame onto `surface`.
    pub fn render<S: DrawSurface>(
        &mut self,
        state: ViewportState,
        canvas: Size,
        surface: S,
    ) -> FrameStats {
        let view = self.view(state, canvas);
        let viewport = view.viewport_rect(ViewTransform::padding_for(
            self.scene.layout().max_extent(),
        ));
        let tier = self.config.lod.select(view.scale());

        let mut visible = core::mem::take(&mut self.visible);
        self.scene
            .index()
            .query_rect_into(Aabb2D::from(viewport), &mut visible);

        if tier.wants_thumbnails() {
            self.request_thumbnails(&visible);
        }

        let nodes: Vec<&TreeNode> = visible
            .iter()
            .filter_map(|&id| self.scene.node(id))
            .collect();
        let photos = if tier.draws_photos() {
            self.photos(&nodes)
        } else {
            Vec::new()
        };

        let mut painter = Painter::new(surface);
        painter.transform(view.to_affine());
        let connections = draw_connections(
            &mut painter,
            &self.scene,
            viewport,
            &self.config.theme,
            view.scale(),
        );

        let cards = CardPass {
            nodes: &nodes,
            photos: &photos,
            config: &self.config,
            scene: &self.scene,
            selected: self.selected,
        };
        let avatars = cards.draw(&mut painter, tier);

        let stats = FrameStats {
            tier,
            visible: nodes.len(),
            connections_drawn: connections.drawn,
            connections_stale: connections.stale,
            paint_changes: painter.paint_changes(),
            thumbnails_drawn: avatars.photos,
            placeholders_drawn: avatars.placeholders,
        };
        tracing::trace!(
            tier = ?stats.tier,
            visible = stats.visible,
            connections = stats.connections_drawn,
            stale = stats.connections_stale,
            paint_changes = stats.paint_changes,
            thumbnails = stats.thumbnails_drawn,
            "frame"
        );

        self.visible = visible;
        stats
    }

    /// Sends the visible photo sources to the loader.
    ///
    /// A request goes out when the visible sources change, or when the loader
    /// has served the last request but some of its sources are missing again
    /// (evicted since). Sources that failed to decode are not asked for twice.
    fn request_thumbnails(&mut self, visible: &[EntityId]) {
        let Some(loader) = &self.loader else {
            return;
        };
        let scene = &self.scene;
        let sources = visible
            .iter()
            .filter_map(|&id| scene.node(id))
            .filter_map(|n| n.image_source.as_deref());
        if sources.clone().eq(self.requested.iter().map(String::as_str))
            && !needs_refill(&self.requested, loader)
        {
            return;
        }
        self.requested = sources.map(str::to_owned).collect();
        if !loader.request(self.requested.iter().cloned()) {
            tracing::debug!("thumbnail loader has exited");
        }
    }

    /// Cached photo for each node, looked up under a single lock.
    fn photos(&self, nodes: &[&TreeNode]) -> Vec<Option<Thumbnail>> {
        let Some(cache) = &self.thumbnails else {
            return vec![None; nodes.len()];
        };
        let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
        nodes
            .iter()
            .map(|n| n.image_source.as_deref().and_then(|s| cache.get(s)))
            .collect()
    }
}

/// Whether a served request left sources missing that could all be resident.
fn needs_refill(requested: &[String], loader: &ThumbnailLoader) -> bool {
    if requested.is_empty() || !loader.is_idle() {
        return false;
    }
    let cache = loader.cache().lock().unwrap_or_else(PoisonError::into_inner);
    let edge = loader.target() as usize;
    // More than the budget holds would evict and reload forever.
    if requested.len().saturating_mul(edge * edge * 4) > cache.budget() {
        return false;
    }
    requested
        .iter()
        .any(|s| !cache.contains(s) && !loader.has_failed(s))
}

#[derive(Copy, Clone, Debug, Default)]
struct AvatarCounts {
    photos: usize,
    placeholders: usize,
}

/// Draws the visible cards layer by layer.
///
/// Each layer visits nodes grouped by category, so paint changes are bounded
/// by the number of layers and categories rather than the number of nodes.
struct CardPass<'a> {
    nodes: &'a [&'a TreeNode],
    photos: &'a [Option<Thumbnail>],
    config: &'a RenderConfig,
    scene: &'a TreeScene,
    selected: Option<EntityId>,
}

impl CardPass<'_> {
    fn card(&self, node: &TreeNode) -> CardGeometry {
        CardGeometry::new(node.position(), self.scene.layout(), self.config.corner_radius)
    }

    fn photo(&self, i: usize) -> Option<&Thumbnail> {
        self.photos.get(i).and_then(Option::as_ref)
    }

    /// Visits nodes of one category, remembering their position in `nodes`.
    fn in_category(
        &self,
        category: Category,
    ) -> impl Iterator<Item = (usize, &TreeNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.category == category)
            .map(|(i, n)| (i, *n))
    }

    fn draw<S: DrawSurface>(&self, painter: &mut Painter<S>, tier: LodTier) -> AvatarCounts {
        if self.nodes.is_empty() {
            return AvatarCounts::default();
        }
        let theme = &self.config.theme;

        for category in Category::ALL {
            let mut group = self.in_category(category).peekable();
            if group.peek().is_some() {
                painter.paint(theme.cards.get(category));
            }
            for (_, node) in group {
                painter.draw(DrawOp::FillRoundedRect(self.card(node).shape()));
            }
        }

        painter.paint(theme.outline);
        painter.stroke_width(OUTLINE_WIDTH);
        for node in self.nodes.iter().filter(|n| Some(n.id) != self.selected) {
            painter.draw(DrawOp::StrokeRoundedRect(self.card(node).shape()));
        }
        if let Some(node) = self.nodes.iter().find(|n| Some(n.id) == self.selected) {
            painter.paint(theme.selection);
            painter.stroke_width(SELECTED_OUTLINE_WIDTH);
            painter.draw(DrawOp::StrokeRoundedRect(self.card(node).shape()));
        }

        if !tier.shows_details() {
            painter.paint(theme.placeholder());
            for node in self.nodes {
                painter.draw(DrawOp::FillCircle(self.card(node).glyph()));
            }
            return AvatarCounts::default();
        }

        let counts = self.draw_avatars(painter);
        self.draw_indicators(painter);
        self.draw_labels(painter);
        self.draw_markers(painter);
        counts
    }

    fn draw_avatars<S: DrawSurface>(&self, painter: &mut Painter<S>) -> AvatarCounts {
        let theme = &self.config.theme;
        let mut counts = AvatarCounts::default();

        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(photo) = self.photo(i) {
                painter.draw(DrawOp::CircleImage {
                    image: photo.clone(),
                    circle: self.card(node).avatar(),
                });
                counts.photos += 1;
            }
        }
        if counts.photos > 0 {
            painter.paint(theme.marker());
            painter.stroke_width(MARKER_WIDTH);
            for (i, node) in self.nodes.iter().enumerate() {
                if self.photo(i).is_some() {
                    painter.draw(DrawOp::StrokeCircle(self.card(node).avatar()));
                }
            }
        }

        counts.placeholders = self.nodes.len() - counts.photos;
        if counts.placeholders > 0 {
            painter.paint(theme.placeholder());
            for (i, node) in self.nodes.iter().enumerate() {
                if self.photo(i).is_none() {
                    painter.draw(DrawOp::FillCircle(self.card(node).avatar()));
                }
            }
        }
        counts
    }

    fn draw_indicators<S: DrawSurface>(&self, painter: &mut Painter<S>) {
        for category in Category::ALL {
            let mut group = self.in_category(category).peekable();
            if group.peek().is_some() {
                painter.paint(self.config.theme.indicators.get(category));
            }
            for (_, node) in group {
                painter.draw(DrawOp::FillCircle(self.card(node).indicator()));
            }
        }
    }

    fn draw_labels<S: DrawSurface>(&self, painter: &mut Painter<S>) {
        let theme = &self.config.theme;
        let max = self.config.label_max_chars;

        painter.paint(theme.text);
        for (i, node) in self.nodes.iter().enumerate() {
            let card = self.card(node);
            if let (None, Some(initial)) = (self.photo(i), node.initial()) {
                painter.draw(text(initial.to_string(), card.initial_anchor(), INITIAL_SIZE));
            }
            let name = truncate_label(&node.first_name, max);
            if !name.is_empty() {
                painter.draw(text(name.to_owned(), card.name_anchor(), NAME_SIZE));
            }
        }

        painter.paint(theme.secondary_text());
        for node in self.nodes {
            let card = self.card(node);
            let last = node.last_name.as_deref().map(|s| truncate_label(s, max));
            if let Some(last) = last.filter(|s| !s.is_empty()) {
                painter.draw(text(last.to_owned(), card.surname_anchor(), SECONDARY_SIZE));
            }
            if let Some(age) = age_label(node) {
                painter.draw(text(age, card.age_anchor(), SECONDARY_SIZE));
            }
        }
    }

    fn draw_markers<S: DrawSurface>(&self, painter: &mut Painter<S>) {
        let mut deceased = self.nodes.iter().filter(|n| !n.living).peekable();
        if deceased.peek().is_none() {
            return;
        }
        painter.paint(self.config.theme.marker());
        painter.stroke_width(MARKER_WIDTH);
        for node in deceased {
            for line in self.card(node).deceased_cross() {
                painter.draw(DrawOp::StrokeLine(line));
            }
        }
    }
}

fn text(text: String, anchor: Point, size: f64) -> DrawOp {
    DrawOp::Text {
        text,
        anchor,
        size,
        align: TextAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use arbor_tree::{EntityId, TreeNode};
    use arbor_view::ViewportState;
    use kurbo::{Point, Size};

    use super::TreeRenderer;
    use crate::RenderConfig;
    use crate::surface::RecordingSurface;

    #[test]
    fn selection_is_dropped_when_its_node_goes_away() {
        let mut r = TreeRenderer::new(
            RenderConfig::default(),
            vec![TreeNode::new(EntityId(1), 0.0, 0.0, "A")],
        );
        r.select(Some(EntityId(1)));
        r.set_nodes(vec![TreeNode::new(EntityId(2), 0.0, 0.0, "B")]);
        assert_eq!(r.selected(), None);
    }

    #[test]
    fn empty_scene_draws_nothing_but_the_transform() {
        let mut r = TreeRenderer::new(RenderConfig::default(), Vec::new());
        let mut rec = RecordingSurface::new();
        let stats = r.render(ViewportState::default(), Size::new(800.0, 600.0), &mut rec);
        assert_eq!(stats.visible, 0);
        assert_eq!(rec.draws().count(), 0);
        assert_eq!(
            r.hit_test(ViewportState::default(), Size::new(800.0, 600.0), Point::ZERO),
            None
        );
    }
}
