// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a tree headlessly and logs what each frame did.
//!
//! Loads the tree from the JSON file given as the first argument, or the
//! bundled fixture, then:
//!   - draws frames at each level of detail onto a recording surface,
//!   - taps the canvas centre, drags, and zooms past the limit,
//!   - navigates through the overview and draws it.
//!
//! Examples:
//!   `cargo run -p arbor_demos --example headless_frame`
//!   `RUST_LOG=trace cargo run -p arbor_demos --example headless_frame -- tree.json`

use std::error::Error;
use std::{env, fs};

use arbor_demos::{TreeFile, init_tracing};
use arbor_minimap::MiniMapConfig;
use arbor_render::{RecordingSurface, RenderConfig, TapKind, TreeActions, TreeInput, TreeRenderer};
use arbor_thumbs::{CacheConfig, ThumbnailLoader, shared_cache};
use arbor_tree::{EntityId, TreeNode};
use arbor_view::ViewportState;
use kurbo::{Point, Size, Vec2};
use tracing::info;

struct LogActions;

impl TreeActions for LogActions {
    fn primary_action(&mut self, id: EntityId) {
        info!(id = id.0, "open member");
    }

    fn secondary_action(&mut self, id: EntityId) {
        info!(id = id.0, "member menu");
    }

    fn scale_changed(&mut self, factor: f64) {
        info!(factor, "zoomed");
    }

    fn offset_changed(&mut self, offset: Vec2) {
        info!(x = offset.x, y = offset.y, "overview moved the view");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let file = match env::args().nth(1) {
        Some(path) => TreeFile::from_json(&fs::read_to_string(path)?)?,
        None => TreeFile::bundled()?,
    };
    let config = RenderConfig::default().with_layout(file.layout);
    let cache_config = CacheConfig::default();
    let loader = ThumbnailLoader::spawn(shared_cache(&cache_config), cache_config)?;
    let mut renderer = TreeRenderer::new(config, file.nodes).with_loader(loader);

    let canvas = Size::new(1080.0, 1920.0);
    let mut state = ViewportState::default();
    let mut surface = RecordingSurface::new();
    for scale in [0.2, 0.35, 1.0] {
        state.scale = scale;
        surface.clear();
        let stats = renderer.render(state, canvas, &mut surface);
        info!(scale, ?stats, ops = surface.events().len(), "frame");
    }

    let mut actions = LogActions;
    let mut input = TreeInput::new();
    let centre = Point::new(canvas.width / 2.0, canvas.height / 2.0);
    match input.tap(&renderer, state, canvas, centre, TapKind::Primary, &mut actions) {
        Some(id) => {
            let name = renderer.scene().node(id).map(TreeNode::display_name);
            info!(id = id.0, name = name.as_deref(), "tapped");
        }
        None => info!("nothing under the canvas centre"),
    }

    input.drag_start(centre);
    input.drag_move(&renderer, centre + Vec2::new(-120.0, 40.0), &mut state, &mut actions);
    let distance = input.drag_distance(centre + Vec2::new(-120.0, 40.0));
    input.drag_end();
    input.zoom_at(&renderer, centre, 4.0, &mut state, canvas, &mut actions);
    info!(?distance, scale = state.scale, "dragged and zoomed");

    let overlay = renderer.minimap(&MiniMapConfig::default());
    input.minimap_tap(&overlay, Point::new(30.0, 30.0), &mut state, canvas, &mut actions);
    surface.clear();
    overlay.draw(&mut surface, Point::new(16.0, 16.0), state, canvas, &config.theme);
    info!(ops = surface.events().len(), "overview");

    Ok(())
}
