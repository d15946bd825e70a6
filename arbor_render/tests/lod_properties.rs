// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for level-of-detail selection.

use arbor_render::{LodThresholds, LodTier, RecordingSurface, RenderConfig, TreeRenderer};
use arbor_tree::{EntityId, TreeNode};
use arbor_view::{MIN_SCALE, ViewportState};
use kurbo::{Size, Vec2};
use proptest::prelude::*;

fn thresholds() -> impl Strategy<Value = LodThresholds> {
    (0.01f64..2.0, 0.01f64..2.0).prop_map(|(a, b)| LodThresholds::new(a, b))
}

proptest! {
    #[test]
    fn tier_never_drops_as_scale_grows(
        lod in thresholds(),
        a in 0.0f64..5.0,
        b in 0.0f64..5.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(lod.select(lo) <= lod.select(hi));
    }

    #[test]
    fn capabilities_are_monotonic(lod in thresholds(), scale in 0.0f64..5.0) {
        let tier = lod.select(scale);
        prop_assert_eq!(tier.wants_thumbnails(), scale >= lod.photo());
        prop_assert_eq!(tier.shows_details(), scale >= lod.detail());
        if tier.draws_photos() {
            prop_assert!(tier.wants_thumbnails());
        }
    }

    #[test]
    fn frames_use_the_tier_of_the_clamped_scale(scale in -1.0f64..4.0) {
        let config = RenderConfig::default();
        let mut renderer = TreeRenderer::new(
            config,
            vec![TreeNode::new(EntityId(1), 0.0, 0.0, "Ada")],
        );
        let state = ViewportState::new(scale, Vec2::ZERO);
        let stats = renderer.render(state, Size::new(640.0, 480.0), &mut RecordingSurface::new());
        let clamped = config.scale_limits.clamp(state.effective_scale());
        prop_assert_eq!(stats.tier, config.lod.select(clamped));
        if scale <= MIN_SCALE {
            prop_assert_eq!(stats.tier, LodTier::Glyph);
        }
        prop_assert_eq!(stats.visible, 1);
    }
}
