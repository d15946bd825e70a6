// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_index::IndexConfig;
use arbor_tree::TreeLayoutConfig;
use arbor_view::ScaleLimits;

use crate::{LodThresholds, Theme};

/// Everything the frame pipeline needs besides the nodes and the viewport.
#[derive(Copy, Clone, Debug)]
pub struct RenderConfig {
    /// Node footprint.
    pub layout: TreeLayoutConfig,
    /// Grid tuning.
    pub index: IndexConfig,
    /// Tier thresholds.
    pub lod: LodThresholds,
    /// Zoom range enforced by frames, hit tests, and gestures.
    pub scale_limits: ScaleLimits,
    /// Colours.
    pub theme: Theme,
    /// Card corner radius in tree units.
    pub corner_radius: f64,
    /// Longest name label, in characters.
    pub label_max_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: TreeLayoutConfig::default(),
            index: IndexConfig::default(),
            lod: LodThresholds::default(),
            scale_limits: ScaleLimits::default(),
            theme: Theme::default(),
            corner_radius: 12.0,
            label_max_chars: 12,
        }
    }
}

impl RenderConfig {
    /// Sets the node footprint.
    #[must_use]
    pub fn with_layout(mut self, layout: TreeLayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the grid tuning.
    #[must_use]
    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    /// Sets the tier thresholds.
    #[must_use]
    pub fn with_lod(mut self, lod: LodThresholds) -> Self {
        self.lod = lod;
        self
    }

    /// Sets the zoom range.
    #[must_use]
    pub fn with_scale_limits(mut self, scale_limits: ScaleLimits) -> Self {
        self.scale_limits = scale_limits;
        self
    }

    /// Sets the colours.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
