// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale-dependent level of detail.

/// Rendering fidelity for a frame.
///
/// Tiers are ordered from cheapest to richest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LodTier {
    /// Card and a placeholder glyph. Thumbnails are neither drawn nor requested.
    #[default]
    Glyph,
    /// Same drawing as [`LodTier::Glyph`], but thumbnails for visible nodes
    /// are requested so they are warm when the view reaches full detail.
    Outline,
    /// Card, avatar, labels, and markers.
    Full,
}

impl LodTier {
    /// Whether text labels and markers are drawn.
    pub fn shows_details(self) -> bool {
        self == Self::Full
    }

    /// Whether visible thumbnails should be loaded.
    pub fn wants_thumbnails(self) -> bool {
        self >= Self::Outline
    }

    /// Whether loaded thumbnails are drawn.
    pub fn draws_photos(self) -> bool {
        self == Self::Full
    }
}

/// Scale thresholds between tiers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LodThresholds {
    photo: f64,
    detail: f64,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            photo: 0.3,
            detail: 0.4,
        }
    }
}

impl LodThresholds {
    /// Creates thresholds; the pair is reordered so `photo <= detail`.
    pub fn new(photo: f64, detail: f64) -> Self {
        let (photo, detail) = if photo <= detail {
            (photo, detail)
        } else {
            (detail, photo)
        };
        Self { photo, detail }
    }

    /// Scale at which thumbnails start loading.
    pub fn photo(&self) -> f64 {
        self.photo
    }

    /// Scale at which full detail starts.
    pub fn detail(&self) -> f64 {
        self.detail
    }

    /// Tier for `scale`. NaN selects the cheapest tier.
    pub fn select(&self, scale: f64) -> LodTier {
        if scale >= self.detail {
            LodTier::Full
        } else if scale >= self.photo {
            LodTier::Outline
        } else {
            LodTier::Glyph
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LodThresholds, LodTier};

    #[test]
    fn default_tiers() {
        let t = LodThresholds::default();
        assert_eq!(t.select(0.2), LodTier::Glyph);
        assert_eq!(t.select(0.3), LodTier::Outline);
        assert_eq!(t.select(0.39), LodTier::Outline);
        assert_eq!(t.select(0.4), LodTier::Full);
        assert_eq!(t.select(3.0), LodTier::Full);
        assert_eq!(t.select(f64::NAN), LodTier::Glyph);
    }

    #[test]
    fn tier_capabilities() {
        assert!(!LodTier::Glyph.wants_thumbnails());
        assert!(LodTier::Outline.wants_thumbnails());
        assert!(!LodTier::Outline.draws_photos());
        assert!(LodTier::Full.shows_details());
    }

    #[test]
    fn swapped_thresholds_are_reordered() {
        let t = LodThresholds::new(0.8, 0.5);
        assert_eq!((t.photo(), t.detail()), (0.5, 0.8));
    }
}
