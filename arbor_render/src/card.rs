// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card geometry and labels.
//!
//! Offsets are in tree units from the card's top-left corner and match a
//! 150 × 180 card; other footprints keep the same offsets.

use kurbo::{Circle, Line, Point, Rect, RoundedRect};

use arbor_tree::{TreeLayoutConfig, TreeNode};

/// Radius of the avatar circle.
pub const AVATAR_RADIUS: f64 = 24.0;
/// Distance from the card top to the avatar centre.
pub const AVATAR_TOP: f64 = 35.0;
/// Radius of the low-detail glyph.
pub const GLYPH_RADIUS: f64 = 20.0;
/// Radius of the category indicator dot.
pub const INDICATOR_RADIUS: f64 = 5.0;
/// Inset of the indicator dot from the top-right corner.
pub const INDICATOR_INSET: f64 = 12.0;
/// Outline width of an unselected card.
pub const OUTLINE_WIDTH: f64 = 1.0;
/// Outline width of the selected card.
pub const SELECTED_OUTLINE_WIDTH: f64 = 4.0;
/// Stroke width of avatar rings and markers.
pub const MARKER_WIDTH: f64 = 2.0;

/// Baseline of the first name.
pub const NAME_BASELINE: f64 = 80.0;
/// Baseline of the family name.
pub const SURNAME_BASELINE: f64 = 105.0;
/// Distance from the card bottom to the age baseline.
pub const AGE_BOTTOM: f64 = 10.0;
/// Font size of the first name.
pub const NAME_SIZE: f64 = 32.0;
/// Font size of secondary lines.
pub const SECONDARY_SIZE: f64 = 24.0;
/// Font size of the avatar initial.
pub const INITIAL_SIZE: f64 = 28.0;

/// Geometry of one card in tree space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardGeometry {
    /// Card bounds.
    pub rect: Rect,
    /// Corner radius.
    pub radius: f64,
}

impl CardGeometry {
    /// Card for a node centred at `center`.
    pub fn new(center: Point, layout: &TreeLayoutConfig, radius: f64) -> Self {
        Self {
            rect: layout.footprint(center),
            radius,
        }
    }

    /// Rounded card outline.
    pub fn shape(&self) -> RoundedRect {
        self.rect.to_rounded_rect(self.radius)
    }

    /// Low-detail glyph in the card centre.
    pub fn glyph(&self) -> Circle {
        Circle::new(self.rect.center(), GLYPH_RADIUS)
    }

    /// Avatar circle.
    pub fn avatar(&self) -> Circle {
        Circle::new(
            Point::new(self.rect.center().x, self.rect.y0 + AVATAR_TOP),
            AVATAR_RADIUS,
        )
    }

    /// Baseline anchor of the avatar initial.
    pub fn initial_anchor(&self) -> Point {
        self.avatar().center + (0.0, 10.0)
    }

    /// Category indicator dot in the top-right corner.
    pub fn indicator(&self) -> Circle {
        Circle::new(
            Point::new(self.rect.x1 - INDICATOR_INSET, self.rect.y0 + INDICATOR_INSET),
            INDICATOR_RADIUS,
        )
    }

    /// The two strokes of the deceased cross in the top-left corner.
    pub fn deceased_cross(&self) -> [Line; 2] {
        let o = self.rect.origin();
        [
            Line::new(o + (8.0, 8.0), o + (20.0, 20.0)),
            Line::new(o + (20.0, 8.0), o + (8.0, 20.0)),
        ]
    }

    /// Baseline anchor of the first name.
    pub fn name_anchor(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y0 + NAME_BASELINE)
    }

    /// Baseline anchor of the family name.
    pub fn surname_anchor(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y0 + SURNAME_BASELINE)
    }

    /// Baseline anchor of the age annotation.
    pub fn age_anchor(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y1 - AGE_BOTTOM)
    }
}

/// The first `max_chars` characters of `s`.
pub fn truncate_label(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Age annotation: `"{age}"` for living members, `"({age})"` otherwise.
///
/// Deceased members without an age fall back to their lifespan.
pub fn age_label(node: &TreeNode) -> Option<String> {
    if node.living {
        node.age.map(|age| age.to_string())
    } else {
        node.age.or(node.lifespan).map(|years| format!("({years})"))
    }
}
