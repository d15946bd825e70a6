// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_tree::Category;
use peniko::Color;

/// Per-category colours.
#[derive(Copy, Clone, Debug)]
pub struct CategoryPalette {
    /// Male.
    pub male: Color,
    /// Female.
    pub female: Color,
    /// Other.
    pub other: Color,
    /// Unknown.
    pub unknown: Color,
}

impl CategoryPalette {
    /// Colour for `category`.
    pub fn get(&self, category: Category) -> Color {
        match category {
            Category::Male => self.male,
            Category::Female => self.female,
            Category::Other => self.other,
            Category::Unknown => self.unknown,
        }
    }
}

/// Indicator dot colours, shared by both themes and the minimap.
pub const INDICATOR_PALETTE: CategoryPalette = CategoryPalette {
    male: Color::from_rgba8(0x21, 0x96, 0xF3, 0xFF),
    female: Color::from_rgba8(0xE9, 0x1E, 0x63, 0xFF),
    other: Color::from_rgba8(0x9C, 0x27, 0xB0, 0xFF),
    unknown: Color::from_rgba8(0x9E, 0x9E, 0x9E, 0xFF),
};

/// Colours used by the canvas.
#[derive(Copy, Clone, Debug)]
pub struct Theme {
    /// Canvas and minimap background.
    pub background: Color,
    /// Card fill per category.
    pub cards: CategoryPalette,
    /// Category indicator dots.
    pub indicators: CategoryPalette,
    /// Card outlines, placeholder glyphs, and markers.
    pub outline: Color,
    /// Primary text.
    pub text: Color,
    /// Selection outline and minimap viewport.
    pub selection: Color,
    /// Parent → child connections.
    pub parent_child: Color,
    /// Spouse connections.
    pub spouse: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Light palette.
    pub fn light() -> Self {
        Self {
            background: Color::from_rgba8(0xFE, 0xF7, 0xFF, 0xFF),
            cards: CategoryPalette {
                male: Color::from_rgba8(0xE3, 0xF2, 0xFD, 0xFF),
                female: Color::from_rgba8(0xFC, 0xE4, 0xEC, 0xFF),
                other: Color::from_rgba8(0xF3, 0xE5, 0xF5, 0xFF),
                unknown: Color::from_rgba8(0xF5, 0xF5, 0xF5, 0xFF),
            },
            indicators: INDICATOR_PALETTE,
            outline: Color::from_rgba8(0x79, 0x74, 0x7E, 0xFF),
            text: Color::from_rgba8(0x1D, 0x1B, 0x20, 0xFF),
            selection: Color::from_rgba8(0x67, 0x50, 0xA4, 0xFF),
            parent_child: Color::from_rgba8(0x19, 0x76, 0xD2, 0xFF),
            spouse: Color::from_rgba8(0xE9, 0x1E, 0x63, 0xFF),
        }
    }

    /// Dark palette.
    pub fn dark() -> Self {
        Self {
            background: Color::from_rgba8(0x14, 0x12, 0x18, 0xFF),
            cards: CategoryPalette {
                male: Color::from_rgba8(0x1A, 0x3A, 0x5C, 0xFF),
                female: Color::from_rgba8(0x5C, 0x1A, 0x3A, 0xFF),
                other: Color::from_rgba8(0x3A, 0x1A, 0x5C, 0xFF),
                unknown: Color::from_rgba8(0x3A, 0x3A, 0x3A, 0xFF),
            },
            indicators: INDICATOR_PALETTE,
            outline: Color::from_rgba8(0x93, 0x8F, 0x99, 0xFF),
            text: Color::from_rgba8(0xE6, 0xE0, 0xE9, 0xFF),
            selection: Color::from_rgba8(0xD0, 0xBC, 0xFF, 0xFF),
            parent_child: Color::from_rgba8(0x64, 0xB5, 0xF6, 0xFF),
            spouse: Color::from_rgba8(0xF0, 0x62, 0x92, 0xFF),
        }
    }

    /// Secondary text: the primary text colour at 70% opacity.
    pub fn secondary_text(&self) -> Color {
        self.text.multiply_alpha(0.7)
    }

    /// Placeholder fills: the outline colour at 30% opacity.
    pub fn placeholder(&self) -> Color {
        self.outline.multiply_alpha(0.3)
    }

    /// Avatar rings and deceased markers: the outline colour at 50% opacity.
    pub fn marker(&self) -> Color {
        self.outline.multiply_alpha(0.5)
    }
}
