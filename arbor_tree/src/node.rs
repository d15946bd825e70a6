// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

/// Stable identifier of a tree member.
///
/// Ids come from the external store and are what the engine hands back to
/// the UI layer when a node is tapped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EntityId(pub u64);

/// Display category of a member.
///
/// Drives card colours and the category indicator dot.
///
/// Deserializes through [`Category::from_name`], so names are matched
/// case-insensitively and unrecognized ones become [`Category::Unknown`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String")
)]
pub enum Category {
    /// Male member.
    Male,
    /// Female member.
    Female,
    /// Member with another recorded gender.
    Other,
    /// Nothing recorded.
    #[default]
    Unknown,
}

impl Category {
    /// All categories in drawing order.
    pub const ALL: [Self; 4] = [Self::Male, Self::Female, Self::Other, Self::Unknown];

    /// Parses a category name case-insensitively, falling back to [`Category::Unknown`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::Unknown)
    }

    /// Upper-case name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// One laid-out member of the family tree.
///
/// Relations are stored by id. They may reference members that are not part
/// of the current node set (for example after a partial reload); consumers
/// must tolerate such stale references.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// Member id.
    pub id: EntityId,
    /// Tree-space x of the node centre.
    pub x: f64,
    /// Tree-space y of the node centre.
    pub y: f64,
    /// Children of this member.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<EntityId>,
    /// Spouses of this member.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spouses: Vec<EntityId>,
    /// Display category.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Category,
    /// Given name.
    pub first_name: String,
    /// Family name, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_name: Option<String>,
    /// Whether the member is alive.
    #[cfg_attr(feature = "serde", serde(default = "living_default"))]
    pub living: bool,
    /// Source identifier (usually a file path) of the member's photo.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_source: Option<String>,
    /// Derived age in whole years.
    #[cfg_attr(feature = "serde", serde(default))]
    pub age: Option<u32>,
    /// Derived lifespan in whole years, for deceased members.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifespan: Option<u32>,
}

#[cfg(feature = "serde")]
fn living_default() -> bool {
    true
}

impl TreeNode {
    /// Creates a living member with no relations at `(x, y)`.
    #[must_use]
    pub fn new(id: EntityId, x: f64, y: f64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            x,
            y,
            children: Vec::new(),
            spouses: Vec::new(),
            category: Category::Unknown,
            first_name: first_name.into(),
            last_name: None,
            living: true,
            image_source: None,
            age: None,
            lifespan: None,
        }
    }

    /// Sets the children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = EntityId>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Sets the spouses.
    #[must_use]
    pub fn with_spouses(mut self, spouses: impl IntoIterator<Item = EntityId>) -> Self {
        self.spouses = spouses.into_iter().collect();
        self
    }

    /// Sets the display category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the family name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the photo source.
    #[must_use]
    pub fn with_image_source(mut self, source: impl Into<String>) -> Self {
        self.image_source = Some(source.into());
        self
    }

    /// Sets the derived age.
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Marks the member as deceased, optionally with a lifespan.
    #[must_use]
    pub fn deceased(mut self, lifespan: Option<u32>) -> Self {
        self.living = false;
        self.lifespan = lifespan;
        self
    }

    /// Tree-space centre of the node.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Given name followed by the family name, if any.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = self.first_name.clone();
        if let Some(last) = &self.last_name {
            name.push(' ');
            name.push_str(last);
        }
        name
    }

    /// Upper-cased first character of the given name, used by avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.first_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(Category::from_name("female"), Category::Female);
        assert_eq!(Category::from_name(" Male "), Category::Male);
        assert_eq!(Category::from_name("robot"), Category::Unknown);
        assert_eq!(Category::from(String::from("OTHER")), Category::Other);
    }

    #[test]
    fn display_name_and_initial() {
        let node = TreeNode::new(EntityId(7), 0.0, 0.0, "élodie").with_last_name("Durand");
        assert_eq!(node.display_name(), "élodie Durand");
        assert_eq!(node.initial(), Some('É'));

        let empty = TreeNode::new(EntityId(8), 0.0, 0.0, "");
        assert_eq!(empty.initial(), None);
    }

    #[test]
    fn deceased_clears_living_flag() {
        let node = TreeNode::new(EntityId(1), 0.0, 0.0, "Ada").deceased(Some(36));
        assert!(!node.living);
        assert_eq!(node.lifespan, Some(36));
    }
}
