//! The fixed table of thing types.
//!
//! Each entry names a kind, its category and the canonical string used in
//! map configs. Classification reads the category stored on the entry rather
//! than inferring it from the entry's position.

use serde::Serialize;

use crate::components::Color;

/// Broad behaviour class of a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Patrols, bounces off walls and can be shot.
    Monster,
    /// Collected on contact with the player.
    Item,
    /// Static interactive objects.
    Object,
}

/// Type tag of a thing, derived once from its configured name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ThingKind {
    /// Empty or unknown name.
    #[default]
    Invalid,
    /// Fast patrolling monster.
    Mouse,
    /// Slow monster drawn on tilted geometry.
    Snail,
    /// Glowing green pickup.
    Battery,
    /// Glowing red pickup.
    Heart,
    /// Glowing white pickup with its own sound.
    Star,
    /// Pickup without a light.
    Key,
    /// Launches the player upwards.
    Spring,
    /// Static object.
    Door,
}

/// One row of [`TYPE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindEntry {
    /// Kind the row describes.
    pub kind: ThingKind,
    /// Behaviour class of the kind.
    pub category: Category,
    /// Name used in map configs.
    pub name: &'static str,
}

const fn entry(kind: ThingKind, category: Category, name: &'static str) -> KindEntry {
    KindEntry {
        kind,
        category,
        name,
    }
}

/// Every valid kind, in tag order (tag = position + 1).
pub const TYPE_TABLE: [KindEntry; 8] = [
    entry(ThingKind::Mouse, Category::Monster, "mouse"),
    entry(ThingKind::Snail, Category::Monster, "snail"),
    entry(ThingKind::Battery, Category::Item, "battery"),
    entry(ThingKind::Heart, Category::Item, "heart"),
    entry(ThingKind::Star, Category::Item, "star"),
    entry(ThingKind::Key, Category::Item, "key"),
    entry(ThingKind::Spring, Category::Object, "spring"),
    entry(ThingKind::Door, Category::Object, "door"),
];

/// Looks `name` up in [`TYPE_TABLE`].
///
/// Matching is exact; empty and unknown names yield [`ThingKind::Invalid`].
///
/// # Examples
///
/// ```
/// use thingkit::kind::{resolve_type, ThingKind};
/// assert_eq!(resolve_type("snail"), ThingKind::Snail);
/// assert_eq!(resolve_type("Snail"), ThingKind::Invalid);
/// ```
#[must_use]
pub fn resolve_type(name: &str) -> ThingKind {
    if name.is_empty() {
        return ThingKind::Invalid;
    }
    TYPE_TABLE
        .iter()
        .find(|e| e.name == name)
        .map_or(ThingKind::Invalid, |e| e.kind)
}

impl ThingKind {
    fn entry(self) -> Option<&'static KindEntry> {
        TYPE_TABLE.iter().find(|e| e.kind == self)
    }

    /// Small integer tag; `0` is reserved for [`ThingKind::Invalid`].
    #[must_use]
    pub fn tag(self) -> u32 {
        TYPE_TABLE
            .iter()
            .position(|e| e.kind == self)
            .and_then(|i| u32::try_from(i + 1).ok())
            .unwrap_or(0)
    }

    /// Canonical config name, or `""` for [`ThingKind::Invalid`].
    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().map_or("", |e| e.name)
    }

    /// Category from the kind's table row; `None` for
    /// [`ThingKind::Invalid`].
    #[must_use]
    pub fn category(self) -> Option<Category> {
        self.entry().map(|e| e.category)
    }

    /// Monsters patrol, take damage and snapshot every frame.
    #[must_use]
    pub fn is_monster(self) -> bool {
        self.category() == Some(Category::Monster)
    }

    /// Items that disappear on contact and come back on reset.
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::Star | Self::Heart | Self::Battery)
    }

    /// Colour of the point light carried by glowing pickups.
    #[must_use]
    pub const fn light_color(self) -> Option<Color> {
        match self {
            Self::Star => Some(Color::WHITE),
            Self::Battery => Some(Color::GREEN),
            Self::Heart => Some(Color::RED),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    static_assertions::const_assert_eq!(TYPE_TABLE.len(), 8);

    #[rstest]
    fn tags_follow_table_order() {
        for (i, e) in TYPE_TABLE.iter().enumerate() {
            assert_eq!(e.kind.tag() as usize, i + 1);
            assert_eq!(resolve_type(e.name), e.kind);
        }
        assert_eq!(ThingKind::Invalid.tag(), 0);
        assert_eq!(ThingKind::Invalid.name(), "");
    }

    #[rstest]
    #[case(ThingKind::Star, Some(Color::WHITE))]
    #[case(ThingKind::Battery, Some(Color::GREEN))]
    #[case(ThingKind::Heart, Some(Color::RED))]
    #[case(ThingKind::Key, None)]
    #[case(ThingKind::Mouse, None)]
    fn only_glowing_pickups_carry_lights(#[case] kind: ThingKind, #[case] color: Option<Color>) {
        assert_eq!(kind.light_color(), color);
    }
}
