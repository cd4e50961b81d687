//! Mapping of raw detector class ids onto the coarse COCO supercategories.

use serde_derive::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unknown,
    Human,
    Vehicle,
    Outdoor,
    Animal,
    Accessory,
    Sports,
    Kitchen,
    Food,
    Furniture,
    Electronic,
    Appliance,
    Indoor,
}

/// Inclusive raw id ranges, one per category. Ranges never overlap.
const RANGES: [(Category, i32, i32); 12] = [
    (Category::Human, 1, 1),
    (Category::Vehicle, 2, 9),
    (Category::Outdoor, 10, 15),
    (Category::Animal, 16, 25),
    (Category::Accessory, 26, 33),
    (Category::Sports, 34, 43),
    (Category::Kitchen, 44, 51),
    (Category::Food, 52, 61),
    (Category::Furniture, 62, 71),
    (Category::Electronic, 72, 77),
    (Category::Appliance, 78, 83),
    (Category::Indoor, 84, 91),
];

const TRACKED: [Category; 2] = [Category::Human, Category::Animal];

/// Resolves a raw class id to its category, `Unknown` when no range owns it.
pub fn classify(raw_id: i32) -> Category {
    RANGES
        .iter()
        .find(|(_, start, end)| (*start..=*end).contains(&raw_id))
        .map(|(category, _, _)| *category)
        .unwrap_or(Category::Unknown)
}

impl Category {
    #[inline]
    pub fn is_tracked(self) -> bool {
        TRACKED.contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Unknown => "Unknown",
            Category::Human => "Human",
            Category::Vehicle => "Vehicle",
            Category::Outdoor => "Outdoor",
            Category::Animal => "Animal",
            Category::Accessory => "Accessory",
            Category::Sports => "Sports",
            Category::Kitchen => "Kitchen",
            Category::Food => "Food",
            Category::Furniture => "Furniture",
            Category::Electronic => "Electronic",
            Category::Appliance => "Appliance",
            Category::Indoor => "Indoor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ();

    /// Case-insensitive, only tracked labels parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TRACKED
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
