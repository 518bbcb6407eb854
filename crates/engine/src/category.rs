use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// The fixed set of spending categories.
///
/// Each variant owns a stable storage index (the `category` column of the
/// `expenses` table), so the declaration order must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    Other,
}

impl Category {
    /// Every category, in storage index order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    /// Index persisted in the `category` column.
    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Category::Food => 0,
            Category::Travel => 1,
            Category::Shopping => 2,
            Category::Bills => 3,
            Category::Other => 4,
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }

    /// Icon name used by renderers.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Category::Food => "restaurant",
            Category::Travel => "flight",
            Category::Shopping => "shopping_bag",
            Category::Bills => "receipt",
            Category::Other => "category",
        }
    }

    /// Accent color as `#RRGGBB`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Category::Food => "#FF9800",
            Category::Travel => "#2196F3",
            Category::Shopping => "#E91E63",
            Category::Bills => "#9C27B0",
            Category::Other => "#607D8B",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i32> for Category {
    type Error = EngineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Category::ALL
            .into_iter()
            .find(|category| category.index() == value)
            .ok_or_else(|| EngineError::InvalidRecord(format!("unknown category index: {value}")))
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::Validation(format!("unknown category: {trimmed}")))
    }
}
