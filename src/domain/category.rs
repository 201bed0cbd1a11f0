//! The fixed spending category taxonomy.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::MonitorError;

/// Spending categories supplied by the surrounding application.
///
/// Declaration order is the stable ordering used for reports and tie-breaks,
/// so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Groceries,
    Travel,
    Transportation,
    Shopping,
    Entertainment,
    Healthcare,
    Utilities,
    Education,
    Rent,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::Groceries,
        Category::Travel,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::Healthcare,
        Category::Utilities,
        Category::Education,
        Category::Rent,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Groceries => "Groceries",
            Category::Travel => "Travel",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Utilities => "Utilities",
            Category::Education => "Education",
            Category::Rent => "Rent",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MonitorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MonitorError::UnknownCategory(raw.to_string()))
    }
}
