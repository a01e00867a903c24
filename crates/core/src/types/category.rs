//! Static catalog categories.
//!
//! Books carry their category as a plain string id; this list is the set the
//! storefront offers for browsing and filtering.

use serde::Serialize;

/// A browsable catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    /// Stable id stored on each book (e.g. `"fiction"`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Emoji shown next to the name.
    pub icon: &'static str,
}

/// All categories, in display order.
pub const CATEGORIES: &[Category] = &[
    Category { id: "fiction", name: "Fiction", icon: "📚" },
    Category { id: "non-fiction", name: "Non-Fiction", icon: "📖" },
    Category { id: "science", name: "Science", icon: "🔬" },
    Category { id: "history", name: "History", icon: "🏛️" },
    Category { id: "romance", name: "Romance", icon: "💕" },
    Category { id: "mystery", name: "Mystery", icon: "🔍" },
    Category { id: "fantasy", name: "Fantasy", icon: "🐉" },
    Category { id: "biography", name: "Biography", icon: "👤" },
    Category { id: "self-help", name: "Self-Help", icon: "🌟" },
    Category { id: "children", name: "Children", icon: "🧸" },
];

impl Category {
    /// Look up a category by id.
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        CATEGORIES.iter().find(|c| c.id == id)
    }
}
