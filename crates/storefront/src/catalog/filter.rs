//! Catalog search, filter and sort pipeline.
//!
//! [`apply`] is a pure function over a catalog slice. Steps run in a fixed
//! order:
//!
//! 1. text search on title, author and ISBN
//! 2. category membership
//! 3. inclusive price range
//! 4. bestseller / new arrival tag
//! 5. sort
//!
//! All sorts are stable, so books that compare equal keep their catalog order.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use feruca::Collator;
use thiserror::Error;

use bookhub_core::{Book, Price};

/// Error returned when a sort key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order: {0}")]
pub struct SortOrderParseError(pub String);

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Catalog order, untouched.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Most recent publication year first.
    Newest,
    /// Alphabetical by locale-aware collation.
    Title,
}

impl SortOrder {
    /// Every sort order, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::RatingDesc,
        Self::Newest,
        Self::Title,
    ];

    /// Canonical key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::Newest => "newest",
            Self::Title => "title",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::RatingDesc => "Highest Rated",
            Self::Newest => "Newest",
            Self::Title => "Title: A-Z",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "relevance" | "featured" => Ok(Self::Relevance),
            "price-asc" | "price-low" => Ok(Self::PriceAsc),
            "price-desc" | "price-high" => Ok(Self::PriceDesc),
            "rating-desc" | "rating" => Ok(Self::RatingDesc),
            "newest" => Ok(Self::Newest),
            "title" => Ok(Self::Title),
            _ => Err(SortOrderParseError(s.to_owned())),
        }
    }
}

/// Merchandising tag a listing can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFilter {
    Bestseller,
    NewArrival,
}

impl TagFilter {
    fn matches(self, book: &Book) -> bool {
        match self {
            Self::Bestseller => book.is_bestseller,
            Self::NewArrival => book.is_new_arrival,
        }
    }
}

impl FromStr for TagFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bestseller" | "bestsellers" => Ok(Self::Bestseller),
            "new" | "new-arrival" | "new-arrivals" => Ok(Self::NewArrival),
            other => Err(format!("unknown tag filter: {other}")),
        }
    }
}

/// Criteria for [`apply`]. The default query passes the catalog through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Free text. Surrounding whitespace is ignored; blank means no search.
    pub search: String,
    /// Category ids to keep. Empty keeps every category.
    pub categories: BTreeSet<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub tag: Option<TagFilter>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    #[must_use]
    pub const fn with_price_range(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub const fn with_tag(mut self, tag: TagFilter) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub const fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Add `category` if absent, remove it otherwise.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_owned());
        }
    }

    /// Number of active filters: one per selected category, one for a price
    /// bound, one for a tag. Search and sort are not counted.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        let price = usize::from(self.min_price.is_some() || self.max_price.is_some());
        self.categories.len() + price + usize::from(self.tag.is_some())
    }

    /// Drop every filter, keeping search text and sort.
    pub fn clear_filters(&mut self) {
        self.categories.clear();
        self.min_price = None;
        self.max_price = None;
        self.tag = None;
    }

    fn matches(&self, book: &Book, needle: Option<&(String, String)>) -> bool {
        if let Some((lowered, raw)) = needle {
            let hit = book.title.to_lowercase().contains(lowered.as_str())
                || book.author.to_lowercase().contains(lowered.as_str())
                || book.isbn.contains(raw.as_str());
            if !hit {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&book.category) {
            return false;
        }

        if self.min_price.is_some_and(|min| book.price < min)
            || self.max_price.is_some_and(|max| book.price > max)
        {
            return false;
        }

        self.tag.is_none_or(|tag| tag.matches(book))
    }
}

/// Run the pipeline over `catalog`. The input is never modified.
#[must_use]
pub fn apply(catalog: &[Book], query: &CatalogQuery) -> Vec<Book> {
    let trimmed = query.search.trim();
    let needle = (!trimmed.is_empty()).then(|| (trimmed.to_lowercase(), trimmed.to_owned()));

    let mut result: Vec<Book> = catalog
        .iter()
        .filter(|book| query.matches(book, needle.as_ref()))
        .cloned()
        .collect();

    sort(&mut result, query.sort);
    result
}

/// Stable in-place sort.
pub fn sort(books: &mut [Book], order: SortOrder) {
    match order {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => books.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => books.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::RatingDesc => books.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortOrder::Newest => books.sort_by(|a, b| b.publication_year.cmp(&a.publication_year)),
        SortOrder::Title => {
            let mut collator = Collator::default();
            books.sort_by(|a, b| compare_titles(&mut collator, a, b));
        }
    }
}

/// Unicode collation (root locale), so `Émile` sorts beside `Eve` rather than
/// after `Z`. Titles that collate equal fall back to code point order.
fn compare_titles(collator: &mut Collator, a: &Book, b: &Book) -> Ordering {
    collator
        .collate(a.title.as_str(), b.title.as_str())
        .then_with(|| a.title.cmp(&b.title))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::book;

    fn scenario() -> Vec<Book> {
        let mut a = book("a", 10);
        a.category = "fiction".to_owned();
        a.rating = 4.0;
        let mut b = book("b", 5);
        b.category = "scifi".to_owned();
        b.rating = 4.8;
        let mut c = book("c", 20);
        c.category = "fiction".to_owned();
        c.rating = 3.5;
        vec![a, b, c]
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_is_identity() {
        let catalog = scenario();
        assert_eq!(apply(&catalog, &CatalogQuery::default()), catalog);
    }

    #[test]
    fn test_category_and_price_asc() {
        let catalog = scenario();
        let query = CatalogQuery::new()
            .with_category("fiction")
            .sorted_by(SortOrder::PriceAsc);
        assert_eq!(ids(&apply(&catalog, &query)), vec!["a", "c"]);
    }

    #[test]
    fn test_rating_desc() {
        let catalog = scenario();
        let query = CatalogQuery::new().sorted_by(SortOrder::RatingDesc);
        assert_eq!(ids(&apply(&catalog, &query)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_price_asc_is_non_decreasing_and_idempotent() {
        let catalog = scenario();
        let query = CatalogQuery::new().sorted_by(SortOrder::PriceAsc);
        let once = apply(&catalog, &query);
        assert!(once.windows(2).all(|w| w[0].price <= w[1].price));
        assert_eq!(apply(&once, &query), once);
    }

    #[test]
    fn test_category_filter_matches_manual_scan() {
        let catalog = scenario();
        let query = CatalogQuery::new().with_category("fiction");
        let expected = catalog.iter().filter(|b| b.category == "fiction").count();
        assert_eq!(apply(&catalog, &query).len(), expected);
    }

    #[test]
    fn test_search_title_author_case_insensitive() {
        let mut catalog = scenario();
        catalog[0].title = "The Midnight Library".to_owned();
        catalog[1].author = "Matt HAIG".to_owned();

        let query = CatalogQuery::new().with_search("  midnight ");
        assert_eq!(ids(&apply(&catalog, &query)), vec!["a"]);

        let query = CatalogQuery::new().with_search("haig");
        assert_eq!(ids(&apply(&catalog, &query)), vec!["b"]);
    }

    #[test]
    fn test_search_isbn() {
        let mut catalog = scenario();
        catalog[2].isbn = "978-0525559474".to_owned();
        let query = CatalogQuery::new().with_search("0525559");
        assert_eq!(ids(&apply(&catalog, &query)), vec!["c"]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let catalog = scenario();
        let query = CatalogQuery::new().with_search("   ");
        assert_eq!(apply(&catalog, &query).len(), 3);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = scenario();
        let query = CatalogQuery::new()
            .with_price_range(Some(Price::from_rupees(5)), Some(Price::from_rupees(10)));
        assert_eq!(ids(&apply(&catalog, &query)), vec!["a", "b"]);

        let query = CatalogQuery::new().with_price_range(Some(Price::from_rupees(11)), None);
        assert_eq!(ids(&apply(&catalog, &query)), vec!["c"]);
    }

    #[test]
    fn test_tag_filters() {
        let mut catalog = scenario();
        catalog[1].is_bestseller = true;
        catalog[2].is_new_arrival = true;

        let query = CatalogQuery::new().with_tag(TagFilter::Bestseller);
        assert_eq!(ids(&apply(&catalog, &query)), vec!["b"]);

        let query = CatalogQuery::new().with_tag(TagFilter::NewArrival);
        assert_eq!(ids(&apply(&catalog, &query)), vec!["c"]);
    }

    #[test]
    fn test_newest_and_title_sorts() {
        let mut catalog = scenario();
        catalog[0].publication_year = 2001;
        catalog[1].publication_year = 2020;
        catalog[2].publication_year = 1999;
        catalog[0].title = "banana".to_owned();
        catalog[1].title = "Apple".to_owned();
        catalog[2].title = "apple".to_owned();

        let newest = apply(&catalog, &CatalogQuery::new().sorted_by(SortOrder::Newest));
        assert_eq!(ids(&newest), vec!["b", "a", "c"]);

        // Lowercase collates before uppercase at the tertiary level.
        let titled = apply(&catalog, &CatalogQuery::new().sorted_by(SortOrder::Title));
        assert_eq!(ids(&titled), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_title_sort_places_accented_titles_by_base_letter() {
        let catalog: Vec<Book> = ["Zebra", "Émile", "Eve", "Ångström"]
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let mut b = book(&i.to_string(), 10);
                b.title = title.to_owned();
                b
            })
            .collect();

        let sorted = apply(&catalog, &CatalogQuery::new().sorted_by(SortOrder::Title));
        let titles: Vec<&str> = sorted.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Ångström", "Émile", "Eve", "Zebra"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut catalog = scenario();
        for b in &mut catalog {
            b.price = Price::from_rupees(7);
        }
        let sorted = apply(&catalog, &CatalogQuery::new().sorted_by(SortOrder::PriceDesc));
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let catalog = scenario();
        let before = catalog.clone();
        let _ = apply(&catalog, &CatalogQuery::new().sorted_by(SortOrder::PriceDesc));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_sort_order_parses_both_vocabularies() {
        assert_eq!("price-low".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!("featured".parse::<SortOrder>().unwrap(), SortOrder::Relevance);
        assert_eq!("rating".parse::<SortOrder>().unwrap(), SortOrder::RatingDesc);
        assert!("cheapest".parse::<SortOrder>().is_err());
        for order in SortOrder::ALL {
            assert_eq!(order.as_str().parse::<SortOrder>().unwrap(), order);
        }
    }

    #[test]
    fn test_active_filter_count() {
        let mut query = CatalogQuery::new().with_search("dune").sorted_by(SortOrder::Title);
        assert_eq!(query.active_filter_count(), 0);

        query.toggle_category("fiction");
        query.toggle_category("science");
        query.max_price = Some(Price::from_rupees(30));
        query.tag = Some(TagFilter::NewArrival);
        assert_eq!(query.active_filter_count(), 4);

        query.toggle_category("fiction");
        assert_eq!(query.active_filter_count(), 3);

        query.clear_filters();
        assert_eq!(query.active_filter_count(), 0);
        assert_eq!(query.search, "dune");
    }
}
