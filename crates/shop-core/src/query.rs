//! # Catalog Query Engine
//!
//! Filters, searches, and sorts the product catalog.
//!
//! Filtering order is a contract: stock, then category, then text, then
//! sort. Sorts are stable, so ties keep their filtered (catalog) order.

use crate::product::{Catalog, Category, Product};
use serde::{Deserialize, Serialize};

/// Sort keys for catalog results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog's declared order (no reordering)
    #[default]
    Featured,
    /// Price, low to high
    PriceAsc,
    /// Price, high to low
    PriceDesc,
    /// Rating, high to low
    Rating,
}

impl SortKey {
    /// Parse a sort key from its wire string ("featured", "price-asc", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "featured" => Some(SortKey::Featured),
            "price-asc" => Some(SortKey::PriceAsc),
            "price-desc" => Some(SortKey::PriceDesc),
            "rating" => Some(SortKey::Rating),
            _ => None,
        }
    }
}

/// Category filter: everything, or one exact category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse from the wire string: "All" or an exact category name
    pub fn parse(s: &str) -> Option<Self> {
        if s == "All" {
            return Some(CategoryFilter::All);
        }
        Category::parse(s).map(CategoryFilter::Only)
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(cat) => product.category == *cat,
        }
    }
}

/// A catalog query: free-text search, category filter, and sort key
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Free-text query; trimmed, matched case-insensitively
    pub text: String,
    /// Category filter
    pub category: CategoryFilter,
    /// Sort key
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Query with no filters: all in-stock products in featured order
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder: set the text query
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set the category filter
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    /// Builder: set the sort key
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Run the query against a catalog.
    ///
    /// Out-of-stock products are never visible, regardless of other
    /// filters. The text query matches as a lowercase substring against
    /// name, description, or space-joined tags (OR across the three).
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let needle = self.text.trim().to_lowercase();

        let mut out: Vec<&Product> = catalog
            .iter()
            .filter(|p| p.in_stock)
            .filter(|p| self.category.matches(p))
            .filter(|p| needle.is_empty() || matches_text(p, &needle))
            .collect();

        match self.sort {
            SortKey::Featured => {}
            SortKey::PriceAsc => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortKey::PriceDesc => out.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortKey::Rating => out.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        out
    }
}

/// Case-insensitive substring match against name, description, or tags.
/// `needle` must already be trimmed and lowercased.
fn matches_text(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.tags.join(" ").to_lowercase().contains(needle)
}
