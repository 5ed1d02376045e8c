//! Product Catalog
//!
//! The storefront sells a fixed collection. Products are identified by a slug
//! derived from their name, which is also the cart item id.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Filter value that matches every category
pub const ALL_CATEGORIES: &str = "all";

/// A product on sale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Slug of the name, unique within the catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in rand
    pub price: Decimal,

    /// Image URL
    pub image: String,

    /// Category used by the collection filter
    pub category: String,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            price,
            image: image.into(),
            category: category.into(),
        }
    }

    /// Searchable text: name and category, lowercased
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.category).to_lowercase()
    }
}

/// Derive an id from a product name
///
/// Lowercases the name and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_gap = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }

    slug
}

/// Active collection filter: a category and a free-text query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogFilter {
    category: String,
    query: String,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.into(),
            query: String::new(),
        }
    }
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a category (`"all"` clears it)
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.trim().to_lowercase();
        if self.category.is_empty() {
            self.category = ALL_CATEGORIES.into();
        }
        self
    }

    /// Set the search query
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_lowercase();
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn matches(&self, product: &Product) -> bool {
        let matches_category =
            self.category == ALL_CATEGORIES || product.category.to_lowercase() == self.category;
        let matches_search = self.query.is_empty() || product.search_text().contains(&self.query);
        matches_category && matches_search
    }

    /// Products visible under this filter, in catalog order
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// The storefront collection
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("Raven Classic Hoodie", dec!(650), "/images/classic-hoodie.jpg", "hoodies"),
        Product::new("Midnight Zip Hoodie", dec!(720), "/images/midnight-zip-hoodie.jpg", "hoodies"),
        Product::new("Feather Logo Tee", dec!(320), "/images/feather-logo-tee.jpg", "tees"),
        Product::new("Nightfall Oversized Tee", dec!(360), "/images/nightfall-tee.jpg", "tees"),
        Product::new("Wing Cargo Pants", dec!(580), "/images/wing-cargo-pants.jpg", "bottoms"),
        Product::new("Raven Joggers", dec!(490), "/images/raven-joggers.jpg", "bottoms"),
        Product::new("Crest Bucket Hat", dec!(250), "/images/crest-bucket-hat.jpg", "accessories"),
        Product::new("Talon Tote Bag", dec!(210), "/images/talon-tote.jpg", "accessories"),
    ]
}

/// Distinct categories in catalog order, for the filter buttons
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
