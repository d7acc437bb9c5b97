//! # Product Types
//!
//! Product catalog types for tac-store.
//! The catalog is read-only: loaded once at startup from
//! `config/products.toml` (or the built-in default set) and never mutated.

use serde::{Deserialize, Serialize};

/// Product categories (fixed enumerated set)
///
/// The serde names match the display strings used by the storefront UI,
/// so category filtering is exact string equality on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Go-Bags")]
    GoBags,
    Medical,
    Comms,
    Apparel,
}

impl Category {
    /// Display string, identical to the serde rename
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GoBags => "Go-Bags",
            Category::Medical => "Medical",
            Category::Comms => "Comms",
            Category::Apparel => "Apparel",
        }
    }

    /// Parse a category from its exact display string (case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Go-Bags" => Some(Category::GoBags),
            "Medical" => Some(Category::Medical),
            "Comms" => Some(Category::Comms),
            "Apparel" => Some(Category::Apparel),
            _ => None,
        }
    }

    /// All categories, in storefront display order
    pub fn all() -> &'static [Category] {
        &[
            Category::GoBags,
            Category::Medical,
            Category::Comms,
            Category::Apparel,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "bag-alpha")
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in major currency units (USD dollars)
    pub price: f64,

    /// Category (fixed set)
    pub category: Category,

    /// Customer rating, 0.0–5.0
    pub rating: f32,

    /// Whether this product is in stock and visible
    #[serde(default = "default_true")]
    pub in_stock: bool,

    /// Short description
    pub description: String,

    /// Search tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Optional display icon (emoji or URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a product with the required fields; in stock by default
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        category: Category,
        rating: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            rating,
            in_stock: true,
            description: String::new(),
            tags: Vec::new(),
            icon: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: mark out of stock
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }
}

/// Product catalog: a fixed, ordered sequence of products.
///
/// Catalog order is meaningful — it is the "featured" sort order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Iterate products in catalog (featured) order
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The built-in storefront catalog, used when no config file is present
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product::new("bag-alpha", "Go-Bag Alpha", 349.0, Category::GoBags, 4.8)
                    .with_description("Flagship 24-hour deployment pack with hydration, trauma, multitool, paracord, and modular pouches.")
                    .with_tags(["mission-ready", "water-resistant", "modular"])
                    .with_icon("📦"),
                Product::new("bag-bravo", "Urban Response Pack Bravo", 289.0, Category::GoBags, 4.6)
                    .with_description("Compact city survival kit with trauma essentials, portable power bank, and mask/filtration module.")
                    .with_tags(["compact", "trauma", "urban"])
                    .with_icon("🛟"),
                Product::new("med-station", "MedStation Rapid Kit", 599.0, Category::Medical, 4.7)
                    .with_description("Stabilization kit for first 8–10 hours: airway management, bleed control, shock stabilization.")
                    .with_tags(["IFAK", "ALS", "stabilization"])
                    .with_icon("🛡️"),
                Product::new("ifak-lite", "IFAK Lite", 149.0, Category::Medical, 4.5)
                    .with_description("Individual First Aid Kit with tourniquet, gauze, chest seals, burn gel. Compact and ready for EDC.")
                    .with_tags(["first-aid", "compact", "EDC"])
                    .with_icon("🛡️"),
                Product::new("comms-starlink", "Field Comms Node (Starlink-Ready)", 1299.0, Category::Comms, 4.9)
                    .with_description("Rugged comms hub with VHF/UHF integration, 12/24V power distribution, weatherproof housing.")
                    .with_tags(["comms", "starlink", "rugged"])
                    .with_icon("📻"),
                Product::new("signal-pouch", "Signal Pouch Add-On", 89.0, Category::Comms, 4.3)
                    .with_description("Faraday-shielded pouch for radios with antenna passthrough. Protects from interference.")
                    .with_tags(["comms", "shielded", "addon"])
                    .with_icon("📻"),
                Product::new("apparel-tee", "IF Tactical Navy Tee", 28.0, Category::Apparel, 4.5)
                    .with_description("Premium cotton tee with subdued IF Tactical badge. Navy blue, veteran-owned stamp inside collar.")
                    .with_tags(["apparel", "cotton", "veteran"])
                    .with_icon("🏷️"),
                Product::new("morale-patch", "Morale Patch Set (3-Pack)", 18.0, Category::Apparel, 4.4)
                    .with_description("Hook-and-loop patch set: Mission Ready / Veteran Owned / IF Tactical Badge.")
                    .with_tags(["patch", "velcro", "set"])
                    .with_icon("🏷️"),
                Product::new("tactical-cap", "Tactical Cap (Navy)", 32.0, Category::Apparel, 4.6)
                    .with_description("Low-profile breathable cap with subdued embroidered badge and patch area.")
                    .with_tags(["cap", "navy", "gear"])
                    .with_icon("🏷️"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::all() {
            assert_eq!(Category::parse(cat.as_str()), Some(*cat));
        }
        assert_eq!(Category::parse("go-bags"), None); // case-sensitive
        assert_eq!(Category::parse("All"), None);
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 9);

        let bag = catalog.get("bag-alpha").unwrap();
        assert_eq!(bag.name, "Go-Bag Alpha");
        assert_eq!(bag.category, Category::GoBags);
        assert!(bag.in_stock);

        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_str = r#"
            [[products]]
            id = "test-kit"
            name = "Test Kit"
            price = 10.0
            category = "Medical"
            rating = 4.0
            description = "A test kit"
            tags = ["test"]
        "#;

        let catalog = Catalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.len(), 1);

        let p = catalog.get("test-kit").unwrap();
        assert_eq!(p.category, Category::Medical);
        assert!(p.in_stock); // defaults to true
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new("x", "X", 10.0, Category::Comms, 4.0)
            .with_description("desc")
            .with_tags(["a", "b"])
            .out_of_stock();

        assert_eq!(product.tags, vec!["a", "b"]);
        assert!(!product.in_stock);
    }
}
