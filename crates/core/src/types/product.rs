//! Catalog product records.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as published in the catalog.
///
/// Field names on the wire follow the catalog file
/// (`{id, title, image, price, desc}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "image")]
    pub image_ref: String,
    #[serde(rename = "desc", default)]
    pub description: String,
}

impl Product {
    /// Whether `needle` (already lowercased) appears in the title or description.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": 3,
            "title": "Bombones surtidos",
            "image": "./img/bombones.jpg",
            "price": 4500,
            "desc": "Caja de 12 bombones"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.unit_price, Price::from_units(4500));
        assert_eq!(product.image_ref, "./img/bombones.jpg");
        assert_eq!(product.description, "Caja de 12 bombones");
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let json = r#"{"id": 1, "title": "Trufa", "image": "t.jpg", "price": 1.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_matches_title_or_description() {
        let product = Product {
            id: ProductId::new(1),
            title: "Tableta Amarga".to_string(),
            unit_price: Price::from_units(10),
            image_ref: String::new(),
            description: "70% cacao".to_string(),
        };
        assert!(product.matches("amarga"));
        assert!(product.matches("cacao"));
        assert!(!product.matches("leche"));
    }
}
