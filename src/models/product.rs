//! Product models of the upstream catalog API

use serde::{Deserialize, Serialize};

/// A product record as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    /// Some catalog entries (groceries, for instance) carry no brand
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One page of products from a list or search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialize_camel_case() {
        let json = r#"{
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "description": "Popular mascara",
            "price": 9.99,
            "discountPercentage": 7.17,
            "rating": 4.94,
            "stock": 5,
            "brand": "Essence",
            "category": "beauty",
            "thumbnail": "https://cdn.dummyjson.com/thumb.png",
            "images": ["https://cdn.dummyjson.com/1.png"],
            "tags": ["beauty", "mascara"]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.discount_percentage, 7.17);
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_product_without_brand() {
        let json = r#"{"id": 16, "title": "Apple", "price": 1.99, "category": "groceries"}"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.brand.is_none());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_page_deserialize() {
        let json = r#"{"products": [], "total": 194, "skip": 10, "limit": 10}"#;

        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 194);
        assert_eq!(page.skip, 10);
    }
}
