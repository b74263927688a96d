//! Category models of the upstream catalog API

use serde::{Deserialize, Serialize};

/// Placeholder image service used for category tiles
const CATEGORY_IMAGE_BASE: &str = "https://picsum.photos/100/100?random=";

/// A product category with a stable display position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// 1-based position in the upstream listing
    pub id: u32,
    pub name: String,
    pub image: String,
}

/// One entry of `GET /products/categories`.
///
/// Older API versions return bare names, newer ones objects with a `name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryListing {
    Name(String),
    Entry { name: String },
}

impl CategoryListing {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Entry { name } => name,
        }
    }
}

impl Category {
    /// Numbers upstream listings from 1, in order.
    pub fn from_listings(listings: Vec<CategoryListing>) -> Vec<Self> {
        listings
            .into_iter()
            .zip(1u32..)
            .map(|(listing, id)| Self {
                id,
                name: listing.into_name(),
                image: format!("{}{}", CATEGORY_IMAGE_BASE, id),
            })
            .collect()
    }
}
