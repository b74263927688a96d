//! Deep-Link Module
//!
//! Maps `miniecom://` URLs to typed in-app actions and back.

use std::fmt;

use serde::Serialize;

/// Scheme prefix every deep link starts with
pub const SCHEME: &str = "miniecom://";

/// Quantity added by an add-to-cart link; links cannot carry their own
pub const DEFAULT_QUANTITY: u32 = 1;

// == Deep Link Action ==
/// Action requested by a deep link.
///
/// Serializes as `{"type": "<kind>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum DeepLinkAction {
    /// Add a product to the cart
    #[serde(rename_all = "camelCase")]
    AddToCart { product_id: u64, quantity: u32 },
    /// Open a product detail page
    #[serde(rename_all = "camelCase")]
    ViewProduct { product_id: u64 },
    /// Open the cart
    OpenCart {},
    /// Go to checkout
    Checkout {},
}

impl DeepLinkAction {
    // == Parse ==
    /// Parses a deep-link URL.
    ///
    /// Returns `None` for anything that is not a well-formed link: a missing
    /// scheme, no path, an unknown action, or a missing or non-positive
    /// product id where one is required. Segments after the ones an action
    /// needs are ignored.
    ///
    /// The `miniecom://` scheme is mandatory: bare paths such as `cart` or
    /// `add-to-cart/42` are rejected rather than read as scheme-less links.
    pub fn parse(url: &str) -> Option<Self> {
        let path = url.strip_prefix(SCHEME)?;
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());

        match segments.next()? {
            "add-to-cart" => Some(Self::AddToCart {
                product_id: parse_product_id(segments.next()?)?,
                quantity: DEFAULT_QUANTITY,
            }),
            "view-product" => Some(Self::ViewProduct {
                product_id: parse_product_id(segments.next()?)?,
            }),
            "cart" => Some(Self::OpenCart {}),
            "checkout" => Some(Self::Checkout {}),
            _ => None,
        }
    }

    /// Returns the action kind as used in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddToCart { .. } => "add-to-cart",
            Self::ViewProduct { .. } => "view-product",
            Self::OpenCart {} => "open-cart",
            Self::Checkout {} => "checkout",
        }
    }

    // == Generate ==
    /// Builds the canonical URL for this action.
    pub fn to_url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeepLinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddToCart { product_id, .. } => write!(f, "{SCHEME}add-to-cart/{product_id}"),
            Self::ViewProduct { product_id } => write!(f, "{SCHEME}view-product/{product_id}"),
            Self::OpenCart {} => write!(f, "{SCHEME}cart"),
            Self::Checkout {} => write!(f, "{SCHEME}checkout"),
        }
    }
}

/// Parses a path segment as a positive base-10 product id.
fn parse_product_id(segment: &str) -> Option<u64> {
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<u64>().ok().filter(|id| *id > 0)
}

/// Returns true if `product_id` is a positive integer.
pub fn is_valid_product_id(product_id: i64) -> bool {
    product_id > 0
}
