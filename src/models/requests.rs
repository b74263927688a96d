//! Request DTOs for the gateway API
//!
//! Defines the query strings accepted by the HTTP endpoints.

use serde::Deserialize;

/// Largest page size accepted by `GET /products`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query for `GET /products`
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Page size
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of products to skip
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    10
}

impl ListQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Some(format!("limit must be between 1 and {}", MAX_PAGE_SIZE));
        }
        None
    }
}

/// Query for `GET /products/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Search text
    pub q: String,
}

impl SearchQuery {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.q.trim().is_empty() {
            return Some("Search query cannot be empty".to_string());
        }
        None
    }
}

/// Query for `GET /deeplink`
#[derive(Debug, Clone, Deserialize)]
pub struct DeepLinkQuery {
    /// The deep-link URL to parse
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip, 0);
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_list_query_rejects_bad_limit() {
        let zero = ListQuery { limit: 0, skip: 0 };
        let huge = ListQuery {
            limit: MAX_PAGE_SIZE + 1,
            skip: 0,
        };
        assert!(zero.validate().is_some());
        assert!(huge.validate().is_some());
    }

    #[test]
    fn test_search_query_rejects_blank() {
        let query = SearchQuery {
            q: "   ".to_string(),
        };
        assert!(query.validate().is_some());
    }
}
