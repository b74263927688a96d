//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP bodies and upstream catalog payloads.

pub mod auth;
pub mod category;
pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use auth::{LoginRequest, LoginResponse};
pub use category::{Category, CategoryListing};
pub use product::{Product, ProductPage};
pub use requests::{DeepLinkQuery, ListQuery, SearchQuery};
pub use responses::{
    ClearCacheResponse, DeepLinkResponse, ErrorResponse, HealthResponse, LogoutResponse,
    StatsResponse,
};
