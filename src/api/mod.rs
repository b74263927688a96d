//! API Module
//!
//! HTTP handlers and routing for the storefront gateway REST API.
//!
//! # Endpoints
//! - `GET /products`, `GET /products/search`, `GET /products/:id`
//! - `POST /products/:id/refresh`
//! - `GET /categories`, `POST /categories/refresh`
//! - `POST /auth/login`, `POST /auth/logout`, `GET /auth/me`
//! - `GET /deeplink`
//! - `GET /cache/stats`, `GET /cache/:key/info`, `DELETE /cache`
//! - `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
