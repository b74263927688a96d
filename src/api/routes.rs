//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_info_handler, cache_stats_handler, categories_handler, clear_cache_handler,
    current_user_handler, deeplink_handler, get_product_handler, health_handler,
    list_products_handler, login_handler, logout_handler, refresh_categories_handler,
    refresh_product_handler, search_products_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /products` - List products (`limit`, `skip`)
/// - `GET /products/search` - Search products (`q`)
/// - `GET /products/:id` - Product detail, cache-first
/// - `POST /products/:id/refresh` - Product detail, bypassing the cache
/// - `GET /categories` - Category list, cache-first
/// - `POST /categories/refresh` - Category list, bypassing the cache
/// - `POST /auth/login` - Log in and keep the access token
/// - `POST /auth/logout` - Forget the access token
/// - `GET /auth/me` - Logged-in user, requires a valid session
/// - `GET /deeplink` - Parse a deep link (`url`)
/// - `GET /cache/stats` - Cache statistics
/// - `GET /cache/:key/info` - Expiry info for one cache key
/// - `DELETE /cache` - Clear every cached entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", get(list_products_handler))
        .route("/products/search", get(search_products_handler))
        .route("/products/:id", get(get_product_handler))
        .route("/products/:id/refresh", post(refresh_product_handler))
        .route("/categories", get(categories_handler))
        .route("/categories/refresh", post(refresh_categories_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(current_user_handler))
        .route("/deeplink", get(deeplink_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/:key/info", get(cache_info_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
