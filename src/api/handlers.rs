//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, warn};

use crate::auth::AuthClient;
use crate::cache::CacheInfo;
use crate::catalog::Catalog;
use crate::deeplink::{is_valid_product_id, DeepLinkAction};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Category, ClearCacheResponse, DeepLinkQuery, DeepLinkResponse, HealthResponse, ListQuery,
    LoginRequest, LoginResponse, LogoutResponse, Product, ProductPage, SearchQuery,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// Both clients are cheap to clone; clones share the store, the transport
/// and the cache statistics.
#[derive(Clone)]
pub struct AppState {
    /// Product API client with its cache
    pub catalog: Catalog,
    /// Login and session handling
    pub auth: AuthClient,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(catalog: Catalog, auth: AuthClient) -> Self {
        Self { catalog, auth }
    }
}

fn check_product_id(product_id: u64) -> ApiResult<u64> {
    let valid = i64::try_from(product_id).map_or(false, is_valid_product_id);
    if !valid {
        return Err(ApiError::InvalidRequest(format!(
            "Invalid product id: {}",
            product_id
        )));
    }
    Ok(product_id)
}

/// Handler for GET /products
///
/// Returns one page of products from the upstream API.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProductPage>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let page = state.catalog.list_products(query.limit, query.skip).await?;
    Ok(Json(page))
}

/// Handler for GET /products/search
pub async fn search_products_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ProductPage>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let page = state.catalog.search_products(query.q.trim()).await?;
    Ok(Json(page))
}

/// Handler for GET /products/:id
///
/// Serves the product from cache when live.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> ApiResult<Json<Product>> {
    let product_id = check_product_id(product_id)?;
    let product = state.catalog.get_product(product_id).await?;
    Ok(Json(product))
}

/// Handler for POST /products/:id/refresh
pub async fn refresh_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> ApiResult<Json<Product>> {
    let product_id = check_product_id(product_id)?;
    let product = state.catalog.refresh_product(product_id).await?;
    Ok(Json(product))
}

/// Handler for GET /categories
///
/// Serves the category list from cache when live.
pub async fn categories_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.catalog.get_categories().await?;
    Ok(Json(categories))
}

/// Handler for POST /categories/refresh
pub async fn refresh_categories_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.catalog.refresh_categories().await?;
    Ok(Json(categories))
}

/// Handler for POST /auth/login
///
/// Logs in upstream and keeps the token for later requests.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if let Some(error_msg) = payload.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let response = state.auth.login(&payload).await?;
    Ok(Json(response))
}

/// Handler for POST /auth/logout
pub async fn logout_handler(State(state): State<AppState>) -> ApiResult<Json<LogoutResponse>> {
    state.auth.logout().await?;
    Ok(Json(LogoutResponse::logged_out()))
}

/// Handler for GET /auth/me
pub async fn current_user_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state.auth.current_user().await?;
    Ok(Json(user))
}

/// Handler for GET /deeplink?url=
///
/// Parses a deep link into the action the app should run.
pub async fn deeplink_handler(
    Query(query): Query<DeepLinkQuery>,
) -> ApiResult<Json<DeepLinkResponse>> {
    match DeepLinkAction::parse(&query.url) {
        Some(action) => {
            info!("Deep link resolved to {}: {}", action.kind(), query.url);
            Ok(Json(DeepLinkResponse::new(query.url, action)))
        }
        None => {
            warn!("Rejected deep link: {}", query.url);
            Err(ApiError::InvalidRequest(format!(
                "Unrecognized deep link: {}",
                query.url
            )))
        }
    }
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.catalog.cache().stats().into())
}

/// Handler for GET /cache/:key/info
pub async fn cache_info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<CacheInfo> {
    Json(state.catalog.cache().info(&key).await)
}

/// Handler for DELETE /cache
///
/// Drops every cached entry, leaving other stored data alone.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ClearCacheResponse>> {
    let removed = state.catalog.cache().clear_all().await?;
    Ok(Json(ClearCacheResponse::new(removed)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
