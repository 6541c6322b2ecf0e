//! REST API endpoints.
//!
//! Axum-based HTTP API: public schedule and leader views, plus token-gated
//! admin routes for managing teams, players, games and box scores.

pub mod auth;
pub mod forms;
pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    /// Saturates for page numbers far past the end.
    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The slice of `items` on this page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset() as usize).min(items.len());
        let end = start.saturating_add(self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

/// Query string for paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<&PageParams> for Pagination {
    fn from(params: &PageParams) -> Self {
        Pagination::new(params.page, params.page_size)
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    use routes::{admin, public};

    let admin_routes = Router::new()
        .route("/settings", put(admin::update_settings))
        .route("/teams", get(admin::list_teams).post(admin::create_team))
        .route(
            "/teams/:id",
            put(admin::update_team).delete(admin::delete_team),
        )
        .route("/players", get(admin::list_players).post(admin::create_player))
        .route(
            "/players/:id",
            put(admin::update_player).delete(admin::delete_player),
        )
        .route("/games", get(admin::list_games).post(admin::create_game))
        .route(
            "/games/:id",
            put(admin::update_game).delete(admin::delete_game),
        )
        .route("/games/:id/players", get(admin::game_roster))
        .route(
            "/games/:id/stats",
            get(admin::list_game_stats).post(admin::create_stat_record),
        )
        .route(
            "/stats/:id",
            put(admin::update_stat_record).delete(admin::delete_stat_record),
        )
        .route("/stats/derive", post(admin::derive_preview))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let api = Router::new()
        .route("/health", get(public::health))
        .route("/settings", get(public::get_settings))
        .route("/weeks", get(public::list_weeks))
        .route("/games", get(public::list_week_games))
        .route("/games/:id", get(public::get_game))
        .route("/games/:id/leaders", get(public::get_game_leaders))
        .nest("/admin", admin_routes);

    let mut router = Router::new().nest("/api", api);
    if let Some(dir) = state.static_dir.as_deref() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors_layer(&state.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(Some(0), Some(50));
        assert_eq!(p.page, 1);

        let p = Pagination::new(Some(1), Some(200));
        assert_eq!(p.page_size, 100);
    }

    #[test]
    fn test_pagination_slice() {
        let items: Vec<u32> = (1..=25).collect();
        let p = Pagination::new(Some(3), Some(10));
        assert_eq!(p.slice(&items), &[21, 22, 23, 24, 25]);

        let past_end = Pagination::new(Some(9), Some(10));
        assert!(past_end.slice(&items).is_empty());
    }

    #[test]
    fn test_pagination_huge_page() {
        let items: Vec<u32> = (1..=25).collect();
        let p = Pagination::new(Some(u32::MAX), Some(100));
        assert_eq!(p.offset(), u32::MAX);
        assert!(p.slice(&items).is_empty());

        let meta = PaginationMeta::new(&p, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_pagination_meta() {
        let p = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_storage_error_mapping() {
        let not_found: ApiError = StorageError::NotFound {
            entity: "team",
            id: "t1".into(),
        }
        .into();
        assert!(matches!(not_found, ApiError::NotFound(_)));

        let conflict: ApiError = StorageError::Conflict("dup".into()).into();
        assert!(matches!(conflict, ApiError::Conflict(ref m) if m == "dup"));

        let internal: ApiError = StorageError::Poisoned.into();
        assert!(matches!(internal, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
