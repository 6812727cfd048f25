//! HTTP API for the pharmacy service.
//!
//! This module provides the REST API endpoints for:
//! - Health monitoring
//! - Member records and member search
//! - Provider records and provider search
//! - Sample data (development only)

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::DevConfig;
use crate::service::PharmacyService;

pub mod members;
pub mod providers;
pub mod test_data;

/// Application state
pub struct AppState {
    pub service: Arc<PharmacyService>,
    pub start_time: Instant,
}

/// Build the API router
pub fn router(service: Arc<PharmacyService>, dev: &DevConfig) -> Router {
    let state = Arc::new(AppState {
        service,
        start_time: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new()
        .merge(members::routes())
        .merge(providers::routes());

    if dev.sample_data_endpoints {
        info!("Sample data endpoints enabled");
        api_routes = api_routes.merge(test_data::routes());
    }

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Health ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

/// Query parameters for free-text search endpoints
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermParams {
    #[serde(default)]
    pub search_term: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::db::Database;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    pub(crate) fn test_router(sample_data_endpoints: bool) -> Router {
        let service = Arc::new(PharmacyService::new(
            Arc::new(Database::open_in_memory().unwrap()),
            None,
            SearchConfig::default(),
        ));
        router(
            service,
            &DevConfig {
                sample_data_endpoints,
            },
        )
    }

    pub(crate) async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    pub(crate) async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router(false);
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_sample_data_routes_are_opt_in() {
        let app = test_router(false);
        let response = send(&app, Method::GET, "/api/test-data/member-count", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let app = test_router(true);
        let response = send(&app, Method::GET, "/api/test-data/member-count", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
