//! Sample data endpoints, mounted only when `dev.sample_data_endpoints` is set.

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::service::SampleDataSummary;

use super::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/test-data/create-test-members",
            post(create_test_members_handler),
        )
        .route("/test-data/member-count", get(member_count_handler))
        .route(
            "/test-data/clear-test-members",
            delete(clear_test_members_handler),
        )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCountResponse {
    pub total_members: u64,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub removed: usize,
    pub message: String,
}

pub async fn create_test_members_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SampleDataSummary>, ServiceError> {
    Ok(Json(state.service.create_sample_members().await?))
}

pub async fn member_count_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberCountResponse>, ServiceError> {
    let total_members = state.service.member_count().await?;
    let message = if total_members > 0 {
        format!("Found {} members in database", total_members)
    } else {
        "No members found - consider creating test data".to_string()
    };

    Ok(Json(MemberCountResponse {
        total_members,
        message,
    }))
}

pub async fn clear_test_members_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ServiceError> {
    let removed = state.service.clear_sample_members().await?;
    Ok(Json(ClearResponse {
        removed,
        message: format!("Removed {} test members", removed),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::api::tests::{json_body, send, test_router};

    #[tokio::test]
    async fn test_sample_data_flow() {
        let app = test_router(true);

        let response = send(&app, Method::POST, "/api/test-data/create-test-members", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["totalCount"], 6);

        let response = send(&app, Method::GET, "/api/test-data/member-count", None).await;
        assert_eq!(json_body(response).await["totalMembers"], 6);

        let response = send(
            &app,
            Method::POST,
            "/api/members/advanced-search",
            Some(serde_json::json!({ "lastName": "kumar" })),
        )
        .await;
        assert_eq!(json_body(response).await["totalCount"], 1);

        let response = send(&app, Method::DELETE, "/api/test-data/clear-test-members", None).await;
        assert_eq!(json_body(response).await["removed"], 6);

        let response = send(&app, Method::GET, "/api/test-data/member-count", None).await;
        assert_eq!(json_body(response).await["totalMembers"], 0);
    }
}
