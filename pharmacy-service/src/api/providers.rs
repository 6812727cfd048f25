//! Provider API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use validator::Validate;

use crate::error::ServiceError;
use crate::search::{ProviderCriteria, ResultPage};
use crate::service::{CreateProvider, ProviderDto, UpdateProvider};
use crate::validation;

use super::{AppState, SearchTermParams};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/providers",
            get(list_providers_handler).post(create_provider_handler),
        )
        .route(
            "/providers/{id}",
            get(get_provider_handler)
                .put(update_provider_handler)
                .delete(delete_provider_handler),
        )
        .route(
            "/providers/by-number/{provider_number}",
            get(get_provider_by_number_handler),
        )
        .route("/providers/by-npi/{npi}", get(get_provider_by_npi_handler))
        .route(
            "/providers/by-specialty/{specialty}",
            get(providers_by_specialty_handler),
        )
        .route("/providers/search", get(search_providers_handler))
        .route(
            "/providers/advanced-search",
            post(advanced_search_providers_handler),
        )
        .route(
            "/providers/exists/provider-number/{provider_number}",
            get(provider_number_exists_handler),
        )
        .route("/providers/exists/npi/{npi}", get(npi_exists_handler))
}

pub async fn list_providers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProviderDto>>, ServiceError> {
    Ok(Json(state.service.list_providers().await?))
}

pub async fn get_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProviderDto>, ServiceError> {
    Ok(Json(state.service.get_provider(id).await?))
}

pub async fn get_provider_by_number_handler(
    State(state): State<Arc<AppState>>,
    Path(provider_number): Path<String>,
) -> Result<Json<ProviderDto>, ServiceError> {
    Ok(Json(
        state.service.get_provider_by_number(&provider_number).await?,
    ))
}

pub async fn get_provider_by_npi_handler(
    State(state): State<Arc<AppState>>,
    Path(npi): Path<String>,
) -> Result<Json<ProviderDto>, ServiceError> {
    Ok(Json(state.service.get_provider_by_npi(&npi).await?))
}

pub async fn providers_by_specialty_handler(
    State(state): State<Arc<AppState>>,
    Path(specialty): Path<String>,
) -> Result<Json<Vec<ProviderDto>>, ServiceError> {
    Ok(Json(state.service.providers_by_specialty(&specialty).await?))
}

pub async fn search_providers_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchTermParams>,
) -> Result<Json<Vec<ProviderDto>>, ServiceError> {
    Ok(Json(
        state.service.search_providers(&params.search_term).await?,
    ))
}

pub async fn advanced_search_providers_handler(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<ProviderCriteria>,
) -> Result<Json<ResultPage<ProviderDto>>, ServiceError> {
    validation::check_provider_criteria(&criteria, state.service.search_config())?;
    Ok(Json(state.service.advanced_search_providers(&criteria).await?))
}

pub async fn create_provider_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProvider>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    let provider = state.service.create_provider(request).await?;
    let location = format!("/api/providers/{}", provider.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(provider),
    ))
}

pub async fn update_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProvider>,
) -> Result<Json<ProviderDto>, ServiceError> {
    request.validate()?;
    Ok(Json(state.service.update_provider(id, request).await?))
}

pub async fn delete_provider_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.service.delete_provider(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn provider_number_exists_handler(
    State(state): State<Arc<AppState>>,
    Path(provider_number): Path<String>,
) -> Result<Json<bool>, ServiceError> {
    Ok(Json(
        state.service.provider_number_exists(&provider_number).await?,
    ))
}

pub async fn npi_exists_handler(
    State(state): State<Arc<AppState>>,
    Path(npi): Path<String>,
) -> Result<Json<bool>, ServiceError> {
    Ok(Json(state.service.npi_exists(&npi).await?))
}
