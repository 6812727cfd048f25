//! Member API endpoints.
//!
//! CRUD, lookups, free-text search and advanced search over members.

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
use crate::search::{MemberCriteria, ResultPage};
use crate::service::{CreateMember, MemberDto, PharmacyService, UpdateMember};
use crate::validation;

use super::{AppState, SearchTermParams};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/members",
            get(list_members_handler).post(create_member_handler),
        )
        .route(
            "/members/{id}",
            get(get_member_handler)
                .put(update_member_handler)
                .delete(delete_member_handler),
        )
        .route(
            "/members/by-number/{member_number}",
            get(get_member_by_number_handler),
        )
        .route("/members/by-gender/{gender}", get(members_by_gender_handler))
        .route("/members/search", get(search_members_handler))
        .route(
            "/members/advanced-search",
            post(advanced_search_members_handler),
        )
        .route(
            "/members/exists/{member_number}",
            get(member_number_exists_handler),
        )
}

/// List all members
pub async fn list_members_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberDto>>, ServiceError> {
    Ok(Json(state.service.list_members().await?))
}

pub async fn get_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MemberDto>, ServiceError> {
    Ok(Json(state.service.get_member(id).await?))
}

pub async fn get_member_by_number_handler(
    State(state): State<Arc<AppState>>,
    Path(member_number): Path<String>,
) -> Result<Json<MemberDto>, ServiceError> {
    Ok(Json(state.service.get_member_by_number(&member_number).await?))
}

pub async fn members_by_gender_handler(
    State(state): State<Arc<AppState>>,
    Path(gender): Path<String>,
) -> Result<Json<Vec<MemberDto>>, ServiceError> {
    Ok(Json(state.service.members_by_gender(&gender).await?))
}

/// Free-text search (`?searchTerm=`)
pub async fn search_members_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchTermParams>,
) -> Result<Json<Vec<MemberDto>>, ServiceError> {
    Ok(Json(state.service.search_members(&params.search_term).await?))
}

/// Multi-criteria paginated search
pub async fn advanced_search_members_handler(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<MemberCriteria>,
) -> Result<Json<ResultPage<MemberDto>>, ServiceError> {
    validation::check_member_criteria(
        &criteria,
        state.service.search_config(),
        PharmacyService::today(),
    )?;
    Ok(Json(state.service.advanced_search_members(&criteria).await?))
}

/// Create a member; responds 201 with the stored record
pub async fn create_member_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMember>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    validation::check_member_dob(request.dob, PharmacyService::today())?;

    let member = state.service.create_member(request).await?;
    let location = format!("/api/members/{}", member.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(member),
    ))
}

pub async fn update_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMember>,
) -> Result<Json<MemberDto>, ServiceError> {
    request.validate()?;
    validation::check_member_dob(request.dob, PharmacyService::today())?;

    Ok(Json(state.service.update_member(id, request).await?))
}

/// Delete a member; responds 204
pub async fn delete_member_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.service.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn member_number_exists_handler(
    State(state): State<Arc<AppState>>,
    Path(member_number): Path<String>,
) -> Result<Json<bool>, ServiceError> {
    Ok(Json(state.service.member_number_exists(&member_number).await?))
}
