//! Member endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::MemberId;
use domain::Member;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::{SharedState, parse_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateAddressRequest {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Flattened single-line display form of the address.
    pub address: String,
    pub member_since: chrono::NaiveDate,
    pub active: bool,
}

impl MemberResponse {
    fn from_member(member: &Member) -> Self {
        Self {
            id: member.id().to_string(),
            name: member.name().to_string(),
            email: member.email().to_string(),
            address: member.address().full_display(),
            member_since: member.member_since(),
            active: member.is_active(),
        }
    }
}

// -- Handlers --

/// POST /api/members — register a new member.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let member = state
        .members
        .create_member(
            &req.name,
            &req.email,
            &req.street,
            &req.city,
            &req.postal_code,
            &req.country,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MemberResponse::from_member(&member)),
    ))
}

/// GET /api/members — list every member.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.members.all_members().await?;
    Ok(Json(
        members.iter().map(MemberResponse::from_member).collect(),
    ))
}

/// GET /api/members/active — list members in good standing.
#[tracing::instrument(skip(state))]
pub async fn active(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.members.active_members().await?;
    Ok(Json(
        members.iter().map(MemberResponse::from_member).collect(),
    ))
}

/// GET /api/members/{id} — load one member.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id: MemberId = parse_id(&id)?;
    let member = state.members.get_member(member_id).await?;
    Ok(Json(MemberResponse::from_member(&member)))
}

/// GET /api/members/search?name= — partial name search.
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<SharedState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.members.search_by_name(&query.name).await?;
    Ok(Json(
        members.iter().map(MemberResponse::from_member).collect(),
    ))
}

/// PUT /api/members/{id}/email — replace a member's email.
#[tracing::instrument(skip(state, req))]
pub async fn change_email(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEmailRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id: MemberId = parse_id(&id)?;
    let member = state.members.change_email(member_id, &req.email).await?;
    Ok(Json(MemberResponse::from_member(&member)))
}

/// PUT /api/members/{id}/address — replace a member's address.
#[tracing::instrument(skip(state, req))]
pub async fn change_address(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAddressRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id: MemberId = parse_id(&id)?;
    let member = state
        .members
        .change_address(member_id, &req.street, &req.city, &req.postal_code, &req.country)
        .await?;
    Ok(Json(MemberResponse::from_member(&member)))
}

/// POST /api/members/{id}/deactivate — block further borrowing.
#[tracing::instrument(skip(state))]
pub async fn deactivate(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id: MemberId = parse_id(&id)?;
    let member = state.members.deactivate(member_id).await?;
    Ok(Json(MemberResponse::from_member(&member)))
}

/// POST /api/members/{id}/activate — restore borrowing rights.
#[tracing::instrument(skip(state))]
pub async fn activate(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_id: MemberId = parse_id(&id)?;
    let member = state.members.activate(member_id).await?;
    Ok(Json(MemberResponse::from_member(&member)))
}
