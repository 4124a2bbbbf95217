use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidates::filter::{week_window, ListQuery, Pagination};
use crate::candidates::form::CandidateForm;
use crate::candidates::stats::CandidateStats;
use crate::candidates::status::update_status;
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CandidateResponse {
    pub message: &'static str,
    pub candidate: Candidate,
}

#[derive(Serialize)]
pub struct CandidateListResponse {
    pub message: &'static str,
    pub candidates: Vec<Candidate>,
    pub pagination: Pagination,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Candidate {id} not found"))
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    mut form: CandidateForm,
) -> Result<(StatusCode, Json<CandidateResponse>), AppError> {
    let input = std::mem::take(&mut form.input);
    let mut candidate = Candidate::from_input(input)?;
    candidate.offer_letter_pdf = form.store_upload(&state).await?;

    let candidate = state.candidates.insert(&candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateResponse {
            message: "Candidate created successfully",
            candidate,
        }),
    ))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let (filter, page) = query.resolve(Utc::now())?;

    let total = state.candidates.count(&filter).await?;
    let candidates = state.candidates.list(&filter, page).await?;

    Ok(Json(CandidateListResponse {
        message: "Candidates retrieved successfully",
        candidates,
        pagination: Pagination::new(page, total),
    }))
}

/// GET /api/v1/candidates/stats
pub async fn handle_candidate_stats(
    State(state): State<AppState>,
) -> Result<Json<CandidateStats>, AppError> {
    let stats = state.candidates.stats(week_window(Utc::now())).await?;
    Ok(Json(stats))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateResponse>, AppError> {
    let candidate = state.candidates.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(CandidateResponse {
        message: "Candidate retrieved successfully",
        candidate,
    }))
}

/// PATCH /api/v1/candidates/:id
///
/// Partial update of profile fields and, optionally, the offer letter PDF.
/// Status changes go through the status endpoint.
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut form: CandidateForm,
) -> Result<Json<CandidateResponse>, AppError> {
    let mut candidate = state.candidates.find(id).await?.ok_or_else(|| not_found(id))?;

    std::mem::take(&mut form.input).apply_to(&mut candidate)?;
    if let Some(key) = form.store_upload(&state).await? {
        candidate.offer_letter_pdf = Some(key);
    }

    let candidate = state.candidates.update(&candidate).await?;
    Ok(Json(CandidateResponse {
        message: "Candidate updated successfully",
        candidate,
    }))
}

/// DELETE /api/v1/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateResponse>, AppError> {
    let candidate = state.candidates.delete(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(CandidateResponse {
        message: "Candidate deleted successfully",
        candidate,
    }))
}

/// PATCH /api/v1/candidates/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<CandidateResponse>, AppError> {
    let candidate =
        update_status(state.candidates.as_ref(), id, &body.status, state.status_coupling).await?;
    Ok(Json(CandidateResponse {
        message: "Candidate status updated successfully",
        candidate,
    }))
}
