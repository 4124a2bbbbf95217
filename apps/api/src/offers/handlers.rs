//! Axum route handlers for offer delivery.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::offers::sender::{BulkSendReport, SentOffer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SendOfferResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub sent: SentOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendRequest {
    #[serde(default)]
    pub candidate_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkSendResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: BulkSendReport,
}

/// POST /api/v1/offers/:id/send
pub async fn handle_send_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SendOfferResponse>, AppError> {
    let sent = state.offers.send_offer(id).await?;
    Ok(Json(SendOfferResponse {
        message: "Offer letter sent successfully",
        sent,
    }))
}

/// POST /api/v1/offers/bulk-send
///
/// Always 200 once the batch has been attempted; per-candidate failures are
/// listed under `failed`.
pub async fn handle_bulk_send(
    State(state): State<AppState>,
    Json(request): Json<BulkSendRequest>,
) -> Result<Json<BulkSendResponse>, AppError> {
    let ids = request
        .candidate_ids
        .iter()
        .map(|raw| {
            raw.parse::<Uuid>()
                .map_err(|_| AppError::Validation(format!("Invalid candidate id '{raw}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = state.offers.send_bulk(&ids).await?;
    Ok(Json(BulkSendResponse {
        message: format!(
            "Bulk send completed: {} sent, {} failed",
            report.success_count, report.failed_count
        ),
        report,
    }))
}
