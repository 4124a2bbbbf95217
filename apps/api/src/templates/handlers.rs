use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::template::{EmailTemplate, TemplatePatch};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TemplateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub template: EmailTemplate,
}

/// GET /api/v1/email-template
pub async fn handle_get_template(
    State(state): State<AppState>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = state.templates.get_or_create().await?;
    Ok(Json(TemplateResponse {
        message: None,
        template,
    }))
}

/// PATCH /api/v1/email-template
pub async fn handle_update_template(
    State(state): State<AppState>,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<TemplateResponse>, AppError> {
    let template = state.templates.update(patch).await?;
    tracing::info!("Email template updated");
    Ok(Json(TemplateResponse {
        message: Some("Template updated successfully"),
        template,
    }))
}
