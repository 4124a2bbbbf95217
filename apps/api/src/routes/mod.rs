pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::offers::handlers as offers;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidates
        .route(
            "/api/v1/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/api/v1/candidates/stats",
            get(candidates::handle_candidate_stats),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate)
                .patch(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        .route(
            "/api/v1/candidates/:id/status",
            patch(candidates::handle_update_status),
        )
        // Offers
        .route("/api/v1/offers/:id/send", post(offers::handle_send_offer))
        .route("/api/v1/offers/bulk-send", post(offers::handle_bulk_send))
        // Email template
        .route(
            "/api/v1/email-template",
            get(templates::handle_get_template).patch(templates::handle_update_template),
        )
        .with_state(state)
}
