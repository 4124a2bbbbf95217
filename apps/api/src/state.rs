use std::sync::Arc;

use crate::candidates::repository::CandidateRepository;
use crate::candidates::status::StatusFlagCoupling;
use crate::offers::sender::OfferSender;
use crate::storage::FileStore;
use crate::templates::repository::TemplateRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub candidates: Arc<dyn CandidateRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    /// Offer-letter PDFs.
    pub files: Arc<dyn FileStore>,
    pub offers: OfferSender,
    /// Whether a direct status change also marks the offer email as sent.
    pub status_coupling: StatusFlagCoupling,
}
