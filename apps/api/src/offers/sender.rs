//! Offer delivery orchestration.
//!
//! A candidate is marked `offer_sent` only after the transport confirms
//! delivery. Bulk sends isolate every candidate: an ineligible record or a
//! failed delivery is recorded in the report and the batch carries on.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::candidates::repository::CandidateRepository;
use crate::errors::AppError;
use crate::mailer::{DeliveryId, MailAttachment, MailError, Mailer, OutgoingMail};
use crate::models::candidate::Candidate;
use crate::models::template::EmailTemplate;
use crate::offers::render::render_offer_email;
use crate::offers::salary::{annual_ctc_from_lpa, calculate_breakdown, SalaryBreakdown};
use crate::storage::FileStore;
use crate::templates::repository::TemplateRepository;

pub const MISSING_SALARY: &str = "Missing salary information";
pub const ALREADY_SENT: &str = "Email already sent";
pub const CANDIDATE_NOT_FOUND: &str = "Candidate not found";
pub const ATTACHMENT_NAME: &str = "Offer_Letter.pdf";

#[derive(Debug, Clone, Copy)]
pub struct SendSettings {
    /// Upper bound on a single transport call.
    pub send_timeout: Duration,
    /// Deliveries in flight during a bulk send.
    pub bulk_concurrency: usize,
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(30),
            bulk_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentOffer {
    #[serde(rename = "emailId")]
    pub delivery_id: DeliveryId,
    pub salary_breakdown: SalaryBreakdown,
    pub candidate: Candidate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuccess {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(rename = "emailId")]
    pub delivery_id: DeliveryId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub candidate_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub reason: String,
}

impl BulkFailure {
    fn for_candidate(candidate: &Candidate, reason: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate.id,
            full_name: Some(candidate.full_name.clone()),
            email: Some(candidate.email.clone()),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendReport {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub success: Vec<BulkSuccess>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug)]
enum BulkOutcome {
    Sent(BulkSuccess),
    Failed(BulkFailure),
}

impl BulkSendReport {
    fn from_outcomes(outcomes: Vec<BulkOutcome>) -> Self {
        let mut report = BulkSendReport {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                BulkOutcome::Sent(s) => report.success.push(s),
                BulkOutcome::Failed(f) => report.failed.push(f),
            }
        }
        report.success_count = report.success.len();
        report.failed_count = report.failed.len();
        report
    }
}

/// Why a candidate cannot be sent an offer, if anything.
fn bulk_eligibility(candidate: &Candidate) -> Result<f64, &'static str> {
    let lpa = candidate.offer_salary_lpa().ok_or(MISSING_SALARY)?;
    if candidate.is_email_sent {
        return Err(ALREADY_SENT);
    }
    Ok(lpa)
}

/// Renders, delivers and records offer emails.
#[derive(Clone)]
pub struct OfferSender {
    candidates: Arc<dyn CandidateRepository>,
    templates: Arc<dyn TemplateRepository>,
    files: Arc<dyn FileStore>,
    mailer: Arc<dyn Mailer>,
    settings: SendSettings,
}

impl OfferSender {
    pub fn new(
        candidates: Arc<dyn CandidateRepository>,
        templates: Arc<dyn TemplateRepository>,
        files: Arc<dyn FileStore>,
        mailer: Arc<dyn Mailer>,
        settings: SendSettings,
    ) -> Self {
        Self {
            candidates,
            templates,
            files,
            mailer,
            settings,
        }
    }

    /// Sends one offer. Validation and lookup failures happen before any
    /// side effect; a transport failure leaves the candidate untouched.
    pub async fn send_offer(&self, id: Uuid) -> Result<SentOffer, AppError> {
        let candidate = self
            .candidates
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(CANDIDATE_NOT_FOUND.to_string()))?;

        let salary_lpa = candidate.offer_salary_lpa().ok_or_else(|| {
            AppError::Validation(
                "Salary information is required to send offer letter".to_string(),
            )
        })?;

        let template = self.templates.get_or_create().await?;
        self.deliver(candidate, salary_lpa, &template).await
    }

    /// Sends offers to a batch of candidates. The call itself succeeds even
    /// when individual items fail; see the returned report.
    pub async fn send_bulk(&self, ids: &[Uuid]) -> Result<BulkSendReport, AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation(
                "candidateIds must be a non-empty list".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut by_id: HashMap<Uuid, Candidate> = self
            .candidates
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let template = Arc::new(self.templates.get_or_create().await?);
        let permits = Arc::new(Semaphore::new(self.settings.bulk_concurrency.max(1)));

        enum Slot {
            Done(BulkOutcome),
            Pending(Candidate, tokio::task::JoinHandle<BulkOutcome>),
        }

        let mut slots = Vec::with_capacity(ids.len());
        for id in &ids {
            let Some(candidate) = by_id.remove(id) else {
                warn!("Bulk send: candidate {id} not found");
                slots.push(Slot::Done(BulkOutcome::Failed(BulkFailure {
                    candidate_id: *id,
                    full_name: None,
                    email: None,
                    reason: CANDIDATE_NOT_FOUND.to_string(),
                })));
                continue;
            };

            match bulk_eligibility(&candidate) {
                Err(reason) => {
                    warn!("Bulk send: skipping {} ({}): {reason}", candidate.id, candidate.email);
                    slots.push(Slot::Done(BulkOutcome::Failed(BulkFailure::for_candidate(
                        &candidate, reason,
                    ))));
                }
                Ok(salary_lpa) => {
                    let sender = self.clone();
                    let template = Arc::clone(&template);
                    let permits = Arc::clone(&permits);
                    let task_candidate = candidate.clone();
                    let handle = tokio::spawn(async move {
                        let _permit = permits.acquire_owned().await;
                        sender.attempt(task_candidate, salary_lpa, &template).await
                    });
                    slots.push(Slot::Pending(candidate, handle));
                }
            }
        }

        let mut outcomes = Vec::with_capacity(slots.len());
        for slot in slots {
            let outcome = match slot {
                Slot::Done(outcome) => outcome,
                Slot::Pending(candidate, handle) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_err) => {
                        error!("Bulk send task for {} aborted: {join_err}", candidate.id);
                        BulkOutcome::Failed(BulkFailure::for_candidate(
                            &candidate,
                            format!("Send task aborted: {join_err}"),
                        ))
                    }
                },
            };
            outcomes.push(outcome);
        }

        let report = BulkSendReport::from_outcomes(outcomes);
        info!(
            "Bulk send finished: {} sent, {} failed of {}",
            report.success_count, report.failed_count, report.total
        );
        Ok(report)
    }

    async fn attempt(&self, candidate: Candidate, salary_lpa: f64, template: &EmailTemplate) -> BulkOutcome {
        let fallback = BulkFailure::for_candidate(&candidate, "");
        match self.deliver(candidate, salary_lpa, template).await {
            Ok(sent) => BulkOutcome::Sent(BulkSuccess {
                candidate_id: sent.candidate.id,
                full_name: sent.candidate.full_name,
                email: sent.candidate.email,
                delivery_id: sent.delivery_id,
            }),
            Err(err) => {
                warn!("Bulk send: delivery to {} failed: {err}", fallback.candidate_id);
                BulkOutcome::Failed(BulkFailure {
                    reason: err.to_string(),
                    ..fallback
                })
            }
        }
    }

    /// Render -> deliver -> mark sent. Nothing is persisted unless the
    /// transport returns a delivery id.
    async fn deliver(
        &self,
        candidate: Candidate,
        salary_lpa: f64,
        template: &EmailTemplate,
    ) -> Result<SentOffer, AppError> {
        let breakdown = calculate_breakdown(annual_ctc_from_lpa(salary_lpa));
        let html = render_offer_email(&candidate, &breakdown, template);
        let attachment = self.load_attachment(&candidate).await?;

        let mail = OutgoingMail {
            to: candidate.email.clone(),
            subject: template.email_subject.clone(),
            html,
            attachment,
        };

        let delivery_id = tokio::time::timeout(self.settings.send_timeout, self.mailer.send(mail))
            .await
            .map_err(|_| MailError::Timeout(self.settings.send_timeout))??;

        let candidate = self.candidates.mark_offer_sent(candidate.id).await?;
        info!(
            "Offer letter delivered to {} ({}), id {delivery_id}",
            candidate.email, candidate.id
        );

        Ok(SentOffer {
            delivery_id,
            salary_breakdown: breakdown,
            candidate,
        })
    }

    async fn load_attachment(&self, candidate: &Candidate) -> Result<Option<MailAttachment>, AppError> {
        let Some(key) = candidate.offer_letter_pdf.as_deref() else {
            return Ok(None);
        };
        match self.files.fetch(key).await? {
            Some(data) => Ok(Some(MailAttachment {
                filename: ATTACHMENT_NAME.to_string(),
                content_type: "application/pdf".to_string(),
                data,
            })),
            None => {
                warn!("Offer letter {key} for {} is missing; sending without it", candidate.id);
                Ok(None)
            }
        }
    }
}
