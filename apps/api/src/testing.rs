//! In-process stand-ins for the database, object store and SMTP relay.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::candidates::filter::{CandidateFilter, DateWindow, Page};
use crate::candidates::repository::CandidateRepository;
use crate::candidates::stats::CandidateStats;
use crate::candidates::status::{CandidateStatus, StatusFlagCoupling};
use crate::errors::AppError;
use crate::mailer::{DeliveryId, MailError, Mailer, OutgoingMail};
use crate::models::candidate::Candidate;
use crate::models::template::{EmailTemplate, TemplatePatch};
use crate::offers::sender::{OfferSender, SendSettings};
use crate::state::AppState;
use crate::storage::FileStore;
use crate::templates::repository::TemplateRepository;

/// A fresh pending candidate with a unique address.
pub fn candidate(name: &str, salary_lpa: Option<f64>) -> Candidate {
    let id = Uuid::new_v4();
    let now = Utc::now();
    Candidate {
        id,
        full_name: name.to_string(),
        email: format!("{}.{}@example.com", name.to_lowercase().replace(' ', "."), id.simple()),
        phone: None,
        position: None,
        department: None,
        reporting_address: None,
        reporting_date: None,
        reporting_time: None,
        salary_lpa,
        offer_letter_pdf: None,
        is_email_sent: false,
        status: CandidateStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryCandidates {
    rows: Mutex<Vec<Candidate>>,
    updates: AtomicUsize,
}

impl InMemoryCandidates {
    pub fn seed(&self, candidate: Candidate) -> Candidate {
        self.rows.lock().unwrap().push(candidate.clone());
        candidate
    }

    pub fn get(&self, id: Uuid) -> Option<Candidate> {
        self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    /// Number of writes to existing rows.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut Candidate)) -> Result<Candidate, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
        f(row);
        row.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(row.clone())
    }
}

#[async_trait]
impl CandidateRepository for InMemoryCandidates {
    async fn list(&self, filter: &CandidateFilter, page: Page) -> Result<Vec<Candidate>, AppError> {
        let mut rows: Vec<Candidate> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &CandidateFilter) -> Result<i64, AppError> {
        Ok(self.rows.lock().unwrap().iter().filter(|c| filter.matches(c)).count() as i64)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(self.get(id))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Candidate>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        Ok(self.seed(candidate.clone()))
    }

    async fn update(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        let next = candidate.clone();
        self.modify(candidate.id, move |row| *row = next)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .position(|c| c.id == id)
            .map(|index| rows.remove(index)))
    }

    async fn mark_offer_sent(&self, id: Uuid) -> Result<Candidate, AppError> {
        self.modify(id, |row| {
            row.is_email_sent = true;
            row.status = CandidateStatus::OfferSent;
        })
    }

    async fn stats(&self, week: DateWindow) -> Result<CandidateStats, AppError> {
        Ok(CandidateStats::tally(self.rows.lock().unwrap().iter(), week))
    }
}

#[derive(Default)]
pub struct InMemoryTemplates {
    template: Mutex<Option<EmailTemplate>>,
}

#[async_trait]
impl TemplateRepository for InMemoryTemplates {
    async fn get_or_create(&self) -> Result<EmailTemplate, AppError> {
        Ok(self
            .template
            .lock()
            .unwrap()
            .get_or_insert_with(EmailTemplate::default)
            .clone())
    }

    async fn update(&self, patch: TemplatePatch) -> Result<EmailTemplate, AppError> {
        let mut slot = self.template.lock().unwrap();
        let template = slot.get_or_insert_with(EmailTemplate::default);
        patch.apply_to(template);
        Ok(template.clone())
    }
}

#[derive(Default)]
pub struct MemoryFiles {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryFiles {
    pub fn insert(&self, data: Bytes) -> String {
        let key = format!("offer-letters/{}.pdf", Uuid::new_v4());
        self.objects.lock().unwrap().insert(key.clone(), data);
        key
    }
}

#[async_trait]
impl FileStore for MemoryFiles {
    async fn put(&self, data: Bytes, _content_type: &str) -> Result<String, AppError> {
        Ok(self.insert(data))
    }

    async fn fetch(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}

/// Records every accepted mail. Per-recipient failures and delays can be scripted.
#[derive(Default)]
pub struct ScriptedMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failures: Mutex<HashMap<String, String>>,
    delays: Mutex<HashMap<String, Duration>>,
    counter: AtomicUsize,
}

impl ScriptedMailer {
    pub fn fail_for(&self, recipient: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(recipient.to_string(), message.to_string());
    }

    pub fn delay_for(&self, recipient: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(recipient.to_string(), delay);
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryId, MailError> {
        let delay = self.delays.lock().unwrap().get(&mail.to).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.lock().unwrap().get(&mail.to).cloned();
        if let Some(message) = failure {
            return Err(MailError::Smtp(message));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent.lock().unwrap().push(mail);
        Ok(DeliveryId(format!("<{n}@test>")))
    }
}

pub fn sender_with(
    candidates: Arc<InMemoryCandidates>,
    mailer: Arc<ScriptedMailer>,
    files: Arc<MemoryFiles>,
) -> OfferSender {
    OfferSender::new(
        candidates,
        Arc::new(InMemoryTemplates::default()),
        files,
        mailer,
        SendSettings::default(),
    )
}

/// Application state wired entirely to in-memory backends.
pub fn test_state(candidates: Arc<InMemoryCandidates>, mailer: Arc<ScriptedMailer>) -> AppState {
    let templates = Arc::new(InMemoryTemplates::default());
    let files = Arc::new(MemoryFiles::default());
    let offers = OfferSender::new(
        candidates.clone(),
        templates.clone(),
        files.clone(),
        mailer,
        SendSettings::default(),
    );
    AppState {
        candidates,
        templates,
        files,
        offers,
        status_coupling: StatusFlagCoupling::Enforced,
    }
}
