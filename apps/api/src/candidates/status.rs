//! Candidate hiring lifecycle.
//!
//! Any status may be set directly, including moving back to `pending`.
//! Setting a non-pending status also marks the offer email as sent while
//! [`StatusFlagCoupling::Enforced`] is active.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::candidates::repository::CandidateRepository;
use crate::errors::AppError;
use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    Pending,
    OfferSent,
    Accepted,
    Rejected,
    Joined,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 5] = [
        CandidateStatus::Pending,
        CandidateStatus::OfferSent,
        CandidateStatus::Accepted,
        CandidateStatus::Rejected,
        CandidateStatus::Joined,
    ];

    /// Statuses reached once an offer has gone out.
    pub const SENT: [CandidateStatus; 4] = [
        CandidateStatus::OfferSent,
        CandidateStatus::Accepted,
        CandidateStatus::Rejected,
        CandidateStatus::Joined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::OfferSent => "offer_sent",
            CandidateStatus::Accepted => "accepted",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Joined => "joined",
        }
    }

    pub fn is_pending(self) -> bool {
        self == CandidateStatus::Pending
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Invalid status '{0}'. Must be one of: pending, offer_sent, accepted, rejected, joined")]
pub struct InvalidStatus(pub String);

impl FromStr for CandidateStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for CandidateStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvalidStatus> for AppError {
    fn from(value: InvalidStatus) -> Self {
        AppError::Validation(value.to_string())
    }
}

/// Business rule tying a non-pending status to `isEmailSent = true`,
/// whether or not an email was actually delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFlagCoupling {
    #[default]
    Enforced,
    Disabled,
}

impl StatusFlagCoupling {
    pub fn implies_email_sent(self, status: CandidateStatus) -> bool {
        self == StatusFlagCoupling::Enforced && !status.is_pending()
    }
}

impl FromStr for StatusFlagCoupling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "enforced" => Ok(StatusFlagCoupling::Enforced),
            "off" | "false" | "disabled" => Ok(StatusFlagCoupling::Disabled),
            other => Err(format!("expected 'on' or 'off', got '{other}'")),
        }
    }
}

/// Applies a status transition in memory.
pub fn apply_status(candidate: &mut Candidate, status: CandidateStatus, coupling: StatusFlagCoupling) {
    candidate.status = status;
    if coupling.implies_email_sent(status) {
        candidate.is_email_sent = true;
    }
}

/// Parses `raw`, then loads, transitions and persists the candidate.
/// Nothing is written when the status is invalid or the candidate is absent.
pub async fn update_status(
    repo: &dyn CandidateRepository,
    id: Uuid,
    raw: &str,
    coupling: StatusFlagCoupling,
) -> Result<Candidate, AppError> {
    let status: CandidateStatus = raw.parse()?;

    let mut candidate = repo
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;

    let previous = candidate.status;
    apply_status(&mut candidate, status, coupling);
    let candidate = repo.update(&candidate).await?;

    info!("Candidate {id} status {previous} -> {status}");
    Ok(candidate)
}
