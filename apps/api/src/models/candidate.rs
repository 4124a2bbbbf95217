use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::candidates::status::CandidateStatus;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub reporting_address: Option<String>,
    pub reporting_date: Option<DateTime<Utc>>,
    /// Free text such as "11 AM".
    pub reporting_time: Option<String>,
    #[serde(rename = "salaryLPA")]
    pub salary_lpa: Option<f64>,
    /// Storage key of the uploaded offer letter PDF.
    #[serde(rename = "offerLetterPDF")]
    pub offer_letter_pdf: Option<String>,
    pub is_email_sent: bool,
    #[sqlx(try_from = "String")]
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Builds a fresh pending candidate from client input.
    /// `fullName` and `email` are required.
    pub fn from_input(input: CandidateInput) -> Result<Self, AppError> {
        let full_name = required(input.full_name)
            .ok_or_else(|| AppError::Validation("Full name and email are required".to_string()))?;
        let email = required(input.email)
            .ok_or_else(|| AppError::Validation("Full name and email are required".to_string()))?;
        let now = Utc::now();

        Ok(Candidate {
            id: Uuid::new_v4(),
            full_name,
            email,
            phone: input.phone,
            position: input.position,
            department: input.department,
            reporting_address: input.reporting_address,
            reporting_date: input.reporting_date,
            reporting_time: input.reporting_time,
            salary_lpa: input.salary_lpa,
            offer_letter_pdf: None,
            is_email_sent: false,
            status: CandidateStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Salary usable for an offer. Zero counts as missing.
    pub fn offer_salary_lpa(&self) -> Option<f64> {
        self.salary_lpa.filter(|lpa| *lpa != 0.0 && !lpa.is_nan())
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Client-supplied candidate fields, used for both create and partial update.
/// Absent fields leave the stored value untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub reporting_address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_reporting_date")]
    pub reporting_date: Option<DateTime<Utc>>,
    pub reporting_time: Option<String>,
    #[serde(rename = "salaryLPA")]
    pub salary_lpa: Option<f64>,
}

impl CandidateInput {
    /// Sets a field from a multipart text part. Unknown names are ignored.
    pub fn set_text_field(&mut self, name: &str, value: String) -> Result<(), AppError> {
        match name {
            "fullName" => self.full_name = Some(value),
            "email" => self.email = Some(value),
            "phone" => self.phone = Some(value),
            "position" => self.position = Some(value),
            "department" => self.department = Some(value),
            "reportingAddress" => self.reporting_address = Some(value),
            "reportingTime" => self.reporting_time = Some(value),
            "reportingDate" => {
                self.reporting_date = if value.trim().is_empty() {
                    None
                } else {
                    Some(parse_reporting_date(&value).ok_or_else(|| {
                        AppError::Validation(format!("Invalid reportingDate '{value}'"))
                    })?)
                }
            }
            "salaryLPA" => {
                self.salary_lpa = if value.trim().is_empty() {
                    None
                } else {
                    Some(
                        value
                            .trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|lpa| lpa.is_finite())
                            .ok_or_else(|| {
                                AppError::Validation(format!("Invalid salaryLPA '{value}'"))
                            })?,
                    )
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies the present fields onto an existing candidate.
    pub fn apply_to(self, candidate: &mut Candidate) -> Result<(), AppError> {
        if let Some(full_name) = self.full_name {
            candidate.full_name = required(Some(full_name))
                .ok_or_else(|| AppError::Validation("Full name cannot be empty".to_string()))?;
        }
        if let Some(email) = self.email {
            candidate.email = required(Some(email))
                .ok_or_else(|| AppError::Validation("Email cannot be empty".to_string()))?;
        }
        if self.phone.is_some() {
            candidate.phone = self.phone;
        }
        if self.position.is_some() {
            candidate.position = self.position;
        }
        if self.department.is_some() {
            candidate.department = self.department;
        }
        if self.reporting_address.is_some() {
            candidate.reporting_address = self.reporting_address;
        }
        if self.reporting_date.is_some() {
            candidate.reporting_date = self.reporting_date;
        }
        if self.reporting_time.is_some() {
            candidate.reporting_time = self.reporting_time;
        }
        if self.salary_lpa.is_some() {
            candidate.salary_lpa = self.salary_lpa;
        }
        Ok(())
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_reporting_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn deserialize_reporting_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_reporting_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid reportingDate '{s}'"))),
    }
}
