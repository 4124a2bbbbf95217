use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidates::status::CandidateStatus;
use crate::errors::AppError;
#[cfg(test)]
use crate::models::candidate::Candidate;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 5;
const MAX_LIMIT: i64 = 100;

/// Raw query string of `GET /api/v1/candidates`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub email_status: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailStatusFilter {
    #[default]
    All,
    Sent,
    NotSent,
}

impl FromStr for EmailStatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(EmailStatusFilter::All),
            "sent" => Ok(EmailStatusFilter::Sent),
            "not_sent" => Ok(EmailStatusFilter::NotSent),
            other => Err(AppError::Validation(format!(
                "Invalid emailStatus '{other}'. Must be one of: all, sent, not_sent"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Any status an offer has already gone out for.
    Sent,
    JoiningThisWeek,
    Exact(CandidateStatus),
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "sent" => Ok(StatusFilter::Sent),
            "joining_this_week" => Ok(StatusFilter::JoiningThisWeek),
            other => other.parse::<CandidateStatus>().map(StatusFilter::Exact).map_err(|_| {
                AppError::Validation(format!(
                    "Invalid status filter '{other}'. Must be one of: all, pending, sent, \
                     offer_sent, accepted, rejected, joined, joining_this_week"
                ))
            }),
        }
    }
}

/// Half-open `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
impl DateWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Most recent Sunday 00:00 (today if `now` is a Sunday) to the next Sunday 00:00, in UTC.
pub fn week_window(now: DateTime<Utc>) -> DateWindow {
    let today = now.date_naive();
    let since_sunday = i64::from(today.weekday().num_days_from_sunday());
    let start = (today - Duration::days(since_sunday))
        .and_time(NaiveTime::MIN)
        .and_utc();
    DateWindow {
        start,
        end: start + Duration::days(7),
    }
}

/// Predicate set shared by listing, counting and the in-process matcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    /// Case-insensitive substring over name, email, phone, position, department.
    pub search: Option<String>,
    pub email_sent: Option<bool>,
    pub statuses: Option<Vec<CandidateStatus>>,
    pub reporting_window: Option<DateWindow>,
}

#[cfg(test)]
impl CandidateFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let haystacks = [
                Some(candidate.full_name.as_str()),
                Some(candidate.email.as_str()),
                candidate.phone.as_deref(),
                candidate.position.as_deref(),
                candidate.department.as_deref(),
            ];
            let hit = haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(sent) = self.email_sent {
            if candidate.is_email_sent != sent {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&candidate.status) {
                return false;
            }
        }
        if let Some(window) = &self.reporting_window {
            match candidate.reporting_date {
                Some(date) if window.contains(date) => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_candidates: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: Page, total: i64) -> Self {
        let total_pages = (total + page.limit - 1) / page.limit;
        Pagination {
            current_page: page.page,
            total_pages,
            total_candidates: total,
            limit: page.limit,
            has_next_page: page.page < total_pages,
            has_prev_page: page.page > 1,
        }
    }
}

impl ListQuery {
    /// Validates the query and resolves it into a filter and a page.
    /// `now` anchors the `joining_this_week` window.
    pub fn resolve(self, now: DateTime<Utc>) -> Result<(CandidateFilter, Page), AppError> {
        let page = Page {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        };
        if page.page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_LIMIT).contains(&page.limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        if (page.page - 1).checked_mul(page.limit).is_none() {
            return Err(AppError::Validation("page out of range".to_string()));
        }

        let email_status = match self.email_status.as_deref() {
            Some(raw) => raw.parse()?,
            None => EmailStatusFilter::All,
        };
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => StatusFilter::All,
        };

        let mut filter = CandidateFilter {
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            email_sent: match email_status {
                EmailStatusFilter::All => None,
                EmailStatusFilter::Sent => Some(true),
                EmailStatusFilter::NotSent => Some(false),
            },
            ..Default::default()
        };
        match status {
            StatusFilter::All => {}
            StatusFilter::Sent => filter.statuses = Some(CandidateStatus::SENT.to_vec()),
            StatusFilter::Exact(s) => filter.statuses = Some(vec![s]),
            StatusFilter::JoiningThisWeek => filter.reporting_window = Some(week_window(now)),
        }

        Ok((filter, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::candidate;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_week_window_midweek() {
        // Wednesday 2025-03-05
        let window = week_window(at(2025, 3, 5, 15));
        assert_eq!(window.start, at(2025, 3, 2, 0));
        assert_eq!(window.end, at(2025, 3, 9, 0));
    }

    #[test]
    fn test_week_window_on_sunday_starts_today() {
        let window = week_window(at(2025, 3, 9, 8));
        assert_eq!(window.start, at(2025, 3, 9, 0));
        assert_eq!(window.end, at(2025, 3, 16, 0));
    }

    #[test]
    fn test_joining_this_week_is_half_open() {
        let query = ListQuery {
            status: Some("joining_this_week".to_string()),
            ..Default::default()
        };
        let (filter, _) = query.resolve(at(2025, 3, 5, 15)).unwrap();

        let mut inside = candidate("In", Some(5.0));
        inside.reporting_date = Some(at(2025, 3, 2, 0));
        let mut boundary = candidate("Next", Some(5.0));
        boundary.reporting_date = Some(at(2025, 3, 9, 0));
        let mut before = candidate("Before", Some(5.0));
        before.reporting_date = Some(at(2025, 3, 1, 23));
        let undated = candidate("Undated", Some(5.0));

        assert!(filter.matches(&inside));
        assert!(!filter.matches(&boundary));
        assert!(!filter.matches(&before));
        assert!(!filter.matches(&undated));
    }

    #[test]
    fn test_sent_status_expands_to_post_offer_statuses() {
        let query = ListQuery {
            status: Some("sent".to_string()),
            ..Default::default()
        };
        let (filter, _) = query.resolve(Utc::now()).unwrap();
        assert_eq!(filter.statuses.as_deref(), Some(&CandidateStatus::SENT[..]));

        let mut joined = candidate("J", Some(5.0));
        joined.status = CandidateStatus::Joined;
        assert!(filter.matches(&joined));
        assert!(!filter.matches(&candidate("P", Some(5.0))));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let filter = CandidateFilter {
            search: Some("MATH".to_string()),
            ..Default::default()
        };
        let mut c = candidate("Ravi", Some(5.0));
        assert!(!filter.matches(&c));
        c.department = Some("Mathematics".to_string());
        assert!(filter.matches(&c));
    }

    #[test]
    fn test_huge_page_is_rejected() {
        let query = ListQuery {
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert!(matches!(query.resolve(Utc::now()), Err(AppError::Validation(_))));

        let page = Page {
            page: i64::MAX,
            limit: 5,
        };
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn test_email_status_filter() {
        let query = ListQuery {
            email_status: Some("not_sent".to_string()),
            ..Default::default()
        };
        let (filter, page) = query.resolve(Utc::now()).unwrap();
        assert_eq!(filter.email_sent, Some(false));
        assert_eq!(page, Page { page: 1, limit: 5 });
    }

    #[test]
    fn test_invalid_filters_are_validation_errors() {
        let bad_email = ListQuery {
            email_status: Some("bounced".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_email.resolve(Utc::now()), Err(AppError::Validation(_))));

        let bad_status = ListQuery {
            status: Some("withdrawn".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_status.resolve(Utc::now()), Err(AppError::Validation(_))));

        let bad_page = ListQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(bad_page.resolve(Utc::now()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(Page { page: 2, limit: 5 }, 11);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(p.has_prev_page);

        let empty = Pagination::new(Page { page: 1, limit: 5 }, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
        assert!(!empty.has_prev_page);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page { page: 3, limit: 10 }.offset(), 20);
    }
}
