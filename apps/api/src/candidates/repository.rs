use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::candidates::filter::{CandidateFilter, DateWindow, Page};
use crate::candidates::stats::CandidateStats;
use crate::candidates::status::CandidateStatus;
use crate::errors::AppError;
use crate::models::candidate::Candidate;

const CANDIDATE_COLUMNS: &str = "id, full_name, email, phone, position, department, \
     reporting_address, reporting_date, reporting_time, salary_lpa, offer_letter_pdf, \
     is_email_sent, status, created_at, updated_at";

/// Candidate persistence. Carried in `AppState` as `Arc<dyn CandidateRepository>`.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, filter: &CandidateFilter, page: Page) -> Result<Vec<Candidate>, AppError>;
    async fn count(&self, filter: &CandidateFilter) -> Result<i64, AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, AppError>;
    /// Ids with no matching record are simply absent from the result.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Candidate>, AppError>;
    async fn insert(&self, candidate: &Candidate) -> Result<Candidate, AppError>;
    /// Writes every mutable field and bumps `updated_at`.
    async fn update(&self, candidate: &Candidate) -> Result<Candidate, AppError>;
    async fn delete(&self, id: Uuid) -> Result<Option<Candidate>, AppError>;
    /// Sets `isEmailSent = true` and `status = offer_sent` in one write.
    async fn mark_offer_sent(&self, id: Uuid) -> Result<Candidate, AppError>;
    async fn stats(&self, week: DateWindow) -> Result<CandidateStats, AppError>;
}

#[derive(Clone)]
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CandidateFilter) {
    qb.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (");
        for (i, column) in ["full_name", "email", "phone", "position", "department"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        qb.push(")");
    }
    if let Some(sent) = filter.email_sent {
        qb.push(" AND is_email_sent = ").push_bind(sent);
    }
    if let Some(statuses) = &filter.statuses {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" AND status = ANY(").push_bind(statuses).push(")");
    }
    if let Some(window) = filter.reporting_window {
        qb.push(" AND reporting_date >= ")
            .push_bind(window.start)
            .push(" AND reporting_date < ")
            .push_bind(window.end);
    }
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn list(&self, filter: &CandidateFilter, page: Page) -> Result<Vec<Candidate>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CANDIDATE_COLUMNS} FROM candidates"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        Ok(qb.build_query_as::<Candidate>().fetch_all(&self.pool).await?)
    }

    async fn count(&self, filter: &CandidateFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM candidates");
        push_filter(&mut qb, filter);

        Ok(qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Candidate>, AppError> {
        Ok(sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        Ok(sqlx::query_as::<_, Candidate>(&format!(
            r#"
            INSERT INTO candidates
                (id, full_name, email, phone, position, department, reporting_address,
                 reporting_date, reporting_time, salary_lpa, offer_letter_pdf,
                 is_email_sent, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(candidate.id)
        .bind(&candidate.full_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.position)
        .bind(&candidate.department)
        .bind(&candidate.reporting_address)
        .bind(candidate.reporting_date)
        .bind(&candidate.reporting_time)
        .bind(candidate.salary_lpa)
        .bind(&candidate.offer_letter_pdf)
        .bind(candidate.is_email_sent)
        .bind(candidate.status.as_str())
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates SET
                full_name = $2, email = $3, phone = $4, position = $5, department = $6,
                reporting_address = $7, reporting_date = $8, reporting_time = $9,
                salary_lpa = $10, offer_letter_pdf = $11, is_email_sent = $12, status = $13,
                updated_at = now()
            WHERE id = $1
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(candidate.id)
        .bind(&candidate.full_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.position)
        .bind(&candidate.department)
        .bind(&candidate.reporting_address)
        .bind(candidate.reporting_date)
        .bind(&candidate.reporting_time)
        .bind(candidate.salary_lpa)
        .bind(&candidate.offer_letter_pdf)
        .bind(candidate.is_email_sent)
        .bind(candidate.status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", candidate.id)))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(sqlx::query_as::<_, Candidate>(&format!(
            "DELETE FROM candidates WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn mark_offer_sent(&self, id: Uuid) -> Result<Candidate, AppError> {
        sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates
            SET is_email_sent = TRUE, status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(CandidateStatus::OfferSent.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
    }

    async fn stats(&self, week: DateWindow) -> Result<CandidateStats, AppError> {
        let row: (i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'offer_sent'),
                COUNT(*) FILTER (WHERE status = 'accepted'),
                COUNT(*) FILTER (WHERE status = 'rejected'),
                COUNT(*) FILTER (WHERE status = 'joined'),
                COUNT(*) FILTER (WHERE is_email_sent),
                COUNT(*) FILTER (WHERE reporting_date >= $1 AND reporting_date < $2)
            FROM candidates
            "#,
        )
        .bind(week.start)
        .bind(week.end)
        .fetch_one(&self.pool)
        .await?;

        let (total, pending, offer_sent, accepted, rejected, joined, email_sent, joining_this_week) =
            row;
        Ok(CandidateStats {
            total,
            pending,
            offer_sent,
            accepted,
            rejected,
            joined,
            email_sent,
            email_not_sent: total - email_sent,
            joining_this_week,
        })
    }
}
