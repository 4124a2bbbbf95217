use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::template::{EmailTemplate, TemplatePatch};

/// Primary key of the only row `email_templates` may hold.
const SINGLETON_ID: i16 = 1;

const TEMPLATE_COLUMNS: &str = "company_name, header_text, email_subject, hr_name, hr_phone, \
     hr_email, hr_team_name, company_website, company_logo_url, things_to_carry, \
     pf_deduction, professional_tax, created_at, updated_at";

/// Access to the offer-email settings singleton.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Returns the stored template, creating it with defaults on first read.
    async fn get_or_create(&self) -> Result<EmailTemplate, AppError>;
    /// Field-level patch; concurrent writers resolve last-writer-wins per field.
    async fn update(&self, patch: TemplatePatch) -> Result<EmailTemplate, AppError>;
}

#[derive(Clone)]
pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_row(&self) -> Result<(), AppError> {
        let defaults = EmailTemplate::default();
        sqlx::query(
            r#"
            INSERT INTO email_templates
                (id, company_name, header_text, email_subject, hr_name, hr_phone, hr_email,
                 hr_team_name, company_website, company_logo_url, things_to_carry,
                 pf_deduction, professional_tax)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(SINGLETON_ID)
        .bind(&defaults.company_name)
        .bind(&defaults.header_text)
        .bind(&defaults.email_subject)
        .bind(&defaults.hr_name)
        .bind(&defaults.hr_phone)
        .bind(&defaults.hr_email)
        .bind(&defaults.hr_team_name)
        .bind(&defaults.company_website)
        .bind(&defaults.company_logo_url)
        .bind(&defaults.things_to_carry)
        .bind(defaults.pf_deduction)
        .bind(defaults.professional_tax)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn get_or_create(&self) -> Result<EmailTemplate, AppError> {
        self.ensure_row().await?;

        Ok(sqlx::query_as::<_, EmailTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = $1"
        ))
        .bind(SINGLETON_ID)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, patch: TemplatePatch) -> Result<EmailTemplate, AppError> {
        self.ensure_row().await?;

        Ok(sqlx::query_as::<_, EmailTemplate>(&format!(
            r#"
            UPDATE email_templates SET
                company_name = COALESCE($2, company_name),
                header_text = COALESCE($3, header_text),
                email_subject = COALESCE($4, email_subject),
                hr_name = COALESCE($5, hr_name),
                hr_phone = COALESCE($6, hr_phone),
                hr_email = COALESCE($7, hr_email),
                hr_team_name = COALESCE($8, hr_team_name),
                company_website = COALESCE($9, company_website),
                company_logo_url = COALESCE($10, company_logo_url),
                things_to_carry = COALESCE($11, things_to_carry),
                pf_deduction = COALESCE($12, pf_deduction),
                professional_tax = COALESCE($13, professional_tax),
                updated_at = now()
            WHERE id = $1
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(SINGLETON_ID)
        .bind(patch.company_name)
        .bind(patch.header_text)
        .bind(patch.email_subject)
        .bind(patch.hr_name)
        .bind(patch.hr_phone)
        .bind(patch.hr_email)
        .bind(patch.hr_team_name)
        .bind(patch.company_website)
        .bind(patch.company_logo_url)
        .bind(patch.things_to_carry)
        .bind(patch.pf_deduction)
        .bind(patch.professional_tax)
        .fetch_one(&self.pool)
        .await?)
    }
}
