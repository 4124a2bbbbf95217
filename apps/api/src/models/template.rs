use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single offer-email settings record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub company_name: String,
    pub header_text: String,
    pub email_subject: String,
    pub hr_name: String,
    pub hr_phone: String,
    pub hr_email: String,
    pub hr_team_name: String,
    pub company_website: String,
    #[serde(rename = "companyLogoURL")]
    pub company_logo_url: String,
    pub things_to_carry: String,
    /// Monthly PF deduction in rupees.
    pub pf_deduction: i64,
    /// Monthly professional tax in rupees.
    pub professional_tax: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for EmailTemplate {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            company_name: "SchoolPrep Learning (UPRIO)".to_string(),
            header_text: "Welcome Aboard!".to_string(),
            email_subject: "Welcome Aboard!".to_string(),
            hr_name: "Chinmaya Mohapatra".to_string(),
            hr_phone: "+91 97778 92291".to_string(),
            hr_email: "hr@uprio.com".to_string(),
            hr_team_name: "HR Team, Uprio".to_string(),
            company_website: "https://www.uprio.com/".to_string(),
            company_logo_url: String::new(),
            things_to_carry: "Laptop".to_string(),
            pf_deduction: 1800,
            professional_tax: 200,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-level template update. Unknown fields in the request body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub company_name: Option<String>,
    pub header_text: Option<String>,
    pub email_subject: Option<String>,
    pub hr_name: Option<String>,
    pub hr_phone: Option<String>,
    pub hr_email: Option<String>,
    pub hr_team_name: Option<String>,
    pub company_website: Option<String>,
    #[serde(rename = "companyLogoURL")]
    pub company_logo_url: Option<String>,
    pub things_to_carry: Option<String>,
    pub pf_deduction: Option<i64>,
    pub professional_tax: Option<i64>,
}

#[cfg(test)]
impl TemplatePatch {
    pub fn apply_to(self, template: &mut EmailTemplate) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut template.company_name, self.company_name);
        set(&mut template.header_text, self.header_text);
        set(&mut template.email_subject, self.email_subject);
        set(&mut template.hr_name, self.hr_name);
        set(&mut template.hr_phone, self.hr_phone);
        set(&mut template.hr_email, self.hr_email);
        set(&mut template.hr_team_name, self.hr_team_name);
        set(&mut template.company_website, self.company_website);
        set(&mut template.company_logo_url, self.company_logo_url);
        set(&mut template.things_to_carry, self.things_to_carry);
        set(&mut template.pf_deduction, self.pf_deduction);
        set(&mut template.professional_tax, self.professional_tax);
        template.updated_at = Utc::now();
    }
}
