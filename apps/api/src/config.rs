use std::time::Duration;

use anyhow::{Context, Result};

use crate::candidates::status::StatusFlagCoupling;
use crate::mailer::MailerConfig;
use crate::offers::sender::SendSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub mail_from_name: String,
    pub send_timeout: Duration,
    pub bulk_send_concurrency: usize,
    pub status_flag_coupling: StatusFlagCoupling,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            smtp_host: require_env("SMTP_HOST")?,
            smtp_port: parse_env("SMTP_PORT", 587)?,
            smtp_user: require_env("SMTP_USER")?,
            smtp_password: require_env("SMTP_PASSWORD")?,
            mail_from_name: std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "HR Team".to_string()),
            send_timeout: Duration::from_secs(parse_env("SEND_TIMEOUT_SECS", 30)?),
            bulk_send_concurrency: parse_env("BULK_SEND_CONCURRENCY", 4)?,
            status_flag_coupling: match std::env::var("STATUS_FLAG_COUPLING") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))
                    .context("STATUS_FLAG_COUPLING must be 'on' or 'off'")?,
                Err(_) => StatusFlagCoupling::Enforced,
            },
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn mailer(&self) -> MailerConfig {
        MailerConfig {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            username: self.smtp_user.clone(),
            password: self.smtp_password.clone(),
            from_name: self.mail_from_name.clone(),
            timeout: self.send_timeout,
        }
    }

    pub fn send_settings(&self) -> SendSettings {
        SendSettings {
            send_timeout: self.send_timeout,
            bulk_concurrency: self.bulk_send_concurrency,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
