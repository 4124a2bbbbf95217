use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;
use uuid::Uuid;

use super::{DeliveryId, MailError, Mailer, OutgoingMail};

/// Sender credentials and relay settings for [`SmtpMailer`].
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Display name on the From header.
    pub from_name: String,
    pub timeout: Duration,
}

/// STARTTLS SMTP relay backed by lettre's pooled tokio transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, MailError> {
        let address: Address = config
            .username
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {e}", config.username)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }

    fn build_message(&self, mail: OutgoingMail, message_id: &str) -> Result<Message, MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {e}", mail.to)))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .message_id(Some(message_id.to_string()));

        let html = SinglePart::html(mail.html);
        let message = match mail.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| MailError::Build(e.to_string()))?;
                builder.multipart(
                    MultiPart::mixed().singlepart(html).singlepart(
                        Attachment::new(attachment.filename)
                            .body(attachment.data.to_vec(), content_type),
                    ),
                )
            }
            None => builder.singlepart(html),
        };
        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryId, MailError> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain());
        let recipient = mail.to.clone();
        let message = self.build_message(mail, &message_id)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        debug!(
            "SMTP accepted {message_id} for {recipient}: {}",
            response.code()
        );
        Ok(DeliveryId(message_id))
    }
}
