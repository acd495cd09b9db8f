// ============================
// crates/backend-lib/src/mail.rs
// ============================
//! Outgoing mail.
//!
//! `SmtpMailer` relays through an SMTP server; `LogMailer` only writes the
//! message to the log and is used when no relay is configured.
use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpSettings;

/// Errors that can occur when sending mail
#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A mail with HTML and plain-text bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Transport acknowledgement for a sent mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailReceipt {
    pub detail: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<MailReceipt, MailError>;
}

/// Mailer backed by an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> Result<MailReceipt, MailError> {
        let message = Message::builder()
            .from(
                mail.from
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(mail.from.clone()))?,
            )
            .to(mail
                .to
                .parse()
                .map_err(|_| MailError::InvalidAddress(mail.to.clone()))?)
            .subject(mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html),
                    ),
            )?;

        let response = self.transport.send(message).await?;
        Ok(MailReceipt {
            detail: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}

/// Mailer that only logs what it would send
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<MailReceipt, MailError> {
        tracing::info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "mail not sent (no SMTP relay configured)"
        );
        // Bodies may carry live reset tokens
        tracing::debug!(to = %mail.to, "unsent mail body:\n{}", mail.text);
        Ok(MailReceipt {
            detail: "logged".to_string(),
        })
    }
}

/// HTML body of the password-reset mail
#[derive(Template)]
#[template(path = "email/reset.html")]
struct ResetEmailHtml<'a> {
    link: &'a str,
}

/// Plain-text body of the password-reset mail
#[derive(Template)]
#[template(path = "email/reset.txt")]
struct ResetEmailText<'a> {
    link: &'a str,
}

/// Password-reset mail carrying a link to `reset_url?resetToken=<token>`
pub fn reset_email(from: &str, to: &str, reset_url: &str, token: &str) -> Result<Mail, MailError> {
    let link = format!("{reset_url}?resetToken={token}");
    Ok(Mail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your Password Reset Token".to_string(),
        html: ResetEmailHtml { link: &link }.render()?,
        text: ResetEmailText { link: &link }.render()?,
    })
}
