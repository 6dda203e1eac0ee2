//! Outbound mail
//!
//! Mail delivery goes through a relay HTTP API. Handlers treat delivery
//! failures per flow (signup keeps going, forgot-password rolls back),
//! so the trait only reports success or failure per message.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(String),

    #[error("Mail relay rejected message: status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mailer that posts messages to a JSON relay endpoint.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = OutboundMessage {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                error!("Mail relay request failed: {}", e);
                MailError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            error!(
                "Mail relay rejected message to {}: status {}",
                to,
                response.status()
            );
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        info!("Sent mail to {}: {}", to, subject);
        Ok(())
    }
}

/// Mailer that logs messages instead of delivering them. Used when no
/// relay is configured, so flows stay exercisable in development.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!("Mail (log only) to {}: {}\n{}", to, subject, body);
        Ok(())
    }
}
