use serde::{Deserialize, Serialize};

use crate::common::MailError;
use crate::config::SiteConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

/// Transactional email through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    from: String,
    to: String,
}

impl Mailer {
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: RESEND_ENDPOINT.to_string(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &SiteConfig, http: reqwest::Client) -> Option<Self> {
        let api_key = config.resend_api_key.as_deref()?;
        Some(Self::new(
            http,
            api_key,
            config.contact_from.as_str(),
            config.contact_to.as_str(),
        ))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sends the email and returns the provider's message id.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        let request = ResendRequest {
            from: &self.from,
            to: [&self.to],
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let sent: ResendResponse = response.json().await?;
        Ok(sent.id)
    }
}
