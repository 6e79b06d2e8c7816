//! Email relay client.

use serde_json::{Map, Value, json};
use thiserror::Error;

use super::validation::Submission;
use crate::config::ContactConfig;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("email relay is not configured")]
    NotConfigured,

    #[error("request to email relay failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email relay returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Delivers contact submissions.
#[async_trait::async_trait]
pub trait EmailRelay: Send + Sync {
    async fn send(&self, submission: &Submission) -> Result<(), RelayError>;
}

/// Request body for the hosted relay.
pub fn relay_payload(config: &ContactConfig, submission: &Submission) -> Value {
    let mut params = Map::new();
    params.insert(config.name_field.clone(), json!(submission.name));
    params.insert(config.email_field.clone(), json!(submission.email));
    params.insert(config.message_field.clone(), json!(submission.message));

    json!({
        "service_id": config.service_id,
        "template_id": config.template_id,
        "user_id": config.public_key,
        "template_params": params,
    })
}

/// Posts submissions to an EmailJS-style HTTP endpoint. No retries.
pub struct HttpEmailRelay {
    client: reqwest::Client,
    config: ContactConfig,
}

impl HttpEmailRelay {
    pub fn new(config: ContactConfig, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl EmailRelay for HttpEmailRelay {
    async fn send(&self, submission: &Submission) -> Result<(), RelayError> {
        if self.config.service_id.is_empty() || self.config.template_id.is_empty() {
            return Err(RelayError::NotConfigured);
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&relay_payload(&self.config, submission))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
