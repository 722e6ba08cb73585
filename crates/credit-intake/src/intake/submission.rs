//! Client for the remote decision service.
//!
//! One `POST` per submission, no retries. Failures are split into rejected
//! responses (the service answered with a non-success status) and transport
//! failures (no usable response at all).

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::ApplicationData;
use crate::config::DecisionServiceConfig;

pub const PREDICT_PATH: &str = "/api/predict/";
pub const GENERIC_FAILURE: &str = "An error occurred while processing your application";

/// Decision payload returned by the service, kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionResult(pub Value);

impl DecisionResult {
    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{message}")]
    InvalidBody { status: u16, message: String },
    #[error("{message}")]
    Transport { message: String },
}

impl SubmissionError {
    /// Text shown in the error overlay.
    pub fn message(&self) -> &str {
        match self {
            SubmissionError::Rejected { message, .. }
            | SubmissionError::InvalidBody { message, .. }
            | SubmissionError::Transport { message } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Rejected { status, .. }
            | SubmissionError::InvalidBody { status, .. } => Some(*status),
            SubmissionError::Transport { .. } => None,
        }
    }
}

/// Seam between the session driver and whatever evaluates applications.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    async fn submit(&self, application: &ApplicationData)
        -> Result<DecisionResult, SubmissionError>;
}

/// Production client posting JSON over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpDecisionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDecisionClient {
    pub fn new(config: &DecisionServiceConfig) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| SubmissionError::Transport {
            message: err.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint: config.predict_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DecisionClient for HttpDecisionClient {
    #[tracing::instrument(
        skip(self, application),
        fields(applicant_id = %application.applicant_id, endpoint = %self.endpoint)
    )]
    async fn submit(
        &self,
        application: &ApplicationData,
    ) -> Result<DecisionResult, SubmissionError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(application)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "decision request failed");
                SubmissionError::Transport {
                    message: err.to_string(),
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            tracing::error!(status, error = %err, "failed to read decision response");
            SubmissionError::Transport {
                message: err.to_string(),
            }
        })?;

        tracing::info!(
            status,
            response_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "decision service responded"
        );

        interpret_response(status, &body)
    }
}

/// Maps a status and raw body onto the submission outcome.
pub fn interpret_response(status: u16, body: &str) -> Result<DecisionResult, SubmissionError> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<Value>(body)
            .map(DecisionResult)
            .map_err(|err| SubmissionError::InvalidBody {
                status,
                message: err.to_string(),
            });
    }

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    tracing::warn!(status, %message, "decision service rejected application");
    Err(SubmissionError::Rejected { status, message })
}
