use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SubmissionId;

/// Payload posted to the collection endpoint. Field names are part of the
/// wire contract; the token key is camel-cased by that contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(rename = "recaptchaToken")]
    pub recaptcha_token: String,
}

/// Stored submission as returned by the submissions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
