use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use shared::{
    domain::{FormField, SubmissionStatus},
    protocol::{ContactRequest, SubmissionRecord},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

pub mod config;
pub mod validation;

pub use config::{load_settings, ContactConfig, DEFAULT_API_URL, DEFAULT_SITE_KEY};
pub use validation::validate;

const FORM_EVENT_CAPACITY: usize = 1024;

/// Validation messages keyed by the field they belong to. Recomputed as a
/// whole on every submit attempt; individual entries are removed as the
/// visitor edits the offending field.
pub type ValidationErrors = HashMap<FormField, String>;

/// Why a call to the collection endpoint failed. Absorbed at the submission
/// boundary: logged and converted to a status transition, never surfaced to
/// the visitor.
#[derive(Debug, Error)]
pub enum SubmissionTransportError {
    #[error("failed to reach collection service: {0}")]
    Network(reqwest::Error),
    #[error("collection service rejected the submission: {0}")]
    Rejected(reqwest::Error),
}

/// Why reading stored submissions failed. Callers decide how loudly to
/// report it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach submissions service: {0}")]
    Network(reqwest::Error),
    #[error("submissions service returned an error: {0}")]
    Rejected(reqwest::Error),
    #[error("invalid submissions payload: {0}")]
    Decode(reqwest::Error),
}

/// Capability handle to the bot-deterrence widget hosted by the embedding
/// view. The state machine only ever reads the current token and asks for a
/// reset after a delivered submission.
pub trait CaptchaWidget: Send + Sync {
    /// Current verification token, if the visitor has completed the challenge.
    fn token(&self) -> Option<String>;
    /// Discard any held token so the next submission needs a fresh challenge.
    fn reset(&self);
}

/// Fallback for hosts without a widget. Every submission fails the
/// verification rule until a real widget is wired in.
pub struct MissingCaptchaWidget;

impl CaptchaWidget for MissingCaptchaWidget {
    fn token(&self) -> Option<String> {
        None
    }

    fn reset(&self) {}
}

/// Widget with a pre-issued token, for terminal clients and tests.
pub struct FixedTokenWidget {
    token: Option<String>,
}

impl FixedTokenWidget {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn absent() -> Self {
        Self { token: None }
    }
}

impl CaptchaWidget for FixedTokenWidget {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn reset(&self) {}
}

/// Manually operated challenge. The hosting view marks it complete, which
/// mints an opaque token; a successful submission resets it. Clones share
/// one token slot, so a view and a backend worker can hold the same widget.
#[derive(Clone, Default)]
pub struct ManualCaptchaWidget {
    token: Arc<Mutex<Option<String>>>,
}

impl ManualCaptchaWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(Uuid::new_v4().simple().to_string());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.token
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}

impl CaptchaWidget for ManualCaptchaWidget {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|slot| slot.clone())
    }

    fn reset(&self) {
        self.clear();
    }
}

/// The four visitor-supplied fields. Owned by the state machine for the
/// lifetime of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
            FormField::Recaptcha => "",
        }
    }

    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Subject => self.subject = value,
            FormField::Message => self.message = value,
            // The token lives in the widget, not the form.
            FormField::Recaptcha => {}
        }
    }
}

/// Everything a rendering layer needs to draw the form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub fields: FormFields,
    pub errors: ValidationErrors,
    pub status: SubmissionStatus,
}

/// State transitions broadcast to observers while a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    StatusChanged(SubmissionStatus),
    ErrorsReplaced(ValidationErrors),
    ErrorCleared(FormField),
    FieldsReset,
}

/// Client-side submission state machine. One instance drives one form:
/// it owns the field values, the current validation errors, and the
/// lifecycle status, and talks to the collection endpoint over HTTP.
pub struct ContactFormClient<W: CaptchaWidget> {
    http: Client,
    config: ContactConfig,
    widget: W,
    pub state: FormState,
    events: broadcast::Sender<FormEvent>,
}

impl<W: CaptchaWidget> ContactFormClient<W> {
    pub fn new(config: ContactConfig, widget: W) -> Self {
        let (events, _) = broadcast::channel(FORM_EVENT_CAPACITY);
        Self {
            http: Client::new(),
            config,
            widget,
            state: FormState::default(),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Stores a field edit and clears that field's error, if one is showing.
    /// Never re-validates and never touches the other fields.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.fields.set(field, value.into());
        if self.state.errors.remove(&field).is_some() {
            self.emit(FormEvent::ErrorCleared(field));
        }
    }

    /// Runs one submission attempt end to end: validates, and only when the
    /// form is clean posts it to the collection endpoint. On delivery the
    /// fields are cleared and the widget is reset; on transport failure the
    /// visitor's input stays put so they can retry. Returns the resulting
    /// status.
    pub async fn submit(&mut self) -> SubmissionStatus {
        let token = self.widget.token();
        let errors = validation::validate(&self.state.fields, token.as_deref());
        let blocked = !errors.is_empty();
        self.state.errors = errors;
        self.emit(FormEvent::ErrorsReplaced(self.state.errors.clone()));
        if blocked {
            return self.state.status;
        }

        self.set_status(SubmissionStatus::Loading);

        let request = ContactRequest {
            name: self.state.fields.name.clone(),
            email: self.state.fields.email.clone(),
            subject: self.state.fields.subject.clone(),
            message: self.state.fields.message.clone(),
            recaptcha_token: token.unwrap_or_default(),
        };

        match self.post_submission(&request).await {
            Ok(()) => {
                info!("collection service accepted the submission");
                self.state.fields = FormFields::default();
                self.widget.reset();
                self.set_status(SubmissionStatus::Success);
                self.emit(FormEvent::FieldsReset);
            }
            Err(err) => {
                warn!(error = %err, "contact submission failed");
                self.set_status(SubmissionStatus::Error);
            }
        }

        self.state.status
    }

    async fn post_submission(
        &self,
        request: &ContactRequest,
    ) -> Result<(), SubmissionTransportError> {
        self.http
            .post(&self.config.api_url)
            .json(request)
            .send()
            .await
            .map_err(SubmissionTransportError::Network)?
            .error_for_status()
            .map_err(SubmissionTransportError::Rejected)?;
        Ok(())
    }

    fn set_status(&mut self, status: SubmissionStatus) {
        self.state.status = status;
        self.emit(FormEvent::StatusChanged(status));
    }

    fn emit(&self, event: FormEvent) {
        let _ = self.events.send(event);
    }
}

/// Read-side client for dashboard views and tooling.
pub struct SubmissionsClient {
    http: Client,
    url: String,
}

impl SubmissionsClient {
    pub fn new(config: &ContactConfig) -> Self {
        Self {
            http: Client::new(),
            url: config.submissions_url(),
        }
    }

    /// Fetches every stored submission. The service has no pagination or
    /// filtering; ordering is whatever it returns.
    pub async fn fetch_all(&self) -> Result<Vec<SubmissionRecord>, FetchError> {
        let records = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Rejected)?
            .json::<Vec<SubmissionRecord>>()
            .await
            .map_err(FetchError::Decode)?;
        info!(count = records.len(), "fetched stored submissions");
        Ok(records)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
