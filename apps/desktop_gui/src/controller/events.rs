//! UI/backend events and error modeling for the desktop GUI controller.

use contact_core::ValidationErrors;
use shared::{
    domain::{FormField, SubmissionStatus},
    protocol::SubmissionRecord,
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    FormStatusChanged(SubmissionStatus),
    FormErrorsReplaced(ValidationErrors),
    FormErrorCleared(FormField),
    FormCleared,
    SubmissionsLoaded(Vec<SubmissionRecord>),
    SubmissionsFetchFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Config,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("config")
        {
            UiErrorCategory::Config
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Transport => "Transport",
            UiErrorCategory::Config => "Configuration",
            UiErrorCategory::Unknown => "Unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusBanner {
    pub severity: StatusBannerSeverity,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_worker_disconnects_as_transport_errors() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend worker unavailable (possible startup failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.label(), "Transport");
    }

    #[test]
    fn classifies_runtime_startup_failures_by_message() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: io error",
        );
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert_eq!(err.category(), UiErrorCategory::Unknown);
    }

    #[test]
    fn classifies_endpoint_problems_as_configuration_errors() {
        let err = UiError::from_message(UiErrorContext::General, "invalid endpoint configured");
        assert_eq!(err.category(), UiErrorCategory::Config);
        assert_eq!(err.label(), "Configuration");
    }
}
