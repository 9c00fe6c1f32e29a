use shared::domain::FormField;

use crate::{FormFields, ValidationErrors};

pub(crate) const NAME_REQUIRED: &str = "Name is required.";
pub(crate) const EMAIL_REQUIRED: &str = "Email is required.";
pub(crate) const EMAIL_INVALID: &str = "Enter a valid email address.";
pub(crate) const SUBJECT_REQUIRED: &str = "Subject is required.";
pub(crate) const MESSAGE_REQUIRED: &str = "Message is required.";
pub(crate) const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters.";
pub(crate) const RECAPTCHA_REQUIRED: &str = "Please verify you are not a robot.";

const MESSAGE_MIN_CHARS: usize = 10;

/// Checks every rule in one pass and returns the full violation map, at most
/// one message per field. Empty means the form may be sent. Whitespace-only
/// input counts as empty, and the message length is measured after trimming.
pub fn validate(fields: &FormFields, token: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if fields.name.trim().is_empty() {
        errors.insert(FormField::Name, NAME_REQUIRED.to_string());
    }

    let email = fields.email.trim();
    if email.is_empty() {
        errors.insert(FormField::Email, EMAIL_REQUIRED.to_string());
    } else if !is_valid_email(email) {
        errors.insert(FormField::Email, EMAIL_INVALID.to_string());
    }

    if fields.subject.trim().is_empty() {
        errors.insert(FormField::Subject, SUBJECT_REQUIRED.to_string());
    }

    let message = fields.message.trim();
    if message.is_empty() {
        errors.insert(FormField::Message, MESSAGE_REQUIRED.to_string());
    } else if message.chars().count() < MESSAGE_MIN_CHARS {
        errors.insert(FormField::Message, MESSAGE_TOO_SHORT.to_string());
    }

    if token.map_or(true, |t| t.trim().is_empty()) {
        errors.insert(FormField::Recaptcha, RECAPTCHA_REQUIRED.to_string());
    }

    errors
}

/// Standard shape only: no whitespace, a non-empty local part, and a domain
/// with an interior dot. Full address parsing is the collection service's
/// problem.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain.find('.').is_some_and(|first| first > 0)
        && domain.rfind('.').is_some_and(|last| last + 1 < domain.len())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
