use super::*;

fn fields(name: &str, email: &str, subject: &str, message: &str) -> FormFields {
    FormFields {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
    }
}

#[test]
fn clean_form_with_token_produces_no_errors() {
    let fields = fields(
        "Ada Lovelace",
        "ada@example.com",
        "Engines",
        "I would like to know more about the analytical engine.",
    );
    assert!(validate(&fields, Some("tok-123")).is_empty());
}

#[test]
fn collects_every_violation_in_one_pass() {
    let errors = validate(&fields("", "", "", ""), None);

    assert_eq!(errors.len(), 5);
    assert_eq!(errors[&FormField::Name], NAME_REQUIRED);
    assert_eq!(errors[&FormField::Email], EMAIL_REQUIRED);
    assert_eq!(errors[&FormField::Subject], SUBJECT_REQUIRED);
    assert_eq!(errors[&FormField::Message], MESSAGE_REQUIRED);
    assert_eq!(errors[&FormField::Recaptcha], RECAPTCHA_REQUIRED);
}

#[test]
fn short_message_is_the_only_violation() {
    let errors = validate(&fields("Jo", "jo@x.com", "Hi", "Short"), Some("tok"));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[&FormField::Message], MESSAGE_TOO_SHORT);
}

#[test]
fn clean_fields_without_token_flag_verification_only() {
    let errors = validate(
        &fields("Jo", "jo@x.com", "Hi", "A long enough message."),
        None,
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[&FormField::Recaptcha], RECAPTCHA_REQUIRED);
}

#[test]
fn whitespace_only_fields_count_as_empty() {
    let errors = validate(&fields("   ", " \t ", "  ", "         "), Some("tok"));

    assert_eq!(errors[&FormField::Name], NAME_REQUIRED);
    assert_eq!(errors[&FormField::Email], EMAIL_REQUIRED);
    assert_eq!(errors[&FormField::Subject], SUBJECT_REQUIRED);
    assert_eq!(errors[&FormField::Message], MESSAGE_REQUIRED);
}

#[test]
fn whitespace_only_token_counts_as_absent() {
    let errors = validate(
        &fields("Jo", "jo@x.com", "Hi", "A long enough message."),
        Some("   "),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[&FormField::Recaptcha], RECAPTCHA_REQUIRED);
}

#[test]
fn message_length_counts_characters_after_trimming() {
    let too_short = validate(&fields("Jo", "jo@x.com", "Hi", "  123456789  "), Some("t"));
    assert_eq!(too_short[&FormField::Message], MESSAGE_TOO_SHORT);

    let exactly_ten = validate(&fields("Jo", "jo@x.com", "Hi", "1234567890"), Some("t"));
    assert!(!exactly_ten.contains_key(&FormField::Message));

    let multibyte = validate(&fields("Jo", "jo@x.com", "Hi", "ñañañañaña"), Some("t"));
    assert!(!multibyte.contains_key(&FormField::Message));
}

#[test]
fn empty_email_reports_required_not_invalid() {
    let errors = validate(&fields("Jo", "", "Hi", "A long enough message."), Some("t"));
    assert_eq!(errors[&FormField::Email], EMAIL_REQUIRED);
}

#[test]
fn email_must_have_local_part_and_dotted_domain() {
    let valid = [
        "jo@x.com",
        "user@mail.example.co.uk",
        "first.last+tag@example.org",
    ];
    for email in valid {
        let errors = validate(&fields("Jo", email, "Hi", "A long enough message."), Some("t"));
        assert!(
            !errors.contains_key(&FormField::Email),
            "expected {email} to pass"
        );
    }

    let invalid = ["plainaddress", "a@b", "a@b.", "a@.b", "a b@c.d", "@x.com"];
    for email in invalid {
        let errors = validate(&fields("Jo", email, "Hi", "A long enough message."), Some("t"));
        assert_eq!(
            errors.get(&FormField::Email).map(String::as_str),
            Some(EMAIL_INVALID),
            "expected {email} to be rejected"
        );
    }
}

#[test]
fn repeated_validation_is_stable() {
    let fields = fields("", "not-an-email", "", "tiny");
    let first = validate(&fields, None);
    let second = validate(&fields, None);
    assert_eq!(first, second);
}
