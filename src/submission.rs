use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use validator::Validate;

pub const MAX_FIELD_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 2000;

const STRIPPED_CHARS: [char; 5] = ['<', '>', '\'', '"', '&'];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Contact form fields exactly as the visitor typed them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl SubmissionInput {
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    pub fn sanitized(&self) -> SanitizedSubmission {
        SanitizedSubmission {
            name: sanitize(&self.name, MAX_FIELD_CHARS),
            email: sanitize(&self.email, MAX_FIELD_CHARS),
            subject: sanitize(&self.subject, MAX_FIELD_CHARS),
            message: sanitize(&self.message, MAX_MESSAGE_CHARS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct SanitizedSubmission {
    #[validate(length(min = 2))]
    pub name: String,
    #[validate(custom(function = "validate_email_shape"))]
    pub email: String,
    #[validate(length(min = 3))]
    pub subject: String,
    #[validate(length(min = 10))]
    pub message: String,
}

impl SanitizedSubmission {
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|field| !field.is_empty())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingField,
    #[error("Name must be at least 2 characters long.")]
    NameTooShort,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Subject must be at least 3 characters long.")]
    SubjectTooShort,
    #[error("Message must be at least 10 characters long.")]
    MessageTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Network,
    RateLimited,
    ServerMisconfigured,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
}

impl SubmissionOutcome {
    pub fn success() -> Self {
        Self {
            ok: true,
            error_category: None,
        }
    }

    pub fn failure(category: ErrorCategory) -> Self {
        Self {
            ok: false,
            error_category: Some(category),
        }
    }
}

/// Strips markup and the characters `< > ' " &`, trims, and caps the result at `max_chars`.
pub fn sanitize(value: &str, max_chars: usize) -> String {
    let untagged = TAG.replace_all(value, "");
    untagged
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .chars()
        .take(max_chars)
        .collect()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

fn validate_email_shape(value: &str) -> Result<(), validator::ValidationError> {
    if is_valid_email(value) {
        return Ok(());
    }
    Err(validator::ValidationError::new("email_shape"))
}

/// Sanitizes every field, then reports the first broken rule in form order.
pub fn validate(input: &SubmissionInput) -> Result<SanitizedSubmission, ValidationError> {
    let submission = input.sanitized();
    if !submission.is_complete() {
        return Err(ValidationError::MissingField);
    }
    let Err(errors) = submission.validate() else {
        return Ok(submission);
    };
    let failed = errors.field_errors();
    let ordered = [
        ("name", ValidationError::NameTooShort),
        ("email", ValidationError::InvalidEmail),
        ("subject", ValidationError::SubjectTooShort),
        ("message", ValidationError::MessageTooShort),
    ];
    let first = ordered
        .into_iter()
        .find(|(field, _)| failed.contains_key(*field))
        .map(|(_, error)| error)
        .unwrap_or(ValidationError::MissingField);
    Err(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> SubmissionInput {
        SubmissionInput::new("Jo", "jo@x.com", "Hi there", "This is a test message.")
    }

    #[test]
    fn test_sanitize_strips_script() {
        let cleaned = sanitize("<script>alert(1)</script>Hello", MAX_FIELD_CHARS);
        assert!(cleaned.contains("Hello"));
        for c in STRIPPED_CHARS {
            assert!(!cleaned.contains(c));
        }
    }

    #[test]
    fn test_sanitize_removes_unclosed_brackets() {
        let cleaned = sanitize("5 > 3 & 'x'", MAX_FIELD_CHARS);
        assert_eq!(cleaned, "5  3  x");
    }

    #[test]
    fn test_sanitize_truncates_message() {
        let long = "a".repeat(MAX_MESSAGE_CHARS + 500);
        assert_eq!(sanitize(&long, MAX_MESSAGE_CHARS).chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_sanitize_counts_chars_not_bytes() {
        let long = "é".repeat(MAX_FIELD_CHARS + 1);
        let cleaned = sanitize(&long, MAX_FIELD_CHARS);
        assert_eq!(cleaned.chars().count(), MAX_FIELD_CHARS);
    }

    #[test]
    fn test_is_valid_email_works() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn test_validate_works() {
        let submission = validate(&valid_input()).expect("Failed to validate");
        assert_eq!(submission.name, "Jo");
        assert_eq!(submission.email, "jo@x.com");
    }

    #[test]
    fn test_validate_whitespace_field_fails() {
        let mut input = valid_input();
        input.subject = "   ".to_string();
        assert_eq!(validate(&input), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_validate_markup_only_field_fails() {
        let mut input = valid_input();
        input.name = "<b></b>".to_string();
        assert_eq!(validate(&input), Err(ValidationError::MissingField));
    }

    #[test]
    fn test_validate_reports_first_rule_in_order() {
        let input = SubmissionInput::new("J", "nope", "Hi", "short");
        assert_eq!(validate(&input), Err(ValidationError::NameTooShort));

        let input = SubmissionInput::new("Jo", "nope", "Hi", "short");
        assert_eq!(validate(&input), Err(ValidationError::InvalidEmail));

        let input = SubmissionInput::new("Jo", "jo@x.com", "Hi", "short");
        assert_eq!(validate(&input), Err(ValidationError::SubjectTooShort));

        let input = SubmissionInput::new("Jo", "jo@x.com", "Hey", "short");
        assert_eq!(validate(&input), Err(ValidationError::MessageTooShort));
    }

    #[test]
    fn test_validate_uses_sanitized_lengths() {
        let mut input = valid_input();
        input.message = "<p>hi</p> <em>there</em>".to_string();
        assert_eq!(validate(&input), Err(ValidationError::MessageTooShort));
    }

    #[test]
    fn test_outcome_serialization_works() {
        let outcome = SubmissionOutcome::failure(ErrorCategory::ServerMisconfigured);
        let json = serde_json::to_string(&outcome).expect("Failed to serialize");
        assert_eq!(json, r#"{"ok":false,"error_category":"server-misconfigured"}"#);
        let json = serde_json::to_string(&SubmissionOutcome::success()).expect("Failed to serialize");
        assert_eq!(json, r#"{"ok":true}"#);
    }
}
