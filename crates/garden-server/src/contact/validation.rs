//! Contact form validation, checked before anything is sent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MIN_MESSAGE_CHARS: usize = 10;

/// The messages are shown to the visitor as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    MissingName,

    #[error("Please enter your email address.")]
    MissingEmail,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a message.")]
    MissingMessage,

    #[error("Message must be at least 10 characters long.")]
    MessageTooShort,
}

/// Form fields as posted by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A form that passed validation, with fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Check fields in form order; the first problem wins.
    pub fn validate(&self) -> Result<Submission, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !EMAIL.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        if message.chars().count() < MIN_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooShort);
        }

        Ok(Submission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_form_is_trimmed() {
        let submission = form("  Ada ", " ada@example.com ", "  Hello there, garden!  ")
            .validate()
            .unwrap();
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.message, "Hello there, garden!");
    }

    #[test]
    fn empty_fields_are_reported_in_order() {
        assert_eq!(form("", "", "").validate(), Err(ValidationError::MissingName));
        assert_eq!(form("Ada", "  ", "").validate(), Err(ValidationError::MissingEmail));
        assert_eq!(
            form("Ada", "ada@example.com", "   ").validate(),
            Err(ValidationError::MissingMessage)
        );
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        let err = form("Ada", "foo@bar", "A long enough message").validate();
        assert_eq!(err, Err(ValidationError::InvalidEmail));

        for bad in ["foo", "foo@", "@bar.com", "foo bar@baz.com", "a@b@c.com"] {
            assert_eq!(
                form("Ada", bad, "A long enough message").validate(),
                Err(ValidationError::InvalidEmail),
                "{bad}"
            );
        }
    }

    #[test]
    fn short_message_is_rejected_with_its_message() {
        let err = form("Ada", "ada@example.com", "too short").validate().unwrap_err();
        assert_eq!(err, ValidationError::MessageTooShort);
        assert_eq!(err.to_string(), "Message must be at least 10 characters long.");

        assert!(form("Ada", "ada@example.com", "ten chars!").validate().is_ok());
    }

    #[test]
    fn message_length_counts_characters() {
        // Nine characters, more than ten bytes
        assert_eq!(
            form("Ada", "ada@example.com", "ééééééééé").validate(),
            Err(ValidationError::MessageTooShort)
        );
    }

    #[test]
    fn messages_match_the_form_copy() {
        assert_eq!(ValidationError::MissingName.to_string(), "Please enter your name.");
        assert_eq!(
            ValidationError::MissingEmail.to_string(),
            "Please enter your email address."
        );
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address."
        );
        assert_eq!(ValidationError::MissingMessage.to_string(), "Please enter a message.");
    }
}
