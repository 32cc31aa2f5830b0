use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::errors::ValidationError;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 255;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PHONE_MAX_CHARS: usize = 32;
pub const INTEREST_MAX_CHARS: usize = 2000;

/// A stored waitlist signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Raw signup form as posted by the website.
///
/// Missing `name`/`email` deserialize to empty strings so they are reported
/// as validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitlistSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
}

impl WaitlistSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            interest: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_interest(mut self, interest: impl Into<String>) -> Self {
        self.interest = Some(interest.into());
        self
    }
}

/// A validated, normalized submission ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    name: String,
    email: String,
    phone: Option<String>,
    interest: Option<String>,
}

impl NewWaitlistEntry {
    /// Trim every field, lowercase the email and check the field rules.
    pub fn parse(submission: WaitlistSubmission) -> Result<Self, ValidationError> {
        let name = submission.name.trim().to_string();
        let email = submission.email.trim().to_lowercase();

        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingRequired);
        }
        if name.chars().count() < NAME_MIN_CHARS {
            return Err(ValidationError::NameTooShort {
                min: NAME_MIN_CHARS,
            });
        }
        check_len("Name", &name, NAME_MAX_CHARS)?;
        check_len("Email", &email, EMAIL_MAX_CHARS)?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        let phone = non_empty(submission.phone);
        if let Some(phone) = &phone {
            check_len("Phone", phone, PHONE_MAX_CHARS)?;
        }
        let interest = non_empty(submission.interest);
        if let Some(interest) = &interest {
            check_len("Interest", interest, INTEREST_MAX_CHARS)?;
        }

        Ok(Self {
            name,
            email,
            phone,
            interest,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn interest(&self) -> Option<&str> {
        self.interest.as_deref()
    }

    /// Materialize the stored row once storage has assigned an id.
    pub fn into_entry(self, id: i64, submitted_at: DateTime<Utc>) -> WaitlistEntry {
        WaitlistEntry {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            interest: self.interest,
            submitted_at,
        }
    }
}

/// Validates that the input looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || !email.validate_email() {
        return false;
    }
    // validator accepts dotless hosts like `user@localhost`; a signup needs a public domain.
    match email.rsplit_once('@') {
        Some((_, domain)) => domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len()),
        None => false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
