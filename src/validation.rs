use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{CreateTodoRequest, LoginRequest, RegisterRequest, UpdateTodoRequest};

pub const MAX_TODO_TEXT_CHARS: usize = 500;
pub const MIN_PASSWORD_CHARS: usize = 8;

// local@domain.tld, no whitespace, at most one '@'
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Request bodies that sanitize their own fields and report rule violations.
///
/// `validate` may rewrite fields in place (trimming, lower-casing) so handlers
/// only ever see the normalized values.
pub trait Validate {
    fn validate(&mut self) -> Result<(), Vec<FieldError>>;
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Password policy: minimum length plus upper, lower and digit.
pub fn check_password_policy(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Password must be at least 8 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_upper && has_lower && has_digit) {
        return Err("Password must contain uppercase, lowercase, and number".to_string());
    }

    Ok(())
}

/// Trim and check todo text. `empty_message` differs between create and update.
fn check_todo_text(text: &mut String, empty_message: &str) -> Result<(), FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("text", empty_message));
    }
    if trimmed.chars().count() > MAX_TODO_TEXT_CHARS {
        return Err(FieldError::new("text", "Todo text must not exceed 500 characters"));
    }
    *text = trimmed.to_string();
    Ok(())
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Validate for RegisterRequest {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        self.email = normalize_email(&self.email);
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        if let Err(message) = check_password_policy(&self.password) {
            errors.push(FieldError::new("password", message));
        }

        finish(errors)
    }
}

impl Validate for LoginRequest {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        self.email = normalize_email(&self.email);
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        finish(errors)
    }
}

impl Validate for CreateTodoRequest {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        match check_todo_text(&mut self.text, "Todo text is required") {
            Ok(()) => Ok(()),
            Err(e) => Err(vec![e]),
        }
    }
}

impl Validate for UpdateTodoRequest {
    fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(text) = self.text.as_mut() {
            if let Err(e) = check_todo_text(text, "Todo text cannot be empty") {
                errors.push(e);
            }
        }

        finish(errors)
    }
}
