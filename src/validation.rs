// Request validation helpers. Every check runs before any store mutation.
use chrono::{DateTime, NaiveDate};
use uuid::Uuid;

use crate::error::{ApiError, FieldErrors};

/// Collects field errors across a request so the client sees all of them at once
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Trimmed, non-empty value, or an error recorded against `field`
    pub fn required(&mut self, field: &str, value: Option<String>, message: &str) -> Option<String> {
        let value = non_empty(value);
        if value.is_none() {
            self.reject(field, message);
        }
        value
    }

    pub fn email(&mut self, field: &str, value: Option<String>, message: &str) -> Option<String> {
        match non_empty(value) {
            Some(email) if is_valid_email(&email) => Some(email),
            _ => {
                self.reject(field, message);
                None
            }
        }
    }

    pub fn min_length(&mut self, field: &str, value: Option<String>, min: usize, message: &str) -> Option<String> {
        // Passwords are not trimmed
        match value {
            Some(v) if v.chars().count() >= min => Some(v),
            _ => {
                self.reject(field, message);
                None
            }
        }
    }

    pub fn required_date(&mut self, field: &str, value: Option<String>, message: &str) -> Option<NaiveDate> {
        let raw = self.required(field, value, message)?;
        let date = parse_date(&raw);
        if date.is_none() {
            self.reject(field, &format!("{} is not a valid date", field));
        }
        date
    }

    /// Absent is fine; present must parse
    pub fn optional_date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        let raw = non_empty(value)?;
        let date = parse_date(&raw);
        if date.is_none() {
            self.reject(field, &format!("{} is not a valid date", field));
        }
        date
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::validation_error(self.errors)
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

/// Empty or whitespace-only strings count as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (truncated to its date)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Split a comma-delimited list into trimmed, non-empty tokens
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Parse a path identifier, mapping malformed input to `InvalidIdentifier`
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_identifier(format!("Invalid {} id", what)))
}
