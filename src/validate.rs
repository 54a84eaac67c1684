//! Preference form validation.
//!
//! Rules are checked in order and the first failure wins:
//! name, then email, then mood.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid");
}

/// Minimum name length, in characters, after trimming.
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a name with at least 2 characters.")]
    Name,
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Please select a mood.")]
    Mood,
}

/// Check the preference form fields.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate(name: &str, email: &str, mood: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::Name);
    }

    let email = email.trim();
    if email.is_empty() || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::Email);
    }

    if mood.trim().is_empty() {
        return Err(ValidationError::Mood);
    }

    Ok(())
}
