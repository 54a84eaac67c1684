//! # Preferences Route
//!
//! Pre-fills the form from the stored preferences, validates a submission,
//! persists it and redirects to the suggestions route.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;

use crate::route::Route;
use crate::store::{LocalStore, UserPreferences};
use crate::validate::{validate, ValidationError};

/// Notice shown after a successful submit, right before the redirect.
pub const SAVED_NOTICE: &str = "Preferences saved! Redirecting to your suggestions...";

/// Form field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesForm {
    pub name: String,
    pub email: String,
    pub mood: String,
}

/// What the route shows on activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesView {
    pub form: PreferencesForm,
    pub welcome: Option<String>,
}

/// Result of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Validation failed; nothing was stored.
    Rejected(ValidationError),
    Saved {
        preferences: UserPreferences,
        notice: &'static str,
        redirect: Route,
    },
}

pub struct PreferencesPage<'a> {
    store: &'a LocalStore,
}

impl<'a> PreferencesPage<'a> {
    #[must_use]
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Load stored preferences into the form.
    #[must_use]
    pub fn activate(&self) -> PreferencesView {
        match self.store.preferences() {
            Some(prefs) => PreferencesView {
                welcome: Some(welcome_notice(&prefs)),
                form: PreferencesForm {
                    name: prefs.name,
                    email: prefs.email,
                    mood: prefs.mood,
                },
            },
            None => PreferencesView {
                form: PreferencesForm::default(),
                welcome: None,
            },
        }
    }

    /// The pre-filled form with the given fields replaced.
    #[must_use]
    pub fn edit(&self, name: Option<String>, email: Option<String>, mood: Option<String>) -> PreferencesForm {
        let mut form = self.activate().form;
        if let Some(name) = name {
            form.name = name;
        }
        if let Some(email) = email {
            form.email = email;
        }
        if let Some(mood) = mood {
            form.mood = mood;
        }
        form
    }

    /// Validate and store the form, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store rejects the write; invalid input
    /// is reported as [`Submission::Rejected`].
    pub fn submit(&self, form: &PreferencesForm) -> Result<Submission> {
        self.submit_at(form, Utc::now())
    }

    /// [`submit`](Self::submit) with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit).
    pub fn submit_at(&self, form: &PreferencesForm, now: DateTime<Utc>) -> Result<Submission> {
        let name = form.name.trim();
        let email = form.email.trim();

        if let Err(e) = validate(name, email, &form.mood) {
            return Ok(Submission::Rejected(e));
        }

        let preferences = UserPreferences {
            name: name.to_string(),
            email: email.to_string(),
            mood: form.mood.trim().to_string(),
            saved_at: now,
        };
        self.store.set_preferences(&preferences)?;
        info!("Saved preferences for {} (mood: {})", preferences.name, preferences.mood);

        Ok(Submission::Saved {
            preferences,
            notice: SAVED_NOTICE,
            redirect: Route::Suggestions { play: None },
        })
    }
}

fn welcome_notice(prefs: &UserPreferences) -> String {
    format!("Welcome back, {}! Your last mood was \"{}\".", prefs.name, prefs.mood)
}
