//! Field-level validation of the account form.
//!
//! All fields are checked in one pass; the result maps each failing field to
//! its message. An empty map means the form may proceed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::model::{Field, RegistrationForm};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Failing fields and their messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear_field(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// True for strings containing something shaped like `a@b.c`.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Validates the account step of the registration form.
pub fn validate_account(form: &RegistrationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.full_name.trim().is_empty() {
        errors.insert(Field::FullName, "Full name is required");
    }
    if form.in_app_name.trim().is_empty() {
        errors.insert(Field::InAppName, "In-app name is required");
    }

    if form.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.insert(Field::Email, "Email is invalid");
    }

    if form.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }

    if form.confirm_password.is_empty() {
        errors.insert(Field::ConfirmPassword, "Please confirm your password");
    } else if form.password != form.confirm_password {
        errors.insert(Field::ConfirmPassword, "Passwords do not match");
    }

    errors
}
