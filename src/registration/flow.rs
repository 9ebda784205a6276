//! Two-step registration: account details, then avatar choice.

use serde::{Deserialize, Serialize};

use super::model::{avatar_options, Avatar, Field, RegistrationForm};
use super::validate::{validate_account, ValidationErrors};

/// Route the host navigates to once registration is submitted.
pub const ONBOARDING_ROUTE: &str = "/onboarding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    Account,
    Avatar,
}

impl RegistrationStep {
    /// 1-based position, as shown in the progress header.
    pub fn number(&self) -> u8 {
        match self {
            RegistrationStep::Account => 1,
            RegistrationStep::Avatar => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RegistrationStep::Account => "Create Account",
            RegistrationStep::Avatar => "Choose Your Avatar",
        }
    }
}

/// State of one registration page visit.
#[derive(Debug, Clone)]
pub struct RegistrationFlow {
    step: RegistrationStep,
    form: RegistrationForm,
    errors: ValidationErrors,
    avatars: Vec<Avatar>,
    selected_avatar: Option<u32>,
}

impl RegistrationFlow {
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::Account,
            form: RegistrationForm::new(),
            errors: ValidationErrors::new(),
            avatars: avatar_options(),
            selected_avatar: None,
        }
    }

    /// Updates a field and clears any error shown for it.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
        self.errors.clear_field(field);
    }

    /// Validates the account step and moves to avatar choice when clean.
    ///
    /// Returns true if the step changed.
    pub fn next_step(&mut self) -> bool {
        if self.step != RegistrationStep::Account {
            return false;
        }
        self.errors = validate_account(&self.form);
        if !self.errors.is_empty() {
            log::debug!("registration blocked by {} field errors", self.errors.len());
            return false;
        }
        self.step = RegistrationStep::Avatar;
        true
    }

    /// Returns to the account step. Values are kept.
    pub fn previous_step(&mut self) -> bool {
        if self.step == RegistrationStep::Avatar {
            self.step = RegistrationStep::Account;
            true
        } else {
            false
        }
    }

    /// Selects an avatar by id. Unknown ids are ignored.
    pub fn select_avatar(&mut self, id: u32) -> bool {
        if self.avatars.iter().any(|a| a.id == id) {
            self.selected_avatar = Some(id);
            true
        } else {
            false
        }
    }

    /// Submits the registration. Yields the next route once an avatar is chosen.
    pub fn submit(&self) -> Option<&'static str> {
        if self.step != RegistrationStep::Avatar {
            return None;
        }
        let avatar = self.selected_avatar()?;
        log::info!(
            "registration submitted for '{}' with avatar '{}'",
            self.form.in_app_name,
            avatar.name
        );
        Some(ONBOARDING_ROUTE)
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }

    pub fn selected_avatar(&self) -> Option<&Avatar> {
        let id = self.selected_avatar?;
        self.avatars.iter().find(|a| a.id == id)
    }

    /// Display name to hand to the onboarding flow.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.form.in_app_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegistrationFlow {
        let mut flow = RegistrationFlow::new();
        flow.set_field(Field::FullName, "Ada Lovelace");
        flow.set_field(Field::InAppName, "ada");
        flow.set_field(Field::Email, "ada@example.com");
        flow.set_field(Field::Password, "engine1");
        flow.set_field(Field::ConfirmPassword, "engine1");
        flow
    }

    #[test]
    fn test_next_step_requires_valid_form() {
        let mut flow = RegistrationFlow::new();
        assert!(!flow.next_step());
        assert_eq!(flow.step(), RegistrationStep::Account);
        assert_eq!(flow.errors().len(), 5);
    }

    #[test]
    fn test_typing_clears_field_error() {
        let mut flow = RegistrationFlow::new();
        flow.next_step();
        flow.set_field(Field::Email, "a");
        assert_eq!(flow.errors().get(Field::Email), None);
        assert_eq!(flow.errors().len(), 4);
    }

    #[test]
    fn test_happy_path_reaches_onboarding() {
        let mut flow = filled();
        assert!(flow.next_step());
        assert_eq!(flow.step(), RegistrationStep::Avatar);
        assert_eq!(flow.step().number(), 2);
        assert_eq!(flow.submit(), None);

        assert!(!flow.select_avatar(99));
        assert!(flow.select_avatar(3));
        assert_eq!(flow.selected_avatar().unwrap().name, "Nature Druid");
        assert_eq!(flow.submit(), Some("/onboarding"));
        assert_eq!(flow.display_name(), Some("ada"));
    }

    #[test]
    fn test_back_keeps_values() {
        let mut flow = filled();
        flow.next_step();
        assert!(flow.previous_step());
        assert!(!flow.previous_step());
        assert_eq!(flow.form().email, "ada@example.com");
        assert_eq!(flow.step().title(), "Create Account");
    }

    #[test]
    fn test_submit_not_available_on_account_step() {
        let mut flow = filled();
        flow.select_avatar(1);
        assert_eq!(flow.submit(), None);
    }
}
