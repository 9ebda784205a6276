//! Data models for the registration flow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Input fields of the account form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    InAppName,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::FullName,
        Field::InAppName,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::InAppName => "in_app_name",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm_password",
        }
    }

    /// Parses a field name, accepting both snake_case and the form's camelCase.
    pub fn parse(name: &str) -> Option<Field> {
        match name {
            "full_name" | "fullName" => Some(Field::FullName),
            "in_app_name" | "inAppName" => Some(Field::InAppName),
            "email" => Some(Field::Email),
            "password" => Some(Field::Password),
            "confirm_password" | "confirmPassword" => Some(Field::ConfirmPassword),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values typed into the account form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub in_app_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::InAppName => &self.in_app_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FullName => self.full_name = value,
            Field::InAppName => self.in_app_name = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }

    /// Builder: set a field.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// Selectable hero avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: u32,
    pub name: String,
    pub image: String,
}

impl Avatar {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: "/logo.png".to_string(),
        }
    }
}

/// The eight avatars offered on the second registration step.
pub fn avatar_options() -> Vec<Avatar> {
    [
        "Fire Mage",
        "Thunder Knight",
        "Nature Druid",
        "Shadow Ninja",
        "Golden Warrior",
        "Ice Guardian",
        "Star Archer",
        "Crystal Monk",
    ]
    .into_iter()
    .zip(1..)
    .map(|(name, id)| Avatar::new(id, name))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_with_camel_case() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
        assert_eq!(Field::parse("confirmPassword"), Some(Field::ConfirmPassword));
        assert_eq!(Field::parse("age"), None);
    }

    #[test]
    fn test_form_get_set() {
        let form = RegistrationForm::new().with(Field::Email, "ada@example.com");
        assert_eq!(form.get(Field::Email), "ada@example.com");
        assert_eq!(form.get(Field::FullName), "");
    }

    #[test]
    fn test_avatar_options() {
        let avatars = avatar_options();
        assert_eq!(avatars.len(), 8);
        assert_eq!(avatars[0].id, 1);
        assert_eq!(avatars[7].name, "Crystal Monk");
    }
}
