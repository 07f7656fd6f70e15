//! Login and onboarding form.
//!
//! There is no real authentication: the form is validated locally and the
//! shopper's name and email become the session profile. The password is held
//! in a [`SecretString`] so it never shows up in logs or `Debug` output.

use bazaar_core::{Email, EmailError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Name is required.")]
    NameRequired,

    #[error("Enter a valid email address.")]
    InvalidEmail(#[source] EmailError),

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
}

/// Returning shopper or first visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Registered,
    NewUser,
}

impl AuthMode {
    /// Notification shown after a successful login.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Registered => "Login successful.",
            Self::NewUser => "Account created successfully.",
        }
    }
}

/// Raw form input.
#[derive(Debug)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    #[must_use]
    pub fn new(
        mode: AuthMode,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            name: name.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Check fields in order: name, email, password.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's `LoginError`.
    pub fn validate(&self) -> Result<Profile, LoginError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LoginError::NameRequired);
        }

        let email = Email::parse(self.email.trim()).map_err(LoginError::InvalidEmail)?;

        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(LoginError::PasswordTooShort);
        }

        Ok(Profile {
            name: name.to_string(),
            email,
        })
    }
}

/// Who is shopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let form = LoginForm::new(AuthMode::NewUser, "  Asha ", " asha@example.in ", "secret1");
        let profile = form.validate().unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.email.as_str(), "asha@example.in");
        assert_eq!(form.mode.success_message(), "Account created successfully.");
    }

    #[test]
    fn test_fields_checked_in_order() {
        let err = LoginForm::new(AuthMode::Registered, " ", "bad", "x")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Name is required.");

        let err = LoginForm::new(AuthMode::Registered, "Asha", "asha@localhost", "x")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid email address.");

        let err = LoginForm::new(AuthMode::Registered, "Asha", "asha@example.in", "12345")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    }

    #[test]
    fn test_password_not_in_debug_output() {
        let form = LoginForm::new(AuthMode::Registered, "Asha", "asha@example.in", "hunter22");
        assert!(!format!("{form:?}").contains("hunter22"));
    }
}
