//! Password policy for new passwords.

use verrou_core::config::AuthConfig;
use verrou_core::error::AppError;

/// Checks length and character classes, plus an entropy estimate when
/// strong passwords are required.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    require_strong: bool,
}

impl PasswordValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            require_strong: config.password_require_strong,
        }
    }

    /// Returns the first violated rule as a `Validation` error.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if self.require_strong {
            if !password.chars().any(|c| !c.is_alphanumeric()) {
                return Err(AppError::validation(
                    "Password must contain at least one special character",
                ));
            }
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if estimate.score() < zxcvbn::Score::Three {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password.",
                ));
            }
        }

        Ok(())
    }

    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(require_strong: bool) -> PasswordValidator {
        PasswordValidator {
            min_length: 8,
            require_strong,
        }
    }

    #[test]
    fn accepts_mixed_password() {
        assert!(validator(false).validate("Verrou2025").is_ok());
    }

    #[test]
    fn rejects_each_missing_class() {
        let v = validator(false);
        assert!(v.validate("Ab1").unwrap_err().message.contains("at least 8"));
        assert!(v.validate("verrou2025").unwrap_err().message.contains("uppercase"));
        assert!(v.validate("VERROU2025").unwrap_err().message.contains("lowercase"));
        assert!(v.validate("VerrouPass").unwrap_err().message.contains("digit"));
    }

    #[test]
    fn strong_mode_requires_special_character() {
        let err = validator(true).validate("Verrou2025").unwrap_err();
        assert!(err.message.contains("special"));
        assert!(validator(true).validate("k7#Qm!vR2&pLx9").is_ok());
    }

    #[test]
    fn same_password_is_rejected() {
        assert!(validator(false).validate_not_same("Abc12345", "Abc12345").is_err());
        assert!(validator(false).validate_not_same("Abc12345", "Abc123456").is_ok());
    }
}
