use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

pub const USERNAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 200;
pub const PASSWORD_MAX: usize = 200;
pub const PHONE_MAX: usize = 20;

/// Form body for registration. Absent fields deserialize as empty and are
/// rejected by `validate`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Form body for login.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned to JSON clients after a successful credential check.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub authenticated: bool,
    #[serde(rename = "UserID")]
    pub user_id: i64,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username, USERNAME_MAX)?;
        require("email", &self.email, EMAIL_MAX)?;
        require("password", &self.password, PASSWORD_MAX)?;
        require("phone_number", &self.phone_number, PHONE_MAX)?;
        Ok(())
    }
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email, EMAIL_MAX)?;
        require("password", &self.password, PASSWORD_MAX)?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "secret1".into(),
            phone_number: "111".into(),
        }
    }

    #[test]
    fn complete_form_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn missing_field_is_named() {
        let form = RegisterForm {
            phone_number: String::new(),
            ..valid()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "phone_number");
        assert_eq!(err.message, "phone_number is required");
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let form = RegisterForm {
            username: "   ".into(),
            ..valid()
        };
        assert_eq!(form.validate().unwrap_err().field, "username");
    }

    #[test]
    fn column_limits_are_enforced() {
        let form = RegisterForm {
            phone_number: "1".repeat(PHONE_MAX + 1),
            ..valid()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "phone_number");
        assert!(err.message.contains("at most 20"));

        let form = RegisterForm {
            username: "u".repeat(USERNAME_MAX),
            ..valid()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn absent_form_fields_deserialize_empty() {
        let form: LoginForm = crate::extractors::parse_form(b"email=a%40x.com").unwrap();
        assert_eq!(form.password, "");
        assert_eq!(form.validate().unwrap_err().field, "password");
    }
}
