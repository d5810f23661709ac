use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::User;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = validate_username)
    )]
    pub user_name: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "Business name must be 2-100 characters"))]
    pub business_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub user_name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub business_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            business_name: user.business_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

fn validate_username(user_name: &str) -> Result<(), ValidationError> {
    if user_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_format")
            .with_message("Username may only contain letters, digits and underscores".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_accepts_valid_request() {
        let request = SignupRequest {
            user_name: "dorji_shop".to_string(),
            password: "secret1".to_string(),
            business_name: "Dorji General Shop".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn signup_rejects_short_username_and_bad_characters() {
        let request = SignupRequest {
            user_name: "ab".to_string(),
            password: "secret1".to_string(),
            business_name: "Shop".to_string(),
        };
        assert!(request.validate().is_err());

        let request = SignupRequest {
            user_name: "dorji shop!".to_string(),
            password: "secret1".to_string(),
            business_name: "Shop".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn signup_rejects_short_password() {
        let request = SignupRequest {
            user_name: "dorji".to_string(),
            password: "12345".to_string(),
            business_name: "Shop".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
