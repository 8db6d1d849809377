use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use guardpost_auth::{Registration, RoleRecord};
use guardpost_core::{AuthError, AuthResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Boundary checks run before a request reaches the engine.
pub trait Validate {
    fn validate(&self) -> AuthResult<()>;
}

/// Unwrap an extracted JSON body and validate it. Malformed bodies become
/// `Validation` errors instead of axum's plain-text rejections.
pub fn accept<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    let Json(body) = payload.map_err(|rejection| AuthError::validation(rejection.body_text()))?;
    body.validate()?;
    Ok(body)
}

fn require_email(email: &str) -> AuthResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::validation("email must be a valid email address"));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::validation(format!("{field} should not be empty")));
    }
    Ok(())
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> AuthResult<()> {
        require_email(&self.email)?;
        require_non_empty("firstName", &self.first_name)?;
        require_non_empty("lastName", &self.last_name)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> AuthResult<()> {
        require_email(&self.email)?;
        require_non_empty("password", &self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl Validate for RefreshTokenRequest {
    fn validate(&self) -> AuthResult<()> {
        require_non_empty("refreshToken", &self.refresh_token)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<RoleRecord> for RoleResponse {
    fn from(role: RoleRecord) -> Self {
        Self {
            id: role.id.get(),
            name: role.name.as_str().to_string(),
        }
    }
}
