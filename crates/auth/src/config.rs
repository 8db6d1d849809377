//! Auth configuration (secrets, lifetimes, registration defaults).

use chrono::Duration;
use tracing::warn;

use guardpost_core::{AuthError, AuthResult, RoleId};

const DEV_ACCESS_SECRET: &str = "dev-access-secret";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret";

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Role assigned on registration.
    pub default_role_id: RoleId,
    /// Revoke the presented refresh token whenever it is exchanged.
    pub revoke_on_refresh: bool,
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("default_role_id", &self.default_role_id)
            .field("revoke_on_refresh", &self.revoke_on_refresh)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// 15 minute access tokens, 7 day refresh tokens, GUARD (3) by default.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            default_role_id: RoleId::new(3),
            revoke_on_refresh: false,
        }
    }

    /// Read `JWT_ACCESS_SECRET`, `JWT_REFRESH_SECRET`, `AUTH_DEFAULT_ROLE_ID`
    /// and `AUTH_REVOKE_ON_REFRESH` from the process environment.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AuthConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup("JWT_ACCESS_SECRET").unwrap_or_else(|| {
            warn!("JWT_ACCESS_SECRET not set; using insecure dev default");
            DEV_ACCESS_SECRET.to_string()
        });
        let refresh_secret = lookup("JWT_REFRESH_SECRET").unwrap_or_else(|| {
            warn!("JWT_REFRESH_SECRET not set; using insecure dev default");
            DEV_REFRESH_SECRET.to_string()
        });

        let mut config = Self::new(access_secret, refresh_secret);

        if let Some(raw) = lookup("AUTH_DEFAULT_ROLE_ID") {
            config.default_role_id = raw.parse()?;
        }
        if let Some(raw) = lookup("AUTH_REVOKE_ON_REFRESH") {
            config.revoke_on_refresh = parse_bool(&raw).ok_or_else(|| {
                AuthError::validation(format!("AUTH_REVOKE_ON_REFRESH: expected a boolean, got '{raw}'"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AuthError::validation("token secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AuthError::validation(
                "access and refresh secrets must be different",
            ));
        }
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(AuthError::validation("token lifetimes must be positive"));
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_ttl, Duration::days(7));
        assert_eq!(config.default_role_id, RoleId::new(3));
        assert!(!config.revoke_on_refresh);
    }

    #[test]
    fn reads_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_ACCESS_SECRET", "a"),
            ("JWT_REFRESH_SECRET", "r"),
            ("AUTH_DEFAULT_ROLE_ID", "2"),
            ("AUTH_REVOKE_ON_REFRESH", "true"),
        ]))
        .unwrap();
        assert_eq!(config.access_secret, "a");
        assert_eq!(config.default_role_id, RoleId::new(2));
        assert!(config.revoke_on_refresh);
    }

    #[test]
    fn identical_secrets_are_rejected() {
        let err = AuthConfig::from_lookup(lookup(&[
            ("JWT_ACCESS_SECRET", "same"),
            ("JWT_REFRESH_SECRET", "same"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn bad_flag_is_rejected() {
        let err = AuthConfig::from_lookup(lookup(&[("AUTH_REVOKE_ON_REFRESH", "maybe")])).unwrap_err();
        assert!(err.message().contains("AUTH_REVOKE_ON_REFRESH"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", AuthConfig::new("top-secret-a", "top-secret-r"));
        assert!(!rendered.contains("top-secret"));
    }
}
