//! Postgres-backed credential store and revocation ledger.
//!
//! Queries are built at runtime (`sqlx::query`), so compiling this crate
//! does not need a live database.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use guardpost_auth::roles::standard_roles;
use guardpost_core::{AuthError, AuthResult};

mod credentials;
mod revocations;

pub use credentials::PostgresCredentialStore;
pub use revocations::{PostgresRevocationLedger, prune_expired_revocations};

/// Schema statements, applied in order by [`ensure_schema`].
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        email         TEXT NOT NULL,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role_id       INTEGER NOT NULL REFERENCES roles (id),
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_key ON users (lower(email))",
    r#"
    CREATE TABLE IF NOT EXISTS revoked_tokens (
        token      TEXT PRIMARY KEY,
        user_id    UUID NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL,
        revoked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS revoked_tokens_expires_at_idx ON revoked_tokens (expires_at)",
];

/// Open a connection pool.
pub async fn connect(database_url: &str) -> AuthResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| db_error("connect", e))
}

/// Create the auth tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> AuthResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| db_error("ensure schema", e))?;
    }
    Ok(())
}

/// Insert the standard roles; existing rows are left alone.
pub async fn seed_roles(pool: &PgPool) -> AuthResult<()> {
    for role in standard_roles() {
        let result = sqlx::query("INSERT INTO roles (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(role.id.get())
            .bind(role.name.as_str())
            .execute(pool)
            .await
            .map_err(|e| db_error("seed roles", e))?;

        if result.rows_affected() > 0 {
            info!(role = %role.name, "created role");
        }
    }
    Ok(())
}

/// Map a database failure onto the auth error taxonomy.
///
/// Only constraint violations get a specific kind; everything else is
/// infrastructure and stays `Internal`.
pub(crate) fn db_error(operation: &str, err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AuthError::conflict(unique_violation_message(db.constraint()));
        }
        if db.is_foreign_key_violation() {
            return AuthError::not_found("Role not found");
        }
    }
    AuthError::internal(format!("{operation}: {err}"))
}

fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.starts_with("revoked_tokens") => "Token already revoked",
        _ => "Email already exists",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_are_named_by_table() {
        assert_eq!(unique_violation_message(Some("users_email_lower_key")), "Email already exists");
        assert_eq!(unique_violation_message(Some("revoked_tokens_pkey")), "Token already revoked");
        assert_eq!(unique_violation_message(None), "Email already exists");
    }

    #[test]
    fn email_uniqueness_ignores_case() {
        assert!(SCHEMA.iter().any(|s| s.contains("UNIQUE INDEX") && s.contains("lower(email)")));
    }

    #[test]
    fn non_database_errors_are_internal() {
        let err = db_error("lookup", sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Internal(_)));
        assert!(err.message().starts_with("lookup"));
    }

    #[test]
    fn schema_covers_every_table() {
        for table in ["roles", "users", "revoked_tokens"] {
            assert!(
                SCHEMA.iter().any(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {table}"))),
                "missing table {table}"
            );
        }
    }
}
