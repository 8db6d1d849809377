use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use guardpost_auth::{CredentialStore, NewPrincipal, Principal, Role, RoleRecord};
use guardpost_core::{AuthError, AuthResult, PrincipalId, RoleId};

use super::db_error;

const PRINCIPAL_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, role_id, created_at";

/// `users` and `roles` tables behind the [`CredentialStore`] contract.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Change a principal's role. Role administration lives outside the auth
    /// core; this exists for operators and tests.
    pub async fn assign_role(&self, id: PrincipalId, role_id: RoleId) -> AuthResult<()> {
        let result = sqlx::query("UPDATE users SET role_id = $2 WHERE id = $1")
            .bind(Uuid::from(id))
            .bind(role_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("assign role", e))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::not_found("User not found"));
        }
        Ok(())
    }
}

fn principal_from_row(row: &PgRow) -> Result<Principal, sqlx::Error> {
    Ok(Principal {
        id: PrincipalId::from_uuid(row.try_get("id")?),
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        password_hash: row.try_get("password_hash")?,
        role_id: RoleId::new(row.try_get("role_id")?),
        created_at: row.try_get("created_at")?,
    })
}

fn role_from_row(row: &PgRow) -> Result<RoleRecord, sqlx::Error> {
    Ok(RoleRecord {
        id: RoleId::new(row.try_get("id")?),
        name: Role::new(row.try_get::<String, _>("name")?),
    })
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_principal_by_email(&self, email: &str) -> AuthResult<Option<Principal>> {
        let sql = format!("SELECT {PRINCIPAL_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find principal by email", e))?;

        row.as_ref()
            .map(principal_from_row)
            .transpose()
            .map_err(|e| db_error("decode principal", e))
    }

    async fn find_principal_by_id(&self, id: PrincipalId) -> AuthResult<Principal> {
        let sql = format!("SELECT {PRINCIPAL_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find principal by id", e))?
            .ok_or_else(|| AuthError::not_found("User not found"))?;

        principal_from_row(&row).map_err(|e| db_error("decode principal", e))
    }

    async fn create_principal(&self, new: NewPrincipal) -> AuthResult<Principal> {
        let sql = format!(
            "INSERT INTO users (id, email, first_name, last_name, password_hash, role_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PRINCIPAL_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::from(PrincipalId::new()))
            .bind(&new.email)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.password_hash)
            .bind(new.role_id.get())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("create principal", e))?;

        let principal = principal_from_row(&row).map_err(|e| db_error("decode principal", e))?;
        debug!(principal_id = %principal.id, "principal created");
        Ok(principal)
    }

    async fn find_role_by_id(&self, id: RoleId) -> AuthResult<RoleRecord> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find role", e))?
            .ok_or_else(|| AuthError::not_found("Role not found"))?;

        role_from_row(&row).map_err(|e| db_error("decode role", e))
    }

    async fn list_roles(&self) -> AuthResult<Vec<RoleRecord>> {
        let rows = sqlx::query("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list roles", e))?;

        rows.iter()
            .map(role_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| db_error("decode role", e))
    }
}
