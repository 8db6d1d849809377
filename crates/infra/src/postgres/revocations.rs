use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use guardpost_auth::{RevocationEntry, RevocationLedger};
use guardpost_core::{AuthResult, PrincipalId};

use super::db_error;

/// `revoked_tokens` behind the [`RevocationLedger`] contract.
#[derive(Debug, Clone)]
pub struct PostgresRevocationLedger {
    pool: PgPool,
}

impl PostgresRevocationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &PgRow) -> Result<RevocationEntry, sqlx::Error> {
    Ok(RevocationEntry {
        token: row.try_get("token")?,
        subject: PrincipalId::from_uuid(row.try_get("user_id")?),
        expires_at: row.try_get("expires_at")?,
    })
}

#[async_trait]
impl RevocationLedger for PostgresRevocationLedger {
    async fn insert_revocation(&self, entry: RevocationEntry) -> AuthResult<()> {
        sqlx::query("INSERT INTO revoked_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&entry.token)
            .bind(Uuid::from(entry.subject))
            .bind(entry.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("insert revocation", e))?;
        Ok(())
    }

    async fn lookup_revocation(&self, token: &str) -> AuthResult<Option<RevocationEntry>> {
        let row = sqlx::query("SELECT token, user_id, expires_at FROM revoked_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("lookup revocation", e))?;

        row.as_ref()
            .map(entry_from_row)
            .transpose()
            .map_err(|e| db_error("decode revocation", e))
    }
}

/// Delete revocations whose token has already expired on its own.
///
/// Not called on any request path; run it from a scheduler.
pub async fn prune_expired_revocations(pool: &PgPool, now: DateTime<Utc>) -> AuthResult<u64> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= $1")
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| db_error("prune revocations", e))?;

    let pruned = result.rows_affected();
    if pruned > 0 {
        info!(pruned, "pruned expired revocations");
    }
    Ok(pruned)
}
