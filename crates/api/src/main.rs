use std::sync::Arc;

use anyhow::Context;

use guardpost_api::app::{AppState, build_app};
use guardpost_api::config::ApiConfig;
use guardpost_auth::Argon2Hasher;
use guardpost_infra::{PostgresCredentialStore, PostgresRevocationLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    guardpost_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = guardpost_infra::connect(url)
                .await
                .context("failed to connect to postgres")?;
            guardpost_infra::ensure_schema(&pool).await?;
            guardpost_infra::seed_roles(&pool).await?;
            tracing::info!("using postgres stores");

            AppState::new(
                Arc::new(PostgresCredentialStore::new(pool.clone())),
                Arc::new(PostgresRevocationLedger::new(pool)),
                Arc::new(Argon2Hasher::new()),
                &config.auth,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppState::in_memory(&config.auth)
        }
    };

    let app = build_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
