use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_core::database::context::DatabaseContext;
use lectern_server::collaborators::{LoggingNotifier, MediaUrlResolver};
use lectern_server::infra::app_state::AppState;
use lectern_server::infra::config::Config;
use lectern_server::build_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern_server=info,lectern_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let database = DatabaseContext::connect_postgres(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    database
        .postgres()
        .migrate()
        .await
        .context("failed to run migrations")?;

    let url_resolver = Arc::new(MediaUrlResolver::new(config.media_base_url.clone()));
    let notifier = Arc::new(LoggingNotifier);

    let state = AppState::new(
        database.unit_of_work(),
        Arc::clone(&config),
        url_resolver,
        notifier,
    );

    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "lectern-server listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
