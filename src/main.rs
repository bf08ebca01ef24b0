use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod routes;
mod server;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Load .env before anything reads the environment ---
    let dotenv = dotenvy::dotenv();

    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Ignoring unreadable .env file: {}", err),
    }

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting servidor-base with config: {:?}", cfg);

    if !cfg.public_dir.is_dir() {
        tracing::warn!(
            "Static directory {} does not exist; only API routes will answer",
            cfg.public_dir.display()
        );
    }

    // --- Database pool (no connection opened yet) ---
    let db = services::database::Database::connect_lazy(&cfg.database);

    // --- One-shot connectivity probe, never blocks startup ---
    let probe_db = db.clone();
    tokio::spawn(async move {
        server::probe_database(&probe_db).await;
    });

    // --- Build router ---
    let app = routes::routes::routes(state::AppState::new(db, cfg.public_dir.clone()));

    // --- Start server ---
    let listener = server::bind_listener(&cfg).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    server::serve(listener, app).await?;

    Ok(())
}
