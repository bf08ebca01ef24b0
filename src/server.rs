//! Startup sequence: database probe, listener binding and serving.

use crate::{config::AppConfig, services::database::Database};
use anyhow::Result;
use axum::Router;
use std::io::ErrorKind;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

/// Run the one-shot connectivity check and log its outcome.
///
/// Never fails: a database that is down only produces an error log.
pub async fn probe_database(db: &Database) -> bool {
    match db.probe().await {
        Ok(()) => {
            info!("SUCESSO: Ligação à Base de Dados estabelecida!");
            true
        }
        Err(err) => {
            error!("ERRO: Não foi possível ligar à Base de Dados.");
            error!("{:?}", err);
            false
        }
    }
}

/// Bind `cfg.addr()`, falling back to loopback when a wildcard bind is denied.
pub async fn bind_listener(cfg: &AppConfig) -> Result<TcpListener> {
    let addr = cfg.addr();
    match TcpListener::bind(&addr).await {
        Ok(listener) => Ok(listener),
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr, err, fallback_addr
            );
            Ok(TcpListener::bind(&fallback_addr).await?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Log the banner and serve `app` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let port = listener.local_addr()?.port();
    info!("---------------------------------------");
    info!("Servidor a correr na porta {}", port);
    info!("Acede a: http://localhost:{}", port);
    info!("---------------------------------------");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Args, DatabaseConfig},
        routes::routes::routes,
        services::database::tests::unreachable_database,
        state::AppState,
    };
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn probe_failure_is_reported_not_raised() {
        let db = unreachable_database();
        assert!(!probe_database(&db).await);
    }

    #[tokio::test]
    async fn server_answers_even_when_probe_fails() {
        let db = unreachable_database();
        assert!(!probe_database(&db).await);

        let dir = TempDir::new().unwrap();
        let cfg = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            public_dir: dir.path().to_path_buf(),
            database: DatabaseConfig::default(),
        };
        let listener = bind_listener(&cfg).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes(AppState::new(db, dir.path()));
        let server = tokio::spawn(serve(listener, app));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /teste HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let response = String::from_utf8(raw).unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("O servidor está a funcionar!"));

        server.abort();
    }

    #[tokio::test]
    async fn listener_uses_configured_port() {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let free_port = probe.local_addr().unwrap().port();
        drop(probe);

        let mut cfg = AppConfig::resolve(Args::default(), |key| match key {
            "PORT" => Ok(free_port.to_string()),
            _ => Err(std::env::VarError::NotPresent),
        })
        .unwrap();
        cfg.host = "127.0.0.1".into();

        let listener = bind_listener(&cfg).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), free_port);
    }
}
