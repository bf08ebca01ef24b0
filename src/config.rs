use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub database: DatabaseConfig,
}

/// Connection settings for the MySQL pool.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// Keep the password out of the startup log.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: None,
            name: None,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Servidor HTTP base com pool MySQL")]
pub struct Args {
    /// Host to bind to (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory served as static files at `/` (overrides PUBLIC_DIR)
    #[arg(long)]
    pub public_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::resolve(args, |key| env::var(key))
    }

    /// Merge CLI args over values produced by `lookup` (normally `env::var`).
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = non_empty(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_port(&lookup, "PORT", 3000)?;
        let env_public = non_empty(&lookup, "PUBLIC_DIR").unwrap_or_else(|| "public".into());

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: non_empty(&lookup, "DB_HOST").unwrap_or(defaults.host),
            port: parse_port(&lookup, "DB_PORT", defaults.port)?,
            user: non_empty(&lookup, "DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASS").ok(),
            name: non_empty(&lookup, "DB_NAME"),
            ..defaults
        };

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            public_dir: args.public_dir.unwrap_or_else(|| env_public.into()),
            database,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A blank value (`PORT=` in a `.env` template) counts as unset.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    lookup(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_port<F>(lookup: &F, key: &str, default: u16) -> Result<u16>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    match lookup(key) {
        Ok(value) if value.trim().is_empty() => Ok(default),
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
