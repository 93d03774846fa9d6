//! Configuration loading from flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

/// Server configuration.
#[derive(Debug, Args)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, env = "COTACAO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite file (or full `sqlite:` URL) holding served quotes
    #[arg(long, env = "COTACAO_DATABASE", default_value = "database.sqlite3")]
    pub database: String,

    /// Upstream quote endpoint
    #[arg(long, env = "COTACAO_UPSTREAM_URL", default_value = exchange_rates::UPSTREAM_URL)]
    pub upstream_url: String,

    /// Budget for the upstream call, in milliseconds
    #[arg(long, env = "COTACAO_UPSTREAM_TIMEOUT_MS", default_value_t = 200)]
    pub upstream_timeout_ms: u64,

    /// Budget for the store write, in milliseconds
    #[arg(long, env = "COTACAO_STORE_TIMEOUT_MS", default_value_t = 10)]
    pub store_timeout_ms: u64,
}

impl ServerConfig {
    /// sqlx URL for the configured database.
    pub fn database_url(&self) -> String {
        if self.database.starts_with("sqlite:") {
            self.database.clone()
        } else {
            format!("sqlite://{}", self.database)
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

/// Client configuration.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Port the server listens on
    #[arg(short, long, env = "COTACAO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Host the server runs on
    #[arg(long, env = "COTACAO_HOST", default_value = "localhost")]
    pub host: String,

    /// File the quote is written to
    #[arg(short, long, env = "COTACAO_OUTPUT", default_value = quote_client::OUTPUT_FILE)]
    pub output: PathBuf,

    /// Budget for the whole round trip, in milliseconds
    #[arg(long, env = "COTACAO_CLIENT_TIMEOUT_MS", default_value_t = 300)]
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
