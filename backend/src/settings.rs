//! Server settings loaded via OrthoConfig.
//!
//! Values come from `WELLNESS_*` environment variables, an optional config
//! file, and the command line, in increasing precedence.

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Port the API listens on when no bind address is configured.
pub const DEFAULT_PORT: u16 = 8001;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime settings for the wellness server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WELLNESS")]
pub struct AppSettings {
    /// Socket address to bind, for example `127.0.0.1:8001`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL. Without one the server needs the memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Serve from the in-memory store when no database is configured.
    #[ortho_config(default = false)]
    pub allow_memory_store: bool,
}

impl AppSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8001`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
