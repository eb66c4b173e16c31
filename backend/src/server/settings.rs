//! Server settings loaded via OrthoConfig.
//!
//! Values come from `CAMPUS_AUTH_*` environment variables, configuration
//! files and command-line flags. Accessors supply the defaults.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::security::TokenLifetimes;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Errors raised while resolving settings into runtime values.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to read JWT secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JWT secret must not be empty")]
    EmptySecret,
    #[error("no JWT secret configured; set CAMPUS_AUTH_JWT_SECRET_FILE or CAMPUS_AUTH_JWT_SECRET")]
    MissingSecret,
    #[error("token lifetimes must be positive")]
    NonPositiveLifetime,
}

/// Runtime configuration for the HTTP server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPUS_AUTH")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the token signing secret.
    pub jwt_secret_file: Option<PathBuf>,
    /// Inline token signing secret, used when no file is configured.
    pub jwt_secret: Option<String>,
    /// Allow a random per-process secret in release builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    pub access_token_ttl_secs: Option<i64>,
    pub refresh_token_ttl_secs: Option<i64>,
    /// Apply pending migrations before serving. Unset means yes.
    pub run_migrations: Option<bool>,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret_file", &self.jwt_secret_file)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("allow_ephemeral_secret", &self.allow_ephemeral_secret)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl ServerSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Whether migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Access and refresh token lifetimes.
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, SettingsError> {
        let defaults = TokenLifetimes::default();
        let lifetimes = TokenLifetimes {
            access_secs: self.access_token_ttl_secs.unwrap_or(defaults.access_secs),
            refresh_secs: self.refresh_token_ttl_secs.unwrap_or(defaults.refresh_secs),
        };
        if lifetimes.access_secs <= 0 || lifetimes.refresh_secs <= 0 {
            return Err(SettingsError::NonPositiveLifetime);
        }
        Ok(lifetimes)
    }

    /// Resolve the token signing secret.
    ///
    /// A secret file wins over the inline value. Without either, debug builds
    /// and deployments that opt in with `allow_ephemeral_secret` get a random
    /// secret; tokens then stop validating when the process restarts.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        let secret = if let Some(path) = &self.jwt_secret_file {
            let bytes = std::fs::read(path).map_err(|source| SettingsError::SecretRead {
                path: path.clone(),
                source,
            })?;
            Zeroizing::new(bytes)
        } else if let Some(inline) = &self.jwt_secret {
            Zeroizing::new(inline.as_bytes().to_vec())
        } else if cfg!(debug_assertions) || self.allow_ephemeral_secret {
            warn!("using an ephemeral JWT secret; issued tokens will not survive a restart");
            let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
            OsRng.fill_bytes(&mut bytes);
            return Ok(bytes);
        } else {
            return Err(SettingsError::MissingSecret);
        };

        if secret.iter().all(u8::is_ascii_whitespace) {
            return Err(SettingsError::EmptySecret);
        }
        Ok(secret)
    }
}
