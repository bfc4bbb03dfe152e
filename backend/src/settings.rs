//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `HUB_*` environment variables, an optional config file
//! and CLI flags, in increasing precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AdminSeed, Email, Password};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 5;
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only one half of the administrator credentials was configured.
    #[error("HUB_DEFAULT_ADMIN_EMAIL and HUB_DEFAULT_ADMIN_PASSWORD must be set together")]
    PartialAdminSeed,
    /// The administrator credentials failed validation.
    #[error("invalid default administrator: {0}")]
    InvalidAdminSeed(String),
}

/// Settings for the association hub server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HUB")]
pub struct HubSettings {
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: Option<u32>,
    /// Apply embedded migrations on startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// Base URL prefixed to `verify?t=<token>` in confirmation mails.
    pub frontend_url: Option<String>,
    /// HTTP relay accepting `{"pattern", "data"}` notifications.
    pub notification_endpoint: Option<String>,
    /// Relay request timeout in seconds.
    pub notification_timeout_secs: Option<u64>,
    /// Email of the administrator seeded into an empty directory.
    pub default_admin_email: Option<String>,
    /// Password of the administrator seeded into an empty directory.
    pub default_admin_password: Option<String>,
}

impl HubSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Connection pool size.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Non-blank database URL, if configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Non-blank notification relay endpoint, if configured.
    #[must_use]
    pub fn notification_endpoint(&self) -> Option<&str> {
        non_blank(self.notification_endpoint.as_deref())
    }

    /// Relay request timeout.
    #[must_use]
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(
            self.notification_timeout_secs
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_SECS),
        )
    }

    /// Frontend base URL, normalised to end with `/`.
    #[must_use]
    pub fn frontend_url(&self) -> Option<String> {
        non_blank(self.frontend_url.as_deref()).map(|url| {
            if url.ends_with('/') {
                url.to_owned()
            } else {
                format!("{url}/")
            }
        })
    }

    /// Validated administrator credentials for the startup bootstrap.
    pub fn admin_seed(&self) -> Result<Option<AdminSeed>, SettingsError> {
        let email = non_blank(self.default_admin_email.as_deref());
        let password = non_blank(self.default_admin_password.as_deref());
        match (email, password) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => Ok(Some(AdminSeed {
                email: Email::new(email)
                    .map_err(|err| SettingsError::InvalidAdminSeed(err.to_string()))?,
                password: Password::new(password)
                    .map_err(|err| SettingsError::InvalidAdminSeed(err.to_string()))?,
            })),
            _ => Err(SettingsError::PartialAdminSeed),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
