//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use association_hub::domain::ports::NotificationPublisher;
use association_hub::outbound::queue::LoggingNotificationPublisher;

use super::state_builders::Repositories;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repositories: Repositories,
    pub(crate) publisher: Arc<dyn NotificationPublisher>,
    pub(crate) frontend_url: Option<String>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store, logging
    /// notifications instead of relaying them.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            repositories: Repositories::in_memory(),
            publisher: Arc::new(LoggingNotificationPublisher::new()),
            frontend_url: None,
        }
    }

    /// Use an already-built repository set, shared with startup tasks.
    #[must_use]
    pub fn with_repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = repositories;
        self
    }

    /// Replace the notification transport.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn NotificationPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Base URL used to build email confirmation links.
    #[must_use]
    pub fn with_frontend_url(mut self, frontend_url: Option<String>) -> Self {
        self.frontend_url = frontend_url;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
