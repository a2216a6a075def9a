//! Connection builder
//!
//! Collects a session and configuration before producing a [`Connection`].

use crate::config::Config;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::BatchKind;
use std::sync::Arc;

/// Builder for [`Connection`].
#[derive(Default)]
pub struct ConnectionBuilder {
    session: Option<Arc<dyn Session>>,
    config: Config,
}

impl ConnectionBuilder {
    /// Create a new builder with default configuration and no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session queries and batches are executed through.
    pub fn session(mut self, session: impl Session + 'static) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    /// Use a session that is already shared elsewhere.
    pub fn shared_session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the connection configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn default_batch_kind(mut self, kind: BatchKind) -> Self {
        self.config = self.config.with_default_batch_kind(kind);
        self
    }

    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.config = self.config.with_log_statements(enabled);
        self
    }

    /// Build the connection.
    pub fn build(self) -> Result<Connection> {
        self.config.validate().map_err(Error::Config)?;
        let session = self
            .session
            .ok_or_else(|| Error::Config("no session configured".to_string()))?;
        Ok(Connection::from_shared(session, self.config))
    }
}

impl std::fmt::Debug for ConnectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBuilder")
            .field("has_session", &self.session.is_some())
            .field("config", &self.config)
            .finish()
    }
}
