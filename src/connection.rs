//! Entry point binding a session to queries and batches.

use crate::batch::CqlBatch;
use crate::builder::ConnectionBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::iter::RowIterator;
use crate::query::{CqlQuery, Query};
use crate::scan::ScanTarget;
use crate::session::Session;
use crate::types::{BatchKind, Statement, Value};
use std::sync::Arc;

/// A session plus the settings applied to everything created from it.
///
/// Cloning is cheap and shares the session.
#[derive(Clone)]
pub struct Connection {
    session: Arc<dyn Session>,
    config: Config,
}

impl Connection {
    pub fn new(session: impl Session + 'static) -> Self {
        Self::from_shared(Arc::new(session), Config::default())
    }

    pub fn with_config(session: impl Session + 'static, config: Config) -> Result<Self> {
        Self::builder().session(session).config(config).build()
    }

    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    pub(crate) fn from_shared(session: Arc<dyn Session>, config: Config) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A query for `statement` with `arguments`. Nothing is executed yet.
    pub fn query(&self, statement: impl Into<String>, arguments: Vec<Value>) -> CqlQuery {
        CqlQuery::new(
            Arc::clone(&self.session),
            Statement::new(statement, arguments),
            self.config.log_statements,
        )
    }

    /// An empty batch of the given kind.
    pub fn batch(&self, kind: BatchKind) -> CqlBatch {
        CqlBatch::new(
            Arc::clone(&self.session),
            kind,
            self.config.batch_size_warn_threshold,
        )
    }

    /// An empty batch of the configured default kind.
    pub fn default_batch(&self) -> CqlBatch {
        self.batch(self.config.default_batch_kind)
    }

    /// Execute `statement` for effect.
    pub fn exec(&self, statement: &str, arguments: Vec<Value>) -> Result<()> {
        self.query(statement, arguments).exec()
    }

    /// Execute `statement` and scan its first row into `dest`.
    pub fn scan(
        &self,
        statement: &str,
        arguments: Vec<Value>,
        dest: &mut [&mut dyn ScanTarget],
    ) -> Result<()> {
        self.query(statement, arguments).scan(dest)
    }

    /// Execute `statement` and iterate over its rows.
    pub fn scan_iter(&self, statement: &str, arguments: Vec<Value>) -> Box<dyn RowIterator> {
        self.query(statement, arguments).iter()
    }

    /// Close the underlying session.
    pub fn close(&self) {
        log::debug!("closing session");
        self.session.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::mock::{SessionCall, SessionMock};
    use crate::session::MemoryRows;
    use crate::types::Row;

    #[test]
    fn test_default_batch_uses_config() {
        let config = Config::default().with_default_batch_kind(BatchKind::Unlogged);
        let conn = Connection::with_config(SessionMock::new(), config).unwrap();
        assert_eq!(conn.default_batch().kind(), BatchKind::Unlogged);
        assert_eq!(conn.batch(BatchKind::Counter).kind(), BatchKind::Counter);
    }

    #[test]
    fn test_scan_shorthand() {
        let session = Arc::new(SessionMock::new());
        session.expect_execute(Ok(MemoryRows::new(vec![Row::new().with("count", 3i64)])));
        let conn = Connection::from_shared(session.clone(), Config::default());
        let mut count = 0i64;

        conn.scan("SELECT count(*) FROM t", vec![], &mut [&mut count])
            .unwrap();

        assert_eq!(count, 3);
    }

    #[test]
    fn test_batches_share_session() {
        let session = Arc::new(SessionMock::new());
        session.expect_execute_batch(Ok(()));
        let conn = Connection::from_shared(session.clone(), Config::default());

        let mut b = conn.batch(BatchKind::Logged);
        b.query("INSERT INTO t (id) VALUES (?)", vec![1.into()]).unwrap();
        b.execute().unwrap();

        assert!(matches!(
            session.calls().as_slice(),
            [SessionCall::ExecuteBatch(batch)] if batch.len() == 1
        ));
    }

    #[test]
    fn test_close_forwards() {
        let session = Arc::new(SessionMock::new());
        let conn = Connection::from_shared(session.clone(), Config::default());
        conn.close();
        assert_eq!(session.calls(), vec![SessionCall::Close]);
    }
}
