//! Single statement execution.

use crate::cas;
use crate::error::Result;
use crate::iter::{Cursor, RowIterator};
use crate::scan::{ScanTarget, scan_row};
use crate::session::{RowStream, Session};
use crate::types::{Statement, Value};
use std::sync::Arc;

/// A parameterized statement bound to a session.
pub trait Query: Send {
    /// A query with the same text and `arguments` in place of the current ones.
    fn bind(&self, arguments: Vec<Value>) -> Box<dyn Query>;

    /// Execute for effect, discarding any rows.
    fn exec(&self) -> Result<()>;

    /// Execute and iterate over the result. Failures surface through the
    /// iterator.
    fn iter(&self) -> Box<dyn RowIterator>;

    /// Execute and copy the first row into `dest`.
    fn scan(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<()>;

    /// Execute a conditional statement.
    ///
    /// Returns whether it was applied. When it was not, `dest` receives the
    /// values currently stored; otherwise `dest` is left alone.
    fn scan_cas(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<bool>;
}

/// [`Query`] executed through a [`Session`].
#[derive(Clone)]
pub struct CqlQuery {
    session: Arc<dyn Session>,
    statement: Statement,
    log_statements: bool,
}

impl CqlQuery {
    pub(crate) fn new(session: Arc<dyn Session>, statement: Statement, log_statements: bool) -> Self {
        Self {
            session,
            statement,
            log_statements,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    fn open(&self) -> Result<Box<dyn RowStream>> {
        if self.log_statements {
            log::debug!(
                "executing `{}` with {} arguments",
                self.statement.text(),
                self.statement.arguments().len()
            );
        }
        self.session.execute(&self.statement)
    }

    fn run(&self) -> Cursor {
        Cursor::from_result(self.open())
    }
}

impl std::fmt::Debug for CqlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CqlQuery")
            .field("statement", &self.statement)
            .finish_non_exhaustive()
    }
}

impl Query for CqlQuery {
    fn bind(&self, arguments: Vec<Value>) -> Box<dyn Query> {
        log::trace!("binding {} arguments to `{}`", arguments.len(), self.statement.text());
        Box::new(Self {
            session: Arc::clone(&self.session),
            statement: self.statement.bind(arguments),
            log_statements: self.log_statements,
        })
    }

    fn exec(&self) -> Result<()> {
        // Drain so failures deferred into the stream are reported.
        let mut cursor = self.run();
        while cursor.next_row().is_some() {}
        cursor.close()
    }

    fn iter(&self) -> Box<dyn RowIterator> {
        Box::new(self.run())
    }

    fn scan(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<()> {
        let mut rows = self.open()?;
        let row = cas::first_row(&mut *rows)?;
        let scanned = scan_row(&row, dest);
        rows.close()?;
        scanned
    }

    fn scan_cas(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<bool> {
        let mut rows = self.open()?;
        let row = cas::first_row(&mut *rows)?;
        let applied = cas::reconcile_single(row, dest);
        rows.close()?;
        applied
    }
}
