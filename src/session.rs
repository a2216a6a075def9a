//! Session abstraction for cqlwrap
//!
//! This module defines the seam to the underlying database driver. The
//! driver owns connections, transport, retries and paging; cqlwrap only
//! needs the handful of calls below, which makes it possible to run every
//! query and batch against [`SessionMock`](crate::mock::SessionMock) or any
//! other implementation.

use crate::cas;
use crate::error::{Error, Result};
use crate::scan::ScanTarget;
use crate::types::{BatchStatement, Row, Statement, Value};
use std::collections::{HashMap, VecDeque};

/// Raw row cursor returned by a session.
///
/// Rows are pulled one at a time; a failure part way through the result is
/// reported by `next_row` once the rows before it have been read.
pub trait RowStream: Send {
    /// Next row, or `None` once the result is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Release driver resources. Further `next_row` calls yield `None`.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Database session as seen by queries and batches.
pub trait Session: Send + Sync {
    /// Execute a single statement. Implementations may defer failures into
    /// the returned stream.
    fn execute(&self, statement: &Statement) -> Result<Box<dyn RowStream>>;

    /// Submit a batch for effect.
    fn execute_batch(&self, batch: &BatchStatement) -> Result<()>;

    /// Submit a conditional batch and return the raw conditional rows,
    /// `[applied]` column included.
    fn execute_batch_conditional(&self, batch: &BatchStatement) -> Result<Box<dyn RowStream>>;

    /// Submit a conditional batch, scanning the first row into `dest`
    /// positionally. The returned stream yields the rows after the first.
    fn execute_batch_cas(
        &self,
        batch: &BatchStatement,
        dest: &mut [&mut dyn ScanTarget],
    ) -> Result<(bool, Box<dyn RowStream>)> {
        let mut rows = self.execute_batch_conditional(batch)?;
        let row = cas::first_row(&mut *rows)?;
        match cas::reconcile_positional(row, dest) {
            Ok(applied) => Ok((applied, rows)),
            Err(e) => {
                cas::discard(&mut *rows);
                Err(e)
            }
        }
    }

    /// Submit a conditional batch, distributing the first row into `dest` by
    /// column name. The returned stream yields the rows after the first.
    fn map_execute_batch_cas(
        &self,
        batch: &BatchStatement,
        dest: &mut HashMap<String, Value>,
    ) -> Result<(bool, Box<dyn RowStream>)> {
        let mut rows = self.execute_batch_conditional(batch)?;
        let row = cas::first_row(&mut *rows)?;
        match cas::reconcile_map(row, dest) {
            Ok(applied) => Ok((applied, rows)),
            Err(e) => {
                cas::discard(&mut *rows);
                Err(e)
            }
        }
    }

    /// Close the session. The default does nothing.
    fn close(&self) {}
}

/// In-memory row stream.
///
/// Yields the given rows in order, then the configured failure (if any),
/// then nothing.
#[derive(Debug, Default)]
pub struct MemoryRows {
    rows: VecDeque<Row>,
    failure: Option<Error>,
    close_error: Option<Error>,
    closed: bool,
}

impl MemoryRows {
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Report `error` from `next_row` once the rows are used up.
    pub fn failing_with(mut self, error: impl Into<Error>) -> Self {
        self.failure = Some(error.into());
        self
    }

    /// Report `error` from `close`.
    pub fn with_close_error(mut self, error: impl Into<Error>) -> Self {
        self.close_error = Some(error.into());
        self
    }
}

impl RowStream for MemoryRows {
    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.closed {
            return Ok(None);
        }
        if let Some(row) = self.rows.pop_front() {
            return Ok(Some(row));
        }
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.rows.clear();
        match self.close_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
