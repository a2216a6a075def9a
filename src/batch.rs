//! Batched and conditional batched execution.

use crate::error::{Error, Result};
use crate::iter::{Cursor, RowIterator};
use crate::scan::ScanTarget;
use crate::session::Session;
use crate::types::{BatchKind, BatchStatement, Statement, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// An ordered group of statements submitted together.
///
/// A batch is single use: after any of the submission methods has been
/// called, every method returns [`Error::Consumed`].
pub trait Batch: Send {
    /// Append a statement.
    fn query(&mut self, statement: &str, arguments: Vec<Value>) -> Result<()>;

    /// Submit all statements for effect.
    fn execute(&mut self) -> Result<()>;

    /// Submit as a conditional batch. The first result row is scanned into
    /// `results` positionally; the iterator ranges over the rows after it.
    fn execute_transaction(
        &mut self,
        results: &mut [&mut dyn ScanTarget],
    ) -> Result<(bool, Box<dyn RowIterator>)>;

    /// Submit as a conditional batch. The first result row is copied into
    /// `results` by column name; the iterator ranges over the rows after it.
    fn execute_transaction_map(
        &mut self,
        results: &mut HashMap<String, Value>,
    ) -> Result<(bool, Box<dyn RowIterator>)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Ready,
    Consumed,
}

/// [`Batch`] submitted through a [`Session`].
pub struct CqlBatch {
    session: Arc<dyn Session>,
    batch: BatchStatement,
    state: BatchState,
    warn_threshold: usize,
}

impl CqlBatch {
    pub(crate) fn new(session: Arc<dyn Session>, kind: BatchKind, warn_threshold: usize) -> Self {
        Self {
            session,
            batch: BatchStatement::new(kind),
            state: BatchState::Ready,
            warn_threshold,
        }
    }

    pub fn kind(&self) -> BatchKind {
        self.batch.kind()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn is_consumed(&self) -> bool {
        self.state == BatchState::Consumed
    }

    /// Statements queued so far. Fails once the batch was submitted.
    pub fn statements(&self) -> Result<&[Statement]> {
        self.ensure_ready()?;
        Ok(self.batch.statements())
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state {
            BatchState::Ready => Ok(()),
            BatchState::Consumed => Err(Error::Consumed),
        }
    }

    /// Mark the batch consumed and hand its statements over for submission.
    fn take(&mut self) -> Result<BatchStatement> {
        self.ensure_ready()?;
        self.state = BatchState::Consumed;
        let kind = self.batch.kind();
        let batch = std::mem::replace(&mut self.batch, BatchStatement::new(kind));

        log::debug!(
            "submitting {:?} batch of {} statements",
            batch.kind(),
            batch.len()
        );
        if batch.len() > self.warn_threshold {
            log::warn!(
                "batch of {} statements exceeds warn threshold of {}",
                batch.len(),
                self.warn_threshold
            );
        }
        Ok(batch)
    }
}

impl std::fmt::Debug for CqlBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CqlBatch")
            .field("batch", &self.batch)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Batch for CqlBatch {
    fn query(&mut self, statement: &str, arguments: Vec<Value>) -> Result<()> {
        self.ensure_ready()?;
        self.batch.push(Statement::new(statement, arguments));
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        let batch = self.take()?;
        self.session.execute_batch(&batch)
    }

    fn execute_transaction(
        &mut self,
        results: &mut [&mut dyn ScanTarget],
    ) -> Result<(bool, Box<dyn RowIterator>)> {
        let batch = self.take()?;
        let (applied, rows) = self.session.execute_batch_cas(&batch, results)?;
        let rows: Box<dyn RowIterator> = Box::new(Cursor::from_stream(rows));
        Ok((applied, rows))
    }

    fn execute_transaction_map(
        &mut self,
        results: &mut HashMap<String, Value>,
    ) -> Result<(bool, Box<dyn RowIterator>)> {
        let batch = self.take()?;
        let (applied, rows) = self.session.map_execute_batch_cas(&batch, results)?;
        let rows: Box<dyn RowIterator> = Box::new(Cursor::from_stream(rows));
        Ok((applied, rows))
    }
}
