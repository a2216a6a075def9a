//! Session double.

use super::{CallLog, Script};
use crate::error::Result;
use crate::session::{MemoryRows, RowStream, Session};
use crate::types::{BatchStatement, Statement};

/// A call received by [`SessionMock`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Execute(Statement),
    ExecuteBatch(BatchStatement),
    ExecuteBatchConditional(BatchStatement),
    Close,
}

/// Scripted [`Session`].
///
/// The conditional batch entry points use the trait's provided
/// implementations, so the `[applied]` handling under test is the real one.
pub struct SessionMock {
    execute: Script<Statement, Result<MemoryRows>>,
    execute_batch: Script<BatchStatement, Result<()>>,
    execute_batch_conditional: Script<BatchStatement, Result<MemoryRows>>,
    calls: CallLog<SessionCall>,
}

impl SessionMock {
    pub fn new() -> Self {
        Self {
            execute: Script::new("Session::execute"),
            execute_batch: Script::new("Session::execute_batch"),
            execute_batch_conditional: Script::new("Session::execute_batch_conditional"),
            calls: CallLog::new(),
        }
    }

    pub fn expect_execute(&self, reply: Result<MemoryRows>) -> &Self {
        self.execute.push(None, reply);
        self
    }

    pub fn expect_execute_with(&self, statement: Statement, reply: Result<MemoryRows>) -> &Self {
        self.execute.push(Some(statement), reply);
        self
    }

    pub fn expect_execute_batch(&self, reply: Result<()>) -> &Self {
        self.execute_batch.push(None, reply);
        self
    }

    pub fn expect_execute_batch_with(&self, batch: BatchStatement, reply: Result<()>) -> &Self {
        self.execute_batch.push(Some(batch), reply);
        self
    }

    pub fn expect_execute_batch_conditional(&self, reply: Result<MemoryRows>) -> &Self {
        self.execute_batch_conditional.push(None, reply);
        self
    }

    pub fn expect_execute_batch_conditional_with(
        &self,
        batch: BatchStatement,
        reply: Result<MemoryRows>,
    ) -> &Self {
        self.execute_batch_conditional.push(Some(batch), reply);
        self
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.snapshot()
    }

    /// Batches received so far, conditional or not, in submission order.
    pub fn submitted_batches(&self) -> Vec<BatchStatement> {
        self.calls
            .snapshot()
            .into_iter()
            .filter_map(|call| match call {
                SessionCall::ExecuteBatch(b) | SessionCall::ExecuteBatchConditional(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    pub fn batch_submissions(&self) -> usize {
        self.submitted_batches().len()
    }

    /// Panic if any programmed reply was not used.
    pub fn verify(&self) {
        self.execute.verify();
        self.execute_batch.verify();
        self.execute_batch_conditional.verify();
    }
}

impl Default for SessionMock {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for SessionMock {
    fn execute(&self, statement: &Statement) -> Result<Box<dyn RowStream>> {
        self.calls.record(SessionCall::Execute(statement.clone()));
        let rows = self.execute.next(statement)?;
        Ok(Box::new(rows))
    }

    fn execute_batch(&self, batch: &BatchStatement) -> Result<()> {
        self.calls.record(SessionCall::ExecuteBatch(batch.clone()));
        self.execute_batch.next(batch)
    }

    fn execute_batch_conditional(&self, batch: &BatchStatement) -> Result<Box<dyn RowStream>> {
        self.calls
            .record(SessionCall::ExecuteBatchConditional(batch.clone()));
        let rows = self.execute_batch_conditional.next(batch)?;
        Ok(Box::new(rows))
    }

    fn close(&self) {
        self.calls.record(SessionCall::Close);
    }
}
