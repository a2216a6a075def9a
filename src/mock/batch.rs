//! Batch double.

use super::{CallLog, Script};
use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::iter::{Cursor, RowIterator};
use crate::scan::{ScanTarget, map_scan_row, scan_row};
use crate::types::{Row, Value};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A call received by [`BatchMock`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCall {
    Query {
        statement: String,
        arguments: Vec<Value>,
    },
    Execute,
    ExecuteTransaction {
        results: usize,
    },
    ExecuteTransactionMap,
}

/// Programmed outcome of a conditional batch submission.
pub struct TransactionReply {
    applied: bool,
    row: Option<Row>,
    rows: Box<dyn RowIterator>,
}

impl TransactionReply {
    /// Applied, with no row data and nothing left to iterate.
    pub fn applied() -> Self {
        Self {
            applied: true,
            row: None,
            rows: Box::new(Cursor::empty()),
        }
    }

    /// Not applied; `current` is copied into the caller's results.
    pub fn not_applied(current: Row) -> Self {
        Self {
            applied: false,
            row: Some(current),
            rows: Box::new(Cursor::empty()),
        }
    }

    /// Row copied into the caller's results, applied or not.
    pub fn with_row(mut self, row: Row) -> Self {
        self.row = Some(row);
        self
    }

    /// Iterator handed back for the remaining conditional rows.
    pub fn with_rows(mut self, rows: impl RowIterator + 'static) -> Self {
        self.rows = Box::new(rows);
        self
    }
}

struct Inner {
    query: Script<(String, Vec<Value>), Result<()>>,
    execute: Script<(), Result<()>>,
    transaction: Script<(), Result<TransactionReply>>,
    transaction_map: Script<(), Result<TransactionReply>>,
    calls: CallLog<BatchCall>,
    consumed: Mutex<bool>,
    submissions: Mutex<usize>,
}

/// Scripted [`Batch`]. Clones share their script and call log.
///
/// Like a real batch it is single use: once a submission method has run,
/// every further call returns [`Error::Consumed`] without touching the
/// script.
#[derive(Clone)]
pub struct BatchMock {
    inner: Arc<Inner>,
}

impl BatchMock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                query: Script::new("Batch::query"),
                execute: Script::new("Batch::execute"),
                transaction: Script::new("Batch::execute_transaction"),
                transaction_map: Script::new("Batch::execute_transaction_map"),
                calls: CallLog::new(),
                consumed: Mutex::new(false),
                submissions: Mutex::new(0),
            }),
        }
    }

    /// Accept one `query` call with any arguments.
    pub fn expect_query(&self) -> &Self {
        self.inner.query.push(None, Ok(()));
        self
    }

    /// Accept one `query` call with exactly these arguments.
    pub fn expect_query_with(&self, statement: impl Into<String>, arguments: Vec<Value>) -> &Self {
        self.inner
            .query
            .push(Some((statement.into(), arguments)), Ok(()));
        self
    }

    pub fn expect_execute(&self, reply: Result<()>) -> &Self {
        self.inner.execute.push(None, reply);
        self
    }

    pub fn expect_execute_transaction(&self, reply: Result<TransactionReply>) -> &Self {
        self.inner.transaction.push(None, reply);
        self
    }

    pub fn expect_execute_transaction_map(&self, reply: Result<TransactionReply>) -> &Self {
        self.inner.transaction_map.push(None, reply);
        self
    }

    pub fn calls(&self) -> Vec<BatchCall> {
        self.inner.calls.snapshot()
    }

    /// Submissions that got past the single-use check.
    pub fn submissions(&self) -> usize {
        *self.inner.submissions.lock()
    }

    pub fn is_consumed(&self) -> bool {
        *self.inner.consumed.lock()
    }

    pub fn verify(&self) {
        self.inner.query.verify();
        self.inner.execute.verify();
        self.inner.transaction.verify();
        self.inner.transaction_map.verify();
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_consumed() {
            Err(Error::Consumed)
        } else {
            Ok(())
        }
    }

    fn consume(&self) -> Result<()> {
        let mut consumed = self.inner.consumed.lock();
        if *consumed {
            return Err(Error::Consumed);
        }
        *consumed = true;
        *self.inner.submissions.lock() += 1;
        Ok(())
    }
}

impl Default for BatchMock {
    fn default() -> Self {
        Self::new()
    }
}

impl Batch for BatchMock {
    fn query(&mut self, statement: &str, arguments: Vec<Value>) -> Result<()> {
        self.inner.calls.record(BatchCall::Query {
            statement: statement.to_string(),
            arguments: arguments.clone(),
        });
        self.ensure_ready()?;
        self.inner.query.next(&(statement.to_string(), arguments))
    }

    fn execute(&mut self) -> Result<()> {
        self.inner.calls.record(BatchCall::Execute);
        self.consume()?;
        self.inner.execute.next(&())
    }

    fn execute_transaction(
        &mut self,
        results: &mut [&mut dyn ScanTarget],
    ) -> Result<(bool, Box<dyn RowIterator>)> {
        self.inner.calls.record(BatchCall::ExecuteTransaction {
            results: results.len(),
        });
        self.consume()?;
        let reply = self.inner.transaction.next(&())?;
        if let Some(row) = &reply.row {
            scan_row(row, results)?;
        }
        Ok((reply.applied, reply.rows))
    }

    fn execute_transaction_map(
        &mut self,
        results: &mut HashMap<String, Value>,
    ) -> Result<(bool, Box<dyn RowIterator>)> {
        self.inner.calls.record(BatchCall::ExecuteTransactionMap);
        self.consume()?;
        let reply = self.inner.transaction_map.next(&())?;
        if let Some(row) = &reply.row {
            map_scan_row(row, results);
        }
        Ok((reply.applied, reply.rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;

    #[test]
    fn test_query_arguments_are_checked() {
        let mut batch = BatchMock::new();
        batch.expect_query_with("INSERT INTO t (id) VALUES (?)", vec![Value::Int(1)]);

        batch
            .query("INSERT INTO t (id) VALUES (?)", vec![Value::Int(1)])
            .unwrap();
        batch.verify();
    }

    #[test]
    fn test_second_submission_is_rejected() {
        let mut batch = BatchMock::new();
        batch.expect_execute(Ok(()));

        batch.execute().unwrap();
        assert_eq!(batch.execute(), Err(Error::Consumed));
        assert_eq!(batch.query("SELECT 1", vec![]), Err(Error::Consumed));
        assert_eq!(batch.submissions(), 1);
        batch.verify();
    }

    #[test]
    fn test_transaction_conflict_scans_results() {
        let mut batch = BatchMock::new();
        batch.expect_execute_transaction(Ok(TransactionReply::not_applied(
            Row::new().with("id", 1).with("name", "old"),
        )));
        let mut id = 0i32;
        let mut name = "new".to_string();

        let (applied, mut rows) = batch
            .execute_transaction(&mut [&mut id, &mut name])
            .unwrap();

        assert!(!applied);
        assert_eq!((id, name.as_str()), (1, "old"));
        assert!(rows.close().is_ok());
    }

    #[test]
    fn test_transaction_error_has_no_iterator() {
        let mut batch = BatchMock::new();
        let err = ExecutionError::timeout("cas");
        batch.expect_execute_transaction_map(Err(err.clone().into()));

        let result = batch.execute_transaction_map(&mut HashMap::new());
        assert!(matches!(result, Err(Error::Execution(e)) if e == err));
        assert!(batch.is_consumed());
    }
}
