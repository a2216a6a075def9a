//! Query double.

use super::{CallLog, Script};
use crate::error::Result;
use crate::iter::RowIterator;
use crate::query::Query;
use crate::scan::{ScanTarget, scan_row};
use crate::types::{Row, Value};
use std::sync::Arc;

/// A call received by [`QueryMock`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryCall {
    Bind(Vec<Value>),
    Exec,
    Iter,
    Scan { destinations: usize },
    ScanCas { destinations: usize },
}

struct Inner {
    bind: Script<Vec<Value>, QueryMock>,
    exec: Script<(), Result<()>>,
    iter: Script<(), Box<dyn RowIterator>>,
    scan: Script<(), Result<Row>>,
    scan_cas: Script<(), Result<(bool, Option<Row>)>>,
    calls: CallLog<QueryCall>,
}

/// Scripted [`Query`]. Clones share their script and call log.
#[derive(Clone)]
pub struct QueryMock {
    inner: Arc<Inner>,
}

impl QueryMock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                bind: Script::new("Query::bind"),
                exec: Script::new("Query::exec"),
                iter: Script::new("Query::iter"),
                scan: Script::new("Query::scan"),
                scan_cas: Script::new("Query::scan_cas"),
                calls: CallLog::new(),
            }),
        }
    }

    /// `bind` returns `bound`. Keep a clone of it to script and inspect the
    /// bound query.
    pub fn expect_bind(&self, bound: QueryMock) -> &Self {
        self.inner.bind.push(None, bound);
        self
    }

    pub fn expect_bind_with(&self, arguments: Vec<Value>, bound: QueryMock) -> &Self {
        self.inner.bind.push(Some(arguments), bound);
        self
    }

    pub fn expect_exec(&self, reply: Result<()>) -> &Self {
        self.inner.exec.push(None, reply);
        self
    }

    pub fn expect_iter(&self, iter: impl RowIterator + 'static) -> &Self {
        self.inner.iter.push(None, Box::new(iter));
        self
    }

    /// `scan` copies `reply`'s row into the destinations, or fails with its
    /// error.
    pub fn expect_scan(&self, reply: Result<Row>) -> &Self {
        self.inner.scan.push(None, reply);
        self
    }

    /// `scan_cas` reports `Ok(true)` and leaves the destinations alone.
    pub fn expect_scan_cas_applied(&self) -> &Self {
        self.inner.scan_cas.push(None, Ok((true, None)));
        self
    }

    /// `scan_cas` reports `Ok(false)` and copies `current` into the
    /// destinations.
    pub fn expect_scan_cas_conflict(&self, current: Row) -> &Self {
        self.inner.scan_cas.push(None, Ok((false, Some(current))));
        self
    }

    pub fn expect_scan_cas_error(&self, error: impl Into<crate::error::Error>) -> &Self {
        self.inner.scan_cas.push(None, Err(error.into()));
        self
    }

    pub fn calls(&self) -> Vec<QueryCall> {
        self.inner.calls.snapshot()
    }

    pub fn verify(&self) {
        self.inner.bind.verify();
        self.inner.exec.verify();
        self.inner.iter.verify();
        self.inner.scan.verify();
        self.inner.scan_cas.verify();
    }
}

impl Default for QueryMock {
    fn default() -> Self {
        Self::new()
    }
}

impl Query for QueryMock {
    fn bind(&self, arguments: Vec<Value>) -> Box<dyn Query> {
        self.inner.calls.record(QueryCall::Bind(arguments.clone()));
        Box::new(self.inner.bind.next(&arguments))
    }

    fn exec(&self) -> Result<()> {
        self.inner.calls.record(QueryCall::Exec);
        self.inner.exec.next(&())
    }

    fn iter(&self) -> Box<dyn RowIterator> {
        self.inner.calls.record(QueryCall::Iter);
        self.inner.iter.next(&())
    }

    fn scan(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<()> {
        self.inner.calls.record(QueryCall::Scan {
            destinations: dest.len(),
        });
        let row = self.inner.scan.next(&())?;
        scan_row(&row, dest)
    }

    fn scan_cas(&self, dest: &mut [&mut dyn ScanTarget]) -> Result<bool> {
        self.inner.calls.record(QueryCall::ScanCas {
            destinations: dest.len(),
        });
        match self.inner.scan_cas.next(&())? {
            (false, Some(current)) => {
                scan_row(&current, dest)?;
                Ok(false)
            }
            (applied, _) => Ok(applied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ExecutionError};
    use crate::mock::RowIteratorMock;

    #[test]
    fn test_bind_returns_scripted_query() {
        let query = QueryMock::new();
        let bound = QueryMock::new();
        bound.expect_exec(Ok(()));
        query.expect_bind_with(vec![Value::Int(5)], bound.clone());

        query.bind(vec![Value::Int(5)]).exec().unwrap();

        assert_eq!(query.calls(), vec![QueryCall::Bind(vec![Value::Int(5)])]);
        assert_eq!(bound.calls(), vec![QueryCall::Exec]);
        query.verify();
        bound.verify();
    }

    #[test]
    fn test_scan_cas_conflict_writes_destinations() {
        let query = QueryMock::new();
        query.expect_scan_cas_conflict(Row::new().with("name", "old"));
        let mut name = "new".to_string();

        assert!(!query.scan_cas(&mut [&mut name]).unwrap());
        assert_eq!(name, "old");
    }

    #[test]
    fn test_scan_cas_applied_keeps_destinations() {
        let query = QueryMock::new();
        query.expect_scan_cas_applied();
        let mut name = "new".to_string();

        assert!(query.scan_cas(&mut [&mut name]).unwrap());
        assert_eq!(name, "new");
    }

    #[test]
    fn test_scan_error() {
        let query = QueryMock::new();
        query
            .expect_scan(Err(Error::NoRows))
            .expect_scan_cas_error(ExecutionError::timeout("cas"));
        let mut n = 0i32;

        assert_eq!(query.scan(&mut [&mut n]), Err(Error::NoRows));
        assert!(query.scan_cas(&mut [&mut n]).unwrap_err().is_timeout());
    }

    #[test]
    fn test_iter_hands_out_scripted_iterator() {
        let query = QueryMock::new();
        query.expect_iter(RowIteratorMock::yielding(vec![Row::new().with("n", 9)]));
        let mut n = 0i32;

        let mut iter = query.iter();
        assert!(iter.scan(&mut [&mut n]));
        assert!(!iter.scan(&mut [&mut n]));
        iter.close().unwrap();
        assert_eq!(n, 9);
    }
}
