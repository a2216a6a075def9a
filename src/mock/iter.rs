//! Iterator double.

use super::{CallLog, Script};
use crate::error::Result;
use crate::iter::RowIterator;
use crate::scan::{ScanTarget, map_scan_row, scan_row};
use crate::types::{Row, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A call received by [`RowIteratorMock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterCall {
    Scan { destinations: usize },
    MapScan,
    Close,
}

struct Inner {
    rows: Script<(), Option<Row>>,
    close: Script<(), Result<()>>,
    calls: CallLog<IterCall>,
}

/// Scripted [`RowIterator`]. Clones share their script and call log.
#[derive(Clone)]
pub struct RowIteratorMock {
    inner: Arc<Inner>,
}

impl RowIteratorMock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                rows: Script::new("RowIterator::scan"),
                close: Script::new("RowIterator::close"),
                calls: CallLog::new(),
            }),
        }
    }

    /// An iterator yielding `rows`, then the end of the result, then a
    /// clean close.
    pub fn yielding(rows: impl IntoIterator<Item = Row>) -> Self {
        let mock = Self::new();
        for row in rows {
            mock.expect_row(row);
        }
        mock.expect_end().expect_close(Ok(()));
        mock
    }

    /// The next `scan`/`map_scan` copies `row` and returns true.
    pub fn expect_row(&self, row: Row) -> &Self {
        self.inner.rows.push(None, Some(row));
        self
    }

    /// The next `scan`/`map_scan` returns false.
    pub fn expect_end(&self) -> &Self {
        self.inner.rows.push(None, None);
        self
    }

    pub fn expect_close(&self, reply: Result<()>) -> &Self {
        self.inner.close.push(None, reply);
        self
    }

    pub fn calls(&self) -> Vec<IterCall> {
        self.inner.calls.snapshot()
    }

    pub fn verify(&self) {
        self.inner.rows.verify();
        self.inner.close.verify();
    }
}

impl Default for RowIteratorMock {
    fn default() -> Self {
        Self::new()
    }
}

impl RowIterator for RowIteratorMock {
    fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> bool {
        self.inner.calls.record(IterCall::Scan {
            destinations: dest.len(),
        });
        match self.inner.rows.next(&()) {
            Some(row) => scan_row(&row, dest).is_ok(),
            None => false,
        }
    }

    fn map_scan(&mut self, dest: &mut HashMap<String, Value>) -> bool {
        self.inner.calls.record(IterCall::MapScan);
        match self.inner.rows.next(&()) {
            Some(row) => {
                map_scan_row(&row, dest);
                true
            }
            None => false,
        }
    }

    fn close(&mut self) -> Result<()> {
        self.inner.calls.record(IterCall::Close);
        self.inner.close.next(&())
    }
}
