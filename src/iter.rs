//! Forward-only row iteration.
//!
//! [`Cursor`] wraps a session [`RowStream`]. Errors never escape from
//! `scan`; they are kept and handed back by `close`, so a typical loop is
//!
//! ```rust
//! use cqlwrap::{Cursor, MemoryRows, Row, RowIterator};
//!
//! let mut iter = Cursor::new(MemoryRows::new(vec![Row::new().with("n", 1)]));
//! let mut n = 0i32;
//! while iter.scan(&mut [&mut n]) {
//!     assert_eq!(n, 1);
//! }
//! iter.close()?;
//! # Ok::<(), cqlwrap::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::scan::{ScanTarget, map_scan_row, scan_row};
use crate::session::RowStream;
use crate::types::{Row, Value};
use std::collections::HashMap;

/// Iterator over result rows.
pub trait RowIterator: Send {
    /// Advance and copy the next row into `dest` positionally.
    ///
    /// Returns false when no row is left or when copying failed; `close`
    /// tells the two apart.
    fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> bool;

    /// Advance and copy the next row into `dest` by column name.
    fn map_scan(&mut self, dest: &mut HashMap<String, Value>) -> bool;

    /// Release the cursor and report the first error seen, if any.
    fn close(&mut self) -> Result<()>;
}

enum CursorState {
    Open(Box<dyn RowStream>),
    Done,
}

/// [`RowIterator`] over a session stream.
pub struct Cursor {
    state: CursorState,
    error: Option<Error>,
    reported: bool,
    rows_read: usize,
}

impl Cursor {
    pub fn new(stream: impl RowStream + 'static) -> Self {
        Self::from_stream(Box::new(stream))
    }

    pub fn from_stream(stream: Box<dyn RowStream>) -> Self {
        Self {
            state: CursorState::Open(stream),
            error: None,
            reported: false,
            rows_read: 0,
        }
    }

    /// A cursor that yields no rows and closes with `error`.
    pub fn failed(error: Error) -> Self {
        Self {
            state: CursorState::Done,
            error: Some(error),
            reported: false,
            rows_read: 0,
        }
    }

    /// A cursor that yields no rows and closes cleanly.
    pub fn empty() -> Self {
        Self {
            state: CursorState::Done,
            error: None,
            reported: false,
            rows_read: 0,
        }
    }

    /// Build from the outcome of a session call, deferring any failure.
    pub(crate) fn from_result(result: Result<Box<dyn RowStream>>) -> Self {
        match result {
            Ok(stream) => Self::from_stream(stream),
            Err(e) => Self::failed(e),
        }
    }

    /// Number of rows handed out so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Next raw row, or `None` when exhausted or failed.
    pub fn next_row(&mut self) -> Option<Row> {
        let CursorState::Open(stream) = &mut self.state else {
            return None;
        };
        match stream.next_row() {
            Ok(Some(row)) => {
                self.rows_read += 1;
                Some(row)
            }
            Ok(None) => {
                self.finish();
                None
            }
            Err(e) => {
                self.record(e);
                self.finish();
                None
            }
        }
    }

    fn record(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn finish(&mut self) {
        if let CursorState::Open(mut stream) = std::mem::replace(&mut self.state, CursorState::Done)
            && let Err(e) = stream.close()
        {
            self.record(e);
        }
    }
}

impl RowIterator for Cursor {
    fn scan(&mut self, dest: &mut [&mut dyn ScanTarget]) -> bool {
        let Some(row) = self.next_row() else {
            return false;
        };
        match scan_row(&row, dest) {
            Ok(()) => true,
            Err(e) => {
                self.record(e);
                self.finish();
                false
            }
        }
    }

    fn map_scan(&mut self, dest: &mut HashMap<String, Value>) -> bool {
        match self.next_row() {
            Some(row) => {
                map_scan_row(&row, dest);
                true
            }
            None => false,
        }
    }

    fn close(&mut self) -> Result<()> {
        self.finish();
        self.reported = true;
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.finish();
        if let Some(e) = &self.error
            && !self.reported
        {
            log::warn!(
                "cursor dropped after {} rows with unreported error: {}",
                self.rows_read,
                e
            );
        }
    }
}
