//! Scripted test doubles for sessions, queries, batches and iterators.
//!
//! Every double implements the same trait as its production counterpart.
//! Return values are programmed up front with `expect_*` calls and handed
//! out in order; each call is recorded and can be inspected afterwards.
//!
//! ```rust
//! use cqlwrap::mock::{QueryMock, QueryCall};
//! use cqlwrap::Query;
//!
//! let query = QueryMock::new();
//! query.expect_exec(Ok(()));
//!
//! query.exec()?;
//!
//! assert_eq!(query.calls(), vec![QueryCall::Exec]);
//! query.verify();
//! # Ok::<(), cqlwrap::Error>(())
//! ```
//!
//! # Panics
//!
//! A call with no programmed expectation left panics, as does a call whose
//! arguments differ from the ones given to an `expect_*_with` method.
//! `verify` panics when programmed expectations were never used.

mod batch;
mod iter;
mod query;
mod session;

pub use batch::{BatchCall, BatchMock, TransactionReply};
pub use iter::{IterCall, RowIteratorMock};
pub use query::{QueryCall, QueryMock};
pub use session::{SessionCall, SessionMock};

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;

/// FIFO of programmed replies for one method.
pub(crate) struct Script<A, R> {
    method: &'static str,
    queue: Mutex<VecDeque<(Option<A>, R)>>,
}

impl<A: PartialEq + Debug, R> Script<A, R> {
    pub(crate) fn new(method: &'static str) -> Self {
        Self {
            method,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, expected: Option<A>, reply: R) {
        self.queue.lock().push_back((expected, reply));
    }

    /// Pop the next reply, checking `args` against the expectation.
    pub(crate) fn next(&self, args: &A) -> R {
        let next = self.queue.lock().pop_front();
        let Some((expected, reply)) = next else {
            panic!("unexpected call to {} with {:?}", self.method, args);
        };
        if let Some(expected) = expected
            && expected != *args
        {
            panic!(
                "{} called with {:?}, expected {:?}",
                self.method, args, expected
            );
        }
        reply
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub(crate) fn verify(&self) {
        let pending = self.pending();
        assert!(
            pending == 0,
            "{} has {} unused expectation(s)",
            self.method,
            pending
        );
    }
}

/// Append-only call log.
pub(crate) struct CallLog<C>(Mutex<Vec<C>>);

impl<C: Clone> CallLog<C> {
    pub(crate) fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    pub(crate) fn record(&self, call: C) {
        self.0.lock().push(call);
    }

    pub(crate) fn snapshot(&self) -> Vec<C> {
        self.0.lock().clone()
    }
}
