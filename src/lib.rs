//! Mockable facade over CQL sessions with batch and lightweight-transaction support.
//!
//! ## Features
//! - **Queries**: bind, execute, scan a single row, iterate, conditional `scan_cas`
//! - **Batches**: logged, unlogged and counter batches, single use
//! - **Lightweight transactions**: `[applied]` handling with positional or
//!   name-keyed result binding
//! - **Test doubles**: every contract has a scripted double in [`mock`]
//!
//! The database driver sits behind the [`Session`] trait; cqlwrap never
//! opens connections or retries on its own.
//!
//! ```rust
//! use cqlwrap::mock::SessionMock;
//! use cqlwrap::{Batch, BatchKind, Connection, MemoryRows, Row};
//! use std::collections::HashMap;
//!
//! let session = SessionMock::new();
//! session.expect_execute_batch_conditional(Ok(MemoryRows::new(vec![
//!     Row::new().with("[applied]", false).with("id", 1).with("name", "old"),
//! ])));
//! let conn = Connection::new(session);
//!
//! let mut batch = conn.batch(BatchKind::Logged);
//! batch.query(
//!     "UPDATE users SET name = ? WHERE id = ? IF name = ?",
//!     vec!["new".into(), 1.into(), "older".into()],
//! )?;
//!
//! let mut current = HashMap::new();
//! let (applied, mut rest) = batch.execute_transaction_map(&mut current)?;
//! assert!(!applied);
//! assert_eq!(current["name"].as_str(), Some("old"));
//! rest.close()?;
//! # Ok::<(), cqlwrap::Error>(())
//! ```

pub mod batch;
pub mod builder;
pub mod cas;
pub mod config;
pub mod connection;
pub mod error;
pub mod iter;
pub mod query;
pub mod scan;
pub mod session;
pub mod types;

#[cfg(feature = "mock")]
pub mod mock;

pub use batch::{Batch, BatchState, CqlBatch};
pub use builder::ConnectionBuilder;
pub use config::Config;
pub use connection::Connection;
pub use error::{Error, ExecutionError, ExecutionErrorKind, Result, ShapeError};
pub use iter::{Cursor, RowIterator};
pub use query::{CqlQuery, Query};
pub use scan::ScanTarget;
pub use session::{MemoryRows, RowStream, Session};
pub use types::{BatchKind, BatchStatement, Column, Row, Statement, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Batch, BatchKind, Connection, Query, RowIterator};

    pub use crate::{Error, Result, Row, ScanTarget, Value};

    pub use crate::{Config, Session};
}
