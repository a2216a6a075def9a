//! Lightweight transaction result handling.
//!
//! A conditional statement answers with a row whose `[applied]` column says
//! whether the condition held. When it did not, the remaining columns are
//! the values currently stored. When it did, the server usually sends
//! `[applied]` alone and the caller's destinations are left untouched.

use crate::error::{Error, Result, ShapeError};
use crate::scan::{ScanTarget, map_scan_row, scan_row};
use crate::session::RowStream;
use crate::types::{Row, Value};
use std::collections::HashMap;

/// Name of the outcome column in conditional results.
pub const APPLIED_COLUMN: &str = "[applied]";

/// Remove the `[applied]` column from `row` and return its value.
pub fn take_applied(row: &mut Row) -> Result<bool> {
    let index = row
        .names()
        .position(|name| name == APPLIED_COLUMN)
        .ok_or(ShapeError::MissingApplied)?;
    match row.remove(index).map(|c| c.value) {
        Some(Value::Boolean(applied)) => Ok(applied),
        _ => Err(ShapeError::MissingApplied.into()),
    }
}

/// Read the first row of a result. An empty result is [`Error::NoRows`],
/// even when closing the stream fails afterwards.
///
/// The stream is closed on every error path.
pub(crate) fn first_row(rows: &mut dyn RowStream) -> Result<Row> {
    match rows.next_row() {
        Ok(Some(row)) => Ok(row),
        Ok(None) => {
            discard(rows);
            Err(Error::NoRows)
        }
        Err(e) => {
            discard(rows);
            Err(e)
        }
    }
}

/// Close a stream whose result is being dropped on an error path.
pub(crate) fn discard(rows: &mut dyn RowStream) {
    if let Err(e) = rows.close() {
        log::debug!("ignoring close error on discarded result: {}", e);
    }
}

/// Positional reconciliation used by batches: whatever columns follow
/// `[applied]` are scanned into `dest`, applied or not.
pub(crate) fn reconcile_positional(mut row: Row, dest: &mut [&mut dyn ScanTarget]) -> Result<bool> {
    let applied = take_applied(&mut row)?;
    if !row.is_empty() {
        scan_row(&row, dest)?;
    }
    Ok(applied)
}

/// Name-keyed reconciliation: every column but `[applied]` goes into `dest`.
pub(crate) fn reconcile_map(mut row: Row, dest: &mut HashMap<String, Value>) -> Result<bool> {
    let applied = take_applied(&mut row)?;
    map_scan_row(&row, dest);
    Ok(applied)
}

/// Single-statement reconciliation: destinations are only written when the
/// condition failed.
pub(crate) fn reconcile_single(mut row: Row, dest: &mut [&mut dyn ScanTarget]) -> Result<bool> {
    let applied = take_applied(&mut row)?;
    if !applied && !row.is_empty() {
        scan_row(&row, dest)?;
    }
    Ok(applied)
}
