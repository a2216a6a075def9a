//! Copying row values into caller-supplied destinations.
//!
//! A destination is anything implementing [`ScanTarget`]. Positional scans
//! take a slice of `&mut dyn ScanTarget`, one per column; name-keyed scans
//! fill a `HashMap<String, Value>`.
//!
//! `Null` scans into `None` for `Option<T>` and into the default value for
//! every other target, which is what CQL drivers conventionally do.

use crate::error::{Result, ShapeError};
use crate::types::{Row, Value};
use bytes::Bytes;
use std::collections::HashMap;
use uuid::Uuid;

/// A place a single column value can be written to.
pub trait ScanTarget {
    /// Overwrite `self` with `value`. `column` is only used in errors.
    fn scan_value(&mut self, column: &str, value: &Value) -> Result<()>;
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> crate::error::Error {
    ShapeError::Type {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
    .into()
}

macro_rules! scan_target {
    ($ty:ty, $name:literal, { $($pat:pat => $out:expr),+ $(,)? }) => {
        impl ScanTarget for $ty {
            fn scan_value(&mut self, column: &str, value: &Value) -> Result<()> {
                *self = match value {
                    Value::Null => <$ty>::default(),
                    $($pat => $out,)+
                    other => return Err(mismatch(column, $name, other)),
                };
                Ok(())
            }
        }
    };
}

scan_target!(bool, "bool", { Value::Boolean(b) => *b });
scan_target!(i32, "i32", { Value::Int(v) => *v });
scan_target!(i64, "i64", {
    Value::Int(v) => i64::from(*v),
    Value::BigInt(v) | Value::Counter(v) | Value::Timestamp(v) => *v,
});
scan_target!(f32, "f32", { Value::Float(v) => *v });
scan_target!(f64, "f64", {
    Value::Float(v) => f64::from(*v),
    Value::Double(v) => *v,
});
scan_target!(String, "String", { Value::Text(s) => s.clone() });
scan_target!(Bytes, "Bytes", { Value::Blob(b) => b.clone() });
scan_target!(Vec<u8>, "Vec<u8>", { Value::Blob(b) => b.to_vec() });
scan_target!(Uuid, "Uuid", { Value::Uuid(u) => *u });

impl ScanTarget for Value {
    fn scan_value(&mut self, _column: &str, value: &Value) -> Result<()> {
        *self = value.clone();
        Ok(())
    }
}

impl<T: ScanTarget + Default> ScanTarget for Option<T> {
    fn scan_value(&mut self, column: &str, value: &Value) -> Result<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.scan_value(column, value)?;
        *self = Some(inner);
        Ok(())
    }
}

/// Copy `row` positionally into `dest`. The column count must match exactly.
///
/// Destinations before a failing column keep the values already written.
pub fn scan_row(row: &Row, dest: &mut [&mut dyn ScanTarget]) -> Result<()> {
    if row.len() != dest.len() {
        return Err(ShapeError::ColumnCount {
            expected: dest.len(),
            found: row.len(),
        }
        .into());
    }
    for (column, target) in row.columns().iter().zip(dest.iter_mut()) {
        target.scan_value(&column.name, &column.value)?;
    }
    Ok(())
}

/// Copy every column of `row` into `dest` by name, overwriting existing entries.
pub fn map_scan_row(row: &Row, dest: &mut HashMap<String, Value>) {
    for column in row.columns() {
        dest.insert(column.name.clone(), column.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_scan_row_positional() {
        let row = Row::new().with("id", 7).with("name", "ada").with("score", 1.5f64);
        let mut id = 0i32;
        let mut name = String::new();
        let mut score = 0.0f64;

        scan_row(&row, &mut [&mut id, &mut name, &mut score]).unwrap();

        assert_eq!(id, 7);
        assert_eq!(name, "ada");
        assert_eq!(score, 1.5);
    }

    #[test]
    fn test_scan_row_count_mismatch() {
        let row = Row::new().with("id", 7);
        let mut id = 0i32;
        let mut name = String::new();

        let err = scan_row(&row, &mut [&mut id, &mut name]).unwrap_err();
        assert_eq!(
            err,
            Error::Shape(ShapeError::ColumnCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_scan_type_mismatch_names_column() {
        let row = Row::new().with("name", "ada");
        let mut id = 0i32;

        let err = scan_row(&row, &mut [&mut id]).unwrap_err();
        assert_eq!(
            err,
            Error::Shape(ShapeError::Type {
                column: "name".into(),
                expected: "i32",
                found: "text",
            })
        );
    }

    #[test]
    fn test_scan_null_into_option_and_default() {
        let row = Row::new().with("a", Value::Null).with("b", Value::Null);
        let mut a: Option<String> = Some("stale".into());
        let mut b = 42i64;

        scan_row(&row, &mut [&mut a, &mut b]).unwrap();

        assert_eq!(a, None);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_scan_widening() {
        let row = Row::new()
            .with("n", Value::Int(3))
            .with("c", Value::Counter(9))
            .with("f", Value::Float(0.5));
        let mut n = 0i64;
        let mut c = 0i64;
        let mut f = 0.0f64;

        scan_row(&row, &mut [&mut n, &mut c, &mut f]).unwrap();

        assert_eq!((n, c, f), (3, 9, 0.5));
    }

    #[test]
    fn test_map_scan_overwrites() {
        let row = Row::new().with("id", 1).with("name", "old");
        let mut dest = HashMap::new();
        dest.insert("name".to_string(), Value::from("new"));

        map_scan_row(&row, &mut dest);

        assert_eq!(dest.get("name"), Some(&Value::from("old")));
        assert_eq!(dest.get("id"), Some(&Value::Int(1)));
    }
}
