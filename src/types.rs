//! Column values, rows, statements and batch kinds.
//!
//! These are plain data: nothing here talks to a session. A [`Statement`] is
//! immutable once built, and a [`BatchStatement`] is the ordered list of
//! statements handed to the session on submission.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i32),
    BigInt(i64),
    Counter(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Blob(Bytes),
    Uuid(Uuid),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    List(Vec<Value>),
}

impl Value {
    /// Name of the variant, used in shape errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Counter(_) => "counter",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Blob(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(Bytes::from(v))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A named column inside a [`Row`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub value: Value,
}

/// An ordered sequence of named column values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<Column>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(Column {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|c| &c.value)
    }

    /// Look up a column by name. First match wins.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|c| &c.value)
    }

    /// Remove and return the column at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Column> {
        if index < self.columns.len() {
            Some(self.columns.remove(index))
        } else {
            None
        }
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}

/// A statement text with its positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    text: String,
    arguments: Vec<Value>,
}

impl Statement {
    pub fn new(text: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            arguments,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Same text, arguments replaced.
    pub fn bind(&self, arguments: Vec<Value>) -> Self {
        Self {
            text: self.text.clone(),
            arguments,
        }
    }
}

/// Atomicity mode of a batch. Discriminants match the protocol byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatchKind {
    /// Atomic across partitions, at the cost of a batch log write.
    #[default]
    Logged = 0,
    /// No batch log; partial application is possible.
    Unlogged = 1,
    /// Counter column updates only.
    Counter = 2,
}

impl BatchKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BatchKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BatchKind::Logged),
            1 => Ok(BatchKind::Unlogged),
            2 => Ok(BatchKind::Counter),
            other => Err(other),
        }
    }
}

/// The statements of a batch, as submitted to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatement {
    kind: BatchKind,
    statements: Vec<Statement>,
}

impl BatchStatement {
    pub fn new(kind: BatchKind) -> Self {
        Self {
            kind,
            statements: Vec::new(),
        }
    }

    pub fn with_statements(kind: BatchKind, statements: Vec<Statement>) -> Self {
        Self { kind, statements }
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub(crate) fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup() {
        let row = Row::new().with("id", 1).with("name", "old");

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Int(1)));
        assert_eq!(row.get_by_name("name"), Some(&Value::from("old")));
        assert_eq!(row.get_by_name("missing"), None);
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_row_from_pairs() {
        let row: Row = vec![("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(row.get(1), Some(&Value::BigInt(2)));
    }

    #[test]
    fn test_statement_bind_replaces_arguments() {
        let stmt = Statement::new("SELECT * FROM t WHERE id = ?", vec![Value::Int(1)]);
        let rebound = stmt.bind(vec![Value::Int(2)]);

        assert_eq!(stmt.arguments(), &[Value::Int(1)]);
        assert_eq!(rebound.arguments(), &[Value::Int(2)]);
        assert_eq!(rebound.text(), stmt.text());
    }

    #[test]
    fn test_batch_kind_protocol_bytes() {
        assert_eq!(BatchKind::Logged.as_u8(), 0);
        assert_eq!(BatchKind::Unlogged.as_u8(), 1);
        assert_eq!(BatchKind::Counter.as_u8(), 2);
        assert_eq!(BatchKind::try_from(1), Ok(BatchKind::Unlogged));
        assert_eq!(BatchKind::try_from(7), Err(7));
    }

    #[test]
    fn test_value_serialization() {
        let value = Value::List(vec![Value::Int(1), Value::from("x"), Value::Null]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
