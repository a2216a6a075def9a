use cqlwrap::cas::APPLIED_COLUMN;
use cqlwrap::mock::{SessionCall, SessionMock};
use cqlwrap::{
    Connection, Error, ExecutionError, MemoryRows, Query, Row, RowIterator, Statement, Value,
};
use std::sync::Arc;

fn connect(session: &Arc<SessionMock>) -> Connection {
    Connection::builder()
        .shared_session(session.clone())
        .log_statements(true)
        .build()
        .expect("Failed to build connection")
}

/// Iterator yields two rows, then the stream fails.
#[test]
fn test_iter_mid_stream_failure() {
    let session = Arc::new(SessionMock::new());
    let err = ExecutionError::timeout("paging timed out");
    session.expect_execute(Ok(MemoryRows::new(vec![
        Row::new().with("id", 1).with("name", "a"),
        Row::new().with("id", 2).with("name", "b"),
    ])
    .failing_with(err.clone())));
    let conn = connect(&session);

    let mut iter = conn.query("SELECT id, name FROM users", vec![]).iter();
    let mut id = 0i32;
    let mut name = String::new();

    assert!(iter.scan(&mut [&mut id, &mut name]));
    assert_eq!((id, name.as_str()), (1, "a"));
    assert!(iter.scan(&mut [&mut id, &mut name]));
    assert_eq!((id, name.as_str()), (2, "b"));
    assert!(!iter.scan(&mut [&mut id, &mut name]));

    assert_eq!(iter.close(), Err(Error::Execution(err)));
}

/// Condition holds: applied, destinations untouched.
#[test]
fn test_scan_cas_applied() {
    let session = Arc::new(SessionMock::new());
    session.expect_execute(Ok(MemoryRows::new(vec![
        Row::new().with(APPLIED_COLUMN, true),
    ])));
    let conn = connect(&session);

    let mut id = 42i32;
    let mut name = String::from("proposed");
    let applied = conn
        .query(
            "INSERT INTO users (id, name) VALUES (?, ?) IF NOT EXISTS",
            vec![42.into(), "proposed".into()],
        )
        .scan_cas(&mut [&mut id, &mut name])
        .expect("scan_cas failed");

    assert!(applied);
    assert_eq!(id, 42);
    assert_eq!(name, "proposed");
}

/// Condition fails: not an error, current values reported.
#[test]
fn test_scan_cas_not_applied() {
    let session = Arc::new(SessionMock::new());
    session.expect_execute(Ok(MemoryRows::new(vec![
        Row::new()
            .with(APPLIED_COLUMN, false)
            .with("id", 42)
            .with("name", "existing"),
    ])));
    let conn = connect(&session);

    let mut id = 42i32;
    let mut name = String::from("proposed");
    let applied = conn
        .query("INSERT INTO users (id, name) VALUES (42, 'proposed') IF NOT EXISTS", vec![])
        .scan_cas(&mut [&mut id, &mut name])
        .unwrap();

    assert!(!applied);
    assert_eq!(name, "existing");
}

/// A conditional result without `[applied]` is a shape problem.
#[test]
fn test_scan_cas_missing_applied_column() {
    let session = Arc::new(SessionMock::new());
    session.expect_execute(Ok(MemoryRows::new(vec![Row::new().with("id", 1)])));
    let conn = connect(&session);

    let mut id = 0i32;
    let err = conn
        .query("SELECT id FROM users", vec![])
        .scan_cas(&mut [&mut id])
        .unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
}

/// not found vs failed
#[test]
fn test_scan_distinguishes_no_rows() {
    let session = Arc::new(SessionMock::new());
    session
        .expect_execute(Ok(MemoryRows::empty()))
        .expect_execute(Err(ExecutionError::rejected("syntax error").into()));
    let conn = connect(&session);
    let mut name = String::new();

    let missing = conn
        .scan("SELECT name FROM users WHERE id = 1", vec![], &mut [&mut name])
        .unwrap_err();
    let failed = conn
        .scan("SELEC name FROM users", vec![], &mut [&mut name])
        .unwrap_err();

    assert!(missing.is_not_found());
    assert!(!failed.is_not_found());
    session.verify();
}

#[test]
fn test_bind_then_exec() {
    let session = Arc::new(SessionMock::new());
    session.expect_execute_with(
        Statement::new("DELETE FROM users WHERE id = ?", vec![Value::Int(7)]),
        Ok(MemoryRows::empty()),
    );
    let conn = connect(&session);

    let query = conn.query("DELETE FROM users WHERE id = ?", vec![]);
    query.bind(vec![Value::Int(7)]).exec().unwrap();

    assert_eq!(session.calls().len(), 1);
    session.verify();
}

#[test]
fn test_scan_iter_shorthand() {
    let session = Arc::new(SessionMock::new());
    session.expect_execute(Ok(MemoryRows::new(
        (0..3).map(|i| Row::new().with("n", i)),
    )));
    let conn = connect(&session);

    let mut iter = conn.scan_iter("SELECT n FROM numbers", vec![]);
    let mut n = 0i32;
    let mut total = 0;
    while iter.scan(&mut [&mut n]) {
        total += n;
    }
    iter.close().unwrap();

    assert_eq!(total, 3);
    assert!(matches!(session.calls()[0], SessionCall::Execute(_)));
}

/// A failure the session defers into the result still fails `exec`.
#[test]
fn test_exec_reports_stream_failure() {
    let session = Arc::new(SessionMock::new());
    let err = ExecutionError::rejected("write rejected");
    session.expect_execute(Ok(MemoryRows::empty().failing_with(err.clone())));
    let conn = connect(&session);

    let result = conn
        .query("UPDATE users SET name = 'x' WHERE id = 1", vec![])
        .exec();

    assert_eq!(result, Err(Error::Execution(err)));
    session.verify();
}
