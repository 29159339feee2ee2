// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read-only relational data source seam (query in, named rows out) plus the SQLite-backed implementation
// role: source/relational
// inputs: SQL text with positional parameters; a legacy review database copy on disk
// outputs: Vec<Row> whose values are addressed by column name and converted with typed accessors
// side_effects: Opens the database file read-only
// invariants:
// - Rows never expose positional access; callers name the columns they need
// - Typed accessors fail with MissingColumn/ColumnType instead of guessing
// errors: rusqlite errors surface as MigrateError::Database
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};

use crate::credentials::DbConnection;
use crate::error::{MigrateError, Result};

/// A single cell as returned by the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl SqlValue {
  fn describe(&self) -> String {
    match self {
      SqlValue::Null => "NULL".to_string(),
      SqlValue::Integer(i) => i.to_string(),
      SqlValue::Real(r) => r.to_string(),
      SqlValue::Text(s) => format!("{:?}", s),
      SqlValue::Blob(b) => format!("<{} byte blob>", b.len()),
    }
  }

  fn to_sqlite(&self) -> Value {
    match self {
      SqlValue::Null => Value::Null,
      SqlValue::Integer(i) => Value::Integer(*i),
      SqlValue::Real(r) => Value::Real(*r),
      SqlValue::Text(s) => Value::Text(s.clone()),
      SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
  }
}

impl From<ValueRef<'_>> for SqlValue {
  fn from(v: ValueRef<'_>) -> Self {
    match v {
      ValueRef::Null => SqlValue::Null,
      ValueRef::Integer(i) => SqlValue::Integer(i),
      ValueRef::Real(r) => SqlValue::Real(r),
      ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
      ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
  }
}

impl From<i64> for SqlValue {
  fn from(v: i64) -> Self {
    SqlValue::Integer(v)
  }
}

impl From<&str> for SqlValue {
  fn from(v: &str) -> Self {
    SqlValue::Text(v.to_string())
  }
}

/// A result row addressed by column name.
#[derive(Debug, Clone)]
pub struct Row {
  columns: Vec<String>,
  values: Vec<SqlValue>,
}

impl Row {
  pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
    Self { columns, values }
  }

  pub fn get(&self, column: &str) -> Result<&SqlValue> {
    self
      .columns
      .iter()
      .position(|c| c == column)
      .and_then(|i| self.values.get(i))
      .ok_or_else(|| MigrateError::MissingColumn(column.to_string()))
  }

  pub fn opt_i64(&self, column: &str) -> Result<Option<i64>> {
    match self.get(column)? {
      SqlValue::Null => Ok(None),
      SqlValue::Integer(i) => Ok(Some(*i)),
      // MySQL dumps frequently carry numbers as text
      SqlValue::Text(s) => s.trim().parse::<i64>().map(Some).map_err(|_| type_error(column, "integer", &SqlValue::Text(s.clone()))),
      other => Err(type_error(column, "integer", other)),
    }
  }

  pub fn i64(&self, column: &str) -> Result<i64> {
    self
      .opt_i64(column)?
      .ok_or_else(|| type_error(column, "integer", &SqlValue::Null))
  }

  pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
    match self.get(column)? {
      SqlValue::Null => Ok(None),
      SqlValue::Text(s) => Ok(Some(s.clone())),
      SqlValue::Blob(b) => Ok(Some(String::from_utf8_lossy(b).into_owned())),
      other => Err(type_error(column, "text", other)),
    }
  }

  pub fn text(&self, column: &str) -> Result<String> {
    self
      .opt_text(column)?
      .ok_or_else(|| type_error(column, "text", &SqlValue::Null))
  }
}

fn type_error(column: &str, expected: &'static str, found: &SqlValue) -> MigrateError {
  MigrateError::ColumnType {
    column: column.to_string(),
    expected,
    found: found.describe(),
  }
}

/// Read-only query capability over the legacy review database.
pub trait DataSource {
  fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;
}

pub struct SqliteSource {
  conn: Connection,
}

impl SqliteSource {
  /// Open the copy of the legacy database named by the connection file.
  pub fn connect(conn: &DbConnection) -> Result<Self> {
    tracing::debug!(database = %conn.database.display(), "opening review database");
    Self::open(&conn.database)
  }

  pub fn open(path: &Path) -> Result<Self> {
    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(Self { conn })
  }

  #[cfg(test)]
  pub fn in_memory(schema_and_rows: &str) -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(schema_and_rows)?;
    Ok(Self { conn })
  }
}

impl DataSource for SqliteSource {
  fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
    tracing::trace!(sql, ?params, "query");
    let mut stmt = self.conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt.query(params_from_iter(params.iter().map(SqlValue::to_sqlite)))?;

    let mut out = Vec::new();

    while let Some(r) = rows.next()? {
      let mut values = Vec::with_capacity(columns.len());
      for i in 0..columns.len() {
        values.push(SqlValue::from(r.get_ref(i)?));
      }
      out.push(Row::new(columns.clone(), values));
    }

    Ok(out)
  }
}
