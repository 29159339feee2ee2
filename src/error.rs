// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for the migration components (credentials, input files, database rows)
// role: errors/types
// outputs: MigrateError; converted into anyhow::Error at the orchestration layer
// invariants: Variants carry enough context (file, line, column) to act on without a backtrace
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
  #[error("missing repository name")]
  MissingRepository,

  #[error("cannot read {kind} file {}: {source}", path.display())]
  CredentialFile {
    kind: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{kind} file {} is missing the {field} line", path.display())]
  CredentialField {
    kind: &'static str,
    path: PathBuf,
    field: &'static str,
  },

  #[error("no API token: pass --token-file, set GITHUB_TOKEN, or create {}", default_path.display())]
  MissingToken { default_path: PathBuf },

  #[error("cannot read merge log {}: {source}", path.display())]
  MergeLog {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cannot read manual associations {}: {source}", path.display())]
  ManualFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{}:{line_no}: expected `<pull request id>: <commit>`, got {line:?}", path.display())]
  ManualLine { path: PathBuf, line_no: usize, line: String },

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("row is missing column `{0}`")]
  MissingColumn(String),

  #[error("column `{column}` has unexpected value {found}, expected {expected}")]
  ColumnType {
    column: String,
    expected: &'static str,
    found: String,
  },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
