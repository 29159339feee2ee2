// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read line-delimited connection files: the review database location and the GitHub API token
// role: config/credentials
// inputs: Optional explicit paths; HOME for defaults; env GITHUB_TOKEN / GH_TOKEN for the token
// outputs: DbConnection; token String
// invariants:
// - Lines are trimmed; the first N lines are used in order, extra lines ignored
// - An explicit --token-file always wins over the environment
// errors: Missing/unreadable file or missing line is fatal (MigrateError::Credential*)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};
use crate::util::home_path;

pub const DEFAULT_DB_CONNECT_FILE: &str = ".stash_db.conn";
pub const DEFAULT_TOKEN_FILE: &str = ".token_file";

/// Where the review database copy lives. The connection file's first
/// line is the SQLite database path; any later lines are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConnection {
  pub database: PathBuf,
}

fn read_lines(kind: &'static str, path: &Path) -> Result<Vec<String>> {
  let text = std::fs::read_to_string(path).map_err(|source| MigrateError::CredentialFile {
    kind,
    path: path.to_path_buf(),
    source,
  })?;
  Ok(text.lines().map(|l| l.trim().to_string()).collect())
}

fn required(kind: &'static str, path: &Path, lines: &[String], idx: usize, field: &'static str) -> Result<String> {
  match lines.get(idx) {
    Some(v) if !v.is_empty() => Ok(v.clone()),
    _ => Err(MigrateError::CredentialField {
      kind,
      path: path.to_path_buf(),
      field,
    }),
  }
}

pub fn read_db_connection(conn_file: Option<&Path>) -> Result<DbConnection> {
  let path = conn_file.map(Path::to_path_buf).unwrap_or_else(|| home_path(DEFAULT_DB_CONNECT_FILE));
  tracing::info!(path = %path.display(), "reading database connection file");

  let lines = read_lines("database connection", &path)?;

  Ok(DbConnection {
    database: PathBuf::from(required("database connection", &path, &lines, 0, "database")?),
  })
}

fn token_from_env() -> Option<String> {
  ["GITHUB_TOKEN", "GH_TOKEN"]
    .iter()
    .filter_map(|k| std::env::var(k).ok())
    .map(|t| t.trim().to_string())
    .find(|t| !t.is_empty())
}

/// Token discovery: explicit file, then GITHUB_TOKEN/GH_TOKEN, then `~/.token_file`.
pub fn read_token(token_file: Option<&Path>) -> Result<String> {
  if let Some(path) = token_file {
    let lines = read_lines("token", path)?;
    return required("token", path, &lines, 0, "token");
  }

  if let Some(t) = token_from_env() {
    tracing::debug!("using API token from environment");
    return Ok(t);
  }

  let default_path: PathBuf = home_path(DEFAULT_TOKEN_FILE);

  if !default_path.exists() {
    return Err(MigrateError::MissingToken { default_path });
  }

  let lines = read_lines("token", &default_path)?;
  required("token", &default_path, &lines, 0, "token")
}
