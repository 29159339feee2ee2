// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse the operator-curated pull request → commit override file
// role: parser/manual-associations
// inputs: Optional path; lines shaped `<pull request id>: <commit>`
// outputs: BTreeMap<i64, String> (empty when no file is given)
// invariants: Values are trimmed; blank lines are ignored; later lines win on duplicate ids
// errors: Any other malformed line is fatal and names file + 1-based line number
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MigrateError, Result};

pub type ManualAssociations = BTreeMap<i64, String>;

static RE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\s*:\s*(\S+)\s*$").unwrap());

pub fn load(path: Option<&Path>) -> Result<ManualAssociations> {
  let Some(path) = path else {
    return Ok(ManualAssociations::new());
  };

  tracing::info!(path = %path.display(), "reading manual associations");
  let text = std::fs::read_to_string(path).map_err(|source| MigrateError::ManualFile {
    path: path.to_path_buf(),
    source,
  })?;

  parse(&text, path)
}

/// `origin` is only used to label errors.
pub fn parse(text: &str, origin: &Path) -> Result<ManualAssociations> {
  let mut out = ManualAssociations::new();

  for (i, line) in text.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }

    let malformed = || MigrateError::ManualLine {
      path: origin.to_path_buf(),
      line_no: i + 1,
      line: line.to_string(),
    };

    let caps = RE_LINE.captures(line).ok_or_else(malformed)?;
    let pr_id = caps[1].parse::<i64>().map_err(|_| malformed())?;
    let commit = caps[2].to_string();

    if let Some(prev) = out.insert(pr_id, commit) {
      tracing::debug!(pr_id, previous = %prev, "manual association redefined");
    }
  }

  Ok(out)
}
