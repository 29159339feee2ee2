// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse a per-repository merge log into merge records keyed by commit id, kept in file order
// role: parser/merge-log
// inputs: <logs_dir>/<repo>.log, one whitespace-tokenized merge event per line; NameResolver for logins
// outputs: MergeLog (ordered records + id index); exact and abbreviated-id lookups
// invariants:
// - Every non-blank line yields exactly one record keyed by its first token
// - Legacy lines end in "master": author = tokens[1..3], branch = tokens[10]
// - Standard lines: branch = last token without quotes, author = login lookup or tokens[1..3]
// - Duplicate commit ids keep their first position and take the last line's values
// errors: Unreadable file is fatal; malformed lines are warned about and kept
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};
use crate::model::MergeRecord;
use crate::names::{NameResolver, UserKey};

const LEGACY_TARGET: &str = "master";
const LEGACY_BRANCH_TOKEN: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct MergeLog {
  records: Vec<MergeRecord>,
  index: HashMap<String, usize>,
}

impl MergeLog {
  pub fn path_for(logs_dir: &Path, repo_name: &str) -> PathBuf {
    logs_dir.join(format!("{}.log", repo_name))
  }

  pub fn load(logs_dir: &Path, repo_name: &str, names: &NameResolver) -> Result<Self> {
    let path = Self::path_for(logs_dir, repo_name);
    tracing::info!(path = %path.display(), "reading merge log");

    let file = std::fs::File::open(&path).map_err(|source| MigrateError::MergeLog {
      path: path.clone(),
      source,
    })?;

    Self::parse(std::io::BufReader::new(file), names).map_err(|source| MigrateError::MergeLog { path, source })
  }

  /// Lines are decoded lossily so stray bytes in author names cannot stop the parse.
  pub fn parse<R: BufRead>(mut reader: R, names: &NameResolver) -> std::io::Result<Self> {
    let mut log = MergeLog::default();
    let mut buf: Vec<u8> = Vec::new();

    loop {
      buf.clear();
      if reader.read_until(b'\n', &mut buf)? == 0 {
        break;
      }
      let line = String::from_utf8_lossy(&buf);

      if let Some(record) = parse_line(&line, names) {
        log.insert(record);
      }
    }

    Ok(log)
  }

  pub fn insert(&mut self, record: MergeRecord) {
    match self.index.get(&record.commit_id) {
      Some(&i) => {
        tracing::debug!(commit = %record.commit_id, "duplicate commit id in merge log; keeping the later line");
        self.records[i] = record;
      }
      None => {
        self.index.insert(record.commit_id.clone(), self.records.len());
        self.records.push(record);
      }
    }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records in file order.
  pub fn iter(&self) -> impl Iterator<Item = &MergeRecord> {
    self.records.iter()
  }

  pub fn get(&self, commit_id: &str) -> Option<&MergeRecord> {
    self.index.get(commit_id).map(|&i| &self.records[i])
  }

  /// The single record whose id starts with `abbrev`; `None` when absent or ambiguous.
  pub fn find_by_prefix(&self, abbrev: &str) -> Option<&MergeRecord> {
    if abbrev.is_empty() {
      return None;
    }

    let mut hits = self.records.iter().filter(|r| r.commit_id.starts_with(abbrev));
    let first = hits.next()?;

    if hits.next().is_some() {
      return None;
    }

    Some(first)
  }

  /// Author of a commit by exact id, then by abbreviated id.
  pub fn author_of(&self, commit_id: &str) -> Option<&str> {
    self
      .get(commit_id)
      .or_else(|| self.find_by_prefix(commit_id))
      .and_then(|r| r.author_full_name.as_deref())
  }
}

fn join_author(tokens: &[&str]) -> Option<String> {
  let joined = tokens.iter().skip(1).take(2).copied().collect::<Vec<_>>().join(" ");
  (!joined.is_empty()).then_some(joined)
}

/// One record per non-blank line; `None` only for blank lines.
pub fn parse_line(line: &str, names: &NameResolver) -> Option<MergeRecord> {
  let tokens: Vec<&str> = line.split_whitespace().collect();
  let (first, last) = match (tokens.first(), tokens.last()) {
    (Some(f), Some(l)) => (*f, *l),
    _ => return None,
  };

  if tokens.len() < 2 {
    tracing::warn!(line = line.trim_end(), "merge log line has no author or branch");
    return Some(MergeRecord {
      commit_id: first.to_string(),
      author_full_name: None,
      source_branch: None,
    });
  }

  let (author_full_name, source_branch) = if last == LEGACY_TARGET {
    let branch = tokens.get(LEGACY_BRANCH_TOKEN).map(|b| b.to_string());

    if branch.is_none() {
      tracing::warn!(line = line.trim_end(), "cannot find branch in merge log line");
    }

    (join_author(&tokens), branch)
  } else {
    let branch = last.trim_matches('\'').to_string();
    let author = names
      .resolve(UserKey::Login(tokens[1]))
      .map(str::to_string)
      .or_else(|| join_author(&tokens));

    (author, Some(branch))
  };

  Some(MergeRecord {
    commit_id: first.to_string(),
    author_full_name,
    source_branch,
  })
}
