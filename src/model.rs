// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the in-memory model (pull requests, comments, merge records, associations, run summary)
// role: model/types
// outputs: Plain structs/enums shared by loaders, the association engine and the replicator; serializable summary
// invariants: A comment is either plain or anchored (path + line together); summary field names are stable for --json
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;

/// File/line position of a diff comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffAnchor {
  pub path: String,
  pub line: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
  /// Display name, or the raw legacy user id when it could not be resolved.
  pub author: String,
  pub text: String,
  pub anchor: Option<DiffAnchor>,
}

impl Comment {
  pub fn plain(author: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      author: author.into(),
      text: text.into(),
      anchor: None,
    }
  }

  pub fn on_line(author: impl Into<String>, text: impl Into<String>, path: impl Into<String>, line: i64) -> Self {
    Self {
      author: author.into(),
      text: text.into(),
      anchor: Some(DiffAnchor { path: path.into(), line }),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
  pub id: i64,
  pub title: String,
  pub description: String,
  pub source_branch: String,
  pub comments: Vec<Comment>,
}

/// One line of the merge log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
  pub commit_id: String,
  pub author_full_name: Option<String>,
  pub source_branch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
  MergeLog,
  Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
  Matched { commit_id: String, via: MatchSource },
  Unmatched,
}

impl Association {
  pub fn commit_id(&self) -> Option<&str> {
    match self {
      Association::Matched { commit_id, .. } => Some(commit_id),
      Association::Unmatched => None,
    }
  }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UnmatchedRequest {
  pub id: i64,
  pub title: String,
}

/// Totals reported at the end of a run.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
  pub repository: String,
  pub organization: String,
  pub dry_run: bool,
  pub pull_requests: usize,
  pub merge_commits: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manual_associations: Option<usize>,
  pub matched_by_merge_log: usize,
  pub matched_manually: usize,
  pub unmatched: Vec<UnmatchedRequest>,
  /// Intended comments, counted identically in dry and live runs.
  pub comments: usize,
  pub created: usize,
  pub failed: usize,
}
