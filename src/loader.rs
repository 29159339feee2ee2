// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load merged pull requests and their ordered plain/diff comments from the legacy review schema
// role: loader/pull-requests
// inputs: &dyn DataSource; NameResolver; repository name
// outputs: Vec<PullRequest> ordered by id, each with comments in comment-id order
// invariants:
// - Only merged requests (pr_state = 1) are loaded
// - A comment is anchored only when its first anchor row carries both line and path
// - Unresolvable authors keep the raw legacy user id as text
// errors: Query and row-validation errors propagate; nothing is skipped silently
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{Comment, DiffAnchor, PullRequest};
use crate::names::{NameResolver, UserKey};
use crate::source::{DataSource, Row, SqlValue};

/// `sta_pull_request.pr_state` for merged requests.
const MERGED_STATE: i64 = 1;

const REPOSITORY_IDS_SQL: &str = "SELECT id AS id FROM repository WHERE name = ?1 ORDER BY id";

const PULL_REQUESTS_SQL: &str = "SELECT id AS id, title AS title, description AS description, \
   from_branch_name AS from_branch_name \
   FROM sta_pull_request WHERE pr_state = ?1 AND from_repository_id = ?2 ORDER BY id";

const COMMENTS_SQL: &str = "SELECT sc.id AS comment_id, sc.author_id AS author_id, sc.comment_text AS comment_text \
   FROM sta_pr_comment_activity spca, sta_pr_activity spa, sta_pull_request spr, sta_comment sc \
   WHERE spca.activity_id = spa.activity_id AND spa.pr_id = spr.id AND spca.comment_id = sc.id \
   AND spr.id = ?1 ORDER BY sc.id";

const ANCHOR_SQL: &str = "SELECT line_number AS line_number, to_path AS to_path \
   FROM sta_diff_comment_anchor WHERE comment_id = ?1";

struct PullRequestRow {
  id: i64,
  title: String,
  description: Option<String>,
  from_branch_name: String,
}

impl PullRequestRow {
  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      id: row.i64("id")?,
      title: row.opt_text("title")?.unwrap_or_default(),
      description: row.opt_text("description")?,
      from_branch_name: row.text("from_branch_name")?,
    })
  }
}

struct CommentRow {
  comment_id: i64,
  author_id: i64,
  comment_text: String,
}

impl CommentRow {
  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      comment_id: row.i64("comment_id")?,
      author_id: row.i64("author_id")?,
      comment_text: row.opt_text("comment_text")?.unwrap_or_default(),
    })
  }
}

struct AnchorRow {
  line_number: Option<i64>,
  to_path: Option<String>,
}

impl AnchorRow {
  fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      line_number: row.opt_i64("line_number")?,
      to_path: row.opt_text("to_path")?,
    })
  }

  fn into_anchor(self) -> Option<DiffAnchor> {
    match (self.line_number, self.to_path) {
      (Some(line), Some(path)) => Some(DiffAnchor { path, line }),
      _ => None,
    }
  }
}

pub struct PullRequestLoader<'a> {
  source: &'a dyn DataSource,
  names: &'a NameResolver,
}

impl<'a> PullRequestLoader<'a> {
  pub fn new(source: &'a dyn DataSource, names: &'a NameResolver) -> Self {
    Self { source, names }
  }

  /// A repository name may exist in several projects; every match is returned.
  pub fn repository_ids(&self, repo_name: &str) -> Result<Vec<i64>> {
    tracing::info!(repo = repo_name, "looking up repository ids");
    let rows = self.source.query(REPOSITORY_IDS_SQL, &[SqlValue::from(repo_name)])?;
    rows.iter().map(|r| r.i64("id")).collect()
  }

  /// Merged pull requests whose source repository is one of `repo_ids`, without comments.
  pub fn load_requests(&self, repo_ids: &[i64]) -> Result<Vec<PullRequest>> {
    tracing::info!(?repo_ids, "loading pull requests");
    let mut by_id: BTreeMap<i64, PullRequest> = BTreeMap::new();

    for rid in repo_ids {
      let rows = self
        .source
        .query(PULL_REQUESTS_SQL, &[SqlValue::from(MERGED_STATE), SqlValue::from(*rid)])?;

      for row in &rows {
        let pr = PullRequestRow::from_row(row)?;
        by_id.insert(
          pr.id,
          PullRequest {
            id: pr.id,
            title: pr.title,
            description: pr.description.unwrap_or_default(),
            source_branch: pr.from_branch_name,
            comments: Vec::new(),
          },
        );
      }
    }

    Ok(by_id.into_values().collect())
  }

  pub fn load_comments(&self, pr_id: i64) -> Result<Vec<Comment>> {
    tracing::debug!(pr_id, "loading comments");
    let rows = self.source.query(COMMENTS_SQL, &[SqlValue::from(pr_id)])?;

    let mut comments = Vec::with_capacity(rows.len());

    for row in &rows {
      let c = CommentRow::from_row(row)?;
      let anchor = self.anchor_for(c.comment_id)?;
      let author = match self.names.resolve(UserKey::Id(c.author_id)) {
        Some(name) => name.to_string(),
        None => {
          tracing::debug!(author_id = c.author_id, "comment author has no display name");
          c.author_id.to_string()
        }
      };

      comments.push(match anchor {
        Some(a) => Comment::on_line(author, c.comment_text, a.path, a.line),
        None => Comment::plain(author, c.comment_text),
      });
    }

    Ok(comments)
  }

  fn anchor_for(&self, comment_id: i64) -> Result<Option<DiffAnchor>> {
    let rows = self.source.query(ANCHOR_SQL, &[SqlValue::from(comment_id)])?;

    let Some(first) = rows.first() else { return Ok(None) };

    if rows.len() > 1 {
      tracing::debug!(comment_id, anchors = rows.len(), "several anchors; using the first");
    }

    let anchor = AnchorRow::from_row(first)?.into_anchor();
    tracing::trace!(comment_id, ?anchor, "diff anchor");
    Ok(anchor)
  }

  /// Repository lookup, requests, then comments for every request.
  pub fn load_all(&self, repo_name: &str) -> Result<Vec<PullRequest>> {
    let repo_ids = self.repository_ids(repo_name)?;

    if repo_ids.is_empty() {
      tracing::warn!(repo = repo_name, "repository not found in review database");
    }

    let mut requests = self.load_requests(&repo_ids)?;

    for pr in requests.iter_mut() {
      pr.comments = self.load_comments(pr.id)?;
    }

    Ok(requests)
  }
}
