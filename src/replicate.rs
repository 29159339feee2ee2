// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Replay one associated pull request as commit comments (summary first, then each original comment)
// role: replication/comments
// inputs: PullRequest, commit id, merge author; optional &dyn CommentApi (None = dry run)
// outputs: Remote comments; running totals of intended/created/failed comments
// side_effects: Remote API calls in live runs only
// invariants:
// - Summary body is "(<merge author>) <title>\n<description>" and is never anchored
// - Original comments keep source order, body "(<author>) <text>", anchored iff path + line exist
// - Intended count is identical in dry and live runs
// errors: Failed commit lookups and creations are logged and counted; never fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::logging::RATE_LIMIT_TARGET;
use crate::model::PullRequest;
use crate::remote::github_api::{CommentApi, CreatedComment, NewComment};
use crate::util::{excerpt, format_reset_local};

/// Rendered when the merge author of a manually associated commit is unknown.
pub const UNKNOWN_AUTHOR: &str = "unknown";

pub fn attributed(author: &str, text: &str) -> String {
  format!("({}) {}", author, text)
}

/// Comments to create for `pr`, in creation order.
pub fn plan(pr: &PullRequest, merge_author: &str) -> Vec<NewComment> {
  let mut out = Vec::with_capacity(pr.comments.len() + 1);

  out.push(NewComment {
    body: attributed(merge_author, &format!("{}\n{}", pr.title, pr.description)),
    path: None,
    position: None,
  });

  for c in &pr.comments {
    out.push(NewComment {
      body: attributed(&c.author, &c.text),
      path: c.anchor.as_ref().map(|a| a.path.clone()),
      position: c.anchor.as_ref().map(|a| a.line),
    });
  }

  out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicationTotals {
  pub comments: usize,
  pub created: usize,
  pub failed: usize,
}

pub struct Replicator<'a> {
  api: Option<&'a dyn CommentApi>,
  owner: &'a str,
  repo: &'a str,
  totals: ReplicationTotals,
}

impl<'a> Replicator<'a> {
  pub fn live(api: &'a dyn CommentApi, owner: &'a str, repo: &'a str) -> Self {
    Self {
      api: Some(api),
      owner,
      repo,
      totals: ReplicationTotals::default(),
    }
  }

  pub fn dry_run(owner: &'a str, repo: &'a str) -> Self {
    Self {
      api: None,
      owner,
      repo,
      totals: ReplicationTotals::default(),
    }
  }

  pub fn totals(&self) -> ReplicationTotals {
    self.totals
  }

  /// Returns the number of comments intended for this pull request.
  pub fn replicate(&mut self, pr: &PullRequest, commit_id: &str, merge_author: &str) -> usize {
    let planned = plan(pr, merge_author);
    self.totals.comments += planned.len();

    let Some(api) = self.api else {
      tracing::info!(pr_id = pr.id, commit = commit_id, comments = planned.len(), "dry run; not migrating");
      return planned.len();
    };

    if api.commit(self.owner, self.repo, commit_id).is_none() {
      tracing::warn!(
        pr_id = pr.id,
        repo = self.repo,
        commit = commit_id,
        comments = planned.len(),
        "commit not found; skipping its comments"
      );
      self.totals.failed += planned.len();
      return planned.len();
    }

    for comment in &planned {
      match api.create_comment(self.owner, self.repo, commit_id, comment) {
        Some(created) => {
          self.totals.created += 1;
          log_created(&created);
        }
        None => {
          self.totals.failed += 1;
          tracing::warn!(
            comment = %excerpt(&comment.body, 60),
            repo = self.repo,
            commit = commit_id,
            "comment could not be added"
          );
        }
      }
    }

    planned.len()
  }
}

fn log_created(created: &CreatedComment) {
  let remaining = created
    .rate_limit
    .remaining
    .map(|n| n.to_string())
    .unwrap_or_else(|| "?".into());
  let reset = created
    .rate_limit
    .reset
    .map(format_reset_local)
    .unwrap_or_else(|| "?".into());

  tracing::info!(
    target: RATE_LIMIT_TARGET,
    status = created.status,
    rate_limit_remaining = %remaining,
    rate_limit_reset = %reset,
    "comment created"
  );
}
