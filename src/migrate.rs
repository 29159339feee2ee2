// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one migration run: pre-flight, load, associate, replicate, summarize
// role: processing/orchestrator
// inputs: EffectiveConfig; credential files; merge log; optional manual associations
// outputs: MigrationSummary; text or JSON report on stdout (printed by main)
// side_effects: Reads files and the review database; creates remote comments in live runs
// invariants:
// - All fatal checks (credentials, database, token, remote repository) run before any comment is created
// - Dry runs never build an API handle and never need a token
// - Unmatched requests appear in the summary and never reach the replicator
// errors: Pre-flight failures propagate with context; per-item failures are counted in the summary
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::associate::associate;
use crate::cli::EffectiveConfig;
use crate::credentials;
use crate::loader::PullRequestLoader;
use crate::manual;
use crate::merge_log::MergeLog;
use crate::model::{MatchSource, MigrationSummary};
use crate::names::NameResolver;
use crate::remote::github_api::{self, CommentApi, RateLimit};
use crate::replicate::{Replicator, UNKNOWN_AUTHOR};
use crate::source::{DataSource, SqliteSource};
use crate::util::format_reset_local;

/// API handle for live runs; the recording backend needs no token.
pub fn connect_api(token_file: Option<&Path>, api_url: &str) -> Result<Box<dyn CommentApi>> {
  let token = if github_api::uses_recording_backend() {
    String::new()
  } else {
    credentials::read_token(token_file).context("loading GitHub API token")?
  };

  Ok(github_api::build_api(api_url, token))
}

pub fn run(cfg: &EffectiveConfig) -> Result<MigrationSummary> {
  // Phase 1: pre-flight (database, then API for live runs)
  let conn = credentials::read_db_connection(cfg.db_connect_file.as_deref())?;
  let source = SqliteSource::connect(&conn)
    .with_context(|| format!("opening review database {}", conn.database.display()))?;

  let api = if cfg.dry_run {
    None
  } else {
    let api = connect_api(cfg.token_file.as_deref(), &cfg.api_url)?;

    if api.repository(&cfg.org, &cfg.repo).is_none() {
      anyhow::bail!("repository {}/{} is not accessible", cfg.org, cfg.repo);
    }

    Some(api)
  };

  // Phase 2: load, associate, replicate
  migrate(cfg, &source, api.as_deref())
}

/// Core of a run with the data source and API injected; `api = None` is a dry run.
pub fn migrate(cfg: &EffectiveConfig, source: &dyn DataSource, api: Option<&dyn CommentApi>) -> Result<MigrationSummary> {
  let names = NameResolver::load(source).context("loading user names")?;

  let pull_requests = PullRequestLoader::new(source, &names)
    .load_all(&cfg.repo)
    .with_context(|| format!("loading pull requests for {}", cfg.repo))?;
  tracing::info!(count = pull_requests.len(), "pull requests loaded");
  tracing::trace!(?pull_requests);

  let merges = MergeLog::load(&cfg.merge_logs_dir, &cfg.repo, &names)?;
  tracing::info!(count = merges.len(), "merge commits loaded");

  let overrides = manual::load(cfg.manual_assocs.as_deref())?;

  let associations = associate(&pull_requests, &merges, &overrides);

  let mut replicator = match api {
    Some(api) => Replicator::live(api, &cfg.org, &cfg.repo),
    None => Replicator::dry_run(&cfg.org, &cfg.repo),
  };

  for (pr, commit_id, _) in associations.matched() {
    let author = merges.author_of(commit_id).unwrap_or(UNKNOWN_AUTHOR);
    replicator.replicate(pr, commit_id, author);
  }

  let totals = replicator.totals();

  Ok(MigrationSummary {
    repository: cfg.repo.clone(),
    organization: cfg.org.clone(),
    dry_run: api.is_none(),
    pull_requests: pull_requests.len(),
    merge_commits: merges.len(),
    manual_associations: cfg.manual_assocs.as_ref().map(|_| overrides.len()),
    matched_by_merge_log: associations.count_via(MatchSource::MergeLog),
    matched_manually: associations.count_via(MatchSource::Manual),
    unmatched: associations.unmatched(),
    comments: totals.comments,
    created: totals.created,
    failed: totals.failed,
  })
}

pub fn render_text(summary: &MigrationSummary) -> String {
  let mut out = String::new();

  let _ = writeln!(out, "Number of pull requests: {}", summary.pull_requests);
  let _ = writeln!(out, "Number of merge commits: {}", summary.merge_commits);
  if let Some(n) = summary.manual_associations {
    let _ = writeln!(out, "Number of manual associations: {}", n);
  }
  for u in &summary.unmatched {
    let _ = writeln!(out, "Pull request ID {} cannot be matched to a merge commit: {}", u.id, u.title);
  }
  let _ = writeln!(out, "Number of comments: {}", summary.comments);
  if !summary.dry_run {
    let _ = writeln!(out, "Created comments: {}", summary.created);
    let _ = writeln!(out, "Failed comments: {}", summary.failed);
  }

  out
}

pub fn render_rate_limit(rl: &RateLimit) -> String {
  let show = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "?".into());
  let reset = rl.reset.map(format_reset_local).unwrap_or_else(|| "?".into());

  format!(
    "Requests Left: {}\nRequest Limit: {}\nReset: {}\n",
    show(rl.remaining),
    show(rl.limit),
    reset
  )
}
