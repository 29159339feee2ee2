use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::{MigrateError, Result};
use crate::remote::github_api::DEFAULT_API_URL;

pub const DEFAULT_ORG: &str = "lsst-sims";
pub const DEFAULT_MERGE_LOGS_DIR: &str = "merges";
pub const USAGE: &str = "Usage: pr-comment-migrate <repo name>";

#[derive(Parser, Debug)]
#[command(
    name = "pr-comment-migrate",
    version,
    about = "Replay legacy pull request discussions as GitHub commit comments",
    long_about = None
)]
pub struct Cli {
  /// Repository name, in the review database and under --org on GitHub
  pub repo: Option<String>,

  /// Set the organization for comment migration repository
  #[arg(short, long, default_value = DEFAULT_ORG)]
  pub org: String,

  /// Increase output verbosity (repeatable)
  #[arg(short, long, action = ArgAction::Count)]
  pub verbosity: u8,

  /// File whose first line is the path of the review database copy
  #[arg(short = 'c', long)]
  pub db_connect_file: Option<PathBuf>,

  /// File with a GitHub API token on its first line
  #[arg(short, long)]
  pub token_file: Option<PathBuf>,

  /// Run everything but do not create any comments
  #[arg(short, long)]
  pub no_migration: bool,

  /// File of manual `<pull request id>: <commit>` associations
  #[arg(short, long)]
  pub manual_assocs: Option<PathBuf>,

  /// Directory holding <repo>.log merge logs
  #[arg(long, default_value = DEFAULT_MERGE_LOGS_DIR)]
  pub merge_logs_dir: PathBuf,

  /// GitHub API base URL
  #[arg(long, default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Print the run summary as JSON
  #[arg(long)]
  pub json: bool,

  /// Print the API rate limit and exit
  #[arg(long)]
  pub check_rate_limit: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub repo: String,
  pub org: String,
  pub db_connect_file: Option<PathBuf>,
  pub token_file: Option<PathBuf>,
  pub dry_run: bool,
  pub manual_assocs: Option<PathBuf>,
  pub merge_logs_dir: PathBuf,
  pub api_url: String,
  pub json: bool,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let repo = match cli.repo.as_deref().map(str::trim) {
    Some(r) if !r.is_empty() => r.to_string(),
    _ => return Err(MigrateError::MissingRepository),
  };

  Ok(EffectiveConfig {
    repo,
    org: cli.org,
    db_connect_file: cli.db_connect_file,
    token_file: cli.token_file,
    dry_run: cli.no_migration,
    manual_assocs: cli.manual_assocs,
    merge_logs_dir: cli.merge_logs_dir,
    api_url: cli.api_url,
    json: cli.json,
  })
}
