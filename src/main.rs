use anyhow::Result;
use clap::Parser;

mod associate;
mod cli;
mod credentials;
mod error;
mod ext;
mod loader;
mod logging;
mod manual;
mod merge_log;
mod migrate;
mod model;
mod names;
mod remote;
mod replicate;
mod source;
mod util;

use crate::cli::{normalize, Cli, USAGE};
use crate::error::MigrateError;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  logging::init_tracing(cli.verbosity);

  if cli.check_rate_limit {
    let api = migrate::connect_api(cli.token_file.as_deref(), &cli.api_url)?;
    let rl = api
      .rate_limit()
      .ok_or_else(|| anyhow::anyhow!("could not fetch rate limit from {}", cli.api_url))?;
    print!("{}", migrate::render_rate_limit(&rl));
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = match normalize(cli) {
    Ok(cfg) => cfg,
    Err(MigrateError::MissingRepository) => {
      eprintln!("{}", USAGE);
      std::process::exit(255);
    }
    Err(e) => return Err(e.into()),
  };
  tracing::debug!(?cfg, "effective config");

  // Phase 2: migrate
  let summary = migrate::run(&cfg)?;

  // Phase 3: report
  if cfg.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print!("{}", migrate::render_text(&summary));
  }

  Ok(())
}
