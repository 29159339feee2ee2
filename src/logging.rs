// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Configure tracing output from the repeatable -v flag (RUST_LOG overrides)
// role: ambient/logging
// inputs: verbosity count; env RUST_LOG
// outputs: Global tracing subscriber writing to stderr
// invariants:
// - stdout stays reserved for the final report
// - Per-comment rate-limit reports (target RATE_LIMIT_TARGET) are shown at every verbosity
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target of the status/rate-limit event emitted for every created comment.
pub const RATE_LIMIT_TARGET: &str = "rate_limit";

pub fn level_for(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Filter directives for a verbosity count.
pub fn directives_for(verbosity: u8) -> String {
  match verbosity {
    0 => format!("{},{}=info", level_for(0), RATE_LIMIT_TARGET),
    v => level_for(v).to_string(),
  }
}

pub fn init_tracing(verbosity: u8) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives_for(verbosity)));

  // a second init (tests) is harmless
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr),
    )
    .try_init();
}
