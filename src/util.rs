// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for default paths, rate-limit timestamp formatting, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; epoch seconds; clap CommandFactory
// outputs: Home-relative paths, formatted timestamps, man page text
// side_effects: None
// invariants:
// - home_path falls back to the current directory when HOME is unknown
// - format_reset_local never panics on out-of-range epochs
// errors: render_man_page surfaces io errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use chrono::{Local, TimeZone};
use clap::CommandFactory;

/// Join `name` onto the user's home directory.
pub fn home_path(name: &str) -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(name)
}

/// Formats a rate-limit reset epoch as local `YYYY/MM/DD HH:MM:SS`.
pub fn format_reset_local(epoch: i64) -> String {
  match Local.timestamp_opt(epoch, 0).single() {
    Some(dt) => dt.format("%Y/%m/%d %H:%M:%S").to_string(),
    None => epoch.to_string(),
  }
}

/// First `n` characters of `text` on a single line, for log messages.
pub fn excerpt(text: &str, n: usize) -> String {
  let line = text.lines().next().unwrap_or("");
  let mut out: String = line.chars().take(n).collect();

  if line.chars().count() > n || text.lines().nth(1).is_some() {
    out.push('…');
  }

  out
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
