use predicates::prelude::*;
use serde_json::json;

use crate::common::Workspace;

#[test]
fn live_run_records_comments_in_order() {
  let ws = Workspace::new();

  ws.cmd()
    .env("PCM_TEST_API_LOG", ws.api_log())
    .args(["-o", "acme", "widgets"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Number of comments: 5"))
    .stdout(predicate::str::contains("Created comments: 5"))
    .stdout(predicate::str::contains("Failed comments: 0"));

  let lines = test_support::read_json_lines(&ws.api_log());
  assert_eq!(
    lines,
    vec![
      json!({ "repo": "acme/widgets", "sha": "aaaa1111", "body": "(Jane Doe) Add alpha\nAlpha support", "path": null, "position": null }),
      json!({ "repo": "acme/widgets", "sha": "aaaa1111", "body": "(Ada Lovelace) Looks good", "path": null, "position": null }),
      json!({ "repo": "acme/widgets", "sha": "aaaa1111", "body": "(Jane Doe) Off by one?", "path": "src/alpha.py", "position": 42 }),
      json!({ "repo": "acme/widgets", "sha": "bbbb2222", "body": "(Ada Lovelace) Fix beta\n", "path": null, "position": null }),
      json!({ "repo": "acme/widgets", "sha": "bbbb2222", "body": "(9) Who am I", "path": null, "position": null }),
    ]
  );
}

#[test]
fn default_live_run_reports_rate_limit_per_comment() {
  let ws = Workspace::new();

  let out = ws
    .cmd()
    .env("PCM_TEST_API_LOG", ws.api_log())
    .arg("widgets")
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let stderr = String::from_utf8_lossy(&out.stderr);
  let reports: Vec<&str> = stderr.lines().filter(|l| l.contains("comment created")).collect();
  assert_eq!(reports.len(), 5, "{}", stderr);
  assert!(reports
    .iter()
    .all(|l| l.contains("status=201") && l.contains("rate_limit_remaining=4999")));
  assert!(!stderr.contains("Some("), "{}", stderr);
  // piped stderr carries no color codes
  assert!(!stderr.contains('\u{1b}'), "{}", stderr);
  // rate-limit reports never leak into the report on stdout
  assert!(!String::from_utf8_lossy(&out.stdout).contains("rate_limit"));
}

#[test]
fn missing_commit_counts_failures_and_continues() {
  let ws = Workspace::new();

  ws.cmd()
    .env("PCM_TEST_API_LOG", ws.api_log())
    .env("PCM_TEST_API_MISSING_COMMITS", "aaaa1111")
    .arg("widgets")
    .assert()
    .success()
    .stdout(predicate::str::contains("Created comments: 2"))
    .stdout(predicate::str::contains("Failed comments: 3"))
    .stderr(predicate::str::contains("commit not found"));

  let lines = test_support::read_json_lines(&ws.api_log());
  assert_eq!(lines.len(), 2);
  assert!(lines.iter().all(|l| l["sha"] == "bbbb2222"));
}

#[test]
fn live_run_without_token_stops_before_migrating() {
  let ws = Workspace::new();

  ws.cmd()
    .arg("widgets")
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("no API token"));

  assert!(!ws.api_log().exists());
}
