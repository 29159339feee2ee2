use crate::common::Workspace;

#[test]
fn dry_run_report_snapshot() {
  test_support::init_insta();
  let ws = Workspace::new();

  let out = ws.cmd().args(["-n", "widgets"]).output().unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let stdout = String::from_utf8(out.stdout).unwrap();
  insta::assert_snapshot!(stdout.trim_end(), @r###"
  Number of pull requests: 3
  Number of merge commits: 3
  Pull request ID 12 cannot be matched to a merge commit: Gamma
  Number of comments: 5
  "###);

  // nothing is sent in a dry run
  assert!(!ws.api_log().exists());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("cannot be matched"), "{}", stderr);
}

#[test]
fn dry_run_json_summary() {
  let ws = Workspace::new();

  let out = ws.cmd().args(["-n", "--json", "widgets"]).output().unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["repository"], "widgets");
  assert_eq!(v["organization"], "lsst-sims");
  assert_eq!(v["dry_run"], true);
  assert_eq!(v["pull_requests"], 3);
  assert_eq!(v["matched_by_merge_log"], 2);
  assert_eq!(v["matched_manually"], 0);
  assert_eq!(v["unmatched"], serde_json::json!([{ "id": 12, "title": "Gamma" }]));
  assert_eq!(v["comments"], 5);
  assert_eq!(v["created"], 0);
  assert!(v.get("manual_associations").is_none());
}
