use predicates::prelude::*;

use crate::common::Workspace;

#[test]
fn manual_association_fills_the_gap() {
  let ws = Workspace::new();
  // 10 is already matched by the merge log; its override is ignored
  let manual = ws.write("manual.txt", "12: cccc\n\n10 : ffff9999\n");

  ws.cmd()
    .env("PCM_TEST_API_LOG", ws.api_log())
    .arg("-m")
    .arg(&manual)
    .arg("widgets")
    .assert()
    .success()
    .stdout(predicate::str::contains("Number of manual associations: 2"))
    .stdout(predicate::str::contains("cannot be matched").not())
    .stdout(predicate::str::contains("Number of comments: 7"));

  let lines = test_support::read_json_lines(&ws.api_log());
  let shas: Vec<&str> = lines.iter().map(|l| l["sha"].as_str().unwrap()).collect();
  assert_eq!(shas, ["aaaa1111", "aaaa1111", "aaaa1111", "bbbb2222", "bbbb2222", "cccc", "cccc"]);
  // the abbreviated commit has no recorded author
  assert_eq!(lines[5]["body"], "(unknown) Gamma\nNo merge recorded");
  assert_eq!(lines[6]["body"], "(Jane Doe) Ping");
}

#[test]
fn malformed_manual_line_is_fatal() {
  let ws = Workspace::new();
  let manual = ws.write("manual.txt", "12: cccc\nnot an association\n");

  ws.cmd()
    .args(["-n", "-m"])
    .arg(&manual)
    .arg("widgets")
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("manual.txt:2"));
}
