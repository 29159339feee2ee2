use predicates::prelude::*;

use crate::common::BIN;

#[test]
fn rate_limit_check_needs_no_repo() {
  let dir = test_support::tempdir();
  let mut cmd = test_support::cmd_bin(BIN);

  cmd
    .env("PCM_TEST_API_LOG", dir.path().join("api.jsonl"))
    .arg("--check-rate-limit")
    .assert()
    .success()
    .stdout(predicate::str::contains("Requests Left: 4999"))
    .stdout(predicate::str::contains("Request Limit: 5000"))
    .stdout(predicate::str::contains("Reset: "));
}
