use std::path::{Path, PathBuf};

pub const BIN: &str = "pr-comment-migrate";

/// Legacy review schema with two repositories named `widgets` and one other.
///
/// Merged requests on `widgets`: 10 (feature/alpha), 11 (bugfix/beta), 12 (feature/gamma).
/// Request 13 was declined; request 14 lives in `gadgets`.
pub const LEGACY_DB: &str = r#"
  CREATE TABLE stash_user (id INTEGER PRIMARY KEY);
  CREATE TABLE sta_normal_user (user_id INTEGER, name TEXT);
  CREATE TABLE cwd_user (user_name TEXT, display_name TEXT);
  CREATE TABLE repository (id INTEGER PRIMARY KEY, name TEXT);
  CREATE TABLE sta_pull_request (id INTEGER PRIMARY KEY, title TEXT, description TEXT,
    from_branch_name TEXT, pr_state INTEGER, from_repository_id INTEGER);
  CREATE TABLE sta_pr_activity (activity_id INTEGER PRIMARY KEY, pr_id INTEGER);
  CREATE TABLE sta_pr_comment_activity (activity_id INTEGER, comment_id INTEGER);
  CREATE TABLE sta_comment (id INTEGER PRIMARY KEY, author_id INTEGER, comment_text TEXT);
  CREATE TABLE sta_diff_comment_anchor (comment_id INTEGER, line_number INTEGER, to_path TEXT);

  INSERT INTO stash_user VALUES (1), (2);
  INSERT INTO sta_normal_user VALUES (1, 'jdoe'), (2, 'ada');
  INSERT INTO cwd_user VALUES ('jdoe', 'Jane Doe'), ('ada', 'Ada Lovelace');

  INSERT INTO repository VALUES (1, 'widgets'), (2, 'widgets'), (3, 'gadgets');
  INSERT INTO sta_pull_request VALUES
    (10, 'Add alpha', 'Alpha support', 'feature/alpha', 1, 1),
    (11, 'Fix beta', NULL, 'bugfix/beta', 1, 2),
    (12, 'Gamma', 'No merge recorded', 'feature/gamma', 1, 1),
    (13, 'Declined', 'nope', 'feature/delta', 2, 1),
    (14, 'Elsewhere', '', 'feature/alpha', 1, 3);

  INSERT INTO sta_pr_activity VALUES (100, 10), (101, 10), (102, 11), (103, 12);
  INSERT INTO sta_pr_comment_activity VALUES (100, 501), (101, 500), (102, 502), (103, 503);
  INSERT INTO sta_comment VALUES
    (500, 2, 'Looks good'),
    (501, 1, 'Off by one?'),
    (502, 9, 'Who am I'),
    (503, 1, 'Ping');
  INSERT INTO sta_diff_comment_anchor VALUES (501, 42, 'src/alpha.py');
"#;

pub const WIDGETS_LOG: &str = "\
aaaa1111 jdoe Merge branch 'feature/alpha'
bbbb2222 Ada Lovelace Merge pull request #11 in SIMS/widgets from bugfix/beta to master
cccc3333
";

/// A workspace with the database, its connection file and a merge log directory.
pub struct Workspace {
  pub dir: tempfile::TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    let dir = test_support::tempdir();
    let db = dir.path().join("stash.db");
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(LEGACY_DB).unwrap();
    drop(conn);

    std::fs::write(dir.path().join("db.conn"), format!("{}\n", db.display())).unwrap();
    std::fs::create_dir_all(dir.path().join("merges")).unwrap();
    std::fs::write(dir.path().join("merges").join("widgets.log"), WIDGETS_LOG).unwrap();

    Self { dir }
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn conn_file(&self) -> PathBuf {
    self.path().join("db.conn")
  }

  pub fn api_log(&self) -> PathBuf {
    self.path().join("api.jsonl")
  }

  pub fn write(&self, name: &str, body: &str) -> PathBuf {
    let p = self.path().join(name);
    std::fs::write(&p, body).unwrap();
    p
  }

  /// Command running from the workspace so the default `merges` directory resolves.
  pub fn cmd(&self) -> assert_cmd::Command {
    let mut cmd = test_support::cmd_bin(BIN);
    cmd.current_dir(self.path())
      .env("HOME", self.path())
      .env_remove("GITHUB_TOKEN")
      .env_remove("GH_TOKEN")
      .arg("-c")
      .arg(self.conn_file());
    cmd
  }
}
