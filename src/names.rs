// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Two-key lookup from a legacy user (numeric id or login) to the user's display name
// role: resolver/names
// inputs: (id, login, display name) triples, usually from the legacy user tables
// outputs: NameResolver answering resolve(UserKey) -> Option<&str>
// invariants: Read-only after construction; id and login of one triple resolve to the same name
// errors: Loading surfaces data source/row errors; lookups never fail (None = not found)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use crate::error::Result;
use crate::source::DataSource;

const USERS_SQL: &str = "SELECT su.id AS id, cu.user_name AS user_name, cu.display_name AS display_name \
   FROM stash_user su, sta_normal_user snu, cwd_user cu \
   WHERE snu.user_id = su.id AND cu.user_name = snu.name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKey<'a> {
  Id(i64),
  Login(&'a str),
}

#[derive(Debug, Default, Clone)]
pub struct NameResolver {
  by_id: HashMap<i64, String>,
  by_login: HashMap<String, String>,
}

impl NameResolver {
  pub fn from_triples<I, S>(triples: I) -> Self
  where
    I: IntoIterator<Item = (i64, S, S)>,
    S: Into<String>,
  {
    let mut by_id = HashMap::new();
    let mut by_login = HashMap::new();

    for (id, login, full_name) in triples {
      let full_name = full_name.into();
      by_id.insert(id, full_name.clone());
      by_login.insert(login.into(), full_name);
    }

    Self { by_id, by_login }
  }

  pub fn load(source: &dyn DataSource) -> Result<Self> {
    tracing::info!("loading user names");
    let rows = source.query(USERS_SQL, &[])?;

    let mut triples = Vec::with_capacity(rows.len());
    for row in &rows {
      triples.push((row.i64("id")?, row.text("user_name")?, row.text("display_name")?));
    }

    let resolver = Self::from_triples(triples);
    tracing::debug!(users = resolver.len(), "user names loaded");
    Ok(resolver)
  }

  pub fn resolve(&self, key: UserKey<'_>) -> Option<&str> {
    match key {
      UserKey::Id(id) => self.by_id.get(&id),
      UserKey::Login(login) => self.by_login.get(login),
    }
    .map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.by_id.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_id.is_empty()
  }
}
