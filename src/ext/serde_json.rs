// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path reads into GitHub API responses (e.g. "rate.remaining") with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper
// invariants: No panics; a missing segment or a type mismatch yields None
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// A located JSON value, converted in a second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl JsonFetched<'_> {
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }
}

pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    let inner = path
      .split('.')
      .filter(|k| !k.is_empty())
      .try_fold(self, |cur, key| cur.get(key));

    JsonFetched { inner }
  }
}
