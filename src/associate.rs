// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Associate each pull request with the merge commit that landed it
// role: core/association
// inputs: Pull requests (id order), MergeLog (file order), manual overrides
// outputs: One Association per pull request, plus matched/unmatched tallies
// invariants:
// - Step 1: first merge record in file order with the same source branch and a known author
// - Step 2: only when step 1 finds nothing, the manual override for the request id
// - Step 3: otherwise Unmatched; reported and excluded, never fatal
// - Branch names are not unique across history; first match is accepted as-is
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::manual::ManualAssociations;
use crate::merge_log::MergeLog;
use crate::model::{Association, MatchSource, MergeRecord, PullRequest, UnmatchedRequest};

/// First record (file order) that merged `pr`'s source branch and has an author.
pub fn find_merge<'m>(pr: &PullRequest, merges: &'m MergeLog) -> Option<&'m MergeRecord> {
  merges
    .iter()
    .find(|r| r.source_branch.as_deref() == Some(pr.source_branch.as_str()) && r.author_full_name.is_some())
}

pub fn associate_one(pr: &PullRequest, merges: &MergeLog, manual: &ManualAssociations) -> Association {
  if let Some(rec) = find_merge(pr, merges) {
    return Association::Matched {
      commit_id: rec.commit_id.clone(),
      via: MatchSource::MergeLog,
    };
  }

  match manual.get(&pr.id) {
    Some(commit) => Association::Matched {
      commit_id: commit.clone(),
      via: MatchSource::Manual,
    },
    None => Association::Unmatched,
  }
}

#[derive(Debug)]
pub struct Associations<'a> {
  pub entries: Vec<(&'a PullRequest, Association)>,
}

impl<'a> Associations<'a> {
  /// Matched requests with their commit ids, in request order.
  pub fn matched(&self) -> impl Iterator<Item = (&'a PullRequest, &str, MatchSource)> + '_ {
    self.entries.iter().filter_map(|(pr, a)| match a {
      Association::Matched { commit_id, via } => Some((*pr, commit_id.as_str(), *via)),
      Association::Unmatched => None,
    })
  }

  pub fn unmatched(&self) -> Vec<UnmatchedRequest> {
    self
      .entries
      .iter()
      .filter(|(_, a)| matches!(a, Association::Unmatched))
      .map(|(pr, _)| UnmatchedRequest {
        id: pr.id,
        title: pr.title.clone(),
      })
      .collect()
  }

  pub fn count_via(&self, source: MatchSource) -> usize {
    self.matched().filter(|(_, _, via)| *via == source).count()
  }
}

pub fn associate<'a>(
  pull_requests: &'a [PullRequest],
  merges: &MergeLog,
  manual: &ManualAssociations,
) -> Associations<'a> {
  let mut entries = Vec::with_capacity(pull_requests.len());

  for pr in pull_requests {
    let association = associate_one(pr, merges, manual);

    match association.commit_id() {
      Some(commit) => tracing::debug!(pr_id = pr.id, commit, "associated pull request"),
      None => tracing::warn!(pr_id = pr.id, title = %pr.title, "pull request cannot be matched to a merge commit"),
    }

    entries.push((pr, association));
  }

  Associations { entries }
}
