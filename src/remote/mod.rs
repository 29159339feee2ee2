// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the remote commenting integrations (GitHub)
// role: remote/namespace
// outputs: Public submodules implementing the CommentApi seam
// invariants: Each backend isolates its external integration behind the same trait
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github_api;
