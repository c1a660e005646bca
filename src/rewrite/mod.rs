//! Bullet rewriting, lint analysis and the remote rewrite tier.

mod engine;
mod lint;
mod remote;
mod rules;

pub use engine::{capitalize_first, punctuate, strip_bullet, RuleEngine, BULLET_GLYPHS, MIN_SENTENCE_LEN};
pub use lint::{
    feedback_for, has_ats_unfriendly, Analyzer, ImprovementCount, Issue, IssueKind, LintReport,
    OptimizationEvidence, Severity, Suggestions,
};
pub use remote::{
    local_response, rewrite_with_fallback, RemoteRewriter, RewriteMode, RewriteOutcome,
    RewriteRequest, RewriteResponse,
};
pub use rules::{RuleSet, VerbCategory};
