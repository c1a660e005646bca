//! Remote rewrite tier with a local fallback.
//!
//! The remote tier is best effort. Any failure, including a response that
//! breaks the contract, degrades to the local rule engine and the caller
//! is told so through [`RewriteMode::Degraded`].

use super::engine::RuleEngine;
use super::lint::{Analyzer, Suggestions};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Request sent to the remote rewrite tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// Full resume text, bullets included
    pub resume_text: String,
    /// Job description to tailor the rewrite to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl RewriteRequest {
    /// Request for a resume without a job description.
    pub fn new(resume_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description: None,
        }
    }

    /// Attach a job description.
    pub fn with_job_description(mut self, description: impl Into<String>) -> Self {
        self.job_description = Some(description.into());
        self
    }
}

/// Response of the remote rewrite tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResponse {
    /// Quality score, 0 to 100
    pub score: f64,
    /// Rewritten resume text
    pub optimized: String,
    /// Resume text as sent
    pub original: String,
    /// Resume text after the local rule engine
    pub rule_based: String,
    /// Problems found, one message each
    #[serde(default)]
    pub issues: Vec<String>,
    /// Improvement hints grouped by topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Suggestions>,
}

impl RewriteResponse {
    /// Check the response contract.
    pub fn validate(&self) -> Result<()> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(Error::InvalidResponse(format!(
                "score {} is outside 0-100",
                self.score
            )));
        }
        if self.optimized.trim().is_empty() && !self.original.trim().is_empty() {
            return Err(Error::InvalidResponse("empty optimized text".to_string()));
        }
        Ok(())
    }
}

/// Where a rewrite came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RewriteMode {
    /// The remote tier answered
    Remote,
    /// Only the local engine was asked
    Local,
    /// The remote tier failed; the local engine answered instead
    Degraded { reason: String },
}

impl RewriteMode {
    /// Check if the caller should tell the user about a fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, RewriteMode::Degraded { .. })
    }
}

/// A rewrite together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    #[serde(flatten)]
    pub mode: RewriteMode,
    pub response: RewriteResponse,
}

/// A remote rewrite service.
pub trait RemoteRewriter: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "remote"
    }

    /// Send one request.
    ///
    /// Non-2xx answers map to [`Error::RemoteStatus`], timeouts to
    /// [`Error::RemoteTimeout`].
    fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteResponse>;
}

/// Build a response with the local rule engine and analyzer only.
pub fn local_response(
    engine: &RuleEngine,
    analyzer: &Analyzer,
    request: &RewriteRequest,
) -> RewriteResponse {
    let original = request.resume_text.clone();
    let rule_based = engine.rewrite_text(&original);
    let before = analyzer.analyze(&original);
    let after = analyzer.analyze(&rule_based);

    RewriteResponse {
        score: f64::from(after.score),
        optimized: rule_based.clone(),
        original,
        rule_based,
        issues: before.problems().map(|issue| issue.message.clone()).collect(),
        suggestions: Some(before.suggestions),
    }
}

/// Ask the remote tier, falling back to the local engine on any failure.
pub fn rewrite_with_fallback(
    remote: Option<&dyn RemoteRewriter>,
    engine: &RuleEngine,
    analyzer: &Analyzer,
    request: &RewriteRequest,
) -> RewriteOutcome {
    let Some(remote) = remote else {
        return RewriteOutcome {
            mode: RewriteMode::Local,
            response: local_response(engine, analyzer, request),
        };
    };

    let result = remote
        .rewrite(request)
        .and_then(|response| response.validate().map(|_| response));

    match result {
        Ok(response) => {
            log::debug!("{} rewrite accepted (score {})", remote.name(), response.score);
            RewriteOutcome {
                mode: RewriteMode::Remote,
                response,
            }
        }
        Err(err) => {
            if err.is_recoverable() {
                log::warn!("{} rewrite failed, using local rules: {}", remote.name(), err);
            } else {
                log::warn!(
                    "{} rewrite failed with {}, using local rules: {}",
                    remote.name(),
                    err.kind(),
                    err
                );
            }
            RewriteOutcome {
                mode: RewriteMode::Degraded {
                    reason: err.to_string(),
                },
                response: local_response(engine, analyzer, request),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<RewriteResponse>);

    impl RemoteRewriter for Fixed {
        fn rewrite(&self, _request: &RewriteRequest) -> Result<RewriteResponse> {
            match &self.0 {
                Ok(response) => Ok(response.clone()),
                Err(Error::RemoteStatus(code)) => Err(Error::RemoteStatus(*code)),
                Err(_) => Err(Error::RemoteTimeout),
            }
        }
    }

    fn response(score: f64) -> RewriteResponse {
        RewriteResponse {
            score,
            optimized: "• Led billing".into(),
            original: "• worked on billing".into(),
            rule_based: "• Developed billing".into(),
            issues: Vec::new(),
            suggestions: None,
        }
    }

    fn run(remote: Option<&dyn RemoteRewriter>) -> RewriteOutcome {
        rewrite_with_fallback(
            remote,
            &RuleEngine::default(),
            &Analyzer::default(),
            &RewriteRequest::new("• worked on billing"),
        )
    }

    #[test]
    fn test_remote_success() {
        let remote = Fixed(Ok(response(88.0)));
        let outcome = run(Some(&remote));
        assert_eq!(outcome.mode, RewriteMode::Remote);
        assert_eq!(outcome.response.optimized, "• Led billing");
    }

    #[test]
    fn test_status_error_degrades() {
        let remote = Fixed(Err(Error::RemoteStatus(503)));
        let outcome = run(Some(&remote));
        assert!(outcome.mode.is_degraded());
        assert_eq!(outcome.response.rule_based, "• Developed billing");
        assert_eq!(outcome.response.original, "• worked on billing");
    }

    #[test]
    fn test_timeout_degrades() {
        let remote = Fixed(Err(Error::RemoteTimeout));
        match run(Some(&remote)).mode {
            RewriteMode::Degraded { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected degraded, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_score_degrades() {
        let remote = Fixed(Ok(response(140.0)));
        assert!(run(Some(&remote)).mode.is_degraded());
    }

    #[test]
    fn test_local_only() {
        let outcome = run(None);
        assert_eq!(outcome.mode, RewriteMode::Local);
        assert!((0.0..=100.0).contains(&outcome.response.score));
        assert!(!outcome.response.issues.is_empty());
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(RewriteRequest::new("text")).unwrap();
        assert_eq!(json, serde_json::json!({ "resume_text": "text" }));

        let parsed: RewriteResponse = serde_json::from_str(
            r#"{"score": 71, "optimized": "a", "original": "b", "rule_based": "c"}"#,
        )
        .unwrap();
        assert!(parsed.issues.is_empty());
        assert!(parsed.validate().is_ok());
    }
}
