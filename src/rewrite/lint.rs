//! Resume lint analysis: score, issues, strengths and suggestions.

use super::engine::{RuleEngine, BULLET_GLYPHS};
use super::rules::RuleSet;
use crate::parser::patterns::is_all_caps;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Score every resume starts from.
const BASE_SCORE: i32 = 100;

static IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img.*?>").unwrap());

static TABLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table.*?>.*?</table>").unwrap());

static PASSIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:am|is|are|was|were|be|been|being)\s+(?:\w+ly\s+)?(?:\w{2,}ed|built|made|done|led|met|set|held|sent|paid|kept|told|taught|sold|brought|bought|found|won|run|taken|given|written|chosen|driven|broken|spoken|shown|known|seen|grown|drawn|hidden)\b",
    )
    .unwrap()
});

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

static WORDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

static METRICS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+\s*%",
        r"\$\s*\d+",
        r"\b\d+\s*x\b",
        r"\bby\s+\d+",
        r"\bteam\s+of\s+\d+",
        r"\b\d+\s+(?:hours|members|users|customers|clients)\b",
        r"\bgenerated\s+\$?\d+",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

/// Verbs that mark a bullet as an achievement that should carry a number.
const ACHIEVEMENT_VERBS: &[&str] = &[
    "developed", "created", "managed", "led", "implemented", "improved",
];

/// Characters outside ASCII that are still safe for applicant tracking systems.
const SAFE_TYPOGRAPHY: &[char] = &['‘', '’', '“', '”', '…', '€', '£', '°', '©', '®', '™'];

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hurts the resume on its own; fix first
    High,
    /// Worth fixing
    Medium,
    /// Polish
    Low,
    /// A strength rather than a problem
    Positive,
}

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Layout or characters that tracking systems handle badly, or no bullets
    Format,
    /// Passive construction such as "was developed"
    PassiveVoice,
    /// A phrase the rule engine would replace
    WeakPhrase,
    /// An achievement bullet without a number
    MissingNumbers,
    /// A sentence over the word limit
    LongSentence,
    /// Bullets open with strong verbs
    StrongVerbs,
    /// Results are quantified
    Metrics,
    /// Overall structure
    Structure,
    /// Anything not covered above
    General,
}

/// One finding of the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// How much the issue matters
    pub severity: Severity,
    /// What the issue is about; `type` on the wire
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Human-readable explanation
    pub message: String,
    /// The text that triggered the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Suggested replacements, for weak phrases
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl Issue {
    fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            text: None,
            alternatives: Vec::new(),
        }
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementCount {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub positive: usize,
}

/// Signals used to decide whether a resume needs rewriting at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationEvidence {
    pub bullet_points: bool,
    pub strong_verbs: Vec<String>,
    pub quantifiable_achievements: bool,
    pub passive_voice_count: usize,
    pub weak_phrases_count: usize,
}

/// Rule-based suggestions grouped by concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub weak_verbs: Vec<String>,
    #[serde(default)]
    pub formatting_issues: Vec<String>,
    #[serde(default)]
    pub content_improvements: Vec<String>,
}

impl Suggestions {
    /// Check if there is nothing to suggest.
    pub fn is_empty(&self) -> bool {
        self.weak_verbs.is_empty()
            && self.formatting_issues.is_empty()
            && self.content_improvements.is_empty()
    }
}

/// Result of analyzing one resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// 0 to 100
    pub score: u8,
    /// Strengths first, then problems
    pub issues: Vec<Issue>,
    pub feedback: String,
    pub improvement_count: ImprovementCount,
    pub is_already_optimized: bool,
    pub optimization_evidence: OptimizationEvidence,
    pub suggestions: Suggestions,
}

impl LintReport {
    /// Problems only, without strengths.
    pub fn problems(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity != Severity::Positive)
    }
}

/// Scores a resume and lists what to improve.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    engine: RuleEngine,
}

impl Analyzer {
    /// Create an analyzer over a rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            engine: RuleEngine::new(rules),
        }
    }

    /// Analyzer sharing an engine's dictionaries.
    pub fn with_engine(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// Analyze resume text.
    pub fn analyze(&self, text: &str) -> LintReport {
        let mut score = BASE_SCORE;
        let mut issues = Vec::new();
        let mut suggestions = Suggestions::default();
        let evidence = self.evidence(text);

        if has_ats_unfriendly(text) {
            issues.push(Issue::new(
                Severity::High,
                IssueKind::Format,
                "Avoid images, tables and special characters; applicant tracking systems may reject them.",
            ));
            suggestions
                .formatting_issues
                .push("Remove images, tables and decorative symbols.".to_string());
            score -= 10;
        }

        for unit in logical_units(text) {
            if unit.chars().count() <= 2 {
                continue;
            }

            if is_passive(&unit) {
                issues.push(
                    Issue::new(
                        Severity::Medium,
                        IssueKind::PassiveVoice,
                        format!("Consider rewriting in active voice: '{}'", unit),
                    )
                    .with_text(unit.clone()),
                );
                suggestions
                    .content_improvements
                    .push(format!("Rewrite in active voice: '{}'", unit));
                score -= 5;
            }

            if let Some(phrase) = self.engine.find_weak_phrase(&unit) {
                let alternatives = self.engine.rules().alternatives_for(&phrase);
                let hint = if alternatives.is_empty() {
                    "stronger action verbs".to_string()
                } else {
                    alternatives.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
                };
                let mut issue = Issue::new(
                    Severity::Medium,
                    IssueKind::WeakPhrase,
                    format!("Replace '{}' in: '{}' (try {})", phrase, unit, hint),
                )
                .with_text(unit.clone());
                issue.alternatives = alternatives;
                issues.push(issue);
                score -= 5;

                let tip = match self.engine.rules().replacement_for(&phrase) {
                    Some(replacement) => format!("Replace '{}' with '{}'", phrase, replacement),
                    None => format!("Replace '{}' with a strong action verb", phrase),
                };
                if !suggestions.weak_verbs.contains(&tip) {
                    suggestions.weak_verbs.push(tip);
                }
            }

            if starts_with_bullet(&unit) && !DIGIT.is_match(&unit) && mentions_achievement(&unit) {
                issues.push(
                    Issue::new(
                        Severity::Medium,
                        IssueKind::MissingNumbers,
                        format!("Consider adding a measurable result to: '{}'", unit),
                    )
                    .with_text(unit.clone()),
                );
                suggestions
                    .content_improvements
                    .push(format!("Add a number to: '{}'", unit));
                score -= 3;
            }

            let words = unit.split_whitespace().count();
            let limit = if starts_with_bullet(&unit) { 25 } else { 20 };
            if words > 5 && words > limit {
                issues.push(
                    Issue::new(
                        Severity::Low,
                        IssueKind::LongSentence,
                        format!("This line is too long: '{}'", unit),
                    )
                    .with_text(unit.clone()),
                );
                suggestions
                    .formatting_issues
                    .push(format!("Shorten to {} words or fewer: '{}'", limit, unit));
                score -= 2;
            }
        }

        if !evidence.bullet_points {
            issues.push(
                Issue::new(
                    Severity::High,
                    IssueKind::Format,
                    "Add bullet points to highlight achievements and improve readability.",
                )
                .with_text(preview(text)),
            );
            suggestions
                .formatting_issues
                .push("Use bullet points for responsibilities and achievements.".to_string());
            score -= 5;
        }

        let mut strengths = Vec::new();
        if !evidence.strong_verbs.is_empty() {
            let shown = evidence
                .strong_verbs
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            strengths.push(
                Issue::new(
                    Severity::Positive,
                    IssueKind::StrongVerbs,
                    format!("Good use of strong action verbs like '{}'.", shown),
                )
                .with_text(preview(text)),
            );
            score += 5;
        }
        if evidence.quantifiable_achievements {
            let examples = metric_examples(text);
            let mut message = "Excellent use of quantifiable achievements.".to_string();
            if !examples.is_empty() {
                message.push_str(&format!(" Examples: {}", examples.join("; ")));
            }
            strengths.push(
                Issue::new(Severity::Positive, IssueKind::Metrics, message)
                    .with_text(preview(text)),
            );
            score += 5;
        }
        if strengths.is_empty() && text.chars().count() > 500 {
            strengths.push(
                Issue::new(
                    Severity::Positive,
                    IssueKind::Structure,
                    "Clear structure that gives a good foundation to build on.",
                )
                .with_text(preview(text)),
            );
        }

        let improvement_count = ImprovementCount {
            high: count(&issues, Severity::High),
            medium: count(&issues, Severity::Medium),
            low: count(&issues, Severity::Low),
            positive: strengths.len(),
        };

        if issues.is_empty()
            && (!suggestions.weak_verbs.is_empty() || !suggestions.content_improvements.is_empty())
        {
            issues.push(
                Issue::new(
                    Severity::Low,
                    IssueKind::General,
                    "Good resume; more impactful language would strengthen it.",
                )
                .with_text(preview(text)),
            );
        }

        let score = score.clamp(0, 100) as u8;
        let feedback = feedback_for(score).to_string();
        let is_already_optimized = evidence.bullet_points
            && evidence.strong_verbs.len() >= 5
            && evidence.quantifiable_achievements
            && evidence.passive_voice_count <= 1
            && evidence.weak_phrases_count <= 1;

        log::debug!(
            "lint score {} ({} high, {} medium, {} low)",
            score,
            improvement_count.high,
            improvement_count.medium,
            improvement_count.low
        );

        strengths.extend(issues);
        LintReport {
            score,
            issues: strengths,
            feedback,
            improvement_count,
            is_already_optimized,
            optimization_evidence: evidence,
            suggestions,
        }
    }

    fn evidence(&self, text: &str) -> OptimizationEvidence {
        let lower = text.to_lowercase();
        let words: Vec<&str> = WORDS.find_iter(&lower).map(|m| m.as_str()).collect();
        let strong_verbs = self
            .engine
            .rules()
            .strong_verbs
            .iter()
            .filter(|verb| words.contains(&verb.as_str()))
            .cloned()
            .collect();

        let mut evidence = OptimizationEvidence {
            bullet_points: has_bullet_points(text),
            strong_verbs,
            quantifiable_achievements: METRICS.iter().any(|re| re.is_match(text)),
            ..Default::default()
        };
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if is_passive(line) {
                evidence.passive_voice_count += 1;
            }
            if self.engine.find_weak_phrase(line).is_some() {
                evidence.weak_phrases_count += 1;
            }
        }
        evidence
    }
}

fn count(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

/// Overall feedback for a score.
pub fn feedback_for(score: u8) -> &'static str {
    if score >= 90 {
        "Well-structured with minimal issues. Review the suggestions for further polish."
    } else if score >= 75 {
        "Decent, but targeted improvements in clarity and impact would help."
    } else {
        "Several areas need improvement. Follow the suggestions to make it more effective."
    }
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(100).collect();
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        head
    }
}

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLET_GLYPHS) || NUMBERED.is_match(line)
}

fn has_bullet_points(text: &str) -> bool {
    text.lines().map(str::trim).any(|line| {
        line.starts_with(BULLET_GLYPHS)
            || (line.chars().count() > 2 && NUMBERED.is_match(line))
    })
}

fn mentions_achievement(line: &str) -> bool {
    let lower = line.to_lowercase();
    WORDS
        .find_iter(&lower)
        .any(|m| ACHIEVEMENT_VERBS.contains(&m.as_str()))
}

fn is_passive(line: &str) -> bool {
    PASSIVE.is_match(line)
}

/// Markup or symbols that applicant tracking systems tend to mangle.
pub fn has_ats_unfriendly(text: &str) -> bool {
    IMAGE_TAG.is_match(text)
        || TABLE_TAG.is_match(text)
        || text.chars().any(|c| {
            !(c.is_ascii()
                || c.is_alphabetic()
                || c.is_whitespace()
                || BULLET_GLYPHS.contains(&c)
                || SAFE_TYPOGRAPHY.contains(&c))
        })
}

/// Split text into bullets (with continuation lines) and standalone lines.
///
/// Blank lines and short ALL-CAPS headers end a bullet and are dropped.
fn logical_units(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim) {
        let is_header = is_all_caps(line) && line.split_whitespace().count() <= 4;
        if line.is_empty() || is_header {
            units.extend(current.take());
            continue;
        }
        if starts_with_bullet(line) {
            units.extend(current.take());
            current = Some(line.to_string());
        } else if let Some(bullet) = current.as_mut() {
            bullet.push(' ');
            bullet.push_str(line);
        } else {
            units.push(line.to_string());
        }
    }
    units.extend(current);
    units
        .into_iter()
        .filter(|unit| !BULLET_GLYPHS.iter().any(|g| unit == &g.to_string()))
        .collect()
}

/// Up to two metric snippets with some surrounding context.
fn metric_examples(text: &str) -> Vec<String> {
    let mut examples = Vec::new();
    for re in METRICS.iter() {
        for m in re.find_iter(text).take(2) {
            let start = floor_boundary(text, m.start().saturating_sub(20));
            let end = ceil_boundary(text, (m.end() + 20).min(text.len()));
            let mut snippet = text[start..end].trim().replace('\n', " ");
            if start > 0 {
                snippet.insert_str(0, "...");
            }
            if end < text.len() {
                snippet.push_str("...");
            }
            examples.push(snippet);
            if examples.len() == 2 {
                return examples;
            }
        }
    }
    examples
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEAK_RESUME: &str = "\
Responsible for managing projects and ensuring deadlines were met.
Worked on various client accounts to improve engagement.
Assisted in scheduling and administrative tasks for the team.
Developed a social media strategy but no quantifiable results.";

    const STRONG_RESUME: &str = "\
EXPERIENCE
• Led a team of 6 engineers to deliver the billing platform
• Reduced infrastructure cost by 30% in two quarters
• Designed and launched a self-serve onboarding flow
• Automated release checks, saving 10 hours per week
• Mentored 4 junior developers";

    #[test]
    fn test_weak_resume_scores_low() {
        let report = Analyzer::default().analyze(WEAK_RESUME);
        let kinds: Vec<IssueKind> = report.problems().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::WeakPhrase));
        assert!(kinds.contains(&IssueKind::PassiveVoice));
        assert!(kinds.contains(&IssueKind::Format));
        assert!(report.score < 90);
        assert!(!report.is_already_optimized);
        assert!(report
            .suggestions
            .weak_verbs
            .contains(&"Replace 'responsible for' with 'managed'".to_string()));
    }

    #[test]
    fn test_strong_resume_is_optimized() {
        let report = Analyzer::default().analyze(STRONG_RESUME);
        assert!(report.is_already_optimized, "{:?}", report.optimization_evidence);
        assert!(report.score >= 90);
        assert_eq!(report.feedback, feedback_for(report.score));
        assert_eq!(report.issues[0].severity, Severity::Positive);
        assert_eq!(report.improvement_count.positive, 2);
    }

    #[test]
    fn test_weak_phrase_alternatives() {
        let report = Analyzer::default().analyze("• Worked on the checkout service rewrite");
        let issue = report
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::WeakPhrase)
            .unwrap();
        assert_eq!(issue.alternatives[0], "developed");
    }

    #[test]
    fn test_missing_numbers_only_for_achievements() {
        let report = Analyzer::default().analyze("• Developed the search service\n• Enjoyed hiking");
        let missing: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingNumbers)
            .collect();
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn test_ats_detection() {
        assert!(has_ats_unfriendly("Skills 🚀"));
        assert!(has_ats_unfriendly("<img src=\"me.png\">"));
        assert!(!has_ats_unfriendly("José • C++ | “quoted” – fine"));
    }

    #[test]
    fn test_bullet_continuations_join() {
        let units = logical_units("SKILLS\n• Built a thing\n  that spans lines\nPlain line\n\n•");
        assert_eq!(units, vec!["• Built a thing that spans lines Plain line"]);
    }

    #[test]
    fn test_score_bounds() {
        let noisy = "🚀 was built\n".repeat(40);
        let report = Analyzer::default().analyze(&noisy);
        assert_eq!(report.score, 0);
        assert_eq!(feedback_for(100), feedback_for(90));
    }

    #[test]
    fn test_report_serializes_with_wire_names() {
        let report = Analyzer::default().analyze(WEAK_RESUME);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["issues"][0]["type"].is_string());
        assert!(json["suggestions"]["weak_verbs"].is_array());
        assert!(json["improvement_count"]["high"].is_number());
    }
}
