//! Rule-based bullet rewriting.

use super::rules::RuleSet;
use crate::model::ResumeDocument;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Bullet glyphs stripped from the start of a line before rewriting.
pub const BULLET_GLYPHS: &[char] = &[
    '•', '-', '*', '→', '▪', '▸', '‣', '○', '·', '–', '—', '♦', '★', '»', '▶', '◦', '∙',
];

/// Lines at or under this many characters are labels and get no period.
pub const MIN_SENTENCE_LEN: usize = 20;

/// Upper bound on substitution rounds before the text must settle.
const MAX_SUBSTITUTION_ROUNDS: usize = 8;

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").unwrap());

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9][a-z0-9+#-]*").unwrap());

/// Phrase table compiled to one case-insensitive alternation, longest phrase first.
#[derive(Debug, Clone)]
struct PhraseTable {
    regex: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl PhraseTable {
    fn new(entries: &[(String, String)]) -> Self {
        let mut phrases: Vec<&str> = entries.iter().map(|(p, _)| p.as_str()).collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        let alternatives: Vec<String> = phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                p.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        let regex = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
            match Regex::new(&pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    log::warn!("rewrite phrase table disabled: {}", err);
                    None
                }
            }
        };

        let replacements = entries
            .iter()
            .map(|(p, r)| (phrase_key(p), r.clone()))
            .collect();

        Self {
            regex,
            replacements,
        }
    }

    fn apply(&self, text: &str) -> String {
        let Some(regex) = &self.regex else {
            return text.to_string();
        };
        regex
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                let replacement = self
                    .replacements
                    .get(&phrase_key(matched))
                    .map(String::as_str)
                    .unwrap_or(matched);
                match_case(matched, replacement)
            })
            .into_owned()
    }

    fn find(&self, text: &str) -> Option<String> {
        self.regex
            .as_ref()?
            .find(text)
            .map(|m| phrase_key(m.as_str()))
    }
}

fn phrase_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Carry an upper-case first letter over to the replacement.
fn match_case(matched: &str, replacement: &str) -> String {
    let upper = matched.chars().next().is_some_and(char::is_uppercase);
    if upper {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

/// Upper-case the first alphabetic character.
pub fn capitalize_first(text: &str) -> String {
    match text.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((i, c)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..i]);
            out.extend(c.to_uppercase());
            out.push_str(&text[i + c.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Append a period to sentence-length lines without terminal punctuation.
pub fn punctuate(text: &str) -> String {
    if text.chars().count() <= MIN_SENTENCE_LEN || text.ends_with(['.', '!', '?']) {
        return text.to_string();
    }
    let trimmed = text.trim_end_matches([',', ';', ':', ' ']);
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Remove leading bullet glyphs.
///
/// ASCII glyphs (`-`, `*`) only count when followed by whitespace.
pub fn strip_bullet(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        let mut chars = rest.chars();
        let Some(first) = chars.next() else {
            return rest;
        };
        if !BULLET_GLYPHS.contains(&first) {
            return rest;
        }
        let after = chars.as_str();
        if first.is_ascii() && !(after.is_empty() || after.starts_with(char::is_whitespace)) {
            return rest;
        }
        rest = after.trim_start();
    }
}

fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1").into_owned()
}

/// Applies a [`RuleSet`] to bullets.
///
/// Rewriting is pure and idempotent: running [`RuleEngine::rewrite_bullet`]
/// on its own output returns that output unchanged.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RuleSet,
    weak: PhraseTable,
    redundant: PhraseTable,
    pairs: PhraseTable,
    strong: HashSet<String>,
    irregular: HashMap<String, String>,
}

impl RuleEngine {
    /// Compile a rule set.
    pub fn new(rules: RuleSet) -> Self {
        let weak = PhraseTable::new(&rules.weak_phrases);
        let redundant = PhraseTable::new(&rules.redundant_phrases);
        let pairs = PhraseTable::new(&rules.verb_pairs);
        let strong = rules.strong_verbs.iter().map(|v| v.to_lowercase()).collect();
        let irregular = rules
            .irregular_verbs
            .iter()
            .map(|(form, past)| (form.to_lowercase(), past.to_lowercase()))
            .collect();
        Self {
            rules,
            weak,
            redundant,
            pairs,
            strong,
            irregular,
        }
    }

    /// The rule set this engine was built from.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Check if a word is an accepted strong opener.
    pub fn is_strong_verb(&self, word: &str) -> bool {
        self.strong.contains(&word.to_lowercase())
    }

    /// First weak phrase in the text, lower-cased.
    pub fn find_weak_phrase(&self, text: &str) -> Option<String> {
        self.weak.find(text)
    }

    /// Rewrite one bullet or summary string.
    ///
    /// Steps, in order: filler and weak-phrase substitution, strong-verb guarantee,
    /// capitalization, terminal punctuation. Blank input is returned unchanged.
    pub fn rewrite_bullet(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let line = tidy(strip_bullet(text));

        let line = self.substitute(&line);
        let line = self.ensure_strong_verb(&line);
        let line = tidy(&self.pairs.apply(&line));
        let line = capitalize_first(&line);
        punctuate(&line)
    }

    /// Rewrite the bullet lines of a whole resume, leaving other lines as they are.
    pub fn rewrite_text(&self, text: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim_start();
            let is_bullet = strip_bullet(trimmed).len() < trimmed.trim_end().len()
                && !trimmed.is_empty();
            if !is_bullet {
                out.push(line.to_string());
                continue;
            }
            let rewritten = self.rewrite_bullet(trimmed);
            if rewritten.is_empty() {
                out.push(line.to_string());
                continue;
            }
            let indent = &line[..line.len() - trimmed.len()];
            out.push(format!("{}• {}", indent, rewritten));
        }
        let mut joined = out.join("\n");
        if text.ends_with('\n') {
            joined.push('\n');
        }
        joined
    }

    /// Rewrite the summary and every bullet in place; returns how many changed.
    pub fn rewrite_document(&self, doc: &mut ResumeDocument) -> usize {
        let changed = doc.map_bullets(|bullet| self.rewrite_bullet(bullet));
        log::debug!("rule engine rewrote {} strings", changed);
        changed
    }

    /// Filler removal, weak phrases, verb pairs; repeated until nothing changes.
    ///
    /// Dropping a filler can bring the words of a weak phrase together, so a
    /// single round is not enough to reach a fixed point.
    fn substitute(&self, text: &str) -> String {
        let mut current = tidy(text);
        for _ in 0..MAX_SUBSTITUTION_ROUNDS {
            let text = self.redundant.apply(&current);
            let text = self.weak.apply(&text);
            let next = tidy(&self.pairs.apply(&text));
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn ensure_strong_verb(&self, text: &str) -> String {
        let Some(token) = text.split_whitespace().next() else {
            return String::new();
        };
        let core_start = token
            .find(|c: char| c.is_alphanumeric())
            .unwrap_or(token.len());
        let core = token[core_start..].trim_end_matches(|c: char| !c.is_alphanumeric());
        let lower = core.to_lowercase();

        if self.strong.contains(&lower) {
            return text.to_string();
        }

        if let Some(past) = self.past_tense(&lower) {
            let core_end = core_start + core.len();
            return format!("{}{}{}", &text[..core_start], past, &text[core_end..]);
        }

        match self.choose_verb(text) {
            Some(verb) => {
                let rest = if is_acronym(core) {
                    text.to_string()
                } else {
                    lowercase_first(text)
                };
                format!("{} {}", verb, rest)
            }
            None => text.to_string(),
        }
    }

    /// Past tense of a gerund or third-person form, if that form is a strong verb.
    fn past_tense(&self, word: &str) -> Option<String> {
        if let Some(past) = self.irregular.get(word) {
            return Some(past.clone());
        }

        let mut candidates: Vec<String> = Vec::new();
        if let Some(stem) = word.strip_suffix("ing").filter(|s| s.len() >= 2) {
            candidates.push(format!("{stem}ed"));
            if let Some(base) = stem.strip_suffix('y') {
                candidates.push(format!("{base}ied"));
            }
        } else if let Some(stem) = word.strip_suffix("ies") {
            candidates.push(format!("{stem}ied"));
        } else if let Some(stem) = word.strip_suffix('s').filter(|s| !s.ends_with('s')) {
            candidates.push(format!("{stem}d"));
            candidates.push(format!("{stem}ed"));
            if let Some(base) = stem.strip_suffix('e') {
                candidates.push(format!("{base}ed"));
            }
        }
        candidates.into_iter().find(|c| self.strong.contains(c))
    }

    /// Ranked verb of the category with the most keyword hits.
    fn choose_verb(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();

        let mut best: Option<(usize, usize)> = None;
        for (index, category) in self.rules.categories.iter().enumerate() {
            let hits = category
                .keywords
                .iter()
                .map(|k| words.iter().filter(|w| w.starts_with(k.as_str())).count())
                .sum::<usize>();
            if best.map_or(true, |(_, most)| hits > most) {
                best = Some((index, hits));
            }
        }

        let (index, hits) = best?;
        let category = if hits == 0 {
            self.rules.categories.first()?
        } else {
            &self.rules.categories[index]
        };
        log::trace!("verb category {} ({} hits)", category.name, hits);

        category
            .verbs
            .iter()
            .find(|v| !words.contains(&v.to_lowercase().as_str()))
            .or_else(|| category.verbs.first())
            .map(String::as_str)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

fn is_acronym(word: &str) -> bool {
    word == "I" || word.chars().filter(|c| c.is_uppercase()).count() > 1
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(text: &str) -> String {
        RuleEngine::default().rewrite_bullet(text)
    }

    #[test]
    fn test_weak_phrase_becomes_strong_verb() {
        let out = rewrite("• Responsible for managing a team of developers");
        assert_eq!(out, "Oversaw a team of developers.");
    }

    #[test]
    fn test_longest_phrase_wins() {
        assert_eq!(rewrite("was responsible for billing"), "Managed billing");
    }

    #[test]
    fn test_gerund_to_past() {
        assert_eq!(
            rewrite("developing internal tooling for QA"),
            "Developed internal tooling for QA."
        );
        assert_eq!(rewrite("leads the platform group"), "Led the platform group.");
        assert_eq!(rewrite("identifying root causes"), "Identified root causes.");
    }

    #[test]
    fn test_prepends_category_verb() {
        assert_eq!(
            rewrite("Database migration to the cloud platform"),
            "Developed database migration to the cloud platform."
        );
        assert_eq!(rewrite("team of five interns"), "Led team of five interns.");
        assert_eq!(rewrite("Quarterly numbers"), "Delivered quarterly numbers.");
        assert_eq!(rewrite("iOS app"), "Delivered iOS app");
    }

    #[test]
    fn test_acronym_keeps_case() {
        assert_eq!(
            rewrite("AWS cost review for 12 services"),
            "Developed AWS cost review for 12 services."
        );
    }

    #[test]
    fn test_redundant_phrase() {
        assert_eq!(
            rewrite("Built dashboards in order to track churn"),
            "Built dashboards to track churn."
        );
        assert_eq!(
            rewrite("Fixed production bugs as needed, weekly"),
            "Fixed production bugs, weekly."
        );
    }

    #[test]
    fn test_punctuation_threshold() {
        assert_eq!(rewrite("Led hiring"), "Led hiring");
        assert_eq!(
            rewrite("Led hiring for the payments group;"),
            "Led hiring for the payments group."
        );
        assert_eq!(rewrite("Shipped the v2 release!"), "Shipped the v2 release!");
    }

    #[test]
    fn test_empty_passthrough() {
        assert_eq!(rewrite(""), "");
        assert_eq!(rewrite("   "), "   ");
        assert_eq!(rewrite("•"), "");
    }

    #[test]
    fn test_idempotent() {
        let engine = RuleEngine::default();
        for input in [
            "• Responsible for managing a team of developers",
            "helped with improving onboarding docs for new hires",
            "worked on the API gateway",
            "Managing managing budgets",
            "- Participated in code reviews in order to raise quality",
            "iOS app",
            "5 patents filed",
            "(Co-)authored three papers on ranking models",
            "Making sure releases ship weekly",
            "as needed",
        ] {
            let once = engine.rewrite_bullet(input);
            assert_eq!(engine.rewrite_bullet(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_filler_inside_weak_phrase() {
        let engine = RuleEngine::default();
        let cases = [
            (
                "helped as needed with the launch of the product",
                "Contributed to the launch of the product.",
            ),
            (
                "took as needed part in reviews for the release",
                "Collaborated on reviews for the release.",
            ),
            (
                "making as needed sure tests pass on time",
                "Ensured tests pass on time.",
            ),
            ("worked as required on the billing API", "Developed the billing API."),
        ];
        for (input, expected) in cases {
            let once = engine.rewrite_bullet(input);
            assert_eq!(once, expected, "input: {input}");
            assert_eq!(engine.rewrite_bullet(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_rewrite_text_only_touches_bullets() {
        let engine = RuleEngine::default();
        let text = "EXPERIENCE\nAcme Corp\n  - worked on billing\n";
        assert_eq!(
            engine.rewrite_text(text),
            "EXPERIENCE\nAcme Corp\n  • Developed billing\n"
        );
    }

    #[test]
    fn test_empty_rules_only_format() {
        let engine = RuleEngine::new(RuleSet::empty());
        assert_eq!(
            engine.rewrite_bullet("responsible for the build system"),
            "Responsible for the build system."
        );
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("• • item"), "item");
        assert_eq!(strip_bullet("-5% churn"), "-5% churn");
        assert_eq!(strip_bullet("* item"), "item");
    }
}
