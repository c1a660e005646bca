//! Rewrite dictionaries.
//!
//! Every rule the engine applies lives here as data: weak phrases and
//! their replacements, filler phrases, doubled-verb repairs, the strong
//! verb set and the verb categories used when a bullet lacks a verb.

use serde::{Deserialize, Serialize};

/// A group of keywords with the verbs to open a bullet about them, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbCategory {
    /// Category name
    pub name: String,
    /// Word stems that vote for this category
    pub keywords: Vec<String>,
    /// Ranked past-tense verbs
    pub verbs: Vec<String>,
}

impl VerbCategory {
    /// Create a category from keyword stems and ranked verbs.
    pub fn new(name: impl Into<String>, keywords: &[&str], verbs: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            verbs: verbs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Dictionaries driving the rule engine and the lint analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Weak phrase → replacement
    pub weak_phrases: Vec<(String, String)>,
    /// Filler phrase → shorter form
    pub redundant_phrases: Vec<(String, String)>,
    /// Doubled verb left behind by a substitution → single verb
    pub verb_pairs: Vec<(String, String)>,
    /// Past-tense action verbs accepted as a bullet opener
    pub strong_verbs: Vec<String>,
    /// Irregular verb forms → past tense
    pub irregular_verbs: Vec<(String, String)>,
    /// Verb categories, in tie-break order; the first is the default
    pub categories: Vec<VerbCategory>,
    /// Weak phrase → alternatives offered by lint
    pub alternatives: Vec<(String, Vec<String>)>,
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSet {
    /// Rule set with no rules at all.
    ///
    /// The engine then only capitalizes and punctuates.
    pub fn empty() -> Self {
        Self {
            weak_phrases: Vec::new(),
            redundant_phrases: Vec::new(),
            verb_pairs: Vec::new(),
            strong_verbs: Vec::new(),
            irregular_verbs: Vec::new(),
            categories: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// Add or replace a weak phrase.
    pub fn with_weak_phrase(mut self, phrase: &str, replacement: &str) -> Self {
        let phrase = phrase.trim().to_lowercase();
        self.weak_phrases.retain(|(p, _)| *p != phrase);
        self.weak_phrases.push((phrase, replacement.trim().to_string()));
        self
    }

    /// Add a filler phrase.
    pub fn with_redundant_phrase(mut self, phrase: &str, replacement: &str) -> Self {
        self.redundant_phrases
            .push((phrase.trim().to_lowercase(), replacement.trim().to_string()));
        self
    }

    /// Accept another verb as a strong opener.
    pub fn with_strong_verb(mut self, verb: &str) -> Self {
        let verb = verb.trim().to_lowercase();
        if !self.strong_verbs.contains(&verb) {
            self.strong_verbs.push(verb);
        }
        self
    }

    /// Append a verb category. Existing categories keep their tie-break precedence.
    pub fn with_category(mut self, category: VerbCategory) -> Self {
        self.categories.retain(|c| c.name != category.name);
        self.categories.push(category);
        self
    }

    /// Replacement for a weak phrase, if it is one.
    pub fn replacement_for(&self, phrase: &str) -> Option<&str> {
        let phrase = phrase.to_lowercase();
        self.weak_phrases
            .iter()
            .find(|(p, _)| *p == phrase)
            .map(|(_, r)| r.as_str())
    }

    /// Alternatives for a weak phrase, falling back to its replacement.
    pub fn alternatives_for(&self, phrase: &str) -> Vec<String> {
        let phrase = phrase.to_lowercase();
        if let Some((_, alts)) = self.alternatives.iter().find(|(p, _)| *p == phrase) {
            return alts.clone();
        }
        self.replacement_for(&phrase)
            .map(|r| vec![r.to_string()])
            .unwrap_or_default()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            weak_phrases: pairs(&[
                ("responsible for", "managed"),
                ("was responsible for", "managed"),
                ("worked on", "developed"),
                ("helped with", "contributed to"),
                ("helped to", "contributed to"),
                ("assisted with", "supported"),
                ("assisted in", "supported"),
                ("in charge of", "directed"),
                ("duties included", "delivered"),
                ("tasked with", "executed"),
                ("was tasked with", "executed"),
                ("participated in", "contributed to"),
                ("was involved in", "contributed to"),
                ("involved in", "contributed to"),
                ("took part in", "collaborated on"),
                ("worked with", "collaborated with"),
                ("was part of", "served on"),
                ("made sure", "ensured"),
                ("making sure", "ensuring"),
            ]),
            redundant_phrases: pairs(&[
                ("in order to", "to"),
                ("in an effort to", "to"),
                ("so as to", "to"),
                ("as needed", ""),
                ("when necessary", ""),
                ("as required", ""),
            ]),
            verb_pairs: pairs(&[
                ("managed leading", "led"),
                ("managed managing", "oversaw"),
                ("managed handling", "handled"),
                ("managed coordinating", "coordinated"),
                ("managed overseeing", "oversaw"),
                ("managed developing", "developed"),
                ("managed creating", "created"),
                ("managed implementing", "implemented"),
                ("directed leading", "directed"),
                ("directed managing", "directed"),
                ("led leading", "directed"),
                ("led managing", "directed"),
                ("developed developing", "developed"),
                ("developed implementing", "implemented"),
                ("developed building", "built"),
                ("contributed to improving", "enhanced"),
                ("contributed to developing", "co-developed"),
                ("supported developing", "co-developed"),
                ("executed implementing", "implemented"),
                ("conducted performing", "performed"),
                ("performed executing", "executed"),
            ]),
            strong_verbs: words(&[
                "achieved", "accelerated", "accomplished", "acquired", "adapted", "addressed",
                "advanced", "advised", "allocated", "analyzed", "applied", "appointed",
                "appraised", "approved", "architected", "arranged", "assembled", "assessed",
                "assigned", "attained", "authored", "automated", "balanced", "boosted", "built",
                "calculated", "captured", "catalyzed", "centralized", "championed", "clarified",
                "coached", "co-developed", "collaborated", "communicated", "compiled",
                "completed", "conceptualized", "conducted", "consolidated", "constructed",
                "consulted", "contributed", "controlled", "converted", "coordinated", "created",
                "cultivated", "customized", "decreased", "defined", "delegated", "delivered",
                "demonstrated", "deployed", "designed", "determined", "developed", "devised",
                "diagnosed", "directed", "discovered", "doubled", "drove", "earned", "edited",
                "educated", "eliminated", "enabled", "encouraged", "engineered", "enhanced",
                "ensured", "established", "evaluated", "exceeded", "executed", "expanded",
                "expedited", "facilitated", "finalized", "fixed", "forecasted", "formulated",
                "founded", "generated", "grew", "guided", "handled", "headed", "hired",
                "identified", "implemented", "improved", "increased", "influenced", "initiated",
                "innovated", "installed", "instituted", "instructed", "integrated", "introduced",
                "invented", "investigated", "launched", "led", "leveraged", "maintained",
                "managed", "marketed", "maximized", "measured", "mentored", "merged",
                "migrated", "minimized", "modernized", "monitored", "motivated", "navigated",
                "negotiated", "operated", "optimized", "orchestrated", "organized",
                "outperformed", "overhauled", "oversaw", "partnered", "performed", "pioneered",
                "planned", "presented", "prioritized", "processed", "produced", "programmed",
                "promoted", "proposed", "provided", "published", "purchased", "recommended",
                "redesigned", "reduced", "reengineered", "refactored", "refined", "refocused",
                "regulated", "reorganized", "reported", "researched", "resolved",
                "restructured", "revamped", "reviewed", "revitalized", "saved", "scheduled",
                "secured", "selected", "served", "set", "shaped", "shipped", "simplified",
                "sold", "solved", "specialized", "spearheaded", "standardized", "started",
                "streamlined", "strengthened", "structured", "succeeded", "supervised",
                "supported", "surpassed", "surveyed", "sustained", "systematized", "targeted",
                "taught", "tested", "trained", "transformed", "translated", "upgraded",
                "utilized", "validated", "won", "wrote",
            ]),
            irregular_verbs: pairs(&[
                ("lead", "led"),
                ("leads", "led"),
                ("leading", "led"),
                ("build", "built"),
                ("builds", "built"),
                ("building", "built"),
                ("write", "wrote"),
                ("writes", "wrote"),
                ("writing", "wrote"),
                ("drive", "drove"),
                ("drives", "drove"),
                ("driving", "drove"),
                ("grow", "grew"),
                ("grows", "grew"),
                ("growing", "grew"),
                ("win", "won"),
                ("wins", "won"),
                ("winning", "won"),
                ("oversee", "oversaw"),
                ("oversees", "oversaw"),
                ("overseeing", "oversaw"),
                ("teach", "taught"),
                ("teaches", "taught"),
                ("teaching", "taught"),
                ("sell", "sold"),
                ("sells", "sold"),
                ("selling", "sold"),
                ("setting", "set"),
            ]),
            categories: vec![
                VerbCategory::new(
                    "achievement",
                    &[
                        "increas", "revenue", "growth", "award", "record", "goal", "target",
                        "exceed", "saving", "sales", "profit", "result", "kpi", "quota",
                    ],
                    &["Delivered", "Achieved", "Exceeded"],
                ),
                VerbCategory::new(
                    "leadership",
                    &[
                        "team", "mentor", "staff", "hire", "hiring", "manag", "lead", "supervis",
                        "direct", "coordinat", "stakeholder", "cross-functional", "intern",
                    ],
                    &["Led", "Directed", "Managed"],
                ),
                VerbCategory::new(
                    "technical",
                    &[
                        "develop", "code", "software", "system", "api", "database", "applicat",
                        "platform", "feature", "infrastructure", "cloud", "pipeline", "automat",
                        "deploy", "backend", "frontend", "bug", "service", "architecture",
                    ],
                    &["Developed", "Engineered", "Implemented"],
                ),
                VerbCategory::new(
                    "communication",
                    &[
                        "present", "document", "report", "communicat", "client", "customer",
                        "training", "workshop", "negotiat", "writing", "proposal", "meeting",
                    ],
                    &["Communicated", "Presented", "Authored"],
                ),
                VerbCategory::new(
                    "analysis",
                    &[
                        "analy", "data", "research", "metric", "insight", "model", "forecast",
                        "evaluat", "assess", "survey", "trend", "statistic", "dashboard",
                    ],
                    &["Analyzed", "Evaluated", "Researched"],
                ),
            ],
            alternatives: vec![
                (
                    "responsible for".into(),
                    words(&["managed", "led", "orchestrated", "directed", "oversaw"]),
                ),
                (
                    "worked on".into(),
                    words(&["developed", "implemented", "executed", "delivered", "created"]),
                ),
                (
                    "in charge of".into(),
                    words(&["managed", "headed", "directed", "led", "supervised"]),
                ),
                (
                    "duties included".into(),
                    words(&["achieved", "performed", "executed", "delivered", "completed"]),
                ),
                (
                    "helped with".into(),
                    words(&["contributed to", "supported", "facilitated", "collaborated on", "enhanced"]),
                ),
                (
                    "assisted in".into(),
                    words(&["supported", "contributed to", "facilitated", "collaborated on", "aided"]),
                ),
            ],
        }
    }
}
