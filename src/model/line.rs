//! Line-level types produced by the segmenter.

use serde::{Deserialize, Serialize};

/// Canonical resume sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Summary, profile or objective
    Summary,
    /// Work experience
    Experience,
    /// Education
    Education,
    /// Skills
    Skills,
    /// Projects
    Projects,
    /// Certifications and licenses
    Certifications,
}

impl Section {
    /// All canonical sections in declaration order.
    pub const ALL: [Section; 6] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
    ];

    /// Normalized header key, as written in the marker encoding.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Summary => "SUMMARY",
            Section::Experience => "EXPERIENCE",
            Section::Education => "EDUCATION",
            Section::Skills => "SKILLS",
            Section::Projects => "PROJECTS",
            Section::Certifications => "CERTIFICATIONS",
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
        }
    }

    /// Look up a section by its normalized key.
    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL
            .iter()
            .copied()
            .find(|s| s.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Sections whose entries are grouped into dated records.
    pub fn has_entries(&self) -> bool {
        matches!(
            self,
            Section::Experience | Section::Education | Section::Projects | Section::Certifications
        )
    }
}

/// Key carried by a header line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SectionKey {
    /// A header recognized as one of the canonical sections
    Canonical(Section),
    /// Any other header, keyed by its literal text
    Custom(String),
}

impl SectionKey {
    /// Text used for this key in the marker encoding and as a fallback title.
    pub fn label(&self) -> &str {
        match self {
            SectionKey::Canonical(section) => section.key(),
            SectionKey::Custom(text) => text,
        }
    }

    /// The canonical section, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            SectionKey::Canonical(section) => Some(*section),
            SectionKey::Custom(_) => None,
        }
    }
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "kebab-case")]
pub enum LineKind {
    /// Document name/title (first line)
    Name,
    /// Contact block line (email, phone, profile URL, location)
    Contact,
    /// Section header
    Header(SectionKey),
    /// Line carrying a recognized date range
    Date,
    /// Sub-section header (`Languages:`)
    Subheader,
    /// `Title____date` line split into title and date
    EntryTitle,
    /// Bullet item, marker stripped
    Bullet,
    /// Company/institution line opening an entry
    EntryHeader,
    /// Anything else
    Text,
}

/// A classified line of normalized resume text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedLine {
    /// Line classification
    pub kind: LineKind,

    /// The line as it came out of normalization
    pub raw_text: String,

    /// Text with markers, colons and underscores stripped and trimmed
    pub clean_text: String,

    /// Indentation depth measured on the original line
    pub indent_level: u8,

    /// Date range found on this line, verbatim
    pub date: Option<String>,
}

impl TaggedLine {
    /// Create a tagged line.
    pub fn new(kind: LineKind, raw_text: impl Into<String>, clean_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            clean_text: clean_text.into(),
            indent_level: 0,
            date: None,
        }
    }

    /// Attach a date range.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the indentation depth.
    pub fn with_indent(mut self, level: u8) -> Self {
        self.indent_level = level;
        self
    }

    /// Check if this is a header line.
    pub fn is_header(&self) -> bool {
        matches!(self.kind, LineKind::Header(_))
    }

    /// Check if this is a bullet line.
    pub fn is_bullet(&self) -> bool {
        self.kind == LineKind::Bullet
    }

    /// Header key, if this is a header line.
    pub fn header_key(&self) -> Option<&SectionKey> {
        match &self.kind {
            LineKind::Header(key) => Some(key),
            _ => None,
        }
    }

    /// Clean text with the date range removed, trimmed of separators.
    pub fn text_without_date(&self) -> String {
        let text = match &self.date {
            Some(date) => self.clean_text.replacen(date.as_str(), " ", 1),
            None => self.clean_text.clone(),
        };
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let collapsed = collapsed
            .replace("( )", " ")
            .replace("()", " ")
            .replace("[ ]", " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        collapsed
            .trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—' | '(' | ')' | ':' | '•')
            })
            .to_string()
    }
}
