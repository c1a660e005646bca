//! Rendering result and pipeline statistics.

use crate::model::{ContactInfo, LineKind, ResumeDocument, TaggedLine};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Contact details of the rendered document
    pub contact: ContactInfo,

    /// Statistics
    pub stats: ParseStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, contact: ContactInfo, stats: ParseStats) -> Self {
        Self {
            content,
            contact,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            contact: ContactInfo::default(),
            stats: ParseStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while structuring a resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Number of documents merged into these statistics
    pub document_count: u32,

    /// Number of non-blank lines segmented
    pub line_count: u32,

    pub name_lines: u32,
    pub contact_lines: u32,
    pub header_count: u32,
    pub subheader_count: u32,
    pub entry_header_count: u32,
    pub entry_title_count: u32,
    pub date_count: u32,
    pub bullet_count: u32,
    pub text_count: u32,

    /// Entries across experience, education, projects and certifications
    pub entry_count: u32,

    /// Additional (non-canonical) sections
    pub additional_section_count: u32,

    /// Bullets and summaries changed by the rule engine
    pub bullets_rewritten: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ParseStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one segmented line.
    pub fn add_line(&mut self, kind: &LineKind) {
        self.line_count += 1;
        match kind {
            LineKind::Name => self.name_lines += 1,
            LineKind::Contact => self.contact_lines += 1,
            LineKind::Header(_) => self.header_count += 1,
            LineKind::Subheader => self.subheader_count += 1,
            LineKind::EntryHeader => self.entry_header_count += 1,
            LineKind::EntryTitle => self.entry_title_count += 1,
            LineKind::Date => self.date_count += 1,
            LineKind::Bullet => self.bullet_count += 1,
            LineKind::Text => self.text_count += 1,
        }
    }

    /// Count a segmented sequence, words included.
    pub fn add_lines(&mut self, lines: &[TaggedLine]) {
        for line in lines {
            self.add_line(&line.kind);
            self.count_text(&line.clean_text);
        }
    }

    /// Count the entries of an assembled document.
    pub fn add_document(&mut self, doc: &ResumeDocument) {
        self.document_count += 1;
        self.entry_count += doc.entry_count() as u32;
        self.additional_section_count += doc.additional_sections().len() as u32;
    }

    /// Count rewritten bullets.
    pub fn add_rewritten(&mut self, count: usize) {
        self.bullets_rewritten += count as u32;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ParseStats) {
        self.document_count += other.document_count;
        self.line_count += other.line_count;
        self.name_lines += other.name_lines;
        self.contact_lines += other.contact_lines;
        self.header_count += other.header_count;
        self.subheader_count += other.subheader_count;
        self.entry_header_count += other.entry_header_count;
        self.entry_title_count += other.entry_title_count;
        self.date_count += other.date_count;
        self.bullet_count += other.bullet_count;
        self.text_count += other.text_count;
        self.entry_count += other.entry_count;
        self.additional_section_count += other.additional_section_count;
        self.bullets_rewritten += other.bullets_rewritten;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, SectionKey};

    #[test]
    fn test_count_text() {
        let mut stats = ParseStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_add_lines_by_kind() {
        let lines = vec![
            TaggedLine::new(LineKind::Name, "Jane Doe", "Jane Doe"),
            TaggedLine::new(
                LineKind::Header(SectionKey::Canonical(Section::Skills)),
                "SKILLS",
                "SKILLS",
            ),
            TaggedLine::new(LineKind::Bullet, "• Rust", "Rust"),
            TaggedLine::new(LineKind::Bullet, "• Go", "Go"),
        ];
        let mut stats = ParseStats::new();
        stats.add_lines(&lines);

        assert_eq!(stats.line_count, 4);
        assert_eq!(stats.name_lines, 1);
        assert_eq!(stats.header_count, 1);
        assert_eq!(stats.bullet_count, 2);
        assert_eq!(stats.word_count, 5);
    }

    #[test]
    fn test_merge() {
        let mut stats1 = ParseStats {
            document_count: 1,
            bullet_count: 5,
            ..Default::default()
        };
        let stats2 = ParseStats {
            document_count: 1,
            bullet_count: 3,
            bullets_rewritten: 2,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.document_count, 2);
        assert_eq!(stats1.bullet_count, 8);
        assert_eq!(stats1.bullets_rewritten, 2);
    }

    #[test]
    fn test_render_result_content_only() {
        let result = RenderResult::content_only("# Jane".to_string());
        assert_eq!(result.content_len(), 6);
        assert_eq!(result.stats, ParseStats::default());
    }
}
