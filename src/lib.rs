//! # resumekit
//!
//! Resume structuring pipeline: turns the lossy text that comes out of a
//! PDF or Word extractor into a typed, editable [`ResumeDocument`], rewrites
//! bullet text with a deterministic rule engine, and lays documents out
//! for preview or print.
//!
//! ## Quick Start
//!
//! ```
//! use resumekit::{parse_text, render, DesignOptions, TemplateDescriptor};
//!
//! let doc = parse_text("Jane Doe\njane@example.com\n\nSKILLS\nRust, Go");
//! assert_eq!(doc.contact().name, "Jane Doe");
//!
//! let tree = render(&doc, &TemplateDescriptor::default(), &DesignOptions::default());
//! let text = resumekit::render::to_text(&tree, &Default::default());
//! assert!(text.contains("Rust, Go"));
//! ```
//!
//! ## Pipeline
//!
//! 1. [`normalize`]: line endings, ligatures, de-hyphenation, soft wraps
//! 2. [`segment`]: one [`TaggedLine`] per line
//! 3. [`assemble`]: typed records grouped by section
//! 4. [`rewrite_bullet`] (optional): weak phrases out, strong verb in
//! 5. [`render()`]: a [`RenderTree`] for a template and design
//!
//! Every stage is a total, synchronous function. Failures only come from
//! the collaborators at the edges: [`extract`] for binary formats and the
//! remote rewrite tier in [`rewrite`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod rewrite;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
pub use error::{Error, Result};
pub use extract::{ExtractorRegistry, PlainTextExtractor, TextExtractor};
pub use model::{
    AdditionalBody, AdditionalItem, AdditionalSection, Certification, ContactInfo, Education,
    Experience, LineKind, Project, ResumeDocument, Section, SectionId, SectionKey, SkillCategory,
    TaggedLine,
};
pub use parser::{Assembler, NormalizeOptions, NormalizePreset, Normalizer, ParseOptions, Segmenter};
pub use render::{
    render, DesignOptions, JsonFormat, ParseStats, Position, RenderOptions, RenderTree,
    SectionLayout, TemplateDescriptor,
};
pub use rewrite::{
    rewrite_with_fallback, Analyzer, LintReport, RemoteRewriter, RewriteMode, RewriteOutcome,
    RewriteRequest, RewriteResponse, RuleEngine, RuleSet,
};

use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Normalize raw extracted text.
///
/// ```
/// let text = resumekit::normalize("EXPERIENCE\r\n• Led develop-\r\ning of tools.");
/// assert_eq!(text, "EXPERIENCE\n• Led developing of tools.");
/// ```
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

/// Classify each line of normalized text.
pub fn segment(normalized: &str) -> Vec<TaggedLine> {
    Segmenter::default().segment(normalized)
}

/// Group tagged lines into a document.
pub fn assemble(lines: &[TaggedLine]) -> ResumeDocument {
    Assembler::new().assemble(lines)
}

/// Rewrite one bullet with the default rules.
///
/// Idempotent: rewriting the output again returns it unchanged. Build a
/// [`RuleEngine`] once when rewriting many bullets.
pub fn rewrite_bullet(bullet: &str) -> String {
    RuleEngine::default().rewrite_bullet(bullet)
}

/// Normalize, segment and assemble text with default options.
pub fn parse_text(text: &str) -> ResumeDocument {
    ResumeParser::default().parse(text)
}

/// Extract text from bytes of the declared MIME type, then parse it.
///
/// Only plain text is extracted in-crate; use [`ResumeKit::with_extractor`]
/// for other formats.
pub fn parse_bytes(bytes: &[u8], mime: &str) -> Result<ResumeDocument> {
    let text = ExtractorRegistry::with_defaults().extract(bytes, mime)?;
    Ok(parse_text(&text))
}

/// Read a file, detect its format, extract its text and parse it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ResumeDocument> {
    let text = ExtractorRegistry::with_defaults().extract_file(path)?;
    Ok(parse_text(&text))
}

/// Parse many texts in parallel.
///
/// Each input gets its own document; output order matches input order.
pub fn parse_batch<S: AsRef<str> + Sync>(texts: &[S]) -> Vec<ResumeDocument> {
    let parser = ResumeParser::default();
    texts.par_iter().map(|t| parser.parse(t.as_ref())).collect()
}

/// Parse many texts in parallel and merge their statistics.
pub fn parse_batch_with_stats<S: AsRef<str> + Sync>(
    texts: &[S],
    options: ParseOptions,
) -> (Vec<ResumeDocument>, ParseStats) {
    let parser = ResumeParser::new(options);
    let results: Vec<(ResumeDocument, ParseStats)> = texts
        .par_iter()
        .map(|t| parser.parse_with_stats(t.as_ref()))
        .collect();

    let mut total = ParseStats::new();
    let docs = results
        .into_iter()
        .map(|(doc, stats)| {
            total.merge(&stats);
            doc
        })
        .collect();
    (docs, total)
}

/// The structuring pipeline with its stages configured once.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    normalizer: Normalizer,
    segmenter: Segmenter,
    assembler: Assembler,
    engine: Option<RuleEngine>,
}

impl ResumeParser {
    /// Create a parser from options.
    pub fn new(options: ParseOptions) -> Self {
        let engine = options
            .rewrite_bullets
            .then(|| RuleEngine::new(options.rules.clone()));
        Self {
            normalizer: Normalizer::new(options.normalize.clone()),
            segmenter: Segmenter::new(options.contact_window),
            assembler: Assembler::new(),
            engine,
        }
    }

    /// Normalize and segment text.
    pub fn segment(&self, text: &str) -> Vec<TaggedLine> {
        let lines = self.normalizer.normalize_lines(text);
        self.segmenter.segment_lines(&lines)
    }

    /// Parse text into a document.
    pub fn parse(&self, text: &str) -> ResumeDocument {
        self.parse_with_stats(text).0
    }

    /// Parse text into a document and report what was found.
    pub fn parse_with_stats(&self, text: &str) -> (ResumeDocument, ParseStats) {
        let mut stats = ParseStats::new();

        let lines = self.segment(text);
        stats.add_lines(&lines);

        let mut doc = self.assembler.assemble(&lines);
        stats.add_document(&doc);

        if let Some(engine) = &self.engine {
            stats.add_rewritten(engine.rewrite_document(&mut doc));
        }

        log::debug!(
            "parsed {} lines into {} entries ({} headers, {} bullets, {} rewritten)",
            stats.line_count,
            stats.entry_count,
            stats.header_count,
            stats.bullet_count,
            stats.bullets_rewritten
        );

        (doc, stats)
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Builder for parsing and rendering resumes.
///
/// # Example
///
/// ```
/// use resumekit::{ResumeKit, TemplateDescriptor};
///
/// let markdown = ResumeKit::new()
///     .with_rewrite(true)
///     .with_template(TemplateDescriptor::two_column())
///     .parse_text("Jane Doe\n\nEXPERIENCE\nAcme\n• responsible for billing")
///     .to_markdown();
/// assert!(markdown.contains("- Managed billing"));
/// ```
pub struct ResumeKit {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    template: TemplateDescriptor,
    design: DesignOptions,
    extractors: ExtractorRegistry,
}

impl ResumeKit {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            template: TemplateDescriptor::default(),
            design: DesignOptions::default(),
            extractors: ExtractorRegistry::with_defaults(),
        }
    }

    /// Enable or disable bullet rewriting after assembly.
    pub fn with_rewrite(mut self, enabled: bool) -> Self {
        self.parse_options = self.parse_options.with_rewrite(enabled);
        self
    }

    /// Set the rewrite rules.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.parse_options = self.parse_options.with_rules(rules);
        self
    }

    /// Set normalization options.
    pub fn with_normalize(mut self, options: NormalizeOptions) -> Self {
        self.parse_options = self.parse_options.with_normalize(options);
        self
    }

    /// Set the contact scan window.
    pub fn with_contact_window(mut self, lines: usize) -> Self {
        self.parse_options = self.parse_options.with_contact_window(lines);
        self
    }

    /// Set the template.
    pub fn with_template(mut self, template: TemplateDescriptor) -> Self {
        self.template = template;
        self
    }

    /// Set the design options.
    pub fn with_design(mut self, design: DesignOptions) -> Self {
        self.design = design;
        self
    }

    /// Set the text output options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Register a text extractor for binary formats.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors.register(extractor);
        self
    }

    /// Parse text.
    pub fn parse_text(&self, text: &str) -> ResumeKitResult {
        let (document, stats) = ResumeParser::new(self.parse_options.clone()).parse_with_stats(text);
        self.result(document, stats)
    }

    /// Extract and parse bytes of the declared MIME type.
    pub fn parse_bytes(&self, bytes: &[u8], mime: &str) -> Result<ResumeKitResult> {
        let text = self.extractors.extract(bytes, mime)?;
        Ok(self.parse_text(&text))
    }

    /// Extract and parse a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ResumeKitResult> {
        let text = self.extractors.extract_file(path)?;
        Ok(self.parse_text(&text))
    }

    fn result(&self, document: ResumeDocument, stats: ParseStats) -> ResumeKitResult {
        ResumeKitResult {
            document,
            stats,
            template: self.template.clone(),
            design: self.design.clone(),
            render_options: self.render_options.clone(),
        }
    }
}

impl Default for ResumeKit {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed resume together with the settings to render it.
#[derive(Debug, Clone)]
pub struct ResumeKitResult {
    /// The parsed document
    pub document: ResumeDocument,
    /// Pipeline statistics
    pub stats: ParseStats,
    template: TemplateDescriptor,
    design: DesignOptions,
    render_options: RenderOptions,
}

impl ResumeKitResult {
    /// Lay the document out.
    pub fn render_tree(&self) -> RenderTree {
        render::render(&self.document, &self.template, &self.design)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::MarkdownRenderer::new(self.render_options.clone())
            .render_document(&self.document, &self.template, &self.design)
            .content
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.render_tree(), &self.render_options)
    }

    /// Convert the document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Lint the document's plain text.
    pub fn lint(&self) -> LintReport {
        Analyzer::default().analyze(&self.document.plain_text())
    }

    /// Get the document.
    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    /// Take the document.
    pub fn into_document(self) -> ResumeDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Doe\njane@example.com | (555) 123-4567\n\n\
        EXPERIENCE\nAcme Corp\nSoftware Engineer\nJan 2020 - Present\n\
        • responsible for the billing service\n\nSKILLS\nRust, Go";

    #[test]
    fn test_builder() {
        let kit = ResumeKit::new()
            .with_rewrite(true)
            .with_contact_window(3)
            .with_frontmatter()
            .with_template(TemplateDescriptor::two_column());

        assert!(kit.parse_options.rewrite_bullets);
        assert_eq!(kit.parse_options.contact_window, 3);
        assert!(kit.render_options.include_frontmatter);
        assert_eq!(kit.template.name, "two-column");
    }

    #[test]
    fn test_builder_default() {
        let kit = ResumeKit::default();
        assert!(!kit.parse_options.rewrite_bullets);
        assert!(!kit.render_options.include_frontmatter);
    }

    #[test]
    fn test_parse_text() {
        let doc = parse_text(SAMPLE);
        assert_eq!(doc.contact().name, "Jane Doe");
        assert_eq!(doc.contact().email.as_deref(), Some("jane@example.com"));
        assert_eq!(doc.experience().len(), 1);
        assert_eq!(
            doc.section_order(),
            &[SectionId::Experience, SectionId::Skills]
        );
    }

    #[test]
    fn test_parse_with_rewrite() {
        let result = ResumeKit::new().with_rewrite(true).parse_text(SAMPLE);
        assert_eq!(
            result.document().experience()[0].bullets,
            vec!["Managed the billing service."]
        );
        assert_eq!(result.stats.bullets_rewritten, 1);
        assert_eq!(result.stats.header_count, 2);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_text("   \n\n ");
        assert!(doc.is_empty());
        assert!(doc.experience().is_empty());
    }

    #[test]
    fn test_parse_bytes() {
        let doc = parse_bytes(SAMPLE.as_bytes(), "text/plain; charset=utf-8").unwrap();
        assert_eq!(doc.contact().name, "Jane Doe");

        let err = parse_bytes(b"%PDF-1.7", detect::MIME_PDF).unwrap_err();
        assert_eq!(err.kind(), "unsupported-format");
    }

    #[test]
    fn test_parse_batch_keeps_order() {
        let texts = vec!["Alice Smith\n\nSKILLS\nRust", "Bob Jones\n\nSKILLS\nGo"];
        let docs = parse_batch(&texts);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].contact().name, "Alice Smith");
        assert_eq!(docs[1].contact().name, "Bob Jones");

        let (_, stats) = parse_batch_with_stats(&texts, ParseOptions::default());
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.header_count, 2);
    }

    #[test]
    fn test_result_outputs() {
        let result = ResumeKit::new().parse_text(SAMPLE);
        assert!(result.to_text().starts_with("Jane Doe"));
        assert!(result.to_markdown().starts_with("# Jane Doe"));
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"Acme Corp\""));
        assert!(result.lint().score <= 100);
    }

    #[test]
    fn test_stage_helpers_compose() {
        let normalized = normalize(SAMPLE);
        let lines = segment(&normalized);
        let doc = assemble(&lines);
        assert_eq!(doc, parse_text(SAMPLE));
    }
}
