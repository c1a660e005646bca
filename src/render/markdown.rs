//! Markdown rendering for render trees.

use crate::model::ResumeDocument;

use super::layout::render;
use super::text::{item_details, item_heading};
use super::tree::{Node, RenderSection, RenderTree, SectionSource};
use super::{DesignOptions, ParseStats, RenderOptions, RenderResult, TemplateDescriptor};

/// Convert a render tree to Markdown.
pub fn to_markdown(tree: &RenderTree, options: &RenderOptions) -> String {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(tree)
}

/// Lay out a document and convert it to Markdown with statistics.
pub fn to_markdown_with_stats(
    doc: &ResumeDocument,
    template: &TemplateDescriptor,
    design: &DesignOptions,
    options: &RenderOptions,
) -> RenderResult {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_document(doc, template, design)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ParseStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ParseStats::new(),
        }
    }

    /// Render a tree to Markdown.
    pub fn render(mut self, tree: &RenderTree) -> String {
        self.render_internal(tree)
    }

    /// Lay out and render a document, with frontmatter when enabled.
    pub fn render_document(
        mut self,
        doc: &ResumeDocument,
        template: &TemplateDescriptor,
        design: &DesignOptions,
    ) -> RenderResult {
        let tree = render(doc, template, design);
        let mut content = String::new();

        if self.options.include_frontmatter {
            content.push_str(&doc.contact().to_yaml_frontmatter());
        }
        content.push_str(&self.render_internal(&tree));

        if self.options.collect_stats {
            self.stats.document_count += 1;
            self.stats.count_text(&content);
        }

        RenderResult::new(content, doc.contact().clone(), self.stats)
    }

    fn render_internal(&mut self, tree: &RenderTree) -> String {
        let mut output = String::new();
        for section in tree.sections() {
            self.render_section(&mut output, section);
        }
        output.trim().to_string()
    }

    fn render_section(&mut self, output: &mut String, section: &RenderSection) {
        let level = self.options.section_heading_level.clamp(2, 6) as usize;
        if let Some(title) = &section.title {
            if self.options.collect_stats {
                self.stats.header_count += 1;
            }
            output.push_str(&"#".repeat(level));
            output.push(' ');
            output.push_str(&self.escape(title));
            output.push_str("\n\n");
        }

        for node in &section.nodes {
            match node {
                Node::Contact(block) => {
                    if let Some(name) = &block.name {
                        output.push_str(&"#".repeat(level - 1));
                        output.push(' ');
                        output.push_str(&self.escape(name));
                        output.push_str("\n\n");
                    }
                    if !block.fields.is_empty() {
                        let values: Vec<String> = block
                            .fields
                            .iter()
                            .map(|f| self.escape(&f.value))
                            .collect();
                        output.push_str(&values.join(" · "));
                        output.push_str("\n\n");
                    }
                }
                Node::Paragraph { text } => {
                    output.push_str(&self.escape(text));
                    output.push_str("\n\n");
                }
                Node::Item(item) => {
                    if self.options.collect_stats {
                        self.stats.entry_count += 1;
                    }
                    if let Some(heading) = item_heading(item) {
                        output.push_str(&"#".repeat((level + 1).min(6)));
                        output.push(' ');
                        output.push_str(&self.escape(&heading));
                        output.push('\n');
                    }
                    let details = item_details(item);
                    if !details.is_empty() {
                        let escaped: Vec<String> = details.iter().map(|d| self.escape(d)).collect();
                        output.push('\n');
                        output.push_str(&format!("*{}*", escaped.join(" · ")));
                        output.push('\n');
                    }
                    if !item.bullets.is_empty() {
                        output.push('\n');
                        for bullet in &item.bullets {
                            if self.options.collect_stats {
                                self.stats.bullet_count += 1;
                            }
                            output.push(self.options.list_marker);
                            output.push(' ');
                            output.push_str(&self.escape(bullet));
                            output.push('\n');
                        }
                    }
                    output.push('\n');
                }
                Node::SkillGroup { name, skills } => {
                    output.push(self.options.list_marker);
                    output.push(' ');
                    let list: Vec<String> = skills.iter().map(|s| self.escape(s)).collect();
                    if name.is_empty() {
                        output.push_str(&list.join(", "));
                    } else {
                        output.push_str(&format!("**{}:** {}", self.escape(name), list.join(", ")));
                    }
                    output.push('\n');
                }
            }
        }

        if section.source != SectionSource::Contact && !output.ends_with("\n\n") {
            output.push('\n');
        }
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactInfo, Experience, Project, SkillCategory};

    fn sample() -> ResumeDocument {
        let mut doc = ResumeDocument::new();
        doc.set_contact(ContactInfo::new("Jane Doe").with_email("jane@example.com"));
        doc.set_summary("Engineer who ships.");
        doc.add_experience(
            Experience::new("Acme", "Engineer")
                .with_dates("2019", "Present")
                .with_bullet("Cut latency by 40%"),
        );
        doc.add_skill_category(SkillCategory::new("Languages").with_skill("Rust"));
        doc
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a*b_c"), "a\\*b\\_c");
        assert_eq!(escape_markdown("C# | .NET"), "C# \\| .NET");
    }

    #[test]
    fn test_render_document() {
        let tree = render(&sample(), &TemplateDescriptor::default(), &DesignOptions::default());
        let md = to_markdown(&tree, &RenderOptions::default());

        assert!(md.starts_with("# Jane Doe\n\njane@example.com\n\n## Summary"));
        assert!(md.contains("### Engineer, Acme\n\n*2019 - Present*\n\n- Cut latency by 40%\n"));
        assert!(md.contains("- **Languages:** Rust"));
    }

    #[test]
    fn test_render_with_frontmatter_and_stats() {
        let options = RenderOptions::new().with_frontmatter(true);
        let result = to_markdown_with_stats(
            &sample(),
            &TemplateDescriptor::default(),
            &DesignOptions::default(),
            &options,
        );

        assert!(result.content.starts_with("---\nname: \"Jane Doe\""));
        assert_eq!(result.contact.name, "Jane Doe");
        assert_eq!(result.stats.document_count, 1);
        assert_eq!(result.stats.entry_count, 1);
        assert_eq!(result.stats.bullet_count, 1);
        assert!(result.stats.word_count > 0);
    }

    #[test]
    fn test_project_link() {
        let mut doc = ResumeDocument::new();
        let mut project = Project::new("resumekit");
        project.url = Some("https://example.com/rk".into());
        doc.add_project(project);
        let tree = render(&doc, &TemplateDescriptor::default(), &DesignOptions::default());
        let md = to_markdown(&tree, &RenderOptions::new().with_escaping(false));
        assert!(md.contains("### resumekit\n\n*https://example.com/rk*"));
    }
}
