//! Plain text rendering for render trees.

use super::tree::{ContactBlock, Item, Node, RenderTree};
use super::RenderOptions;

/// Convert a render tree to plain text.
///
/// Regions are written one after another; columns are a print concern.
pub fn to_text(tree: &RenderTree, options: &RenderOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for section in tree.sections() {
        let mut lines: Vec<String> = Vec::new();
        if let Some(title) = &section.title {
            lines.push(if options.uppercase_titles {
                title.to_uppercase()
            } else {
                title.clone()
            });
        }
        for node in &section.nodes {
            render_node(&mut lines, node, options);
        }
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    blocks.join("\n\n").trim().to_string()
}

fn render_node(lines: &mut Vec<String>, node: &Node, options: &RenderOptions) {
    match node {
        Node::Contact(block) => render_contact(lines, block, &options.field_separator),
        Node::Paragraph { text } => lines.push(text.clone()),
        Node::Item(item) => {
            let mut parts: Vec<String> = item_heading(item).into_iter().collect();
            parts.extend(item_details(item));
            if !parts.is_empty() {
                lines.push(parts.join(&options.field_separator));
            }
            for bullet in &item.bullets {
                lines.push(format!("{} {}", options.bullet_marker, bullet));
            }
        }
        Node::SkillGroup { name, skills } => {
            let list = skills.join(", ");
            lines.push(match (name.is_empty(), list.is_empty()) {
                (true, _) => list,
                (false, true) => name.clone(),
                (false, false) => format!("{}: {}", name, list),
            });
        }
    }
}

fn render_contact(lines: &mut Vec<String>, block: &ContactBlock, separator: &str) {
    if let Some(name) = &block.name {
        lines.push(name.clone());
    }
    if !block.fields.is_empty() {
        let values: Vec<&str> = block.fields.iter().map(|f| f.value.as_str()).collect();
        lines.push(values.join(separator));
    }
}

/// Title and subtitle joined as "Title, Subtitle".
pub(crate) fn item_heading(item: &Item) -> Option<String> {
    match (&item.title, &item.subtitle) {
        (Some(title), Some(subtitle)) => Some(format!("{}, {}", title, subtitle)),
        (Some(title), None) => Some(title.clone()),
        (None, Some(subtitle)) => Some(subtitle.clone()),
        (None, None) => None,
    }
}

/// Dates, location, link and meta facts, in that order.
pub(crate) fn item_details(item: &Item) -> Vec<String> {
    item.dates
        .iter()
        .chain(item.location.iter())
        .chain(item.link.iter())
        .chain(item.meta.iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactInfo, Experience, ResumeDocument, SkillCategory};
    use crate::render::{render, DesignOptions, TemplateDescriptor};

    fn tree() -> RenderTree {
        let mut doc = ResumeDocument::new();
        doc.set_contact(ContactInfo::new("Jane Doe").with_email("jane@example.com").with_phone("555-0100"));
        doc.add_experience(
            Experience::new("Acme", "Engineer")
                .with_dates("2019", "2021")
                .with_location("Remote")
                .with_bullet("Built billing."),
        );
        doc.add_skill_category(SkillCategory::new("Languages").with_skill("Rust").with_skill("Go"));
        render(&doc, &TemplateDescriptor::default(), &DesignOptions::default())
    }

    #[test]
    fn test_to_text() {
        let text = to_text(&tree(), &RenderOptions::default());
        assert_eq!(
            text,
            "Jane Doe\njane@example.com | 555-0100\n\n\
             EXPERIENCE\nEngineer, Acme | 2019 - 2021 | Remote\n• Built billing.\n\n\
             SKILLS\nLanguages: Rust, Go"
        );
    }

    #[test]
    fn test_options_apply() {
        let options = RenderOptions::new()
            .with_bullet_marker('-')
            .with_uppercase_titles(false)
            .with_field_separator(" / ");
        let text = to_text(&tree(), &options);
        assert!(text.contains("\nExperience\n"));
        assert!(text.contains("- Built billing."));
        assert!(text.contains("jane@example.com / 555-0100"));
    }
}
