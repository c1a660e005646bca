//! Integration tests for layout and output rendering.

use resumekit::render::{to_markdown, to_text, Node, SectionSource};
use resumekit::{
    parse_text, render, DesignOptions, Error, JsonFormat, Position, RenderOptions, ResumeKit,
    Section, SectionId, SectionLayout, TemplateDescriptor,
};

const RESUME: &str = "\
Jane Doe
jane@example.com | (555) 123-4567

EXPERIENCE
ACME CORP
Senior Engineer
Jan 2020 - Present
• Built billing tools for finance teams.

SKILLS
Languages: Python, Rust
Tools: Docker, Git
Cloud: AWS, GCP

EDUCATION
Bachelor of Science, Tech University (2013-2017)
";

#[test]
fn test_hidden_skills_never_rendered() {
    let doc = parse_text(RESUME);
    assert_eq!(doc.skills().len(), 3);

    let template = TemplateDescriptor::default().hide(Section::Skills);
    let tree = render(&doc, &template, &DesignOptions::default());

    assert!(tree.find(SectionId::Skills).is_none());
    for section in tree.sections() {
        assert!(section
            .nodes
            .iter()
            .all(|n| !matches!(n, Node::SkillGroup { .. })));
    }
    assert!(!to_text(&tree, &RenderOptions::default()).contains("Docker"));
}

#[test]
fn test_hidden_skills_in_sidebar_template() {
    let doc = parse_text(RESUME);
    let template = TemplateDescriptor::two_column().hide(Section::Skills);
    let tree = render(&doc, &template, &DesignOptions::default());

    assert!(tree.find(SectionId::Skills).is_none());
    let sidebar = tree.region(Position::Sidebar).unwrap();
    assert!(sidebar
        .sections
        .iter()
        .all(|s| s.source != SectionSource::Document(SectionId::Skills)));
}

#[test]
fn test_regions_follow_template() {
    let doc = parse_text(RESUME);
    let tree = render(&doc, &TemplateDescriptor::two_column(), &DesignOptions::default());

    let positions: Vec<Position> = tree.regions.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![Position::Header, Position::Sidebar, Position::Main]);

    let main = tree.region(Position::Main).unwrap();
    assert_eq!(
        main.sections[0].source,
        SectionSource::Document(SectionId::Experience)
    );
}

#[test]
fn test_template_from_json() {
    let template: TemplateDescriptor =
        serde_json::from_str(r#"{"name": "minimal", "skills": {"visible": false}}"#).unwrap();
    assert_eq!(template.name, "minimal");
    assert!(!template.layout(Section::Skills).visible);
    assert!(template.layout(Section::Experience).visible);

    let tree = render(&parse_text(RESUME), &template, &DesignOptions::default());
    assert!(tree.find(SectionId::Skills).is_none());
    assert!(tree.find(SectionId::Experience).is_some());
}

#[test]
fn test_section_title_override() {
    let template = TemplateDescriptor::default().with_section(
        Section::Experience,
        SectionLayout::main().with_title("Work History"),
    );
    let tree = render(&parse_text(RESUME), &template, &DesignOptions::default());
    let section = tree.find(SectionId::Experience).unwrap();
    assert_eq!(section.title.as_deref(), Some("Work History"));
}

#[test]
fn test_design_validation() {
    let design: DesignOptions = serde_json::from_str(r##"{"primary_color": "#333"}"##).unwrap();
    assert!(design.validate().is_ok());
    assert_eq!(design.font_family, "Helvetica");

    let bad: DesignOptions = serde_json::from_str(r#"{"primary_color": "blue"}"#).unwrap();
    assert!(matches!(bad.validate(), Err(Error::InvalidOption(_))));

    let tree = render(&parse_text(RESUME), &TemplateDescriptor::default(), &design);
    assert_eq!(tree.design, design);
}

#[test]
fn test_render_leaves_document_untouched() {
    let doc = parse_text(RESUME);
    let before = doc.clone();
    let _ = render(&doc, &TemplateDescriptor::two_column(), &DesignOptions::compact());
    assert_eq!(doc, before);
}

#[test]
fn test_output_formats() {
    let doc = parse_text(RESUME);
    let tree = render(&doc, &TemplateDescriptor::default(), &DesignOptions::default());

    let text = to_text(&tree, &RenderOptions::default());
    assert!(text.starts_with("Jane Doe\n"));
    assert!(text.contains("• Built billing tools for finance teams."));
    assert!(text.contains("Jan 2020 - Present"));

    let markdown = to_markdown(&tree, &RenderOptions::default());
    assert!(markdown.starts_with("# Jane Doe"));
    assert!(markdown.contains("- Built billing tools for finance teams."));
    assert!(!markdown.contains("null"));

    let json = resumekit::render::to_json(&tree, JsonFormat::Compact).unwrap();
    assert!(json.contains("\"type\":\"skill_group\""));
    assert!(!json.contains("null"));
}

#[test]
fn test_kit_frontmatter() {
    let result = ResumeKit::new()
        .with_frontmatter()
        .with_template(TemplateDescriptor::two_column())
        .parse_text(RESUME);

    let markdown = result.to_markdown();
    assert!(markdown.starts_with("---\n"));
    assert!(markdown.contains("name: \"Jane Doe\"") || markdown.contains("name: Jane Doe"));
    assert_eq!(result.render_tree().template, "two-column");
}
