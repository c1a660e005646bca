//! Template descriptors: which sections are shown and where.

use crate::model::{Section, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout region a section is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Top band above the columns
    Header,
    /// Narrow side column
    Sidebar,
    /// Main column
    #[default]
    Main,
}

impl Position {
    /// All positions in rendering order.
    pub const ALL: [Position; 3] = [Position::Header, Position::Sidebar, Position::Main];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Header => "header",
            Position::Sidebar => "sidebar",
            Position::Main => "main",
        }
    }
}

/// Visibility and placement of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// Whether the section is rendered at all
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Region the section goes to
    #[serde(default)]
    pub position: Position,

    /// Title shown instead of the default one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self::main()
    }
}

impl SectionLayout {
    /// Visible in the main column.
    pub fn main() -> Self {
        Self::at(Position::Main)
    }

    /// Visible in the sidebar.
    pub fn sidebar() -> Self {
        Self::at(Position::Sidebar)
    }

    /// Visible in the header band.
    pub fn header() -> Self {
        Self::at(Position::Header)
    }

    /// Visible at the given position.
    pub fn at(position: Position) -> Self {
        Self {
            visible: true,
            position,
            title: None,
        }
    }

    /// Not rendered.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::main()
        }
    }

    /// Override the section title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Per-section visibility and placement.
///
/// Additional sections use `additional` unless `custom` holds an entry for
/// their title (matched case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDescriptor {
    /// Template name, informational
    pub name: String,
    pub contact: SectionLayout,
    pub summary: SectionLayout,
    pub experience: SectionLayout,
    pub education: SectionLayout,
    pub skills: SectionLayout,
    pub projects: SectionLayout,
    pub certifications: SectionLayout,

    /// Layout for additional sections without a `custom` entry
    pub additional: SectionLayout,

    /// Layouts for additional sections, keyed by title
    pub custom: BTreeMap<String, SectionLayout>,
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self::single_column()
    }
}

impl TemplateDescriptor {
    /// Everything in one column below a header band holding the contact block.
    pub fn single_column() -> Self {
        Self {
            name: "single-column".to_string(),
            contact: SectionLayout::header(),
            summary: SectionLayout::main(),
            experience: SectionLayout::main(),
            education: SectionLayout::main(),
            skills: SectionLayout::main(),
            projects: SectionLayout::main(),
            certifications: SectionLayout::main(),
            additional: SectionLayout::main(),
            custom: BTreeMap::new(),
        }
    }

    /// Skills, education and certifications moved to a sidebar.
    pub fn two_column() -> Self {
        Self {
            name: "two-column".to_string(),
            education: SectionLayout::sidebar(),
            skills: SectionLayout::sidebar(),
            certifications: SectionLayout::sidebar(),
            additional: SectionLayout::sidebar(),
            ..Self::single_column()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "single-column" | "single" | "classic" => Some(Self::single_column()),
            "two-column" | "two" | "sidebar" => Some(Self::two_column()),
            _ => None,
        }
    }

    /// Set the template name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the layout of a canonical section.
    pub fn with_section(mut self, section: Section, layout: SectionLayout) -> Self {
        *self.layout_mut(section) = layout;
        self
    }

    /// Hide a canonical section.
    pub fn hide(mut self, section: Section) -> Self {
        self.layout_mut(section).visible = false;
        self
    }

    /// Move a canonical section to another region.
    pub fn with_position(mut self, section: Section, position: Position) -> Self {
        self.layout_mut(section).position = position;
        self
    }

    /// Replace the contact block layout.
    pub fn with_contact(mut self, layout: SectionLayout) -> Self {
        self.contact = layout;
        self
    }

    /// Set the layout of the additional section with the given title.
    pub fn with_custom(mut self, title: impl Into<String>, layout: SectionLayout) -> Self {
        self.custom.insert(title.into(), layout);
        self
    }

    /// Layout of a canonical section.
    pub fn layout(&self, section: Section) -> &SectionLayout {
        match section {
            Section::Summary => &self.summary,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Skills => &self.skills,
            Section::Projects => &self.projects,
            Section::Certifications => &self.certifications,
        }
    }

    fn layout_mut(&mut self, section: Section) -> &mut SectionLayout {
        match section {
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Skills => &mut self.skills,
            Section::Projects => &mut self.projects,
            Section::Certifications => &mut self.certifications,
        }
    }

    /// Layout of an additional section.
    pub fn additional_layout(&self, title: &str) -> &SectionLayout {
        let title = title.trim();
        self.custom
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(title))
            .map(|(_, layout)| layout)
            .unwrap_or(&self.additional)
    }

    /// Layout of a document section; `title` is used for additional sections.
    pub fn layout_for(&self, id: SectionId, title: &str) -> &SectionLayout {
        match id.section() {
            Some(section) => self.layout(section),
            None => self.additional_layout(title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_defaults() {
        let template = TemplateDescriptor::default();
        assert_eq!(template.contact.position, Position::Header);
        for section in Section::ALL {
            let layout = template.layout(section);
            assert!(layout.visible);
            assert_eq!(layout.position, Position::Main);
        }
    }

    #[test]
    fn test_two_column_preset() {
        let template = TemplateDescriptor::preset("two_column").unwrap();
        assert_eq!(template.skills.position, Position::Sidebar);
        assert_eq!(template.experience.position, Position::Main);
        assert!(TemplateDescriptor::preset("glossy").is_none());
    }

    #[test]
    fn test_builders() {
        let template = TemplateDescriptor::single_column()
            .hide(Section::Skills)
            .with_position(Section::Projects, Position::Sidebar)
            .with_custom("Awards", SectionLayout::hidden());

        assert!(!template.skills.visible);
        assert_eq!(template.projects.position, Position::Sidebar);
        assert!(!template.additional_layout("AWARDS").visible);
        assert!(template.additional_layout("Languages").visible);
    }

    #[test]
    fn test_deserialize_partial() {
        let template: TemplateDescriptor =
            serde_json::from_str(r#"{"skills": {"visible": false}, "education": {"position": "sidebar"}}"#)
                .unwrap();
        assert!(!template.skills.visible);
        assert_eq!(template.education.position, Position::Sidebar);
        assert!(template.education.visible);
        assert_eq!(template.contact.position, Position::Header);
    }
}
