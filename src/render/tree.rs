//! Render tree handed to previews and print backends.

use super::design::DesignOptions;
use super::template::Position;
use crate::model::SectionId;
use serde::{Deserialize, Serialize};

/// A laid-out resume: regions of sections of nodes.
///
/// Regions appear in [`Position::ALL`] order and only when they hold at
/// least one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    /// Template name the tree was laid out with
    pub template: String,

    /// Design options for the backend
    pub design: DesignOptions,

    pub regions: Vec<Region>,
}

impl RenderTree {
    /// Region at the given position.
    pub fn region(&self, position: Position) -> Option<&Region> {
        self.regions.iter().find(|r| r.position == position)
    }

    /// All sections in rendering order.
    pub fn sections(&self) -> impl Iterator<Item = &RenderSection> {
        self.regions.iter().flat_map(|r| r.sections.iter())
    }

    /// Section rendered from the given document section.
    pub fn find(&self, id: SectionId) -> Option<&RenderSection> {
        self.sections()
            .find(|s| s.source == SectionSource::Document(id))
    }

    /// Check if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// One layout region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub position: Position,
    pub sections: Vec<RenderSection>,
}

/// Where a rendered section came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSource {
    /// The contact block
    Contact,
    /// A section of the document
    Document(SectionId),
}

/// A rendered section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    pub source: SectionSource,

    /// Section title; the contact block has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub nodes: Vec<Node>,
}

/// Content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Name and contact fields
    Contact(ContactBlock),
    /// A paragraph of free text
    Paragraph { text: String },
    /// A titled entry
    Item(Item),
    /// A named list of skills
    SkillGroup { name: String, skills: Vec<String> },
}

/// Labelled contact field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactField {
    pub label: String,
    pub value: String,
}

/// Rendered contact block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ContactField>,
}

/// A rendered entry (experience, education, project, certification, or
/// a titled item of an additional section).
///
/// Empty fields are `None` or empty and skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// `"<start> - <end>"` or a single date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Short facts such as "GPA: 3.8"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl Item {
    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.dates.is_none()
            && self.location.is_none()
            && self.link.is_none()
            && self.meta.is_empty()
            && self.bullets.is_empty()
    }
}
