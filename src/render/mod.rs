//! Layout and output rendering for structured resumes.
//!
//! [`render`] lays a [`ResumeDocument`](crate::model::ResumeDocument) out
//! into a [`RenderTree`] following a [`TemplateDescriptor`] and
//! [`DesignOptions`]. The tree can then be turned into text, Markdown or
//! JSON, or handed to a print backend.

mod design;
mod json;
mod layout;
mod markdown;
mod options;
mod result;
mod template;
mod text;
mod tree;

pub use design::{DesignOptions, FontSizes, Margins};
pub use json::{to_json, JsonFormat};
pub use layout::render;
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{ParseStats, RenderResult};
pub use template::{Position, SectionLayout, TemplateDescriptor};
pub use text::to_text;
pub use tree::{ContactBlock, ContactField, Item, Node, Region, RenderSection, RenderTree, SectionSource};
