//! Document model types for structured resume content.
//!
//! This module defines the typed representation that bridges the
//! structuring pipeline (normalize, segment, assemble) and rendering.
//! Everything downstream consumes a [`ResumeDocument`]; the
//! [`TaggedLine`] sequence is the intermediate form between segmentation
//! and assembly.

mod document;
mod entry;
mod line;

pub use document::{ContactInfo, ResumeDocument, SectionId};
pub use entry::{
    format_date_range, AdditionalBody, AdditionalItem, AdditionalSection, Certification,
    Education, Experience, Project, SkillCategory, PRESENT,
};
pub use line::{LineKind, Section, SectionKey, TaggedLine};
