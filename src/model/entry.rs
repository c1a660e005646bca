//! Section entry types.

use serde::{Deserialize, Serialize};

/// Literal end date for ongoing entries.
pub const PRESENT: &str = "Present";

/// Format a date range as `"<start> - <end>"`.
///
/// A missing side collapses to the other one; `None` when both are empty.
pub fn format_date_range(start: &str, end: &str) -> Option<String> {
    match (start.trim(), end.trim()) {
        ("", "") => None,
        (start, "") => Some(start.to_string()),
        ("", end) => Some(end.to_string()),
        (start, end) => Some(format!("{} - {}", start, end)),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A work experience entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Employer
    pub company: String,

    /// Job title
    pub title: String,

    /// Start date as written in the source
    pub start_date: String,

    /// End date as written in the source, or `"Present"`
    pub end_date: String,

    /// Location
    pub location: Option<String>,

    /// Bullet items in source order
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Experience {
    /// Create a new experience entry.
    pub fn new(company: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the date range.
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Append a bullet.
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullets.push(bullet.into());
        self
    }

    /// Formatted date range.
    pub fn date_range(&self) -> Option<String> {
        format_date_range(&self.start_date, &self.end_date)
    }

    /// Location, if present and non-blank.
    pub fn location(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    pub(crate) fn has_dates(&self) -> bool {
        !self.start_date.is_empty() || !self.end_date.is_empty()
    }
}

/// An education entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// School or university
    pub institution: String,

    /// Degree (e.g. "Bachelor of Science")
    pub degree: String,

    /// Field of study
    pub field: String,

    /// Start date as written in the source
    pub start_date: String,

    /// End date as written in the source, or `"Present"`
    pub end_date: String,

    /// Location
    pub location: Option<String>,

    /// Grade point average
    pub gpa: Option<String>,

    /// Honors, coursework and other free lines, in source order
    #[serde(default)]
    pub details: Vec<String>,
}

impl Education {
    /// Create a new education entry.
    pub fn new(institution: impl Into<String>, degree: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            degree: degree.into(),
            ..Default::default()
        }
    }

    /// Set the field of study.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set the date range.
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Set the grade point average.
    pub fn with_gpa(mut self, gpa: impl Into<String>) -> Self {
        self.gpa = Some(gpa.into());
        self
    }

    /// Append a detail line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Formatted date range.
    pub fn date_range(&self) -> Option<String> {
        format_date_range(&self.start_date, &self.end_date)
    }

    /// Location, if present and non-blank.
    pub fn location(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    /// GPA, if present and non-blank.
    pub fn gpa(&self) -> Option<&str> {
        non_empty(&self.gpa)
    }

    /// Degree and field joined as "Degree in Field".
    pub fn qualification(&self) -> Option<String> {
        match (self.degree.trim(), self.field.trim()) {
            ("", "") => None,
            (degree, "") => Some(degree.to_string()),
            ("", field) => Some(field.to_string()),
            (degree, field) => Some(format!("{} in {}", degree, field)),
        }
    }

    pub(crate) fn has_dates(&self) -> bool {
        !self.start_date.is_empty() || !self.end_date.is_empty()
    }
}

/// A named group of skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    /// Category name
    pub name: String,

    /// Skills in source order, duplicates preserved
    #[serde(default)]
    pub skills: Vec<String>,
}

impl SkillCategory {
    /// Create a new category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skills: Vec::new(),
        }
    }

    /// Append a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }
}

/// A project entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,

    /// Short description
    pub description: Option<String>,

    /// Start date
    pub start_date: Option<String>,

    /// End date
    pub end_date: Option<String>,

    /// Project URL
    pub url: Option<String>,

    /// Bullet items in source order
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl Project {
    /// Create a new project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Formatted date range.
    pub fn date_range(&self) -> Option<String> {
        format_date_range(
            self.start_date.as_deref().unwrap_or(""),
            self.end_date.as_deref().unwrap_or(""),
        )
    }

    /// Description, if present and non-blank.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    /// URL, if present and non-blank.
    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }

    pub(crate) fn has_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// A certification entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// Certification name
    pub name: String,

    /// Issuing organization
    pub issuer: Option<String>,

    /// Date obtained
    pub date: Option<String>,

    /// Verification URL
    pub url: Option<String>,
}

impl Certification {
    /// Create a new certification.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Issuer, if present and non-blank.
    pub fn issuer(&self) -> Option<&str> {
        non_empty(&self.issuer)
    }

    /// Date, if present and non-blank.
    pub fn date(&self) -> Option<&str> {
        non_empty(&self.date)
    }

    /// URL, if present and non-blank.
    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }
}

/// A titled sub-item of an additional section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalItem {
    /// Item title (may be empty for bullets preceding any title)
    pub title: String,

    /// Bullet items in source order
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl AdditionalItem {
    /// Create a new item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
        }
    }
}

/// Body of an additional section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AdditionalBody {
    /// Flat joined content text
    Content(String),
    /// Titled sub-items with bullets
    Items(Vec<AdditionalItem>),
}

impl Default for AdditionalBody {
    fn default() -> Self {
        AdditionalBody::Content(String::new())
    }
}

/// A section whose header is not one of the canonical sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalSection {
    /// Literal header text
    pub title: String,

    /// Section body
    pub body: AdditionalBody,
}

impl AdditionalSection {
    /// Create a section with flat content.
    pub fn with_content(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: AdditionalBody::Content(content.into()),
        }
    }

    /// Create a section with titled items.
    pub fn with_items(title: impl Into<String>, items: Vec<AdditionalItem>) -> Self {
        Self {
            title: title.into(),
            body: AdditionalBody::Items(items),
        }
    }

    /// Check if the section carries no content.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            AdditionalBody::Content(text) => text.trim().is_empty(),
            AdditionalBody::Items(items) => items
                .iter()
                .all(|i| i.title.trim().is_empty() && i.bullets.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range("Jan 2020", PRESENT),
            Some("Jan 2020 - Present".to_string())
        );
        assert_eq!(format_date_range("2019", ""), Some("2019".to_string()));
        assert_eq!(format_date_range("", "2021"), Some("2021".to_string()));
        assert_eq!(format_date_range(" ", ""), None);
    }

    #[test]
    fn test_experience_builder() {
        let exp = Experience::new("Acme", "Engineer")
            .with_dates("2019", "2021")
            .with_bullet("Built things");
        assert_eq!(exp.date_range().as_deref(), Some("2019 - 2021"));
        assert_eq!(exp.bullets.len(), 1);
        assert!(exp.location().is_none());
    }

    #[test]
    fn test_experience_bullets_default_to_empty() {
        let exp: Experience =
            serde_json::from_str(r#"{"company":"A","title":"B","start_date":"","end_date":"","location":null}"#)
                .unwrap();
        assert!(exp.bullets.is_empty());
    }

    #[test]
    fn test_education_qualification() {
        let edu = Education::new("Tech University", "Bachelor of Science").with_field("Physics");
        assert_eq!(
            edu.qualification().as_deref(),
            Some("Bachelor of Science in Physics")
        );
        assert_eq!(Education::default().qualification(), None);
    }

    #[test]
    fn test_additional_section_is_empty() {
        assert!(AdditionalSection::with_content("AWARDS", " ").is_empty());
        assert!(!AdditionalSection::with_items(
            "VOLUNTEER",
            vec![AdditionalItem::new("Food bank")]
        )
        .is_empty());
    }
}
