//! Document-level types.

use super::entry::{
    AdditionalBody, AdditionalSection, Certification, Education, Experience, Project,
    SkillCategory,
};
use super::line::Section;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifies one section of a [`ResumeDocument`] in its stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum SectionId {
    /// Summary text
    Summary,
    /// Experience entries
    Experience,
    /// Education entries
    Education,
    /// Skill categories
    Skills,
    /// Projects
    Projects,
    /// Certifications
    Certifications,
    /// An additional section, by index into `additional_sections`
    Additional(usize),
}

impl SectionId {
    /// Identifier of a canonical section.
    pub fn from_section(section: Section) -> Self {
        match section {
            Section::Summary => SectionId::Summary,
            Section::Experience => SectionId::Experience,
            Section::Education => SectionId::Education,
            Section::Skills => SectionId::Skills,
            Section::Projects => SectionId::Projects,
            Section::Certifications => SectionId::Certifications,
        }
    }

    /// The canonical section, if this is not an additional section.
    pub fn section(&self) -> Option<Section> {
        match self {
            SectionId::Summary => Some(Section::Summary),
            SectionId::Experience => Some(Section::Experience),
            SectionId::Education => Some(Section::Education),
            SectionId::Skills => Some(Section::Skills),
            SectionId::Projects => Some(Section::Projects),
            SectionId::Certifications => Some(Section::Certifications),
            SectionId::Additional(_) => None,
        }
    }
}

/// Contact details of the resume owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Full name
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// "City, ST" or "City, Country"
    pub location: Option<String>,

    /// LinkedIn profile URL
    pub linkedin: Option<String>,

    /// GitHub profile URL
    pub github: Option<String>,

    /// Portfolio or personal site URL
    pub portfolio: Option<String>,

    /// Contact block fragments that matched no known pattern
    #[serde(default)]
    pub other: Vec<String>,
}

impl ContactInfo {
    /// Create contact info with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the LinkedIn URL.
    pub fn with_linkedin(mut self, url: impl Into<String>) -> Self {
        self.linkedin = Some(url.into());
        self
    }

    /// Set the GitHub URL.
    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.github = Some(url.into());
        self
    }

    /// Set the portfolio URL.
    pub fn with_portfolio(mut self, url: impl Into<String>) -> Self {
        self.portfolio = Some(url.into());
        self
    }

    /// Labelled non-empty contact fields, name excluded, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        let candidates = [
            ("email", &self.email),
            ("phone", &self.phone),
            ("location", &self.location),
            ("linkedin", &self.linkedin),
            ("github", &self.github),
            ("portfolio", &self.portfolio),
        ];
        for (label, value) in candidates {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                fields.push((label, value));
            }
        }
        for other in &self.other {
            if !other.trim().is_empty() {
                fields.push(("other", other.trim()));
            }
        }
        fields
    }

    /// Check if no contact field, including the name, is set.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.fields().is_empty()
    }

    /// Convert contact info to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if !self.name.trim().is_empty() {
            lines.push(format!("name: \"{}\"", escape_yaml(&self.name)));
        }
        for (label, value) in self.fields() {
            if label != "other" {
                lines.push(format!("{}: \"{}\"", label, escape_yaml(value)));
            }
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// A structured resume.
///
/// Created once per parse and then edited through the typed update
/// operations below. `section_order` records the order in which sections
/// first appeared in the source, and rendering follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub(crate) contact: ContactInfo,
    pub(crate) summary: String,
    pub(crate) experience: Vec<Experience>,
    pub(crate) education: Vec<Education>,
    pub(crate) skills: Vec<SkillCategory>,
    pub(crate) projects: Vec<Project>,
    pub(crate) certifications: Vec<Certification>,
    pub(crate) additional_sections: Vec<AdditionalSection>,
    pub(crate) section_order: Vec<SectionId>,
}

impl ResumeDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contact information.
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Summary text, possibly empty.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Experience entries in source order.
    pub fn experience(&self) -> &[Experience] {
        &self.experience
    }

    /// Education entries in source order.
    pub fn education(&self) -> &[Education] {
        &self.education
    }

    /// Skill categories in source order.
    pub fn skills(&self) -> &[SkillCategory] {
        &self.skills
    }

    /// Projects in source order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Certifications in source order.
    pub fn certifications(&self) -> &[Certification] {
        &self.certifications
    }

    /// Sections with headers outside the canonical vocabulary.
    pub fn additional_sections(&self) -> &[AdditionalSection] {
        &self.additional_sections
    }

    /// Sections in first-occurrence order.
    pub fn section_order(&self) -> &[SectionId] {
        &self.section_order
    }

    /// Check if the given section is part of the stored order.
    pub fn has_section(&self, id: SectionId) -> bool {
        self.section_order.contains(&id)
    }

    /// Record a section in the stored order unless it is already there.
    pub(crate) fn note_section(&mut self, id: SectionId) {
        if !self.section_order.contains(&id) {
            self.section_order.push(id);
        }
    }

    fn forget_section_if_empty(&mut self, id: SectionId) {
        let empty = match id {
            SectionId::Summary => self.summary.trim().is_empty(),
            SectionId::Experience => self.experience.is_empty(),
            SectionId::Education => self.education.is_empty(),
            SectionId::Skills => self.skills.is_empty(),
            SectionId::Projects => self.projects.is_empty(),
            SectionId::Certifications => self.certifications.is_empty(),
            SectionId::Additional(_) => false,
        };
        if empty {
            self.section_order.retain(|s| *s != id);
        }
    }

    // ==================== Contact & summary ====================

    /// Replace the contact information.
    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }

    /// Replace the summary. An empty summary drops it from the section order.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
        if self.summary.trim().is_empty() {
            self.forget_section_if_empty(SectionId::Summary);
        } else {
            self.note_section(SectionId::Summary);
        }
    }

    // ==================== Experience ====================

    /// Append an experience entry.
    pub fn add_experience(&mut self, entry: Experience) {
        self.experience.push(entry);
        self.note_section(SectionId::Experience);
    }

    /// Replace the experience entry at `index`.
    pub fn update_experience(&mut self, index: usize, entry: Experience) -> Result<()> {
        replace_at(&mut self.experience, "experience", index, entry)
    }

    /// Remove and return the experience entry at `index`.
    pub fn remove_experience(&mut self, index: usize) -> Result<Experience> {
        let removed = remove_at(&mut self.experience, "experience", index)?;
        self.forget_section_if_empty(SectionId::Experience);
        Ok(removed)
    }

    // ==================== Education ====================

    /// Append an education entry.
    pub fn add_education(&mut self, entry: Education) {
        self.education.push(entry);
        self.note_section(SectionId::Education);
    }

    /// Replace the education entry at `index`.
    pub fn update_education(&mut self, index: usize, entry: Education) -> Result<()> {
        replace_at(&mut self.education, "education", index, entry)
    }

    /// Remove and return the education entry at `index`.
    pub fn remove_education(&mut self, index: usize) -> Result<Education> {
        let removed = remove_at(&mut self.education, "education", index)?;
        self.forget_section_if_empty(SectionId::Education);
        Ok(removed)
    }

    // ==================== Skills ====================

    /// Append a skill category.
    pub fn add_skill_category(&mut self, category: SkillCategory) {
        self.skills.push(category);
        self.note_section(SectionId::Skills);
    }

    /// Replace the skill category at `index`.
    pub fn update_skill_category(&mut self, index: usize, category: SkillCategory) -> Result<()> {
        replace_at(&mut self.skills, "skills", index, category)
    }

    /// Remove and return the skill category at `index`.
    pub fn remove_skill_category(&mut self, index: usize) -> Result<SkillCategory> {
        let removed = remove_at(&mut self.skills, "skills", index)?;
        self.forget_section_if_empty(SectionId::Skills);
        Ok(removed)
    }

    // ==================== Projects ====================

    /// Append a project.
    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
        self.note_section(SectionId::Projects);
    }

    /// Replace the project at `index`.
    pub fn update_project(&mut self, index: usize, project: Project) -> Result<()> {
        replace_at(&mut self.projects, "projects", index, project)
    }

    /// Remove and return the project at `index`.
    pub fn remove_project(&mut self, index: usize) -> Result<Project> {
        let removed = remove_at(&mut self.projects, "projects", index)?;
        self.forget_section_if_empty(SectionId::Projects);
        Ok(removed)
    }

    // ==================== Certifications ====================

    /// Append a certification.
    pub fn add_certification(&mut self, certification: Certification) {
        self.certifications.push(certification);
        self.note_section(SectionId::Certifications);
    }

    /// Replace the certification at `index`.
    pub fn update_certification(
        &mut self,
        index: usize,
        certification: Certification,
    ) -> Result<()> {
        replace_at(&mut self.certifications, "certifications", index, certification)
    }

    /// Remove and return the certification at `index`.
    pub fn remove_certification(&mut self, index: usize) -> Result<Certification> {
        let removed = remove_at(&mut self.certifications, "certifications", index)?;
        self.forget_section_if_empty(SectionId::Certifications);
        Ok(removed)
    }

    // ==================== Additional sections ====================

    /// Append an additional section and return its index.
    pub fn add_additional_section(&mut self, section: AdditionalSection) -> usize {
        let index = self.additional_sections.len();
        self.additional_sections.push(section);
        self.section_order.push(SectionId::Additional(index));
        index
    }

    /// Replace the additional section at `index`.
    pub fn update_additional_section(
        &mut self,
        index: usize,
        section: AdditionalSection,
    ) -> Result<()> {
        replace_at(&mut self.additional_sections, "additional sections", index, section)
    }

    /// Remove and return the additional section at `index`.
    ///
    /// Later additional sections shift down by one, in the section order too.
    pub fn remove_additional_section(&mut self, index: usize) -> Result<AdditionalSection> {
        let removed = remove_at(&mut self.additional_sections, "additional sections", index)?;
        self.section_order.retain(|s| *s != SectionId::Additional(index));
        for id in &mut self.section_order {
            if let SectionId::Additional(i) = id {
                if *i > index {
                    *i -= 1;
                }
            }
        }
        Ok(removed)
    }

    // ==================== Bulk operations ====================

    /// Apply `f` to the summary and to every bullet in the document.
    ///
    /// Returns the number of strings `f` changed.
    pub fn map_bullets<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&str) -> String,
    {
        let mut changed = 0;
        let mut apply = |text: &mut String| {
            let next = f(text);
            if next != *text {
                *text = next;
                changed += 1;
            }
        };

        if !self.summary.is_empty() {
            apply(&mut self.summary);
        }
        for exp in &mut self.experience {
            exp.bullets.iter_mut().for_each(&mut apply);
        }
        for project in &mut self.projects {
            project.bullets.iter_mut().for_each(&mut apply);
        }
        for section in &mut self.additional_sections {
            if let AdditionalBody::Items(items) = &mut section.body {
                for item in items {
                    item.bullets.iter_mut().for_each(&mut apply);
                }
            }
        }
        changed
    }

    /// Number of entries across all entry collections.
    pub fn entry_count(&self) -> usize {
        self.experience.len()
            + self.education.len()
            + self.projects.len()
            + self.certifications.len()
    }

    /// Number of bullets across the document.
    pub fn bullet_count(&self) -> usize {
        let items: usize = self
            .additional_sections
            .iter()
            .map(|s| match &s.body {
                AdditionalBody::Items(items) => items.iter().map(|i| i.bullets.len()).sum(),
                AdditionalBody::Content(_) => 0,
            })
            .sum();
        self.experience.iter().map(|e| e.bullets.len()).sum::<usize>()
            + self.projects.iter().map(|p| p.bullets.len()).sum::<usize>()
            + items
    }

    /// Check if the document holds nothing beyond an empty contact block.
    pub fn is_empty(&self) -> bool {
        self.contact.is_empty()
            && self.summary.trim().is_empty()
            && self.entry_count() == 0
            && self.skills.is_empty()
            && self.additional_sections.is_empty()
    }

    /// Get plain text content of the entire document.
    ///
    /// Every stored string appears once, one per line, in section order.
    pub fn plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut push = |s: &str| {
            if !s.trim().is_empty() {
                lines.push(s.to_string());
            }
        };

        push(&self.contact.name);
        for (_, value) in self.contact.fields() {
            push(value);
        }

        for id in &self.section_order {
            match *id {
                SectionId::Summary => push(&self.summary),
                SectionId::Experience => {
                    for exp in &self.experience {
                        push(&exp.title);
                        push(&exp.company);
                        push(exp.date_range().as_deref().unwrap_or(""));
                        push(exp.location().unwrap_or(""));
                        exp.bullets.iter().for_each(|b| push(b));
                    }
                }
                SectionId::Education => {
                    for edu in &self.education {
                        push(&edu.degree);
                        push(&edu.field);
                        push(&edu.institution);
                        push(edu.date_range().as_deref().unwrap_or(""));
                        push(edu.location().unwrap_or(""));
                        push(edu.gpa().unwrap_or(""));
                        edu.details.iter().for_each(|d| push(d));
                    }
                }
                SectionId::Skills => {
                    for category in &self.skills {
                        push(&category.name);
                        push(&category.skills.join(", "));
                    }
                }
                SectionId::Projects => {
                    for project in &self.projects {
                        push(&project.name);
                        push(project.description().unwrap_or(""));
                        push(project.date_range().as_deref().unwrap_or(""));
                        push(project.url().unwrap_or(""));
                        project.bullets.iter().for_each(|b| push(b));
                    }
                }
                SectionId::Certifications => {
                    for cert in &self.certifications {
                        push(&cert.name);
                        push(cert.issuer().unwrap_or(""));
                        push(cert.date().unwrap_or(""));
                        push(cert.url().unwrap_or(""));
                    }
                }
                SectionId::Additional(index) => {
                    if let Some(section) = self.additional_sections.get(index) {
                        push(&section.title);
                        match &section.body {
                            AdditionalBody::Content(text) => push(text),
                            AdditionalBody::Items(items) => {
                                for item in items {
                                    push(&item.title);
                                    item.bullets.iter().for_each(|b| push(b));
                                }
                            }
                        }
                    }
                }
            }
        }

        lines.join("\n")
    }
}

fn replace_at<T>(items: &mut [T], section: &'static str, index: usize, value: T) -> Result<()> {
    let len = items.len();
    match items.get_mut(index) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(Error::IndexOutOfRange {
            section,
            index,
            len,
        }),
    }
}

fn remove_at<T>(items: &mut Vec<T>, section: &'static str, index: usize) -> Result<T> {
    if index >= items.len() {
        return Err(Error::IndexOutOfRange {
            section,
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdditionalItem;

    #[test]
    fn test_empty_document() {
        let doc = ResumeDocument::new();
        assert!(doc.is_empty());
        assert!(doc.section_order().is_empty());
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_add_records_section_order() {
        let mut doc = ResumeDocument::new();
        doc.add_skill_category(SkillCategory::new("Skills").with_skill("Rust"));
        doc.add_experience(Experience::new("Acme", "Engineer"));
        doc.add_experience(Experience::new("Globex", "Lead"));

        assert_eq!(
            doc.section_order(),
            &[SectionId::Skills, SectionId::Experience]
        );
        assert_eq!(doc.experience().len(), 2);
    }

    #[test]
    fn test_update_out_of_range() {
        let mut doc = ResumeDocument::new();
        doc.add_education(Education::new("Tech University", "BSc"));

        let err = doc
            .update_education(3, Education::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                section: "education",
                index: 3,
                len: 1
            }
        ));
        assert!(doc.remove_project(0).is_err());
    }

    #[test]
    fn test_remove_last_entry_drops_section() {
        let mut doc = ResumeDocument::new();
        doc.add_project(Project::new("resumekit"));
        doc.set_summary("Engineer.");
        let removed = doc.remove_project(0).unwrap();
        assert_eq!(removed.name, "resumekit");
        assert_eq!(doc.section_order(), &[SectionId::Summary]);

        doc.set_summary("");
        assert!(doc.section_order().is_empty());
    }

    #[test]
    fn test_remove_additional_reindexes() {
        let mut doc = ResumeDocument::new();
        doc.add_additional_section(AdditionalSection::with_content("AWARDS", "Dean's list"));
        doc.add_experience(Experience::new("Acme", "Engineer"));
        doc.add_additional_section(AdditionalSection::with_content("LANGUAGES", "French"));

        doc.remove_additional_section(0).unwrap();
        assert_eq!(
            doc.section_order(),
            &[SectionId::Experience, SectionId::Additional(0)]
        );
        assert_eq!(doc.additional_sections()[0].title, "LANGUAGES");
    }

    #[test]
    fn test_map_bullets_counts_changes() {
        let mut doc = ResumeDocument::new();
        doc.add_experience(
            Experience::new("Acme", "Engineer")
                .with_bullet("built it")
                .with_bullet("Done"),
        );
        doc.add_additional_section(AdditionalSection::with_items(
            "VOLUNTEER",
            vec![AdditionalItem {
                title: "Food bank".into(),
                bullets: vec!["sorted cans".into()],
            }],
        ));

        let changed = doc.map_bullets(|b| {
            let mut chars = b.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        });
        assert_eq!(changed, 2);
        assert_eq!(doc.experience()[0].bullets, vec!["Built it", "Done"]);
        assert_eq!(doc.bullet_count(), 3);
    }

    #[test]
    fn test_contact_fields_and_frontmatter() {
        let contact = ContactInfo::new("Jane Doe")
            .with_email("jane@example.com")
            .with_location("Austin, TX");
        let fields = contact.fields();
        assert_eq!(fields[0], ("email", "jane@example.com"));
        assert_eq!(fields[1], ("location", "Austin, TX"));

        let yaml = contact.to_yaml_frontmatter();
        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("name: \"Jane Doe\""));
        assert!(yaml.contains("email: \"jane@example.com\""));
    }

    #[test]
    fn test_section_id_serialization() {
        let json = serde_json::to_string(&SectionId::Additional(2)).unwrap();
        assert_eq!(json, r#"{"type":"additional","index":2}"#);
        let json = serde_json::to_string(&SectionId::Skills).unwrap();
        assert_eq!(json, r#"{"type":"skills"}"#);
    }
}
