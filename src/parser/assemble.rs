//! Entity assembly: tagged lines to a typed [`ResumeDocument`].

use super::patterns::{
    collapse_whitespace, contact_fragments, find_email, find_github,
    find_linkedin, find_phone, find_url, is_all_caps, is_contact_fragment, is_location,
    split_date_range,
};
use crate::model::{
    AdditionalItem, AdditionalSection, Certification, ContactInfo, Education, Experience,
    LineKind, Project, ResumeDocument, Section, SectionId, SectionKey, SkillCategory, TaggedLine,
};
use regex::Regex;
use std::sync::LazyLock;

/// Words that mark a phrase as a job title rather than an employer.
const JOB_TITLE_KEYWORDS: &[&str] = &[
    "engineer", "developer", "manager", "analyst", "intern", "director", "designer",
    "consultant", "specialist", "lead", "architect", "scientist", "coordinator", "associate",
    "administrator", "officer", "assistant", "president", "founder", "head", "programmer",
    "technician", "representative", "executive", "supervisor", "researcher", "teacher",
    "tutor", "accountant", "advisor", "strategist", "owner", "partner", "editor", "writer",
];

/// Words that mark a phrase as a degree.
const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "master", "doctor", "associate of", "associate's", "diploma", "degree",
    "high school", "b.s.", "b.a.", "m.s.", "m.a.", "ph.d", "phd", "mba", "bsc", "msc", "b.eng", "m.eng", "beng", "meng", "b.tech", "m.tech", "btech", "mtech",
    "certificate",
];

/// Separators between role and organization, strongest first.
const ROLE_SEPARATORS: &[&str] = &[" at ", " @ ", " | ", " – ", " — ", " - ", ", "];

static GPA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bGPA\b[:\s]*([0-9]\.[0-9]{1,2}(?:\s*/\s*[0-9](?:\.[0-9]{1,2})?)?)").unwrap()
});

static CONTACT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:e-?mail|phone|tel|mobile|cell|linkedin|github|portfolio|website|web|address|location)\s*:?$")
        .unwrap()
});

/// Groups tagged lines into a [`ResumeDocument`].
#[derive(Debug, Clone, Default)]
pub struct Assembler;

/// Lines between two headers.
struct SectionBlock<'a> {
    key: SectionKey,
    title: String,
    lines: Vec<&'a TaggedLine>,
}

impl Assembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self
    }

    /// Assemble tagged lines into a document. Never fails.
    pub fn assemble(&self, lines: &[TaggedLine]) -> ResumeDocument {
        let mut doc = ResumeDocument::new();

        let mut name_line: Option<&TaggedLine> = None;
        let mut contact_lines: Vec<&TaggedLine> = Vec::new();
        let mut preamble: Vec<&TaggedLine> = Vec::new();
        let mut blocks: Vec<SectionBlock> = Vec::new();

        for line in lines {
            match &line.kind {
                LineKind::Header(key) => blocks.push(SectionBlock {
                    key: key.clone(),
                    title: line.clean_text.clone(),
                    lines: Vec::new(),
                }),
                LineKind::Name if name_line.is_none() => name_line = Some(line),
                LineKind::Contact => contact_lines.push(line),
                _ => match blocks.last_mut() {
                    Some(block) => block.lines.push(line),
                    None => preamble.push(line),
                },
            }
        }

        doc.contact = assemble_contact(name_line, &contact_lines, lines);

        let summary = join_text(&preamble);
        if !summary.is_empty() {
            doc.summary = summary;
            doc.note_section(SectionId::Summary);
        }

        for block in &blocks {
            self.assemble_block(&mut doc, block);
        }

        log::debug!(
            "assembled {} sections, {} entries, {} bullets",
            doc.section_order.len(),
            doc.entry_count(),
            doc.bullet_count()
        );
        doc
    }

    fn assemble_block(&self, doc: &mut ResumeDocument, block: &SectionBlock) {
        let lines = block.lines.as_slice();
        match &block.key {
            SectionKey::Canonical(section) => {
                doc.note_section(SectionId::from_section(*section));
                match section {
                    Section::Summary => {
                        let text = join_text(lines);
                        if !text.is_empty() {
                            if !doc.summary.is_empty() {
                                doc.summary.push(' ');
                            }
                            doc.summary.push_str(&text);
                        }
                    }
                    Section::Experience => doc.experience.extend(assemble_experience(lines)),
                    Section::Education => doc.education.extend(assemble_education(lines)),
                    Section::Skills => doc.skills.extend(assemble_skills(lines)),
                    Section::Projects => doc.projects.extend(assemble_projects(lines)),
                    Section::Certifications => {
                        doc.certifications.extend(assemble_certifications(lines))
                    }
                }
            }
            SectionKey::Custom(_) => {
                doc.add_additional_section(assemble_additional(&block.title, lines));
            }
        }
    }
}

fn join_text(lines: &[&TaggedLine]) -> String {
    lines
        .iter()
        .map(|l| l.clean_text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn next_is_date(lines: &[&TaggedLine], i: usize) -> bool {
    lines.get(i + 1).is_some_and(|l| l.kind == LineKind::Date)
}

fn contains_word(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|word| {
        lower.match_indices(word).any(|(pos, _)| {
            let before = lower[..pos].chars().next_back();
            let after = lower[pos + word.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    })
}

fn has_job_keyword(text: &str) -> bool {
    contains_word(text, JOB_TITLE_KEYWORDS)
}

fn has_degree_keyword(text: &str) -> bool {
    contains_word(text, DEGREE_KEYWORDS)
}

// ==================== Contact ====================

fn assemble_contact(
    name_line: Option<&TaggedLine>,
    contact_lines: &[&TaggedLine],
    all: &[TaggedLine],
) -> ContactInfo {
    let mut contact = ContactInfo::default();
    let mut fragments: Vec<&str> = Vec::new();

    if let Some(line) = name_line {
        let parts = contact_fragments(&line.clean_text);
        match parts.iter().position(|p| !is_contact_fragment(p)) {
            Some(index) => {
                contact.name = parts[index].to_string();
                fragments.extend(
                    parts
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != index)
                        .map(|(_, p)| *p),
                );
            }
            None => {
                contact.name = line.raw_text.trim().to_string();
                fragments.extend(parts);
            }
        }
    }

    for line in contact_lines {
        fragments.extend(contact_fragments(&line.clean_text));
    }

    for fragment in fragments {
        absorb_contact_fragment(&mut contact, fragment);
    }

    if contact.name.trim().is_empty() {
        if let Some(first) = all.iter().find(|l| !l.raw_text.trim().is_empty()) {
            contact.name = first.raw_text.trim().to_string();
        }
    }
    contact
}

/// Move the first match of `find` out of `rest`; the first value seen for a field wins.
fn claim(rest: &mut String, find: fn(&str) -> Option<&str>, field: &mut Option<String>) {
    if let Some(found) = find(rest.as_str()).map(str::to_string) {
        if field.is_none() {
            *field = Some(found.clone());
        }
        *rest = rest.replacen(found.as_str(), " ", 1);
    }
}

/// Take every recognizable contact value out of one fragment.
fn absorb_contact_fragment(contact: &mut ContactInfo, fragment: &str) {
    let mut rest = fragment.to_string();

    claim(&mut rest, find_linkedin, &mut contact.linkedin);
    claim(&mut rest, find_github, &mut contact.github);
    claim(&mut rest, find_email, &mut contact.email);
    claim(&mut rest, find_phone, &mut contact.phone);
    claim(&mut rest, find_url, &mut contact.portfolio);

    let leftover = collapse_whitespace(&rest);
    let leftover = leftover.trim_matches(|c: char| matches!(c, ',' | ';' | '-' | '–' | ':'));
    let leftover = leftover.trim();
    if leftover.is_empty() || CONTACT_LABEL.is_match(leftover) {
        return;
    }
    if is_location(leftover) {
        if contact.location.is_none() {
            contact.location = Some(leftover.to_string());
        }
        return;
    }
    contact.other.push(leftover.to_string());
}

// ==================== Experience ====================

/// Split "Title at Company" style lines into (title, organization).
fn split_role(text: &str) -> (String, String) {
    let text = text.trim();
    for sep in ROLE_SEPARATORS {
        if let Some((left, right)) = text.split_once(sep) {
            let (left, right) = (left.trim(), right.trim());
            if left.is_empty() || right.is_empty() {
                continue;
            }
            if matches!(*sep, " at " | " @ ") {
                return (left.to_string(), right.to_string());
            }
            let (left_title, right_title) = (has_job_keyword(left), has_job_keyword(right));
            return if right_title && !left_title {
                (right.to_string(), left.to_string())
            } else if left_title && !right_title {
                (left.to_string(), right.to_string())
            } else if is_all_caps(left) && !is_all_caps(right) {
                (right.to_string(), left.to_string())
            } else {
                (left.to_string(), right.to_string())
            };
        }
    }
    if has_job_keyword(text) {
        (text.to_string(), String::new())
    } else {
        (String::new(), text.to_string())
    }
}

fn experience_from(text: &str) -> Experience {
    let (title, company) = split_role(text);
    Experience::new(company, title)
}

fn set_experience_dates(entry: &mut Experience, date: &str) {
    let (start, end) = split_date_range(date);
    entry.start_date = start;
    entry.end_date = end;
}

/// Place a free line into the first empty slot of an open experience entry.
fn fill_experience(entry: &mut Experience, text: &str) {
    if text.is_empty() {
        return;
    }
    if entry.location.is_none() && is_location(text) {
        entry.location = Some(text.to_string());
    } else if entry.title.is_empty() && entry.company.is_empty() {
        let (title, company) = split_role(text);
        entry.title = title;
        entry.company = company;
    } else if entry.title.is_empty() {
        entry.title = text.to_string();
    } else if entry.company.is_empty() {
        entry.company = text.to_string();
    } else {
        entry.bullets.push(text.to_string());
    }
}

fn assemble_experience(lines: &[&TaggedLine]) -> Vec<Experience> {
    let mut entries: Vec<Experience> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::EntryHeader | LineKind::EntryTitle | LineKind::Subheader => {
                let mut entry = experience_from(&line.text_without_date());
                if line.kind == LineKind::EntryHeader && entry.company.is_empty() {
                    std::mem::swap(&mut entry.company, &mut entry.title);
                }
                if let Some(date) = &line.date {
                    set_experience_dates(&mut entry, date);
                }
                entries.push(entry);
            }
            LineKind::Date => {
                let residue = line.text_without_date();
                let date = line.date.as_deref().unwrap_or_default();
                match entries.last_mut() {
                    Some(entry) if !entry.has_dates() => {
                        set_experience_dates(entry, date);
                        fill_experience(entry, &residue);
                    }
                    _ => {
                        let mut entry = experience_from(&residue);
                        set_experience_dates(&mut entry, date);
                        entries.push(entry);
                    }
                }
            }
            LineKind::Bullet => {
                if entries.is_empty() {
                    entries.push(Experience::default());
                }
                if let Some(entry) = entries.last_mut() {
                    entry.bullets.push(line.clean_text.clone());
                }
            }
            _ => {
                let text = line.clean_text.trim();
                let opens = match entries.last() {
                    None => true,
                    Some(entry) => {
                        next_is_date(lines, i) && (entry.has_dates() || !entry.bullets.is_empty())
                    }
                };
                if opens {
                    entries.push(experience_from(text));
                } else if let Some(entry) = entries.last_mut() {
                    if entry.bullets.is_empty() {
                        fill_experience(entry, text);
                    } else {
                        entry.bullets.push(text.to_string());
                    }
                }
            }
        }
    }
    entries
}

// ==================== Education ====================

/// Split `"Master of Science in Physics"` into degree and field.
fn parse_degree(text: &str) -> (String, String) {
    let text = text.trim();
    match text.split_once(" in ") {
        Some((degree, field)) if !degree.trim().is_empty() && !field.trim().is_empty() => {
            (degree.trim().to_string(), field.trim().to_string())
        }
        _ => (text.to_string(), String::new()),
    }
}

fn education_from(text: &str) -> Education {
    let mut entry = Education::default();
    let text = text.trim();
    let parts: Vec<&str> = text
        .split([',', '|'])
        .flat_map(|p| p.split(" – "))
        .flat_map(|p| p.split(" - "))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut rest = Vec::new();
    for part in parts {
        let mut part = part.to_string();
        if entry.gpa.is_none() {
            if let Some((gpa, leftover)) = take_gpa(&part) {
                entry.gpa = Some(gpa);
                if !has_degree_keyword(&leftover) {
                    if !leftover.is_empty() {
                        entry.details.push(leftover);
                    }
                    continue;
                }
                part = leftover;
            }
        }
        let part = part.as_str();
        if entry.degree.is_empty() && has_degree_keyword(part) {
            let (degree, field) = parse_degree(part);
            entry.degree = degree;
            entry.field = field;
        } else if entry.location.is_none() && !rest.is_empty() && is_location(part) {
            entry.location = Some(part.to_string());
        } else {
            rest.push(part.to_string());
        }
    }
    entry.institution = rest.join(", ");
    entry
}

/// Take the GPA out of a fragment, returning it with whatever text surrounded it.
fn take_gpa(text: &str) -> Option<(String, String)> {
    let caps = GPA.captures(text)?;
    let (whole, value) = (caps.get(0)?, caps.get(1)?);
    let remainder = collapse_whitespace(&format!(
        "{} {}",
        &text[..whole.start()],
        &text[whole.end()..]
    ))
    .replace("( )", "")
    .replace("()", "");
    let leftover = remainder
        .split([',', ';', '|'])
        .map(|p| p.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':')))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    Some((value.as_str().to_string(), collapse_whitespace(&leftover)))
}

fn set_education_dates(entry: &mut Education, date: &str) {
    let (start, end) = split_date_range(date);
    entry.start_date = start;
    entry.end_date = end;
}

fn fill_education(entry: &mut Education, text: &str) {
    if text.is_empty() {
        return;
    }
    if entry.gpa.is_none() {
        if let Some((gpa, leftover)) = take_gpa(text) {
            entry.gpa = Some(gpa);
            fill_education(entry, &leftover);
            return;
        }
    }
    if entry.degree.is_empty() && has_degree_keyword(text) {
        let parsed = education_from(text);
        entry.degree = parsed.degree;
        entry.field = parsed.field;
        if entry.institution.is_empty() {
            entry.institution = parsed.institution;
        } else if !parsed.institution.is_empty() {
            entry.details.push(parsed.institution);
        }
        if entry.location.is_none() {
            entry.location = parsed.location;
        }
        match (entry.gpa.is_some(), parsed.gpa) {
            (false, gpa) => entry.gpa = gpa,
            (true, Some(gpa)) => entry.details.push(format!("GPA {}", gpa)),
            (true, None) => {}
        }
        entry.details.extend(parsed.details);
    } else if entry.institution.is_empty() {
        entry.institution = text.to_string();
    } else if entry.location.is_none() && is_location(text) {
        entry.location = Some(text.to_string());
    } else {
        entry.details.push(text.to_string());
    }
}

fn assemble_education(lines: &[&TaggedLine]) -> Vec<Education> {
    let mut entries: Vec<Education> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::EntryHeader | LineKind::EntryTitle | LineKind::Subheader => {
                let mut entry = education_from(&line.text_without_date());
                if let Some(date) = &line.date {
                    set_education_dates(&mut entry, date);
                }
                entries.push(entry);
            }
            LineKind::Date => {
                let residue = line.text_without_date();
                let date = line.date.as_deref().unwrap_or_default();
                match entries.last_mut() {
                    Some(entry) if !entry.has_dates() => {
                        set_education_dates(entry, date);
                        fill_education(entry, &residue);
                    }
                    _ => {
                        let mut entry = education_from(&residue);
                        set_education_dates(&mut entry, date);
                        entries.push(entry);
                    }
                }
            }
            LineKind::Bullet => match entries.last_mut() {
                Some(entry) => entry.details.push(line.clean_text.clone()),
                None => entries.push(Education::default().with_detail(line.clean_text.clone())),
            },
            _ => {
                let text = line.clean_text.trim();
                let opens = match entries.last() {
                    None => true,
                    Some(entry) => next_is_date(lines, i) && entry.has_dates(),
                };
                if opens {
                    entries.push(education_from(text));
                } else if let Some(entry) = entries.last_mut() {
                    fill_education(entry, text);
                }
            }
        }
    }
    entries
}

// ==================== Skills ====================

fn skill_tokens(text: &str) -> Vec<String> {
    text.split([',', ';', '|', '•', '·'])
        .map(|t| t.trim().trim_end_matches('.').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `"Languages: Python, Rust"` into a label and its items.
fn labelled_skills(text: &str) -> Option<(&str, &str)> {
    let (label, items) = text.split_once(':')?;
    let label = label.trim();
    if label.is_empty() || label.chars().count() > 40 || items.trim().is_empty() {
        return None;
    }
    Some((label, items.trim()))
}

fn assemble_skills(lines: &[&TaggedLine]) -> Vec<SkillCategory> {
    let mut categories: Vec<SkillCategory> = Vec::new();

    for line in lines {
        let text = line.clean_text.trim().to_string();

        match line.kind {
            LineKind::Subheader => categories.push(SkillCategory::new(text)),
            _ => {
                if let Some((label, items)) = labelled_skills(&text) {
                    let mut category = SkillCategory::new(label);
                    category.skills = skill_tokens(items);
                    categories.push(category);
                    continue;
                }
                if categories.is_empty() {
                    categories.push(SkillCategory::new("Skills"));
                }
                if let Some(category) = categories.last_mut() {
                    category.skills.extend(skill_tokens(&text));
                }
            }
        }
    }
    categories
}

// ==================== Projects ====================

/// Split a project line into name, description and URL.
fn project_from(text: &str) -> Project {
    let mut text = text.trim().to_string();
    let mut project = Project::default();

    if let Some(url) = find_url(&text).map(str::to_string) {
        text = collapse_whitespace(&text.replacen(url.as_str(), " ", 1));
        text = text
            .trim_matches(|c: char| matches!(c, '|' | '-' | '–' | ',' | '(' | ')' | ':') || c.is_whitespace())
            .to_string();
        project.url = Some(url);
    }

    for sep in [" | ", " – ", " — ", " - ", ": "] {
        if let Some((name, description)) = text.split_once(sep) {
            if !name.trim().is_empty() && !description.trim().is_empty() {
                project.name = name.trim().to_string();
                project.description = Some(description.trim().to_string());
                return project;
            }
        }
    }
    project.name = text;
    project
}

fn set_project_dates(project: &mut Project, date: &str) {
    let (start, end) = split_date_range(date);
    project.start_date = Some(start);
    project.end_date = if end.is_empty() { None } else { Some(end) };
}

fn fill_project(project: &mut Project, text: &str) {
    if text.is_empty() {
        return;
    }
    if project.name.is_empty() {
        let parsed = project_from(text);
        project.name = parsed.name;
        project.description = project.description.take().or(parsed.description);
        project.url = project.url.take().or(parsed.url);
    } else if project.description.is_none() {
        let parsed = project_from(text);
        if project.url.is_none() {
            project.url = parsed.url.clone();
        }
        let description = match parsed.description {
            Some(d) => format!("{} - {}", parsed.name, d),
            None => parsed.name,
        };
        if !description.is_empty() {
            project.description = Some(description);
        }
    } else {
        project.bullets.push(text.to_string());
    }
}

fn assemble_projects(lines: &[&TaggedLine]) -> Vec<Project> {
    let mut projects: Vec<Project> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::EntryHeader | LineKind::EntryTitle | LineKind::Subheader => {
                let mut project = project_from(&line.text_without_date());
                if let Some(date) = &line.date {
                    set_project_dates(&mut project, date);
                }
                projects.push(project);
            }
            LineKind::Date => {
                let residue = line.text_without_date();
                let date = line.date.as_deref().unwrap_or_default();
                match projects.last_mut() {
                    Some(project) if !project.has_dates() && project.bullets.is_empty() => {
                        set_project_dates(project, date);
                        fill_project(project, &residue);
                    }
                    _ => {
                        let mut project = project_from(&residue);
                        set_project_dates(&mut project, date);
                        projects.push(project);
                    }
                }
            }
            LineKind::Bullet => {
                if projects.is_empty() {
                    projects.push(Project::default());
                }
                if let Some(project) = projects.last_mut() {
                    project.bullets.push(line.clean_text.clone());
                }
            }
            _ => {
                let text = line.clean_text.trim();
                let opens = match projects.last() {
                    None => true,
                    Some(project) => {
                        !project.bullets.is_empty()
                            || project.description.is_some()
                            || (next_is_date(lines, i) && project.has_dates())
                    }
                };
                if opens {
                    projects.push(project_from(text));
                } else if let Some(project) = projects.last_mut() {
                    fill_project(project, text);
                }
            }
        }
    }
    projects
}

// ==================== Certifications ====================

fn certification_from(text: &str, date: Option<&str>) -> Certification {
    let mut text = text.trim().to_string();
    let mut cert = Certification::default();

    if let Some(url) = find_url(&text).map(str::to_string) {
        text = collapse_whitespace(&text.replacen(url.as_str(), " ", 1));
        cert.url = Some(url);
    }
    let text = text
        .trim_matches(|c: char| matches!(c, '|' | '-' | '–' | ',' | '(' | ')') || c.is_whitespace())
        .to_string();

    cert.name = text.clone();
    for sep in [" - ", " – ", " — ", " | ", ", ", " by "] {
        if let Some((name, issuer)) = text.split_once(sep) {
            if !name.trim().is_empty() && !issuer.trim().is_empty() {
                cert.name = name.trim().to_string();
                cert.issuer = Some(issuer.trim().to_string());
                break;
            }
        }
    }
    cert.date = date.map(str::to_string);
    cert
}

fn assemble_certifications(lines: &[&TaggedLine]) -> Vec<Certification> {
    let mut certs: Vec<Certification> = Vec::new();

    for line in lines {
        let residue = line.text_without_date();
        let date = line.date.as_deref();

        if residue.is_empty() {
            if let Some(date) = date {
                match certs.iter_mut().rev().find(|c| c.date.is_none()) {
                    Some(cert) => cert.date = Some(date.to_string()),
                    None => certs.push(Certification {
                        date: Some(date.to_string()),
                        ..Default::default()
                    }),
                }
            }
            continue;
        }
        certs.push(certification_from(&residue, date));
    }
    certs
}

// ==================== Additional sections ====================

fn assemble_additional(title: &str, lines: &[&TaggedLine]) -> AdditionalSection {
    let grouped = lines
        .windows(2)
        .any(|pair| !pair[0].is_bullet() && pair[1].is_bullet());

    if !grouped {
        let content = lines
            .iter()
            .map(|l| l.clean_text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        return AdditionalSection::with_content(title, content);
    }

    let mut items: Vec<AdditionalItem> = Vec::new();
    for line in lines {
        if line.is_bullet() {
            if items.is_empty() {
                items.push(AdditionalItem::new(""));
            }
            if let Some(item) = items.last_mut() {
                item.bullets.push(line.clean_text.clone());
            }
        } else {
            items.push(AdditionalItem::new(line.clean_text.trim()));
        }
    }
    AdditionalSection::with_items(title, items)
}
