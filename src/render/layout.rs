//! Lays a document out into a [`RenderTree`].

use super::design::DesignOptions;
use super::template::{Position, TemplateDescriptor};
use super::tree::{ContactBlock, ContactField, Item, Node, Region, RenderSection, RenderTree, SectionSource};
use crate::model::{
    AdditionalBody, AdditionalSection, Certification, ContactInfo, Education, Experience, Project,
    ResumeDocument, SectionId, SkillCategory,
};

/// Lay out `doc` with the given template and design.
///
/// Sections follow the document's stored order, hidden sections are
/// skipped, and each visible section lands in the region its template
/// entry names. Empty fields and empty sections produce no output.
pub fn render(
    doc: &ResumeDocument,
    template: &TemplateDescriptor,
    design: &DesignOptions,
) -> RenderTree {
    let mut placed: Vec<(Position, RenderSection)> = Vec::new();

    if template.contact.visible {
        if let Some(block) = contact_block(doc.contact()) {
            placed.push((
                template.contact.position,
                RenderSection {
                    source: SectionSource::Contact,
                    title: template.contact.title.clone(),
                    nodes: vec![Node::Contact(block)],
                },
            ));
        }
    }

    for &id in doc.section_order() {
        let default_title = section_title(doc, id);
        let layout = template.layout_for(id, &default_title);
        if !layout.visible {
            log::trace!("section {:?} hidden by template", id);
            continue;
        }

        let nodes = section_nodes(doc, id);
        if nodes.is_empty() {
            continue;
        }

        let title = layout.title.clone().unwrap_or(default_title);
        placed.push((
            layout.position,
            RenderSection {
                source: SectionSource::Document(id),
                title: Some(title).filter(|t| !t.trim().is_empty()),
                nodes,
            },
        ));
    }

    let regions: Vec<Region> = Position::ALL
        .iter()
        .filter_map(|&position| {
            let sections: Vec<RenderSection> = placed
                .iter()
                .filter(|(p, _)| *p == position)
                .map(|(_, section)| section.clone())
                .collect();
            (!sections.is_empty()).then_some(Region { position, sections })
        })
        .collect();

    log::debug!(
        "rendered {} sections into {} regions with template '{}'",
        placed.len(),
        regions.len(),
        template.name
    );

    RenderTree {
        template: template.name.clone(),
        design: design.clone(),
        regions,
    }
}

fn section_title(doc: &ResumeDocument, id: SectionId) -> String {
    match id {
        SectionId::Additional(index) => doc
            .additional_sections()
            .get(index)
            .map(|s| s.title.trim().to_string())
            .unwrap_or_default(),
        _ => id.section().map(|s| s.title().to_string()).unwrap_or_default(),
    }
}

fn section_nodes(doc: &ResumeDocument, id: SectionId) -> Vec<Node> {
    match id {
        SectionId::Summary => paragraphs(doc.summary()),
        SectionId::Experience => items(doc.experience(), experience_item),
        SectionId::Education => items(doc.education(), education_item),
        SectionId::Skills => doc.skills().iter().filter_map(skill_group).collect(),
        SectionId::Projects => items(doc.projects(), project_item),
        SectionId::Certifications => items(doc.certifications(), certification_item),
        SectionId::Additional(index) => doc
            .additional_sections()
            .get(index)
            .map(additional_nodes)
            .unwrap_or_default(),
    }
}

fn text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn bullets(source: &[String]) -> Vec<String> {
    source.iter().filter_map(|b| text(b)).collect()
}

fn paragraphs(source: &str) -> Vec<Node> {
    source
        .lines()
        .filter_map(text)
        .map(|text| Node::Paragraph { text })
        .collect()
}

fn items<T>(entries: &[T], build: fn(&T) -> Item) -> Vec<Node> {
    entries
        .iter()
        .map(build)
        .filter(|item| !item.is_empty())
        .map(Node::Item)
        .collect()
}

fn contact_block(contact: &ContactInfo) -> Option<ContactBlock> {
    let block = ContactBlock {
        name: text(&contact.name),
        fields: contact
            .fields()
            .into_iter()
            .map(|(label, value)| ContactField {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect(),
    };
    (block.name.is_some() || !block.fields.is_empty()).then_some(block)
}

fn experience_item(exp: &Experience) -> Item {
    let (title, subtitle) = match (text(&exp.title), text(&exp.company)) {
        (None, company) => (company, None),
        (title, company) => (title, company),
    };
    Item {
        title,
        subtitle,
        dates: exp.date_range(),
        location: exp.location().map(str::to_string),
        bullets: bullets(&exp.bullets),
        ..Default::default()
    }
}

fn education_item(edu: &Education) -> Item {
    let (title, subtitle) = match (text(&edu.institution), edu.qualification()) {
        (None, qualification) => (qualification, None),
        (institution, qualification) => (institution, qualification),
    };
    Item {
        title,
        subtitle,
        dates: edu.date_range(),
        location: edu.location().map(str::to_string),
        meta: edu.gpa().map(|gpa| format!("GPA: {}", gpa)).into_iter().collect(),
        bullets: bullets(&edu.details),
        ..Default::default()
    }
}

fn project_item(project: &Project) -> Item {
    Item {
        title: text(&project.name),
        subtitle: project.description().map(str::to_string),
        dates: project.date_range(),
        link: project.url().map(str::to_string),
        bullets: bullets(&project.bullets),
        ..Default::default()
    }
}

fn certification_item(cert: &Certification) -> Item {
    Item {
        title: text(&cert.name),
        subtitle: cert.issuer().map(str::to_string),
        dates: cert.date().map(str::to_string),
        link: cert.url().map(str::to_string),
        ..Default::default()
    }
}

fn skill_group(category: &SkillCategory) -> Option<Node> {
    let skills = bullets(&category.skills);
    let name = category.name.trim().to_string();
    if skills.is_empty() && name.is_empty() {
        return None;
    }
    Some(Node::SkillGroup { name, skills })
}

fn additional_nodes(section: &AdditionalSection) -> Vec<Node> {
    match &section.body {
        AdditionalBody::Content(content) => paragraphs(content),
        AdditionalBody::Items(entries) => entries
            .iter()
            .map(|entry| Item {
                title: text(&entry.title),
                bullets: bullets(&entry.bullets),
                ..Default::default()
            })
            .filter(|item| !item.is_empty())
            .map(Node::Item)
            .collect(),
    }
}
