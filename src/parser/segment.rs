//! Line classification.

use super::normalize::{indent_level, NormalizedLine};
use super::patterns::{
    canonical_section, collapse_whitespace, find_date_range, is_all_caps, is_contact_line,
    is_known_custom_header, split_inline_header, starts_with_bullet, BULLET_MARKER,
};
use crate::model::{LineKind, Section, SectionKey, TaggedLine};

/// Header length bounds for the upper-case vocabulary form.
const HEADER_MIN_LEN: usize = 3;
const HEADER_MAX_LEN: usize = 40;

/// Sub-headers are short labels.
const SUBHEADER_MAX_LEN: usize = 50;

/// Classifies normalized lines into tagged lines.
#[derive(Debug, Clone)]
pub struct Segmenter {
    contact_window: usize,
}

/// A header recognized on one line, with any inline content after its colon.
struct HeaderMatch {
    key: SectionKey,
    label: String,
    content: Option<String>,
}

/// Running state of one segmentation pass.
struct Scan {
    name_done: bool,
    contact_remaining: usize,
    section: Option<SectionKey>,
    prev_kind: Option<LineKind>,
    prev_blank: bool,
}

impl Segmenter {
    /// Create a segmenter scanning `contact_window` lines after the name for contact details.
    pub fn new(contact_window: usize) -> Self {
        Self { contact_window }
    }

    /// Segment normalized text.
    pub fn segment(&self, text: &str) -> Vec<TaggedLine> {
        let lines: Vec<NormalizedLine> = text
            .lines()
            .map(|line| NormalizedLine {
                text: line.trim().to_string(),
                indent: indent_level(line),
            })
            .collect();
        self.segment_lines(&lines)
    }

    /// Segment normalized lines, carrying their source indentation.
    pub fn segment_lines(&self, lines: &[NormalizedLine]) -> Vec<TaggedLine> {
        let mut out = Vec::with_capacity(lines.len());
        let mut scan = Scan {
            name_done: false,
            contact_remaining: 0,
            section: None,
            prev_kind: None,
            prev_blank: true,
        };

        for (i, line) in lines.iter().enumerate() {
            let text = line.text.trim();
            if text.is_empty() {
                scan.prev_blank = true;
                continue;
            }
            let next_blank = lines.get(i + 1).map_or(true, NormalizedLine::is_blank);

            let start = out.len();
            self.classify(text, next_blank, &mut scan, &mut out);
            for tagged in &mut out[start..] {
                tagged.indent_level = line.indent;
                log::trace!("{:?}: {}", tagged.kind, tagged.raw_text);
            }

            scan.prev_kind = out.last().map(|t| t.kind.clone());
            scan.prev_blank = false;
        }

        log::debug!("segmented {} lines into {} tagged lines", lines.len(), out.len());
        out
    }

    fn classify(&self, text: &str, next_blank: bool, scan: &mut Scan, out: &mut Vec<TaggedLine>) {
        let in_skills = scan.section == Some(SectionKey::Canonical(Section::Skills));

        // 1. Name: the first non-blank line, unless it is a section header
        if !scan.name_done {
            scan.name_done = true;
            if self.match_header(text, in_skills, scan.prev_blank, next_blank).is_none() {
                scan.contact_remaining = self.contact_window;
                out.push(TaggedLine::new(LineKind::Name, text, text));
                return;
            }
        }

        let header = self.match_header(text, in_skills, scan.prev_blank, next_blank);

        // 2. Contact block
        if scan.contact_remaining > 0 {
            scan.contact_remaining -= 1;
            if header.is_some() {
                scan.contact_remaining = 0;
            } else if is_contact_line(text) {
                out.push(TaggedLine::new(LineKind::Contact, text, text));
                return;
            }
        }

        // 3. Section header
        if let Some(header) = header {
            scan.section = Some(header.key.clone());
            out.push(TaggedLine::new(
                LineKind::Header(header.key),
                text,
                header.label,
            ));
            if let Some(content) = header.content {
                out.push(TaggedLine::new(LineKind::Text, content.clone(), content));
            }
            return;
        }

        // Bullets and entry titles carry their own dates, so they go first.
        if starts_with_bullet(text) {
            let clean = text.trim_start_matches(BULLET_MARKER).trim();
            if !clean.is_empty() {
                let mut tagged = TaggedLine::new(LineKind::Bullet, text, clean);
                if let Some(date) = find_date_range(clean) {
                    tagged = tagged.with_date(date.text);
                }
                out.push(tagged);
            }
            return;
        }

        if let Some(tagged) = entry_title(text) {
            out.push(tagged);
            return;
        }

        // 4. Date range
        if let Some(date) = find_date_range(text) {
            out.push(TaggedLine::new(LineKind::Date, text, text).with_date(date.text));
            return;
        }

        // 5. Sub-header
        if !is_all_caps(text) && text.ends_with(':') && text.chars().count() < SUBHEADER_MAX_LEN {
            let clean = text.trim_end_matches(':').trim();
            out.push(TaggedLine::new(LineKind::Subheader, text, clean));
            return;
        }

        // 7. Entry header
        let in_entries = matches!(
            scan.section,
            Some(SectionKey::Canonical(Section::Experience | Section::Education))
        );
        let after_entry = matches!(
            scan.prev_kind,
            Some(
                LineKind::Header(_)
                    | LineKind::Bullet
                    | LineKind::Date
                    | LineKind::EntryHeader
                    | LineKind::EntryTitle
            )
        );
        if in_entries && is_all_caps(text) && (scan.prev_blank || after_entry) {
            out.push(TaggedLine::new(LineKind::EntryHeader, text, text));
            return;
        }

        // 8. Anything else
        out.push(TaggedLine::new(LineKind::Text, text, text));
    }

    fn match_header(
        &self,
        text: &str,
        in_skills: bool,
        prev_blank: bool,
        next_blank: bool,
    ) -> Option<HeaderMatch> {
        let len = text.chars().count();
        let caps = is_all_caps(text);
        let label = collapse_whitespace(text.trim_end_matches(':'));

        if caps && (HEADER_MIN_LEN..=HEADER_MAX_LEN).contains(&len) {
            if let Some(section) = canonical_section(text) {
                return Some(HeaderMatch {
                    key: SectionKey::Canonical(section),
                    label,
                    content: None,
                });
            }
            if is_known_custom_header(text) {
                return Some(HeaderMatch {
                    key: SectionKey::Custom(label.clone()),
                    label,
                    content: None,
                });
            }
        }

        if text.ends_with(':') {
            if let Some(section) = canonical_section(text) {
                return Some(HeaderMatch {
                    key: SectionKey::Canonical(section),
                    label,
                    content: None,
                });
            }
            if !in_skills && is_known_custom_header(text) {
                return Some(HeaderMatch {
                    key: SectionKey::Custom(label.clone()),
                    label,
                    content: None,
                });
            }
        }

        // "Skills: Python, Rust" outside a skills section
        if !in_skills {
            if let Some((head, rest)) = split_inline_header(text) {
                if !rest.is_empty() {
                    let head = collapse_whitespace(head);
                    let key = match canonical_section(&head) {
                        Some(section) => SectionKey::Canonical(section),
                        None => SectionKey::Custom(head.clone()),
                    };
                    return Some(HeaderMatch {
                        key,
                        label: head,
                        content: Some(rest.to_string()),
                    });
                }
            }
        }

        // Any other isolated ALL-CAPS line of three or more words
        if caps
            && prev_blank
            && next_blank
            && text.split_whitespace().count() >= 3
            && !is_contact_line(text)
            && find_date_range(text).is_none()
        {
            return Some(HeaderMatch {
                key: SectionKey::Custom(label.clone()),
                label,
                content: None,
            });
        }

        None
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Classify a `Title____date` line.
fn entry_title(text: &str) -> Option<TaggedLine> {
    let start = text.find("___")?;
    let title = text[..start].trim();
    let rest = text[start..].trim_start_matches('_').trim();

    if rest.is_empty() {
        if title.is_empty() || title.chars().count() >= SUBHEADER_MAX_LEN {
            return None;
        }
        return Some(TaggedLine::new(LineKind::Subheader, text, title));
    }

    match find_date_range(rest) {
        Some(date) => {
            let residue = collapse_whitespace(&rest.replacen(date.text.as_str(), " ", 1));
            let clean = if residue.is_empty() {
                title.to_string()
            } else {
                format!("{} {}", title, residue)
            };
            Some(TaggedLine::new(LineKind::EntryTitle, text, clean).with_date(date.text))
        }
        None => Some(TaggedLine::new(
            LineKind::Text,
            text,
            collapse_whitespace(&text.replace('_', " ")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LineKind> {
        Segmenter::default()
            .segment(text)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn header(section: Section) -> LineKind {
        LineKind::Header(SectionKey::Canonical(section))
    }

    #[test]
    fn test_empty() {
        assert!(Segmenter::default().segment("").is_empty());
    }

    #[test]
    fn test_name_and_contact() {
        let text = "Jane Doe\njane@example.com | (555) 123-4567\nAustin, TX\n\nEXPERIENCE";
        assert_eq!(
            kinds(text),
            vec![
                LineKind::Name,
                LineKind::Contact,
                LineKind::Contact,
                header(Section::Experience)
            ]
        );
    }

    #[test]
    fn test_contact_window_limit() {
        let text = "Jane Doe\nA\nB\nC\nD\nE\njane@example.com";
        let lines = Segmenter::new(5).segment(text);
        assert_eq!(lines.last().map(|l| &l.kind), Some(&LineKind::Text));
    }

    #[test]
    fn test_first_line_header_is_not_name() {
        let lines = Segmenter::default().segment("EDUCATION\nBachelor of Science, Tech University (2013-2017)");
        assert_eq!(lines[0].kind, header(Section::Education));
        assert_eq!(lines[1].kind, LineKind::Date);
        assert_eq!(lines[1].date.as_deref(), Some("2013-2017"));
    }

    #[test]
    fn test_header_forms() {
        let text = "Jane Doe\n\nWORK EXPERIENCE\n\nTechnical Skills:\n\nAWARDS\n\nVOLUNTEER AND COMMUNITY WORK\n\nOther";
        assert_eq!(
            kinds(text),
            vec![
                LineKind::Name,
                header(Section::Experience),
                header(Section::Skills),
                LineKind::Header(SectionKey::Custom("AWARDS".into())),
                LineKind::Header(SectionKey::Custom("VOLUNTEER AND COMMUNITY WORK".into())),
                LineKind::Text,
            ]
        );
    }

    #[test]
    fn test_inline_header_content() {
        let lines = Segmenter::default().segment("Jane Doe\nSkills: Python, Rust");
        assert_eq!(lines[1].kind, header(Section::Skills));
        assert_eq!(lines[2].kind, LineKind::Text);
        assert_eq!(lines[2].clean_text, "Python, Rust");
    }

    #[test]
    fn test_skills_labels_stay_inside() {
        let text = "Jane Doe\n\nSKILLS\nLanguages: Python, Rust\nTools:";
        assert_eq!(
            kinds(text),
            vec![
                LineKind::Name,
                header(Section::Skills),
                LineKind::Text,
                LineKind::Subheader
            ]
        );
    }

    #[test]
    fn test_bullet_with_date() {
        let lines = Segmenter::default().segment("Jane Doe\n\nPROJECTS\n• Built a compiler 2019 - 2020");
        let bullet = &lines[2];
        assert_eq!(bullet.kind, LineKind::Bullet);
        assert_eq!(bullet.clean_text, "Built a compiler 2019 - 2020");
        assert_eq!(bullet.date.as_deref(), Some("2019 - 2020"));
    }

    #[test]
    fn test_entry_title() {
        let lines = Segmenter::default().segment("Jane Doe\n\nPROJECTS\nCompiler______Jan 2020 - Present\nCourses___");
        assert_eq!(lines[2].kind, LineKind::EntryTitle);
        assert_eq!(lines[2].clean_text, "Compiler");
        assert_eq!(lines[2].date.as_deref(), Some("Jan 2020 - Present"));
        assert_eq!(lines[3].kind, LineKind::Subheader);
        assert_eq!(lines[3].clean_text, "Courses");
    }

    #[test]
    fn test_entry_header() {
        let text = "Jane Doe\n\nEXPERIENCE\nACME CORP\nSoftware Engineer\n2019 - 2021\n• Built tools.\nGLOBEX\nLead";
        assert_eq!(
            kinds(text),
            vec![
                LineKind::Name,
                header(Section::Experience),
                LineKind::EntryHeader,
                LineKind::Text,
                LineKind::Date,
                LineKind::Bullet,
                LineKind::EntryHeader,
                LineKind::Text,
            ]
        );
    }

    #[test]
    fn test_caps_line_outside_entries_is_text() {
        let text = "Jane Doe\n\nSKILLS\nAWS";
        assert_eq!(kinds(text)[2], LineKind::Text);
    }

    #[test]
    fn test_indent_carried() {
        let lines = Segmenter::default().segment_lines(&[
            NormalizedLine {
                text: "Jane Doe".into(),
                indent: 0,
            },
            NormalizedLine {
                text: "• Nested".into(),
                indent: 2,
            },
        ]);
        assert_eq!(lines[1].indent_level, 2);
    }
}
