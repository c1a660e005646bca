//! Shared recognizers: bullet marker, section vocabulary, contact and date patterns.

use crate::model::{Section, PRESENT};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// The single internal bullet glyph every recognized bullet style becomes.
pub const BULLET_MARKER: char = '•';

/// Header spellings mapped to their canonical section.
const SECTION_VOCABULARY: &[(&str, Section)] = &[
    ("SUMMARY", Section::Summary),
    ("PROFESSIONAL SUMMARY", Section::Summary),
    ("CAREER SUMMARY", Section::Summary),
    ("EXECUTIVE SUMMARY", Section::Summary),
    ("PROFILE", Section::Summary),
    ("PROFESSIONAL PROFILE", Section::Summary),
    ("OBJECTIVE", Section::Summary),
    ("CAREER OBJECTIVE", Section::Summary),
    ("ABOUT ME", Section::Summary),
    ("EXPERIENCE", Section::Experience),
    ("WORK EXPERIENCE", Section::Experience),
    ("PROFESSIONAL EXPERIENCE", Section::Experience),
    ("RELEVANT EXPERIENCE", Section::Experience),
    ("EMPLOYMENT", Section::Experience),
    ("EMPLOYMENT HISTORY", Section::Experience),
    ("WORK HISTORY", Section::Experience),
    ("CAREER HISTORY", Section::Experience),
    ("EDUCATION", Section::Education),
    ("ACADEMIC BACKGROUND", Section::Education),
    ("EDUCATIONAL BACKGROUND", Section::Education),
    ("ACADEMICS", Section::Education),
    ("SKILLS", Section::Skills),
    ("TECHNICAL SKILLS", Section::Skills),
    ("KEY SKILLS", Section::Skills),
    ("CORE COMPETENCIES", Section::Skills),
    ("COMPETENCIES", Section::Skills),
    ("SKILLS & ABILITIES", Section::Skills),
    ("SKILLS AND ABILITIES", Section::Skills),
    ("PROJECTS", Section::Projects),
    ("PERSONAL PROJECTS", Section::Projects),
    ("KEY PROJECTS", Section::Projects),
    ("ACADEMIC PROJECTS", Section::Projects),
    ("CERTIFICATIONS", Section::Certifications),
    ("CERTIFICATES", Section::Certifications),
    ("LICENSES & CERTIFICATIONS", Section::Certifications),
    ("LICENSES AND CERTIFICATIONS", Section::Certifications),
    ("CERTIFICATIONS & LICENSES", Section::Certifications),
];

/// Section names outside the canonical set that are still headers.
const KNOWN_CUSTOM_HEADERS: &[&str] = &[
    "AWARDS",
    "HONORS",
    "HONORS & AWARDS",
    "AWARDS & HONORS",
    "ACHIEVEMENTS",
    "LANGUAGES",
    "PUBLICATIONS",
    "VOLUNTEER",
    "VOLUNTEER EXPERIENCE",
    "VOLUNTEERING",
    "LEADERSHIP",
    "ACTIVITIES",
    "EXTRACURRICULAR ACTIVITIES",
    "INTERESTS",
    "HOBBIES",
    "REFERENCES",
    "COURSEWORK",
    "RELEVANT COURSEWORK",
    "AFFILIATIONS",
    "MEMBERSHIPS",
    "PATENTS",
    "CONFERENCES",
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_%-]+/?").unwrap()
});

static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_.-]+(?:/[A-Za-z0-9_.-]+)?/?")
        .unwrap()
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:https?://[^\s|,;()]+|www\.[^\s|,;()]+|\b[a-z0-9-]+\.(?:com|io|dev|me|net|org|app|co|ai)(?:/[^\s|,;()]*)?\b)",
    )
    .unwrap()
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'-]*(?: [A-Z][A-Za-z.'-]*){0,3},\s*(?:[A-Z]{2}(?:\s+\d{5})?|[A-Z][a-z]+(?: [A-Z][a-z]+){0,2})$")
        .unwrap()
});

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?";

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let point = format!(r"(?:\d{{1,2}}/(?:19|20)\d{{2}}|{MONTH}\s+(?:19|20)\d{{2}}|(?:19|20)\d{{2}})");
    Regex::new(&format!(
        r"(?i)\b(?P<from>{point})\s*(?:-|–|—|\bto\b)\s*(?P<to>{point}|present|current|now)\b"
    ))
    .unwrap()
});

static SINGLE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:{MONTH}\s+(?:19|20)\d{{2}}|\d{{1,2}}/(?:19|20)\d{{2}}|(?:19|20)\d{{2}})$"
    ))
    .unwrap()
});

static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").unwrap());

/// Collapse internal whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Check if every cased character is upper-case and at least one letter exists.
pub fn is_all_caps(text: &str) -> bool {
    let mut has_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            has_letter = true;
            if c.is_lowercase() {
                return false;
            }
        }
    }
    has_letter
}

/// Check if the line opens with the canonical bullet marker.
pub fn starts_with_bullet(text: &str) -> bool {
    text.trim_start().starts_with(BULLET_MARKER)
}

fn header_key(text: &str) -> String {
    collapse_whitespace(text.trim().trim_end_matches(':')).to_uppercase()
}

/// Look up a canonical section by header text, ignoring case and a trailing colon.
pub fn canonical_section(text: &str) -> Option<Section> {
    let key = header_key(text);
    SECTION_VOCABULARY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, section)| *section)
}

/// Check if the header text names a known non-canonical section.
pub fn is_known_custom_header(text: &str) -> bool {
    let key = header_key(text);
    KNOWN_CUSTOM_HEADERS.iter().any(|name| *name == key)
}

/// Split `"Skills: Python, Rust"` into its vocabulary header and the content after the colon.
pub fn split_inline_header(text: &str) -> Option<(&str, &str)> {
    let (head, rest) = text.split_once(':')?;
    if head.trim().is_empty() || head.len() > 40 {
        return None;
    }
    if canonical_section(head).is_some() || is_known_custom_header(head) {
        Some((head.trim(), rest.trim()))
    } else {
        None
    }
}

/// First email address in the text.
pub fn find_email(text: &str) -> Option<&str> {
    EMAIL.find(text).map(|m| m.as_str())
}

/// First phone number in the text.
pub fn find_phone(text: &str) -> Option<&str> {
    PHONE.find(text).map(|m| m.as_str().trim())
}

/// First LinkedIn profile URL in the text.
pub fn find_linkedin(text: &str) -> Option<&str> {
    LINKEDIN.find(text).map(|m| m.as_str())
}

/// First GitHub URL in the text.
pub fn find_github(text: &str) -> Option<&str> {
    GITHUB.find(text).map(|m| m.as_str())
}

/// First generic URL in the text that is not part of an email address.
pub fn find_url(text: &str) -> Option<&str> {
    URL.find_iter(text)
        .find(|m| {
            let before = &text[..m.start()];
            !before.ends_with('@') && !before.ends_with('.') && find_email(m.as_str()).is_none()
                && !text[m.end()..].starts_with('@')
        })
        .map(|m| m.as_str().trim_end_matches(['.', '/']))
}

/// Check if the whole fragment is a "City, ST" or "City, Country" location.
pub fn is_location(text: &str) -> bool {
    LOCATION.is_match(text.trim())
}

/// Split a line into contact fragments on `|`, `•` and `·`.
pub fn contact_fragments(text: &str) -> Vec<&str> {
    text.split(['|', '•', '·'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Check if a fragment matches any contact pattern.
pub fn is_contact_fragment(text: &str) -> bool {
    let text = text.trim();
    find_email(text).is_some()
        || find_phone(text).is_some()
        || find_linkedin(text).is_some()
        || find_github(text).is_some()
        || is_location(text)
        || (find_url(text).is_some() && !text.contains(' '))
}

/// Check if any fragment of the line matches a contact pattern.
pub fn is_contact_line(text: &str) -> bool {
    contact_fragments(text).into_iter().any(is_contact_fragment)
}

/// A date range found inside a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Byte offset of the match in the searched text
    pub start: usize,
    /// Byte offset just past the match
    pub end: usize,
    /// The matched text, verbatim
    pub text: String,
}

fn valid_point(point: &str) -> bool {
    match MONTH_YEAR.captures(point.trim()) {
        Some(caps) => {
            let month: u32 = caps[1].parse().unwrap_or(0);
            let year: i32 = caps[2].parse().unwrap_or(0);
            NaiveDate::from_ymd_opt(year, month, 1).is_some()
        }
        None => true,
    }
}

/// Find the first valid date range in the text.
///
/// A line that is nothing but a single date (`"May 2021"`, `"2019"`)
/// counts as a range with an open end.
pub fn find_date_range(text: &str) -> Option<DateMatch> {
    for caps in DATE_RANGE.captures_iter(text) {
        let (Some(whole), Some(from), Some(to)) = (caps.get(0), caps.name("from"), caps.name("to"))
        else {
            continue;
        };
        if valid_point(from.as_str()) && valid_point(to.as_str()) {
            return Some(DateMatch {
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
            });
        }
    }

    let trimmed = text.trim();
    if SINGLE_DATE.is_match(trimmed) && valid_point(trimmed) {
        let start = text.len() - text.trim_start().len();
        return Some(DateMatch {
            start,
            end: start + trimmed.len(),
            text: trimmed.to_string(),
        });
    }
    None
}

/// Split a date range into start and end, normalizing open ends to `"Present"`.
pub fn split_date_range(range: &str) -> (String, String) {
    let range = range.trim();
    if let Some(caps) = DATE_RANGE.captures(range) {
        if let (Some(from), Some(to)) = (caps.name("from"), caps.name("to")) {
            return (from.as_str().to_string(), normalize_end_date(to.as_str()));
        }
    }
    (range.to_string(), String::new())
}

/// Normalize "Present", "Current" and "Now" (any case) to `"Present"`.
pub fn normalize_end_date(value: &str) -> String {
    let value = value.trim();
    if ["present", "current", "now"]
        .iter()
        .any(|w| value.eq_ignore_ascii_case(w))
    {
        PRESENT.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_section() {
        assert_eq!(canonical_section("WORK EXPERIENCE"), Some(Section::Experience));
        assert_eq!(canonical_section("Technical Skills:"), Some(Section::Skills));
        assert_eq!(canonical_section("AWARDS"), None);
        assert!(is_known_custom_header("Volunteer  Experience"));
    }

    #[test]
    fn test_split_inline_header() {
        assert_eq!(
            split_inline_header("Skills: Python, Rust"),
            Some(("Skills", "Python, Rust"))
        );
        assert_eq!(split_inline_header("Note: call me"), None);
    }

    #[test]
    fn test_contact_patterns() {
        assert_eq!(find_email("mail: jane.doe@example.com |"), Some("jane.doe@example.com"));
        assert_eq!(find_phone("(555) 123-4567"), Some("(555) 123-4567"));
        assert_eq!(find_phone("+1 555.123.4567"), Some("+1 555.123.4567"));
        assert_eq!(
            find_linkedin("linkedin.com/in/janedoe"),
            Some("linkedin.com/in/janedoe")
        );
        assert_eq!(find_github("https://github.com/jdoe"), Some("https://github.com/jdoe"));
        assert!(is_location("Austin, TX"));
        assert!(is_location("San Francisco, CA"));
        assert!(is_location("Berlin, Germany"));
        assert!(!is_location("Bachelor of Science, Tech University"));
    }

    #[test]
    fn test_url_ignores_email_domain() {
        assert_eq!(find_url("jane@example.com"), None);
        assert_eq!(find_url("janedoe.dev"), Some("janedoe.dev"));
    }

    #[test]
    fn test_contact_line() {
        assert!(is_contact_line("jane@example.com | (555) 123-4567 | Austin, TX"));
        assert!(!is_contact_line("Senior Software Engineer"));
    }

    #[test]
    fn test_date_ranges() {
        let cases = [
            ("Software Engineer 01/2019 - 03/2021", "01/2019 - 03/2021"),
            ("Jan 2020 – Present", "Jan 2020 – Present"),
            ("September 2015 - May 2019", "September 2015 - May 2019"),
            ("(2013-2017)", "2013-2017"),
            ("2018 to current", "2018 to current"),
        ];
        for (line, expected) in cases {
            let found = find_date_range(line).expect(line);
            assert_eq!(found.text, expected);
        }
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(find_date_range("13/2020 - 02/2021").is_none());
        assert!(find_date_range("Managed 1500 accounts").is_none());
    }

    #[test]
    fn test_single_date_line() {
        let found = find_date_range("May 2021").unwrap();
        assert_eq!(found.text, "May 2021");
        assert!(find_date_range("Graduated 2021 with honors").is_none());
    }

    #[test]
    fn test_split_date_range() {
        assert_eq!(
            split_date_range("Jan 2020 - Now"),
            ("Jan 2020".to_string(), "Present".to_string())
        );
        assert_eq!(
            split_date_range("2013-2017"),
            ("2013".to_string(), "2017".to_string())
        );
        assert_eq!(split_date_range("2019"), ("2019".to_string(), String::new()));
    }
}
