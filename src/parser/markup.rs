//! Inline marker encoding of tagged lines.
//!
//! One tagged line per text line:
//!
//! ```text
//! <NAME>Jane Doe</NAME>
//! <CONTACT_INFO>jane@example.com | Austin, TX</CONTACT_INFO>
//! <HEADER>EXPERIENCE</HEADER>
//! <ENTRY_HEADER>ACME CORP</ENTRY_HEADER>
//! Senior Engineer <DATE>2019 - Present</DATE>
//! <INDENT level="1"><BULLET>Shipped the billing service.</INDENT>
//! <SUBHEADER>Languages</SUBHEADER>
//! ```
//!
//! Plain lines are text lines, or date lines when they carry a `<DATE>`
//! element. `<`, `>` and `&` inside content are written as entities.

use super::patterns::{canonical_section, collapse_whitespace, BULLET_MARKER};
use crate::model::{LineKind, SectionKey, TaggedLine};
use regex::Regex;
use std::sync::LazyLock;

static INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<INDENT level="(\d+)">(.*)</INDENT>$"#).unwrap());

static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<DATE>(.*?)</DATE>").unwrap());

static ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(HEADER|SUBHEADER|CONTACT_INFO|NAME|ENTRY_HEADER|ENTRY_TITLE)>(.*)</([A-Z_]+)>$")
        .unwrap()
});

const BULLET_TAG: &str = "<BULLET>";

/// Encode tagged lines in the marker vocabulary.
pub fn encode(lines: &[TaggedLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&encode_line(line));
        out.push('\n');
    }
    out
}

/// Encode a single tagged line.
pub fn encode_line(line: &TaggedLine) -> String {
    let body = body_with_date(line);
    let encoded = match &line.kind {
        LineKind::Name => wrap("NAME", &body),
        LineKind::Contact => wrap("CONTACT_INFO", &body),
        LineKind::Header(_) => wrap("HEADER", &body),
        LineKind::Subheader => wrap("SUBHEADER", &body),
        LineKind::EntryHeader => wrap("ENTRY_HEADER", &body),
        LineKind::EntryTitle => wrap("ENTRY_TITLE", &body),
        LineKind::Bullet => format!("{}{}", BULLET_TAG, body),
        LineKind::Date | LineKind::Text => body,
    };

    if line.indent_level > 0 {
        format!(r#"<INDENT level="{}">{}</INDENT>"#, line.indent_level, encoded)
    } else {
        encoded
    }
}

fn wrap(tag: &str, body: &str) -> String {
    format!("<{tag}>{body}</{tag}>")
}

/// Escaped clean text with its date range marked up.
fn body_with_date(line: &TaggedLine) -> String {
    let Some(date) = line.date.as_deref() else {
        return escape(&line.clean_text);
    };
    let marked = format!("<DATE>{}</DATE>", escape(date));
    match line.clean_text.find(date) {
        Some(pos) => format!(
            "{}{}{}",
            escape(&line.clean_text[..pos]),
            marked,
            escape(&line.clean_text[pos + date.len()..])
        ),
        None if line.clean_text.is_empty() => marked,
        None => format!("{} {}", escape(&line.clean_text), marked),
    }
}

/// Decode marker text back into tagged lines.
///
/// Blank lines are skipped. Raw text is rebuilt from the clean text.
pub fn decode(text: &str) -> Vec<TaggedLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(decode_line)
        .collect()
}

/// Decode a single encoded line.
pub fn decode_line(line: &str) -> TaggedLine {
    let (indent, body) = match INDENT.captures(line) {
        Some(caps) => (
            caps[1].parse::<u8>().unwrap_or(u8::MAX),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        None => (0, line),
    };

    let mut tagged = match ELEMENT.captures(body) {
        Some(caps) if caps[1] == caps[3] => {
            let (text, date) = split_date(&caps[2]);
            element(&caps[1], text, date)
        }
        _ => match body.strip_prefix(BULLET_TAG) {
            Some(rest) => {
                let (text, date) = split_date(rest);
                let raw = format!("{} {}", BULLET_MARKER, text);
                with_optional_date(TaggedLine::new(LineKind::Bullet, raw, text), date)
            }
            None => {
                let (text, date) = split_date(body);
                let kind = if date.is_some() {
                    LineKind::Date
                } else {
                    LineKind::Text
                };
                with_optional_date(TaggedLine::new(kind, text.clone(), text), date)
            }
        },
    };
    tagged.indent_level = indent;
    tagged
}

fn element(tag: &str, text: String, date: Option<String>) -> TaggedLine {
    let kind = match tag {
        "NAME" => LineKind::Name,
        "CONTACT_INFO" => LineKind::Contact,
        "HEADER" => LineKind::Header(match canonical_section(&text) {
            Some(section) => SectionKey::Canonical(section),
            None => SectionKey::Custom(text.clone()),
        }),
        "SUBHEADER" => LineKind::Subheader,
        "ENTRY_HEADER" => LineKind::EntryHeader,
        _ => LineKind::EntryTitle,
    };

    // Entry titles keep their date apart from the title text.
    let clean = match (&kind, &date) {
        (LineKind::EntryTitle, Some(date)) => collapse_whitespace(&text.replacen(date.as_str(), " ", 1)),
        _ => text.clone(),
    };
    with_optional_date(TaggedLine::new(kind, text, clean), date)
}

fn with_optional_date(line: TaggedLine, date: Option<String>) -> TaggedLine {
    match date {
        Some(date) => line.with_date(date),
        None => line,
    }
}

/// Remove the `<DATE>` markup, returning unescaped text and the date.
fn split_date(body: &str) -> (String, Option<String>) {
    let date = DATE.captures(body).and_then(|c| c.get(1)).map(|m| unescape(m.as_str()));
    let text = DATE.replace(body, "$1");
    (unescape(&text), date)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
