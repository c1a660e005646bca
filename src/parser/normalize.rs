//! Text normalization for extracted resume text.

use super::options::NormalizeOptions;
use super::patterns::{
    canonical_section, find_date_range, is_all_caps, is_contact_line, is_known_custom_header,
    split_inline_header, starts_with_bullet, BULLET_MARKER,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Glyphs that always mean "bullet", wherever they appear.
const BULLET_GLYPHS: &[char] = &[
    '•', '‣', '◦', '∙', '●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻', '▸', '▶', '➤', '→',
    '♦', '★', '»', '✓', '✔',
];

/// Glyphs that mean "bullet" only at the start of a line followed by a space.
const LEADING_ONLY_GLYPHS: &[char] = &['*', '-', '–', '—'];

static LETTER_O_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^o\s+(\p{Lu}.*)$").unwrap());

static INLINE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

/// A normalized line with the indentation measured on its source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLine {
    /// Line text, trimmed, empty for blank lines
    pub text: String,

    /// Indentation depth of the source line
    pub indent: u8,
}

impl NormalizedLine {
    fn new(text: impl Into<String>, indent: u8) -> Self {
        Self {
            text: text.into(),
            indent,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), 0)
    }

    /// Check if the line is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Measure indentation: a leading whitespace run of 2+ characters, halved.
pub fn indent_level(line: &str) -> u8 {
    let run = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t' || *c == '\u{00A0}')
        .count();
    if run < 2 {
        0
    } else {
        u8::try_from(run / 2).unwrap_or(u8::MAX)
    }
}

/// Resume text normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizeOptions,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl Normalizer {
    /// Create a new normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        }
    }

    /// Options in use.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize raw text to a single string, lines joined with `\n`.
    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_lines(raw)
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize raw text, keeping the per-line indentation.
    pub fn normalize_lines(&self, raw: &str) -> Vec<NormalizedLine> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        // Stage 1: character-level cleanup
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let text = self.clean_characters(&text);

        let mut lines: Vec<NormalizedLine> = text
            .split('\n')
            .map(|line| NormalizedLine::new(line, indent_level(line)))
            .collect();

        // Stage 2: per-line shape
        if self.options.normalize_whitespace {
            for line in &mut lines {
                line.text = INLINE_SPACES.replace_all(line.text.trim(), " ").into_owned();
            }
        } else {
            for line in &mut lines {
                line.text = line.text.trim().to_string();
            }
        }

        if self.options.standardize_bullets {
            lines = lines.into_iter().flat_map(canonicalize_bullets).collect();
        }

        if self.options.merge_list_markers {
            lines = merge_lone_markers(lines);
        }

        lines = self.limit_blank_lines(lines);

        // Stage 3: cross-line repair
        if self.options.fix_hyphenation {
            lines = fix_hyphenation(lines);
        }

        if self.options.merge_soft_wraps {
            lines = merge_soft_wraps(lines);
        }

        if self.options.split_caps_runs {
            lines = lines.into_iter().flat_map(split_caps_run).collect();
        }

        let lines = self.limit_blank_lines(lines);
        log::debug!("normalized {} bytes into {} lines", raw.len(), lines.len());
        lines
    }

    fn clean_characters(&self, text: &str) -> String {
        let mut result = if self.options.normalize_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        result
    }

    fn limit_blank_lines(&self, lines: Vec<NormalizedLine>) -> Vec<NormalizedLine> {
        let max = self.options.max_blank_lines as usize;
        let mut result: Vec<NormalizedLine> = Vec::with_capacity(lines.len());
        let mut blanks = 0;

        for line in lines {
            if line.is_blank() {
                blanks += 1;
                if max == 0 || blanks <= max {
                    result.push(NormalizedLine::blank());
                }
            } else {
                blanks = 0;
                result.push(line);
            }
        }

        while result.first().is_some_and(NormalizedLine::is_blank) {
            result.remove(0);
        }
        while result.last().is_some_and(NormalizedLine::is_blank) {
            result.pop();
        }
        result
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

fn bullet_line(content: &str, indent: u8) -> NormalizedLine {
    let content = content.trim();
    if content.is_empty() {
        NormalizedLine::new(BULLET_MARKER.to_string(), indent)
    } else {
        NormalizedLine::new(format!("{} {}", BULLET_MARKER, content), indent)
    }
}

/// Rewrite one line so every bullet sits at the start of its own line.
fn canonicalize_bullets(line: NormalizedLine) -> Vec<NormalizedLine> {
    let indent = line.indent;
    let text = line.text.as_str();
    let mut chars = text.chars();

    let body = match chars.next() {
        Some(c) if BULLET_GLYPHS.contains(&c) => Some(chars.as_str()),
        Some(c) if LEADING_ONLY_GLYPHS.contains(&c) => {
            let rest = chars.as_str();
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                Some(rest)
            } else {
                None
            }
        }
        _ => LETTER_O_BULLET
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str()),
    };

    let Some(body) = body else {
        // Inline glyphs are separators ("Python ● Rust"); only unify them.
        let text = line
            .text
            .chars()
            .map(|c| if BULLET_GLYPHS.contains(&c) { BULLET_MARKER } else { c })
            .collect::<String>();
        return vec![NormalizedLine::new(text, indent)];
    };

    // Bullets run together on one line: "• Did A • Did B"
    body.split(|c: char| BULLET_GLYPHS.contains(&c))
        .enumerate()
        .filter(|(i, part)| *i == 0 || !part.trim().is_empty())
        .map(|(_, part)| bullet_line(part, indent))
        .collect()
}

/// Merge a bullet marker alone on its line with the next non-blank line.
fn merge_lone_markers(lines: Vec<NormalizedLine>) -> Vec<NormalizedLine> {
    let mut result: Vec<NormalizedLine> = Vec::with_capacity(lines.len());
    let mut pending: Option<u8> = None;

    for line in lines {
        if let Some(indent) = pending {
            if line.is_blank() {
                continue;
            }
            pending = None;
            let content = line
                .text
                .trim_start_matches(BULLET_MARKER)
                .trim()
                .to_string();
            result.push(bullet_line(&content, indent));
            continue;
        }

        if line.text == BULLET_MARKER.to_string() {
            pending = Some(line.indent);
        } else {
            result.push(line);
        }
    }

    if let Some(indent) = pending {
        result.push(NormalizedLine::new(BULLET_MARKER.to_string(), indent));
    }
    result
}

/// Join a lowercase word hyphenated at a line end with its continuation.
fn fix_hyphenation(lines: Vec<NormalizedLine>) -> Vec<NormalizedLine> {
    let mut result: Vec<NormalizedLine> = Vec::with_capacity(lines.len());

    for line in lines {
        if let Some(prev) = result.last_mut() {
            if ends_with_broken_word(&prev.text)
                && line.text.chars().next().is_some_and(|c| c.is_lowercase())
            {
                prev.text.pop();
                prev.text.push_str(&line.text);
                continue;
            }
        }
        result.push(line);
    }
    result
}

fn ends_with_broken_word(text: &str) -> bool {
    let mut rev = text.chars().rev();
    matches!(
        (rev.next(), rev.next()),
        (Some('-'), Some(c)) if c.is_lowercase()
    )
}

/// Check if a line looks like a section header.
pub(crate) fn is_header_like(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    canonical_section(text).is_some()
        || is_known_custom_header(text)
        || split_inline_header(text).is_some()
        || (is_all_caps(text) && text.chars().filter(|c| c.is_alphabetic()).count() >= 3)
}

const MIN_WRAPPED_LINE: usize = 40;

fn should_merge(prev: &NormalizedLine, next: &NormalizedLine) -> bool {
    let prev_text = prev.text.as_str();
    let next_text = next.text.as_str();

    if prev.is_blank() || next.is_blank() {
        return false;
    }
    if prev_text.ends_with(['.', '!', '?', ':', ';', ',']) {
        return false;
    }
    if starts_with_bullet(next_text) || next_text.ends_with(':') || next_text.contains("___") {
        return false;
    }
    if prev_text == BULLET_MARKER.to_string() {
        return false;
    }
    for text in [prev_text, next_text] {
        if is_header_like(text) || is_contact_line(text) || find_date_range(text).is_some() {
            return false;
        }
    }

    let continues_sentence = next_text
        .chars()
        .next()
        .is_some_and(|c| c.is_lowercase() || c.is_ascii_digit());
    continues_sentence || prev_text.chars().count() >= MIN_WRAPPED_LINE
}

/// Join lines that a layout engine broke in the middle of a sentence.
///
/// The first non-blank line is the name and never absorbs a following line.
fn merge_soft_wraps(lines: Vec<NormalizedLine>) -> Vec<NormalizedLine> {
    let mut result: Vec<NormalizedLine> = Vec::with_capacity(lines.len());
    let mut name_index: Option<usize> = None;

    for line in lines {
        if let Some(last) = result.len().checked_sub(1) {
            if name_index != Some(last) && should_merge(&result[last], &line) {
                let prev = &mut result[last];
                prev.text.push(' ');
                prev.text.push_str(&line.text);
                continue;
            }
        }
        if name_index.is_none() && !line.is_blank() {
            name_index = Some(result.len());
        }
        result.push(line);
    }
    result
}

fn is_caps_token(token: &str) -> bool {
    if token == "&" {
        return true;
    }
    let core = token.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '(' | ')' | '/' | '-'));
    core.chars().filter(|c| c.is_alphabetic()).count() >= 2
        && core.chars().all(|c| (c.is_alphabetic() && c.is_uppercase()) || c == '&' || c == '/')
}

fn caps_run_qualifies(tokens: &[&str]) -> bool {
    let text = tokens.join(" ");
    if canonical_section(&text).is_some() || is_known_custom_header(&text) {
        return true;
    }
    tokens.len() >= 3
        && tokens
            .iter()
            .filter(|t| t.chars().filter(|c| c.is_alphabetic()).count() >= 4)
            .count()
            >= 2
}

/// Move a run of 3+ ALL-CAPS words embedded in a longer line onto its own line.
fn split_caps_run(line: NormalizedLine) -> Vec<NormalizedLine> {
    let text = line.text.trim();
    if text.is_empty() || starts_with_bullet(text) || is_all_caps(text) {
        return vec![line];
    }

    let tokens: Vec<&str> = text.split(' ').collect();
    let mut start = 0;
    while start < tokens.len() {
        if !is_caps_token(tokens[start]) {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < tokens.len() && is_caps_token(tokens[end]) {
            end += 1;
        }
        let run = &tokens[start..end];
        if run.len() >= 3 && caps_run_qualifies(run) {
            let before = tokens[..start].join(" ");
            let header = run.join(" ");
            let after = tokens[end..].join(" ");

            let mut out = Vec::new();
            if !before.is_empty() {
                out.push(NormalizedLine::new(before, line.indent));
                out.push(NormalizedLine::blank());
            }
            out.push(NormalizedLine::new(header, line.indent));
            if !after.is_empty() {
                out.push(NormalizedLine::blank());
                out.extend(split_caps_run(NormalizedLine::new(after, line.indent)));
            }
            return out;
        }
        start = end;
    }
    vec![line]
}
