//! Options for the text and Markdown outputs.

/// Options for rendering a [`RenderTree`](super::RenderTree) to text.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Marker placed before bullet items in plain text
    pub bullet_marker: char,

    /// Character to use for Markdown list markers
    pub list_marker: char,

    /// Separator between the parts of an entry's title line
    pub field_separator: String,

    /// Markdown heading level for section titles (1-6); the name is one level above
    pub section_heading_level: u8,

    /// Upper-case section titles in plain text
    pub uppercase_titles: bool,

    /// Include YAML frontmatter with contact details (Markdown, document input only)
    pub include_frontmatter: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Collect statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plain-text bullet marker.
    pub fn with_bullet_marker(mut self, marker: char) -> Self {
        self.bullet_marker = marker;
        self
    }

    /// Set the Markdown list marker.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Set the title line separator.
    pub fn with_field_separator(mut self, separator: impl Into<String>) -> Self {
        self.field_separator = separator.into();
        self
    }

    /// Set the Markdown section heading level.
    pub fn with_section_heading(mut self, level: u8) -> Self {
        self.section_heading_level = level.clamp(2, 6);
        self
    }

    /// Enable or disable upper-case section titles.
    pub fn with_uppercase_titles(mut self, uppercase: bool) -> Self {
        self.uppercase_titles = uppercase;
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bullet_marker: '•',
            list_marker: '-',
            field_separator: " | ".to_string(),
            section_heading_level: 2,
            uppercase_titles: true,
            include_frontmatter: false,
            escape_special_chars: true,
            collect_stats: false,
        }
    }
}
