//! Normalization and parsing options.

use crate::rewrite::RuleSet;

/// Normalization preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePreset {
    /// Line endings, Unicode NFC and whitespace only
    Minimal,
    /// Every normalization step
    #[default]
    Standard,
}

/// Options for text normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Canonicalize bullet glyphs to the internal marker
    pub standardize_bullets: bool,

    /// Merge a bullet marker alone on its line with the following line
    pub merge_list_markers: bool,

    /// Collapse runs of spaces and tabs
    pub normalize_whitespace: bool,

    /// Maximum consecutive blank lines (0 = unlimited)
    pub max_blank_lines: u8,

    /// Join words hyphenated across a line break
    pub fix_hyphenation: bool,

    /// Join sentences broken across layout lines
    pub merge_soft_wraps: bool,

    /// Move embedded ALL-CAPS runs onto their own line
    pub split_caps_runs: bool,
}

impl NormalizeOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        match preset {
            NormalizePreset::Minimal => Self::minimal(),
            NormalizePreset::Standard => Self::standard(),
        }
    }

    /// Minimal normalization options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            standardize_bullets: false,
            merge_list_markers: false,
            normalize_whitespace: true,
            max_blank_lines: 1,
            fix_hyphenation: false,
            merge_soft_wraps: false,
            split_caps_runs: false,
        }
    }

    /// Standard normalization options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            standardize_bullets: true,
            merge_list_markers: true,
            normalize_whitespace: true,
            max_blank_lines: 1,
            fix_hyphenation: true,
            merge_soft_wraps: true,
            split_caps_runs: true,
        }
    }

    /// Enable or disable soft-wrap merging.
    pub fn with_soft_wraps(mut self, enabled: bool) -> Self {
        self.merge_soft_wraps = enabled;
        self
    }

    /// Enable or disable hyphenation repair.
    pub fn with_hyphenation(mut self, enabled: bool) -> Self {
        self.fix_hyphenation = enabled;
        self
    }

    /// Set the maximum number of consecutive blank lines.
    pub fn with_max_blank_lines(mut self, max: u8) -> Self {
        self.max_blank_lines = max;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Options for the full parsing pipeline.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Normalization options
    pub normalize: NormalizeOptions,

    /// How many non-blank lines after the name are scanned for contact details
    pub contact_window: usize,

    /// Whether to run the rule engine over bullets and summary after assembly
    pub rewrite_bullets: bool,

    /// Rewrite dictionaries used when `rewrite_bullets` is set
    pub rules: RuleSet,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set normalization options.
    pub fn with_normalize(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Set the contact scan window.
    pub fn with_contact_window(mut self, lines: usize) -> Self {
        self.contact_window = lines;
        self
    }

    /// Rewrite bullets and summary with the rule engine.
    pub fn rewrite(mut self) -> Self {
        self.rewrite_bullets = true;
        self
    }

    /// Enable or disable bullet rewriting.
    pub fn with_rewrite(mut self, enabled: bool) -> Self {
        self.rewrite_bullets = enabled;
        self
    }

    /// Set the rewrite rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::standard(),
            contact_window: 5,
            rewrite_bullets: false,
            rules: RuleSet::default(),
        }
    }
}
