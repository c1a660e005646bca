//! Typography, spacing and color options.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub name: f32,
    pub section_title: f32,
    pub item_title: f32,
    pub normal: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            name: 24.0,
            section_title: 14.0,
            item_title: 12.0,
            normal: 10.5,
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Same margin on all sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(36.0)
    }
}

/// Visual design consumed by the renderer and passed on to print backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignOptions {
    pub font_family: String,
    pub font_sizes: FontSizes,

    /// `#rgb` or `#rrggbb`
    pub primary_color: String,

    pub margins: Margins,

    /// Line height multiplier
    pub line_spacing: f32,

    /// Space between sections in points
    pub section_spacing: f32,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_sizes: FontSizes::default(),
            primary_color: "#2b6cb0".to_string(),
            margins: Margins::default(),
            line_spacing: 1.15,
            section_spacing: 12.0,
        }
    }
}

impl DesignOptions {
    /// Create design options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Smaller type and tighter spacing for dense resumes.
    pub fn compact() -> Self {
        Self {
            font_sizes: FontSizes {
                name: 20.0,
                section_title: 12.0,
                item_title: 11.0,
                normal: 9.5,
            },
            margins: Margins::uniform(28.0),
            line_spacing: 1.0,
            section_spacing: 8.0,
            ..Self::default()
        }
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the font sizes.
    pub fn with_font_sizes(mut self, sizes: FontSizes) -> Self {
        self.font_sizes = sizes;
        self
    }

    /// Set the primary color.
    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = color.into();
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the line spacing multiplier.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the space between sections.
    pub fn with_section_spacing(mut self, spacing: f32) -> Self {
        self.section_spacing = spacing;
        self
    }

    /// Check that every value is usable by a print backend.
    pub fn validate(&self) -> Result<()> {
        if self.font_family.trim().is_empty() {
            return Err(Error::InvalidOption("font family is empty".to_string()));
        }

        let sizes = [
            ("name", self.font_sizes.name),
            ("section title", self.font_sizes.section_title),
            ("item title", self.font_sizes.item_title),
            ("normal", self.font_sizes.normal),
        ];
        for (label, size) in sizes {
            if !size.is_finite() || size <= 0.0 {
                return Err(Error::InvalidOption(format!(
                    "{} font size must be positive, got {}",
                    label, size
                )));
            }
        }

        if !HEX_COLOR.is_match(self.primary_color.trim()) {
            return Err(Error::InvalidOption(format!(
                "primary color '{}' is not a hex color",
                self.primary_color
            )));
        }

        let margins = [
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
            self.margins.left,
        ];
        if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(Error::InvalidOption("margins must be non-negative".to_string()));
        }

        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if !self.section_spacing.is_finite() || self.section_spacing < 0.0 {
            return Err(Error::InvalidOption(format!(
                "section spacing must be non-negative, got {}",
                self.section_spacing
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DesignOptions::default().validate().is_ok());
        assert!(DesignOptions::compact().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_color = DesignOptions::new().with_primary_color("blue");
        assert!(matches!(bad_color.validate(), Err(Error::InvalidOption(_))));

        let bad_spacing = DesignOptions::new().with_line_spacing(0.0);
        assert!(bad_spacing.validate().is_err());

        let bad_size = DesignOptions::new().with_font_sizes(FontSizes {
            normal: -1.0,
            ..FontSizes::default()
        });
        assert!(bad_size.validate().is_err());

        let bad_margin = DesignOptions::new().with_margins(Margins {
            left: f32::NAN,
            ..Margins::default()
        });
        assert!(bad_margin.validate().is_err());
    }

    #[test]
    fn test_short_hex_color() {
        assert!(DesignOptions::new().with_primary_color("#0af").validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let design: DesignOptions =
            serde_json::from_str(r##"{"primary_color": "#112233", "font_sizes": {"name": 30}}"##)
                .unwrap();
        assert_eq!(design.primary_color, "#112233");
        assert_eq!(design.font_sizes.name, 30.0);
        assert_eq!(design.font_sizes.normal, 10.5);
        assert_eq!(design.font_family, "Helvetica");
    }
}
