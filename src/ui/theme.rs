//! Color themes and ANSI escape sequence generation.
//!
//! Themes are TOML documents. Four Catppuccin flavours are compiled in; a
//! custom file can be supplied through the `theme_file` plugin option.
//!
//! # File Format
//!
//! Every color is `#rrggbb`; `header_bg` may be left out.
//!
//! ```toml
//! name = "paper-light"
//!
//! [colors]
//! header_fg = "#4c4f69"
//! section_fg = "#1e66f5"
//! selection_fg = "#eff1f5"
//! selection_bg = "#ea76cb"
//! text_normal = "#4c4f69"
//! text_dim = "#9ca0b0"
//! border = "#bcc0cc"
//! input_border = "#ea76cb"
//! match_highlight_fg = "#eff1f5"
//! match_highlight_bg = "#df8e1d"
//! error_fg = "#d20f39"
//! success_fg = "#40a02b"
//! accent = "#1e66f5"
//! heading_fg = "#8839ef"
//! code_fg = "#fe640b"
//! ```

use crate::domain::error::{HypothesizerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BUILTIN_MOCHA: &str = include_str!("../../themes/catppuccin-mocha.toml");

/// Named color scheme.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every styled element.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,
    /// Numbered section titles ("1. Select Papers").
    pub section_fg: String,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    pub text_dim: String,
    pub border: String,
    /// Border of the focused input field.
    pub input_border: String,

    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub error_fg: String,
    pub success_fg: String,
    /// Enabled buttons and add markers.
    pub accent: String,

    /// Markdown headings inside the hypothesis and the analysis viewer.
    pub heading_fg: String,
    pub code_fg: String,
}

impl Theme {
    /// Loads a built-in theme: `catppuccin-mocha`, `catppuccin-latte`,
    /// `catppuccin-frappe` or `catppuccin-macchiato`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => BUILTIN_MOCHA,
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`HypothesizerError::Theme`] if the file cannot be read or does
    /// not describe a complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| HypothesizerError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| HypothesizerError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parses `#rrggbb`, falling back to white on anything else.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the embedded Mocha theme fails to parse, which the unit tests
    /// rule out.
    fn default() -> Self {
        toml::from_str(BUILTIN_MOCHA).expect("embedded catppuccin-mocha theme parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        for name in ["catppuccin-mocha", "catppuccin-latte", "catppuccin-frappe", "catppuccin-macchiato"] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn escapes_use_rgb_channels() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("000000"), "\u{1b}[48;2;0;0;0m");
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn theme_file_round_trip() {
        let theme = Theme::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml::to_string(&theme).unwrap().as_bytes()).unwrap();

        let loaded = Theme::from_file(file.path()).unwrap();
        assert_eq!(loaded.colors.accent, theme.colors.accent);
    }

    #[test]
    fn incomplete_theme_file_is_theme_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name = \"half\"\n").unwrap();
        assert!(matches!(Theme::from_file(file.path()), Err(HypothesizerError::Theme(_))));
    }
}
