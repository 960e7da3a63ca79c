//! Hypothesizer: a Zellij plugin for turning papers into research hypotheses.
//!
//! The plugin walks one workflow on a single scrolling page:
//! - Search a research service for papers and curate a selection
//! - Enter a research topic
//! - Generate a hypothesis with validation notes from the selection
//! - Open a literature survey, gap analysis or trend analysis of the
//!   selection in a viewer, and export it as a markdown file

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← keys, host calls
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling and request tokens                │
//! │  - Page layout, anchors and scrolling               │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Worker Layer  │
//! │ (ui/)         │   │ (api/)        │   │ (worker/)     │
//! │ - Page, viewer│   │ - Requests    │   │ - Markdown    │
//! │ - Markdown    │   │ - Responses   │   │   export      │
//! │ - Theming     │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) and Infrastructure (infrastructure/) │
//! │  - Papers, selection, hypothesis, analysis, errors  │
//! │  - Sandbox path mapping                             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/hypothesizer.wasm" {
//!         api_base_url "http://localhost:8000/api"
//!         export_dir "~/papers"
//!         scroll_delay_ms "100"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for c in "diffusion".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//! let (_, actions) = handle_event(&mut state, &Event::SubmitSearch)?;
//! assert!(matches!(actions[0], Action::Search { .. }));
//! # Ok::<(), hypothesizer::HypothesizerError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{HypothesizerError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_EXPORT_DIR: &str = "~";
const DEFAULT_SCROLL_DELAY_MS: u64 = 100;

/// Plugin configuration parsed from the KDL plugin block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Research service root, without a trailing `/`.
    pub api_base_url: String,

    /// Directory exports are written to, already mapped into the sandbox
    /// (`~` becomes `/host`).
    pub export_dir: String,

    /// Delay before the page scrolls to the paper selection after a search.
    pub scroll_delay_ms: u64,

    /// Built-in theme name. Ignored when `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a TOML theme file.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for exported spans. Default: `"info"`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            export_dir: infrastructure::expand_tilde(DEFAULT_EXPORT_DIR),
            scroll_delay_ms: DEFAULT_SCROLL_DELAY_MS,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Reads the plugin block, falling back to defaults for missing, blank
    /// or malformed values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use hypothesizer::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "https://research.example/api/".to_string());
    /// map.insert("scroll_delay_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_base_url, "https://research.example/api");
    /// assert_eq!(config.scroll_delay_ms, 100);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let api_base_url = value("api_base_url")
            .and_then(|raw| {
                parse_api_base_url(&raw)
                    .map_err(|e| tracing::warn!(error = %e, "using default api_base_url"))
                    .ok()
            })
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let export_dir = infrastructure::expand_tilde(
            value("export_dir").as_deref().unwrap_or(DEFAULT_EXPORT_DIR),
        );

        let scroll_delay_ms = value("scroll_delay_ms")
            .and_then(|raw| {
                parse_scroll_delay(&raw)
                    .map_err(|e| tracing::warn!(error = %e, "using default scroll_delay_ms"))
                    .ok()
            })
            .unwrap_or(DEFAULT_SCROLL_DELAY_MS);

        Self {
            api_base_url,
            export_dir,
            scroll_delay_ms,
            theme_name: value("theme"),
            theme_file: value("theme_file"),
            trace_level: value("trace_level"),
        }
    }
}

/// Validates a service root and strips trailing `/`.
fn parse_api_base_url(raw: &str) -> Result<String> {
    let url = raw.trim_end_matches('/');
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    if host.map_or(true, str::is_empty) {
        return Err(HypothesizerError::Config(format!(
            "api_base_url must be an http(s) URL, got {raw:?}"
        )));
    }
    Ok(url.to_string())
}

fn parse_scroll_delay(raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|e| {
        HypothesizerError::Config(format!(
            "scroll_delay_ms must be a whole number of milliseconds, got {raw:?}: {e}"
        ))
    })
}

/// Builds the initial application state for `config`.
///
/// The theme comes from `theme_file`, then `theme`, then the built-in
/// default; a theme that fails to load is logged and replaced by the default.
///
/// # Example
///
/// ```rust
/// use hypothesizer::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.selection.is_empty());
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api_base_url = %config.api_base_url, "initializing hypothesizer");

    let theme = match (&config.theme_file, &config.theme_name) {
        (Some(file), _) => Theme::from_file(infrastructure::expand_tilde(file)).unwrap_or_else(|e| {
            tracing::warn!(theme_file = %file, error = %e, "theme file rejected, using default");
            Theme::default()
        }),
        (None, Some(name)) => Theme::from_name(name).unwrap_or_else(|| {
            tracing::warn!(theme_name = %name, "unknown theme, using default");
            Theme::default()
        }),
        (None, None) => Theme::default(),
    };

    AppState::new(theme, config.export_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_block_uses_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
        assert_eq!(Config::default().export_dir, "/host");
    }

    #[test]
    fn values_are_normalized() {
        let config = Config::from_zellij(&map(&[
            ("api_base_url", " http://10.0.0.2:9000/api// "),
            ("export_dir", "~/papers"),
            ("scroll_delay_ms", "250"),
            ("theme", "catppuccin-latte"),
            ("trace_level", "debug"),
        ]));
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000/api");
        assert_eq!(config.export_dir, "/host/papers");
        assert_eq!(config.scroll_delay_ms, 250);
        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("api_base_url", "///"),
            ("scroll_delay_ms", "-5"),
            ("theme", "   "),
        ]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.scroll_delay_ms, DEFAULT_SCROLL_DELAY_MS);
        assert_eq!(config.theme_name, None);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for raw in ["localhost:8000/api", "ftp://host/api", "http://", "///"] {
            let err = parse_api_base_url(raw).unwrap_err();
            assert!(matches!(err, HypothesizerError::Config(_)), "{raw}");
        }
        assert!(matches!(parse_scroll_delay("soon"), Err(HypothesizerError::Config(_))));
        assert_eq!(parse_api_base_url("https://h/api/").unwrap(), "https://h/api");
        assert_eq!(parse_scroll_delay("0").unwrap(), 0);

        let config = Config::from_zellij(&map(&[("api_base_url", "localhost:8000/api")]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            export_dir: "/tmp/out".to_string(),
            ..Config::default()
        };
        let state = initialize(&config);
        assert_eq!(state.theme.colors.header_fg, Theme::default().colors.header_fg);
        assert_eq!(state.export_dir, "/tmp/out");
    }
}
