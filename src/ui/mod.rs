//! Terminal rendering layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready types computed from state
//! - [`renderer`]: Entry point tying view model and components together
//! - [`components`]: Header, page rows, status/footer and the analysis viewer
//! - [`markdown`]: Markdown → wrapped, styled lines
//! - [`helpers`]: Cursor positioning, width-aware clipping, match highlighting
//! - [`theme`]: TOML color themes and ANSI escape generation

pub mod components;
pub mod helpers;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use markdown::{render_markdown, LineStyle, StyledLine};
pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::UIViewModel;
