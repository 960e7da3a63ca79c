//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin shim (main.rs) and the domain, api, ui and worker
//! layers.
//!
//! ```text
//! Keys / Host Events → Event → handle_event → AppState → Actions → Host Calls
//!                        ↑                                  ↓
//!                        └── WebRequestResult / Worker ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Focus, lifecycle and page anchor types
//! - [`state`]: Application state and the search → select → generate workflow
//! - [`view`]: View model computation and scroll bookkeeping
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::app::{handle_event, AppState, Event};
//! use hypothesizer::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), "/host");
//! let (render, actions) = handle_event(&mut state, &Event::FocusNext)?;
//! assert!(render && actions.is_empty());
//! # Ok::<(), hypothesizer::HypothesizerError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;
pub mod view;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{Anchor, Focus, Lifecycle};
pub use state::{AppState, SearchStatus};
pub use view::Viewport;
