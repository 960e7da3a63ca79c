//! Zellij plugin wrapper and entry point.
//!
//! Everything Zellij-specific lives here: key decoding, host calls and the
//! worker registration. The library decides what happens; this file only
//! translates.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Zellij Main Thread         │
//! │  ┌────────────────────────┐  │  web_request ──▶ research service
//! │  │  State (plugin)        │  │  ◀── WebRequestResult
//! │  └────────────────────────┘  │
//! │          │ post_message_to   │
//! │          ▼                   │
//! │  ┌────────────────────────┐  │
//! │  │ ExportWorker           │  │  ← writes exported markdown
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Global (page):
//! - `Tab` / `Shift+Tab`: Cycle focus
//! - `Ctrl+g`: Generate hypothesis
//! - `Ctrl+s` / `Ctrl+r` / `Ctrl+t`: Survey, gaps, trends
//! - `PageUp` / `PageDown`: Scroll the page
//! - `Ctrl+n` / `Ctrl+p`: Move the list cursor
//! - `Esc`: Hide the plugin
//!
//! In the query and topic fields printable keys type; `Enter` searches or
//! generates. In the result and selection lists `j`/`k` move, `Enter`/`a`
//! adds and `d` removes.
//!
//! In the analysis viewer:
//! - `j`/`k`, `Up`/`Down`: Scroll one line
//! - `PageUp`/`PageDown`: Scroll a page
//! - `e`: Export
//! - `Esc`/`q`: Close

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, web_request};

use hypothesizer::api::{self, ApiClient, HttpRequest, Verb};
use hypothesizer::app::{AppState, Focus};
use hypothesizer::domain::AnalysisKind;
use hypothesizer::worker::{ExportWorker, WorkerMessage, WorkerResponse, WORKER_NAME};
use hypothesizer::{handle_event, Action, Config, Event};

register_plugin!(State);
register_worker!(ExportWorker, export_worker, EXPORT_WORKER);

/// Rows moved by `PageUp` / `PageDown` when the pane size is still unknown.
const FALLBACK_PAGE_STEP: i32 = 10;

/// Plugin state wrapper: the library state plus the host-facing settings.
struct State {
    app: AppState,
    client: ApiClient,
    scroll_delay_ms: u64,
}

impl Default for State {
    fn default() -> Self {
        let config = Config::default();
        Self {
            app: hypothesizer::initialize(&config),
            client: ApiClient::new(config.api_base_url),
            scroll_delay_ms: config.scroll_delay_ms,
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, builds the app state, asks for web access and
    /// subscribes to the events the workflow needs.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        hypothesizer::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(
            api_base_url = %config.api_base_url,
            export_dir = %config.export_dir,
            "parsed configuration"
        );

        self.app = hypothesizer::initialize(&config);
        self.client = ApiClient::new(config.api_base_url.clone());
        self.scroll_delay_ms = config.scroll_delay_ms;

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::CustomMessage,
            EventType::Timer,
            EventType::BeforeClose,
            EventType::PermissionRequestResult,
        ]);
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let _guard = tracing::debug_span!("plugin_update_event", event_type = %event_name).entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match api::completion_event(status, &body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::Timer(_elapsed) => Event::Timer,
            zellij_tile::prelude::Event::BeforeClose => Event::Teardown,
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                if matches!(status, PermissionStatus::Denied) {
                    tracing::warn!("web access denied, searches will fail");
                }
                return false;
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        // Scroll clamping needs the pane size before the frame is laid out.
        self.dispatch(&Event::Resize { rows, cols });
        hypothesizer::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled"
                );
                for action in &actions {
                    self.execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::BeforeClose => "BeforeClose".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn page_step(&self) -> i32 {
        i32::try_from(self.app.viewport.rows / 2)
            .ok()
            .filter(|step| *step > 0)
            .unwrap_or(FALLBACK_PAGE_STEP)
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if self.app.analysis.visible {
            return self.map_viewer_key(key);
        }

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('g') => Some(Event::Generate),
                BareKey::Char('s') => Some(Event::RequestAnalysis(AnalysisKind::Survey)),
                BareKey::Char('r') => Some(Event::RequestAnalysis(AnalysisKind::Gaps)),
                BareKey::Char('t') => Some(Event::RequestAnalysis(AnalysisKind::Trends)),
                BareKey::Char('n') => Some(Event::CursorDown),
                BareKey::Char('p') => Some(Event::CursorUp),
                _ => None,
            };
        }

        let step = self.page_step();
        match key.bare_key {
            BareKey::Tab if key.has_modifiers(&[KeyModifier::Shift]) => return Some(Event::FocusPrev),
            BareKey::Tab => return Some(Event::FocusNext),
            BareKey::PageDown => return Some(Event::ScrollPage(step)),
            BareKey::PageUp => return Some(Event::ScrollPage(-step)),
            BareKey::Esc => return Some(Event::Hide),
            _ => {}
        }

        let focus = self.app.focus;
        if focus.is_text_input() {
            return Some(match key.bare_key {
                BareKey::Enter if focus == Focus::Query => Event::SubmitSearch,
                BareKey::Enter => Event::Generate,
                BareKey::Backspace => Event::Backspace,
                BareKey::Down => Event::ScrollPage(1),
                BareKey::Up => Event::ScrollPage(-1),
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::CursorDown,
            BareKey::Up | BareKey::Char('k') => Event::CursorUp,
            BareKey::Enter | BareKey::Char('a') if focus == Focus::Results => Event::AddHighlighted,
            BareKey::Char('d') | BareKey::Delete | BareKey::Backspace if focus == Focus::Selection => {
                Event::RemoveHighlighted
            }
            BareKey::Char('q') => Event::Hide,
            _ => return None,
        })
    }

    fn map_viewer_key(&self, key: &KeyWithModifier) -> Option<Event> {
        let step = self.page_step();
        Some(match key.bare_key {
            BareKey::Esc | BareKey::Char('q') => Event::CloseViewer,
            BareKey::Char('e') => Event::ExportViewer,
            BareKey::Down | BareKey::Char('j') => Event::ViewerScroll(1),
            BareKey::Up | BareKey::Char('k') => Event::ViewerScroll(-1),
            BareKey::PageDown | BareKey::Char(' ') => Event::ViewerScroll(step),
            BareKey::PageUp => Event::ViewerScroll(-step),
            _ => return None,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
        }
    }

    fn send(request: HttpRequest) {
        let verb = match request.verb {
            Verb::Get => HttpVerb::Get,
            Verb::Post => HttpVerb::Post,
        };
        web_request(request.url, verb, request.headers, request.body, request.context);
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::Search { token, query } => {
                Self::send(self.client.search_request(*token, query));
            }
            Action::Generate { token, request } => match self.client.generate_request(*token, request) {
                Ok(http) => Self::send(http),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to build generation request");
                    self.dispatch(&Event::GenerationCompleted {
                        token: *token,
                        outcome: Err(e.to_string()),
                    });
                }
            },
            Action::Analyze { token, request } => match self.client.analysis_request(*token, request) {
                Ok(http) => Self::send(http),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to build analysis request");
                    self.dispatch(&Event::AnalysisCompleted {
                        token: *token,
                        outcome: Err(e.to_string()),
                    });
                }
            },
            #[allow(clippy::cast_precision_loss)]
            Action::ScheduleScroll => set_timeout(self.scroll_delay_ms as f64 / 1000.0),
            Action::PostToWorker(message) => Self::post_worker_message(message),
        }
    }
}
