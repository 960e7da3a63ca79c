//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute a [`UIViewModel`](crate::ui::viewmodel::UIViewModel)
//! from [`AppState`], then hand it to the component renderers, which print
//! ANSI escapes straight to stdout.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI for a pane of `rows` × `cols`.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows = rows, cols = cols).entered();
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_workflow(&viewmodel, &state.theme, cols, rows);
}
