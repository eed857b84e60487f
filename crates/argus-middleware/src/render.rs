//! Warning banner rendering.
//!
//! Turns a positive detection into the HTML fragment spliced into the
//! response: one line per repeated signature, wrapped in a fixed-position
//! banner that overlays the page without disturbing its layout.

use argus_core::QueryLog;

/// Inline style of the banner element. Fixed to the bottom edge and above
/// everything else so it stays visible on any page.
const BANNER_STYLE: &str = "z-index: 9999; position: fixed; bottom: 0; left: 0; \
     width: 100%; background-color: blue; color: white; text-align: center; padding: 5px;";

/// Renders the warning fragment for a log with repeated queries.
///
/// Lines appear in first-seen order, joined with `<br>`. Call only after
/// [`QueryLog::has_repetition`] returned true; an unrepeated log renders a
/// banner with no detail lines.
#[must_use]
pub fn render_warning(log: &QueryLog) -> String {
    format!(
        "<div style='{BANNER_STYLE}'>N+1 query detected! Check your queries. {}</div>",
        log.warnings().join("<br>")
    )
}
