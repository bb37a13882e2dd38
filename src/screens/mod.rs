//! Screen controllers and rendering for the three tabs.
//!
//! Each data screen owns an explicit load state ([`ScreenState`]) and the
//! generation of the fetch it is waiting for. Fetches run off the UI loop;
//! results come back as messages and are applied through `apply_fetch`,
//! which discards stale generations so a remount during an in-flight query
//! abandons the old result instead of displaying it.

pub mod contacts;
pub mod dialer;
pub mod recents;

pub use contacts::ContactsScreen;
pub use dialer::{DialBuffer, DialerScreen};
pub use recents::RecentsScreen;

use chrono::{Local, TimeZone};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{ListState, Paragraph};
use ratatui::Frame;

/// Load state of a data screen.
///
/// A screen starts in `Loading` on mount and transitions exactly once, via
/// the fetch completion message, to `Error` or `Loaded`. The state is then
/// terminal until the screen remounts, which restarts it at `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState<T> {
    /// The fetch is in flight.
    Loading,
    /// The fetch failed or a required permission was denied.
    Error(String),
    /// The fetch succeeded, possibly with zero rows.
    Loaded(Vec<T>),
}

impl<T> ScreenState<T> {
    /// True while the fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Timestamp format used in list rows: `dd/MM/yyyy HH:mm`, local time.
pub fn format_timestamp(date_ms: i64) -> String {
    match Local.timestamp_millis_opt(date_ms).single() {
        Some(moment) => moment.format("%d/%m/%Y %H:%M").to_string(),
        None => "unknown".to_owned(),
    }
}

/// Duration format used in list rows: minutes and zero-padded seconds.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Style for dimmed hint text.
pub(crate) fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Render `text` centered horizontally on the middle line of `area`.
pub(crate) fn render_centered(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let line = Rect {
        x: area.x,
        y: area.y.saturating_add(area.height / 2),
        width: area.width,
        height: area.height.min(1),
    };
    let message = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(message, line);
}

/// Step a list selection one row up or down, clamped to `len` rows.
pub(crate) fn step_selection(list: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        list.select(None);
        return;
    }
    let current = list.selected().unwrap_or(0);
    let next = if down {
        current.saturating_add(1).min(len.saturating_sub(1))
    } else {
        current.saturating_sub(1)
    };
    list.select(Some(next));
}
