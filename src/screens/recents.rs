//! The Recents tab: call history, newest first.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::model::{CallLogEntry, CallType};
use crate::stores::StoreError;

use super::{format_duration, format_timestamp, muted, render_centered, step_selection, ScreenState};

/// Shown when the call-log permission is denied.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Call log permission is required to view recent calls";

/// Shown when the store has no rows.
const EMPTY_MESSAGE: &str = "No recent calls";

/// User-facing message for a failed call-log fetch.
pub fn failure_message(err: &StoreError) -> String {
    format!("Failed to load call logs: {err}")
}

/// Controller for the call-history list.
#[derive(Debug)]
pub struct RecentsScreen {
    generation: u64,
    state: ScreenState<CallLogEntry>,
    list: ListState,
}

impl RecentsScreen {
    /// Create a freshly mounted screen in the loading state, waiting for
    /// the fetch tagged `generation`.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            state: ScreenState::Loading,
            list: ListState::default(),
        }
    }

    /// Generation of the fetch this screen is waiting for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current load state.
    pub fn state(&self) -> &ScreenState<CallLogEntry> {
        &self.state
    }

    /// Apply a fetch completion.
    ///
    /// A result from a stale generation is discarded, and a state that has
    /// already left `Loading` is never overwritten.
    pub fn apply_fetch(&mut self, generation: u64, outcome: Result<Vec<CallLogEntry>, String>) {
        if generation != self.generation || !self.state.is_loading() {
            return;
        }
        self.state = match outcome {
            Ok(entries) => {
                if !entries.is_empty() {
                    self.list.select(Some(0));
                }
                ScreenState::Loaded(entries)
            }
            Err(message) => ScreenState::Error(message),
        };
    }

    /// Move the selection down one row.
    pub fn select_next(&mut self) {
        if let ScreenState::Loaded(entries) = &self.state {
            step_selection(&mut self.list, entries.len(), true);
        }
    }

    /// Move the selection up one row.
    pub fn select_prev(&mut self) {
        if let ScreenState::Loaded(entries) = &self.state {
            step_selection(&mut self.list, entries.len(), false);
        }
    }

    /// Number of the currently selected entry, if any.
    pub fn selected_number(&self) -> Option<&str> {
        match &self.state {
            ScreenState::Loaded(entries) => {
                let index = self.list.selected()?;
                entries.get(index).map(|entry| entry.number.as_str())
            }
            _ => None,
        }
    }

    /// Render the screen into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem<'static>> = match &self.state {
            ScreenState::Loading => {
                render_centered(frame, area, "Loading...", muted());
                return;
            }
            ScreenState::Error(message) => {
                render_centered(frame, area, message, Style::default());
                return;
            }
            ScreenState::Loaded(entries) if entries.is_empty() => {
                render_centered(frame, area, EMPTY_MESSAGE, muted());
                return;
            }
            ScreenState::Loaded(entries) => entries.iter().map(row_item).collect(),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Recents "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.list);
    }
}

/// Build the two-line list row for one call.
fn row_item(entry: &CallLogEntry) -> ListItem<'static> {
    let title = Line::from(vec![
        Span::styled(
            format!("{:<3}", entry.initial()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(entry.display_name().to_owned()),
    ]);
    let detail = Line::from(vec![
        Span::raw("   "),
        Span::styled(
            entry.call_type.label().to_owned(),
            Style::default().fg(call_type_color(entry.call_type)),
        ),
        Span::styled(
            format!(
                "  {}  {}",
                format_timestamp(entry.date_ms),
                format_duration(entry.duration_seconds)
            ),
            muted(),
        ),
    ]);
    ListItem::new(vec![title, detail])
}

/// List color for a call-type label.
fn call_type_color(call_type: CallType) -> Color {
    match call_type {
        CallType::Incoming => Color::Green,
        CallType::Outgoing => Color::Blue,
        CallType::Missed => Color::Red,
        CallType::Unknown => Color::DarkGray,
    }
}
