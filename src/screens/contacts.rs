//! The Contacts tab: the address book, alphabetical.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::model::Contact;
use crate::stores::StoreError;

use super::{muted, render_centered, step_selection, ScreenState};

/// Shown when the contacts permission is denied.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Contacts permission is required to view your contacts";

/// Shown when the store has no rows.
const EMPTY_MESSAGE: &str = "No contacts";

/// User-facing message for a failed contacts fetch.
pub fn failure_message(err: &StoreError) -> String {
    format!("Failed to load contacts: {err}")
}

/// Controller for the contacts list.
#[derive(Debug)]
pub struct ContactsScreen {
    generation: u64,
    state: ScreenState<Contact>,
    list: ListState,
}

impl ContactsScreen {
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
    pub fn state(&self) -> &ScreenState<Contact> {
        &self.state
    }

    /// Apply a fetch completion. Same staleness rules as the recents
    /// screen: wrong generation or a state past `Loading` means discard.
    pub fn apply_fetch(&mut self, generation: u64, outcome: Result<Vec<Contact>, String>) {
        if generation != self.generation || !self.state.is_loading() {
            return;
        }
        self.state = match outcome {
            Ok(contacts) => {
                if !contacts.is_empty() {
                    self.list.select(Some(0));
                }
                ScreenState::Loaded(contacts)
            }
            Err(message) => ScreenState::Error(message),
        };
    }

    /// Move the selection down one row.
    pub fn select_next(&mut self) {
        if let ScreenState::Loaded(contacts) = &self.state {
            step_selection(&mut self.list, contacts.len(), true);
        }
    }

    /// Move the selection up one row.
    pub fn select_prev(&mut self) {
        if let ScreenState::Loaded(contacts) = &self.state {
            step_selection(&mut self.list, contacts.len(), false);
        }
    }

    /// Number of the selected contact. A contact without a number is not
    /// callable, so this is `None` for it.
    pub fn selected_number(&self) -> Option<&str> {
        match &self.state {
            ScreenState::Loaded(contacts) => {
                let index = self.list.selected()?;
                contacts
                    .get(index)
                    .and_then(|contact| contact.phone_number.as_deref())
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
            ScreenState::Loaded(contacts) if contacts.is_empty() => {
                render_centered(frame, area, EMPTY_MESSAGE, muted());
                return;
            }
            ScreenState::Loaded(contacts) => contacts.iter().map(row_item).collect(),
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Contacts "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.list);
    }
}

/// Build the two-line list row for one contact.
fn row_item(contact: &Contact) -> ListItem<'static> {
    let title = Line::from(vec![
        Span::styled(
            format!("{:<3}", contact.initial()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(contact.name.clone()),
    ]);
    let detail = match &contact.phone_number {
        Some(number) => Line::from(Span::raw(format!("   {number}"))),
        None => Line::from(Span::styled("   No number", muted())),
    };
    ListItem::new(vec![title, detail])
}
