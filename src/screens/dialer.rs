//! The Dialer tab: number readout over a 4x3 keypad plus call/delete keys.
//!
//! The dialer has no load state. It renders the current [`DialBuffer`]
//! continuously, and the buffer lives only as long as the screen: switching
//! tabs remounts the screen and starts a fresh, empty buffer.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::muted;

/// Keypad labels, laid out as rendered.
pub const KEYPAD_ROWS: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

/// True when `c` is a key on the dial pad.
pub fn is_keypad_char(c: char) -> bool {
    KEYPAD_ROWS.iter().flatten().any(|&label| label == c)
}

/// Digits typed by the user, in order.
///
/// No validation: the buffer accepts whatever label the keypad supplies,
/// `*` and `#` included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DialBuffer {
    value: String,
}

impl DialBuffer {
    /// Append a keypad label.
    pub fn append(&mut self, label: char) {
        self.value.push(label);
    }

    /// Remove exactly the last character; no-op when empty.
    pub fn delete_last(&mut self) {
        self.value.pop();
    }

    /// Current contents.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when nothing has been typed.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Controller for the dial pad.
#[derive(Debug, Default)]
pub struct DialerScreen {
    buffer: DialBuffer,
}

impl DialerScreen {
    /// Create a freshly mounted screen with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Press a keypad label.
    pub fn press(&mut self, label: char) {
        self.buffer.append(label);
    }

    /// Delete the last typed character.
    pub fn delete(&mut self) {
        self.buffer.delete_last();
    }

    /// The number typed so far.
    pub fn number(&self) -> &str {
        self.buffer.value()
    }

    /// Render the screen into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        self.render_readout(frame, chunks[0]);
        self.render_keypad(frame, chunks[1]);
    }

    fn render_readout(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = if self.buffer.is_empty() {
            ("Enter number", muted())
        } else {
            (
                self.buffer.value(),
                Style::default().add_modifier(Modifier::BOLD),
            )
        };
        let readout = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(readout, area);
    }

    fn render_keypad(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);
        for (row_index, labels) in KEYPAD_ROWS.iter().enumerate() {
            let Some(row_area) = rows.get(row_index).copied() else {
                continue;
            };
            let cells = keypad_columns(row_area);
            for (column, label) in labels.iter().enumerate() {
                if let Some(cell) = cells.get(column).copied() {
                    frame.render_widget(key_cell(label.to_string(), Style::default()), cell);
                }
            }
        }
        // The grid continues past `#` with the two action keys.
        if let Some(action_area) = rows.get(4).copied() {
            let cells = keypad_columns(action_area);
            if let Some(cell) = cells.first().copied() {
                let style = Style::default().fg(Color::Red);
                frame.render_widget(key_cell("Delete".to_owned(), style), cell);
            }
            if let Some(cell) = cells.get(1).copied() {
                let style = Style::default().fg(Color::Green);
                frame.render_widget(key_cell("Call".to_owned(), style), cell);
            }
        }
        if let Some(hint_area) = rows.get(5).copied() {
            let hint = Paragraph::new("Enter call   Backspace delete")
                .style(muted())
                .alignment(Alignment::Center);
            frame.render_widget(hint, hint_area);
        }
    }
}

/// Split a keypad row into its three equal columns.
fn keypad_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area)
}

/// A bordered, centered keypad cell.
fn key_cell(label: String, style: Style) -> Paragraph<'static> {
    Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}
