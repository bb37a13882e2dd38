//! Application shell: tab state, terminal setup/teardown, and the UI loop.
//!
//! The UI loop is synchronous (crossterm polling) and runs on a blocking
//! thread on top of the tokio runtime. Store fetches and call hand-offs run
//! as spawned tasks; each completion crosses back into the loop as an
//! [`AppEvent`] over an unbounded channel drained every tick. Permission
//! prompts arrive the same way on their own channel and queue up as modal
//! dialogs; while one is visible it captures all input except Ctrl-C.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::RotaryConfig;
use crate::dialing::{CallInitiator, CallOutcome};
use crate::model::{CallLogEntry, Contact};
use crate::permissions::{Permission, PermissionDecision, PermissionGate, PromptRequest};
use crate::screens::dialer::is_keypad_char;
use crate::screens::{contacts, muted, recents};
use crate::screens::{ContactsScreen, DialerScreen, RecentsScreen};
use crate::stores;

/// Shell error types.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// Terminal backend failure.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Bottom navigation tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Call history.
    Recents,
    /// Keypad.
    Dialer,
    /// Address book.
    Contacts,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::Recents, Tab::Dialer, Tab::Contacts];

    /// Title shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Self::Recents => "Recents",
            Self::Dialer => "Dialer",
            Self::Contacts => "Contacts",
        }
    }

    /// Next tab, cycling forward.
    pub fn next(self) -> Self {
        match self {
            Self::Recents => Self::Dialer,
            Self::Dialer => Self::Contacts,
            Self::Contacts => Self::Recents,
        }
    }

    /// Previous tab, cycling backward.
    pub fn prev(self) -> Self {
        match self {
            Self::Recents => Self::Contacts,
            Self::Dialer => Self::Recents,
            Self::Contacts => Self::Dialer,
        }
    }
}

/// Messages crossing from spawned tasks back into the UI loop.
enum AppEvent {
    /// A call-log fetch completed.
    RecentsLoaded {
        generation: u64,
        outcome: Result<Vec<CallLogEntry>, String>,
    },
    /// A contacts fetch completed.
    ContactsLoaded {
        generation: u64,
        outcome: Result<Vec<Contact>, String>,
    },
    /// A call hand-off completed.
    CallFinished {
        number: String,
        outcome: CallOutcome,
    },
}

/// Main application state.
pub struct App {
    tab: Tab,
    recents: RecentsScreen,
    dialer: DialerScreen,
    contacts: ContactsScreen,
    /// Pending permission dialogs; the front one is visible.
    prompt_queue: VecDeque<PromptRequest>,
    status: Option<String>,
    fetch_generation: u64,
    should_quit: bool,
    needs_redraw: bool,
    tick: Duration,
    gate: PermissionGate,
    initiator: CallInitiator,
    call_log_db: PathBuf,
    contacts_db: PathBuf,
    runtime: Handle,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    prompts_rx: mpsc::UnboundedReceiver<PromptRequest>,
}

impl App {
    /// Build the shell and mount the initial Recents screen, which kicks
    /// off the first permission check and fetch.
    pub fn new(
        config: &RotaryConfig,
        gate: PermissionGate,
        initiator: CallInitiator,
        prompts_rx: mpsc::UnboundedReceiver<PromptRequest>,
        runtime: Handle,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            tab: Tab::Recents,
            recents: RecentsScreen::new(0),
            dialer: DialerScreen::new(),
            contacts: ContactsScreen::new(0),
            prompt_queue: VecDeque::new(),
            status: None,
            fetch_generation: 0,
            should_quit: false,
            needs_redraw: true,
            tick: Duration::from_millis(config.ui.tick_ms),
            gate,
            initiator,
            call_log_db: PathBuf::from(&config.paths.call_log_db),
            contacts_db: PathBuf::from(&config.paths.contacts_db),
            runtime,
            events_tx,
            events_rx,
            prompts_rx,
        };
        app.mount(Tab::Recents);
        app
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Request a redraw on the next loop pass.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Check if a redraw is needed and clear the flag.
    pub fn take_redraw(&mut self) -> bool {
        let needed = self.needs_redraw;
        self.needs_redraw = false;
        needed
    }

    /// Switch to `tab`, recreating its screen (remount).
    ///
    /// Data screens restart at `Loading` with a fresh fetch generation, so
    /// an in-flight result for the previous mount is discarded on arrival.
    /// The dialer restarts with an empty buffer.
    fn mount(&mut self, tab: Tab) {
        self.tab = tab;
        self.status = None;
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
        let generation = self.fetch_generation;
        match tab {
            Tab::Recents => {
                self.recents = RecentsScreen::new(generation);
                self.spawn_recents_fetch(generation);
            }
            Tab::Dialer => {
                self.dialer = DialerScreen::new();
            }
            Tab::Contacts => {
                self.contacts = ContactsScreen::new(generation);
                self.spawn_contacts_fetch(generation);
            }
        }
    }

    fn spawn_recents_fetch(&self, generation: u64) {
        let gate = self.gate.clone();
        let path = self.call_log_db.clone();
        let events = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = if gate.ensure(Permission::ReadCallLog).await.is_granted() {
                stores::call_log::fetch(&path).await.map_err(|e| {
                    warn!(error = %e, "call-log fetch failed");
                    recents::failure_message(&e)
                })
            } else {
                Err(recents::PERMISSION_DENIED_MESSAGE.to_owned())
            };
            let _ = events.send(AppEvent::RecentsLoaded {
                generation,
                outcome,
            });
        });
    }

    fn spawn_contacts_fetch(&self, generation: u64) {
        let gate = self.gate.clone();
        let path = self.contacts_db.clone();
        let events = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = if gate.ensure(Permission::ReadContacts).await.is_granted() {
                stores::contacts::fetch(&path).await.map_err(|e| {
                    warn!(error = %e, "contacts fetch failed");
                    contacts::failure_message(&e)
                })
            } else {
                Err(contacts::PERMISSION_DENIED_MESSAGE.to_owned())
            };
            let _ = events.send(AppEvent::ContactsLoaded {
                generation,
                outcome,
            });
        });
    }

    /// Route `number` through the call initiator on the runtime.
    fn place_call(&self, number: String) {
        let initiator = self.initiator.clone();
        let events = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = initiator.call(&number).await;
            let _ = events.send(AppEvent::CallFinished { number, outcome });
        });
    }

    /// Drain completed task messages and queued prompts.
    ///
    /// Returns true when anything changed, so the loop can redraw.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(request) = self.prompts_rx.try_recv() {
            self.prompt_queue.push_back(request);
            changed = true;
        }
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            changed = true;
        }
        changed
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RecentsLoaded {
                generation,
                outcome,
            } => self.recents.apply_fetch(generation, outcome),
            AppEvent::ContactsLoaded {
                generation,
                outcome,
            } => self.contacts.apply_fetch(generation, outcome),
            AppEvent::CallFinished { number, outcome } => {
                // Suppressed hand-offs stay silent.
                if outcome == CallOutcome::Dispatched {
                    self.status = Some(format!("Calling {number}..."));
                }
            }
        }
    }

    /// Handle a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }
            // Ctrl-C quits even while a prompt is up.
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.should_quit = true;
                return;
            }
            if !self.prompt_queue.is_empty() {
                self.handle_prompt_key(key.code);
            } else {
                match key.code {
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Tab => self.mount(self.tab.next()),
                    KeyCode::BackTab => self.mount(self.tab.prev()),
                    code => self.handle_screen_key(code),
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Resolve the visible prompt. Unmatched keys are swallowed: a visible
    /// dialog captures all input.
    fn handle_prompt_key(&mut self, code: KeyCode) {
        let decision = match code {
            KeyCode::Char('a') | KeyCode::Char('y') => PermissionDecision::Granted,
            KeyCode::Char('d') | KeyCode::Char('n') | KeyCode::Esc => PermissionDecision::Denied,
            _ => return,
        };
        if let Some(request) = self.prompt_queue.pop_front() {
            debug!(
                permission = request.permission.wire_name(),
                granted = decision.is_granted(),
                "prompt answered"
            );
            // The requester may have given up waiting; nothing to do then.
            let _ = request.responder.send(decision);
        }
    }

    fn handle_screen_key(&mut self, code: KeyCode) {
        match self.tab {
            Tab::Recents => match code {
                KeyCode::Down => self.recents.select_next(),
                KeyCode::Up => self.recents.select_prev(),
                KeyCode::Enter => {
                    if let Some(number) = self.recents.selected_number() {
                        self.place_call(number.to_owned());
                    }
                }
                _ => {}
            },
            Tab::Dialer => match code {
                KeyCode::Char(c) if is_keypad_char(c) => self.dialer.press(c),
                KeyCode::Backspace => self.dialer.delete(),
                KeyCode::Enter => {
                    if !self.dialer.number().is_empty() {
                        self.place_call(self.dialer.number().to_owned());
                    }
                }
                _ => {}
            },
            Tab::Contacts => match code {
                KeyCode::Down => self.contacts.select_next(),
                KeyCode::Up => self.contacts.select_prev(),
                KeyCode::Enter => {
                    if let Some(number) = self.contacts.selected_number() {
                        self.place_call(number.to_owned());
                    }
                }
                _ => {}
            },
        }
    }

    /// Render the full frame: active screen, navigation bar, status line,
    /// and the front permission dialog when one is queued.
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());
        match self.tab {
            Tab::Recents => self.recents.render(frame, chunks[0]),
            Tab::Dialer => self.dialer.render(frame, chunks[0]),
            Tab::Contacts => self.contacts.render(frame, chunks[0]),
        }
        self.render_nav(frame, chunks[1]);
        self.render_status(frame, chunks[2]);
        if let Some(request) = self.prompt_queue.front() {
            render_prompt(frame, request);
        }
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.title()).collect();
        let index = Tab::ALL
            .iter()
            .position(|tab| *tab == self.tab)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(index)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" | ");
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let text = self
            .status
            .as_deref()
            .unwrap_or("Tab switch | Up/Down select | Enter call | q quit");
        frame.render_widget(Paragraph::new(text).style(muted()), area);
    }
}

/// Render the grant dialog for `request` centered over the screen.
fn render_prompt(frame: &mut Frame, request: &PromptRequest) {
    let area = modal_area(frame.area());
    let text = format!("Allow rotary to {}?", request.permission.description());
    let dialog = Paragraph::new(vec![
        Line::from(text),
        Line::from(""),
        Line::from("[a]llow    [d]eny    Esc dismiss"),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Permission "));
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// Centered dialog rectangle inside `area`.
fn modal_area(area: Rect) -> Rect {
    let width = area.width.min(52);
    let height = area.height.min(5);
    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Initialize the terminal for UI rendering.
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, UiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), UiError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the UI until the user quits.
///
/// Sets up the terminal, drives the render/event loop, and restores the
/// terminal even when the loop fails.
pub fn run(mut app: App) -> Result<(), UiError> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Always try to restore the terminal, even if the loop failed.
    let restore_result = restore_terminal(&mut terminal);

    result?;
    restore_result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), UiError> {
    loop {
        if app.take_redraw() {
            terminal.draw(|frame| app.render(frame))?;
        }

        if event::poll(app.tick)? {
            let event = event::read()?;
            app.handle_event(event);
        }

        if app.drain_events() {
            app.request_redraw();
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
