//! Full-screen terminal frontend over the controller's published views.
//!
//! Key bindings:
//! - `Tab` or `h`/`l` switch between the active and completed buckets
//! - `j`/`k` or the arrow keys move the selection, `Space` toggles completion
//! - `a` opens the entry form, `d` asks before deleting the selected task
//! - `r` reloads from the store, `q` quits

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::CHANNEL_SIZE;
use crate::controller::{ControllerHandle, Intent, Notice, Stats, View, ViewFilter};
use crate::model::Task;

use super::confirm::{ConfirmAction, ConfirmDialog};
use super::form::{FormAction, TaskForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    Editing,
    Confirming,
}

pub struct App {
    view: View,
    mode: InputMode,
    form: TaskForm,
    confirm: Option<ConfirmDialog>,
    selection: ListState,
    alert: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(view: View) -> Self {
        let mut app = Self {
            view: View::default(),
            mode: InputMode::default(),
            form: TaskForm::default(),
            confirm: None,
            selection: ListState::default(),
            alert: None,
            should_quit: false,
        };
        app.apply_view(view);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ---- Input handling ----

    /// Feed a key event to whichever component owns the focus. Returns the
    /// intent the controller should run, if the key amounts to one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        // ctrl-c quits from any mode
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        // an alert blocks everything until it is dismissed
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return None;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing => self.handle_form_key(key),
            InputMode::Confirming => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => Some(Intent::SetFilter(self.view.filter.toggled())),
            KeyCode::Left | KeyCode::Char('h') => Some(Intent::SetFilter(ViewFilter::Active)),
            KeyCode::Right | KeyCode::Char('l') => Some(Intent::SetFilter(ViewFilter::Completed)),
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Char(' ') => self.selected_task().map(|task| Intent::Toggle(task.id)),
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.confirm = Some(ConfirmDialog::new(task.id, task.title.clone()));
                    self.mode = InputMode::Confirming;
                }
                None
            }
            KeyCode::Char('a') => {
                if self.view.filter == ViewFilter::Active {
                    self.mode = InputMode::Editing;
                }
                None
            }
            KeyCode::Char('r') => Some(Intent::Load),
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match self.form.handle_key(key) {
            Some(FormAction::Submit { title, priority }) => {
                if self.view.busy {
                    return None;
                }
                Some(Intent::Add { title, priority })
            }
            Some(FormAction::Cancel) => {
                self.mode = InputMode::Normal;
                None
            }
            None => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let action = match &self.confirm {
            Some(dialog) => dialog.handle_key(key),
            None => {
                self.mode = InputMode::Normal;
                return None;
            }
        };
        match action {
            Some(ConfirmAction::Confirm(id)) => {
                self.confirm = None;
                self.mode = InputMode::Normal;
                Some(Intent::Delete(id))
            }
            Some(ConfirmAction::Cancel) => {
                self.confirm = None;
                self.mode = InputMode::Normal;
                None
            }
            None => None,
        }
    }

    fn select_next(&mut self) {
        if self.view.tasks.is_empty() {
            return;
        }
        let next = self
            .selection
            .selected()
            .map_or(0, |i| (i + 1).min(self.view.tasks.len() - 1));
        self.selection.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.view.tasks.is_empty() {
            return;
        }
        let prev = self.selection.selected().map_or(0, |i| i.saturating_sub(1));
        self.selection.select(Some(prev));
    }

    fn selected_task(&self) -> Option<&Task> {
        self.selection
            .selected()
            .and_then(|i| self.view.tasks.get(i))
    }

    // ---- Controller events ----

    pub fn apply_view(&mut self, view: View) {
        self.view = view;
        let len = self.view.tasks.len();
        match self.selection.selected() {
            Some(_) if len == 0 => self.selection.select(None),
            Some(i) if i >= len => self.selection.select(Some(len - 1)),
            None if len > 0 => self.selection.select(Some(0)),
            _ => {}
        }
    }

    pub fn apply_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Added => {
                self.form.clear_title();
                self.mode = InputMode::Normal;
            }
            Notice::AddFailed(reason) => {
                self.alert = Some(format!("Failed to add task: {}", reason));
            }
            Notice::DeleteFailed(reason) => {
                self.alert = Some(format!("Failed to delete task: {}", reason));
            }
        }
    }

    // ---- Rendering ----

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let show_form = self.view.filter == ViewFilter::Active;
        let mut constraints = vec![Constraint::Length(1)];
        if show_form {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_tabs(frame, chunks[0]);
        let mut next = 1;
        if show_form {
            self.form.render(
                frame,
                chunks[next],
                self.mode == InputMode::Editing,
                self.view.busy,
            );
            next += 1;
        }
        self.render_list(frame, chunks[next]);
        self.render_footer(frame, chunks[next + 1]);

        if let Some(dialog) = &self.confirm {
            dialog.render(frame, area);
        }
        if let Some(alert) = &self.alert {
            render_alert(frame, area, alert);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let stats = &self.view.stats;
        let picked = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let idle = Style::default().add_modifier(Modifier::DIM);
        let (active_style, completed_style) = match self.view.filter {
            ViewFilter::Active => (picked, idle),
            ViewFilter::Completed => (idle, picked),
        };
        let line = Line::from(vec![
            Span::styled(" taskpad ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("\u{2502}"),
            Span::styled(tab_label(ViewFilter::Active, stats), active_style),
            Span::raw("\u{2502}"),
            Span::styled(tab_label(ViewFilter::Completed, stats), completed_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        if self.view.loading {
            frame.render_widget(
                Paragraph::new("Loading tasks\u{2026}")
                    .style(Style::default().add_modifier(Modifier::DIM)),
                area,
            );
            return;
        }
        if self.view.tasks.is_empty() {
            let text = match self.view.filter {
                ViewFilter::Active => "No active tasks. Press a to add one.",
                ViewFilter::Completed => "No completed tasks yet.",
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM)),
                area,
            );
            return;
        }
        let items: Vec<ListItem> = self.view.tasks.iter().map(task_row).collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
            .highlight_symbol("\u{25b8} ");
        frame.render_stateful_widget(list, area, &mut self.selection);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.alert.is_some() {
            "Enter dismiss"
        } else {
            match self.mode {
                InputMode::Normal => "a add  Space toggle  d delete  Tab switch  j/k move  q quit",
                InputMode::Editing => "Enter save  \u{2190}/\u{2192} priority  Esc close",
                InputMode::Confirming => "y delete  n keep",
            }
        };
        frame.render_widget(
            Paragraph::new(hints).style(Style::default().add_modifier(Modifier::DIM)),
            area,
        );
    }
}

fn tab_label(filter: ViewFilter, stats: &Stats) -> String {
    let count = match filter {
        ViewFilter::Active => stats.active,
        ViewFilter::Completed => stats.completed,
    };
    format!(" {} ({}) ", filter.label(), count)
}

fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let dialog = super::centered(area, 50, 6);
    frame.render_widget(Clear, dialog);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .border_style(Style::default().fg(Color::Red));
    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter dismiss",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        dialog,
    );
}

fn task_row(task: &Task) -> ListItem<'_> {
    let checkbox = if task.is_completed { "[x] " } else { "[ ] " };
    let mut title_style = Style::default();
    if task.is_completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    let mut spans = vec![
        Span::raw(checkbox),
        Span::styled(task.title.clone(), title_style),
        Span::styled(
            format!("  {}", task.priority.label()),
            Style::default().fg(super::priority_color(task.priority)),
        ),
    ];
    if let Some(due) = task.due_date {
        spans.push(Span::styled(
            format!("  due {}", due),
            Style::default().fg(Color::Magenta),
        ));
    }
    let mut lines = vec![Line::from(spans)];
    if let Some(description) = &task.description {
        lines.push(Line::from(Span::styled(
            format!("    {}", description),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    ListItem::new(lines)
}

/// Take over the terminal until the user quits, then hand it back.
pub async fn run(mut handle: ControllerHandle) -> Result<()> {
    let mut terminal = ratatui::init();
    let outcome = run_app(&mut terminal, &mut handle).await;
    ratatui::restore();
    outcome
}

async fn run_app(terminal: &mut DefaultTerminal, handle: &mut ControllerHandle) -> Result<()> {
    info!("Starting terminal loop.");
    let mut app = App::new(handle.view.borrow().clone());
    let (key_tx, mut key_rx) = mpsc::channel::<KeyEvent>(CHANNEL_SIZE);
    let stop = Arc::new(AtomicBool::new(false));
    let pump = spawn_input_pump(key_tx, stop.clone());

    handle.intents.send(Intent::Load).await?;

    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            key = key_rx.recv() => {
                let key = match key {
                    Some(key) => key,
                    None => break,
                };
                if let Some(intent) = app.handle_key(key) {
                    handle.intents.send(intent).await?;
                }
                if app.should_quit() {
                    break;
                }
            }
            changed = handle.view.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = handle.view.borrow_and_update().clone();
                app.apply_view(view);
            }
            notice = handle.notices.recv() => {
                match notice {
                    Some(notice) => app.apply_notice(notice),
                    None => break,
                }
            }
        }
    }

    stop.store(true, Ordering::SeqCst);
    let _ = pump.join();
    info!("Finishing terminal loop.");
    Ok(())
}

/// Read terminal events on a dedicated thread. Crossterm's reader blocks,
/// so polling with a timeout keeps the stop flag responsive.
fn spawn_input_pump(tx: mpsc::Sender<KeyEvent>, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::SeqCst) {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.blocking_send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(reason = %err, "Unable to read terminal input.");
                        break;
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    warn!(reason = %err, "Unable to poll terminal input.");
                    break;
                }
            }
        }
    })
}
