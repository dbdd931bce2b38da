//! Inline entry form: a one-line title input plus a priority selector
//! cycled with Left/Right or Tab.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::Priority;

/// What the form wants the caller to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Hand the typed title and chosen priority to the controller.
    Submit { title: String, priority: Priority },
    /// Close the form without creating anything.
    Cancel,
}

#[derive(Debug, Default)]
pub struct TaskForm {
    title: String,
    priority: Priority,
}

impl TaskForm {
    /// Feed a key event to the form. Enter on a blank title is ignored
    /// rather than cancelled so a stray press cannot lose the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Esc => Some(FormAction::Cancel),
            KeyCode::Enter => {
                if self.title.trim().is_empty() {
                    None
                } else {
                    Some(FormAction::Submit {
                        title: self.title.clone(),
                        priority: self.priority,
                    })
                }
            }
            KeyCode::Left => {
                self.priority = self.priority.prev();
                None
            }
            KeyCode::Right | KeyCode::Tab => {
                self.priority = self.priority.next();
                None
            }
            KeyCode::Backspace => {
                self.title.pop();
                None
            }
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.title.push(c);
                }
                None
            }
            _ => None,
        }
    }

    /// Wipe the typed title. The chosen priority sticks for the next entry.
    pub fn clear_title(&mut self) {
        self.title.clear();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, busy: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" New task ")
            .border_style(border_style);

        let mut spans = Vec::new();
        if focused {
            spans.push(Span::raw(format!("{}\u{2588}", self.title)));
        } else if self.title.is_empty() {
            spans.push(Span::styled(
                "press a to add a task",
                Style::default().add_modifier(Modifier::DIM),
            ));
        } else {
            spans.push(Span::raw(self.title.clone()));
        }

        spans.push(Span::raw("  "));
        if busy {
            spans.push(Span::styled(
                "refining\u{2026}",
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            ));
        } else {
            for (idx, priority) in [Priority::Low, Priority::Medium, Priority::High]
                .into_iter()
                .enumerate()
            {
                if idx > 0 {
                    spans.push(Span::raw(" "));
                }
                let mut style = Style::default().fg(super::priority_color(priority));
                if priority == self.priority {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                } else {
                    style = style.add_modifier(Modifier::DIM);
                }
                spans.push(Span::styled(format!(" {} ", priority.label()), style));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub fn priority(&self) -> Priority {
        self.priority
    }
}
