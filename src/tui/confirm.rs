//! Centered yes/no overlay guarding task deletion.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

use super::centered;

/// Outcome of a key press inside the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Go ahead and delete the named task.
    Confirm(Uuid),
    /// Keep the task and close the dialog.
    Cancel,
}

#[derive(Debug)]
pub struct ConfirmDialog {
    task_id: Uuid,
    title: String,
}

impl ConfirmDialog {
    pub fn new(task_id: Uuid, title: String) -> Self {
        Self { task_id, title }
    }

    pub fn handle_key(&self, key: KeyEvent) -> Option<ConfirmAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(ConfirmAction::Confirm(self.task_id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(ConfirmAction::Cancel),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog = centered(area, 44, 5);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Delete task ")
            .border_style(Style::default().fg(Color::Red));
        let lines = vec![
            Line::from(format!("Delete \"{}\"?", self.title)),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" delete  "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" keep"),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            dialog,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> ConfirmDialog {
        ConfirmDialog::new(Uuid::new_v4(), "Buy milk".to_string())
    }

    #[test]
    fn confirm_on_y_or_enter() {
        let dialog = dialog();

        assert_eq!(
            dialog.handle_key(KeyEvent::from(KeyCode::Char('y'))),
            Some(ConfirmAction::Confirm(dialog.task_id))
        );
        assert_eq!(
            dialog.handle_key(KeyEvent::from(KeyCode::Enter)),
            Some(ConfirmAction::Confirm(dialog.task_id))
        );
    }

    #[test]
    fn cancel_on_n_or_esc() {
        let dialog = dialog();

        assert_eq!(
            dialog.handle_key(KeyEvent::from(KeyCode::Char('n'))),
            Some(ConfirmAction::Cancel)
        );
        assert_eq!(
            dialog.handle_key(KeyEvent::from(KeyCode::Esc)),
            Some(ConfirmAction::Cancel)
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        let dialog = dialog();

        assert_eq!(dialog.handle_key(KeyEvent::from(KeyCode::Char('x'))), None);
        assert_eq!(dialog.handle_key(KeyEvent::from(KeyCode::Tab)), None);
    }

    #[test]
    fn centered_rect_fits_inside_the_area() {
        let area = Rect::new(0, 0, 80, 24);

        let dialog = centered(area, 44, 5);

        assert_eq!(dialog, Rect::new(18, 9, 44, 5));

        let tiny = centered(Rect::new(0, 0, 10, 3), 44, 5);
        assert!(tiny.width <= 10);
        assert!(tiny.height <= 3);
    }
}
