//! Registration screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use estatelist_core::Route;

use crate::action::{Action, Notification};
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::TextField};

pub struct RegisterScreen {
    email: TextField,
    password: TextField,
    confirm: TextField,
    focus: usize,
    submitting: bool,
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self {
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            confirm: TextField::masked("Confirm Password"),
            focus: 0,
            submitting: false,
        }
    }

    fn field_mut(&mut self, idx: usize) -> &mut TextField {
        match idx {
            1 => &mut self.password,
            2 => &mut self.confirm,
            _ => &mut self.email,
        }
    }
}

impl Screen for RegisterScreen {
    fn on_enter(&mut self, _route: &Route) {
        self.password.set_value("");
        self.confirm.set_value("");
        self.focus = 0;
        self.submitting = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::GoBack));
        }
        if self.submitting {
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % 3;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + 2) % 3;
                None
            }
            KeyCode::Enter => {
                if self.password.value() == self.confirm.value() {
                    self.submitting = true;
                    Some(Action::SubmitRegister {
                        email: self.email.value().trim().to_owned(),
                        password: self.password.value(),
                    })
                } else {
                    Some(Action::Notify(Notification::error("Passwords do not match")))
                }
            }
            _ => {
                let focus = self.focus;
                self.field_mut(focus).handle_key(key);
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if matches!(action, Action::Notify(n) if n.level == crate::action::NotificationLevel::Error)
        {
            self.submitting = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Create Account", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        self.email.render(frame, rows[0], self.focus == 0);
        self.password.render(frame, rows[1], self.focus == 1);
        self.confirm.render(frame, rows[2], self.focus == 2);

        let hint = if self.submitting {
            "Creating account..."
        } else {
            "[enter] register  [esc] back"
        };
        frame.render_widget(Paragraph::new(hint).style(theme::dim()), rows[3]);
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
