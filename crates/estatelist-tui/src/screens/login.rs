//! Login screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use estatelist_core::{Route, RouteId};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::TextField};

pub struct LoginScreen {
    email: TextField,
    password: TextField,
    focus: usize,
    submitting: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            focus: 0,
            submitting: false,
        }
    }
}

impl Screen for LoginScreen {
    fn on_enter(&mut self, _route: &Route) {
        self.password.set_value("");
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

        if key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            && key.code == KeyCode::Char('r')
        {
            return Ok(Some(Action::Navigate(Route::new(RouteId::Register))));
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % 2;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + 1) % 2;
                None
            }
            KeyCode::Enter => {
                self.submitting = true;
                Some(Action::SubmitLogin {
                    email: self.email.value().trim().to_owned(),
                    password: self.password.value(),
                })
            }
            _ => {
                if self.focus == 0 {
                    self.email.handle_key(key);
                } else {
                    self.password.handle_key(key);
                }
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if matches!(action, Action::Notify(_)) {
            self.submitting = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Sign In", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        self.email.render(frame, rows[0], self.focus == 0);
        self.password.render(frame, rows[1], self.focus == 1);

        let hint = if self.submitting {
            "Signing in..."
        } else {
            "[enter] sign in  [esc] back"
        };
        frame.render_widget(Paragraph::new(hint).style(theme::dim()), rows[2]);
        frame.render_widget(
            Paragraph::new("No account? Press ctrl+r to register.").style(theme::dim()),
            rows[3],
        );
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
