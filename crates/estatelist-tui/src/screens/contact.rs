//! Contact screen — form relayed through the contact edge function.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use estatelist_core::{ContactMessage, Route};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::TextField};

const FIELDS: usize = 5;

pub struct ContactScreen {
    name: TextField,
    email: TextField,
    phone: TextField,
    subject: TextField,
    message: TextField,
    focus: usize,
    submitting: bool,
}

impl ContactScreen {
    pub fn new() -> Self {
        Self {
            name: TextField::new("Name"),
            email: TextField::new("Email"),
            phone: TextField::new("Phone (optional)"),
            subject: TextField::new("Subject"),
            message: TextField::new("Message"),
            focus: 0,
            submitting: false,
        }
    }

    fn field_mut(&mut self, idx: usize) -> &mut TextField {
        match idx {
            1 => &mut self.email,
            2 => &mut self.phone,
            3 => &mut self.subject,
            4 => &mut self.message,
            _ => &mut self.name,
        }
    }

    fn to_message(&self) -> ContactMessage {
        let phone = self.phone.value();
        ContactMessage {
            name: self.name.value().trim().to_owned(),
            email: self.email.value().trim().to_owned(),
            phone: (!phone.trim().is_empty()).then(|| phone.trim().to_owned()),
            subject: self.subject.value().trim().to_owned(),
            message: self.message.value().trim().to_owned(),
        }
    }
}

impl Screen for ContactScreen {
    fn on_enter(&mut self, _route: &Route) {
        self.submitting = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::GoBack));
        }
        if self.submitting {
            return Ok(None);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submitting = true;
            return Ok(Some(Action::SubmitContact(Box::new(self.to_message()))));
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELDS - 1) % FIELDS;
                None
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
        if matches!(action, Action::Notify(_)) {
            self.submitting = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Contact Us", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        self.name.render(frame, rows[0], self.focus == 0);
        self.email.render(frame, rows[1], self.focus == 1);
        self.phone.render(frame, rows[2], self.focus == 2);
        self.subject.render(frame, rows[3], self.focus == 3);
        self.message.render(frame, rows[4], self.focus == 4);

        let hint = if self.submitting {
            "Sending..."
        } else {
            "[tab] next field  [ctrl+s] send  [esc] back"
        };
        frame.render_widget(Paragraph::new(hint).style(theme::dim()), rows[5]);
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
