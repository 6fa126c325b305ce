//! Create-listing screen. Guard-protected; the app only navigates
//! here with a signed-in session.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use estatelist_core::Route;

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::ListingFormFields};

pub struct CreateScreen {
    form: ListingFormFields,
    submitting: bool,
}

impl CreateScreen {
    pub fn new() -> Self {
        Self {
            form: ListingFormFields::new("Image path (optional)"),
            submitting: false,
        }
    }
}

impl Screen for CreateScreen {
    fn on_enter(&mut self, _route: &Route) {
        self.form.clear();
        self.submitting = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::GoBack));
        }
        if self.submitting {
            return Ok(None);
        }

        // Ctrl+S submits; Enter stays field-navigation to keep
        // multi-line-free fields predictable.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submitting = true;
            return Ok(Some(Action::SubmitCreate {
                form: Box::new(self.form.to_form()),
                image_path: self.form.image_path(),
            }));
        }

        self.form.handle_key(key);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        // A notification means the submit finished (either way).
        if matches!(action, Action::Notify(_)) {
            self.submitting = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Create New Listing", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Min(18), Constraint::Length(1)]).split(inner);
        self.form.render(frame, rows[0]);

        let hint = if self.submitting {
            "Creating..."
        } else {
            "[tab] next field  [ctrl+s] create  [esc] back"
        };
        frame.render_widget(Paragraph::new(hint).style(theme::dim()), rows[1]);
    }

    fn wants_text_input(&self) -> bool {
        true
    }
}
