//! Edit-listing screen. Pre-filled from the stored listing once the
//! app's fetch lands; ownership was already checked by the app before
//! navigation completed.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use estatelist_core::{Listing, Route};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::ListingFormFields};

pub struct EditScreen {
    form: ListingFormFields,
    current: Option<Box<Listing>>,
    submitting: bool,
    throbber: ThrobberState,
}

impl EditScreen {
    pub fn new() -> Self {
        Self {
            form: ListingFormFields::new("New image path (optional)"),
            current: None,
            submitting: false,
            throbber: ThrobberState::default(),
        }
    }
}

impl Screen for EditScreen {
    fn on_enter(&mut self, _route: &Route) {
        // The app fetches the listing and ships it via EditLoaded.
        self.current = None;
        self.submitting = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::GoBack));
        }
        let Some(ref current) = self.current else {
            return Ok(None);
        };
        if self.submitting {
            return Ok(None);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submitting = true;
            return Ok(Some(Action::SubmitEdit {
                current: current.clone(),
                form: Box::new(self.form.to_form()),
                image_path: self.form.image_path(),
            }));
        }

        self.form.handle_key(key);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::EditLoaded(listing) => {
                self.form.prefill(listing);
                self.current = Some(listing.clone());
            }
            Action::Notify(_) => self.submitting = false,
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if self.current.is_none() {
            widgets::render_loading(frame, area, "Loading listing", &mut self.throbber.clone());
            return;
        }

        let block = widgets::panel("Edit Listing", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Min(18),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);
        self.form.render(frame, rows[0]);

        if let Some(ref current) = self.current {
            let image = current.image_url.as_deref().unwrap_or("(none)");
            frame.render_widget(
                Paragraph::new(format!("Current image: {image}")).style(theme::dim()),
                rows[1],
            );
        }

        let hint = if self.submitting {
            "Updating..."
        } else {
            "[tab] next field  [ctrl+s] save  [esc] back"
        };
        frame.render_widget(Paragraph::new(hint).style(theme::dim()), rows[2]);
    }

    fn wants_text_input(&self) -> bool {
        self.current.is_some()
    }
}
