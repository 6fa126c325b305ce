//! Listing details screen. Owners can edit or delete from here;
//! everyone else can start a purchase.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use throbber_widgets_tui::ThrobberState;

use estatelist_core::{Listing, Route, SessionState, UserId};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets;

enum DetailsState {
    Loading,
    Loaded(Box<Listing>),
    Missing,
}

pub struct DetailsScreen {
    state: DetailsState,
    current_user: Option<UserId>,
    /// Armed by the first `d`; the second `d` actually deletes.
    confirm_delete: bool,
    throbber: ThrobberState,
}

impl DetailsScreen {
    pub fn new() -> Self {
        Self {
            state: DetailsState::Loading,
            current_user: None,
            confirm_delete: false,
            throbber: ThrobberState::default(),
        }
    }

    fn listing(&self) -> Option<&Listing> {
        match self.state {
            DetailsState::Loaded(ref l) => Some(l),
            _ => None,
        }
    }

    fn is_owner(&self) -> bool {
        match (self.listing(), self.current_user) {
            (Some(listing), Some(user)) => listing.owned_by(user),
            _ => false,
        }
    }
}

impl Screen for DetailsScreen {
    fn on_enter(&mut self, _route: &Route) {
        // The app issues the fetch; show the placeholder until it lands.
        self.state = DetailsState::Loading;
        self.confirm_delete = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(listing) = self.listing().cloned() else {
            return Ok(None);
        };

        let action = match key.code {
            KeyCode::Char('e') if self.is_owner() => {
                Some(Action::Navigate(Route::edit_listing(listing.id)))
            }
            KeyCode::Char('d') if self.is_owner() => {
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(Action::RequestDelete(Box::new(listing.clone())))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            KeyCode::Char('b') => Some(Action::RequestPayment(Box::new(listing.clone()))),
            _ => {
                self.confirm_delete = false;
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DetailsLoaded(listing) => {
                self.state = DetailsState::Loaded(listing.clone());
            }
            Action::SessionChanged(state) => {
                self.current_user = match state {
                    SessionState::SignedIn(session) => Some(session.user.id),
                    _ => None,
                };
            }
            Action::DetailsFailed => {
                self.state = DetailsState::Missing;
            }
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let listing = match self.state {
            DetailsState::Loading => {
                widgets::render_loading(frame, area, "Loading listing", &mut self.throbber.clone());
                return;
            }
            DetailsState::Missing => {
                widgets::render_message(frame, area, "Listing", "Listing not found");
                return;
            }
            DetailsState::Loaded(ref l) => l,
        };

        let block = widgets::panel(&listing.title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // location
            Constraint::Length(1), // price
            Constraint::Length(1), // facts
            Constraint::Length(1), // image / listed
            Constraint::Length(1),
            Constraint::Min(3),   // description
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(listing.location.clone()).style(theme::dim()),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(format!("${:.0}", listing.price)).style(theme::price_style()),
            rows[1],
        );
        frame.render_widget(
            Paragraph::new(format!(
                "{} · {} bd · {} ba · {} sqft",
                listing.property_type.label(),
                listing.bedrooms,
                listing.bathrooms,
                listing.area_sqft
            )),
            rows[2],
        );
        let image = listing
            .image_url
            .as_deref()
            .unwrap_or("(no photo uploaded)");
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Photo: ", theme::label_style()),
                Span::styled(image, theme::dim()),
            ])),
            rows[3],
        );
        frame.render_widget(
            Paragraph::new(listing.description.clone()).wrap(Wrap { trim: true }),
            rows[5],
        );

        let hint = if self.confirm_delete {
            Span::styled(
                "press d again to delete permanently",
                ratatui::style::Style::default().fg(theme::ERROR_RED),
            )
        } else if self.is_owner() {
            Span::styled("[e] edit  [d] delete  [b] buy  [esc] back", theme::dim())
        } else {
            Span::styled("[b] buy  [esc] back", theme::dim())
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), rows[6]);
    }
}
