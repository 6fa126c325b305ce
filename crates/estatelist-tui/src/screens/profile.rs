//! Profile screen — account details plus the signed-in user's own
//! listings, with per-row deletion.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use throbber_widgets_tui::ThrobberState;

use estatelist_core::{Listing, Route, RouteId, User};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets;

pub struct ProfileScreen {
    user: Option<User>,
    listings: Option<Vec<Listing>>,
    selected: usize,
    confirm_delete: bool,
    throbber: ThrobberState,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self {
            user: None,
            listings: None,
            selected: 0,
            confirm_delete: false,
            throbber: ThrobberState::default(),
        }
    }

    fn selected_listing(&self) -> Option<&Listing> {
        self.listings.as_ref()?.get(self.selected)
    }
}

impl Screen for ProfileScreen {
    fn on_enter(&mut self, _route: &Route) {
        // The app re-fetches on every entry.
        self.listings = None;
        self.selected = 0;
        self.confirm_delete = false;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let count = self.listings.as_ref().map_or(0, Vec::len);

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
                self.confirm_delete = false;
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                self.confirm_delete = false;
                None
            }
            KeyCode::Enter => self
                .selected_listing()
                .map(|l| Action::OpenListing(l.id)),
            KeyCode::Char('c') => Some(Action::Navigate(Route::new(RouteId::CreateListing))),
            KeyCode::Char('d') => {
                if let Some(listing) = self.selected_listing().cloned() {
                    if self.confirm_delete {
                        self.confirm_delete = false;
                        Some(Action::RequestDelete(Box::new(listing.clone())))
                    } else {
                        self.confirm_delete = true;
                        None
                    }
                } else {
                    None
                }
            }
            KeyCode::Char('o') => Some(Action::SignOut),
            _ => {
                self.confirm_delete = false;
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MyListingsLoaded(listings, user) => {
                self.listings = Some(listings.clone());
                self.user = user.clone();
                if self.selected >= listings.len() {
                    self.selected = listings.len().saturating_sub(1);
                }
            }
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

        // Account panel
        let block = widgets::panel("Profile", false);
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);
        if let Some(ref user) = self.user {
            let email = user.email.as_deref().unwrap_or("<no email>");
            let since = user
                .created_at
                .map(|t| t.format("%B %e, %Y").to_string())
                .unwrap_or_else(|| "unknown".into());
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(vec![
                        Span::styled("Email: ", theme::label_style()),
                        Span::raw(email),
                    ]),
                    Line::from(vec![
                        Span::styled("Account created: ", theme::label_style()),
                        Span::raw(since),
                    ]),
                ]),
                inner,
            );
        }

        // My listings panel
        match self.listings {
            None => widgets::render_loading(
                frame,
                rows[1],
                "Loading your listings",
                &mut self.throbber.clone(),
            ),
            Some(ref listings) if listings.is_empty() => widgets::render_message(
                frame,
                rows[1],
                "My Listings",
                "You haven't created any listings yet. Press c to create one.",
            ),
            Some(ref listings) => {
                let block = widgets::panel(&format!("My Listings ({})", listings.len()), true);
                let items: Vec<ListItem> = listings
                    .iter()
                    .enumerate()
                    .map(|(i, l)| {
                        let line = Line::from(vec![
                            Span::raw(format!("{:<30.30} ", l.title)),
                            Span::styled(format!("${:<12.0} ", l.price), theme::price_style()),
                            Span::styled(l.location.clone(), theme::dim()),
                        ]);
                        let item = ListItem::new(line);
                        if i == self.selected {
                            item.style(theme::selected_row())
                        } else {
                            item
                        }
                    })
                    .collect();
                frame.render_widget(List::new(items).block(block), rows[1]);
            }
        }

        let hint = if self.confirm_delete {
            Span::styled(
                "press d again to delete permanently",
                ratatui::style::Style::default().fg(theme::ERROR_RED),
            )
        } else {
            Span::styled(
                "[j/k] select  [enter] view  [c] create  [d] delete  [o] sign out  [esc] back",
                theme::dim(),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), rows[2]);
    }
}
