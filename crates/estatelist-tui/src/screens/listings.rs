//! Listings screen — filter form, 9-per-page grid, pagination.
//!
//! The filter applies on every edit, mirroring the web UI: each change
//! resets to page 1 and re-queries through the engine. Stale responses
//! are already handled engine-side.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use strum::IntoEnumIterator as _;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use estatelist_core::{Listing, ListingFilter, PropertyType, Route};

use crate::action::{Action, PageView};
use crate::screen::Screen;
use crate::theme;
use crate::widgets::{self, form::TextField};

/// Filter slots: 0 = type, 1 = min price, 2 = max price, 3 = location.
const FILTER_SLOTS: usize = 4;

enum Focus {
    Filter(usize),
    Results,
}

pub struct ListingsScreen {
    focus: Focus,
    /// `None` means "all types".
    type_filter: Option<PropertyType>,
    min_price: TextField,
    max_price: TextField,
    location: TextField,
    view: PageView,
    selected: usize,
    throbber: ThrobberState,
}

impl ListingsScreen {
    pub fn new() -> Self {
        Self {
            focus: Focus::Results,
            type_filter: None,
            min_price: TextField::new("Min Price"),
            max_price: TextField::new("Max Price"),
            location: TextField::new("Location"),
            view: PageView::default(),
            selected: 0,
            throbber: ThrobberState::default(),
        }
    }

    fn filter(&self) -> ListingFilter {
        ListingFilter {
            property_type: self.type_filter,
            min_price: self.min_price.value().trim().parse().ok(),
            max_price: self.max_price.value().trim().parse().ok(),
            location: Some(self.location.value())
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty()),
        }
    }

    fn cycle_type(&mut self, forward: bool) {
        let mut options: Vec<Option<PropertyType>> = vec![None];
        options.extend(PropertyType::iter().map(Some));
        let idx = options
            .iter()
            .position(|o| *o == self.type_filter)
            .unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.type_filter = options[next];
    }

    fn handle_filter_key(&mut self, slot: usize, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Results;
                None
            }
            KeyCode::Tab => {
                self.focus = Focus::Filter((slot + 1) % FILTER_SLOTS);
                None
            }
            KeyCode::BackTab => {
                self.focus = Focus::Filter((slot + FILTER_SLOTS - 1) % FILTER_SLOTS);
                None
            }
            KeyCode::Left if slot == 0 => {
                self.cycle_type(false);
                Some(Action::FilterChanged(self.filter()))
            }
            KeyCode::Right if slot == 0 => {
                self.cycle_type(true);
                Some(Action::FilterChanged(self.filter()))
            }
            _ => {
                let field = match slot {
                    1 => &mut self.min_price,
                    2 => &mut self.max_price,
                    3 => &mut self.location,
                    _ => return None,
                };
                let before = field.value();
                field.handle_key(key);
                let edited = field.value() != before;
                // Every actual change re-queries and resets to page 1.
                if edited {
                    Some(Action::FilterChanged(self.filter()))
                } else {
                    None
                }
            }
        }
    }

    fn selected_listing(&self) -> Option<&Listing> {
        self.view.rows.get(self.selected).map(AsRef::as_ref)
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let slots = Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

        let type_focused = matches!(self.focus, Focus::Filter(0));
        let block = widgets::panel("Type", type_focused);
        let label = self
            .type_filter
            .map_or("All Types", PropertyType::label);
        let line = Line::from(vec![
            Span::styled("◂ ", theme::dim()),
            Span::raw(label),
            Span::styled(" ▸", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), slots[0]);

        self.min_price
            .render(frame, slots[1], matches!(self.focus, Focus::Filter(1)));
        self.max_price
            .render(frame, slots[2], matches!(self.focus, Focus::Filter(2)));
        self.location
            .render(frame, slots[3], matches!(self.focus, Focus::Filter(3)));
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        if self.view.loading {
            widgets::render_loading(
                frame,
                area,
                "Fetching listings",
                &mut self.throbber.clone(),
            );
            return;
        }
        if let Some(ref message) = self.view.error {
            widgets::render_message(frame, area, "Listings", message);
            return;
        }
        if self.view.rows.is_empty() {
            widgets::render_message(frame, area, "Listings", "No listings match your filters.");
            return;
        }

        let focused = matches!(self.focus, Focus::Results);
        let block = widgets::panel(&format!("Listings ({})", self.view.total), focused);

        let items: Vec<ListItem> = self
            .view
            .rows
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let price = format!("${:.0}", l.price);
                let line = Line::from(vec![
                    Span::styled(format!("{:<28.28} ", l.title), ratatui::style::Style::default()),
                    Span::styled(format!("{:<10} ", l.property_type.label()), theme::dim()),
                    Span::styled(format!("{price:>12} "), theme::price_style()),
                    Span::styled(format!("{:<20.20} ", l.location), theme::dim()),
                    Span::styled(
                        format!("{}bd {}ba {}sqft", l.bedrooms, l.bathrooms, l.area_sqft),
                        theme::dim(),
                    ),
                ]);
                let item = ListItem::new(line);
                if i == self.selected && focused {
                    item.style(theme::selected_row())
                } else {
                    item
                }
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let pages = if self.view.page_count > 1 {
            format!("Page {} of {}  ", self.view.page, self.view.page_count)
        } else {
            String::new()
        };
        let hints = "[/] filter  [j/k] select  [enter] open  [n/p] page  [esc] back";
        frame.render_widget(
            Paragraph::new(format!("{pages}{hints}")).style(theme::dim()),
            area,
        );
    }
}

impl Screen for ListingsScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn on_enter(&mut self, _route: &Route) {
        self.focus = Focus::Results;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Focus::Filter(slot) = self.focus {
            return Ok(self.handle_filter_key(slot, key));
        }

        let action = match key.code {
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.focus = Focus::Filter(0);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.view.rows.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => self
                .selected_listing()
                .map(|l| Action::OpenListing(l.id)),
            KeyCode::Char('n') | KeyCode::Char(']') => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Char('[') => Some(Action::PrevPage),
            KeyCode::Char('r') => Some(Action::FilterChanged(self.filter())),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ListingsPage(view) => {
                self.view = view.clone();
                if self.selected >= self.view.rows.len() {
                    self.selected = self.view.rows.len().saturating_sub(1);
                }
            }
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_filter_bar(frame, rows[0]);
        self.render_results(frame, rows[1]);
        self.render_footer(frame, rows[2]);
    }

    fn wants_text_input(&self) -> bool {
        matches!(self.focus, Focus::Filter(_))
    }
}
