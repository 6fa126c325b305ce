//! Admin dashboard — role-gated overview. The app navigates here only
//! after the elevated guard allowed it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use color_eyre::eyre::Result;

use crate::action::{Action, PageView};
use crate::screen::Screen;
use crate::theme;
use crate::widgets;

pub struct AdminScreen {
    view: PageView,
}

impl AdminScreen {
    pub fn new() -> Self {
        Self {
            view: PageView::default(),
        }
    }
}

impl Screen for AdminScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ListingsPage(view) = action {
            self.view = view.clone();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Admin Dashboard", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Listings on the platform: ", theme::label_style()),
                Span::raw(self.view.total.to_string()),
            ])),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new("Moderation tooling lives in the hosted dashboard.")
                .style(theme::dim()),
            rows[1],
        );
    }
}
