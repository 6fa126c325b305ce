//! Home screen — landing view with navigation hints.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::screen::Screen;
use crate::theme;
use crate::widgets;

pub struct HomeScreen;

impl HomeScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for HomeScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("EstateList", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Percentage(30),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new("Find Your Dream Home")
                .style(theme::title_style())
                .alignment(Alignment::Center),
            rows[1],
        );
        frame.render_widget(
            Paragraph::new("Browse houses, apartments, condos, and townhouses.")
                .style(theme::dim())
                .alignment(Alignment::Center),
            rows[2],
        );

        let hints = vec![
            Line::from(Span::styled("[2] Browse listings", theme::dim())),
            Line::from(Span::styled("[3] Blog", theme::dim())),
            Line::from(Span::styled("[4] Contact us", theme::dim())),
            Line::from(Span::styled("[5] Your profile", theme::dim())),
            Line::from(Span::styled("[l] Sign in    [q] Quit", theme::dim())),
        ];
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            rows[3],
        );
    }
}
