//! Shared widgets: form fields, panels, and the loading placeholder.

pub mod form;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// Standard rounded panel with a title.
pub fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// Neutral loading placeholder shown while a gated view waits for the
/// session to resolve, or while a fetch is in flight.
pub fn render_loading(frame: &mut Frame, area: Rect, label: &str, state: &mut ThrobberState) {
    let block = panel("Loading", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let throbber = Throbber::default()
        .label(label.to_owned())
        .style(theme::dim())
        .throbber_style(ratatui::style::Style::default().fg(theme::BRAND_TEAL));
    frame.render_stateful_widget(throbber, centered_line(rows[1], label), state);
}

/// Centered single-line area wide enough for a spinner + label.
fn centered_line(area: Rect, label: &str) -> Rect {
    #[allow(clippy::cast_possible_truncation)]
    let width = (label.chars().count() as u16 + 4).min(area.width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    Rect::new(x, area.y, width, 1)
}

/// Centered message paragraph (empty states, notices).
pub fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = panel(title, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new(message.to_owned())
            .style(theme::dim())
            .alignment(Alignment::Center),
        rows[1],
    );
}
