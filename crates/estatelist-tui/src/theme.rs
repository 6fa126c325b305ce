//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const BRAND_TEAL: Color = Color::Rgb(64, 224, 208); // #40e0d0
pub const WARM_AMBER: Color = Color::Rgb(255, 191, 105); // #ffbf69
pub const SOFT_SAGE: Color = Color::Rgb(148, 210, 189); // #94d2bd
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const WARNING_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(BRAND_TEAL).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(WARM_AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Selected row in a list.
pub fn selected_row() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .fg(WARM_AMBER)
        .add_modifier(Modifier::BOLD)
}

/// Price emphasis.
pub fn price_style() -> Style {
    Style::default()
        .fg(SUCCESS_GREEN)
        .add_modifier(Modifier::BOLD)
}

/// Secondary/dim text.
pub fn dim() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Field label in forms.
pub fn label_style() -> Style {
    Style::default().fg(SOFT_SAGE)
}
