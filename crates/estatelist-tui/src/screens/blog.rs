//! Blog screen — static editorial content, matching the marketing
//! pages of the web front-end.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use crate::action::Action;
use crate::screen::Screen;
use crate::theme;
use crate::widgets;

struct Post {
    title: &'static str,
    date: &'static str,
    body: &'static str,
}

const POSTS: &[Post] = &[
    Post {
        title: "Five questions to ask before your first viewing",
        date: "2024-04-02",
        body: "A checklist for first-time buyers: financing, commute, \
               neighborhood noise, resale outlook, and inspection rights.",
    },
    Post {
        title: "Condo vs. townhouse: what actually differs",
        date: "2024-03-18",
        body: "Ownership boundaries, HOA structures, and maintenance \
               responsibilities compared side by side.",
    },
    Post {
        title: "Staging a listing that photographs well",
        date: "2024-02-25",
        body: "Light, declutter, and one good wide-angle shot go further \
               than a dozen dim close-ups.",
    },
];

pub struct BlogScreen {
    selected: usize,
}

impl BlogScreen {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

impl Screen for BlogScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < POSTS.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let block = widgets::panel("Blog", true);
        let items: Vec<ListItem> = POSTS
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let line = Line::from(vec![
                    Span::styled(format!("{} ", post.date), theme::dim()),
                    Span::raw(post.title),
                ]);
                let item = ListItem::new(line);
                if i == self.selected {
                    item.style(theme::selected_row())
                } else {
                    item
                }
            })
            .collect();
        frame.render_widget(List::new(items).block(block), cols[0]);

        let post = &POSTS[self.selected.min(POSTS.len() - 1)];
        let body = widgets::panel(post.title, false);
        let inner = body.inner(cols[1]);
        frame.render_widget(body, cols[1]);
        frame.render_widget(
            Paragraph::new(post.body).wrap(Wrap { trim: true }),
            inner,
        );
    }
}
