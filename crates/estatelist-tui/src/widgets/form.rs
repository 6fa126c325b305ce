//! Form building blocks: labeled text fields and the shared listing
//! form used by the create and edit screens.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator as _;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use estatelist_core::{Listing, ListingForm, PropertyType};

use crate::theme;

/// A labeled single-line text input.
pub struct TextField {
    pub label: &'static str,
    pub input: Input,
    /// Render value as dots (passwords).
    pub masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: Input::default(),
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            label,
            input: Input::default(),
            masked: true,
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_owned());
    }

    pub fn value(&self) -> String {
        self.input.value().to_owned()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let _ = self.input.handle_event(&CrosstermEvent::Key(key));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let shown = if self.masked {
            "•".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_owned()
        };

        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(theme::label_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        frame.render_widget(Paragraph::new(shown).block(block), area);
    }
}

/// Next/previous property type in declaration order, wrapping.
fn next_property_type(current: PropertyType, forward: bool) -> PropertyType {
    let all: Vec<PropertyType> = PropertyType::iter().collect();
    let idx = all.iter().position(|t| *t == current).unwrap_or(0);
    let len = all.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}

/// Field order of the shared listing form.
const FIELD_COUNT: usize = 9;

/// The create/edit listing form: eight text fields plus a cycling
/// property-type selector. Field index 2 is the type selector.
pub struct ListingFormFields {
    pub title: TextField,
    pub description: TextField,
    pub property_type: PropertyType,
    pub price: TextField,
    pub location: TextField,
    pub bedrooms: TextField,
    pub bathrooms: TextField,
    pub area: TextField,
    pub image_path: TextField,
    pub focus: usize,
}

impl ListingFormFields {
    pub fn new(image_label: &'static str) -> Self {
        Self {
            title: TextField::new("Title"),
            description: TextField::new("Description"),
            property_type: PropertyType::House,
            price: TextField::new("Price ($)"),
            location: TextField::new("Location"),
            bedrooms: TextField::new("Bedrooms"),
            bathrooms: TextField::new("Bathrooms"),
            area: TextField::new("Area (sq ft)"),
            image_path: TextField::new(image_label),
            focus: 0,
        }
    }

    /// Pre-fill from an existing listing (edit flow).
    pub fn prefill(&mut self, listing: &Listing) {
        self.title.set_value(&listing.title);
        self.description.set_value(&listing.description);
        self.property_type = listing.property_type;
        self.price.set_value(&trim_price(listing.price));
        self.location.set_value(&listing.location);
        self.bedrooms.set_value(&listing.bedrooms.to_string());
        self.bathrooms.set_value(&listing.bathrooms.to_string());
        self.area.set_value(&listing.area_sqft.to_string());
        self.image_path.set_value("");
        self.focus = 0;
    }

    pub fn clear(&mut self) {
        self.prefill_empty();
    }

    fn prefill_empty(&mut self) {
        for field in self.fields_mut() {
            field.set_value("");
        }
        self.property_type = PropertyType::House;
        self.focus = 0;
    }

    fn fields_mut(&mut self) -> [&mut TextField; 8] {
        [
            &mut self.title,
            &mut self.description,
            &mut self.price,
            &mut self.location,
            &mut self.bedrooms,
            &mut self.bathrooms,
            &mut self.area,
            &mut self.image_path,
        ]
    }

    /// Map the focus index to the text field it addresses, skipping
    /// the type selector slot.
    fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            0 => Some(&mut self.title),
            1 => Some(&mut self.description),
            2 => None, // property type selector
            3 => Some(&mut self.price),
            4 => Some(&mut self.location),
            5 => Some(&mut self.bedrooms),
            6 => Some(&mut self.bathrooms),
            7 => Some(&mut self.area),
            8 => Some(&mut self.image_path),
            _ => None,
        }
    }

    /// Handle a key. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                true
            }
            KeyCode::Left if self.focus == 2 => {
                self.property_type = next_property_type(self.property_type, false);
                true
            }
            KeyCode::Right if self.focus == 2 => {
                self.property_type = next_property_type(self.property_type, true);
                true
            }
            _ => {
                if let Some(field) = self.focused_field_mut() {
                    field.handle_key(key);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Export as a core form for validation.
    pub fn to_form(&self) -> ListingForm {
        ListingForm {
            title: self.title.value(),
            description: self.description.value(),
            property_type: Some(self.property_type),
            price: self.price.value(),
            location: self.location.value(),
            bedrooms: self.bedrooms.value(),
            bathrooms: self.bathrooms.value(),
            area_sqft: self.area.value(),
        }
    }

    pub fn image_path(&self) -> Option<String> {
        let v = self.image_path.value();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Length(3), // description
            Constraint::Length(3), // type + price
            Constraint::Length(3), // location
            Constraint::Length(3), // bedrooms/bathrooms/area
            Constraint::Length(3), // image
            Constraint::Min(0),
        ])
        .split(area);

        self.title.render(frame, rows[0], self.focus == 0);
        self.description.render(frame, rows[1], self.focus == 1);

        let type_price = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        self.render_type_selector(frame, type_price[0]);
        self.price.render(frame, type_price[1], self.focus == 3);

        self.location.render(frame, rows[3], self.focus == 4);

        let counts = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[4]);
        self.bedrooms.render(frame, counts[0], self.focus == 5);
        self.bathrooms.render(frame, counts[1], self.focus == 6);
        self.area.render(frame, counts[2], self.focus == 7);

        self.image_path.render(frame, rows[5], self.focus == 8);
    }

    fn render_type_selector(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == 2;
        let block = Block::default()
            .title(" Property Type ")
            .title_style(theme::label_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let line = Line::from(vec![
            Span::styled("◂ ", theme::dim()),
            Span::raw(self.property_type.label()),
            Span::styled(" ▸", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

fn trim_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        price.to_string()
    }
}
