//! Listing form state, as typed by the user.
//!
//! Every field is a string while editing; `validate` turns the form
//! into a well-typed [`ListingDraft`] or reports the first problem.
//! Validation runs before submission -- the backend never sees a
//! malformed draft from a well-behaved client.

use super::listing::{ListingDraft, PropertyType};
use crate::error::CoreError;

/// Raw form state for the create/edit listing screens.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub property_type: Option<PropertyType>,
    pub price: String,
    pub location: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub area_sqft: String,
}

impl ListingForm {
    /// Pre-fill the form from an existing listing (edit flow).
    pub fn from_draft(draft: &ListingDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            property_type: Some(draft.property_type),
            price: fmt_number(draft.price),
            location: draft.location.clone(),
            bedrooms: draft.bedrooms.to_string(),
            bathrooms: draft.bathrooms.to_string(),
            area_sqft: draft.area_sqft.to_string(),
        }
    }

    /// Validate all fields, producing a typed draft.
    pub fn validate(&self) -> Result<ListingDraft, CoreError> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let location = required("location", &self.location)?;
        let property_type = self.property_type.ok_or_else(|| invalid("property type", "choose one"))?;

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| invalid("price", "must be a number"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(invalid("price", "must be non-negative"));
        }

        let bedrooms = parse_count("bedrooms", &self.bedrooms)?;
        let bathrooms = parse_count("bathrooms", &self.bathrooms)?;
        let area_sqft = parse_count("area", &self.area_sqft)?;

        Ok(ListingDraft {
            title,
            description,
            property_type,
            price,
            location,
            bedrooms,
            bathrooms,
            area_sqft,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_owned())
}

fn parse_count(field: &str, value: &str) -> Result<u32, CoreError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, "must be a non-negative whole number"))
}

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::ValidationFailed {
        message: format!("{field} {reason}"),
    }
}

/// Render a price without a trailing `.0` for whole amounts.
fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ListingForm {
        ListingForm {
            title: "Sunny cottage".into(),
            description: "Two floors, big garden".into(),
            property_type: Some(PropertyType::House),
            price: "250000".into(),
            location: "Austin, TX".into(),
            bedrooms: "3".into(),
            bathrooms: "2".into(),
            area_sqft: "1500".into(),
        }
    }

    #[test]
    fn valid_form_produces_typed_draft() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.bedrooms, 3);
        assert_eq!(draft.bathrooms, 2);
        assert_eq!(draft.area_sqft, 1500);
        assert!((draft.price - 250_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut form = filled();
        form.title = "   ".into();
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut form = filled();
        form.price = "-5".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn fractional_bedrooms_are_rejected() {
        let mut form = filled();
        form.bedrooms = "2.5".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn round_trip_through_from_draft() {
        let draft = filled().validate().unwrap();
        let again = ListingForm::from_draft(&draft).validate().unwrap();
        assert_eq!(again, draft);
    }
}
