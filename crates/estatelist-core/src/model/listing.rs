//! The listing entity and its filter criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ids::{ListingId, UserId};

/// Property category. Serialized lowercase to match the table schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Townhouse,
}

impl PropertyType {
    /// Human-readable label for UI surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Condo => "Condo",
            Self::Townhouse => "Townhouse",
        }
    }
}

/// A property-for-sale record, the primary domain entity.
///
/// Mutable (edit/delete) only by the user matching `owner_id`;
/// `created_at` is server-assigned and drives the default ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqft: u32,
    /// Public object URL; `None` until an upload completes.
    pub image_url: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Whether `user` may edit or delete this listing.
    pub fn owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Object name of the stored image (final path segment of the
    /// public URL), used for best-effort removal on delete.
    pub fn image_object_name(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }
}

/// User-supplied fields for creating a listing. The owner and the
/// image URL are injected by the portal; id and timestamp are
/// server-assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqft: u32,
}

/// Full replacement of the user-supplied fields on edit. The edit form
/// always submits every field; the image is replaced only when a new
/// upload is attached.
pub type ListingPatch = ListingDraft;

/// Transient client-side filter criteria.
///
/// Absent fields impose no predicate; any field change resets the
/// pagination to page 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingFilter {
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.property_type.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.location.is_none()
    }

    /// Client-side mirror of the server-side predicate semantics:
    /// exact type match, inclusive price bounds, case-insensitive
    /// substring on location. Used by tests and local re-checks.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(t) = self.property_type {
            if listing.property_type != t {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if listing.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        if let Some(ref needle) = self.location {
            if !listing
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn listing(property_type: PropertyType, price: f64, location: &str) -> Listing {
        Listing {
            id: ListingId(Uuid::new_v4()),
            title: "t".into(),
            description: "d".into(),
            property_type,
            price,
            location: location.into(),
            bedrooms: 2,
            bathrooms: 1,
            area_sqft: 900,
            image_url: None,
            owner_id: UserId(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = ListingFilter::default();
        assert!(f.is_empty());
        assert!(f.matches(&listing(PropertyType::Condo, 1.0, "anywhere")));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let f = ListingFilter {
            min_price: Some(100.0),
            max_price: Some(200.0),
            ..ListingFilter::default()
        };
        assert!(f.matches(&listing(PropertyType::House, 100.0, "x")));
        assert!(f.matches(&listing(PropertyType::House, 200.0, "x")));
        assert!(!f.matches(&listing(PropertyType::House, 99.99, "x")));
        assert!(!f.matches(&listing(PropertyType::House, 200.01, "x")));
    }

    #[test]
    fn location_is_case_insensitive_substring() {
        let f = ListingFilter {
            location: Some("LAKE".into()),
            ..ListingFilter::default()
        };
        assert!(f.matches(&listing(PropertyType::House, 1.0, "Lakeview Drive")));
        assert!(!f.matches(&listing(PropertyType::House, 1.0, "Hillside")));
    }

    #[test]
    fn all_present_predicates_must_hold() {
        let f = ListingFilter {
            property_type: Some(PropertyType::Condo),
            min_price: Some(50.0),
            max_price: None,
            location: Some("lake".into()),
        };
        assert!(f.matches(&listing(PropertyType::Condo, 60.0, "Lakeside")));
        assert!(!f.matches(&listing(PropertyType::House, 60.0, "Lakeside")));
        assert!(!f.matches(&listing(PropertyType::Condo, 40.0, "Lakeside")));
    }

    #[test]
    fn property_type_round_trips_lowercase() {
        let json = serde_json::to_string(&PropertyType::Townhouse).unwrap();
        assert_eq!(json, "\"townhouse\"");
        assert_eq!(PropertyType::Townhouse.to_string(), "townhouse");
        assert_eq!("condo".parse::<PropertyType>().unwrap(), PropertyType::Condo);
    }

    #[test]
    fn image_object_name_is_last_path_segment() {
        let mut l = listing(PropertyType::House, 1.0, "x");
        l.image_url =
            Some("https://p.supabase.co/storage/v1/object/public/listing-images/17-ab.jpg".into());
        assert_eq!(l.image_object_name(), Some("17-ab.jpg"));

        l.image_url = None;
        assert_eq!(l.image_object_name(), None);
    }
}
