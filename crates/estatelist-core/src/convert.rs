// ── Wire ⇄ domain conversions ──
//
// estatelist-api speaks table schemas (`type`, `area`, `user_id`);
// the domain model speaks `PropertyType`, `area_sqft`, `owner_id`.
// All translation lives here so neither side leaks into the other.

use std::str::FromStr;

use estatelist_api::{AuthUser, ListingChanges, ListingRecord, NewListingRecord, ProfileRecord, TokenPair};

use crate::model::{
    Listing, ListingDraft, ListingFilter, ListingId, ListingPatch, Profile, PropertyType, Session,
    User, UserId,
};

/// Unrecognized property types fall back to `House` rather than
/// failing the whole page; the table constrains the column to the four
/// known values, so this only fires against a drifted schema.
fn parse_property_type(raw: &str) -> PropertyType {
    PropertyType::from_str(raw).unwrap_or_else(|_| {
        tracing::warn!(raw, "unknown property type in listing row");
        PropertyType::House
    })
}

impl From<ListingRecord> for Listing {
    fn from(rec: ListingRecord) -> Self {
        Self {
            id: ListingId(rec.id),
            title: rec.title,
            description: rec.description,
            property_type: parse_property_type(&rec.property_type),
            price: rec.price,
            location: rec.location,
            bedrooms: rec.bedrooms,
            bathrooms: rec.bathrooms,
            area_sqft: rec.area,
            image_url: rec.image_url.filter(|u| !u.is_empty()),
            owner_id: UserId(rec.user_id),
            created_at: rec.created_at,
        }
    }
}

pub(crate) fn new_listing_record(
    draft: &ListingDraft,
    owner: UserId,
    image_url: Option<String>,
) -> NewListingRecord {
    NewListingRecord {
        title: draft.title.clone(),
        description: draft.description.clone(),
        property_type: draft.property_type.to_string(),
        price: draft.price,
        location: draft.location.clone(),
        bedrooms: draft.bedrooms,
        bathrooms: draft.bathrooms,
        area: draft.area_sqft,
        image_url,
        user_id: owner.0,
    }
}

pub(crate) fn listing_changes(
    patch: &ListingPatch,
    image_url: Option<String>,
) -> ListingChanges {
    ListingChanges {
        title: Some(patch.title.clone()),
        description: Some(patch.description.clone()),
        property_type: Some(patch.property_type.to_string()),
        price: Some(patch.price),
        location: Some(patch.location.clone()),
        bedrooms: Some(patch.bedrooms),
        bathrooms: Some(patch.bathrooms),
        area: Some(patch.area_sqft),
        // The image is replaced only when a new upload produced a URL.
        image_url,
    }
}

pub(crate) fn listing_query(filter: &ListingFilter) -> estatelist_api::ListingQuery {
    estatelist_api::ListingQuery {
        property_type: filter.property_type.map(|t| t.to_string()),
        min_price: filter.min_price,
        max_price: filter.max_price,
        location: filter
            .location
            .as_ref()
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty()),
    }
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        Self {
            id: UserId(user.id),
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<TokenPair> for Session {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_at: pair.expires_at,
            user: pair.user.into(),
        }
    }
}

impl From<ProfileRecord> for Profile {
    fn from(rec: ProfileRecord) -> Self {
        Self {
            id: UserId(rec.id),
            role: rec.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn record_to_domain_maps_renamed_fields() {
        let rec = ListingRecord {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            property_type: "townhouse".into(),
            price: 1.5,
            location: "loc".into(),
            bedrooms: 1,
            bathrooms: 1,
            area: 800,
            image_url: Some(String::new()),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let listing: Listing = rec.into();
        assert_eq!(listing.property_type, PropertyType::Townhouse);
        assert_eq!(listing.area_sqft, 800);
        // Empty string from the store normalizes to "no image".
        assert_eq!(listing.image_url, None);
    }

    #[test]
    fn filter_renders_type_lowercase() {
        let filter = ListingFilter {
            property_type: Some(PropertyType::Apartment),
            location: Some("  ".into()),
            ..ListingFilter::default()
        };
        let q = listing_query(&filter);
        assert_eq!(q.property_type.as_deref(), Some("apartment"));
        // Whitespace-only location imposes no predicate.
        assert_eq!(q.location, None);
    }
}
