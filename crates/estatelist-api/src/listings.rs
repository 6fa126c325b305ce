// `listings` table endpoints.
//
// Wire records and typed CRUD over the REST client. Field names follow
// the table schema (`type`, `area`, `user_id`); estatelist-core
// converts these to domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::query::{Query, SortOrder};
use crate::rest::RestClient;

pub const LISTINGS_TABLE: &str = "listings";

/// A stored listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: u32,
    pub image_url: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `id` and `created_at` are server-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct NewListingRecord {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: u32,
    pub image_url: Option<String>,
    pub user_id: Uuid,
}

/// Update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Server-side filter criteria for a listings read.
///
/// Absent fields impose no predicate. The rendered query always orders
/// `created_at.desc`; pagination happens client-side over the full
/// filtered result set.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
}

impl ListingQuery {
    /// Render to REST query predicates.
    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::select("*").order("created_at", SortOrder::Descending);
        if let Some(ref t) = self.property_type {
            q = q.eq("type", t);
        }
        if let Some(min) = self.min_price {
            q = q.gte("price", min);
        }
        if let Some(max) = self.max_price {
            q = q.lte("price", max);
        }
        if let Some(ref needle) = self.location {
            q = q.ilike("location", needle);
        }
        q
    }
}

impl RestClient {
    /// Fetch listings matching `filter`, newest first.
    pub async fn list_listings(
        &self,
        filter: &ListingQuery,
        access_token: Option<&str>,
    ) -> Result<Vec<ListingRecord>, Error> {
        self.get_rows(LISTINGS_TABLE, filter.to_query(), access_token)
            .await
    }

    /// Fetch the listings owned by `user_id`, newest first.
    pub async fn list_listings_by_owner(
        &self,
        user_id: &Uuid,
        access_token: Option<&str>,
    ) -> Result<Vec<ListingRecord>, Error> {
        let q = Query::select("*")
            .eq("user_id", user_id)
            .order("created_at", SortOrder::Descending);
        self.get_rows(LISTINGS_TABLE, q, access_token).await
    }

    /// Fetch one listing by id.
    pub async fn get_listing(
        &self,
        id: &Uuid,
        access_token: Option<&str>,
    ) -> Result<ListingRecord, Error> {
        let q = Query::select("*").eq("id", id);
        self.get_single(LISTINGS_TABLE, q, access_token).await
    }

    /// Insert a listing and return the stored row.
    pub async fn insert_listing(
        &self,
        new: &NewListingRecord,
        access_token: Option<&str>,
    ) -> Result<ListingRecord, Error> {
        // Insert bodies are arrays -- the REST layer supports bulk insert.
        let rows: Vec<ListingRecord> = self
            .insert(LISTINGS_TABLE, &[new], access_token)
            .await?;
        rows.into_iter().next().ok_or_else(|| Error::RowNotFound {
            table: LISTINGS_TABLE.into(),
        })
    }

    /// Update a listing by id and return the stored row.
    pub async fn update_listing(
        &self,
        id: &Uuid,
        changes: &ListingChanges,
        access_token: Option<&str>,
    ) -> Result<ListingRecord, Error> {
        let q = Query::select("*").eq("id", id);
        let rows: Vec<ListingRecord> = self
            .update(LISTINGS_TABLE, q, changes, access_token)
            .await?;
        rows.into_iter().next().ok_or_else(|| Error::RowNotFound {
            table: LISTINGS_TABLE.into(),
        })
    }

    /// Delete a listing by id.
    ///
    /// The deleted row is requested back so an id that matched nothing
    /// (already deleted) surfaces as [`Error::RowNotFound`] instead of
    /// a silent 204.
    pub async fn delete_listing(
        &self,
        id: &Uuid,
        access_token: Option<&str>,
    ) -> Result<(), Error> {
        let q = Query::select("*").eq("id", id);
        let deleted: Vec<ListingRecord> = self.delete(LISTINGS_TABLE, q, access_token).await?;
        if deleted.is_empty() {
            return Err(Error::RowNotFound {
                table: LISTINGS_TABLE.into(),
            });
        }
        Ok(())
    }
}
