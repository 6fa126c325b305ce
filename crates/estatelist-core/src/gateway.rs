// ── Data access gateway ──
//
// One seam between the reactive core and the remote store. The engine
// and portal talk to this trait; production code uses `ApiGateway`
// (REST + object storage), tests use in-memory fakes with programmable
// latency and failures.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use estatelist_api::{ListingChanges, NewListingRecord, RestClient, StorageClient};

use crate::convert::listing_query;
use crate::error::CoreError;
use crate::model::{Listing, ListingFilter, ListingId, Profile, UserId};
use crate::session::SessionTracker;

/// Remote operations every listing surface needs.
///
/// Futures are `Send` so callers may drive them from spawned tasks.
pub trait ListingGateway: Send + Sync + 'static {
    /// Fetch listings matching `filter`, newest first. Filtering is
    /// server-side; the full filtered set comes back in one response.
    fn list(
        &self,
        filter: &ListingFilter,
    ) -> impl Future<Output = Result<Vec<Listing>, CoreError>> + Send;

    /// Fetch one listing by id.
    fn get(&self, id: ListingId) -> impl Future<Output = Result<Listing, CoreError>> + Send;

    /// Fetch the listings owned by `owner`, newest first.
    fn list_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<Listing>, CoreError>> + Send;

    /// Insert a new listing row, returning the stored listing.
    fn insert(
        &self,
        record: NewListingRecord,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send;

    /// Patch an existing listing row, returning the stored listing.
    fn update(
        &self,
        id: ListingId,
        changes: ListingChanges,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send;

    /// Delete a listing row. An id matching nothing is an error.
    fn delete(&self, id: ListingId) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Upload an image and return its public URL.
    fn upload_image(
        &self,
        name: String,
        bytes: Vec<u8>,
        content_type: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Remove a stored image. Callers treat failure as non-fatal.
    fn remove_image(&self, name: String) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Fetch the profile row for `user`.
    fn profile(&self, user: UserId) -> impl Future<Output = Result<Profile, CoreError>> + Send;
}

/// Production gateway over the hosted REST and storage surfaces.
///
/// Reads work signed out (anon bearer); mutations use the session's
/// access token when one is present so row-level security applies.
pub struct ApiGateway {
    rest: RestClient,
    storage: StorageClient,
    bucket: String,
    tracker: Arc<SessionTracker>,
}

impl ApiGateway {
    pub(crate) fn new(
        rest: RestClient,
        storage: StorageClient,
        bucket: String,
        tracker: Arc<SessionTracker>,
    ) -> Self {
        Self {
            rest,
            storage,
            bucket,
            tracker,
        }
    }

    fn token(&self) -> Option<String> {
        self.tracker.access_token()
    }
}

impl ListingGateway for ApiGateway {
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, CoreError> {
        let query = listing_query(filter);
        let token = self.token();
        let rows = self.rest.list_listings(&query, token.as_deref()).await?;
        debug!(count = rows.len(), "fetched listings");
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn get(&self, id: ListingId) -> Result<Listing, CoreError> {
        let token = self.token();
        match self.rest.get_listing(id.as_uuid(), token.as_deref()).await {
            Ok(rec) => Ok(rec.into()),
            Err(e) if e.is_not_found() => Err(CoreError::ListingNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Listing>, CoreError> {
        let token = self.token();
        let rows = self
            .rest
            .list_listings_by_owner(owner.as_uuid(), token.as_deref())
            .await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn insert(&self, record: NewListingRecord) -> Result<Listing, CoreError> {
        let token = self.token().ok_or(CoreError::NotSignedIn)?;
        let rec = self.rest.insert_listing(&record, Some(&token)).await?;
        Ok(rec.into())
    }

    async fn update(&self, id: ListingId, changes: ListingChanges) -> Result<Listing, CoreError> {
        let token = self.token().ok_or(CoreError::NotSignedIn)?;
        match self
            .rest
            .update_listing(id.as_uuid(), &changes, Some(&token))
            .await
        {
            Ok(rec) => Ok(rec.into()),
            Err(e) if e.is_not_found() => Err(CoreError::ListingNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: ListingId) -> Result<(), CoreError> {
        let token = self.token().ok_or(CoreError::NotSignedIn)?;
        match self.rest.delete_listing(id.as_uuid(), Some(&token)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(CoreError::ListingNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_image(
        &self,
        name: String,
        bytes: Vec<u8>,
        content_type: String,
    ) -> Result<String, CoreError> {
        let token = self.token().ok_or(CoreError::NotSignedIn)?;
        self.storage
            .upload(&self.bucket, &name, bytes, &content_type, Some(&token))
            .await?;
        Ok(self.storage.public_url(&self.bucket, &name))
    }

    async fn remove_image(&self, name: String) -> Result<(), CoreError> {
        let token = self.token();
        self.storage
            .remove(&self.bucket, &name, token.as_deref())
            .await?;
        Ok(())
    }

    async fn profile(&self, user: UserId) -> Result<Profile, CoreError> {
        let token = self.token();
        match self.rest.get_profile(user.as_uuid(), token.as_deref()).await {
            Ok(rec) => Ok(rec.into()),
            Err(e) if e.is_not_found() => Err(CoreError::ProfileNotFound),
            Err(e) => Err(e.into()),
        }
    }
}
