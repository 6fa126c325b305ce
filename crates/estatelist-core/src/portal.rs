// ── Portal facade ──
//
// Full lifecycle management for one backend connection: client
// construction, session resolution and refresh, listing CRUD with the
// two-phase image flows, payments, and the contact relay. Cheaply
// cloneable via `Arc<PortalInner>`.
//
// The image-then-record mutations are non-atomic by design. An insert
// that fails after a successful upload leaves the object orphaned (no
// compensating cleanup); a delete removes the image best-effort and
// proceeds even when that removal fails.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use estatelist_api::{
    AuthClient, ContactMessage, CreatePaymentIntent, FunctionsClient, PaymentIntent, RestClient,
    StorageClient, TransportConfig,
};

use crate::config::PortalConfig;
use crate::convert::{listing_changes, new_listing_record};
use crate::engine::ListingEngine;
use crate::error::CoreError;
use crate::gateway::{ApiGateway, ListingGateway};
use crate::guard::{GateDecision, RouteGuard, evaluate_admin};
use crate::model::{Listing, ListingDraft, ListingId, ListingPatch, Profile, User};
use crate::route::RouteId;
use crate::session::SessionTracker;

/// An image attached to a create or edit submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name; only the extension is kept.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The main entry point for consumers.
#[derive(Clone)]
pub struct Portal {
    inner: Arc<PortalInner>,
}

struct PortalInner {
    config: PortalConfig,
    auth: AuthClient,
    functions: FunctionsClient,
    gateway: Arc<ApiGateway>,
    tracker: Arc<SessionTracker>,
    cancel: CancellationToken,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Portal {
    /// Build the clients. Does NOT resolve the session -- call
    /// [`connect()`](Self::connect) to do that and start the
    /// background refresh task.
    pub fn new(config: PortalConfig) -> Result<Self, CoreError> {
        let transport =
            TransportConfig::new(config.anon_key.clone()).with_timeout(config.timeout);

        let rest = RestClient::new(config.project_url.clone(), &transport)?;
        let auth = AuthClient::new(config.project_url.clone(), &transport)?;
        let storage = StorageClient::new(config.project_url.clone(), &transport)?;
        let functions = FunctionsClient::new(config.project_url.clone(), &transport)?;

        let tracker = Arc::new(SessionTracker::new());
        let gateway = Arc::new(ApiGateway::new(
            rest,
            storage,
            config.bucket.clone(),
            Arc::clone(&tracker),
        ));

        Ok(Self {
            inner: Arc::new(PortalInner {
                config,
                auth,
                functions,
                gateway,
                tracker,
                cancel: CancellationToken::new(),
                refresh_task: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// The session tracker. Subscribe rather than polling.
    pub fn session(&self) -> &Arc<SessionTracker> {
        &self.inner.tracker
    }

    /// The data-access gateway.
    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.inner.gateway
    }

    /// A fresh listing engine over this portal's gateway.
    pub fn engine(&self) -> ListingEngine<ApiGateway> {
        ListingEngine::new(Arc::clone(&self.inner.gateway))
    }

    /// A route guard bound to this portal's session subscription.
    pub fn guard(&self, route: RouteId) -> RouteGuard {
        RouteGuard::new(route, self.inner.tracker.subscribe())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Resolve the initial session state and start the background
    /// token-refresh task. Gated views stay on their loading
    /// placeholder until this resolves the Unknown state.
    pub async fn connect(&self) {
        match self.inner.config.restore_refresh_token.as_ref() {
            Some(token) => {
                match self.inner.auth.refresh(token.expose_secret()).await {
                    Ok(pair) => {
                        info!("restored previous session");
                        self.inner.tracker.set_signed_in(pair.into());
                    }
                    Err(e) => {
                        warn!(error = %e, "session restore failed");
                        self.inner.tracker.resolve_signed_out();
                    }
                }
            }
            None => self.inner.tracker.resolve_signed_out(),
        }

        let mut task = self.inner.refresh_task.lock().await;
        if task.is_none() {
            let portal = self.clone();
            let cancel = self.inner.cancel.clone();
            *task = Some(tokio::spawn(refresh_task(portal, cancel)));
        }
    }

    /// Cancel background work. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.refresh_task.lock().await.take() {
            let _ = handle.await;
        }
        debug!("portal shut down");
    }

    // ── Auth flows ───────────────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let pair = self.inner.auth.sign_in(email, password).await?;
        let user: User = pair.user.clone().into();
        self.inner.tracker.set_signed_in(pair.into());
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let pair = self.inner.auth.sign_up(email, password).await?;
        let user: User = pair.user.clone().into();
        self.inner.tracker.set_signed_in(pair.into());
        Ok(user)
    }

    /// Revoke the session remotely, then publish signed-out. The local
    /// state transitions even when the remote revocation fails.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let token = self.inner.tracker.access_token();
        self.inner.tracker.set_signed_out();
        if let Some(token) = token {
            if let Err(e) = self.inner.auth.sign_out(&token).await {
                warn!(error = %e, "remote sign-out failed (local session cleared)");
            }
        }
        Ok(())
    }

    // ── Listing reads ────────────────────────────────────────────────

    pub async fn listing(&self, id: ListingId) -> Result<Listing, CoreError> {
        self.inner.gateway.get(id).await
    }

    /// The signed-in user's own listings, newest first.
    pub async fn my_listings(&self) -> Result<Vec<Listing>, CoreError> {
        let user = self.inner.tracker.user_id().ok_or(CoreError::NotSignedIn)?;
        self.inner.gateway.list_by_owner(user).await
    }

    // ── Listing mutations (two-phase where an image is attached) ─────

    /// Create a listing. When an image is attached it is uploaded
    /// first; the record then references its public URL. A record
    /// insert that fails after the upload leaves the object orphaned.
    pub async fn create_listing(
        &self,
        draft: &ListingDraft,
        image: Option<ImageUpload>,
    ) -> Result<Listing, CoreError> {
        let owner = self.inner.tracker.user_id().ok_or(CoreError::NotSignedIn)?;

        let image_url = match image {
            Some(upload) => Some(self.upload_image(upload).await?),
            None => None,
        };

        let record = new_listing_record(draft, owner, image_url.clone());
        match self.inner.gateway.insert(record).await {
            Ok(listing) => {
                info!(id = %listing.id, "listing created");
                Ok(listing)
            }
            Err(e) => {
                if let Some(url) = image_url {
                    // Accepted inconsistency: the upload is not rolled back.
                    warn!(%url, "listing insert failed after image upload; object orphaned");
                }
                Err(e)
            }
        }
    }

    /// Edit a listing. Ownership is checked against the session before
    /// anything is sent. A new image, when attached, is uploaded first
    /// and its URL replaces the old one; the old object is left behind.
    pub async fn update_listing(
        &self,
        current: &Listing,
        patch: &ListingPatch,
        image: Option<ImageUpload>,
    ) -> Result<Listing, CoreError> {
        let user = self.inner.tracker.user_id().ok_or(CoreError::NotSignedIn)?;
        if !current.owned_by(user) {
            return Err(CoreError::NotOwner);
        }

        let new_image_url = match image {
            Some(upload) => Some(self.upload_image(upload).await?),
            None => None,
        };

        let changes = listing_changes(patch, new_image_url);
        let updated = self.inner.gateway.update(current.id, changes).await?;
        info!(id = %updated.id, "listing updated");
        Ok(updated)
    }

    /// Delete a listing. The stored image is removed best-effort
    /// first; removal failure is logged and the record deletion
    /// proceeds regardless.
    pub async fn delete_listing(&self, listing: &Listing) -> Result<(), CoreError> {
        let user = self.inner.tracker.user_id().ok_or(CoreError::NotSignedIn)?;
        if !listing.owned_by(user) {
            return Err(CoreError::NotOwner);
        }

        if let Some(name) = listing.image_object_name() {
            if let Err(e) = self.inner.gateway.remove_image(name.to_owned()).await {
                warn!(name, error = %e, "image removal failed; deleting record anyway");
            }
        }

        self.inner.gateway.delete(listing.id).await?;
        info!(id = %listing.id, "listing deleted");
        Ok(())
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<String, CoreError> {
        let name = object_name(&upload.file_name);
        self.inner
            .gateway
            .upload_image(name, upload.bytes, upload.content_type)
            .await
    }

    // ── Payments & contact ───────────────────────────────────────────

    /// Create a payment intent for purchasing `listing`. The price is
    /// converted to integer minor-units; the function rejects
    /// non-positive amounts, so that is validated here first.
    pub async fn create_payment_intent(
        &self,
        listing: &Listing,
    ) -> Result<PaymentIntent, CoreError> {
        #[allow(clippy::cast_possible_truncation)]
        let amount = (listing.price * 100.0).round() as i64;
        if amount <= 0 {
            return Err(CoreError::ValidationFailed {
                message: "listing price must be positive".into(),
            });
        }

        let request = CreatePaymentIntent {
            amount,
            currency: "usd".into(),
            listing_id: listing.id.to_string(),
        };
        let token = self.inner.tracker.access_token();
        Ok(self
            .inner
            .functions
            .create_payment_intent(&request, token.as_deref())
            .await?)
    }

    /// Relay a contact-form message.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), CoreError> {
        let token = self.inner.tracker.access_token();
        Ok(self
            .inner
            .functions
            .send_contact(message, token.as_deref())
            .await?)
    }

    // ── Profiles / admin ─────────────────────────────────────────────

    /// Profile row of the signed-in user, if any.
    pub async fn my_profile(&self) -> Result<Profile, CoreError> {
        let user = self.inner.tracker.user_id().ok_or(CoreError::NotSignedIn)?;
        self.inner.gateway.profile(user).await
    }

    /// Admin-gate decision for the current session. Fetches the
    /// profile role when signed in; a missing profile denies.
    pub async fn admin_decision(&self) -> GateDecision {
        let state = self.inner.tracker.current();
        let profile = match state.session() {
            Some(session) => self.inner.gateway.profile(session.user.id).await.ok(),
            None => None,
        };
        evaluate_admin(&state, profile.as_ref())
    }
}

/// Derive a collision-resistant object name preserving the extension,
/// mirroring the web client's `{timestamp}-{random}.{ext}` scheme.
fn object_name(file_name: &str) -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    let ext = file_name
        .rsplit_once('.')
        .map_or("bin", |(_, e)| e)
        .to_lowercase();
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{millis}-{random}.{ext}")
}

/// Background task renewing the access token shortly before expiry.
///
/// Sleeps until `expires_at - leeway`, refreshes, and publishes the
/// result. A failed refresh publishes signed-out; the task then waits
/// for the next sign-in.
async fn refresh_task(portal: Portal, cancel: CancellationToken) {
    let leeway = chrono::Duration::seconds(
        i64::try_from(portal.inner.config.refresh_leeway_secs).unwrap_or(60),
    );
    let mut session_rx = portal.inner.tracker.subscribe();

    loop {
        let current = session_rx.borrow_and_update().clone();

        match current.session() {
            Some(session) => {
                let due = session.expires_at - leeway;
                let wait = (due - chrono::Utc::now())
                    .to_std()
                    .unwrap_or(std::time::Duration::ZERO);
                let refresh_token = session.refresh_token.clone();

                tokio::select! {
                    () = cancel.cancelled() => break,
                    changed = session_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Session replaced (sign-out or refresh elsewhere).
                        continue;
                    }
                    () = tokio::time::sleep(wait) => {
                        match portal.inner.auth.refresh(&refresh_token).await {
                            Ok(pair) => portal.inner.tracker.set_refreshed(pair.into()),
                            Err(e) => {
                                warn!(error = %e, "token refresh failed; signing out");
                                portal.inner.tracker.set_signed_out();
                            }
                        }
                    }
                }
            }
            None => {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    changed = session_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
    debug!("refresh task stopped");
}

#[cfg(test)]
mod tests {
    use super::object_name;

    #[test]
    fn object_name_keeps_extension_lowercase() {
        let name = object_name("My Photo.JPG");
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains(' '));
    }

    #[test]
    fn object_name_without_extension_gets_bin() {
        assert!(object_name("photo").ends_with(".bin"));
    }

    #[test]
    fn object_names_do_not_collide() {
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }
}
