// estatelist-core: Reactive data layer between estatelist-api and
// consumers (CLI/TUI). Session tracking, the listing engine, route
// guarding, and the portal facade live here.

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod model;
pub mod portal;
pub mod route;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{IMAGE_BUCKET, PortalConfig};
pub use engine::{EngineState, ListingEngine, PAGE_SIZE};
pub use error::CoreError;
pub use gateway::{ApiGateway, ListingGateway};
pub use guard::{ADMIN_NOTICE, GateDecision, RouteGuard, evaluate, evaluate_admin};
pub use portal::{ImageUpload, Portal};
pub use route::{Route, RouteId};
pub use session::{AuthEvent, SessionState, SessionTracker};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Listing, ListingDraft, ListingFilter, ListingForm, ListingId, ListingPatch, Profile,
    PropertyType, Session, User, UserId,
};

// Contract types consumers pass through to the edge functions.
pub use estatelist_api::{ContactMessage, PaymentIntent};
