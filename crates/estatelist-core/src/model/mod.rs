//! Domain model: listings, users, sessions, and form state.

mod form;
mod ids;
mod listing;
mod user;

pub use form::ListingForm;
pub use ids::{ListingId, UserId};
pub use listing::{Listing, ListingDraft, ListingFilter, ListingPatch, PropertyType};
pub use user::{Profile, Session, User};
