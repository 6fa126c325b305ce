// estatelist-api: Async Rust client for the EstateList hosted backend
// (REST query surface, token auth, object storage, edge functions).

pub mod auth;
pub mod error;
pub mod functions;
pub mod listings;
pub mod profiles;
pub mod query;
pub mod rest;
pub mod storage;
pub mod transport;

pub use auth::{AuthClient, AuthUser, TokenPair};
pub use error::Error;
pub use functions::{ContactMessage, CreatePaymentIntent, FunctionsClient, PaymentIntent};
pub use listings::{ListingChanges, ListingQuery, ListingRecord, NewListingRecord};
pub use profiles::ProfileRecord;
pub use rest::RestClient;
pub use storage::StorageClient;
pub use transport::TransportConfig;
