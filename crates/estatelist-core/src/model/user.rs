//! Authenticated identity and profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// The authenticated user as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A token-bearing session. Lifecycle is bound to the auth service's
/// token lifecycle; there is no independent persistence here.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    /// Seconds until the access token expires (negative when already
    /// expired).
    pub fn expires_in_secs(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

/// Role attribute from the `profiles` table, keyed by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub role: Option<String>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}
