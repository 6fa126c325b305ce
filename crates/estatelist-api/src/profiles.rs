// `profiles` table endpoints.
//
// One row per user, keyed by the auth user id. Only the role attribute
// matters here: `"admin"` unlocks the dashboard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::query::Query;
use crate::rest::RestClient;

pub const PROFILES_TABLE: &str = "profiles";

/// A stored profile row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub role: Option<String>,
}

impl RestClient {
    /// Fetch the profile for `user_id`.
    pub async fn get_profile(
        &self,
        user_id: &Uuid,
        access_token: Option<&str>,
    ) -> Result<ProfileRecord, Error> {
        let q = Query::select("role,id").eq("id", user_id);
        self.get_single(PROFILES_TABLE, q, access_token).await
    }
}
