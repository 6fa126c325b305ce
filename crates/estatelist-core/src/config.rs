// ── Runtime connection configuration ──
//
// These types describe *how* to reach the hosted backend. They carry
// key material and connection tuning, but never touch disk. The
// CLI/TUI constructs a `PortalConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

/// Bucket holding listing images, public-read.
pub const IMAGE_BUCKET: &str = "listing-images";

/// Configuration for connecting to one backend project.
///
/// Built by CLI/TUI, passed to `Portal` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Project root URL (e.g. `https://abcdefgh.supabase.co`).
    pub project_url: Url,
    /// Public anon key; sent on every request.
    pub anon_key: SecretString,
    /// Image bucket name.
    pub bucket: String,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Refresh token from a previous session, if the caller persisted
    /// one. `None` resolves the initial session state to signed-out.
    pub restore_refresh_token: Option<SecretString>,
    /// Seconds before access-token expiry at which the background
    /// refresh fires.
    pub refresh_leeway_secs: u64,
}

impl PortalConfig {
    pub fn new(project_url: Url, anon_key: SecretString) -> Self {
        Self {
            project_url,
            anon_key,
            bucket: IMAGE_BUCKET.into(),
            timeout: std::time::Duration::from_secs(30),
            restore_refresh_token: None,
            refresh_leeway_secs: 60,
        }
    }

    pub fn with_restore_token(mut self, token: Option<SecretString>) -> Self {
        self.restore_refresh_token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
