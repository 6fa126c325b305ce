// ── Route guard ──
//
// Binary gate per protected view. While the session is unknown the
// guard stays Pending and the view renders a loading placeholder --
// never content, never a redirect. Once the session resolves, the
// guard either allows the view or redirects to the login route. The
// admin variant additionally checks the role attribute on the
// signed-in user's profile.
//
// Decisions are re-derived once per session-state transition (the
// watch channel), not per render.

use tokio::sync::watch;

use crate::model::Profile;
use crate::route::RouteId;
use crate::session::SessionState;

/// Notice shown when a signed-in non-admin hits the admin dashboard.
pub const ADMIN_NOTICE: &str = "Admin access required";

/// Outcome of gating one view against the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session unknown: render a loading placeholder, decide nothing.
    Pending,
    /// Render the wrapped view.
    Allow,
    /// Signed out on a protected view: go to `/login`.
    RedirectToLogin,
    /// Signed in but missing the required role: go home with a notice.
    Denied { notice: &'static str },
}

/// Evaluate the plain auth gate for `route`.
pub fn evaluate(route: RouteId, session: &SessionState) -> GateDecision {
    if !route.is_protected() {
        return GateDecision::Allow;
    }
    match session {
        SessionState::Unknown => GateDecision::Pending,
        SessionState::SignedOut => GateDecision::RedirectToLogin,
        SessionState::SignedIn(_) => GateDecision::Allow,
    }
}

/// Evaluate the elevated gate for admin-only views.
///
/// `profile` is the signed-in user's profile row, or `None` when it
/// could not be fetched -- absence of a matching admin role redirects
/// identically to the unauthenticated case, with a distinct notice.
pub fn evaluate_admin(session: &SessionState, profile: Option<&Profile>) -> GateDecision {
    match session {
        SessionState::Unknown => GateDecision::Pending,
        SessionState::SignedOut => GateDecision::RedirectToLogin,
        SessionState::SignedIn(_) => {
            if profile.is_some_and(Profile::is_admin) {
                GateDecision::Allow
            } else {
                GateDecision::Denied { notice: ADMIN_NOTICE }
            }
        }
    }
}

/// A guard bound to one route and one session subscription.
///
/// Holds the subscription handle; dropping the guard releases it.
pub struct RouteGuard {
    route: RouteId,
    session: watch::Receiver<SessionState>,
}

impl RouteGuard {
    pub fn new(route: RouteId, session: watch::Receiver<SessionState>) -> Self {
        Self { route, session }
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    /// Decision for the current session state.
    pub fn decision(&self) -> GateDecision {
        evaluate(self.route, &self.session.borrow())
    }

    /// Wait for the next session-state transition and return the new
    /// decision. Returns `None` when the tracker has gone away.
    pub async fn changed(&mut self) -> Option<GateDecision> {
        self.session.changed().await.ok()?;
        Some(evaluate(self.route, &self.session.borrow()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{Session, User, UserId};
    use crate::session::SessionTracker;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use uuid::Uuid;

    fn signed_in() -> SessionState {
        SessionState::SignedIn(Arc::new(Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: User {
                id: UserId(Uuid::new_v4()),
                email: None,
                created_at: None,
            },
        }))
    }

    fn profile(role: Option<&str>) -> Profile {
        Profile {
            id: UserId(Uuid::new_v4()),
            role: role.map(str::to_owned),
        }
    }

    #[test]
    fn unknown_session_is_pending_not_a_decision() {
        assert_eq!(
            evaluate(RouteId::Profile, &SessionState::Unknown),
            GateDecision::Pending
        );
    }

    #[test]
    fn signed_out_redirects_protected_views_only() {
        assert_eq!(
            evaluate(RouteId::CreateListing, &SessionState::SignedOut),
            GateDecision::RedirectToLogin
        );
        assert_eq!(
            evaluate(RouteId::Listings, &SessionState::SignedOut),
            GateDecision::Allow
        );
    }

    #[test]
    fn public_views_allow_even_while_unknown() {
        assert_eq!(
            evaluate(RouteId::Home, &SessionState::Unknown),
            GateDecision::Allow
        );
    }

    #[test]
    fn signed_in_allows_protected_views() {
        assert_eq!(
            evaluate(RouteId::EditListing, &signed_in()),
            GateDecision::Allow
        );
    }

    #[test]
    fn admin_gate_requires_the_admin_role() {
        let session = signed_in();
        assert_eq!(
            evaluate_admin(&session, Some(&profile(Some("admin")))),
            GateDecision::Allow
        );
        assert_eq!(
            evaluate_admin(&session, Some(&profile(Some("agent")))),
            GateDecision::Denied { notice: ADMIN_NOTICE }
        );
        assert_eq!(
            evaluate_admin(&session, None),
            GateDecision::Denied { notice: ADMIN_NOTICE }
        );
        assert_eq!(
            evaluate_admin(&SessionState::SignedOut, None),
            GateDecision::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn guard_reacts_once_per_transition() {
        let tracker = SessionTracker::new();
        let mut guard = RouteGuard::new(RouteId::Profile, tracker.subscribe());

        assert_eq!(guard.decision(), GateDecision::Pending);

        // Session resolves to none -> exactly one redirect decision.
        tracker.resolve_signed_out();
        assert_eq!(guard.changed().await, Some(GateDecision::RedirectToLogin));

        // No further transition -> nothing new to observe.
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(20), guard.changed())
                .await
                .is_err()
        );
    }
}
