// ── Session tracker ──
//
// Process-wide observable session state. Initialized Unknown, resolved
// asynchronously by the Portal, and updated thereafter by pushes from
// the auth flows (sign-in, sign-out, token refresh). Consumers hold a
// `watch::Receiver` subscription; dropping the receiver releases it.
//
// Readers must treat the state as eventually consistent: between start
// and the first resolution the state is Unknown, and gated views must
// show a neutral loading placeholder, never a decision.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::model::{Session, User, UserId};

const AUTH_EVENT_CHANNEL_SIZE: usize = 16;

/// Observable session state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Not yet resolved -- no decision may be derived from this.
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Arc<Session>),
}

impl SessionState {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Discrete auth transitions, broadcast alongside the state channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Owner of the process-wide session state.
///
/// Exactly one tracker exists per [`Portal`](crate::Portal); consumers
/// subscribe rather than polling. All mutation goes through the
/// `pub(crate)` setters, which keeps every publish site inside core.
pub struct SessionTracker {
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionTracker {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        let (events, _) = broadcast::channel(AUTH_EVENT_CHANNEL_SIZE);
        Self { state, events }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to session-state changes. The receiver is the
    /// subscription handle; drop it on teardown.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Subscribe to discrete auth events.
    pub fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Access token of the signed-in session, if any.
    pub fn access_token(&self) -> Option<String> {
        self.state
            .borrow()
            .session()
            .map(|s| s.access_token.clone())
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.state.borrow().session().map(|s| s.user.clone())
    }

    /// The signed-in user's id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.state.borrow().session().map(|s| s.user.id)
    }

    // ── Writes (core-internal) ───────────────────────────────────────

    pub(crate) fn set_signed_in(&self, session: Session) {
        debug!(user = %session.user.id, "session signed in");
        let _ = self.state.send(SessionState::SignedIn(Arc::new(session)));
        let _ = self.events.send(AuthEvent::SignedIn);
    }

    pub(crate) fn set_refreshed(&self, session: Session) {
        debug!(user = %session.user.id, "session token refreshed");
        let _ = self.state.send(SessionState::SignedIn(Arc::new(session)));
        let _ = self.events.send(AuthEvent::TokenRefreshed);
    }

    pub(crate) fn set_signed_out(&self) {
        debug!("session signed out");
        let _ = self.state.send(SessionState::SignedOut);
        let _ = self.events.send(AuthEvent::SignedOut);
    }

    /// Resolve the initial Unknown state without emitting an event --
    /// restoring "not signed in" at startup is not a sign-out.
    pub(crate) fn resolve_signed_out(&self) {
        let _ = self.state.send(SessionState::SignedOut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: User {
                id: UserId(Uuid::new_v4()),
                email: Some("a@b.c".into()),
                created_at: None,
            },
        }
    }

    #[test]
    fn starts_unknown() {
        let tracker = SessionTracker::new();
        assert!(tracker.current().is_unknown());
        assert_eq!(tracker.access_token(), None);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let tracker = SessionTracker::new();
        let mut rx = tracker.subscribe();

        tracker.set_signed_in(session());
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_signed_in());

        tracker.set_signed_out();
        rx.changed().await.unwrap();
        assert!(matches!(*rx.borrow(), SessionState::SignedOut));
    }

    #[tokio::test]
    async fn events_distinguish_refresh_from_sign_in() {
        let tracker = SessionTracker::new();
        let mut events = tracker.events();

        tracker.set_signed_in(session());
        tracker.set_refreshed(session());

        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn);
        assert_eq!(events.recv().await.unwrap(), AuthEvent::TokenRefreshed);
    }

    #[test]
    fn initial_resolution_emits_no_event() {
        let tracker = SessionTracker::new();
        let mut events = tracker.events();

        tracker.resolve_signed_out();
        assert!(matches!(*tracker.state.borrow(), SessionState::SignedOut));
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
