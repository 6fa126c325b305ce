//! All possible UI actions. Actions are the sole mechanism for state
//! mutation: key events map to actions, async results come back as
//! actions, and the app loop drains them in order.

use std::sync::Arc;

use estatelist_core::{
    ContactMessage, GateDecision, Listing, ListingFilter, ListingForm, ListingId, Route,
    SessionState, User,
};

/// Snapshot of the listings view: the current page slice plus the
/// pagination metadata the footer needs. Built by the app from the
/// engine on every engine or pagination change.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub loading: bool,
    pub error: Option<String>,
    /// Rows of the current page only.
    pub rows: Vec<Arc<Listing>>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation (guard-checked by the app) ──────────────────────
    Navigate(Route),
    GoBack,

    // ── Pushed state (session tracker / listing engine bridges) ────
    SessionChanged(SessionState),
    EngineChanged,
    ListingsPage(PageView),

    // ── Listings browsing ──────────────────────────────────────────
    FilterChanged(ListingFilter),
    NextPage,
    PrevPage,
    OpenListing(ListingId),

    // ── Async fetch results ────────────────────────────────────────
    DetailsLoaded(Box<Listing>),
    DetailsFailed,
    EditLoaded(Box<Listing>),
    MyListingsLoaded(Vec<Listing>, Option<User>),
    AdminChecked(GateDecision),
    PaymentReady(String),

    // ── Form submissions ───────────────────────────────────────────
    SubmitLogin { email: String, password: String },
    SubmitRegister { email: String, password: String },
    SignOut,
    SubmitContact(Box<ContactMessage>),
    SubmitCreate {
        form: Box<ListingForm>,
        image_path: Option<String>,
    },
    SubmitEdit {
        current: Box<Listing>,
        form: Box<ListingForm>,
        image_path: Option<String>,
    },
    RequestDelete(Box<Listing>),
    RequestPayment(Box<Listing>),

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
