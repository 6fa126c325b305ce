//! Application core — event loop, guarded routing, action dispatch.
//!
//! Navigation goes through the route guard: protected views wait on a
//! loading placeholder while the session is unknown, redirect to Login
//! when signed out, and the admin dashboard additionally requires the
//! profile role. Guard decisions are re-derived on navigation and on
//! session-state transitions, never per render.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use estatelist_core::{
    ApiGateway, EngineState, GateDecision, ImageUpload, ListingEngine, Portal, Route, RouteId,
    SessionState, evaluate,
};

use crate::action::{Action, Notification, NotificationLevel, PageView};
use crate::event::{Event, EventReader};
use crate::screen::Screen;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets;

/// How long a notification stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    portal: Portal,
    engine: ListingEngine<ApiGateway>,
    /// Current route (view + parameter).
    route: Route,
    /// Previous route for Esc/GoBack.
    previous: Option<Route>,
    /// Route waiting on session resolution (guard returned Pending).
    pending: Option<Route>,
    screens: HashMap<RouteId, Box<dyn Screen>>,
    running: bool,
    session: SessionState,
    notification: Option<(Notification, Instant)>,
    throbber: ThrobberState,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(portal: Portal) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let engine = portal.engine();
        let screens: HashMap<RouteId, Box<dyn Screen>> = create_screens().into_iter().collect();

        Self {
            portal,
            engine,
            route: Route::new(RouteId::Home),
            previous: None,
            pending: None,
            screens,
            running: true,
            session: SessionState::Unknown,
            notification: None,
            throbber: ThrobberState::default(),
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.route.id) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Forward session and engine watch changes into the action loop.
    fn spawn_bridges(&self) {
        let tx = self.action_tx.clone();
        let mut session_rx = self.portal.session().subscribe();
        tokio::spawn(async move {
            while session_rx.changed().await.is_ok() {
                let state = session_rx.borrow().clone();
                if tx.send(Action::SessionChanged(state)).is_err() {
                    break;
                }
            }
        });

        let tx = self.action_tx.clone();
        let mut engine_rx = self.engine.subscribe();
        tokio::spawn(async move {
            while engine_rx.changed().await.is_ok() {
                if tx.send(Action::EngineChanged).is_err() {
                    break;
                }
            }
        });
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;
        self.spawn_bridges();

        // Resolve the session in the background; gated views show the
        // placeholder until this lands.
        let portal = self.portal.clone();
        tokio::spawn(async move { portal.connect().await });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.portal.shutdown().await;
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        let wants_text = self
            .screens
            .get(&self.route.id)
            .is_some_and(|s| s.wants_text_input());

        // Esc backs out of any view; text-capturing screens get it
        // first (they use it to drop field focus).
        if key.code == KeyCode::Esc && !wants_text {
            return Ok(Some(Action::GoBack));
        }

        if !wants_text {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                    let idx = (c as usize) - ('1' as usize);
                    let id = RouteId::NAV[idx];
                    return Ok(Some(Action::Navigate(Route::new(id))));
                }
                (KeyModifiers::NONE, KeyCode::Char('6')) => {
                    return Ok(Some(Action::Navigate(Route::new(RouteId::CreateListing))));
                }
                (KeyModifiers::NONE, KeyCode::Char('7')) => {
                    return Ok(Some(Action::Navigate(Route::new(RouteId::AdminDashboard))));
                }
                (KeyModifiers::NONE, KeyCode::Char('l')) => {
                    return Ok(Some(Action::Navigate(Route::new(RouteId::Login))));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.route.id) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    // ── Action processing ────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                self.throbber.calc_next();
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, t)| t.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::Navigate(route) => self.navigate(*route),

            Action::GoBack => {
                if let Some(prev) = self.previous.take() {
                    self.navigate(prev);
                }
            }

            Action::SessionChanged(state) => self.on_session_changed(state.clone()),

            Action::EngineChanged => self.push_page_view(),
            Action::FilterChanged(filter) => self.engine.set_filter(filter.clone()),
            Action::NextPage => {
                self.engine.next_page();
                self.push_page_view();
            }
            Action::PrevPage => {
                self.engine.prev_page();
                self.push_page_view();
            }

            Action::OpenListing(id) => self.navigate(Route::listing_details(*id)),

            Action::SubmitLogin { email, password } => self.submit_login(email, password),
            Action::SubmitRegister { email, password } => self.submit_register(email, password),
            Action::SignOut => self.sign_out(),
            Action::SubmitContact(message) => self.submit_contact((**message).clone()),
            Action::SubmitCreate { form, image_path } => {
                self.submit_create(form, image_path.as_deref());
            }
            Action::SubmitEdit {
                current,
                form,
                image_path,
            } => self.submit_edit(current, form, image_path.as_deref()),
            Action::RequestDelete(listing) => self.request_delete((**listing).clone()),
            Action::RequestPayment(listing) => self.request_payment((**listing).clone()),

            Action::AdminChecked(decision) => self.on_admin_checked(*decision),

            Action::PaymentReady(secret) => {
                self.notify(Notification::success(format!(
                    "Payment intent created: {secret}"
                )));
            }

            Action::Notify(n) => self.notify(n.clone()),
            Action::DismissNotification => self.notification = None,

            _ => {}
        }

        // Screens see every action after the app has reacted.
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }

        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    // ── Guarded navigation ───────────────────────────────────────────

    fn navigate(&mut self, route: Route) {
        if route.id.requires_admin() {
            self.navigate_admin(route);
            return;
        }

        match evaluate(route.id, &self.session) {
            GateDecision::Pending => {
                debug!(?route, "session unknown; navigation pending");
                self.pending = Some(route);
            }
            GateDecision::RedirectToLogin => {
                self.notify(Notification::info("Please sign in first"));
                self.switch_to(Route::new(RouteId::Login));
            }
            GateDecision::Allow => self.switch_to(route),
            GateDecision::Denied { notice } => {
                self.notify(Notification::error(notice));
                self.switch_to(Route::new(RouteId::Home));
            }
        }
    }

    /// Admin gating needs a profile fetch; stay on the current view
    /// until the decision arrives.
    fn navigate_admin(&mut self, route: Route) {
        match evaluate(route.id, &self.session) {
            GateDecision::Pending => {
                self.pending = Some(route);
                return;
            }
            GateDecision::RedirectToLogin => {
                self.notify(Notification::info("Please sign in first"));
                self.switch_to(Route::new(RouteId::Login));
                return;
            }
            _ => {}
        }

        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let decision = portal.admin_decision().await;
            let _ = tx.send(Action::AdminChecked(decision));
        });
    }

    fn on_admin_checked(&mut self, decision: GateDecision) {
        match decision {
            GateDecision::Allow => self.switch_to(Route::new(RouteId::AdminDashboard)),
            GateDecision::Denied { notice } => {
                self.notify(Notification::error(notice));
                self.switch_to(Route::new(RouteId::Home));
            }
            GateDecision::RedirectToLogin => {
                self.notify(Notification::info("Please sign in first"));
                self.switch_to(Route::new(RouteId::Login));
            }
            GateDecision::Pending => self.pending = Some(Route::new(RouteId::AdminDashboard)),
        }
    }

    fn on_session_changed(&mut self, state: SessionState) {
        let was_unknown = self.session.is_unknown();
        self.session = state;

        // A navigation parked on the unknown session resumes now.
        if let Some(pending) = self.pending.take() {
            self.navigate(pending);
            return;
        }

        // Sign-out while on a protected view redirects, once.
        if !was_unknown
            && self.route.id.is_protected()
            && matches!(self.session, SessionState::SignedOut)
        {
            self.notify(Notification::info("Signed out"));
            self.switch_to(Route::new(RouteId::Login));
        }
    }

    fn switch_to(&mut self, route: Route) {
        if route != self.route {
            debug!("navigating: {} -> {}", self.route, route);
            if let Some(screen) = self.screens.get_mut(&self.route.id) {
                screen.set_focused(false);
            }
            self.previous = Some(self.route);
            self.route = route;
        }
        if let Some(screen) = self.screens.get_mut(&route.id) {
            screen.set_focused(true);
            screen.on_enter(&route);
        }
        self.enter_route_effects(route);
    }

    /// Data fetches triggered by landing on a view.
    fn enter_route_effects(&mut self, route: Route) {
        match route.id {
            RouteId::Listings | RouteId::AdminDashboard => self.engine.load(),

            RouteId::ListingDetails => {
                if let Some(id) = route.listing {
                    let portal = self.portal.clone();
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        match portal.listing(id).await {
                            Ok(listing) => {
                                let _ = tx.send(Action::DetailsLoaded(Box::new(listing)));
                            }
                            Err(e) => {
                                warn!(error = %e, "failed to load listing details");
                                let _ = tx.send(Action::DetailsFailed);
                            }
                        }
                    });
                }
            }

            RouteId::EditListing => {
                if let Some(id) = route.listing {
                    let portal = self.portal.clone();
                    let tx = self.action_tx.clone();
                    tokio::spawn(async move {
                        match portal.listing(id).await {
                            Ok(listing) => {
                                let owner = portal.session().user_id();
                                if owner.is_some_and(|u| listing.owned_by(u)) {
                                    let _ = tx.send(Action::EditLoaded(Box::new(listing)));
                                } else {
                                    let _ = tx.send(Action::Notify(Notification::error(
                                        "You are not authorized to edit this listing",
                                    )));
                                    let _ = tx
                                        .send(Action::Navigate(Route::new(RouteId::Listings)));
                                }
                            }
                            Err(e) => {
                                let _ = tx.send(Action::Notify(Notification::error(format!(
                                    "Failed to load listing: {e}"
                                ))));
                                let _ =
                                    tx.send(Action::Navigate(Route::new(RouteId::Listings)));
                            }
                        }
                    });
                }
            }

            RouteId::Profile => self.reload_profile(),

            _ => {}
        }
    }

    fn reload_profile(&self) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let user = portal.session().user();
            match portal.my_listings().await {
                Ok(listings) => {
                    let _ = tx.send(Action::MyListingsLoaded(listings, user));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Failed to load profile data: {e}"
                    ))));
                }
            }
        });
    }

    // ── Engine state → view snapshot ─────────────────────────────────

    fn push_page_view(&mut self) {
        let state = self.engine.state();
        let view = match state {
            EngineState::Idle | EngineState::Loading => PageView {
                loading: true,
                ..PageView::default()
            },
            EngineState::Error(message) => PageView {
                error: Some(message),
                ..PageView::default()
            },
            EngineState::Loaded(rows) => PageView {
                loading: false,
                error: None,
                rows: self.engine.page_slice(),
                page: self.engine.page(),
                page_count: self.engine.page_count(),
                total: rows.len(),
            },
        };
        let _ = self.action_tx.send(Action::ListingsPage(view));
    }

    // ── Async command handlers ───────────────────────────────────────

    fn submit_login(&self, email: &str, password: &str) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        let (email, password) = (email.to_owned(), password.to_owned());
        tokio::spawn(async move {
            match portal.sign_in(&email, &password).await {
                Ok(user) => {
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "Welcome back, {}",
                        user.email.as_deref().unwrap_or("friend")
                    ))));
                    let _ = tx.send(Action::Navigate(Route::new(RouteId::Home)));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn submit_register(&self, email: &str, password: &str) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        let (email, password) = (email.to_owned(), password.to_owned());
        tokio::spawn(async move {
            match portal.sign_up(&email, &password).await {
                Ok(_) => {
                    let _ = tx.send(Action::Notify(Notification::success(
                        "Account created successfully",
                    )));
                    let _ = tx.send(Action::Navigate(Route::new(RouteId::Home)));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn sign_out(&self) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let _ = portal.sign_out().await;
            let _ = tx.send(Action::Navigate(Route::new(RouteId::Home)));
        });
    }

    fn submit_contact(&self, message: estatelist_core::ContactMessage) {
        if message.name.is_empty() || message.message.is_empty() {
            let _ = self.action_tx.send(Action::Notify(Notification::error(
                "Name and message are required",
            )));
            return;
        }
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match portal.send_contact(&message).await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::success("Message sent!")));
                    let _ = tx.send(Action::Navigate(Route::new(RouteId::Home)));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn submit_create(&self, form: &estatelist_core::ListingForm, image_path: Option<&str>) {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(e.to_string())));
                return;
            }
        };
        let image = match image_path.map(read_image).transpose() {
            Ok(image) => image,
            Err(message) => {
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(message)));
                return;
            }
        };

        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match portal.create_listing(&draft, image).await {
                Ok(_) => {
                    let _ = tx.send(Action::Notify(Notification::success(
                        "Listing created successfully!",
                    )));
                    let _ = tx.send(Action::Navigate(Route::new(RouteId::Listings)));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn submit_edit(
        &self,
        current: &estatelist_core::Listing,
        form: &estatelist_core::ListingForm,
        image_path: Option<&str>,
    ) {
        let patch = match form.validate() {
            Ok(patch) => patch,
            Err(e) => {
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(e.to_string())));
                return;
            }
        };
        let image = match image_path.map(read_image).transpose() {
            Ok(image) => image,
            Err(message) => {
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(message)));
                return;
            }
        };

        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        let current = current.clone();
        tokio::spawn(async move {
            match portal.update_listing(&current, &patch, image).await {
                Ok(updated) => {
                    let _ = tx.send(Action::Notify(Notification::success(
                        "Listing updated successfully!",
                    )));
                    let _ = tx.send(Action::Navigate(Route::listing_details(updated.id)));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn request_delete(&self, listing: estatelist_core::Listing) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        let from_profile = self.route.id == RouteId::Profile;
        tokio::spawn(async move {
            match portal.delete_listing(&listing).await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::success(
                        "Listing deleted successfully",
                    )));
                    let _ = tx.send(Action::Navigate(Route::new(if from_profile {
                        RouteId::Profile
                    } else {
                        RouteId::Listings
                    })));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Failed to delete listing: {e}"
                    ))));
                }
            }
        });
    }

    fn request_payment(&self, listing: estatelist_core::Listing) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match portal.create_payment_intent(&listing).await {
                Ok(intent) => {
                    let _ = tx.send(Action::PaymentReady(intent.client_secret));
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Payment failed: {e}"
                    ))));
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_nav(frame, rows[0]);
        self.render_body(frame, rows[1]);
        self.render_status(frame, rows[2]);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, id) in RouteId::NAV.iter().enumerate() {
            let label = format!(" {}:{} ", i + 1, id.label());
            if *id == self.route.id {
                spans.push(Span::styled(label, theme::title_style()));
            } else {
                spans.push(Span::styled(label, theme::dim()));
            }
        }

        let who = match self.session {
            SessionState::Unknown => Span::styled("resolving session…", theme::dim()),
            SessionState::SignedOut => Span::styled("signed out", theme::dim()),
            SessionState::SignedIn(ref session) => Span::styled(
                session.user.email.clone().unwrap_or_else(|| "signed in".into()),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
        };

        let cols =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(30)]).split(area);
        frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);
        frame.render_widget(
            Paragraph::new(Line::from(who)).alignment(ratatui::layout::Alignment::Right),
            cols[1],
        );
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        // A guard-pending navigation renders the neutral placeholder:
        // no content, no redirect, until the session resolves.
        if self.pending.is_some() {
            widgets::render_loading(
                frame,
                area,
                "Checking session",
                &mut self.throbber.clone(),
            );
            return;
        }

        if let Some(screen) = self.screens.get(&self.route.id) {
            screen.render(frame, area);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref notification, _)) = self.notification {
            let color = match notification.level {
                NotificationLevel::Success => theme::SUCCESS_GREEN,
                NotificationLevel::Error => theme::ERROR_RED,
                NotificationLevel::Info => theme::WARNING_YELLOW,
            };
            frame.render_widget(
                Paragraph::new(notification.message.clone()).style(Style::default().fg(color)),
                area,
            );
            return;
        }

        frame.render_widget(
            Paragraph::new(format!("{}  ·  [q] quit  [esc] back", self.route))
                .style(theme::dim()),
            area,
        );
    }
}

/// Read an image from disk for upload, mapping the extension to a
/// content type.
fn read_image(path: &str) -> Result<ImageUpload, String> {
    let p = std::path::Path::new(path);
    let bytes = std::fs::read(p).map_err(|e| format!("Could not read {path}: {e}"))?;
    let file_name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.bin".into());
    let content_type = match p
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(ImageUpload {
        file_name,
        content_type: content_type.into(),
        bytes,
    })
}
