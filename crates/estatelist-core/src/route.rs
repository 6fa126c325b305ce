//! The browser-style route surface.
//!
//! Paths mirror the original web routes (`/listings/:id/edit`, …) so
//! deep links and the TUI's location bar stay interchangeable with the
//! hosted front-end.

use std::fmt;

use crate::model::ListingId;

/// Identity of each navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteId {
    #[default]
    Home,
    Listings,
    ListingDetails,
    CreateListing,
    EditListing,
    Profile,
    Login,
    Register,
    Blog,
    Contact,
    AdminDashboard,
}

/// A concrete navigation target: a view plus its parameter, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    /// Set for [`ListingDetails`](RouteId::ListingDetails) and
    /// [`EditListing`](RouteId::EditListing).
    pub listing: Option<ListingId>,
}

impl Route {
    pub fn new(id: RouteId) -> Self {
        Self { id, listing: None }
    }

    pub fn listing_details(id: ListingId) -> Self {
        Self {
            id: RouteId::ListingDetails,
            listing: Some(id),
        }
    }

    pub fn edit_listing(id: ListingId) -> Self {
        Self {
            id: RouteId::EditListing,
            listing: Some(id),
        }
    }

    /// Parse a browser-style path.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_start_matches('/').trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["home"] => Some(Self::new(RouteId::Home)),
            ["listings"] => Some(Self::new(RouteId::Listings)),
            ["listings", id] => id.parse().ok().map(Self::listing_details),
            ["listings", id, "edit"] => id.parse().ok().map(Self::edit_listing),
            ["create-listing"] => Some(Self::new(RouteId::CreateListing)),
            ["profile"] => Some(Self::new(RouteId::Profile)),
            ["login"] => Some(Self::new(RouteId::Login)),
            ["register"] => Some(Self::new(RouteId::Register)),
            ["blog"] => Some(Self::new(RouteId::Blog)),
            ["contact"] => Some(Self::new(RouteId::Contact)),
            ["admin"] => Some(Self::new(RouteId::AdminDashboard)),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.id, self.listing) {
            (RouteId::Home, _) => f.write_str("/home"),
            (RouteId::Listings, _) => f.write_str("/listings"),
            (RouteId::ListingDetails, Some(id)) => write!(f, "/listings/{id}"),
            (RouteId::ListingDetails, None) => f.write_str("/listings"),
            (RouteId::EditListing, Some(id)) => write!(f, "/listings/{id}/edit"),
            (RouteId::EditListing, None) => f.write_str("/listings"),
            (RouteId::CreateListing, _) => f.write_str("/create-listing"),
            (RouteId::Profile, _) => f.write_str("/profile"),
            (RouteId::Login, _) => f.write_str("/login"),
            (RouteId::Register, _) => f.write_str("/register"),
            (RouteId::Blog, _) => f.write_str("/blog"),
            (RouteId::Contact, _) => f.write_str("/contact"),
            (RouteId::AdminDashboard, _) => f.write_str("/admin"),
        }
    }
}

impl RouteId {
    /// Routes shown in the navigation bar, in order.
    pub const NAV: [RouteId; 5] = [
        Self::Home,
        Self::Listings,
        Self::Blog,
        Self::Contact,
        Self::Profile,
    ];

    /// Whether this view requires a signed-in session.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::CreateListing | Self::EditListing | Self::Profile | Self::AdminDashboard
        )
    }

    /// Whether this view additionally requires the admin role.
    pub fn requires_admin(self) -> bool {
        matches!(self, Self::AdminDashboard)
    }

    /// Short label for navigation chrome.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Listings => "Listings",
            Self::ListingDetails => "Details",
            Self::CreateListing => "Create",
            Self::EditListing => "Edit",
            Self::Profile => "Profile",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Blog => "Blog",
            Self::Contact => "Contact",
            Self::AdminDashboard => "Admin",
        }
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn paths_round_trip() {
        let id = ListingId(Uuid::new_v4());
        for route in [
            Route::new(RouteId::Home),
            Route::new(RouteId::Listings),
            Route::listing_details(id),
            Route::edit_listing(id),
            Route::new(RouteId::CreateListing),
            Route::new(RouteId::Profile),
            Route::new(RouteId::Login),
            Route::new(RouteId::Register),
            Route::new(RouteId::Blog),
            Route::new(RouteId::Contact),
            Route::new(RouteId::AdminDashboard),
        ] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
    }

    #[test]
    fn root_is_home() {
        assert_eq!(Route::parse("/"), Some(Route::new(RouteId::Home)));
    }

    #[test]
    fn garbage_listing_id_does_not_parse() {
        assert_eq!(Route::parse("/listings/not-a-uuid"), None);
        assert_eq!(Route::parse("/nope"), None);
    }

    #[test]
    fn protection_covers_exactly_the_mutating_views() {
        let protected: Vec<RouteId> = [
            RouteId::Home,
            RouteId::Listings,
            RouteId::ListingDetails,
            RouteId::CreateListing,
            RouteId::EditListing,
            RouteId::Profile,
            RouteId::Login,
            RouteId::Register,
            RouteId::Blog,
            RouteId::Contact,
            RouteId::AdminDashboard,
        ]
        .into_iter()
        .filter(|r| r.is_protected())
        .collect();
        assert_eq!(
            protected,
            vec![
                RouteId::CreateListing,
                RouteId::EditListing,
                RouteId::Profile,
                RouteId::AdminDashboard
            ]
        );
    }
}
