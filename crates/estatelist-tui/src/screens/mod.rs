//! Screen implementations, one per routed view.

mod admin;
mod blog;
mod contact;
mod create;
mod details;
mod edit;
mod home;
mod listings;
mod login;
mod profile;
mod register;

use estatelist_core::RouteId;

use crate::screen::Screen;

/// Construct every screen, keyed by its route.
pub fn create_screens() -> Vec<(RouteId, Box<dyn Screen>)> {
    vec![
        (RouteId::Home, Box::new(home::HomeScreen::new())),
        (RouteId::Listings, Box::new(listings::ListingsScreen::new())),
        (
            RouteId::ListingDetails,
            Box::new(details::DetailsScreen::new()),
        ),
        (
            RouteId::CreateListing,
            Box::new(create::CreateScreen::new()),
        ),
        (RouteId::EditListing, Box::new(edit::EditScreen::new())),
        (RouteId::Profile, Box::new(profile::ProfileScreen::new())),
        (RouteId::Login, Box::new(login::LoginScreen::new())),
        (RouteId::Register, Box::new(register::RegisterScreen::new())),
        (RouteId::Blog, Box::new(blog::BlogScreen::new())),
        (RouteId::Contact, Box::new(contact::ContactScreen::new())),
        (
            RouteId::AdminDashboard,
            Box::new(admin::AdminScreen::new()),
        ),
    ]
}
