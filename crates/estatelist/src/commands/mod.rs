//! Command handlers, one module per command group.

pub mod auth;
pub mod config_cmd;
pub mod contact;
pub mod listings;
pub mod pay;
pub mod util;

use estatelist_core::Portal;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a portal-backed command to its handler.
pub async fn dispatch(
    command: Command,
    portal: &Portal,
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(), CliError> {
    match command {
        Command::Auth(args) => auth::handle(portal, args, global, profile_name).await,
        Command::Listings(args) => listings::handle(portal, args, global).await,
        Command::Contact(args) => contact::handle(portal, args, global).await,
        Command::Pay(args) => pay::handle(portal, args, global).await,
        Command::Config(_) => unreachable!("config commands are dispatched without a portal"),
    }
}
