//! Payment-intent command handler.
//!
//! Creates the intent through the edge function and prints the client
//! secret; confirming the payment happens in a card-capable surface,
//! not here.

use estatelist_core::Portal;

use crate::cli::{GlobalOpts, PayArgs};
use crate::error::CliError;
use crate::output::format_price;

use super::util;

pub async fn handle(portal: &Portal, args: PayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let id = util::parse_listing_id(&args.listing_id)?;
    let listing = portal.listing(id).await?;

    if !util::confirm(
        &format!(
            "Create a payment intent of {} for '{}'?",
            format_price(listing.price),
            listing.title
        ),
        global.yes,
    )? {
        return Ok(());
    }

    let intent = portal.create_payment_intent(&listing).await?;
    println!("{}", intent.client_secret);
    if !global.quiet {
        eprintln!("Complete the payment with this client secret in a Stripe-capable client.");
    }
    Ok(())
}
