//! Contact relay command handler.

use estatelist_core::{ContactMessage, Portal};

use crate::cli::{ContactArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(
    portal: &Portal,
    args: ContactArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = ContactMessage {
        name: args.name,
        email: args.email,
        phone: args.phone,
        subject: args.subject,
        message: args.message,
    };

    if message.name.trim().is_empty() || message.message.trim().is_empty() {
        return Err(CliError::Validation {
            field: "message".into(),
            reason: "name and message are required".into(),
        });
    }

    portal.send_contact(&message).await?;
    if !global.quiet {
        eprintln!("Message sent");
    }
    Ok(())
}
