//! Auth command handlers.
//!
//! Sign-in stores the refresh token in the system keyring so later
//! invocations restore the session; logout revokes and forgets it.

use estatelist_core::Portal;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    portal: &Portal,
    args: AuthArgs,
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { email } => {
            let password = util::prompt_password(&format!("Password for {email}"))?;
            let user = portal.sign_in(&email, &password).await?;
            persist_session(portal, profile_name);
            if !global.quiet {
                eprintln!("Signed in as {}", user.email.as_deref().unwrap_or("<no email>"));
            }
            Ok(())
        }

        AuthCommand::Register { email } => {
            let password = util::prompt_password(&format!("Choose a password for {email}"))?;
            let confirmed = util::prompt_password("Repeat password")?;
            if password != confirmed {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }
            let user = portal.sign_up(&email, &password).await?;
            persist_session(portal, profile_name);
            if !global.quiet {
                eprintln!(
                    "Account created: {}",
                    user.email.as_deref().unwrap_or("<no email>")
                );
            }
            Ok(())
        }

        AuthCommand::Logout => {
            portal.sign_out().await?;
            estatelist_config::clear_refresh_token(profile_name);
            if !global.quiet {
                eprintln!("Signed out");
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            let state = portal.session().current();
            match state.session() {
                Some(session) => {
                    let user = &session.user;
                    println!("{}", user.email.as_deref().unwrap_or("<no email>"));
                    println!("id: {}", user.id);
                    if let Some(created) = user.created_at {
                        println!("member since: {}", created.format("%Y-%m-%d"));
                    }
                }
                None => println!("Not signed in"),
            }
            Ok(())
        }
    }
}

/// Persist the refresh token, best effort -- a missing keyring only
/// costs session restore, not the current command.
fn persist_session(portal: &Portal, profile_name: &str) {
    if let Some(session) = portal.session().current().session() {
        if let Err(e) = estatelist_config::store_refresh_token(profile_name, &session.refresh_token)
        {
            tracing::warn!(error = %e, "could not persist session to keyring");
        }
    }
}
