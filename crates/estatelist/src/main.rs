mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use estatelist_core::{Portal, PortalConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Everything else talks to the backend
        cmd => {
            let (profile_name, portal_config) = build_portal_config(&cli.global)?;
            let portal = Portal::new(portal_config)?;
            portal.connect().await;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &portal, &cli.global, &profile_name).await;
            portal.shutdown().await;
            result
        }
    }
}

/// Build a `PortalConfig` from the config file, profile, and CLI overrides.
fn build_portal_config(global: &cli::GlobalOpts) -> Result<(String, PortalConfig), CliError> {
    let cfg = estatelist_config::load_config_or_default();

    // Explicit URL flag bypasses profiles entirely.
    if let Some(ref url_str) = global.project_url {
        let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
            field: "project-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
        let anon_key = global
            .anon_key
            .clone()
            .map(SecretString::from)
            .ok_or_else(|| CliError::Validation {
                field: "anon-key".into(),
                reason: "required when --project-url is given".into(),
            })?;

        let name = global.profile.clone().unwrap_or_else(|| "default".into());
        let config = PortalConfig::new(url, anon_key)
            .with_restore_token(estatelist_config::load_refresh_token(&name))
            .with_timeout(std::time::Duration::from_secs(global.timeout));
        return Ok((name, config));
    }

    let (name, profile) = estatelist_config::select_profile(&cfg, global.profile.as_deref())?;
    let config = estatelist_config::profile_to_portal_config(profile, name)?;
    Ok((name.to_owned(), config))
}
