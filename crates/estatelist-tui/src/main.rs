//! `estatelist-tui` — terminal front-end for the EstateList platform.
//!
//! Screens mirror the web routes: Home, Listings (filter + 9-per-page
//! pagination), Listing Details, Create/Edit Listing, Profile, Login,
//! Register, Blog, Contact, and the role-gated Admin Dashboard.
//! Protected screens sit behind the route guard: a loading placeholder
//! while the session resolves, a redirect to Login when signed out.
//!
//! Logs are written to a file (default `/tmp/estatelist-tui.log`) to
//! avoid corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use estatelist_core::{Portal, PortalConfig};

use crate::app::App;

/// Terminal client for browsing and managing EstateList listings.
#[derive(Parser, Debug)]
#[command(name = "estatelist-tui", version, about)]
struct Cli {
    /// Backend profile from the config file
    #[arg(short = 'p', long, env = "ESTATELIST_PROFILE")]
    profile: Option<String>,

    /// Project URL (overrides profile)
    #[arg(long, env = "ESTATELIST_PROJECT_URL")]
    project_url: Option<String>,

    /// Anon key (with --project-url)
    #[arg(long, env = "ESTATELIST_ANON_KEY", hide_env = true)]
    anon_key: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/estatelist-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let file = std::fs::File::create(&cli.log_file)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

fn build_portal(cli: &Cli) -> Result<Portal> {
    let config = if let Some(ref url_str) = cli.project_url {
        let url: url::Url = url_str
            .parse()
            .map_err(|_| eyre!("invalid project URL: {url_str}"))?;
        let anon_key = cli
            .anon_key
            .clone()
            .ok_or_else(|| eyre!("--anon-key is required with --project-url"))?;
        let name = cli.profile.as_deref().unwrap_or("default");
        PortalConfig::new(url, SecretString::from(anon_key))
            .with_restore_token(estatelist_config::load_refresh_token(name))
    } else {
        let cfg = estatelist_config::load_config_or_default();
        let (name, profile) =
            estatelist_config::select_profile(&cfg, cli.profile.as_deref())
                .map_err(|e| eyre!("{e}\nconfig file: {}", estatelist_config::config_path().display()))?;
        estatelist_config::profile_to_portal_config(profile, name)?
    };

    Ok(Portal::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli)?;

    tui::install_hooks()?;

    let portal = build_portal(&cli)?;
    info!("starting estatelist-tui");

    let mut app = App::new(portal);
    app.run().await
}
