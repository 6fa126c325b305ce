//! Clap derive structures for the `estatelist` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use estatelist_core::PropertyType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// estatelist -- browse and manage property listings from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "estatelist",
    version,
    about = "Browse and manage EstateList property listings",
    long_about = "A command-line client for the EstateList platform.\n\n\
        Listings are fetched from the hosted backend with server-side\n\
        filtering; mutations require a signed-in account.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "ESTATELIST_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Project URL (overrides profile)
    #[arg(long, env = "ESTATELIST_PROJECT_URL", global = true)]
    pub project_url: Option<String>,

    /// Anon key for the backend project
    #[arg(long, env = "ESTATELIST_ANON_KEY", global = true, hide_env = true)]
    pub anon_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ESTATELIST_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ESTATELIST_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Command Tree ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, register, or inspect the current session
    Auth(AuthArgs),

    /// Browse and manage property listings
    Listings(ListingsArgs),

    /// Send a message through the contact relay
    Contact(ContactArgs),

    /// Create a payment intent for a listing
    Pay(PayArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in with email + password (password is prompted)
    Login {
        /// Account email
        #[arg(long, short = 'e')]
        email: String,
    },

    /// Register a new account (password is prompted)
    Register {
        /// Account email
        #[arg(long, short = 'e')]
        email: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,
}

// ── Listings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListingsArgs {
    #[command(subcommand)]
    pub command: ListingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListingsCommand {
    /// List listings, newest first, with optional filters
    List(ListFilterArgs),

    /// Show one listing
    Get {
        /// Listing id
        id: String,
    },

    /// Create a listing
    Create(ListingFieldArgs),

    /// Edit a listing (absent flags keep current values)
    Edit {
        /// Listing id
        id: String,

        #[command(flatten)]
        fields: ListingEditArgs,
    },

    /// Delete a listing (and its stored image, best effort)
    Delete {
        /// Listing id
        id: String,
    },

    /// List the signed-in user's own listings
    Mine,
}

#[derive(Debug, Args)]
pub struct ListFilterArgs {
    /// Property type filter
    #[arg(long = "type", value_enum)]
    pub property_type: Option<PropertyTypeArg>,

    /// Inclusive lower price bound
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Case-insensitive location substring
    #[arg(long)]
    pub location: Option<String>,

    /// Page of 9 listings to show
    #[arg(long, default_value = "1")]
    pub page: usize,
}

#[derive(Debug, Args)]
pub struct ListingFieldArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    #[arg(long = "type", value_enum)]
    pub property_type: PropertyTypeArg,

    #[arg(long)]
    pub price: f64,

    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub bedrooms: u32,

    #[arg(long)]
    pub bathrooms: u32,

    /// Area in square feet
    #[arg(long)]
    pub area: u32,

    /// Path to a property image to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListingEditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "type", value_enum)]
    pub property_type: Option<PropertyTypeArg>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub bedrooms: Option<u32>,

    #[arg(long)]
    pub bathrooms: Option<u32>,

    /// Area in square feet
    #[arg(long)]
    pub area: Option<u32>,

    /// Path to a replacement property image
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// `ValueEnum` mirror of the domain `PropertyType`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PropertyTypeArg {
    House,
    Apartment,
    Condo,
    Townhouse,
}

impl From<PropertyTypeArg> for PropertyType {
    fn from(arg: PropertyTypeArg) -> Self {
        match arg {
            PropertyTypeArg::House => Self::House,
            PropertyTypeArg::Apartment => Self::Apartment,
            PropertyTypeArg::Condo => Self::Condo,
            PropertyTypeArg::Townhouse => Self::Townhouse,
        }
    }
}

// ── Contact ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub message: String,
}

// ── Pay ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PayArgs {
    /// Listing id to purchase
    pub listing_id: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,
}
