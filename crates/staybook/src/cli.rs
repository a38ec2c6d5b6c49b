//! Clap derive structures for the `staybook` CLI.
//!
//! Defines the command tree, global flags, and shared types. Kept free of
//! crate-internal imports so build.rs can render man pages from it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// staybook -- offer places and book stays from the command line
#[derive(Debug, Parser)]
#[command(
    name = "staybook",
    version,
    about = "Offer places and manage bookings from the command line",
    long_about = "Browse offered places, list your own offers, and book stays.\n\n\
        Every command talks to the configured document store as the\n\
        signed-in user of the active profile.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "STAYBOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Database root URL (overrides profile)
    #[arg(long, short = 'd', env = "STAYBOOK_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Signed-in user id (overrides profile)
    #[arg(long, short = 'u', env = "STAYBOOK_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Auth token (overrides profile and keyring)
    #[arg(long, env = "STAYBOOK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STAYBOOK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (local emulators)
    #[arg(long, short = 'k', env = "STAYBOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "STAYBOOK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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
    /// Plain text, one id per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and offer places
    #[command(alias = "pl")]
    Places(PlacesArgs),

    /// Manage your bookings
    #[command(alias = "bk")]
    Bookings(BookingsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Places ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PlacesArgs {
    #[command(subcommand)]
    pub command: PlacesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlacesCommand {
    /// List offered places
    #[command(alias = "ls")]
    List {
        /// Only places offered by other users
        #[arg(long, short = 'b')]
        bookable: bool,
    },

    /// Show one place
    Get {
        /// Place ID
        #[arg(allow_hyphen_values = true)]
        place: String,
    },

    /// Offer a new place
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        image_url: String,

        /// Price per night
        #[arg(long)]
        price: f64,

        /// First available day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: String,

        /// Last available day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        till: String,

        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        #[arg(long, requires = "lat")]
        address: Option<String>,
    },

    /// Change an offered place; omitted fields keep their value
    Update {
        /// Place ID
        #[arg(allow_hyphen_values = true)]
        place: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        till: Option<String>,
    },
}

// ── Bookings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List your bookings
    #[command(alias = "ls")]
    List,

    /// Book a place
    Create {
        /// Place ID to book
        #[arg(long, allow_hyphen_values = true)]
        place: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Number of guests
        #[arg(long, default_value = "1")]
        guests: u32,

        /// Arrival day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: String,

        /// Departure day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        till: String,
    },

    /// Cancel one of your bookings
    #[command(alias = "rm")]
    Cancel {
        /// Booking ID
        #[arg(allow_hyphen_values = true)]
        booking: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an auth token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
