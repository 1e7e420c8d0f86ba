//! Clap derive structures for the `shelf` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use shelf_config::Defaults;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shelf -- CRUD for movie and product catalogs
#[derive(Debug, Parser)]
#[command(
    name = "shelf",
    version,
    about = "Manage movie and product catalogs from the command line",
    long_about = "Create, list, edit and delete records in a hosted table store\n\
        (PostgREST-style REST API), or try it out against an in-memory\n\
        demo catalog with --memory.",
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
    #[arg(long, short = 'p', env = "SHELF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// REST base URL (overrides profile)
    #[arg(long, env = "SHELF_URL", global = true)]
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[arg(long, env = "SHELF_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Table name for the selected resource (overrides profile)
    #[arg(long, env = "SHELF_RESOURCE", global = true)]
    pub resource: Option<String>,

    /// Use the in-memory demo catalog instead of a server
    #[arg(long, env = "SHELF_MEMORY", global = true)]
    pub memory: bool,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "SHELF_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SHELF_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "SHELF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Fill unset presentation flags from the config file's `[defaults]`.
    pub fn apply_defaults(&mut self, defaults: &Defaults) {
        if self.output.is_none() {
            self.output = OutputFormat::from_str(&defaults.output, true).ok();
        }
        if self.color.is_none() {
            self.color = ColorMode::from_str(&defaults.color, true).ok();
        }
        self.insecure |= defaults.insecure;
    }

    pub fn output(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
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
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the movie catalog
    #[command(alias = "m")]
    Movies(MoviesArgs),

    /// Manage the product catalog
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MOVIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MoviesArgs {
    #[command(subcommand)]
    pub command: MoviesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MoviesCommand {
    /// List movies (sorted by title unless the profile says otherwise)
    #[command(alias = "ls")]
    List,

    /// Show one movie
    Get {
        /// Movie id
        id: String,
    },

    /// Add a movie
    #[command(alias = "create")]
    Add {
        /// Title
        #[arg(long)]
        nombre: String,

        /// Poster image URL
        #[arg(long)]
        url: String,

        /// Synopsis
        #[arg(long)]
        sinopsis: String,
    },

    /// Change a movie; omitted fields keep their current value
    #[command(alias = "update")]
    Edit {
        /// Movie id
        id: String,

        /// New title
        #[arg(long)]
        nombre: Option<String>,

        /// New poster image URL
        #[arg(long)]
        url: Option<String>,

        /// New synopsis
        #[arg(long)]
        sinopsis: Option<String>,
    },

    /// Delete a movie
    #[command(alias = "delete")]
    Rm {
        /// Movie id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List,

    /// Show one product
    Get {
        /// Product id
        id: String,
    },

    /// Add a product
    #[command(alias = "create")]
    Add {
        /// Product name
        #[arg(long)]
        nombre: String,

        /// Unit price
        #[arg(long)]
        precio: f64,

        /// Image URL
        #[arg(long)]
        imagen: String,
    },

    /// Change a product; omitted fields keep their current value
    #[command(alias = "update")]
    Edit {
        /// Product id
        id: String,

        /// New name
        #[arg(long)]
        nombre: Option<String>,

        /// New unit price
        #[arg(long)]
        precio: Option<f64>,

        /// New image URL
        #[arg(long)]
        imagen: Option<String>,
    },

    /// Delete a product
    #[command(alias = "delete")]
    Rm {
        /// Product id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

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

    /// Set a value on the active profile
    Set {
        /// Profile key (url, backend, api_key_env, movies_table, ...)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's API key in the system keyring
    SetKey,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
