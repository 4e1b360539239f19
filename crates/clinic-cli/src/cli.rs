use clap::{Parser, Subcommand, ValueEnum};
use clinic_core::ResourceKind;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic admin CLI: manage patients, staff, episodes and more")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and CLINIC_URL env var)
    #[arg(short, long, global = true, env = "CLINIC_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "CLINIC_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage patients
    Patients(ResourceArgs),
    /// Manage staff members
    Staff(ResourceArgs),
    /// Manage roles
    Roles(ResourceArgs),
    /// Manage episodes of care
    Episodes(ResourceArgs),
    /// Manage episode templates
    EpisodeTemplates(ResourceArgs),
    /// Manage appointments
    Appointments(ResourceArgs),
    /// Manage billable services
    Services(ResourceArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

impl Commands {
    /// The entity a resource command targets, with its arguments.
    pub fn resource(&self) -> Option<(ResourceKind, &ResourceArgs)> {
        let (kind, args) = match self {
            Self::Patients(args) => (ResourceKind::Patient, args),
            Self::Staff(args) => (ResourceKind::Staff, args),
            Self::Roles(args) => (ResourceKind::Role, args),
            Self::Episodes(args) => (ResourceKind::Episode, args),
            Self::EpisodeTemplates(args) => (ResourceKind::EpisodeTemplate, args),
            Self::Appointments(args) => (ResourceKind::Appointment, args),
            Self::Services(args) => (ResourceKind::Service, args),
            Self::Config(_) => return None,
        };
        Some((kind, args))
    }
}

#[derive(clap::Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub action: ResourceAction,
}

#[derive(Subcommand)]
pub enum ResourceAction {
    /// List one page of records
    List(ListArgs),
    /// Read a record by id
    Get(IdArgs),
    /// Create a record from JSON
    Create(CreateArgs),
    /// Replace a record from JSON
    Update(UpdateArgs),
    /// Mark a record active
    Enable(IdArgs),
    /// Mark a record inactive
    Disable(IdArgs),
    /// Delete a record
    Delete(IdArgs),
    /// Show aggregate counts
    Count,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Records per page (defaults to the profile's page_size)
    #[arg(long)]
    pub size: Option<u32>,
    /// Only active records
    #[arg(long, conflicts_with = "search")]
    pub active: bool,
    /// Server-side search text
    #[arg(long)]
    pub search: Option<String>,
    /// Client-side filter applied to the fetched page
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(clap::Args)]
pub struct IdArgs {
    /// Record id
    pub id: String,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// Record id
    pub id: String,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format, page_size, token)
    pub key: String,
    /// Value
    pub value: String,
}
