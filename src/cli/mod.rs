//! CLI interface for the VirtualWisdom import tools

pub mod runner;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{FilterType, NameKey, PortType};

/// VirtualWisdom entity import tools - convert CSV inventories and import them via REST API
#[derive(Parser, Debug)]
#[command(name = "vw-import")]
#[command(author = "Virtual Instruments")]
#[command(version)]
#[command(about = "Convert CSV inventories to VW import JSON and import them", long_about = None)]
pub struct Cli {
    /// VW appliance hostname or IP (or set VI_IPADDR env var)
    #[arg(short = 'H', long, global = true, env = "VI_IPADDR")]
    pub host: Option<String>,

    /// Profile name to use (loads host and token from a saved profile)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert WWN,nickname rows to importable JSON
    Nicknames(NicknamesArgs),

    /// Convert type,name,member... rows to importable JSON
    Relations(RelationsArgs),

    /// Import a JSON entity file into VirtualWisdom
    Import(ImportArgs),

    /// List entities of one type from the appliance
    Entities(EntitiesArgs),

    /// Manage appliance profiles
    Profile(ProfileArgs),
}

/// Arguments for the nickname conversion
#[derive(Args, Debug)]
pub struct NicknamesArgs {
    /// CSV input file, or - for stdin
    pub csv_in: PathBuf,

    /// JSON output file, or - for stdout
    pub json_out: PathBuf,

    /// Port type of every alias
    #[arg(short = 't', long = "type", value_enum, default_value_t = PortType::Fcport)]
    pub port_type: PortType,

    /// JSON key carrying the alias name
    #[arg(long, value_enum, default_value_t = NameKey::NewName)]
    pub name_key: NameKey,
}

/// Arguments for the relations conversion
#[derive(Args, Debug)]
pub struct RelationsArgs {
    /// CSV input file, or - for stdin
    pub csv_in: PathBuf,

    /// JSON output file, or - for stdout
    pub json_out: PathBuf,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON import file, or - for stdin
    pub json_in: PathBuf,

    /// VW API token (or set VI_TOKEN env var)
    #[arg(short, long, env = "VI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Commit even if the appliance reports errors in the file
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Seconds between status checks
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Give up after this many busy status checks (0 = never)
    #[arg(long)]
    pub max_polls: Option<u32>,

    /// Validate the appliance TLS certificate
    #[arg(long)]
    pub verify_tls: bool,
}

/// Arguments for entity lookup
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Entity type (e.g. host, fcport, application)
    pub kind: String,

    /// VW API token (or set VI_TOKEN env var)
    #[arg(short, long, env = "VI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only list entities whose name matches this text
    #[arg(long)]
    pub filter: Option<String>,

    /// How the filter text is matched
    #[arg(long, value_enum, default_value_t = FilterType::ExactMatch)]
    pub filter_type: FilterType,

    /// Validate the appliance TLS certificate
    #[arg(long)]
    pub verify_tls: bool,
}

/// Arguments for profile management
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all saved profiles
    List,

    /// Add or update a profile
    Add {
        /// Profile name
        name: String,
        /// Appliance hostname or IP
        #[arg(long)]
        address: String,
        /// Validate the appliance TLS certificate
        #[arg(long)]
        verify_tls: bool,
    },

    /// Delete a profile
    Delete {
        /// Profile name to delete
        name: String,
    },

    /// Set the active profile
    Use {
        /// Profile name to activate
        name: String,
    },

    /// Store the API token for a profile (reads from stdin)
    SetToken {
        /// Profile name
        name: String,
    },
}
