//! CLI argument definitions for the user-discovery binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use user_discovery::{RelationDirection, constants::DEFAULT_TIMEOUT_SECS};

use crate::output::OutputFormat;

/// Relation direction, as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    /// Users the current user points to (e.g. who I follow)
    Outgoing,
    /// Users pointing to the current user (e.g. my followers)
    Incoming,
    /// Users connected in both directions
    Mutual,
}

impl From<Direction> for RelationDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Outgoing => RelationDirection::Outgoing,
            Direction::Incoming => RelationDirection::Incoming,
            Direction::Mutual => RelationDirection::Mutual,
        }
    }
}

/// Find users by email address or by their relation to you
#[derive(Parser, Debug)]
#[command(name = "user-discovery")]
#[command(about = "Discover users on a remote backend by email or relation")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Also ask the backend for the total number of matches
    #[arg(long, global = true)]
    pub count: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look users up by email address
    Emails(EmailsArgs),
    /// List users connected to you by a relation
    Relation(RelationArgs),
}

/// Where discovery requests are sent
#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the discovery backend
    #[arg(
        long,
        global = true,
        default_value = "http://127.0.0.1:3000/",
        env = "DISCOVERY_ENDPOINT"
    )]
    pub endpoint: String,

    /// Application API key
    #[arg(long, global = true, env = "DISCOVERY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Session access token of the current user
    #[arg(
        long,
        global = true,
        env = "DISCOVERY_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Answer from a local JSON directory file instead of the backend
    #[arg(short = 'D', long, global = true, env = "DISCOVERY_DIRECTORY")]
    pub directory: Option<PathBuf>,
}

/// Arguments for the emails command
#[derive(clap::Args, Debug)]
pub struct EmailsArgs {
    /// Email addresses to look up
    #[arg(required = true)]
    pub emails: Vec<String>,
}

/// Arguments for the relation command
#[derive(clap::Args, Debug)]
pub struct RelationArgs {
    /// Relation name, e.g. `follow` or `friend`
    pub name: String,

    /// Direction of the relation; defaults to the relation's own direction
    #[arg(short, long)]
    pub direction: Option<Direction>,
}
