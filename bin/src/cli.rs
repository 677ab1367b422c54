//! Command-line surface of the `plat` debug tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plat", version, about = "Debug tools for the map selection engine")]
pub struct Cli {
    /// Write logs to this file (or directory) instead of the default
    /// location.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect navigable addresses.
    #[command(subcommand)]
    Address(AddressCommand),

    /// Evaluate an access decision against a map config file.
    Access(AccessArgs),

    /// Fetch entities from a live platform backend.
    Fetch(FetchArgs),
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Decode a query string into its selection intent and canonical form.
    Decode {
        /// Query string, with or without the leading `?`.
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Path to a map config JSON file.
    #[arg(long)]
    pub map: PathBuf,

    /// Acting account id.
    #[arg(long)]
    pub account: String,

    /// Acting account's plan tier (hobby, contributor, professional,
    /// business).
    #[arg(long, default_value = "hobby")]
    pub plan: String,

    /// Treat the subscription as lapsed.
    #[arg(long)]
    pub inactive: bool,

    /// Membership role held on the map (owner, manager, editor), if any.
    #[arg(long)]
    pub member_role: Option<String>,

    /// Owner-only preview override (owner, manager, editor, nonmember).
    #[arg(long)]
    pub view_as: Option<String>,

    /// Action to check (pins, areas, posts, clicks).
    pub action: String,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Base URL of the platform API.
    #[arg(long, env = "PLAT_API_URL")]
    pub base_url: String,

    #[command(subcommand)]
    pub command: FetchCommand,
}

#[derive(Debug, Subcommand)]
pub enum FetchCommand {
    /// Fetch a pin summary.
    Pin { id: String },

    /// Resolve a boundary entity within a layer.
    Boundary { layer: String, entity_id: String },

    /// Reverse-geocode a coordinate.
    Geocode { lat: f64, lng: f64 },
}
