use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sw_core::OutputFormat;

#[derive(Parser)]
#[command(name = "scopewise", version)]
#[command(about = "Scopewise: resolve layered agent configuration into effective views")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Scanner snapshot (JSON); `-` reads stdin
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Output format (text or json); defaults to the config file's choice
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Path to scopewise's config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Home directory used for `~/` memory imports
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Plugin root holding installed_plugins.json and marketplaces/
    #[arg(long, global = true)]
    pub plugins_dir: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Effective settings, one per key (last scope wins)
    Settings,

    /// Permission rules; deny outranks ask outranks allow before scope
    Permissions,

    /// MCP servers with duplicate and active flags, secrets masked
    Mcp,

    /// Hook events per scope (additive, never merged)
    Hooks,

    /// Slash commands and skills, plugins included
    Commands {
        /// Include each file's full text
        #[arg(long)]
        include_content: bool,
    },

    /// Memory file imports, broken links and cycles
    Memory,

    /// Snapshot records that will not feed any resolver
    Files,

    /// Run every resolver
    All,
}
