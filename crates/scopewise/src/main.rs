use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;
mod resolve_cmds;
mod snapshot;

use cli::{Cli, Commands};
use resolve_cmds::ResolveContext;
use snapshot::Snapshot;
use sw_config::GlobalConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (output to stderr, initialize only once)
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();

    let config = match &cli.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::load()?,
    };
    let format = cli.format.unwrap_or(config.output.format);
    let include_content = matches!(
        cli.command,
        Commands::Commands {
            include_content: true
        }
    );
    let ctx = ResolveContext::new(&config, cli.home, cli.plugins_dir, include_content);
    let snapshot = Snapshot::load(&cli.snapshot)?;

    match cli.command {
        Commands::Settings => {
            let result = resolve_cmds::run_settings(&snapshot);
            render::emit(&result, format, render::settings_text)?;
        }
        Commands::Permissions => {
            let result = resolve_cmds::run_permissions(&snapshot);
            render::emit(&result, format, render::permissions_text)?;
        }
        Commands::Mcp => {
            let result = resolve_cmds::run_mcp(&snapshot, &ctx);
            render::emit(&result, format, render::mcp_text)?;
        }
        Commands::Hooks => {
            let result = resolve_cmds::run_hooks(&snapshot);
            render::emit(&result, format, render::hooks_text)?;
        }
        Commands::Commands { .. } => {
            let result = resolve_cmds::run_commands(&snapshot, &ctx);
            render::emit(&result, format, render::commands_text)?;
        }
        Commands::Memory => {
            let result = resolve_cmds::run_memory(&snapshot, &ctx)?;
            render::emit(&result, format, render::memory_text)?;
        }
        Commands::Files => {
            let report = resolve_cmds::run_files(&snapshot);
            render::emit(&report, format, render::files_text)?;
        }
        Commands::All => {
            let report = resolve_cmds::run_all(snapshot, ctx).await?;
            render::emit(&report, format, render::all_text)?;
        }
    }

    Ok(())
}
