use clap::Parser;
use dealsdive::Settings;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dealsdive=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, settings, cli.format)?,
        Commands::Contacts(args) => commands::contacts::run(args, settings, cli.format)?,
        Commands::Chat(args) => commands::chat::run(args, settings, cli.format).await?,
        Commands::Agreement(args) => commands::agreement::run(args, settings, cli.format).await?,
        Commands::Open(args) => commands::open::run(args, settings, cli.format)?,
    }

    Ok(())
}
