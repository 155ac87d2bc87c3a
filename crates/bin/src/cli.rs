//! CLI argument definitions for the DealsDive binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// DealsDive marketplace explorer
#[derive(Parser, Debug)]
#[command(name = "dealsdive")]
#[command(about = "DealsDive: browse startups, negotiate with founders, simulate the investment")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Settings file (JSON)
    #[arg(long, global = true, env = "DEALSDIVE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and sort the startup catalog
    Search(SearchArgs),
    /// List contacts
    Contacts(ContactsArgs),
    /// Show a conversation and optionally send messages
    Chat(ChatArgs),
    /// Price an investment agreement and submit it
    Agreement(AgreementArgs),
    /// Render the view behind a path such as /chat/c1
    Open(OpenArgs),
}

/// Arguments for the search command
#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Text matched against startup names and descriptions
    #[arg(default_value = "")]
    pub term: String,

    /// Category, or "All Industries"
    #[arg(short, long, default_value = "All Industries")]
    pub category: String,

    /// Investment range label, e.g. "$100K - $500K"
    #[arg(short, long, default_value = "Any Amount")]
    pub range: String,

    /// Sort order: recent, unread or alphabetical
    #[arg(short, long)]
    pub sort: Option<String>,
}

/// Arguments for the contacts command
#[derive(clap::Args, Debug)]
pub struct ContactsArgs {
    /// Text matched against contact and startup names
    #[arg(default_value = "")]
    pub query: String,

    /// Sort order: recent, unread or alphabetical
    #[arg(short, long, default_value = "recent")]
    pub sort: String,
}

/// Arguments for the chat command
#[derive(clap::Args, Debug)]
pub struct ChatArgs {
    /// Contact or startup identifier
    pub id: String,

    /// Message to send; repeat to send several
    #[arg(long)]
    pub send: Vec<String>,
}

/// Arguments for the agreement command
#[derive(clap::Args, Debug)]
pub struct AgreementArgs {
    /// Contact or startup identifier
    pub id: String,

    /// Investment amount, e.g. 250,000
    #[arg(short, long, default_value = "100,000")]
    pub amount: String,

    /// Investment period, e.g. "1 year"
    #[arg(short, long, default_value = "6 months")]
    pub term: String,

    /// Annual interest rate, e.g. 5%
    #[arg(short, long, default_value = "5%")]
    pub rate: String,

    /// Equity requested in return, in percent
    #[arg(short, long, default_value_t = 10.0)]
    pub equity: f64,

    /// Only show the repayment figures, do not submit
    #[arg(long)]
    pub preview: bool,
}

/// Arguments for the open command
#[derive(clap::Args, Debug)]
pub struct OpenArgs {
    /// Path to render
    #[arg(default_value = "/")]
    pub path: String,
}
