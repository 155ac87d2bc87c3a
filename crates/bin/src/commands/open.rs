//! Open command - renders the view behind a path.

use dealsdive::{
    Clock, Settings, SystemClock,
    agreement::format_currency,
    flow::{Route, View},
};

use crate::cli::OpenArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the open command
pub fn run(
    args: &OpenArgs,
    settings: Settings,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let route = Route::parse(&args.path);
    let view = match super::flow(settings) {
        Ok(flow) => flow.navigate(route),
        Err(err) => {
            tracing::warn!(error = %err, "Marketplace failed to load");
            View::for_error(&err, &route)
        }
    };

    match format {
        OutputFormat::Human => print_view(&view),
        OutputFormat::Json => print_json(&view)?,
    }
    Ok(())
}

fn print_view(view: &View) {
    match view {
        View::Catalog { startups } => {
            let rows: Vec<Vec<String>> = startups
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        s.name.clone(),
                        s.category.clone(),
                        format_currency(s.requested_amount as f64, 0),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "CATEGORY", "SEEKING"], &rows);
        }
        View::ConversationIndex { contacts } => {
            let now = SystemClock.now();
            let rows: Vec<Vec<String>> = contacts
                .iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        c.unread.to_string(),
                        c.last_message
                            .as_ref()
                            .map(|m| m.label(now))
                            .unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "UNREAD", "WHEN"], &rows);
            println!();
            println!("Select a conversation to start messaging.");
        }
        View::Conversation {
            counterparty,
            messages,
        } => {
            println!("Conversation with {}", counterparty.display_name());
            if messages.is_empty() {
                println!("No messages yet.");
            }
            for message in messages {
                let who = if message.is_from_user() { "you" } else { "them" };
                println!("{who}: {}", message.body);
            }
        }
        View::Agreement {
            deal,
            amount,
            term,
            rate_percent,
            equity_percent,
            status,
        } => {
            println!("Create agreement with {}", deal.startup.name);
            if let Some(status) = status {
                println!("Status:   {status:?}");
            }
            println!("Amount:   {}", format_currency(*amount as f64, 0));
            println!("Period:   {}", term.label());
            println!("Interest: {rate_percent}%");
            println!("Equity:   {equity_percent}%");
        }
        View::Payment { deal, amount } => {
            println!("Pay {} to {}", format_currency(*amount as f64, 0), deal.startup.name);
        }
        View::NotFound { message, escape } => {
            println!("{message}");
            println!("Go back: {escape}");
        }
        View::LoadFailed { reason, retry } => {
            println!("Something went wrong: {reason}");
            println!("Retry: {retry}");
        }
    }
}
