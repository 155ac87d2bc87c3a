//! Chat command - prints a conversation and sends messages to it.

use std::time::Duration;

use dealsdive::{Id, Settings, conversation::Message};

use crate::cli::ChatArgs;
use crate::output::{OutputFormat, print_json};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the chat command
pub async fn run(
    args: &ChatArgs,
    settings: Settings,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let flow = super::flow(settings)?;
    let conversation = flow.open_conversation(&Id::from(args.id.as_str()))?;

    for text in &args.send {
        conversation.send_text(text.as_str())?;
    }
    while conversation.outstanding_replies() > 0 {
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    let thread = conversation.thread();
    match format {
        OutputFormat::Human => {
            println!("Conversation with {}", conversation.counterparty().display_name());
            println!();
            for message in &thread {
                print_message(message);
            }
        }
        OutputFormat::Json => print_json(&thread)?,
    }

    Ok(())
}

fn print_message(message: &Message) {
    let who = if message.is_from_user() { "you" } else { "them" };
    println!(
        "[{}] {who}: {}",
        message.sent_at.format("%Y-%m-%d %H:%M"),
        message.body
    );
}
