//! Contacts command - lists the conversation index.

use dealsdive::{
    Clock, Settings, SystemClock,
    search::{SortOrder, contact_directory},
};

use crate::cli::ContactsArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the contacts command
pub fn run(
    args: &ContactsArgs,
    settings: Settings,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let order: SortOrder = args.sort.parse()?;
    let flow = super::flow(settings)?;
    let contacts = contact_directory(flow.marketplace().catalog(), &args.query, order);

    match format {
        OutputFormat::Human => {
            let now = SystemClock.now();
            let rows: Vec<Vec<String>> = contacts
                .iter()
                .map(|c| {
                    let (last, when) = match &c.last_message {
                        Some(summary) => (summary.text.clone(), summary.label(now)),
                        None => (String::new(), String::new()),
                    };
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        c.unread.to_string(),
                        when,
                        last,
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "UNREAD", "WHEN", "LAST MESSAGE"], &rows);
        }
        OutputFormat::Json => print_json(&contacts)?,
    }

    Ok(())
}
