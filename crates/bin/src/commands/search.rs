//! Search command - filters and sorts the startup catalog.

use dealsdive::{
    Settings,
    agreement::format_currency,
    search::{CategoryFilter, InvestmentRange, SearchCriteria, SortOrder, search_catalog},
};

use crate::cli::SearchArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the search command
pub fn run(
    args: &SearchArgs,
    settings: Settings,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let criteria = SearchCriteria::new()
        .with_term(args.term.as_str())
        .with_category(CategoryFilter::parse(&args.category))
        .with_range(InvestmentRange::from_label(&args.range)?);
    let order = args
        .sort
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?;

    let flow = super::flow(settings)?;
    let results = search_catalog(flow.marketplace().catalog(), &criteria, order);

    match format {
        OutputFormat::Human => {
            if results.is_empty() {
                println!("No startups match.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = results
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        s.name.clone(),
                        s.category.clone(),
                        format_currency(s.requested_amount as f64, 0),
                        format!("{}%", s.equity_percent),
                        s.location.clone(),
                    ]
                })
                .collect();
            print_table(
                &["ID", "NAME", "CATEGORY", "SEEKING", "EQUITY", "LOCATION"],
                &rows,
            );
        }
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}
