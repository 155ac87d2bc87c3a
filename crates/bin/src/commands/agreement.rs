//! Agreement command - prices the terms and walks on to the payment step.

use std::time::Duration;

use dealsdive::{
    Id, Settings,
    agreement::{TermOption, format_currency, parse_rate},
    flow::AgreementState,
};

use crate::cli::AgreementArgs;
use crate::output::{OutputFormat, print_json};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the agreement command
pub async fn run(
    args: &AgreementArgs,
    settings: Settings,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = TermOption::from_label(&args.term)?;
    let rate = parse_rate(&args.rate)?;

    let flow = super::flow(settings)?;
    let session = flow.start_agreement(&Id::from(args.id.as_str()))?;
    let repayment = session.preview(&args.amount, term, rate, args.equity)?;

    if !args.preview {
        session.submit(&args.amount, term, rate, args.equity)?;
        while session.state() != AgreementState::Redirected {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    let next = flow.navigator().current();

    match format {
        OutputFormat::Human => {
            let deal = session.deal();
            println!("Startup:          {}", deal.startup.name);
            println!(
                "Equity:           {}% (offered {}%)",
                args.equity, deal.startup.equity_percent
            );
            println!("Period:           {}", term.label());
            println!("Interest:         {rate}%");
            println!(
                "Monthly payment:  {}",
                format_currency(repayment.periodic_payment, 2)
            );
            println!(
                "Total repayment:  {}",
                format_currency(repayment.total_repayment, 2)
            );
            println!(
                "Total interest:   {}",
                format_currency(repayment.total_interest, 2)
            );
            if !args.preview {
                println!("Next:             {next}");
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "startup": session.deal().startup.id,
                "term_months": term.months(),
                "rate_percent": rate,
                "equity_percent": args.equity,
                "repayment": repayment,
                "state": session.state(),
                "route": next,
            });
            print_json(&value)?;
        }
    }

    Ok(())
}
