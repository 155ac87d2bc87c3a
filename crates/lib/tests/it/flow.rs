use std::time::Duration;

use dealsdive::{
    Id, Settings,
    agreement::{TermOption, format_currency},
    conversation::Message,
    flow::{AgreementState, PaymentState, Route, View},
    payment::CardDetails,
};

use crate::helpers::TestContext;

#[test]
fn test_full_investment_flow() {
    let ctx = TestContext::new();
    let flow = ctx.flow();

    // negotiate
    let conversation = flow.open_conversation(&Id::from("c1")).unwrap();
    conversation.send_text("Let's talk terms").unwrap();
    ctx.scheduler.advance(Duration::from_millis(1500));
    drop(conversation);

    // create agreement, starting from the terms proposed earlier
    match flow.open("/agreement/c1") {
        View::Agreement {
            amount,
            equity_percent,
            ..
        } => {
            assert_eq!(amount, 250_000);
            assert_eq!(equity_percent, 15.0);
        }
        other => panic!("unexpected view {other:?}"),
    }
    let agreement = flow.start_agreement(&Id::from("c1")).unwrap();
    let preview = agreement.preview("100000", TermOption::OneYear, 12.0, 10.0).unwrap();
    assert_eq!(format_currency(preview.periodic_payment, 2), "$8,884.88");
    agreement.submit("100,000", TermOption::OneYear, 12.0, 10.0).unwrap();
    ctx.scheduler.advance(Duration::from_millis(3000));
    assert_eq!(agreement.state(), AgreementState::Redirected);

    let route = flow.navigator().current();
    assert_eq!(route.to_path(), "/payment/c1?amount=100000");
    let (id, amount) = match flow.current() {
        View::Payment { deal, amount } => {
            assert_eq!(deal.startup.id, "b1");
            (Id::from("c1"), amount)
        }
        other => panic!("unexpected view {other:?}"),
    };
    assert_eq!(amount, 100_000);

    // pay
    let payment = flow.start_payment(&id, Some(amount)).unwrap();
    payment
        .submit(&CardDetails::new("Ada Lovelace", "4242424242424242", "1230", "321"))
        .unwrap();
    ctx.scheduler.advance(Duration::from_millis(2000));
    assert_eq!(payment.state(), PaymentState::Succeeded);
    ctx.scheduler.advance(Duration::from_millis(3000));
    assert_eq!(payment.state(), PaymentState::Completed);
    assert_eq!(flow.navigator().current(), Route::Catalog);
    assert!(matches!(flow.current(), View::Catalog { .. }));

    // back walks the history in reverse
    assert!(matches!(flow.navigator().back(), Route::Payment { .. }));
}

#[test]
fn test_unknown_ids_fail_closed_at_every_step() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    for path in ["/chat/b99", "/agreement/b99", "/payment/b99?amount=10"] {
        let view = flow.open(path);
        assert!(view.is_not_found(), "{path}");
    }
    assert!(flow.start_agreement(&Id::from("b99")).is_err());
    assert!(flow.start_payment(&Id::from("b99"), Some(10)).is_err());
}

#[test]
fn test_instant_settings_collapse_delays() {
    let ctx = TestContext::new();
    let flow = ctx.flow_with(Settings::instant());

    let agreement = flow.start_agreement(&Id::from("b7")).unwrap();
    agreement.submit("800,000", TermOption::FiveYears, 7.0, 20.0).unwrap();
    ctx.scheduler.advance(Duration::ZERO);
    assert_eq!(agreement.state(), AgreementState::Redirected);
    assert_eq!(
        flow.navigator().current(),
        Route::Payment {
            id: Id::from("b7"),
            amount: Some(800_000)
        }
    );
}

#[test]
fn test_custom_default_amount() {
    let ctx = TestContext::new();
    let settings = Settings {
        default_amount: 5_000,
        ..Settings::default()
    };
    let flow = ctx.flow_with(settings);
    match flow.open("/payment/b3") {
        View::Payment { amount, .. } => assert_eq!(amount, 5_000),
        other => panic!("unexpected view {other:?}"),
    }
    let payment = flow.start_payment(&Id::from("b3"), None).unwrap();
    assert_eq!(payment.amount(), 5_000);
}

#[test]
fn test_views_serialize_with_tag() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    let json = serde_json::to_value(flow.open("/nowhere")).unwrap();
    assert_eq!(json["view"], "not_found");
    assert_eq!(json["escape"], "/");

    let json = serde_json::to_value(flow.open("/payment/b1?amount=7")).unwrap();
    assert_eq!(json["view"], "payment");
    assert_eq!(json["amount"], 7);
    assert_eq!(json["deal"]["startup"]["name"], "EcoPackage");
}

#[test]
fn test_message_timestamps_survive_json() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    let json = serde_json::to_value(flow.open("/chat/c1")).unwrap();
    assert_eq!(json["view"], "conversation");
    assert!(json["messages"][0]["sent_at"].is_string());
    assert!(json["counterparty"]["contact"]["last_message"]["at"].is_string());

    let messages: Vec<Message> = serde_json::from_value(json["messages"].clone()).unwrap();
    assert_eq!(messages, flow.marketplace().conversations().thread(&Id::from("c1")));
}
