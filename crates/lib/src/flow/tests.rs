//! Tests for routing, rendering and the timed steps.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::conversation::EchoReplies;
use crate::payment::CardDetails;
use crate::scheduler::ManualScheduler;
use crate::{FixedClock, Settings};

struct Harness {
    scheduler: Arc<ManualScheduler>,
    flow: FlowController,
}

fn harness() -> Harness {
    let clock = Arc::new(FixedClock::default());
    let scheduler = Arc::new(ManualScheduler::with_clock(Arc::clone(&clock)));
    let marketplace = Arc::new(Marketplace::with_fixtures(clock.as_ref()).unwrap());
    let flow = FlowController::with_replies(
        marketplace,
        clock,
        scheduler.clone(),
        Arc::new(EchoReplies::new()),
        Settings::default(),
    );
    Harness { scheduler, flow }
}

fn card() -> CardDetails {
    CardDetails::new("Ada Lovelace", "4242 4242 4242 4242", "12/28", "123")
}

#[test]
fn test_route_parsing() {
    assert_eq!(Route::parse("/"), Route::Catalog);
    assert_eq!(Route::parse(""), Route::Catalog);
    assert_eq!(Route::parse("/search"), Route::Search);
    assert_eq!(Route::parse("/chat/"), Route::Conversations);
    assert_eq!(Route::parse("/chat/c1"), Route::Conversation(Id::from("c1")));
    assert_eq!(Route::parse("agreement/b1"), Route::Agreement(Id::from("b1")));
    assert_eq!(
        Route::parse("/payment/b1?amount=250000"),
        Route::Payment {
            id: Id::from("b1"),
            amount: Some(250_000)
        }
    );
    assert_eq!(
        Route::parse("/payment/b1?amount=lots"),
        Route::Payment {
            id: Id::from("b1"),
            amount: None
        }
    );
    assert_eq!(
        Route::parse("/payment/b1?amount=0"),
        Route::Payment {
            id: Id::from("b1"),
            amount: None
        }
    );
    assert_eq!(Route::parse("/agreement"), Route::NotFound("/agreement".to_string()));
    assert_eq!(Route::parse("/admin/x/y"), Route::NotFound("/admin/x/y".to_string()));
}

#[test]
fn test_routes_round_trip() {
    let routes = [
        Route::Catalog,
        Route::Search,
        Route::Conversations,
        Route::Conversation(Id::from("c2")),
        Route::Agreement(Id::from("b3")),
        Route::Payment {
            id: Id::from("b3"),
            amount: Some(42),
        },
        Route::Payment {
            id: Id::from("b3"),
            amount: None,
        },
    ];
    for route in routes {
        assert_eq!(Route::parse(&route.to_path()), route, "{route}");
    }
}

#[test]
fn test_identifiers_are_percent_encoded() {
    for raw in ["b 1", "a/b", "c%1", "ü"] {
        let route = Route::Conversation(Id::from(raw));
        let path = route.to_path();
        assert!(!path[6..].contains(['/', ' ']), "{path}");
        assert_eq!(Route::parse(&path), route, "{path}");
    }
    assert_eq!(
        Route::parse("/agreement/b%201"),
        Route::Agreement(Id::from("b 1"))
    );
    assert_eq!(Route::parse("/chat/b 1"), Route::Conversation(Id::from("b 1")));
}

#[test]
fn test_navigator_history() {
    let nav = Navigator::default();
    nav.navigate(Route::Search);
    nav.navigate(Route::Agreement(Id::from("b1")));
    nav.navigate(Route::Agreement(Id::from("b1")));
    assert_eq!(nav.depth(), 2);
    assert_eq!(nav.back(), Route::Search);
    assert_eq!(nav.back(), Route::Catalog);
    assert_eq!(nav.back(), Route::Catalog);
    assert_eq!(nav.current(), Route::Catalog);
}

#[test]
fn test_render_catalog_and_index() {
    let h = harness();
    match h.flow.render(&Route::Catalog) {
        View::Catalog { startups } => assert_eq!(startups.len(), 8),
        other => panic!("unexpected view {other:?}"),
    }
    match h.flow.render(&Route::Conversations) {
        View::ConversationIndex { contacts } => assert_eq!(contacts[0].id, "c1"),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn test_unknown_identifiers_render_not_found() {
    let h = harness();
    for path in ["/chat/zz", "/agreement/zz", "/payment/zz?amount=5", "/nowhere"] {
        let view = h.flow.open(path);
        match view {
            View::NotFound { escape, .. } => assert_eq!(escape, Route::Catalog),
            other => panic!("{path} rendered {other:?}"),
        }
    }
}

#[test]
fn test_agreement_and_payment_defaults() {
    let h = harness();
    match h.flow.open("/agreement/c3") {
        View::Agreement {
            deal,
            amount,
            term,
            rate_percent,
            equity_percent,
            status,
        } => {
            assert_eq!(deal.startup.id, "b3");
            assert_eq!(amount, 100_000);
            assert_eq!(term, TermOption::SixMonths);
            assert_eq!(rate_percent, 5.0);
            assert_eq!(equity_percent, 10.0);
            assert_eq!(status, None);
        }
        other => panic!("unexpected view {other:?}"),
    }
    match h.flow.open("/payment/b2") {
        View::Payment { amount, deal } => {
            assert_eq!(amount, 100_000);
            assert_eq!(deal.startup.name, "HealthTrack AI");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn test_saved_agreement_prefills_form() {
    let h = harness();
    for path in ["/agreement/c1", "/agreement/b1"] {
        match h.flow.open(path) {
            View::Agreement {
                deal,
                amount,
                term,
                rate_percent,
                equity_percent,
                status,
            } => {
                assert_eq!(deal.startup.id, "b1");
                assert_eq!(amount, 250_000);
                assert_eq!(term, TermOption::TwoYears);
                assert_eq!(rate_percent, 7.0);
                assert_eq!(equity_percent, 15.0);
                assert_eq!(status, Some(AgreementStatus::Pending));
            }
            other => panic!("{path} rendered {other:?}"),
        }
    }
}

#[test]
fn test_proposed_equity_is_validated() {
    let h = harness();
    let session = h.flow.start_agreement(&Id::from("b1")).unwrap();
    for equity in [-1.0, 100.5, f64::NAN] {
        let err = session
            .submit("1000", TermOption::OneYear, 5.0, equity)
            .unwrap_err();
        assert!(err.is_validation_error(), "{equity}");
    }
    assert_eq!(session.state(), AgreementState::Editing);
    assert!(session.preview("1000", TermOption::OneYear, 5.0, 100.0).is_ok());
}

fn count_wins(runs: Vec<std::thread::ScopedJoinHandle<'_, bool>>) -> usize {
    runs.into_iter()
        .map(|run| run.join())
        .filter(|result| matches!(result, Ok(true)))
        .count()
}

#[test]
fn test_concurrent_submits_only_one_wins() {
    let h = harness();
    let agreement = &h.flow.start_agreement(&Id::from("b1")).unwrap();
    let payment = &h.flow.start_payment(&Id::from("b1"), None).unwrap();
    let card = &card();

    let (agreements, payments) = std::thread::scope(|scope| {
        let agreement_runs = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    agreement
                        .submit("1000", TermOption::OneYear, 5.0, 10.0)
                        .is_ok()
                })
            })
            .collect();
        let payment_runs = (0..8)
            .map(|_| scope.spawn(move || payment.submit(card).is_ok()))
            .collect();
        (count_wins(agreement_runs), count_wins(payment_runs))
    });
    assert_eq!(agreements, 1);
    assert_eq!(payments, 1);
    assert_eq!(h.scheduler.pending(), 2);
}

#[test]
fn test_start_steps_fail_closed() {
    let h = harness();
    assert!(h.flow.start_agreement(&Id::from("zz")).unwrap_err().is_not_found());
    assert!(h.flow.start_payment(&Id::from("zz"), None).unwrap_err().is_not_found());
    assert!(h.flow.open_conversation(&Id::from("zz")).unwrap_err().is_not_found());
    assert_eq!(h.flow.navigator().current(), Route::Catalog);
}

#[test]
fn test_agreement_validation_keeps_editing() {
    let h = harness();
    let session = h.flow.start_agreement(&Id::from("b1")).unwrap();

    let err = session.submit("", TermOption::OneYear, 5.0, 10.0).unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err.to_string(), "Please enter a valid investment amount");
    assert_eq!(session.state(), AgreementState::Editing);
    assert_eq!(h.scheduler.pending(), 0);
}

#[test]
fn test_agreement_preview() {
    let h = harness();
    let session = h.flow.start_agreement(&Id::from("b4")).unwrap();
    let preview = session.preview("100,000", TermOption::OneYear, 12.0, 10.0).unwrap();
    assert!((preview.periodic_payment - 8884.88).abs() < 0.005);
    assert_eq!(session.state(), AgreementState::Editing);
}

#[test]
fn test_agreement_redirects_to_payment() {
    let h = harness();
    let session = h.flow.start_agreement(&Id::from("b1")).unwrap();
    assert_eq!(h.flow.navigator().current(), Route::Agreement(Id::from("b1")));

    let terms = session.submit("250,000", TermOption::OneYear, 5.0, 12.5).unwrap();
    assert_eq!(terms.principal, 250_000.0);
    assert_eq!(terms.equity_percent, 12.5);
    assert_eq!(session.state(), AgreementState::Submitting);

    let again = session.submit("1", TermOption::OneYear, 5.0, 10.0).unwrap_err();
    assert!(matches!(
        again,
        crate::Error::Flow(FlowError::AlreadySubmitted { .. })
    ));

    h.scheduler.advance(Duration::from_millis(1500));
    assert_eq!(session.state(), AgreementState::Succeeded);
    assert_eq!(h.flow.navigator().current(), Route::Agreement(Id::from("b1")));

    h.scheduler.advance(Duration::from_millis(1500));
    assert_eq!(session.state(), AgreementState::Redirected);
    assert_eq!(
        h.flow.navigator().current(),
        Route::Payment {
            id: Id::from("b1"),
            amount: Some(250_000)
        }
    );
    assert_eq!(h.flow.navigator().current().to_path(), "/payment/b1?amount=250000");
}

#[test]
fn test_closing_agreement_cancels_redirect() {
    let h = harness();
    let session = h.flow.start_agreement(&Id::from("b1")).unwrap();
    session.submit("1000", TermOption::ThreeMonths, 0.0, 10.0).unwrap();
    h.scheduler.advance(Duration::from_millis(1500));
    session.close();

    assert_eq!(h.scheduler.advance(Duration::from_secs(10)), 0);
    assert_eq!(session.state(), AgreementState::Succeeded);
    assert_eq!(h.flow.navigator().current(), Route::Agreement(Id::from("b1")));
    assert!(session.submit("1000", TermOption::ThreeMonths, 0.0, 10.0).is_err());
}

#[test]
fn test_payment_completes_and_returns_home() {
    let h = harness();
    let session = h.flow.start_payment(&Id::from("c2"), Some(75_000)).unwrap();
    assert_eq!(session.amount(), 75_000);
    assert_eq!(session.deal().startup.id, "b2");

    session.submit(&card()).unwrap();
    assert_eq!(session.state(), PaymentState::Processing);

    h.scheduler.advance(Duration::from_millis(1999));
    assert_eq!(session.state(), PaymentState::Processing);
    h.scheduler.advance(Duration::from_millis(1));
    assert_eq!(session.state(), PaymentState::Succeeded);

    h.scheduler.advance(Duration::from_millis(2999));
    assert!(matches!(h.flow.navigator().current(), Route::Payment { .. }));
    h.scheduler.advance(Duration::from_millis(1));
    assert_eq!(session.state(), PaymentState::Completed);
    assert_eq!(h.flow.navigator().current(), Route::Catalog);
}

#[test]
fn test_invalid_card_keeps_editing() {
    let h = harness();
    let session = h.flow.start_payment(&Id::from("b1"), None).unwrap();
    assert_eq!(session.amount(), 100_000);

    let bad = CardDetails {
        cvv: "1".to_string(),
        ..card()
    };
    let err = session.submit(&bad).unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(session.state(), PaymentState::Editing);
    assert_eq!(h.scheduler.pending(), 0);
}

#[test]
fn test_dropping_payment_cancels_processing() {
    let h = harness();
    {
        let session = h.flow.start_payment(&Id::from("b1"), Some(10)).unwrap();
        session.submit(&card()).unwrap();
    }
    assert_eq!(h.scheduler.advance(Duration::from_secs(10)), 0);
    assert!(matches!(h.flow.navigator().current(), Route::Payment { .. }));
}

#[test]
fn test_conversation_route_shows_thread() {
    let h = harness();
    let conversation = h.flow.open_conversation(&Id::from("b1")).unwrap();
    conversation.send_text("Any update?").unwrap();
    h.scheduler.run_until_idle();

    match h.flow.current() {
        View::Conversation {
            counterparty,
            messages,
        } => {
            assert_eq!(counterparty.conversation_key(), "c1");
            assert_eq!(messages.len(), 7);
        }
        other => panic!("unexpected view {other:?}"),
    }
}
