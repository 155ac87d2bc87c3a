use std::sync::Arc;
use std::time::Duration;

use dealsdive::{
    Clock, Id, Marketplace, SystemClock,
    conversation::{CannedReplies, ComposerState, ConversationController, Originator},
    scheduler::TokioScheduler,
};

use crate::helpers::{TestContext, echo};

#[test]
fn test_appending_never_reorders_history() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    let conversation = flow.open_conversation(&Id::from("c1")).unwrap();
    let before = conversation.thread();

    conversation.send_text("one").unwrap();
    ctx.scheduler.advance(Duration::from_millis(700));
    conversation.send_text("two").unwrap();
    ctx.scheduler.run_until_idle();

    let after = conversation.thread();
    assert_eq!(after.len(), before.len() + 4);
    assert_eq!(&after[..before.len()], before.as_slice());
    assert!(after.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    assert_eq!(conversation.state(), ComposerState::Idle);
}

#[test]
fn test_blank_send_changes_nothing() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    let conversation = flow.open_conversation(&Id::from("c4")).unwrap();
    let contact_before = ctx.marketplace.catalog().contact(&Id::from("c4")).unwrap();

    for draft in ["", "   ", "\n\t"] {
        assert!(conversation.send_text(draft).unwrap_err().is_validation_error());
    }
    assert!(conversation.thread().is_empty());
    assert_eq!(conversation.state(), ComposerState::Idle);
    assert_eq!(
        ctx.marketplace.catalog().contact(&Id::from("c4")).unwrap(),
        contact_before
    );
}

#[test]
fn test_reply_updates_contact_summary() {
    let ctx = TestContext::new();
    let flow = ctx.flow();
    let conversation = flow.open_conversation(&Id::from("c5")).unwrap();
    conversation.send_text("Could you share your user numbers?").unwrap();

    let contact = ctx.marketplace.catalog().contact(&Id::from("c5")).unwrap();
    let summary = contact.last_message.unwrap();
    assert_eq!(summary.originator, Originator::User);
    assert_eq!(summary.label(ctx.clock.now()), "Just now");

    ctx.scheduler.advance(Duration::from_millis(1500));
    let contact = ctx.marketplace.catalog().contact(&Id::from("c5")).unwrap();
    let summary = contact.last_message.unwrap();
    assert_eq!(summary.originator, Originator::Counterparty);
    assert!(summary.text.contains("Could you share your user numb..."));
    assert_eq!(contact.unread, 1);
}

#[tokio::test(start_paused = true)]
async fn test_replies_on_tokio_scheduler() {
    let marketplace = Arc::new(Marketplace::with_fixtures(&SystemClock).unwrap());
    let scheduler = Arc::new(TokioScheduler::current().expect("inside a runtime"));
    let conversation = ConversationController::open(
        Arc::clone(&marketplace),
        &Id::from("c3"),
        Arc::new(SystemClock),
        scheduler,
        Arc::new(CannedReplies::seeded(3)),
        Duration::from_millis(1500),
    )
    .unwrap();

    conversation.send_text("Thanks for the plan").unwrap();
    assert_eq!(conversation.state(), ComposerState::AwaitingReply);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    let thread = conversation.thread();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[1].originator, Originator::Counterparty);
    assert_eq!(conversation.state(), ComposerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_controller_on_tokio_gets_no_reply() {
    let marketplace = Arc::new(Marketplace::with_fixtures(&SystemClock).unwrap());
    let scheduler = Arc::new(TokioScheduler::current().expect("inside a runtime"));
    {
        let conversation = ConversationController::open(
            Arc::clone(&marketplace),
            &Id::from("b8"),
            Arc::new(SystemClock),
            scheduler,
            echo(),
            Duration::from_millis(1500),
        )
        .unwrap();
        conversation.send_text("hello").unwrap();
    }

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(marketplace.conversations().len(&Id::from("b8")), 1);
}
