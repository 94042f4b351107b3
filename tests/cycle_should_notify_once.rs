use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};

use laundromatic::application::BotContext;
use laundromatic::application::usecases::{SensorEdgeHandler, notify_all, run_dispatch_loop};
use laundromatic::domain::{DebounceTimer, DisplayZone, Profile, UserId, Watcher};
use laundromatic::infrastructure::{
    event_bus::EventBus,
    fake_chat::{FakeChatClient, Sent},
    memory_store::InMemoryWatchRegistry,
};

fn resolved(id: u64, name: &str) -> Watcher {
    let mut w = Watcher::new(UserId::new(id));
    w.apply_profile(&Profile::new(UserId::new(id), name));
    w
}

fn context(chat: Arc<FakeChatClient>, registry: InMemoryWatchRegistry) -> Arc<BotContext> {
    Arc::new(BotContext::new(
        Arc::new(registry),
        chat,
        "laundromatic",
        DisplayZone::from_hours(-7, "Arizona").unwrap(),
    ))
}

#[tokio::test]
async fn should_notify_only_once_within_cooldown() {
    let chat = Arc::new(FakeChatClient::new().with_member(1, "alice"));
    let registry = InMemoryWatchRegistry::with_ids([UserId::new(1)]);
    let ctx = context(Arc::clone(&chat), registry);
    ctx.resolver().resolve_all().await.unwrap();

    let (bus, rx) = EventBus::new();
    let dispatcher = tokio::spawn(run_dispatch_loop(Arc::clone(&ctx), rx));
    let edge = SensorEdgeHandler::new(Arc::new(DebounceTimer::new()), TimeDelta::minutes(30), bus);

    let t = Utc.with_ymd_and_hms(2024, 3, 5, 19, 0, 0).unwrap();
    assert!(edge.on_edge_at(t));
    assert!(!edge.on_edge_at(t + TimeDelta::minutes(20)));
    assert!(edge.on_edge_at(t + TimeDelta::minutes(31)));

    // closing the bus lets the loop drain and stop
    drop(edge);
    dispatcher.await.unwrap();

    let dms = chat.direct_messages_to(1);
    assert_eq!(
        dms,
        vec![
            "Washing cycle complete on `Tue, Mar 5 @ 12:00:00 (Arizona)`".to_string(),
            "Washing cycle complete on `Tue, Mar 5 @ 12:31:00 (Arizona)`".to_string(),
        ]
    );
    assert_eq!(chat.channel_messages("laundromatic"), dms);
}

#[tokio::test]
async fn first_edge_fires_with_empty_registry() {
    let chat = Arc::new(FakeChatClient::new());
    let ctx = context(Arc::clone(&chat), InMemoryWatchRegistry::new());

    let (bus, rx) = EventBus::new();
    let dispatcher = tokio::spawn(run_dispatch_loop(Arc::clone(&ctx), rx));
    let edge = SensorEdgeHandler::new(Arc::new(DebounceTimer::new()), TimeDelta::minutes(30), bus);

    assert!(edge.on_edge());
    drop(edge);
    dispatcher.await.unwrap();

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], Sent::Channel(name, _) if name == "laundromatic"));
}

#[tokio::test]
async fn one_blocked_watcher_does_not_stop_the_rest() {
    let chat = FakeChatClient::new().with_blocked_dms(2);
    let watchers = vec![resolved(1, "alice"), resolved(2, "bob"), resolved(3, "carol")];

    let report = notify_all(&chat, &watchers, "laundromatic", "done").await;

    assert_eq!(report.delivered, 3); // two DMs + channel
    assert_eq!(report.failed, 1);
    assert_eq!(chat.direct_messages_to(1), vec!["done".to_string()]);
    assert!(chat.direct_messages_to(2).is_empty());
    assert_eq!(chat.direct_messages_to(3), vec!["done".to_string()]);
    assert_eq!(chat.channel_messages("laundromatic"), vec!["done".to_string()]);
}

#[tokio::test]
async fn unresolved_watchers_are_skipped() {
    let chat = FakeChatClient::new();
    let watchers = vec![Watcher::new(UserId::new(9)), resolved(1, "alice")];

    let report = notify_all(&chat, &watchers, "laundromatic", "done").await;

    assert_eq!(report.skipped, 1);
    assert!(chat.direct_messages_to(9).is_empty());
    assert_eq!(chat.direct_messages_to(1), vec!["done".to_string()]);
}

#[tokio::test]
async fn missing_channel_still_reaches_watchers() {
    let chat = FakeChatClient::new().with_channels(&["general"]);
    let watchers = vec![resolved(1, "alice")];

    let report = notify_all(&chat, &watchers, "laundromatic", "done").await;

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(chat.direct_messages_to(1), vec!["done".to_string()]);
}

#[tokio::test]
async fn error_report_goes_to_watchers_only() {
    let chat = Arc::new(FakeChatClient::new());
    let registry = InMemoryWatchRegistry::with_ids([UserId::new(4)]);
    let ctx = context(Arc::clone(&chat), registry);
    ctx.resolver().resolve_all().await.unwrap();

    ctx.set_bot_name("laundrybot");
    ctx.set_bot_name("ignored");
    ctx.report_error().await;

    assert_eq!(
        chat.direct_messages_to(4),
        vec!["laundrybot has encountered an error. Check server log for details.".to_string()]
    );
    assert!(chat.channel_messages("laundromatic").is_empty());
}

#[tokio::test]
async fn error_report_before_ready_uses_fallback_name() {
    let chat = Arc::new(FakeChatClient::new().with_member(4, "dee"));
    let ctx = context(Arc::clone(&chat), InMemoryWatchRegistry::with_ids([UserId::new(4)]));
    ctx.resolver().resolve_all().await.unwrap();

    assert_eq!(ctx.bot_name(), "laundromatic");
    ctx.report_error().await;

    assert_eq!(
        chat.direct_messages_to(4),
        vec!["laundromatic has encountered an error. Check server log for details.".to_string()]
    );
}
