use std::sync::Arc;

use crate::application::{BotContext, ChatClient, CycleReceiver};
use crate::domain::Watcher;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// DM `message` to every resolved watcher in the snapshot.
///
/// Best effort: one failed recipient never stops the rest, and nothing is
/// retried.
pub async fn dm_all(chat: &dyn ChatClient, watchers: &[Watcher], message: &str) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for w in watchers {
        if !w.resolved {
            tracing::warn!(user_id = %w.id, "skipping unresolved watcher");
            report.skipped += 1;
            continue;
        }

        match chat.send_direct_message(w.id, message).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::warn!(user_id = %w.id, "failed to DM watcher: {e}");
                report.failed += 1;
            }
        }
    }

    report
}

/// DM every watcher and post to the broadcast channel.
pub async fn notify_all(
    chat: &dyn ChatClient,
    watchers: &[Watcher],
    channel: &str,
    message: &str,
) -> DeliveryReport {
    let mut report = dm_all(chat, watchers, message).await;

    match chat.send_channel_message(channel, message).await {
        Ok(()) => report.delivered += 1,
        Err(e) => {
            tracing::warn!(channel, "failed to post to channel: {e}");
            report.failed += 1;
        }
    }

    report
}

/// Drain sensor activations and fan each one out. Ends when every
/// publisher has been dropped.
pub async fn run_dispatch_loop(ctx: Arc<BotContext>, mut rx: CycleReceiver) {
    while let Some(event) = rx.recv().await {
        let message = event.message(&ctx.zone);
        tracing::info!("{message}");

        let report = ctx.announce(&message).await;
        tracing::info!(
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "cycle complete notification sent"
        );
    }
    tracing::debug!("dispatch loop stopped");
}
