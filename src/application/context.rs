use std::sync::{Arc, OnceLock};

use crate::application::usecases::{
    CommandUseCase, DeliveryReport, ResolveWatchersUseCase, dm_all, notify_all,
};
use crate::application::{ChatClient, WatcherRepository};
use crate::domain::DisplayZone;

const FALLBACK_NAME: &str = "laundromatic";

/// Everything the bot shares between chat events and sensor events.
/// Built once in `main` and handed out behind an `Arc`.
pub struct BotContext {
    pub registry: Arc<dyn WatcherRepository>,
    pub chat: Arc<dyn ChatClient>,
    /// Broadcast channel name.
    pub channel: String,
    pub zone: DisplayZone,
    /// The bot's own username, known once the gateway is ready.
    bot_name: OnceLock<String>,
}

impl BotContext {
    pub fn new(
        registry: Arc<dyn WatcherRepository>,
        chat: Arc<dyn ChatClient>,
        channel: impl Into<String>,
        zone: DisplayZone,
    ) -> Self {
        Self {
            registry,
            chat,
            channel: channel.into(),
            zone,
            bot_name: OnceLock::new(),
        }
    }

    /// Record the bot's username. Only the first call sticks.
    pub fn set_bot_name(&self, name: impl Into<String>) {
        let _ = self.bot_name.set(name.into());
    }

    pub fn bot_name(&self) -> &str {
        self.bot_name.get().map_or(FALLBACK_NAME, String::as_str)
    }

    pub fn commands(&self) -> CommandUseCase<'_> {
        CommandUseCase {
            registry: self.registry.as_ref(),
            chat: self.chat.as_ref(),
        }
    }

    pub fn resolver(&self) -> ResolveWatchersUseCase<'_> {
        ResolveWatchersUseCase {
            registry: self.registry.as_ref(),
            chat: self.chat.as_ref(),
        }
    }

    /// DM all watchers and post to the broadcast channel.
    pub async fn announce(&self, message: &str) -> DeliveryReport {
        match self.registry.list() {
            Ok(watchers) => notify_all(self.chat.as_ref(), &watchers, &self.channel, message).await,
            Err(e) => {
                tracing::error!("unable to read watch list: {e}");
                notify_all(self.chat.as_ref(), &[], &self.channel, message).await
            }
        }
    }

    /// Tell every watcher that something went wrong. Details stay in the log.
    pub async fn report_error(&self) -> DeliveryReport {
        let message = format!(
            "{} has encountered an error. Check server log for details.",
            self.bot_name()
        );
        match self.registry.list() {
            Ok(watchers) => dm_all(self.chat.as_ref(), &watchers, &message).await,
            Err(e) => {
                tracing::error!("unable to read watch list: {e}");
                DeliveryReport::default()
            }
        }
    }
}
