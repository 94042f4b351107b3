use std::sync::Arc;

use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::channel::ChannelType;
use serenity::model::id::{GuildId, UserId as DiscordUserId};

use crate::application::{AppError, AppResult, ChatClient};
use crate::domain::{Profile, UserId};

const MEMBER_PAGE: u64 = 1000;

/// Discord ids are never 0; serenity panics when handed one.
fn discord_user(user: UserId) -> AppResult<DiscordUserId> {
    match user.get() {
        0 => Err(AppError::Chat("user id 0 is not a Discord user".into())),
        id => Ok(DiscordUserId::new(id)),
    }
}

/// Discord over serenity's REST client. Independent of the gateway
/// connection, so it can be used before `ready` and from spawned tasks.
pub struct SerenityChatClient {
    http: Arc<Http>,
}

impl SerenityChatClient {
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }

    async fn guild_ids(&self) -> AppResult<Vec<GuildId>> {
        let guilds = self
            .http
            .get_guilds(None, None)
            .await
            .map_err(|e| AppError::Chat(e.to_string()))?;
        Ok(guilds.into_iter().map(|g| g.id).collect())
    }
}

#[async_trait]
impl ChatClient for SerenityChatClient {
    async fn send_direct_message(&self, user: UserId, text: &str) -> AppResult<()> {
        let dm = discord_user(user)?
            .create_dm_channel(self.http.as_ref())
            .await
            .map_err(|e| AppError::Chat(e.to_string()))?;

        dm.id
            .say(self.http.as_ref(), text)
            .await
            .map_err(|e| AppError::Chat(e.to_string()))?;
        Ok(())
    }

    async fn send_channel_message(&self, channel: &str, text: &str) -> AppResult<()> {
        for guild in self.guild_ids().await? {
            let channels = guild
                .channels(&self.http)
                .await
                .map_err(|e| AppError::Chat(e.to_string()))?;

            let found = channels
                .values()
                .find(|c| c.kind == ChannelType::Text && c.name == channel);

            if let Some(c) = found {
                tracing::info!("sending message to #{}: {}", c.name, text);
                c.id.say(self.http.as_ref(), text)
                    .await
                    .map_err(|e| AppError::Chat(e.to_string()))?;
                return Ok(());
            }
        }
        Err(AppError::NotFound(format!("channel #{channel}")))
    }

    async fn fetch_user(&self, user: UserId) -> AppResult<Profile> {
        let u = self
            .http
            .get_user(discord_user(user)?)
            .await
            .map_err(|e| AppError::Chat(e.to_string()))?;
        Ok(Profile::new(UserId::new(u.id.get()), u.name))
    }

    async fn lookup_member_by_name(&self, name: &str) -> AppResult<Option<Profile>> {
        for guild in self.guild_ids().await? {
            let mut after: Option<DiscordUserId> = None;
            loop {
                let page = guild
                    .members(&self.http, Some(MEMBER_PAGE), after)
                    .await
                    .map_err(|e| AppError::Chat(e.to_string()))?;

                if let Some(m) = page.iter().find(|m| m.user.name == name) {
                    return Ok(Some(Profile::new(
                        UserId::new(m.user.id.get()),
                        m.user.name.clone(),
                    )));
                }

                if (page.len() as u64) < MEMBER_PAGE {
                    break;
                }
                after = page.last().map(|m| m.user.id);
            }
        }
        Ok(None)
    }
}
