use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serenity::gateway::{ConnectionStage, ShardStageUpdateEvent};
use serenity::model::channel::Message;
use serenity::model::event::ResumedEvent;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use crate::application::usecases::{Invocation, SensorEdgeHandler, dm_all};
use crate::application::{BotContext, LightSensor};
use crate::domain::{Profile, UserId};
use crate::interfaces::commands::parse_command;

pub fn intents() -> GatewayIntents {
    // member lookups by name need GUILD_MEMBERS (privileged, enable it in the developer portal)
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

struct SensorWiring {
    sensor: Option<Box<dyn LightSensor>>,
    edge: Option<SensorEdgeHandler>,
}

/// Routes gateway events into the bot.
pub struct Handler {
    ctx: Arc<BotContext>,
    prefix: String,
    armed: AtomicBool,
    wiring: Mutex<SensorWiring>,
}

impl Handler {
    pub fn new(
        ctx: Arc<BotContext>,
        prefix: impl Into<String>,
        edge: SensorEdgeHandler,
        sensor: Option<Box<dyn LightSensor>>,
    ) -> Self {
        Self {
            ctx,
            prefix: prefix.into(),
            armed: AtomicBool::new(false),
            wiring: Mutex::new(SensorWiring {
                sensor,
                edge: Some(edge),
            }),
        }
    }

    /// Hook the edge handler onto the sensor. The sensor stays owned by
    /// the handler so its interrupt lives as long as the process.
    fn arm_sensor(&self) {
        let mut wiring = match self.wiring.lock() {
            Ok(w) => w,
            Err(_) => {
                tracing::error!("sensor wiring lock poisoned, sensor not armed");
                return;
            }
        };
        let SensorWiring { sensor, edge } = &mut *wiring;

        let (Some(sensor), Some(edge)) = (sensor.as_mut(), edge.take()) else {
            tracing::warn!("no light sensor available, cycle notifications disabled");
            return;
        };

        match sensor.on_activated(Box::new(move || {
            edge.on_edge();
        })) {
            Ok(()) => tracing::info!("watching the light sensor"),
            Err(e) => tracing::error!("failed to arm light sensor: {e}"),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        self.ctx.set_bot_name(ready.user.name.clone());

        if self.armed.swap(true, Ordering::SeqCst) {
            tracing::info!("{} reconnected", ready.user.name);
            return;
        }

        let online = format!("{} is online and watching laundry", ready.user.name);
        tracing::info!("{online}");

        if let Err(e) = self
            .ctx
            .chat
            .send_channel_message(&self.ctx.channel, &online)
            .await
        {
            tracing::warn!("failed to post online message: {e}");
        }

        match self.ctx.resolver().resolve_all().await {
            Ok(n) => tracing::debug!(resolved = n, "resolved watchers"),
            Err(e) => tracing::error!("resolving watchers failed: {e}"),
        }

        match self.ctx.registry.list() {
            Ok(watchers) if !watchers.is_empty() => {
                dm_all(self.ctx.chat.as_ref(), &watchers, &online).await;
            }
            Ok(_) => {}
            Err(e) => tracing::error!("unable to read watch list: {e}"),
        }

        self.arm_sensor();
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(command) = parse_command(&self.prefix, &msg.content) else {
            return;
        };

        let inv = Invocation {
            author: Profile::new(UserId::new(msg.author.id.get()), msg.author.name.clone()),
            direct: msg.guild_id.is_none(),
        };

        match self.ctx.commands().execute(&inv, command).await {
            Ok(reply) => {
                if let Err(e) = msg.channel_id.say(&ctx.http, &reply.text).await {
                    tracing::error!("failed to send reply: {e:?}");
                }
                if reply.mirror_to_channel {
                    if let Err(e) = self
                        .ctx
                        .chat
                        .send_channel_message(&self.ctx.channel, &reply.text)
                        .await
                    {
                        tracing::warn!("failed to mirror reply to #{}: {e}", self.ctx.channel);
                    }
                }
            }
            Err(e) => {
                tracing::error!(content = %msg.content, "command failed: {e:?}");
                self.ctx.report_error().await;
            }
        }
    }

    async fn resume(&self, _: Context, _: ResumedEvent) {
        tracing::info!("{} resumed its gateway session", self.ctx.bot_name());
    }

    async fn shard_stage_update(&self, _: Context, event: ShardStageUpdateEvent) {
        if event.new == ConnectionStage::Disconnected {
            tracing::warn!("{} disconnected from Discord", self.ctx.bot_name());
        } else {
            tracing::debug!(old = ?event.old, new = ?event.new, "shard stage changed");
        }
    }
}
