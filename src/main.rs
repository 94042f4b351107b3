use std::sync::Arc;

use clap::Parser;
use serenity::Client;

use laundromatic::application::usecases::{SensorEdgeHandler, run_dispatch_loop};
use laundromatic::application::{BotContext, LightSensor};
use laundromatic::domain::DebounceTimer;
use laundromatic::infrastructure::{
    event_bus::EventBus, memory_store::InMemoryWatchRegistry, serenity_chat::SerenityChatClient,
};
use laundromatic::interfaces::cli::Args;
use laundromatic::interfaces::config::Config;
use laundromatic::interfaces::discord::{self, Handler};
use laundromatic::interfaces::logging;

#[cfg(feature = "gpio")]
fn open_sensor(cfg: &Config) -> anyhow::Result<Option<Box<dyn LightSensor>>> {
    use laundromatic::infrastructure::gpio_sensor::GpioLightSensor;

    let sensor = GpioLightSensor::open(cfg.gpio_pin, true)?;
    Ok(Some(Box::new(sensor)))
}

#[cfg(not(feature = "gpio"))]
fn open_sensor(_cfg: &Config) -> anyhow::Result<Option<Box<dyn LightSensor>>> {
    tracing::warn!("built without the gpio feature, the light sensor is not watched");
    Ok(None)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // process environment wins over .env
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // 1) config
    let cfg = match Config::load(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("laundromatic: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init(cfg.loglevel, cfg.log_file.as_deref())?;
    tracing::debug!("config: {}", cfg.redacted());

    // 2) infra
    let registry = Arc::new(InMemoryWatchRegistry::with_ids(cfg.watchers.iter().copied()));
    let chat = Arc::new(SerenityChatClient::new(&cfg.token));
    let ctx = Arc::new(BotContext::new(
        registry,
        chat,
        cfg.channel.clone(),
        cfg.zone.clone(),
    ));

    let sensor = match open_sensor(&cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("failed to open light sensor on gpio {}: {e}", cfg.gpio_pin);
            std::process::exit(1);
        }
    };

    // 3) sensor -> runtime hand-off
    let (bus, rx) = EventBus::new();
    tokio::spawn(run_dispatch_loop(Arc::clone(&ctx), rx));
    let edge = SensorEdgeHandler::new(Arc::new(DebounceTimer::new()), cfg.cooldown(), bus);

    // 4) run
    let handler = Handler::new(Arc::clone(&ctx), cfg.prefix.clone(), edge, sensor);
    let mut client = Client::builder(&cfg.token, discord::intents())
        .event_handler(handler)
        .await?;

    tracing::info!(channel = %cfg.channel, prefix = %cfg.prefix, "connecting to Discord");
    if let Err(e) = client.start().await {
        tracing::error!("client error: {e:?}");
        ctx.report_error().await;
        return Err(e.into());
    }

    Ok(())
}
